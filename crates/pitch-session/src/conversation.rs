//! The message log of an interview session.

use tracing::{info, warn};

use crate::client::SessionClient;
use crate::error::SessionError;
use crate::reply::parse_reply;

/// Shown once the assistant signals that the interview is over.
pub const COMPLETION_MESSAGE: &str =
    "Proposal generation complete! Visit the preview page to review your proposal.";

/// Stands in for an assistant reply that could not be fetched.
pub const FAILED_REPLY: &str = "Failed to get response. Please try again.";

/// Author of a message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    User,
    Ai,
    System,
}

/// One entry in the conversation log.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    pub role: Role,
    pub text: String,
    /// Reasoning attached to an assistant reply.
    pub reasoning: Option<String>,
}

impl Message {
    fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
            reasoning: None,
        }
    }
}

/// An interview session and everything said in it.
#[derive(Clone, Debug)]
pub struct Conversation {
    session_id: String,
    messages: Vec<Message>,
    complete: bool,
}

impl Conversation {
    /// Start a session on the backend; the first question opens the log.
    pub fn start(client: &SessionClient) -> Result<Self, SessionError> {
        let start = client.start_session()?;
        Ok(Self::resume(start.session_id, &start.question))
    }

    /// Build a conversation for an existing session.
    #[must_use]
    pub fn resume(session_id: impl Into<String>, question: &str) -> Self {
        Self {
            session_id: session_id.into(),
            messages: vec![Message::new(Role::Ai, question)],
            complete: false,
        }
    }

    #[must_use]
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Whether the assistant has signalled completion.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Record a user answer.
    ///
    /// Rejects blank answers and any answer after completion.
    pub fn push_answer(&mut self, answer: &str) -> Result<(), SessionError> {
        if self.complete {
            return Err(SessionError::Completed);
        }
        let answer = answer.trim();
        if answer.is_empty() {
            return Err(SessionError::EmptyAnswer);
        }
        self.messages.push(Message::new(Role::User, answer));
        Ok(())
    }

    /// Record a complete assistant reply and return the parsed message.
    ///
    /// A reply containing a completion phrase also appends the
    /// [`COMPLETION_MESSAGE`] and closes the conversation.
    pub fn push_reply(&mut self, reply: &str) -> &Message {
        let parsed = parse_reply(reply);
        let index = self.messages.len();
        self.messages.push(Message {
            role: Role::Ai,
            text: parsed.content,
            reasoning: parsed.reasoning,
        });

        if parsed.complete && !self.complete {
            info!("Session {} complete", self.session_id);
            self.complete = true;
            self.messages
                .push(Message::new(Role::System, COMPLETION_MESSAGE));
        }
        &self.messages[index]
    }

    /// Send `answer` and record the streamed reply.
    ///
    /// `on_chunk` sees the reply text as it arrives. When the backend fails,
    /// the answer stays in the log, [`FAILED_REPLY`] is recorded in place of
    /// the reply and the error is returned; the user may answer again.
    pub fn answer(
        &mut self,
        client: &SessionClient,
        answer: &str,
        on_chunk: impl FnMut(&str),
    ) -> Result<&Message, SessionError> {
        self.push_answer(answer)?;

        let reply = client
            .continue_session(&self.session_id, answer.trim())
            .and_then(|stream| stream.collect_with(on_chunk));

        match reply {
            Ok(reply) => Ok(self.push_reply(&reply)),
            Err(e) => {
                warn!("Session {} reply failed: {}", self.session_id, e);
                self.messages.push(Message::new(Role::Ai, FAILED_REPLY));
                Err(e)
            }
        }
    }
}
