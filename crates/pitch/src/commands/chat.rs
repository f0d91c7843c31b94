//! `pitch chat` command implementation.

use std::io::BufRead;

use clap::Args;
use pitch_config::Config;
use pitch_session::{COMPLETION_MESSAGE, Conversation, FAILED_REPLY, Message, SessionClient};

use crate::error::CliError;
use crate::output::Output;

/// Typed instead of an answer to leave the session.
const QUIT_COMMANDS: [&str; 2] = ["/quit", "/exit"];

/// Arguments for the chat command.
#[derive(Args)]
pub(crate) struct ChatArgs {
    /// Show the assistant's reasoning above each question.
    #[arg(long)]
    show_reasoning: bool,
}

impl ChatArgs {
    /// Execute the chat command.
    ///
    /// Reads answers from stdin until the assistant signals completion,
    /// the user quits, or input ends.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be started or stdin fails.
    pub(crate) fn execute(self, config: &Config) -> Result<(), CliError> {
        let output = Output::new();
        let client = SessionClient::with_timeout(&config.api.base_url, config.api.timeout());

        output.info(&format!("Connecting to {}...", client.base_url()));
        let mut conversation = Conversation::start(&client)?;
        output.muted(&format!(
            "Session {} (type /quit to leave)",
            conversation.session_id()
        ));
        if let Some(question) = conversation.messages().first() {
            output.highlight(&format!("\n{}", question.text));
        }

        let mut lines = std::io::stdin().lock().lines();
        while !conversation.is_complete() {
            output.inline("> ");
            let Some(line) = lines.next().transpose()? else {
                break;
            };
            let answer = line.trim();
            if answer.is_empty() {
                continue;
            }
            if QUIT_COMMANDS.contains(&answer) {
                break;
            }

            let reply = conversation.answer(&client, answer, |_| output.inline("."));
            output.info("");
            match reply {
                Ok(message) => self.print_reply(&output, message),
                Err(e) => output.error(&format!("{FAILED_REPLY} ({e})")),
            }
        }

        if conversation.is_complete() {
            output.success(&format!("\n{COMPLETION_MESSAGE}"));
            output.info(&format!(
                "Preview with: pitch proposal {}",
                conversation.session_id()
            ));
        } else {
            output.info(&format!(
                "\nSession {} left open.",
                conversation.session_id()
            ));
        }
        Ok(())
    }

    fn print_reply(&self, output: &Output, message: &Message) {
        if self.show_reasoning
            && let Some(reasoning) = &message.reasoning
        {
            output.muted(reasoning);
        }
        output.highlight(&message.text);
    }
}
