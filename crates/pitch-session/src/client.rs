//! Blocking HTTP client for the proposal backend.

use std::time::Duration;

use serde::de::DeserializeOwned;
use tracing::{debug, info};
use ureq::http::Response;
use ureq::{Agent, Body, BodyReader};

use crate::error::SessionError;
use crate::stream::TokenStream;
use crate::types::{
    AnswerBody, GenerateRequest, PromptBody, ProposalBody, ProposalFields, SessionStart,
    StyledBody,
};

/// Default backend address.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// Default HTTP timeout in seconds.
const DEFAULT_TIMEOUT: u64 = 30;

/// Proposal backend client.
pub struct SessionClient {
    agent: Agent,
    /// Agent without a global timeout, for streamed replies that may take
    /// longer than any single request should.
    stream_agent: Agent,
    base_url: String,
}

impl SessionClient {
    /// Create a client with the default timeout.
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self::with_timeout(base_url, Duration::from_secs(DEFAULT_TIMEOUT))
    }

    /// Create a client whose non-streaming requests time out after `timeout`.
    #[must_use]
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();
        let stream_agent = Agent::config_builder()
            .timeout_connect(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            stream_agent,
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }

    /// Get the API base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Start a new interview session.
    pub fn start_session(&self) -> Result<SessionStart, SessionError> {
        let url = format!("{}/start_proposal", self.base_url);
        info!("Starting proposal session");

        let response = self.agent.post(&url).send_empty()?;
        let start: SessionStart = read_json(check_status(response, "session")?)?;

        info!("Started session {}", start.session_id);
        Ok(start)
    }

    /// Send an answer and return the streamed reply.
    pub fn continue_session(
        &self,
        session_id: &str,
        answer: &str,
    ) -> Result<TokenStream<BodyReader<'static>>, SessionError> {
        let url = format!("{}/continue_proposal/{session_id}", self.base_url);
        debug!("Continuing session {}", session_id);

        let response = self
            .stream_agent
            .post(&url)
            .send_json(AnswerBody { response: answer })?;
        let body = check_status(response, &format!("session {session_id}"))?;

        Ok(TokenStream::new(body.into_reader()))
    }

    /// Latest generated proposal text of a session.
    ///
    /// Returns [`SessionError::NotFound`] when nothing was generated yet.
    pub fn latest_proposal(&self, session_id: &str) -> Result<String, SessionError> {
        let url = format!("{}/proposal/{session_id}/latest", self.base_url);
        info!("Getting latest proposal for session {}", session_id);

        let response = self.agent.get(&url).call()?;
        let body = check_status(response, &format!("proposal for session {session_id}"))?;
        let proposal: ProposalBody = read_json(body)?;
        Ok(proposal.proposal)
    }

    /// Generate a new version of the proposal.
    pub fn generate_proposal(
        &self,
        session_id: &str,
        request: &GenerateRequest,
    ) -> Result<String, SessionError> {
        let request_builder = |path: &str| {
            self.agent
                .post(format!("{}/proposal/{session_id}/{path}", self.base_url))
        };

        let response = match request {
            GenerateRequest::Styled { style, tone } => {
                info!("Generating {style}/{tone} proposal for session {session_id}");
                request_builder("generate").send_json(StyledBody {
                    style: *style,
                    tone: *tone,
                })?
            }
            GenerateRequest::Prompt(prompt) => {
                info!("Generating custom prompt proposal for session {session_id}");
                request_builder("custom_prompt").send_json(PromptBody { prompt })?
            }
        };

        let body = check_status(response, &format!("session {session_id}"))?;
        let proposal: ProposalBody = read_json(body)?;
        Ok(proposal.proposal)
    }

    /// Structured fields collected for a proposal.
    pub fn proposal_fields(&self, proposal_id: &str) -> Result<ProposalFields, SessionError> {
        let url = format!("{}/proposal/{proposal_id}", self.base_url);
        info!("Getting proposal {}", proposal_id);

        let response = self.agent.get(&url).call()?;
        read_json(check_status(response, &format!("proposal {proposal_id}"))?)
    }
}

/// Map error statuses to errors and hand back the body of a success.
fn check_status(response: Response<Body>, what: &str) -> Result<Body, SessionError> {
    let status = response.status().as_u16();
    let mut body = response.into_body();

    if status == 404 {
        return Err(SessionError::NotFound(what.to_owned()));
    }
    if status >= 400 {
        let error_body = body
            .read_to_string()
            .unwrap_or_else(|_| "(unable to read error body)".to_owned());
        return Err(SessionError::Http {
            status,
            body: error_body,
        });
    }
    Ok(body)
}

fn read_json<T: DeserializeOwned>(mut body: Body) -> Result<T, SessionError> {
    let text = body.read_to_string()?;
    serde_json::from_str(&text).map_err(|e| SessionError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Style, Tone};
    use pretty_assertions::assert_eq;
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::TcpListener;
    use std::sync::mpsc;
    use std::thread;

    /// Request line and body seen by the test server.
    struct Captured {
        request_line: String,
        body: String,
    }

    /// Serve one canned HTTP response on a local port.
    fn serve_once(status: u16, body: &'static str) -> (String, mpsc::Receiver<Captured>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());

            let mut request_line = String::new();
            reader.read_line(&mut request_line).unwrap();
            let mut content_length = 0;
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).unwrap();
                if line == "\r\n" || line.is_empty() {
                    break;
                }
                if let Some((name, value)) = line.split_once(':') {
                    if name.eq_ignore_ascii_case("content-length") {
                        content_length = value.trim().parse().unwrap();
                    }
                }
            }
            let mut request_body = vec![0; content_length];
            reader.read_exact(&mut request_body).unwrap();

            let mut stream = stream;
            write!(
                stream,
                "HTTP/1.1 {status} X\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            )
            .unwrap();

            tx.send(Captured {
                request_line: request_line.trim_end().to_owned(),
                body: String::from_utf8(request_body).unwrap(),
            })
            .unwrap();
        });

        (format!("http://{addr}/"), rx)
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = SessionClient::new("http://localhost:8000/");
        assert_eq!(client.base_url(), "http://localhost:8000");
    }

    #[test]
    fn test_start_session() {
        let (url, rx) = serve_once(200, r#"{"session_id":"s-1","question":"Who is the client?"}"#);
        let start = SessionClient::new(&url).start_session().unwrap();

        assert_eq!(start.session_id, "s-1");
        assert_eq!(start.question, "Who is the client?");
        assert_eq!(rx.recv().unwrap().request_line, "POST /start_proposal HTTP/1.1");
    }

    #[test]
    fn test_continue_session_streams_reply() {
        let (url, rx) = serve_once(200, "[REASONING] ok\n\nWhat is the budget?");
        let reply = SessionClient::new(&url)
            .continue_session("s-1", "Acme Corp")
            .unwrap()
            .collect_with(|_| {})
            .unwrap();

        assert_eq!(reply, "[REASONING] ok\n\nWhat is the budget?");
        let captured = rx.recv().unwrap();
        assert_eq!(captured.request_line, "POST /continue_proposal/s-1 HTTP/1.1");
        assert_eq!(captured.body, r#"{"response":"Acme Corp"}"#);
    }

    #[test]
    fn test_latest_proposal_not_found() {
        let (url, _rx) = serve_once(404, "No generated proposal found");
        let err = SessionClient::new(&url).latest_proposal("s-1").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_generate_styled() {
        let (url, rx) = serve_once(200, r##"{"proposal":"# Offer"}"##);
        let request = GenerateRequest::Styled {
            style: Style::Concise,
            tone: Tone::Friendly,
        };
        let proposal = SessionClient::new(&url)
            .generate_proposal("s-1", &request)
            .unwrap();

        assert_eq!(proposal, "# Offer");
        let captured = rx.recv().unwrap();
        assert_eq!(captured.request_line, "POST /proposal/s-1/generate HTTP/1.1");
        assert_eq!(captured.body, r#"{"style":"concise","tone":"friendly"}"#);
    }

    #[test]
    fn test_generate_custom_prompt() {
        let (url, rx) = serve_once(200, r#"{"proposal":"Shorter."}"#);
        let request = GenerateRequest::Prompt("Make it shorter".to_owned());
        SessionClient::new(&url)
            .generate_proposal("s-1", &request)
            .unwrap();

        let captured = rx.recv().unwrap();
        assert_eq!(captured.request_line, "POST /proposal/s-1/custom_prompt HTTP/1.1");
        assert_eq!(captured.body, r#"{"prompt":"Make it shorter"}"#);
    }

    #[test]
    fn test_server_error_is_http_error() {
        let (url, _rx) = serve_once(500, "Internal Error");
        let err = SessionClient::new(&url).latest_proposal("s-1").unwrap_err();
        assert!(matches!(err, SessionError::Http { status: 500, ref body } if body == "Internal Error"));
    }

    #[test]
    fn test_malformed_json_is_decode_error() {
        let (url, _rx) = serve_once(200, "<html>oops</html>");
        let err = SessionClient::new(&url).proposal_fields("p-1").unwrap_err();
        assert!(matches!(err, SessionError::Decode(_)));
    }

    #[test]
    fn test_unreachable_backend() {
        let client =
            SessionClient::with_timeout("http://127.0.0.1:1", Duration::from_millis(500));
        let err = client.start_session().unwrap_err();
        assert!(matches!(err, SessionError::Unavailable(_)));
    }
}
