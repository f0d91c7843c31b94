//! Client for the proposal generation backend.
//!
//! The backend interviews the user one question at a time, streams each
//! reply, and generates proposal text once enough is known:
//!
//! - [`SessionClient`] speaks the backend's HTTP API (blocking, `ureq`)
//! - [`TokenStream`] decodes a streamed reply chunk by chunk
//! - [`parse_reply`] splits a reply into reasoning and content and detects
//!   the completion signal
//! - [`Conversation`] keeps the message log of one session
//!
//! # Example
//!
//! ```no_run
//! use pitch_session::{Conversation, SessionClient};
//!
//! let client = SessionClient::new("http://127.0.0.1:8000");
//! let mut conversation = Conversation::start(&client)?;
//! let reply = conversation.answer(&client, "Acme Corp", |_| {})?;
//! println!("{}", reply.text);
//! # Ok::<(), pitch_session::SessionError>(())
//! ```

mod client;
mod conversation;
mod error;
mod reply;
mod stream;
mod types;

pub use client::{DEFAULT_BASE_URL, SessionClient};
pub use conversation::{COMPLETION_MESSAGE, Conversation, FAILED_REPLY, Message, Role};
pub use error::SessionError;
pub use reply::{COMPLETION_PHRASES, ParsedReply, is_complete, parse_reply};
pub use stream::TokenStream;
pub use types::{GenerateRequest, ParseOptionError, ProposalFields, SessionStart, Style, Tone};
