//! Parsing of assistant replies.
//!
//! A reply may open with a reasoning section:
//!
//! ```text
//! [REASONING] The client mentioned a fixed launch date.
//!
//! What is your budget for the first phase?
//! ```
//!
//! Everything after the first blank-line gap is the content shown as the
//! next question.

use std::sync::LazyLock;

use regex::Regex;

/// Marker, optional spaces or tabs, lazy reasoning body, a gap of two or more
/// newlines, then the content.
static REASONING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[REASONING\][ \t]*(?s:(.*?))\n{2,}(?s:(.*))").unwrap());

/// Phrases that signal the interview is over (matched case-insensitively).
pub const COMPLETION_PHRASES: [&str; 2] = ["all done", "proposal generation complete"];

/// A reply split into its parts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedReply {
    /// Reasoning section, when the reply carried one.
    pub reasoning: Option<String>,
    /// Text shown to the user, usually the next question.
    pub content: String,
    /// The content contains one of [`COMPLETION_PHRASES`].
    pub complete: bool,
}

/// Split a complete reply into reasoning and content and detect completion.
///
/// Without a reasoning marker (or with a marker but no blank-line gap) the
/// whole reply is the content.
#[must_use]
pub fn parse_reply(reply: &str) -> ParsedReply {
    let (reasoning, content) = match REASONING_RE.captures(reply) {
        Some(caps) => (
            Some(caps[1].trim().to_owned()).filter(|r| !r.is_empty()),
            caps[2].trim().to_owned(),
        ),
        None => (None, reply.trim().to_owned()),
    };
    let complete = is_complete(&content);
    ParsedReply {
        reasoning,
        content,
        complete,
    }
}

/// Whether `text` contains a completion phrase, ignoring case.
#[must_use]
pub fn is_complete(text: &str) -> bool {
    let lower = text.to_lowercase();
    COMPLETION_PHRASES
        .iter()
        .any(|phrase| lower.contains(phrase))
}
