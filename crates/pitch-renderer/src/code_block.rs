//! Fenced code block interception.
//!
//! Some fence languages are not code at all: a `mermaid` block is a diagram,
//! a `graph` block is a diagram in a smaller notation. Processors registered
//! on the renderer see every fenced block before the backend does and may
//! claim it by language.
//!
//! # Example
//!
//! ```
//! use std::collections::HashMap;
//! use pitch_renderer::{CodeBlockProcessor, ExtractedCodeBlock, ProcessResult};
//!
//! struct ChartProcessor {
//!     extracted: Vec<ExtractedCodeBlock>,
//! }
//!
//! impl CodeBlockProcessor for ChartProcessor {
//!     fn process(
//!         &mut self,
//!         language: &str,
//!         attrs: &HashMap<String, String>,
//!         source: &str,
//!         index: usize,
//!     ) -> ProcessResult {
//!         if language != "chart" {
//!             return ProcessResult::PassThrough;
//!         }
//!         self.extracted.push(ExtractedCodeBlock {
//!             index,
//!             language: language.to_owned(),
//!             source: source.to_owned(),
//!             attrs: attrs.clone(),
//!         });
//!         ProcessResult::Placeholder(format!("{{{{CHART_{index}}}}}"))
//!     }
//!
//!     fn extracted(&self) -> &[ExtractedCodeBlock] {
//!         &self.extracted
//!     }
//! }
//! ```

use std::collections::HashMap;

/// Result of processing a code block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProcessResult {
    /// Replace the block with a placeholder the caller resolves later.
    Placeholder(String),

    /// Not handled here; render as a regular code block.
    PassThrough,
}

/// A code block claimed by a processor, kept for deferred processing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExtractedCodeBlock {
    /// Zero-based index of this code block in the document.
    pub index: usize,
    /// Language identifier from the fence.
    pub language: String,
    /// Raw source content of the code block.
    pub source: String,
    /// Attributes parsed from the fence (`theme=dark` → `{"theme": "dark"}`).
    pub attrs: HashMap<String, String>,
}

/// Trait for processing special code blocks.
///
/// Processors are consulted in registration order; the first one that does
/// not return [`ProcessResult::PassThrough`] wins.
pub trait CodeBlockProcessor {
    /// Process a code block.
    ///
    /// # Arguments
    ///
    /// * `language` - Language identifier from the fence info string
    /// * `attrs` - Attributes parsed from the fence (`key=value` pairs)
    /// * `source` - Raw content of the code block
    /// * `index` - Zero-based index for placeholder generation
    fn process(
        &mut self,
        language: &str,
        attrs: &HashMap<String, String>,
        source: &str,
        index: usize,
    ) -> ProcessResult;

    /// Blocks processed with [`ProcessResult::Placeholder`].
    fn extracted(&self) -> &[ExtractedCodeBlock] {
        &[]
    }

    /// Warnings generated during processing.
    fn warnings(&self) -> &[String] {
        &[]
    }
}

/// Parse a fence info string (`language [key=value ...]`).
#[must_use]
pub(crate) fn parse_fence_info(info: &str) -> (String, HashMap<String, String>) {
    let mut parts = info.split_whitespace();
    // `{.mermaid}`-style info strings are common in generated text.
    let language = parts
        .next()
        .unwrap_or("")
        .trim_start_matches('{')
        .trim_start_matches('.')
        .trim_end_matches('}')
        .to_ascii_lowercase();

    let attrs = parts
        .filter_map(|part| part.split_once('='))
        .map(|(key, value)| {
            let value = value.trim_matches('"').trim_matches('\'');
            (key.to_owned(), value.to_owned())
        })
        .collect();

    (language, attrs)
}
