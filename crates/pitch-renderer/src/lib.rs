//! Markdown preprocessing and trait-based HTML rendering.
//!
//! AI-generated proposals rarely arrive as clean markdown. This crate runs
//! them through three stages:
//!
//! 1. [`split_frontmatter`] removes a leading `---` metadata block.
//! 2. [`normalize_tables`] rewrites loosely delimited pipe tables into
//!    canonical GFM table syntax.
//! 3. [`MarkdownRenderer`] turns the result into HTML through a
//!    [`RenderBackend`], with [`CodeBlockProcessor`]s intercepting fenced
//!    code blocks by language.
//!
//! [`preprocess`] runs the first two stages in one call.
//!
//! # Example
//!
//! ```
//! use pitch_renderer::{HtmlBackend, MarkdownRenderer, preprocess};
//!
//! let raw = "---\ntitle: Offer\n---\n|Item|Cost|\n|-----|--|\n|Setup|100|\n";
//! let prepared = preprocess(raw);
//! let result = MarkdownRenderer::<HtmlBackend>::new().render_markdown(&prepared.markdown);
//! assert!(result.html.contains("<table>"));
//! ```

mod autolink;
mod backend;
mod code_block;
mod fence;
mod frontmatter;
mod html;
mod preprocess;
mod renderer;
mod state;
mod table;

pub use autolink::linkify;
pub use backend::{AlertKind, RenderBackend};
pub use code_block::{CodeBlockProcessor, ExtractedCodeBlock, ProcessResult};
pub use frontmatter::{DocumentMeta, Frontmatter, split_frontmatter, strip_frontmatter};
pub use html::HtmlBackend;
pub use preprocess::{PreparedDocument, preprocess};
pub use renderer::{MarkdownRenderer, RenderResult};
pub use state::{TocEntry, escape_html, slugify};
pub use table::normalize_tables;
