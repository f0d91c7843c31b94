//! Diagram support for rendered proposals.
//!
//! This crate provides diagram extraction and rendering for markdown documents:
//! - [`translate_graph`] turns the `graph` shorthand into a Mermaid flowchart
//! - [`DiagramProcessor`] implements `CodeBlockProcessor`, replacing
//!   `mermaid` and `graph` fences with slot markers
//! - [`DiagramSlot`] tracks one diagram through `idle → rendering →
//!   rendered | failed`, discarding stale completions
//! - [`DiagramRenderer`] renders slots asynchronously through a
//!   [`DiagramBackend`] such as [`KrokiBackend`]
//! - [`DocumentRenderer`] runs the whole pipeline and returns a [`RenderTree`]
//!
//! # Example
//!
//! ```no_run
//! use pitch_diagrams::{DiagramRenderer, DocumentRenderer, KrokiBackend};
//!
//! # async fn run() {
//! let mut tree = DocumentRenderer::new().render("```graph\nClient -> API\n```\n");
//! let renderer = DiagramRenderer::new(KrokiBackend::new("https://kroki.io"));
//! tree.render_diagrams(&renderer).await;
//! let html = tree.to_html();
//! # }
//! ```

mod backend;
mod consts;
mod document;
mod graph;
mod key;
mod kroki;
mod language;
mod processor;
mod render;
mod slot;

pub use backend::{DiagramBackend, DiagramError, DiagramErrorKind};
pub use consts::DEFAULT_TIMEOUT;
pub use document::{DocumentRenderer, RenderTree};
pub use graph::{GRAPH_HEADER, GraphStatement, translate as translate_graph};
pub use key::DiagramKey;
pub use kroki::{KrokiBackend, create_agent};
pub use language::DiagramLanguage;
pub use processor::{DiagramProcessor, slot_marker};
pub use render::DiagramRenderer;
pub use slot::{DiagramSlot, RenderTicket, SlotState};
