//! Diagram backend abstraction.

use crate::language::DiagramLanguage;

/// Single diagram rendering error.
#[derive(Debug, thiserror::Error)]
#[error("diagram {render_id}: {kind}")]
pub struct DiagramError {
    pub render_id: String,
    pub kind: DiagramErrorKind,
}

/// Kind of diagram rendering error.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum DiagramErrorKind {
    #[error("HTTP error: {0}")]
    Http(String),
    #[error("I/O error: {0}")]
    Io(String),
    /// The backend answered but the diagram source was rejected.
    #[error("{0}")]
    Render(String),
}

/// Something that can turn Mermaid source into SVG.
///
/// Calls are blocking; [`DiagramRenderer`](crate::DiagramRenderer) runs them
/// on tokio's blocking pool.
pub trait DiagramBackend: Send + Sync {
    /// Render `source` to an SVG document.
    ///
    /// `render_id` is unique per invocation and may be used as the SVG's
    /// element id.
    fn render_svg(
        &self,
        render_id: &str,
        language: DiagramLanguage,
        source: &str,
    ) -> Result<String, DiagramError>;
}
