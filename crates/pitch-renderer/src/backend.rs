//! Render backend trait for presentational markup.
//!
//! The generic renderer walks the markdown event stream and owns document
//! structure; a backend decides how individual elements look.

use pulldown_cmark::BlockQuoteKind;

/// GFM alert flavour (`> [!NOTE]`, `> [!WARNING]`, ...).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AlertKind {
    Note,
    Tip,
    Important,
    Warning,
    Caution,
}

impl From<BlockQuoteKind> for AlertKind {
    fn from(kind: BlockQuoteKind) -> Self {
        match kind {
            BlockQuoteKind::Note => Self::Note,
            BlockQuoteKind::Tip => Self::Tip,
            BlockQuoteKind::Important => Self::Important,
            BlockQuoteKind::Warning => Self::Warning,
            BlockQuoteKind::Caution => Self::Caution,
        }
    }
}

/// Backend trait for element-level rendering.
///
/// Implementations provide markup for:
/// - Generic code blocks (blocks no [`CodeBlockProcessor`](crate::CodeBlockProcessor) claimed)
/// - Blockquotes and GFM alerts
/// - Images
/// - Table containers
/// - Inline and display math
pub trait RenderBackend {
    /// Render a code block.
    ///
    /// # Arguments
    ///
    /// * `lang` - Optional language identifier (e.g., "rust", "python")
    /// * `content` - The code content
    /// * `out` - Output buffer to write to
    fn code_block(lang: Option<&str>, content: &str, out: &mut String);

    /// Render blockquote start tag.
    fn blockquote_start(out: &mut String);

    /// Render blockquote end tag.
    fn blockquote_end(out: &mut String);

    /// Render the opening of a GFM alert.
    fn alert_start(kind: AlertKind, out: &mut String);

    /// Render the closing of a GFM alert.
    fn alert_end(kind: AlertKind, out: &mut String);

    /// Render an image.
    fn image(src: &str, alt: &str, title: &str, out: &mut String);

    /// Open a table. The renderer writes rows and cells itself.
    fn table_start(out: &mut String) {
        out.push_str("<table>");
    }

    /// Close a table opened with [`table_start`](Self::table_start).
    fn table_end(out: &mut String) {
        out.push_str("</tbody></table>");
    }

    /// Render inline math (`$...$`).
    fn inline_math(tex: &str, out: &mut String);

    /// Render display math (`$$...$$`).
    fn display_math(tex: &str, out: &mut String);

    /// Render a hard break.
    fn hard_break(out: &mut String) {
        out.push_str("<br>");
    }

    /// Render a horizontal rule.
    fn horizontal_rule(out: &mut String) {
        out.push_str("<hr>");
    }

    /// Render a task list marker.
    fn task_list_marker(checked: bool, out: &mut String) {
        if checked {
            out.push_str(r#"<input type="checkbox" checked disabled> "#);
        } else {
            out.push_str(r#"<input type="checkbox" disabled> "#);
        }
    }
}
