//! HTML backend for markdown rendering.
//!
//! Produces the HTML5 fragment shown in the proposal preview.

use std::fmt::Write;

use crate::backend::{AlertKind, RenderBackend};
use crate::state::escape_html;

/// HTML render backend.
///
/// Produces semantic HTML5 with:
/// - `<pre><code>` for code blocks
/// - `<div class="alert">` for GFM alerts
/// - Scroll wrappers around tables
/// - `math` spans carrying escaped TeX for client-side typesetting
pub struct HtmlBackend;

impl RenderBackend for HtmlBackend {
    fn code_block(lang: Option<&str>, content: &str, out: &mut String) {
        if let Some(lang) = lang {
            write!(
                out,
                r#"<pre><code class="language-{}">{}</code></pre>"#,
                escape_html(lang),
                escape_html(content)
            )
            .unwrap();
        } else {
            write!(out, "<pre><code>{}</code></pre>", escape_html(content)).unwrap();
        }
    }

    fn blockquote_start(out: &mut String) {
        out.push_str("<blockquote>");
    }

    fn blockquote_end(out: &mut String) {
        out.push_str("</blockquote>");
    }

    fn alert_start(kind: AlertKind, out: &mut String) {
        let (class, title) = alert_label(kind);
        write!(
            out,
            r#"<div class="alert alert-{class}"><p class="alert-title">{title}</p>"#
        )
        .unwrap();
    }

    fn alert_end(_kind: AlertKind, out: &mut String) {
        out.push_str("</div>");
    }

    fn image(src: &str, alt: &str, title: &str, out: &mut String) {
        let title_attr = if title.is_empty() {
            String::new()
        } else {
            format!(r#" title="{}""#, escape_html(title))
        };
        write!(
            out,
            r#"<img src="{}"{title_attr} alt="{}">"#,
            escape_html(src),
            escape_html(alt)
        )
        .unwrap();
    }

    // Wide pricing tables scroll horizontally instead of overflowing the page.
    fn table_start(out: &mut String) {
        out.push_str(r#"<div class="table-wrapper"><table>"#);
    }

    fn table_end(out: &mut String) {
        out.push_str("</tbody></table></div>");
    }

    fn inline_math(tex: &str, out: &mut String) {
        write!(
            out,
            r#"<span class="math math-inline">{}</span>"#,
            escape_html(tex)
        )
        .unwrap();
    }

    fn display_math(tex: &str, out: &mut String) {
        write!(
            out,
            r#"<div class="math math-display">{}</div>"#,
            escape_html(tex)
        )
        .unwrap();
    }
}

fn alert_label(kind: AlertKind) -> (&'static str, &'static str) {
    match kind {
        AlertKind::Note => ("note", "Note"),
        AlertKind::Tip => ("tip", "Tip"),
        AlertKind::Important => ("important", "Important"),
        AlertKind::Warning => ("warning", "Warning"),
        AlertKind::Caution => ("caution", "Caution"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_code_block_with_language() {
        let mut out = String::new();
        HtmlBackend::code_block(Some("json"), r#"{"a": 1}"#, &mut out);
        assert_eq!(
            out,
            r#"<pre><code class="language-json">{&quot;a&quot;: 1}</code></pre>"#
        );
    }

    #[test]
    fn test_code_block_without_language() {
        let mut out = String::new();
        HtmlBackend::code_block(None, "a < b", &mut out);
        assert_eq!(out, "<pre><code>a &lt; b</code></pre>");
    }

    #[test]
    fn test_alert() {
        let mut out = String::new();
        HtmlBackend::alert_start(AlertKind::Warning, &mut out);
        out.push_str("<p>Prices exclude VAT.</p>");
        HtmlBackend::alert_end(AlertKind::Warning, &mut out);
        assert_eq!(
            out,
            r#"<div class="alert alert-warning"><p class="alert-title">Warning</p><p>Prices exclude VAT.</p></div>"#
        );
    }

    #[test]
    fn test_image_with_title() {
        let mut out = String::new();
        HtmlBackend::image("logo.png", "Logo", "Acme \"Inc\"", &mut out);
        assert_eq!(
            out,
            r#"<img src="logo.png" title="Acme &quot;Inc&quot;" alt="Logo">"#
        );
    }

    #[test]
    fn test_table_wrapper() {
        let mut out = String::new();
        HtmlBackend::table_start(&mut out);
        HtmlBackend::table_end(&mut out);
        assert_eq!(
            out,
            r#"<div class="table-wrapper"><table></tbody></table></div>"#
        );
    }

    #[test]
    fn test_math_is_escaped() {
        let mut out = String::new();
        HtmlBackend::inline_math("a<b", &mut out);
        HtmlBackend::display_math(r"\sum_{i} x_i", &mut out);
        assert_eq!(
            out,
            r#"<span class="math math-inline">a&lt;b</span><div class="math math-display">\sum_{i} x_i</div>"#
        );
    }
}
