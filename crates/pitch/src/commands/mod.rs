//! CLI command implementations.

pub(crate) mod chat;
pub(crate) mod proposal;
pub(crate) mod render;

use std::fmt::Write;
use std::path::{Path, PathBuf};

use clap::Args;
use pitch_config::{CliSettings, Config};
use pitch_diagrams::{DiagramRenderer, DocumentRenderer, KrokiBackend, RenderTree, SlotState};
use pitch_renderer::escape_html;
use tracing::info;

use crate::error::CliError;
use crate::output::Output;

pub(crate) use chat::ChatArgs;
pub(crate) use proposal::ProposalArgs;
pub(crate) use render::RenderArgs;

/// Flags accepted by every command.
#[derive(Args)]
pub(crate) struct GlobalArgs {
    /// Path to configuration file (default: auto-discover pitch.toml).
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Proposal backend URL (overrides config).
    #[arg(long, global = true, env = "PITCH_API_URL")]
    api_url: Option<String>,

    /// Kroki server URL for diagram rendering (overrides config).
    #[arg(long, global = true, env = "PITCH_KROKI_URL")]
    kroki_url: Option<String>,

    /// Enable verbose output (request and render timing logs).
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl GlobalArgs {
    /// Load `pitch.toml` with these flags applied on top.
    pub(crate) fn load_config(&self) -> Result<Config, CliError> {
        let cli_settings = CliSettings {
            api_url: self.api_url.clone(),
            kroki_url: self.kroki_url.clone(),
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        match &config.config_path {
            Some(path) => info!("Using config {}", path.display()),
            None => info!("No pitch.toml found, using defaults"),
        }
        Ok(config)
    }
}

/// Run the document pipeline and return a standalone HTML page.
///
/// Diagrams are rendered only when a Kroki URL is configured; otherwise
/// they stay as placeholders holding their Mermaid source.
pub(crate) async fn render_document(markdown: &str, config: &Config, output: &Output) -> String {
    let mut tree = DocumentRenderer::new()
        .with_gfm(config.render.gfm)
        .with_math(config.render.math)
        .with_title_extraction(config.render.extract_title)
        .render(markdown);

    for warning in &tree.warnings {
        output.warning(&format!("Warning: {warning}"));
    }

    if !tree.diagrams.is_empty() {
        if let Some(kroki_url) = &config.diagrams.kroki_url {
            output.info(&format!(
                "Rendering {} diagram(s) via {kroki_url}...",
                tree.diagrams.len()
            ));
            let backend = KrokiBackend::with_timeout(kroki_url, config.diagrams.timeout());
            tree.render_diagrams(&DiagramRenderer::new(backend)).await;
            report_failed_diagrams(&tree, output);
        } else {
            output.info("Diagram rendering: disabled (no kroki_url in config)");
        }
    }

    standalone_page(&tree)
}

fn report_failed_diagrams(tree: &RenderTree, output: &Output) {
    for slot in &tree.diagrams {
        if let SlotState::Failed(message) = slot.state() {
            output.warning(&format!("Diagram {} failed: {message}", slot.index + 1));
        }
    }
}

/// Wrap a rendered tree in an HTML page with a table of contents.
fn standalone_page(tree: &RenderTree) -> String {
    let title = escape_html(tree.title.as_deref().unwrap_or("Proposal"));
    let mut page = String::new();

    page.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    writeln!(page, "<title>{title}</title>").unwrap();
    if let Some(description) = tree.meta.as_ref().and_then(|m| m.description.as_deref()) {
        writeln!(
            page,
            "<meta name=\"description\" content=\"{}\">",
            escape_html(description)
        )
        .unwrap();
    }
    page.push_str("</head>\n<body>\n");

    if !tree.toc.is_empty() {
        page.push_str("<nav class=\"toc\">\n<ul>\n");
        for entry in &tree.toc {
            writeln!(
                page,
                "<li class=\"toc-level-{}\"><a href=\"#{}\">{}</a></li>",
                entry.level,
                entry.id,
                escape_html(&entry.title)
            )
            .unwrap();
        }
        page.push_str("</ul>\n</nav>\n");
    }

    writeln!(page, "<article>\n{}\n</article>", tree.to_html()).unwrap();
    page.push_str("</body>\n</html>\n");
    page
}

/// Write `page` to `path`, or to stdout when no path is given.
pub(crate) fn write_page(page: &str, path: Option<&Path>, output: &Output) -> Result<(), CliError> {
    match path {
        Some(path) => {
            std::fs::write(path, page)?;
            output.success(&format!("Wrote {}", path.display()));
        }
        None => output.document(page)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const DOC: &str = "---\ntitle: Acme & Co\ndescription: Data platform\n---\n\
# Acme\n\n## Scope\n\n```graph\nA -> B\n```\n";

    #[test]
    fn test_standalone_page_head() {
        let tree = DocumentRenderer::new().render(DOC);
        let page = standalone_page(&tree);

        assert!(page.starts_with("<!DOCTYPE html>\n<html>\n<head>\n"));
        assert!(page.contains("<title>Acme &amp; Co</title>"));
        assert!(page.contains("<meta name=\"description\" content=\"Data platform\">"));
        assert!(page.contains("<li class=\"toc-level-2\"><a href=\"#scope\">Scope</a></li>"));
        assert!(page.ends_with("</body>\n</html>\n"));
    }

    #[test]
    fn test_standalone_page_without_toc() {
        let tree = DocumentRenderer::new().render("Just a paragraph.");
        let page = standalone_page(&tree);

        assert!(page.contains("<title>Proposal</title>"));
        assert!(!page.contains("<nav"));
        assert!(page.contains("<article>\n<p>Just a paragraph.</p>\n</article>"));
    }

    #[tokio::test]
    async fn test_render_document_without_kroki_keeps_placeholders() {
        let config = Config::default();
        let page = render_document(DOC, &config, &Output::new()).await;

        assert!(page.contains("diagram-slot-0"));
        assert!(page.contains("graph LR"));
        assert!(!page.contains("<!--pitch-diagram:"));
    }

    #[test]
    fn test_write_page_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.html");

        write_page("<p>hi</p>", Some(&path), &Output::new()).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "<p>hi</p>");
    }
}
