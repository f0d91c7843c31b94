//! The full document pipeline: preprocess, render, then fill diagram slots.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use pitch_renderer::{DocumentMeta, HtmlBackend, MarkdownRenderer, TocEntry, preprocess};
use tokio::task::JoinSet;
use tracing::debug;

use crate::language::DiagramLanguage;
use crate::processor::{DiagramProcessor, slot_marker};
use crate::render::DiagramRenderer;
use crate::slot::{DiagramSlot, RenderTicket};

/// A rendered document with its diagram slots.
///
/// `html` holds one slot marker per diagram; [`to_html`](Self::to_html)
/// substitutes each marker with the slot's current markup.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderTree {
    /// HTML fragment with diagram slot markers.
    pub html: String,
    /// Frontmatter `title`, else the first H1 (when extraction is enabled).
    pub title: Option<String>,
    pub toc: Vec<TocEntry>,
    pub meta: Option<DocumentMeta>,
    /// Diagram slots in document order.
    pub diagrams: Vec<DiagramSlot>,
    pub warnings: Vec<String>,
}

impl RenderTree {
    /// HTML with every diagram slot in its current state.
    #[must_use]
    pub fn to_html(&self) -> String {
        self.diagrams.iter().fold(self.html.clone(), |html, slot| {
            html.replace(&slot_marker(slot.index), &slot.to_html())
        })
    }

    /// Render every diagram slot concurrently.
    ///
    /// Failures stay inside their slots; this never fails as a whole.
    pub async fn render_diagrams(&mut self, renderer: &DiagramRenderer) {
        self.render_slots_with(|ticket| {
            let renderer = renderer.clone();
            async move { renderer.render(&ticket).await }
        })
        .await;
    }

    /// Spawn `render` for every slot and apply the results.
    ///
    /// A task that fails to join (panicked or cancelled) fails its slot.
    async fn render_slots_with<F, Fut>(&mut self, render: F)
    where
        F: Fn(RenderTicket) -> Fut,
        Fut: Future<Output = Result<String, String>> + Send + 'static,
    {
        if self.diagrams.is_empty() {
            return;
        }
        let started = Instant::now();

        let mut tasks = JoinSet::new();
        let mut pending = HashMap::new();
        for (position, slot) in self.diagrams.iter_mut().enumerate() {
            let ticket = slot.begin();
            let handle = tasks.spawn(render(ticket.clone()));
            pending.insert(handle.id(), (position, ticket));
        }

        while let Some(joined) = tasks.join_next_with_id().await {
            let (id, result) = match joined {
                Ok((id, result)) => (id, result),
                Err(e) => (e.id(), Err(format!("diagram render task failed: {e}"))),
            };
            let Some((position, ticket)) = pending.remove(&id) else {
                continue;
            };
            if let Some(slot) = self.diagrams.get_mut(position) {
                slot.complete(&ticket, result);
            }
        }

        debug!(
            count = self.diagrams.len(),
            elapsed = ?started.elapsed(),
            "diagrams rendered"
        );
    }
}

/// Source of epochs for [`DocumentRenderer::render`].
static NEXT_EPOCH: AtomicU64 = AtomicU64::new(1);

/// Turns raw AI output into a [`RenderTree`].
///
/// Runs frontmatter stripping and table normalization, then the markdown
/// renderer with a [`DiagramProcessor`] intercepting diagram fences.
#[derive(Clone, Copy, Debug)]
pub struct DocumentRenderer {
    gfm: bool,
    math: bool,
    extract_title: bool,
}

impl DocumentRenderer {
    /// Create a renderer with GFM, math and title extraction enabled.
    #[must_use]
    pub fn new() -> Self {
        Self {
            gfm: true,
            math: true,
            extract_title: true,
        }
    }

    #[must_use]
    pub fn with_gfm(mut self, enabled: bool) -> Self {
        self.gfm = enabled;
        self
    }

    #[must_use]
    pub fn with_math(mut self, enabled: bool) -> Self {
        self.math = enabled;
        self
    }

    #[must_use]
    pub fn with_title_extraction(mut self, enabled: bool) -> Self {
        self.extract_title = enabled;
        self
    }

    /// Render `raw` into a fresh tree. Diagram slots start out idle.
    ///
    /// Each call takes a new process-wide epoch, so render identifiers of
    /// two trees never collide even for identical input.
    #[must_use]
    pub fn render(&self, raw: &str) -> RenderTree {
        self.render_with_epoch(raw, NEXT_EPOCH.fetch_add(1, Ordering::Relaxed))
    }

    /// Render `raw` with a caller-supplied epoch.
    ///
    /// The epoch becomes part of every diagram render identifier; callers
    /// must not reuse one for different renders.
    #[must_use]
    pub fn render_with_epoch(&self, raw: &str, epoch: u64) -> RenderTree {
        let started = Instant::now();
        let prepared = preprocess(raw);

        let mut renderer = MarkdownRenderer::<HtmlBackend>::new()
            .with_gfm(self.gfm)
            .with_math(self.math)
            .with_processor(DiagramProcessor::new());
        if self.extract_title {
            renderer = renderer.with_title_extraction();
        }
        let result = renderer.render_markdown(&prepared.markdown);

        let diagrams: Vec<_> = renderer
            .extracted_code_blocks()
            .filter_map(|block| {
                let language = DiagramLanguage::parse(&block.language)?;
                Some(DiagramSlot::new(block.index, language, block.source).with_epoch(epoch))
            })
            .collect();

        let mut warnings = prepared.warnings;
        warnings.extend(result.warnings);

        let meta_title = prepared.meta.as_ref().and_then(|m| m.title.clone());
        let title = if self.extract_title {
            meta_title.or(result.title)
        } else {
            meta_title
        };

        debug!(
            epoch,
            bytes = raw.len(),
            diagrams = diagrams.len(),
            elapsed = ?started.elapsed(),
            "document rendered"
        );

        RenderTree {
            html: result.html,
            title,
            toc: result.toc,
            meta: prepared.meta,
            diagrams,
            warnings,
        }
    }
}

impl Default for DocumentRenderer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{DiagramBackend, DiagramError, DiagramErrorKind};
    use crate::slot::SlotState;
    use pretty_assertions::assert_eq;

    struct FakeBackend;

    impl DiagramBackend for FakeBackend {
        fn render_svg(
            &self,
            render_id: &str,
            _language: DiagramLanguage,
            source: &str,
        ) -> Result<String, DiagramError> {
            if source.starts_with("graph") {
                Ok(format!(r#"<svg id="{render_id}"/>"#))
            } else {
                Err(DiagramError {
                    render_id: render_id.to_owned(),
                    kind: DiagramErrorKind::Render("No diagram type detected".to_owned()),
                })
            }
        }
    }

    const PROPOSAL: &str = "---
title: Data Platform Proposal
client: Acme
---
# Overview

|Phase|Weeks|
|---|---|
|Discovery|2|

```graph
Discovery -> Build
Build = Build & launch
```

```mermaid
pie title Budget
```

```sql
select 1;
```
";

    #[test]
    fn test_render_pipeline() {
        let tree = DocumentRenderer::new().render(PROPOSAL);

        assert_eq!(tree.title.as_deref(), Some("Data Platform Proposal"));
        assert!(tree.html.contains(r#"<h1 id="overview">Overview</h1>"#));
        assert!(tree.html.contains(r#"<div class="table-wrapper"><table>"#));
        assert!(tree.html.contains("<td>Discovery</td>"));
        assert!(tree.html.contains(r#"<code class="language-sql">"#));
        assert!(!tree.html.contains("title: Data Platform"));

        assert_eq!(tree.diagrams.len(), 2);
        assert_eq!(tree.diagrams[0].language, DiagramLanguage::Graph);
        assert_eq!(
            tree.diagrams[0].source(),
            "graph LR\n    Discovery --> Build\n    Build[\"Build & launch\"]\n"
        );
        assert_eq!(tree.diagrams[1].language, DiagramLanguage::Mermaid);
        assert_eq!(tree.diagrams[1].index, 1);
        assert!(tree.html.contains("<!--pitch-diagram:0-->"));
        assert!(tree.html.contains("<!--pitch-diagram:1-->"));

        let meta = tree.meta.as_ref().unwrap();
        assert_eq!(meta.extra.get("client").and_then(|v| v.as_str()), Some("Acme"));
    }

    #[test]
    fn test_to_html_shows_idle_slots() {
        let tree = DocumentRenderer::new().render("```mermaid\ngraph LR\nA-->B\n```\n");
        let html = tree.to_html();

        assert!(!html.contains("<!--pitch-diagram"));
        assert!(html.contains(r#"data-state="idle""#));
        assert!(html.contains(r#"<div class="mermaid">graph LR"#));
    }

    #[test]
    fn test_first_heading_is_title_without_frontmatter() {
        let tree = DocumentRenderer::new().render("# Mobile App Proposal\n\nBody");
        assert_eq!(tree.title.as_deref(), Some("Mobile App Proposal"));

        let tree = DocumentRenderer::new()
            .with_title_extraction(false)
            .render("# Mobile App Proposal\n\nBody");
        assert_eq!(tree.title, None);
    }

    #[test]
    fn test_injected_marker_is_escaped() {
        let tree = DocumentRenderer::new().render("<!--pitch-diagram:0-->\n\n```mermaid\ngraph LR\n```\n");
        let html = tree.to_html();
        assert!(html.contains("&lt;!--pitch-diagram:0--&gt;"));
        assert_eq!(html.matches("<figure").count(), 1);
    }

    #[test]
    fn test_warnings_are_collected() {
        let tree = DocumentRenderer::new().render("---\n: [\n---\n```mermaid theme=dark\ngraph LR\n```\n");
        assert_eq!(tree.warnings.len(), 2);
        assert!(tree.warnings[0].starts_with("frontmatter ignored"));
        assert!(tree.warnings[1].contains("`theme`"));
    }

    #[tokio::test]
    async fn test_render_diagrams() {
        let mut tree = DocumentRenderer::new().render(PROPOSAL);
        let renderer = DiagramRenderer::new(FakeBackend);
        tree.render_diagrams(&renderer).await;

        assert!(matches!(tree.diagrams[0].state(), SlotState::Rendered(_)));
        assert_eq!(
            tree.diagrams[1].state(),
            &SlotState::Failed("No diagram type detected".to_owned())
        );

        let html = tree.to_html();
        assert!(html.contains(r#"<svg id="diagram-"#));
        assert!(html.contains("Diagram Error: No diagram type detected"));
        assert!(html.contains("<h1"));
    }

    #[test]
    fn test_rendering_twice_gives_distinct_render_ids() {
        let renderer = DocumentRenderer::new();
        let mut first = renderer.render("```graph\nA -> B\n```\n");
        let mut second = renderer.render("```graph\nA -> B\n```\n");

        let a = first.diagrams[0].begin();
        let b = second.diagrams[0].begin();
        assert_ne!(a.render_id, b.render_id);
    }

    #[test]
    fn test_caller_supplied_epoch() {
        let mut tree = DocumentRenderer::new().render_with_epoch("```mermaid\ngraph LR\n```\n", 42);
        assert_eq!(tree.diagrams[0].epoch(), 42);
        assert!(tree.diagrams[0].begin().render_id.ends_with("-42-0-1"));
    }

    #[tokio::test]
    async fn test_aborted_task_fails_its_slot() {
        let mut tree = DocumentRenderer::new().render("```graph\nA -> B\n```\n");
        tree.render_slots_with(|ticket: RenderTicket| async move {
            assert!(ticket.render_id.is_empty(), "render task aborted");
            Ok(String::new())
        })
        .await;

        let SlotState::Failed(message) = tree.diagrams[0].state() else {
            panic!("expected failed slot, got {:?}", tree.diagrams[0].state());
        };
        assert!(message.starts_with("diagram render task failed"));
        assert!(tree.to_html().contains("Diagram Error: diagram render task failed"));
    }

    #[tokio::test]
    async fn test_rerender_restarts_slots() {
        let mut tree = DocumentRenderer::new().render("```graph\nA -> B\n```\n");
        let renderer = DiagramRenderer::new(FakeBackend);

        tree.render_diagrams(&renderer).await;
        tree.render_diagrams(&renderer).await;
        assert_eq!(tree.diagrams[0].generation(), 2);
        assert!(matches!(tree.diagrams[0].state(), SlotState::Rendered(_)));
    }
}
