//! Asynchronous diagram rendering.

use std::sync::Arc;
use std::time::Instant;

use tracing::debug;

use crate::backend::DiagramBackend;
use crate::slot::{DiagramSlot, RenderTicket};

/// Runs a [`DiagramBackend`] off the async executor.
///
/// Cloning is cheap; clones share the backend.
#[derive(Clone)]
pub struct DiagramRenderer {
    backend: Arc<dyn DiagramBackend>,
}

impl DiagramRenderer {
    /// Create a renderer over `backend`.
    #[must_use]
    pub fn new(backend: impl DiagramBackend + 'static) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    /// Render the source carried by `ticket`.
    ///
    /// Never panics and never returns a Rust error: backend failures and
    /// crashed render tasks both come back as `Err(description)`.
    pub async fn render(&self, ticket: &RenderTicket) -> Result<String, String> {
        let backend = Arc::clone(&self.backend);
        let render_id = ticket.render_id.clone();
        let language = ticket.language;
        let source = ticket.source.clone();
        let started = Instant::now();

        let joined = tokio::task::spawn_blocking(move || {
            backend.render_svg(&render_id, language, &source)
        })
        .await;

        debug!(
            render_id = %ticket.render_id,
            elapsed = ?started.elapsed(),
            "diagram backend returned"
        );

        match joined {
            Ok(Ok(svg)) => Ok(svg),
            Ok(Err(e)) => Err(e.kind.to_string()),
            Err(e) => Err(format!("diagram renderer crashed: {e}")),
        }
    }

    /// Begin, render and complete a single slot.
    ///
    /// Returns whether the result was applied (see [`DiagramSlot::complete`]).
    pub async fn render_slot(&self, slot: &mut DiagramSlot) -> bool {
        let ticket = slot.begin();
        let result = self.render(&ticket).await;
        slot.complete(&ticket, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{DiagramError, DiagramErrorKind};
    use crate::language::DiagramLanguage;
    use crate::slot::SlotState;
    use pretty_assertions::assert_eq;

    /// Renders any source containing "-->" and rejects the rest.
    struct FakeBackend;

    impl DiagramBackend for FakeBackend {
        fn render_svg(
            &self,
            render_id: &str,
            _language: DiagramLanguage,
            source: &str,
        ) -> Result<String, DiagramError> {
            if source.contains("-->") {
                Ok(format!(r#"<svg id="{render_id}"></svg>"#))
            } else {
                Err(DiagramError {
                    render_id: render_id.to_owned(),
                    kind: DiagramErrorKind::Render("Parse error on line 1".to_owned()),
                })
            }
        }
    }

    struct PanickingBackend;

    impl DiagramBackend for PanickingBackend {
        fn render_svg(
            &self,
            _render_id: &str,
            _language: DiagramLanguage,
            _source: &str,
        ) -> Result<String, DiagramError> {
            panic!("backend exploded");
        }
    }

    #[tokio::test]
    async fn test_render_slot_success() {
        let renderer = DiagramRenderer::new(FakeBackend);
        let mut slot = DiagramSlot::new(0, DiagramLanguage::Mermaid, "graph LR\n    A --> B");

        assert!(renderer.render_slot(&mut slot).await);
        let SlotState::Rendered(svg) = slot.state() else {
            panic!("expected rendered state, got {:?}", slot.state());
        };
        assert!(svg.starts_with(r#"<svg id="diagram-"#));
    }

    #[tokio::test]
    async fn test_render_slot_failure_is_contained() {
        let renderer = DiagramRenderer::new(FakeBackend);
        let mut slot = DiagramSlot::new(0, DiagramLanguage::Mermaid, "not a diagram");

        assert!(renderer.render_slot(&mut slot).await);
        assert_eq!(
            slot.state(),
            &SlotState::Failed("Parse error on line 1".to_owned())
        );
        assert!(
            slot.to_html()
                .contains("Diagram Error: Parse error on line 1")
        );
    }

    #[tokio::test]
    async fn test_backend_panic_becomes_failure() {
        let renderer = DiagramRenderer::new(PanickingBackend);
        let mut slot = DiagramSlot::new(0, DiagramLanguage::Mermaid, "graph LR");

        renderer.render_slot(&mut slot).await;
        let SlotState::Failed(message) = slot.state() else {
            panic!("expected failed state, got {:?}", slot.state());
        };
        assert!(message.starts_with("diagram renderer crashed"));
    }

    #[tokio::test]
    async fn test_stale_render_does_not_overwrite() {
        let renderer = DiagramRenderer::new(FakeBackend);
        let mut slot = DiagramSlot::new(0, DiagramLanguage::Mermaid, "graph LR\n    A --> B");

        let stale = slot.begin();
        let stale_result = renderer.render(&stale).await;

        slot.set_source("broken");
        assert!(renderer.render_slot(&mut slot).await);
        assert!(!slot.complete(&stale, stale_result));
        assert_eq!(slot.state().as_str(), "failed");
    }
}
