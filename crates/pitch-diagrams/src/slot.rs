//! Diagram slots and their render state machine.
//!
//! A slot is the place in a rendered document where one diagram lives:
//!
//! ```text
//! idle ──begin()──▶ rendering ──complete(Ok)──▶ rendered
//!   ▲                   │
//!   │                   └──complete(Err)──▶ failed
//!   └── set_source()
//! ```
//!
//! Every `begin()` bumps the slot's generation and hands out a
//! [`RenderTicket`]. A completion is accepted only for the ticket of the
//! latest generation, so a slow render started before an edit can never
//! overwrite the output of a newer one.

use std::fmt::Write;

use pitch_renderer::escape_html;
use tracing::{debug, warn};

use crate::consts::RENDER_FORMAT;
use crate::key::DiagramKey;
use crate::language::DiagramLanguage;

/// Render state of a diagram slot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SlotState {
    /// Not rendered yet.
    Idle,
    /// A render is in flight; previous output has been cleared.
    Rendering,
    /// Rendered SVG markup.
    Rendered(String),
    /// Rendering failed with this description.
    Failed(String),
}

impl SlotState {
    /// Name used in the container's `data-state` attribute.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Rendering => "rendering",
            Self::Rendered(_) => "rendered",
            Self::Failed(_) => "failed",
        }
    }
}

/// Permission to complete one render of a slot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderTicket {
    /// Unique identifier of this render invocation.
    pub render_id: String,
    pub language: DiagramLanguage,
    /// Mermaid source to render.
    pub source: String,
    generation: u64,
}

impl RenderTicket {
    /// Generation of the slot when this ticket was issued.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// One diagram in a rendered document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiagramSlot {
    /// Element id of the slot container (`diagram-slot-{index}`).
    pub id: String,
    /// Index of the fenced block within the document.
    pub index: usize,
    /// Fence language the diagram came from.
    pub language: DiagramLanguage,
    source: String,
    state: SlotState,
    generation: u64,
    epoch: u64,
}

impl DiagramSlot {
    /// Create an idle slot for Mermaid `source`.
    #[must_use]
    pub fn new(index: usize, language: DiagramLanguage, source: impl Into<String>) -> Self {
        Self {
            id: format!("diagram-slot-{index}"),
            index,
            language,
            source: source.into(),
            state: SlotState::Idle,
            generation: 0,
            epoch: 0,
        }
    }

    /// Tag the slot with the render epoch of its document.
    #[must_use]
    pub fn with_epoch(mut self, epoch: u64) -> Self {
        self.epoch = epoch;
        self
    }

    /// Render epoch of the document this slot belongs to.
    #[must_use]
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Mermaid source of the diagram.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    #[must_use]
    pub fn state(&self) -> &SlotState {
        &self.state
    }

    /// Current freshness counter.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Replace the diagram source and return to `idle`.
    ///
    /// Any render still in flight for the old source is invalidated.
    pub fn set_source(&mut self, source: impl Into<String>) {
        self.source = source.into();
        self.generation += 1;
        self.state = SlotState::Idle;
    }

    /// Enter `rendering`, clearing previous output, and issue a ticket.
    pub fn begin(&mut self) -> RenderTicket {
        self.generation += 1;
        self.state = SlotState::Rendering;

        let key = DiagramKey {
            source: &self.source,
            endpoint: self.language.kroki_endpoint(),
            format: RENDER_FORMAT,
        };
        let render_id = key.render_id(self.epoch, self.index, self.generation);
        debug!(slot = %self.id, render_id = %render_id, "diagram rendering");

        RenderTicket {
            render_id,
            language: self.language,
            source: self.source.clone(),
            generation: self.generation,
        }
    }

    /// Apply the outcome of a render.
    ///
    /// Returns `false` and leaves the slot untouched when `ticket` is stale.
    pub fn complete(&mut self, ticket: &RenderTicket, result: Result<String, String>) -> bool {
        if ticket.generation != self.generation || self.state != SlotState::Rendering {
            warn!(
                slot = %self.id,
                render_id = %ticket.render_id,
                "ignoring stale diagram render"
            );
            return false;
        }

        self.state = match result {
            Ok(svg) => {
                debug!(slot = %self.id, render_id = %ticket.render_id, "diagram rendered");
                SlotState::Rendered(svg)
            }
            Err(message) => {
                warn!(slot = %self.id, render_id = %ticket.render_id, %message, "diagram failed");
                SlotState::Failed(message)
            }
        };
        true
    }

    /// HTML for the slot in its current state.
    ///
    /// Idle slots carry the escaped source in a `mermaid` element so a
    /// client-side Mermaid can still pick them up.
    #[must_use]
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        write!(
            out,
            r#"<figure class="diagram" id="{}" data-state="{}">"#,
            self.id,
            self.state.as_str()
        )
        .unwrap();
        match &self.state {
            SlotState::Idle => {
                write!(out, r#"<div class="mermaid">{}</div>"#, escape_html(&self.source)).unwrap();
            }
            SlotState::Rendering => {}
            SlotState::Rendered(svg) => out.push_str(svg),
            SlotState::Failed(message) => {
                write!(
                    out,
                    r#"<div class="diagram-error">Diagram Error: {}</div>"#,
                    escape_html(message)
                )
                .unwrap();
            }
        }
        out.push_str("</figure>");
        out
    }
}
