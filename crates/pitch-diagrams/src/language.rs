//! Fence languages rendered as diagrams.

use std::borrow::Cow;

use crate::graph;

/// Supported diagram languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagramLanguage {
    /// Mermaid source, rendered as is.
    Mermaid,
    /// The `graph` shorthand, translated to a Mermaid flowchart first.
    Graph,
}

impl DiagramLanguage {
    /// Parse language from code fence info string.
    ///
    /// Accepts `kroki-mermaid` for compatibility with Kroki-style fences.
    /// Returns None if the language is not a supported diagram type.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.strip_prefix("kroki-").unwrap_or(s) {
            "mermaid" => Some(Self::Mermaid),
            "graph" => Some(Self::Graph),
            _ => None,
        }
    }

    /// Kroki endpoint name; both languages render through Mermaid.
    #[must_use]
    pub fn kroki_endpoint(self) -> &'static str {
        match self {
            Self::Mermaid | Self::Graph => "mermaid",
        }
    }

    /// Fence name of this language.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mermaid => "mermaid",
            Self::Graph => "graph",
        }
    }

    /// Turn fenced block content into Mermaid source.
    #[must_use]
    pub fn to_mermaid(self, source: &str) -> Cow<'_, str> {
        match self {
            Self::Mermaid => Cow::Borrowed(source.trim()),
            Self::Graph => Cow::Owned(graph::translate(source)),
        }
    }
}
