//! Code block processor for diagram fences.

use std::collections::HashMap;

use pitch_renderer::{CodeBlockProcessor, ExtractedCodeBlock, ProcessResult};

use crate::language::DiagramLanguage;

/// Marker left in the HTML where slot `index` goes.
///
/// Raw HTML from the document is always escaped by the renderer, so a
/// comment in the output can only have come from this processor.
#[must_use]
pub fn slot_marker(index: usize) -> String {
    format!("<!--pitch-diagram:{index}-->")
}

/// Claims `mermaid` and `graph` fences.
///
/// Each claimed block is replaced by a [`slot_marker`] and recorded with its
/// Mermaid source (`graph` blocks are translated on the way in). Blocks are
/// rendered later, asynchronously, by the document's diagram slots.
#[derive(Default)]
pub struct DiagramProcessor {
    extracted: Vec<ExtractedCodeBlock>,
    warnings: Vec<String>,
}

impl DiagramProcessor {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl CodeBlockProcessor for DiagramProcessor {
    fn process(
        &mut self,
        language: &str,
        attrs: &HashMap<String, String>,
        source: &str,
        index: usize,
    ) -> ProcessResult {
        let Some(diagram_language) = DiagramLanguage::parse(language) else {
            return ProcessResult::PassThrough;
        };

        let mut keys: Vec<_> = attrs.keys().collect();
        keys.sort();
        for key in keys {
            self.warnings.push(format!(
                "diagram {index}: ignoring unsupported fence attribute `{key}`"
            ));
        }

        self.extracted.push(ExtractedCodeBlock {
            index,
            language: diagram_language.as_str().to_owned(),
            source: diagram_language.to_mermaid(source).into_owned(),
            attrs: attrs.clone(),
        });

        ProcessResult::Placeholder(slot_marker(index))
    }

    fn extracted(&self) -> &[ExtractedCodeBlock] {
        &self.extracted
    }

    fn warnings(&self) -> &[String] {
        &self.warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_mermaid_block_is_claimed() {
        let mut processor = DiagramProcessor::new();
        let result = processor.process("mermaid", &HashMap::new(), "graph TD\n  A-->B\n", 2);

        assert_eq!(result, ProcessResult::Placeholder("<!--pitch-diagram:2-->".to_owned()));
        assert_eq!(processor.extracted().len(), 1);
        assert_eq!(processor.extracted()[0].source, "graph TD\n  A-->B");
        assert_eq!(processor.extracted()[0].language, "mermaid");
    }

    #[test]
    fn test_graph_block_is_translated() {
        let mut processor = DiagramProcessor::new();
        processor.process("graph", &HashMap::new(), "A -> B\nB = Done\n", 0);

        assert_eq!(
            processor.extracted()[0].source,
            "graph LR\n    A --> B\n    B[\"Done\"]\n"
        );
        assert_eq!(processor.extracted()[0].language, "graph");
    }

    #[test]
    fn test_other_languages_pass_through() {
        let mut processor = DiagramProcessor::new();
        assert_eq!(
            processor.process("rust", &HashMap::new(), "fn main() {}", 0),
            ProcessResult::PassThrough
        );
        assert!(processor.extracted().is_empty());
    }

    #[test]
    fn test_attributes_produce_warnings() {
        let mut processor = DiagramProcessor::new();
        let attrs = HashMap::from([
            ("theme".to_owned(), "dark".to_owned()),
            ("format".to_owned(), "png".to_owned()),
        ]);
        processor.process("mermaid", &attrs, "graph LR", 1);

        assert_eq!(
            processor.warnings(),
            [
                "diagram 1: ignoring unsupported fence attribute `format`",
                "diagram 1: ignoring unsupported fence attribute `theme`",
            ]
        );
    }
}
