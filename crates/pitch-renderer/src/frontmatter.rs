//! Leading metadata block detection.
//!
//! A frontmatter block starts at the very first byte with a `---` line
//! (optionally tagged, e.g. `---yaml`) and ends at the next line that is
//! exactly `---`. Anything that does not match this shape is body text.

use std::collections::BTreeMap;

use serde::Deserialize;

/// Opening and closing marker of a frontmatter block.
const MARKER: &str = "---";

/// A document split into its optional frontmatter and its body.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Frontmatter<'a> {
    /// Text between the markers, without the marker lines.
    pub raw: Option<&'a str>,
    /// Everything after the closing marker line.
    pub body: &'a str,
}

impl Frontmatter<'_> {
    /// Parse the frontmatter block as YAML metadata.
    ///
    /// Returns `Ok(None)` when the document has no frontmatter or the block
    /// is empty.
    ///
    /// # Errors
    ///
    /// Returns the YAML error when the block is present but malformed.
    pub fn metadata(&self) -> Result<Option<DocumentMeta>, serde_yaml::Error> {
        match self.raw {
            Some(raw) if !raw.trim().is_empty() => serde_yaml::from_str(raw).map(Some),
            _ => Ok(None),
        }
    }
}

/// Metadata declared in a document's frontmatter.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct DocumentMeta {
    /// Document title.
    pub title: Option<String>,
    /// Short description.
    pub description: Option<String>,
    /// Any other keys, kept verbatim.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_yaml::Value>,
}

/// Split a document into frontmatter and body.
///
/// Never fails: a missing or unterminated block yields the whole input as body.
#[must_use]
pub fn split_frontmatter(input: &str) -> Frontmatter<'_> {
    let unchanged = Frontmatter {
        raw: None,
        body: input,
    };

    let Some(rest) = input.strip_prefix(MARKER) else {
        return unchanged;
    };

    // The opening line may carry a language tag (`---yaml`) but nothing else.
    let Some(newline) = rest.find('\n') else {
        return unchanged;
    };
    let tag = rest[..newline].trim_end_matches('\r').trim_end();
    if tag.starts_with('-') || tag.chars().any(char::is_whitespace) {
        return unchanged;
    }

    let block_start = MARKER.len() + newline + 1;
    let mut offset = block_start;
    for line in input[block_start..].split_inclusive('\n') {
        let content = line.trim_end_matches('\n').trim_end_matches('\r');
        if content.trim_end() == MARKER {
            let raw = &input[block_start..offset];
            let body = &input[offset + line.len()..];
            return Frontmatter {
                raw: Some(raw),
                body,
            };
        }
        offset += line.len();
    }

    unchanged
}

/// Remove a leading frontmatter block, returning only the body.
#[must_use]
pub fn strip_frontmatter(input: &str) -> &str {
    split_frontmatter(input).body
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_strip_frontmatter_basic() {
        let input = "---\ntitle: Proposal\n---\n# Heading\n\nBody";
        assert_eq!(strip_frontmatter(input), "# Heading\n\nBody");
    }

    #[test]
    fn test_no_marker_is_unchanged() {
        let input = "# Heading\n\n---\nnot: frontmatter\n---\n";
        assert_eq!(strip_frontmatter(input), input);
    }

    #[test]
    fn test_unterminated_block_is_unchanged() {
        let input = "---\ntitle: Proposal\n# Heading";
        let split = split_frontmatter(input);
        assert_eq!(split.raw, None);
        assert_eq!(split.body, input);
    }

    #[test]
    fn test_marker_must_start_document() {
        let input = "\n---\ntitle: x\n---\nBody";
        assert_eq!(strip_frontmatter(input), input);
    }

    #[test]
    fn test_horizontal_rule_only_is_unchanged() {
        assert_eq!(strip_frontmatter("---"), "---");
        assert_eq!(strip_frontmatter("----\ntext\n---\n"), "----\ntext\n---\n");
    }

    #[test]
    fn test_language_tag_on_opening_marker() {
        let split = split_frontmatter("---yaml\ntitle: Tagged\n---\nBody");
        assert_eq!(split.raw, Some("title: Tagged\n"));
        assert_eq!(split.body, "Body");
    }

    #[test]
    fn test_empty_block() {
        let split = split_frontmatter("---\n---\nBody");
        assert_eq!(split.raw, Some(""));
        assert_eq!(split.body, "Body");
        assert_eq!(split.metadata().unwrap(), None);
    }

    #[test]
    fn test_crlf_line_endings() {
        let split = split_frontmatter("---\r\ntitle: Win\r\n---\r\nBody\r\n");
        assert_eq!(split.raw, Some("title: Win\r\n"));
        assert_eq!(split.body, "Body\r\n");
    }

    #[test]
    fn test_closing_marker_at_end_of_input() {
        let split = split_frontmatter("---\ntitle: Only meta\n---");
        assert_eq!(split.raw, Some("title: Only meta\n"));
        assert_eq!(split.body, "");
    }

    #[test]
    fn test_metadata_parsing() {
        let split = split_frontmatter(
            "---\ntitle: Cloud Migration\ndescription: Phase one\nclient: Acme\n---\nBody",
        );
        let meta = split.metadata().unwrap().unwrap();
        assert_eq!(meta.title.as_deref(), Some("Cloud Migration"));
        assert_eq!(meta.description.as_deref(), Some("Phase one"));
        assert_eq!(
            meta.extra.get("client"),
            Some(&serde_yaml::Value::String("Acme".to_owned()))
        );
    }

    #[test]
    fn test_invalid_yaml_still_strips() {
        let split = split_frontmatter("---\ntitle: [unclosed\n---\nBody");
        assert_eq!(split.body, "Body");
        assert!(split.metadata().is_err());
    }

    #[test]
    fn test_no_frontmatter_metadata_is_none() {
        let split = split_frontmatter("Plain body");
        assert_eq!(split.metadata().unwrap(), None);
    }
}
