//! Text-level cleanup that runs before markdown parsing.

use crate::frontmatter::{DocumentMeta, split_frontmatter};
use crate::table::normalize_tables;

/// A raw document after frontmatter stripping and table normalization.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PreparedDocument {
    /// Normalized markdown body, ready for the parser.
    pub markdown: String,
    /// Parsed frontmatter, if a valid block was present.
    pub meta: Option<DocumentMeta>,
    /// Non-fatal problems (for example malformed frontmatter YAML).
    pub warnings: Vec<String>,
}

/// Strip frontmatter and normalize pipe tables.
///
/// Malformed frontmatter is still removed from the body; the YAML error is
/// reported as a warning.
#[must_use]
pub fn preprocess(raw: &str) -> PreparedDocument {
    let split = split_frontmatter(raw);
    let mut warnings = Vec::new();

    let meta = split.metadata().unwrap_or_else(|e| {
        warnings.push(format!("frontmatter ignored: {e}"));
        None
    });

    PreparedDocument {
        markdown: normalize_tables(split.body),
        meta,
        warnings,
    }
}
