//! Pipe table normalization.
//!
//! Language models emit tables with missing spaces, ragged separators and
//! doubled delimiters. Every run of consecutive lines starting with `|` is
//! treated as one table region and rewritten into canonical
//! `| cell | cell |` form with a `---` separator, so the markdown parser
//! recognizes it. Regions of a single line carry too little context and pass
//! through untouched, as does everything outside a region.

use std::sync::LazyLock;

use regex::Regex;

use crate::fence::FenceTracker;

/// A run of hyphens, possibly broken up by stray whitespace, plus any
/// whitespace around it.
static HYPHEN_RUN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*-(?:[\s-]*-)?\s*").unwrap());

/// Normalize every pipe table region in `content`.
///
/// Line structure is preserved: the output has the same number of lines,
/// non-table lines are byte-for-byte identical, and lines inside fenced code
/// blocks are never treated as table rows. The transformation is idempotent.
#[must_use]
pub fn normalize_tables(content: &str) -> String {
    let mut output: Vec<String> = Vec::new();
    let mut region: Vec<&str> = Vec::new();
    let mut fence = FenceTracker::default();

    for line in content.split('\n') {
        let was_in_fence = fence.in_fence();
        let is_fence_marker = fence.update(line);
        let is_table_line =
            !was_in_fence && !is_fence_marker && line.trim_start().starts_with('|');

        if is_table_line {
            region.push(line);
            continue;
        }

        flush_region(&mut region, &mut output);
        output.push(line.to_owned());
    }
    // A table that runs to the end of the document still needs flushing.
    flush_region(&mut region, &mut output);

    output.join("\n")
}

/// Normalize the collected region into `output` and clear it.
fn flush_region(region: &mut Vec<&str>, output: &mut Vec<String>) {
    if region.len() < 2 {
        output.extend(region.drain(..).map(str::to_owned));
        return;
    }

    for (i, line) in region.drain(..).enumerate() {
        let normalized = if i == 1 {
            canonical_row(line, normalize_separator_cell)
        } else {
            canonical_row(line, str::to_owned)
        };
        output.push(with_line_ending_of(line, normalized));
    }
}

/// Keep a trailing carriage return so CRLF documents stay CRLF.
fn with_line_ending_of(original: &str, mut normalized: String) -> String {
    if original.ends_with('\r') {
        normalized.push('\r');
    }
    normalized
}

/// Rewrite one table row as `| a | b |`.
///
/// Cells are trimmed and whitespace-only cells between adjacent delimiters
/// are collapsed away. Escaped pipes (`\|`) stay inside their cell.
fn canonical_row(line: &str, cell: impl Fn(&str) -> String) -> String {
    let cells: Vec<String> = split_cells(line.trim())
        .into_iter()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(cell)
        .collect();

    if cells.is_empty() {
        return "|".to_owned();
    }
    format!("| {} |", cells.join(" | "))
}

/// Every hyphen run in a separator cell becomes exactly `---`; alignment
/// colons are kept.
fn normalize_separator_cell(cell: &str) -> String {
    HYPHEN_RUN_RE.replace_all(cell, "---").into_owned()
}

/// Split a row on unescaped `|` delimiters.
fn split_cells(row: &str) -> Vec<&str> {
    let mut cells = Vec::new();
    let mut start = 0;
    let mut escaped = false;

    for (i, c) in row.char_indices() {
        match c {
            '\\' => escaped = !escaped,
            '|' if !escaped => {
                cells.push(&row[start..i]);
                start = i + 1;
            }
            _ => escaped = false,
        }
    }
    cells.push(&row[start..]);
    cells
}
