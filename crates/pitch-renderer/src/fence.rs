//! Fenced code block tracking for line-based preprocessing.

/// Opening fence of the code block currently being scanned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct OpenFence {
    marker: char,
    len: usize,
}

/// Tracks whether a line-by-line scan is inside a fenced code block.
///
/// A fence opens with three or more backticks or tildes and closes with a
/// line of at least as many of the same character and nothing else. A
/// backtick opener whose info string contains a backtick is not a fence.
#[derive(Debug, Default)]
pub(crate) struct FenceTracker {
    open: Option<OpenFence>,
}

impl FenceTracker {
    /// Whether the scan is currently inside a code block.
    pub(crate) fn in_fence(&self) -> bool {
        self.open.is_some()
    }

    /// Feed the next line. Returns `true` if the line opened or closed a fence.
    pub(crate) fn update(&mut self, line: &str) -> bool {
        let trimmed = line.trim_start();
        match self.open {
            Some(open) => {
                let run = marker_run(trimmed, open.marker);
                if run >= open.len && trimmed[run..].trim().is_empty() {
                    self.open = None;
                    return true;
                }
                false
            }
            None => {
                let Some(marker) = trimmed.chars().next().filter(|c| matches!(c, '`' | '~'))
                else {
                    return false;
                };
                let len = marker_run(trimmed, marker);
                if len < 3 {
                    return false;
                }
                // A backtick in the info string makes this inline code.
                if marker == '`' && trimmed[len..].contains('`') {
                    return false;
                }
                self.open = Some(OpenFence { marker, len });
                true
            }
        }
    }
}

/// Number of leading `marker` characters (all ASCII, so also a byte count).
fn marker_run(s: &str, marker: char) -> usize {
    s.chars().take_while(|&c| c == marker).count()
}
