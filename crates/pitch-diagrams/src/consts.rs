//! Internal constants for diagram rendering.

use std::time::Duration;

/// Default HTTP timeout for Kroki requests (30 seconds).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Output format requested from the diagram backend.
pub const RENDER_FORMAT: &str = "svg";

/// Hex digits of the content hash kept in render identifiers.
pub const RENDER_ID_HASH_LEN: usize = 12;
