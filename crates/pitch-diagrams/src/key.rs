//! Content keys for diagram slots.
//!
//! Provides [`DiagramKey`] for computing content-based hashes used in
//! render identifiers.

use sha2::{Digest, Sha256};

use crate::consts::RENDER_ID_HASH_LEN;

/// Diagram parameters that affect the rendered output.
#[derive(Debug, Clone, Copy)]
pub struct DiagramKey<'a> {
    /// Diagram source code (after `graph` translation).
    pub source: &'a str,
    /// Kroki endpoint (always `"mermaid"` today).
    pub endpoint: &'a str,
    /// Output format (`"svg"`).
    pub format: &'a str,
}

impl DiagramKey<'_> {
    /// Compute a content hash for this diagram key.
    ///
    /// # Hash Format
    ///
    /// SHA-256 of `"{endpoint}:{format}:{source}"`, hex-encoded.
    #[must_use]
    pub fn compute_hash(&self) -> String {
        let content = format!("{}:{}:{}", self.endpoint, self.format, self.source);
        let mut hasher = Sha256::new();
        hasher.update(content.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Render identifier for one render of this diagram.
    ///
    /// `epoch` identifies the document render the slot belongs to, `slot`
    /// its position and `generation` the render of that slot. Identical
    /// sources in different slots or different documents never collide.
    #[must_use]
    pub fn render_id(&self, epoch: u64, slot: usize, generation: u64) -> String {
        let hash = self.compute_hash();
        format!(
            "diagram-{}-{epoch}-{slot}-{generation}",
            &hash[..RENDER_ID_HASH_LEN]
        )
    }
}
