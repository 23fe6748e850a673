//! Content-addressed duplicate detection for one batch.
//!
//! The index lives in memory only and is dropped with the batch that owns it.

mod hash;

pub use hash::ContentHash;

use std::collections::HashSet;

/// Set of SHA-256 digests seen so far. Grows monotonically.
#[derive(Debug, Default, Clone)]
pub struct DedupIndex {
    seen: HashSet<ContentHash>,
}

impl DedupIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hashes `content`; returns `true` if it was seen before, otherwise records it and returns `false`.
    pub fn observe(&mut self, content: &[u8]) -> bool {
        let hash = ContentHash::of(content);
        let duplicate = !self.seen.insert(hash);
        if duplicate {
            tracing::debug!(%hash, "duplicate content");
        }
        duplicate
    }

    /// Pre-seeds the index with a known digest. Returns `false` if it was already present.
    pub fn insert(&mut self, hash: ContentHash) -> bool {
        self.seen.insert(hash)
    }

    pub fn contains(&self, hash: &ContentHash) -> bool {
        self.seen.contains(hash)
    }

    /// Number of distinct contents observed.
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}
