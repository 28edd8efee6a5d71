use std::collections::VecDeque;

use tracing::Span;

use crate::config::RlnConfig;
use crate::engine::MembershipEngine;
use crate::errors::SyncError;
use crate::types::MerkleNode;

/// Sliding window of the most recent membership-tree roots.
///
/// Peers observe insertions at different times, so a proof built against a
/// root a few insertions old is still accepted while that root is in the
/// window. Oldest roots are evicted first; the newest entry is always the
/// engine root seen at the last successful [`sync`](Self::sync).
#[derive(Debug)]
pub struct MerkleRootTracker {
    window: VecDeque<MerkleNode>,
    capacity: usize,
    span: Span,
}

impl MerkleRootTracker {
    /// Empty window holding up to `capacity` roots (at least one).
    #[must_use]
    pub fn new(capacity: usize, parent: &Span) -> Self {
        let capacity = capacity.max(1);
        Self {
            window: VecDeque::with_capacity(capacity + 1),
            capacity,
            span: tracing::info_span!(parent: parent, "rln_roots"),
        }
    }

    #[must_use]
    pub fn from_config(config: &RlnConfig, parent: &Span) -> Self {
        Self::new(config.root_window_size, parent)
    }

    /// Pull the engine's current root into the window.
    ///
    /// A failed read leaves the window as it was; the caller retries at the
    /// next mutation.
    pub fn sync<E: MembershipEngine + ?Sized>(&mut self, engine: &E) -> Result<(), SyncError> {
        let root = engine.merkle_root().map_err(|e| {
            tracing::error!(parent: &self.span, error = %e, "reading merkle root");
            SyncError(e)
        })?;

        if self.window.back().is_some_and(|newest| newest.ct_eq(&root)) {
            return Ok(());
        }

        self.window.push_back(root);
        while self.window.len() > self.capacity {
            self.window.pop_front();
        }
        tracing::debug!(parent: &self.span, root = %root, window = self.window.len(), "merkle root changed");
        Ok(())
    }

    /// Whether `root` is one of the roots currently in the window.
    #[must_use]
    pub fn contains(&self, root: &MerkleNode) -> bool {
        // Scan the whole window so timing does not reveal the match position.
        self.window.iter().fold(false, |found, r| r.ct_eq(root) | found)
    }

    /// Newest root, if any sync has succeeded.
    #[must_use]
    pub fn latest(&self) -> Option<&MerkleNode> {
        self.window.back()
    }

    /// Roots oldest first.
    pub fn roots(&self) -> impl Iterator<Item = &MerkleNode> {
        self.window.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.window.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }

    #[must_use]
    pub const fn capacity(&self) -> usize {
        self.capacity
    }
}
