// Copyright 2026 the Decay Skim Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reusable scratch buffers for subtree copies.

use alloc::vec::Vec;

use hashbrown::{HashMap, HashSet};

use crate::node::NodeIndex;

/// Where a visited node hangs in the output: which link of which parent copy
/// receives its new index.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Slot {
    /// The node is the root of the current subtree.
    Root,
    /// `daughter1` of the parent copy.
    First(NodeIndex),
    /// `daughter2` of the parent copy.
    Second(NodeIndex),
    /// Both daughter links of the parent copy (transition decay).
    Both(NodeIndex),
}

impl Slot {
    /// Output index of the parent copy, if any.
    pub(crate) fn parent(self) -> Option<NodeIndex> {
        match self {
            Self::Root => None,
            Self::First(p) | Self::Second(p) | Self::Both(p) => Some(p),
        }
    }
}

/// A pending visit on the explicit traversal stack.
#[derive(Copy, Clone, Debug)]
pub(crate) struct Frame {
    /// Index of the node in the input forest.
    pub(crate) old: NodeIndex,
    pub(crate) slot: Slot,
    /// Generation below the subtree root (root is 0).
    pub(crate) depth: usize,
}

/// Reusable scratch storage for [`compact_with_scratch`](crate::compact_with_scratch).
///
/// Holds the traversal stack, the current ancestor path, and the
/// input-to-output index map. Buffers retain capacity across batches; their
/// contents are cleared at the start of every compaction, so no state leaks
/// from one batch into the next.
///
/// A [`Skimmer`](crate::Skimmer) owns one of these. Use one directly when
/// calling the free functions in a loop.
#[derive(Debug, Default)]
pub struct CompactScratch {
    pub(crate) stack: Vec<Frame>,
    pub(crate) path: Vec<NodeIndex>,
    pub(crate) on_path: HashSet<NodeIndex>,
    /// Input index -> output index for every node copied in this batch.
    pub(crate) copied: HashMap<NodeIndex, NodeIndex>,
}

impl CompactScratch {
    /// Creates an empty scratch buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty scratch buffer with pre-allocated capacity.
    ///
    /// `capacity` is a best-effort hint for the index map; the stack and path
    /// buffers get a smaller share since they only grow with tree depth.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let shallow = capacity.min(64);
        Self {
            stack: Vec::with_capacity(shallow),
            path: Vec::with_capacity(shallow),
            on_path: HashSet::with_capacity(shallow),
            copied: HashMap::with_capacity(capacity),
        }
    }

    /// Clears everything, keeping capacity. Called once per batch.
    pub(crate) fn reset(&mut self) {
        self.copied.clear();
        self.reset_path();
    }

    /// Clears the traversal stack and ancestor path. Called once per subtree.
    pub(crate) fn reset_path(&mut self) {
        self.stack.clear();
        self.path.clear();
        self.on_path.clear();
    }

    /// Pops the ancestor path back to `depth` entries.
    pub(crate) fn unwind_to(&mut self, depth: usize) {
        while self.path.len() > depth {
            if let Some(gone) = self.path.pop() {
                self.on_path.remove(&gone);
            }
        }
    }

    pub(crate) fn enter(&mut self, index: NodeIndex) {
        self.path.push(index);
        self.on_path.insert(index);
    }
}
