// Copyright 2026 the Decay Skim Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Subtree copy with index rewriting.

use alloc::vec::Vec;

use tracing::{debug, trace};

use crate::error::SkimError;
use crate::forest::Forest;
use crate::node::NodeIndex;
use crate::scratch::{CompactScratch, Frame, Slot};

/// Output of [`compact`]: the copied nodes and the roots among them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Compaction {
    /// Every copied node. All links point into this forest or are `None`.
    pub all: Forest,
    /// Output index of each requested root, in request order.
    ///
    /// These reference nodes of [`all`](Self::all); roots are not copied twice.
    pub roots: Vec<NodeIndex>,
}

/// Copies the decay subtree of every root in `roots` into a fresh forest.
///
/// See [`compact_with_scratch`] for the traversal rules. This allocates a new
/// [`CompactScratch`] per call.
pub fn compact(
    forest: &Forest,
    roots: &[NodeIndex],
    max_depth: usize,
) -> Result<Compaction, SkimError> {
    compact_with_scratch(forest, roots, max_depth, &mut CompactScratch::new())
}

/// Copies the decay subtree of every root in `roots` into a fresh forest,
/// using reusable scratch buffers.
///
/// Each subtree is copied depth-first in pre-order: a node is appended before
/// its daughters, and daughter1's subtree is finished before daughter2's is
/// started. The copy of each daughter has its `mother` set to its parent's
/// new index; the parent copy's daughter links are set to the daughters' new
/// indices. A transition decay (`daughter1 == daughter2`) is followed once and
/// both links of the copy point at the one copied daughter. A root's copy has
/// no mother.
///
/// Every input node is copied at most once per call. A root, or any daughter,
/// that an earlier subtree already copied is linked to that copy instead. If
/// that copy was made as a root (so it has no mother), it adopts the current
/// parent as its mother, which keeps the ancestor chain intact when a later
/// root turns out to be an ancestor of an earlier one.
///
/// # Errors
///
/// - [`SkimError::InvalidIndex`] if a root or a daughter link is out of range.
/// - [`SkimError::CyclicReference`] if a node is its own ancestor.
/// - [`SkimError::DepthLimitExceeded`] if a chain from a root holds more than
///   `max_depth` nodes.
///
/// # Example
///
/// ```
/// use decay_skim::{compact, Forest, Node, NodeIndex, Vertex};
///
/// // 0 is unrelated, 1 decays into 2 and 3.
/// let mut forest = Forest::new();
/// forest.push(Node::new(2212, Vertex::ORIGIN));
/// let top = forest.push(Node::new(9900016, Vertex::ORIGIN));
/// let a = forest.push(Node::new(11, Vertex::ORIGIN).with_mother(top));
/// let b = forest.push(Node::new(-11, Vertex::ORIGIN).with_mother(top));
/// forest.link_daughters(top, Some(a), Some(b)).unwrap();
///
/// let out = compact(&forest, &[top], 64).unwrap();
/// assert_eq!(out.all.len(), 3);
/// assert_eq!(out.roots, [NodeIndex::new(0)]);
/// assert_eq!(out.all[NodeIndex::new(0)].daughter1, Some(NodeIndex::new(1)));
/// assert_eq!(out.all[NodeIndex::new(0)].daughter2, Some(NodeIndex::new(2)));
/// assert_eq!(out.all[NodeIndex::new(2)].mother, Some(NodeIndex::new(0)));
/// ```
pub fn compact_with_scratch(
    forest: &Forest,
    roots: &[NodeIndex],
    max_depth: usize,
    scratch: &mut CompactScratch,
) -> Result<Compaction, SkimError> {
    scratch.reset();
    let mut out = Compaction {
        all: Forest::new(),
        roots: Vec::with_capacity(roots.len()),
    };

    for &root in roots {
        forest.get(root)?;
        if let Some(&existing) = scratch.copied.get(&root) {
            trace!(root = %root, copy = %existing, "root already copied");
            out.roots.push(existing);
            continue;
        }
        let before = out.all.len();
        let copy = copy_subtree(forest, root, max_depth, &mut out.all, scratch)?;
        debug!(
            root = %root,
            copy = %copy,
            nodes = out.all.len() - before,
            "subtree copied"
        );
        out.roots.push(copy);
    }

    Ok(out)
}

/// Copies one subtree into `all` and returns the new index of its root.
fn copy_subtree(
    forest: &Forest,
    root: NodeIndex,
    max_depth: usize,
    all: &mut Forest,
    scratch: &mut CompactScratch,
) -> Result<NodeIndex, SkimError> {
    scratch.reset_path();
    scratch.stack.push(Frame {
        old: root,
        slot: Slot::Root,
        depth: 0,
    });
    let mut new_root = None;

    while let Some(frame) = scratch.stack.pop() {
        scratch.unwind_to(frame.depth);
        if scratch.on_path.contains(&frame.old) {
            return Err(SkimError::CyclicReference { node: frame.old });
        }

        let new_index = if let Some(&existing) = scratch.copied.get(&frame.old) {
            let shared = &mut all[existing];
            if shared.mother.is_none() {
                shared.mother = frame.slot.parent();
            }
            existing
        } else {
            if frame.depth >= max_depth {
                return Err(SkimError::DepthLimitExceeded {
                    node: frame.old,
                    max_depth,
                });
            }
            let node = forest.get(frame.old)?;
            let mut copy = *node;
            copy.mother = frame.slot.parent();
            copy.daughter1 = None;
            copy.daughter2 = None;
            let new_index = all.push(copy);
            scratch.copied.insert(frame.old, new_index);
            scratch.enter(frame.old);

            let depth = frame.depth + 1;
            if node.is_transition() {
                if let Some(old) = node.daughter1 {
                    let slot = Slot::Both(new_index);
                    scratch.stack.push(Frame { old, slot, depth });
                }
            } else {
                // Pushed second-first so daughter1's subtree pops first.
                if let Some(old) = node.daughter2 {
                    let slot = Slot::Second(new_index);
                    scratch.stack.push(Frame { old, slot, depth });
                }
                if let Some(old) = node.daughter1 {
                    let slot = Slot::First(new_index);
                    scratch.stack.push(Frame { old, slot, depth });
                }
            }
            new_index
        };

        match frame.slot {
            Slot::Root => new_root = Some(new_index),
            Slot::First(parent) => all[parent].daughter1 = Some(new_index),
            Slot::Second(parent) => all[parent].daughter2 = Some(new_index),
            Slot::Both(parent) => {
                let copy = &mut all[parent];
                copy.daughter1 = Some(new_index);
                copy.daughter2 = Some(new_index);
            }
        }
    }

    new_root.ok_or(SkimError::InvalidIndex {
        index: root,
        len: forest.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{Node, Vertex};

    fn n(identity: i32) -> Node {
        Node::new(identity, Vertex::ORIGIN)
    }

    fn idx(i: u32) -> NodeIndex {
        NodeIndex::new(i)
    }

    fn link(forest: &mut Forest, mother: NodeIndex, d1: Option<NodeIndex>, d2: Option<NodeIndex>) {
        forest.link_daughters(mother, d1, d2).unwrap();
        for d in [d1, d2].into_iter().flatten() {
            forest[d].mother = Some(mother);
        }
    }

    /// Every link in `all` is `None` or in range.
    fn assert_closed(all: &Forest) {
        for (i, node) in all.iter() {
            for l in [node.mother, node.daughter1, node.daughter2].into_iter().flatten() {
                assert!(all.contains(l), "node {i} links outside the output: {l}");
            }
        }
    }

    #[test]
    fn preorder_assigns_daughter1_subtree_first() {
        // 0 -> (1, 2), 1 -> (3, 4)
        let mut forest: Forest = [n(100), n(10), n(20), n(11), n(12)].into_iter().collect();
        link(&mut forest, idx(0), Some(idx(1)), Some(idx(2)));
        link(&mut forest, idx(1), Some(idx(3)), Some(idx(4)));

        let out = compact(&forest, &[idx(0)], 16).unwrap();
        let ids: Vec<_> = out.all.nodes().iter().map(|n| n.identity).collect();
        assert_eq!(ids, [100, 10, 11, 12, 20]);
        assert_eq!(out.all[idx(0)].daughter1, Some(idx(1)));
        assert_eq!(out.all[idx(0)].daughter2, Some(idx(4)));
        assert_eq!(out.all[idx(1)].daughter2, Some(idx(3)));
        assert_eq!(out.all[idx(4)].mother, Some(idx(0)));
        assert_eq!(out.all[idx(0)].mother, None);
        assert_closed(&out.all);
    }

    #[test]
    fn transition_keeps_equal_daughter_links() {
        // 0 -> 1 (transition), 1 -> (2, 3)
        let mut forest: Forest = [n(1000024), n(1000024), n(211), n(1000022)].into_iter().collect();
        link(&mut forest, idx(0), Some(idx(1)), Some(idx(1)));
        link(&mut forest, idx(1), Some(idx(2)), Some(idx(3)));

        let out = compact(&forest, &[idx(0)], 16).unwrap();
        assert_eq!(out.all.len(), 4);
        let top = out.all[idx(0)];
        assert!(top.is_transition());
        assert_eq!(top.daughter1, Some(idx(1)));
        assert_eq!(out.all[idx(1)].mother, Some(idx(0)));
        assert_closed(&out.all);
    }

    #[test]
    fn only_daughter2_is_followed() {
        let mut forest: Forest = [n(1), n(2)].into_iter().collect();
        link(&mut forest, idx(0), None, Some(idx(1)));

        let out = compact(&forest, &[idx(0)], 16).unwrap();
        assert_eq!(out.all[idx(0)].daughter1, None);
        assert_eq!(out.all[idx(0)].daughter2, Some(idx(1)));
    }

    #[test]
    fn shared_daughter_is_copied_once() {
        // 0 -> (1, 2), 1 -> 3, 2 -> 3
        let mut forest: Forest = [n(1), n(2), n(3), n(4)].into_iter().collect();
        link(&mut forest, idx(0), Some(idx(1)), Some(idx(2)));
        link(&mut forest, idx(1), Some(idx(3)), None);
        forest.link_daughters(idx(2), Some(idx(3)), None).unwrap();

        let out = compact(&forest, &[idx(0)], 16).unwrap();
        assert_eq!(out.all.len(), 4);
        let shared = out.all[idx(1)].daughter1;
        assert_eq!(out.all[idx(3)].daughter1, shared);
        assert_closed(&out.all);
    }

    #[test]
    fn root_inside_earlier_subtree_is_not_recopied() {
        // 0 -> 1 -> 2
        let mut forest: Forest = [n(1), n(2), n(3)].into_iter().collect();
        link(&mut forest, idx(0), Some(idx(1)), None);
        link(&mut forest, idx(1), Some(idx(2)), None);

        let out = compact(&forest, &[idx(0), idx(1)], 16).unwrap();
        assert_eq!(out.all.len(), 3);
        assert_eq!(out.roots, [idx(0), idx(1)]);
    }

    #[test]
    fn later_ancestor_root_adopts_earlier_copy() {
        // 0 -> 1 -> 2, roots requested child-first.
        let mut forest: Forest = [n(1), n(2), n(3)].into_iter().collect();
        link(&mut forest, idx(0), Some(idx(1)), None);
        link(&mut forest, idx(1), Some(idx(2)), None);

        let out = compact(&forest, &[idx(1), idx(0)], 16).unwrap();
        assert_eq!(out.all.len(), 3);
        // Copies: 1 -> #0, 2 -> #1, 0 -> #2.
        assert_eq!(out.roots, [idx(0), idx(2)]);
        assert_eq!(out.all[idx(0)].mother, Some(idx(2)));
        assert_eq!(out.all[idx(2)].daughter1, Some(idx(0)));
        assert_closed(&out.all);
    }

    #[test]
    fn cycle_is_reported() {
        // 0 -> 1 -> 0
        let mut forest: Forest = [n(1), n(2)].into_iter().collect();
        forest.link_daughters(idx(0), Some(idx(1)), None).unwrap();
        forest.link_daughters(idx(1), Some(idx(0)), None).unwrap();

        assert_eq!(
            compact(&forest, &[idx(0)], 16),
            Err(SkimError::CyclicReference { node: idx(0) })
        );
    }

    #[test]
    fn self_loop_is_reported() {
        let mut forest: Forest = [n(1)].into_iter().collect();
        forest.link_daughters(idx(0), Some(idx(0)), Some(idx(0))).unwrap();

        assert_eq!(
            compact(&forest, &[idx(0)], 16),
            Err(SkimError::CyclicReference { node: idx(0) })
        );
    }

    #[test]
    fn depth_bound_counts_chain_nodes() {
        // 0 -> 1 -> 2
        let mut forest: Forest = [n(1), n(2), n(3)].into_iter().collect();
        link(&mut forest, idx(0), Some(idx(1)), None);
        link(&mut forest, idx(1), Some(idx(2)), None);

        assert!(compact(&forest, &[idx(0)], 3).is_ok());
        assert_eq!(
            compact(&forest, &[idx(0)], 2),
            Err(SkimError::DepthLimitExceeded {
                node: idx(2),
                max_depth: 2
            })
        );
    }

    #[test]
    fn dangling_daughter_and_root_are_errors() {
        let mut forest: Forest = [n(1)].into_iter().collect();
        forest.link_daughters(idx(0), Some(idx(5)), None).unwrap();

        assert_eq!(
            compact(&forest, &[idx(0)], 16),
            Err(SkimError::InvalidIndex { index: idx(5), len: 1 })
        );
        assert_eq!(
            compact(&forest, &[idx(3)], 16),
            Err(SkimError::InvalidIndex { index: idx(3), len: 1 })
        );
    }

    #[test]
    fn scratch_reuse_is_stateless() {
        let mut forest: Forest = [n(1), n(2), n(3)].into_iter().collect();
        link(&mut forest, idx(0), Some(idx(1)), Some(idx(2)));

        let mut scratch = CompactScratch::new();
        let first = compact_with_scratch(&forest, &[idx(0)], 16, &mut scratch).unwrap();
        let second = compact_with_scratch(&forest, &[idx(0)], 16, &mut scratch).unwrap();
        assert_eq!(first, second);
        assert_eq!(second.all.len(), 3);
    }

    #[test]
    fn no_roots_no_output() {
        let forest: Forest = [n(1)].into_iter().collect();
        let out = compact(&forest, &[], 16).unwrap();
        assert!(out.all.is_empty());
        assert!(out.roots.is_empty());
    }
}
