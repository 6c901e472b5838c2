// Copyright 2026 the Decay Skim Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Root selection: vertices of interest, their mothers, and the whitelist.

use alloc::vec::Vec;

use hashbrown::HashSet;
use tracing::{debug, trace};

use crate::config::{MissingMotherPolicy, RadiusWindow, Whitelist};
use crate::error::SkimError;
use crate::forest::Forest;
use crate::node::NodeIndex;

/// Result of [`select`]: the roots to copy plus scan counters.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    /// Selected mothers, deduplicated, in first-encounter order.
    pub roots: Vec<NodeIndex>,
    /// Nodes whose radius fell inside the window.
    pub vertices_of_interest: usize,
    /// Vertices of interest whose mother failed the whitelist.
    pub rejected_by_whitelist: usize,
    /// Motherless vertices of interest passed over under
    /// [`MissingMotherPolicy::Skip`].
    pub skipped_missing_mother: usize,
}

/// Scans `forest` once and returns the mothers of all vertices of interest
/// that pass `whitelist`.
///
/// A node is a vertex of interest when its vertex radius lies in `window`
/// (bounds included). Its mother qualifies if `whitelist` admits the mother's
/// identity. A mother reached from several daughters is selected once, at the
/// position of its first encounter.
///
/// # Errors
///
/// - [`SkimError::InvalidIndex`] if a vertex of interest names a mother
///   outside the forest.
/// - [`SkimError::MissingMother`] if a vertex of interest has no mother and
///   `missing_mother` is [`MissingMotherPolicy::Fail`].
///
/// # Example
///
/// ```
/// use decay_skim::{select, Forest, MissingMotherPolicy, Node, RadiusWindow, Vertex, Whitelist};
///
/// let mut forest = Forest::new();
/// let top = forest.push(Node::new(9900016, Vertex::ORIGIN));
/// let a = forest.push(Node::new(11, Vertex::new(500.0, 0.0, 0.0, 0.0)).with_mother(top));
/// let b = forest.push(Node::new(-11, Vertex::new(0.0, 500.0, 0.0, 0.0)).with_mother(top));
/// forest.link_daughters(top, Some(a), Some(b)).unwrap();
///
/// let selection = select(
///     &forest,
///     RadiusWindow::default(),
///     &Whitelist::new(),
///     MissingMotherPolicy::Skip,
/// )
/// .unwrap();
/// assert_eq!(selection.roots, [top]);
/// assert_eq!(selection.vertices_of_interest, 2);
/// ```
pub fn select(
    forest: &Forest,
    window: RadiusWindow,
    whitelist: &Whitelist,
    missing_mother: MissingMotherPolicy,
) -> Result<Selection, SkimError> {
    let mut selection = Selection::default();
    let mut seen: HashSet<NodeIndex> = HashSet::new();

    for (index, node) in forest.iter() {
        let radius = node.radius();
        if !window.contains(radius) {
            continue;
        }
        selection.vertices_of_interest += 1;
        debug!(node = %index, identity = node.identity, radius, "vertex of interest");

        let Some(mother_index) = node.mother else {
            match missing_mother {
                MissingMotherPolicy::Fail => return Err(SkimError::MissingMother { node: index }),
                MissingMotherPolicy::Skip => {
                    debug!(node = %index, "vertex of interest has no mother, skipped");
                    selection.skipped_missing_mother += 1;
                    continue;
                }
            }
        };
        let mother = forest.get(mother_index)?;

        if !whitelist.admits(mother.identity) {
            trace!(mother = %mother_index, identity = mother.identity, "mother not whitelisted");
            selection.rejected_by_whitelist += 1;
            continue;
        }
        if !seen.insert(mother_index) {
            continue;
        }

        debug!(mother = %mother_index, identity = mother.identity, "root selected");
        for daughter in mother.daughters() {
            if let Ok(d) = forest.get(daughter) {
                trace!(daughter = %daughter, identity = d.identity, radius = d.radius(), "root daughter");
            }
        }
        selection.roots.push(mother_index);
    }

    Ok(selection)
}

/// Copies every node inside `window`, unmodified, in storage order.
///
/// This is the pass-through emit mode: no mothers, no subtrees, no
/// reindexing. Links in the returned forest still refer to `forest`.
pub fn pass_through(forest: &Forest, window: RadiusWindow) -> Forest {
    forest
        .nodes()
        .iter()
        .filter(|node| window.contains(node.radius()))
        .copied()
        .collect()
}
