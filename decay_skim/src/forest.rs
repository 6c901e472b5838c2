// Copyright 2026 the Decay Skim Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Arena of decay-tree nodes addressed by [`NodeIndex`].

use alloc::vec::Vec;
use core::fmt;
use core::ops::{Index, IndexMut};

use crate::error::SkimError;
use crate::node::{Node, NodeIndex};

/// An ordered, indexable sequence of [`Node`]s linked by index.
///
/// The forest does not enforce its link invariants on construction: input
/// forests are trusted, and [`validate`](Self::validate) checks them on
/// request. Lookups through [`get`](Self::get) report out-of-range links as
/// [`SkimError::InvalidIndex`].
///
/// # Example
///
/// ```
/// use decay_skim::{Forest, Node, Vertex};
///
/// let mut forest = Forest::new();
/// let mother = forest.push(Node::new(23, Vertex::ORIGIN));
/// let a = forest.push(Node::new(11, Vertex::ORIGIN).with_mother(mother));
/// let b = forest.push(Node::new(-11, Vertex::ORIGIN).with_mother(mother));
/// forest.link_daughters(mother, Some(a), Some(b)).unwrap();
///
/// assert_eq!(forest.len(), 3);
/// assert_eq!(forest[mother].daughter2, Some(b));
/// assert!(forest.validate().is_ok());
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Forest {
    nodes: Vec<Node>,
}

impl Forest {
    /// Creates an empty forest.
    #[must_use]
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Creates an empty forest with room for `capacity` nodes.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
        }
    }

    /// Wraps an existing node sequence. Links are taken as-is.
    #[must_use]
    pub fn from_nodes(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    /// Appends a node and returns its index.
    ///
    /// # Panics
    ///
    /// Panics if the forest already holds `u32::MAX` nodes.
    pub fn push(&mut self, node: Node) -> NodeIndex {
        assert!(
            self.nodes.len() < u32::MAX as usize,
            "forest exceeds the node index space"
        );
        #[expect(clippy::cast_possible_truncation, reason = "checked above")]
        let index = NodeIndex::new(self.nodes.len() as u32);
        self.nodes.push(node);
        index
    }

    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the forest holds no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Removes every node, keeping the allocation.
    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    /// Returns `true` if `index` refers to a node of this forest.
    #[must_use]
    pub fn contains(&self, index: NodeIndex) -> bool {
        index.index() < self.nodes.len()
    }

    /// Resolves `index`, reporting out-of-range links as [`SkimError::InvalidIndex`].
    pub fn get(&self, index: NodeIndex) -> Result<&Node, SkimError> {
        self.nodes
            .get(index.index())
            .ok_or(SkimError::InvalidIndex {
                index,
                len: self.nodes.len(),
            })
    }

    /// Mutable access to the node at `index`, if present.
    pub fn get_mut(&mut self, index: NodeIndex) -> Option<&mut Node> {
        self.nodes.get_mut(index.index())
    }

    /// Sets the daughter links of the node at `index`.
    pub fn link_daughters(
        &mut self,
        index: NodeIndex,
        daughter1: Option<NodeIndex>,
        daughter2: Option<NodeIndex>,
    ) -> Result<(), SkimError> {
        let len = self.nodes.len();
        let node = self
            .nodes
            .get_mut(index.index())
            .ok_or(SkimError::InvalidIndex { index, len })?;
        node.daughter1 = daughter1;
        node.daughter2 = daughter2;
        Ok(())
    }

    /// The nodes in storage order.
    #[must_use]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Consumes the forest and returns its nodes.
    #[must_use]
    pub fn into_nodes(self) -> Vec<Node> {
        self.nodes
    }

    /// Iterates `(index, node)` pairs in storage order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeIndex, &Node)> + '_ {
        self.nodes.iter().enumerate().map(|(i, node)| {
            #[expect(clippy::cast_possible_truncation, reason = "len <= u32::MAX via push")]
            let index = NodeIndex::new(i as u32);
            (index, node)
        })
    }

    /// Checks that every link is in range and that every mother lists its
    /// daughter.
    ///
    /// The first violation found in storage order is returned.
    pub fn validate(&self) -> Result<(), SkimError> {
        for (index, node) in self.iter() {
            for link in [node.daughter1, node.daughter2].into_iter().flatten() {
                self.get(link)?;
            }
            if let Some(mother) = node.mother
                && !self.get(mother)?.has_daughter(index)
            {
                return Err(SkimError::InconsistentLink {
                    node: index,
                    mother,
                });
            }
        }
        Ok(())
    }

    /// Renders the decay tree below `root` as indented text.
    ///
    /// One line per node, two spaces of indent per generation, daughter1's
    /// subtree before daughter2's. A transition daughter is printed once.
    /// Links that leave the forest print as `(missing)`, and a node met again
    /// on its own ancestor path prints as `(cycle)` without being expanded.
    ///
    /// ```
    /// use decay_skim::{Forest, Node, Vertex};
    ///
    /// let mut forest = Forest::new();
    /// let top = forest.push(Node::new(13, Vertex::new(1.0, 2.0, 3.0, 4.0)).with_status(2));
    /// let next = forest.push(Node::new(13, Vertex::ORIGIN).with_mother(top).with_status(1));
    /// forest.link_daughters(top, Some(next), Some(next)).unwrap();
    ///
    /// assert_eq!(
    ///     forest.display_subtree(top).to_string(),
    ///     "#0  2  13 4/1/2/3\n  #1  1  13 0/0/0/0\n",
    /// );
    /// ```
    #[must_use]
    pub fn display_subtree(&self, root: NodeIndex) -> SubtreeDisplay<'_> {
        SubtreeDisplay { forest: self, root }
    }
}

impl Index<NodeIndex> for Forest {
    type Output = Node;

    fn index(&self, index: NodeIndex) -> &Node {
        &self.nodes[index.index()]
    }
}

impl IndexMut<NodeIndex> for Forest {
    fn index_mut(&mut self, index: NodeIndex) -> &mut Node {
        &mut self.nodes[index.index()]
    }
}

impl From<Vec<Node>> for Forest {
    fn from(nodes: Vec<Node>) -> Self {
        Self::from_nodes(nodes)
    }
}

impl FromIterator<Node> for Forest {
    fn from_iter<I: IntoIterator<Item = Node>>(iter: I) -> Self {
        Self {
            nodes: iter.into_iter().collect(),
        }
    }
}

/// [`Display`](fmt::Display) adapter returned by [`Forest::display_subtree`].
#[derive(Debug)]
pub struct SubtreeDisplay<'a> {
    forest: &'a Forest,
    root: NodeIndex,
}

impl fmt::Display for SubtreeDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut stack: Vec<(NodeIndex, usize)> = Vec::new();
        let mut path: Vec<NodeIndex> = Vec::new();
        stack.push((self.root, 0));

        while let Some((index, depth)) = stack.pop() {
            path.truncate(depth);
            for _ in 0..depth {
                f.write_str("  ")?;
            }
            if path.contains(&index) {
                writeln!(f, "{index} (cycle)")?;
                continue;
            }
            let Ok(node) = self.forest.get(index) else {
                writeln!(f, "{index} (missing)")?;
                continue;
            };
            let p = node.position;
            writeln!(
                f,
                "{index}  {}  {} {}/{}/{}/{}",
                node.status, node.identity, p.t, p.x, p.y, p.z
            )?;
            path.push(index);
            // Reversed so daughter1 pops first.
            let daughters: Vec<_> = node.daughters().collect();
            for daughter in daughters.into_iter().rev() {
                stack.push((daughter, depth + 1));
            }
        }
        Ok(())
    }
}
