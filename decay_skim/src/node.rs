// Copyright 2026 the Decay Skim Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Decay-tree records: node indices, vertices, and nodes.

use core::fmt;

/// Position of a node inside a [`Forest`](crate::Forest).
///
/// This is a small, copyable handle. It carries no generation: an index is
/// only meaningful together with the forest it was taken from. Indices taken
/// from an input forest never appear in an output forest built by
/// [`compact`](crate::compact).
///
/// Links between nodes are stored as `Option<NodeIndex>`, where `None` is the
/// "no mother" / "no daughter" sentinel. Use [`NodeIndex::from_raw`] and
/// [`NodeIndex::to_raw`] to convert from and to the signed representation
/// used by generator records, where any negative value means "none".
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
#[repr(transparent)]
pub struct NodeIndex(u32);

impl NodeIndex {
    /// Creates an index from its raw position.
    #[inline]
    #[must_use]
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Creates an index from a `usize` position, if it fits the index space.
    #[inline]
    #[must_use]
    pub fn from_usize(index: usize) -> Option<Self> {
        u32::try_from(index).ok().map(Self)
    }

    /// Converts a signed generator link into an optional index.
    ///
    /// Negative values are the sentinel and map to `None`.
    ///
    /// ```
    /// use decay_skim::NodeIndex;
    ///
    /// assert_eq!(NodeIndex::from_raw(-1), None);
    /// assert_eq!(NodeIndex::from_raw(7), Some(NodeIndex::new(7)));
    /// ```
    #[inline]
    #[must_use]
    pub fn from_raw(raw: i32) -> Option<Self> {
        u32::try_from(raw).ok().map(Self)
    }

    /// Converts an optional link back into the signed generator form (`-1` for `None`).
    #[inline]
    #[must_use]
    pub fn to_raw(link: Option<Self>) -> i64 {
        link.map_or(-1, |index| i64::from(index.0))
    }

    /// Returns this index as a `usize` position.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Returns the raw numeric index.
    #[inline]
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }
}

impl fmt::Display for NodeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Spacetime point of a decay or creation vertex.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vertex {
    /// Spatial x coordinate.
    pub x: f64,
    /// Spatial y coordinate.
    pub y: f64,
    /// Spatial z coordinate.
    pub z: f64,
    /// Time coordinate.
    pub t: f64,
}

impl Vertex {
    /// The spacetime origin.
    pub const ORIGIN: Self = Self::new(0.0, 0.0, 0.0, 0.0);

    /// Creates a vertex from its four components.
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64, t: f64) -> Self {
        Self { x, y, z, t }
    }

    /// Euclidean distance of the spatial part from the origin.
    ///
    /// The time component does not contribute.
    #[must_use]
    pub fn radius(&self) -> f64 {
        sqrt(self.x * self.x + self.y * self.y + self.z * self.z)
    }
}

#[cfg(feature = "std")]
#[inline]
fn sqrt(v: f64) -> f64 {
    v.sqrt()
}

#[cfg(all(not(feature = "std"), feature = "libm"))]
#[inline]
fn sqrt(v: f64) -> f64 {
    libm::sqrt(v)
}

/// One decay-tree record.
///
/// A node is identified only by its position in a [`Forest`](crate::Forest).
/// Links point into the same forest the node lives in.
///
/// Two equal daughters (`daughter1 == daughter2`, both set) describe a
/// *transition*: the particle continues as a new record of itself instead of
/// splitting.
///
/// # Example
///
/// ```
/// use decay_skim::{Node, NodeIndex, Vertex};
///
/// let node = Node::new(11, Vertex::new(3.0, 4.0, 0.0, 1.0))
///     .with_mother(NodeIndex::new(0))
///     .with_daughters(Some(NodeIndex::new(5)), Some(NodeIndex::new(5)));
///
/// assert_eq!(node.radius(), 5.0);
/// assert!(node.is_transition());
/// ```
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Node {
    /// Particle-type code.
    pub identity: i32,
    /// Generator status code. Carried through unchanged, never interpreted.
    pub status: i32,
    /// Decay or creation vertex.
    pub position: Vertex,
    /// The single mother, if any.
    pub mother: Option<NodeIndex>,
    /// First direct daughter, if any.
    pub daughter1: Option<NodeIndex>,
    /// Second direct daughter, if any.
    pub daughter2: Option<NodeIndex>,
}

impl Node {
    /// Creates an unlinked node with status `0`.
    #[must_use]
    pub const fn new(identity: i32, position: Vertex) -> Self {
        Self {
            identity,
            status: 0,
            position,
            mother: None,
            daughter1: None,
            daughter2: None,
        }
    }

    /// Returns this node with the given status code.
    #[must_use]
    pub const fn with_status(mut self, status: i32) -> Self {
        self.status = status;
        self
    }

    /// Returns this node with the given mother.
    #[must_use]
    pub const fn with_mother(mut self, mother: NodeIndex) -> Self {
        self.mother = Some(mother);
        self
    }

    /// Returns this node with the given daughter links.
    #[must_use]
    pub const fn with_daughters(
        mut self,
        daughter1: Option<NodeIndex>,
        daughter2: Option<NodeIndex>,
    ) -> Self {
        self.daughter1 = daughter1;
        self.daughter2 = daughter2;
        self
    }

    /// Radius of this node's vertex, see [`Vertex::radius`].
    #[must_use]
    pub fn radius(&self) -> f64 {
        self.position.radius()
    }

    /// Returns `true` for a one-daughter transition decay.
    #[must_use]
    pub fn is_transition(&self) -> bool {
        self.daughter1.is_some() && self.daughter1 == self.daughter2
    }

    /// Returns `true` if `index` is one of this node's daughters.
    #[must_use]
    pub fn has_daughter(&self, index: NodeIndex) -> bool {
        self.daughter1 == Some(index) || self.daughter2 == Some(index)
    }

    /// Distinct daughters in traversal order: `daughter1` first, then
    /// `daughter2` unless it repeats `daughter1`.
    pub fn daughters(&self) -> impl Iterator<Item = NodeIndex> {
        let second = if self.daughter2 == self.daughter1 {
            None
        } else {
            self.daughter2
        };
        self.daughter1.into_iter().chain(second)
    }
}
