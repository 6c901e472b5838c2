// Copyright 2026 the Decay Skim Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types for selection, compaction, and configuration.

use core::fmt;

use crate::node::NodeIndex;

/// Error returned when a batch cannot be processed.
///
/// Every variant aborts the batch: no partial output is returned and nothing
/// is retried.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SkimError {
    /// A vertex-of-interest has no mother and
    /// [`MissingMotherPolicy::Fail`](crate::MissingMotherPolicy::Fail) is in effect.
    MissingMother {
        /// The motherless vertex-of-interest.
        node: NodeIndex,
    },
    /// A stored link does not refer to a node of the forest.
    InvalidIndex {
        /// The offending index.
        index: NodeIndex,
        /// Length of the forest it was resolved against.
        len: usize,
    },
    /// Traversal reached a node that is already on its own ancestor path.
    CyclicReference {
        /// The node that was revisited.
        node: NodeIndex,
    },
    /// A decay chain is deeper than the configured bound.
    DepthLimitExceeded {
        /// The node at which the bound was exceeded.
        node: NodeIndex,
        /// The configured bound.
        max_depth: usize,
    },
    /// A node's mother does not list it as a daughter.
    InconsistentLink {
        /// The daughter whose mother link is inconsistent.
        node: NodeIndex,
        /// The mother it points to.
        mother: NodeIndex,
    },
}

impl fmt::Display for SkimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingMother { node } => {
                write!(f, "vertex-of-interest {node} has no mother")
            }
            Self::InvalidIndex { index, len } => {
                write!(f, "index {index} is out of range for a forest of {len} nodes")
            }
            Self::CyclicReference { node } => {
                write!(f, "node {node} is its own ancestor")
            }
            Self::DepthLimitExceeded { node, max_depth } => {
                write!(f, "decay chain at {node} is deeper than {max_depth}")
            }
            Self::InconsistentLink { node, mother } => {
                write!(f, "node {node} names {mother} as mother, which does not list it as a daughter")
            }
        }
    }
}

impl core::error::Error for SkimError {}

/// Error returned when a [`SkimConfig`](crate::SkimConfig) is rejected.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// The radius window is empty, unbounded below, or not a number.
    InvalidWindow {
        /// Requested lower bound.
        min: f64,
        /// Requested upper bound.
        max: f64,
    },
    /// The traversal depth bound is zero.
    ZeroDepth,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidWindow { min, max } => {
                write!(f, "invalid radius window [{min}, {max}]")
            }
            Self::ZeroDepth => f.write_str("maximum traversal depth must be at least 1"),
        }
    }
}

impl core::error::Error for ConfigError {}
