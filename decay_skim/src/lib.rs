// Copyright 2026 the Decay Skim Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Decay Skim: select decay subtrees from an index-linked particle forest and
//! re-emit them as compact, self-consistent forests.
//!
//! A decay forest is a flat sequence of [`Node`]s. Each node names its
//! mother and up to two daughters by position in the same sequence. Per batch
//! (one event), this crate:
//!
//! - **Selects** ([`select`]): scans the forest once for *vertices of
//!   interest*, nodes whose vertex radius lies inside a [`RadiusWindow`],
//!   and collects their mothers, filtered by an optional [`Whitelist`] of
//!   identity codes and deduplicated in first-encounter order.
//! - **Compacts** ([`compact`], [`compact_with_scratch`]): copies each
//!   selected mother's entire decay subtree into a fresh [`Forest`],
//!   rewriting every mother and daughter link so it points into the new
//!   forest.
//! - **Passes through** ([`pass_through`]): the degenerate mode that copies
//!   window nodes verbatim without subtrees or reindexing.
//!
//! [`Skimmer`] bundles these behind an immutable [`SkimConfig`] and returns a
//! [`SkimOutput`] with a [`SkimReport`] per batch.
//!
//! ## Quick Start
//!
//! ```rust
//! use decay_skim::{Forest, Node, NodeIndex, SkimConfig, Skimmer, Vertex};
//!
//! // A heavy neutral lepton (9900016) decaying into e- e+ at r = 500.
//! let mut forest = Forest::new();
//! let proton = forest.push(Node::new(2212, Vertex::ORIGIN));
//! let hnl = forest.push(Node::new(9900016, Vertex::ORIGIN).with_mother(proton));
//! let e1 = forest.push(Node::new(11, Vertex::new(300.0, 400.0, 0.0, 2.0)).with_mother(hnl));
//! let e2 = forest.push(Node::new(-11, Vertex::new(300.0, 400.0, 0.0, 2.0)).with_mother(hnl));
//! forest.link_daughters(proton, Some(hnl), None).unwrap();
//! forest.link_daughters(hnl, Some(e1), Some(e2)).unwrap();
//!
//! let mut skimmer = Skimmer::new(SkimConfig::default().with_whitelist([9900016])).unwrap();
//! let out = skimmer.process(&forest).unwrap();
//!
//! // The HNL and both electrons, reindexed from 0.
//! assert_eq!(out.all.len(), 3);
//! assert_eq!(out.roots, [NodeIndex::new(0)]);
//! assert_eq!(out.all[NodeIndex::new(0)].mother, None);
//! assert_eq!(out.all[NodeIndex::new(2)].mother, Some(NodeIndex::new(0)));
//! ```
//!
//! ## Output Invariants
//!
//! In subtree mode every link stored in [`SkimOutput::all`] is `None` or a
//! valid index into that same forest. Roots are a secondary index into it,
//! not separate copies. Traversal is pre-order with daughter1's subtree
//! before daughter2's, so identical input gives identical output.
//!
//! A transition decay (`daughter1 == daughter2`) stays a transition in the
//! output, with both links on the single reindexed daughter.
//!
//! ## Malformed Input
//!
//! Links are trusted but checked where they are followed: out-of-range links
//! are [`SkimError::InvalidIndex`], a node on its own ancestor path is
//! [`SkimError::CyclicReference`], and chains longer than
//! [`SkimConfig::max_depth`] are [`SkimError::DepthLimitExceeded`].
//! Traversal uses an explicit stack, so deep chains never grow the call stack.
//! [`Forest::validate`] checks the whole forest up front when
//! [`SkimConfig::validate_input`] is set.
//!
//! ## Logging
//!
//! Diagnostics are emitted through [`tracing`]: vertices of interest and
//! selected roots at `debug`, per-daughter detail at `trace`, rejected batches
//! at `warn`. The crate installs no subscriber.
//!
//! ## `no_std` Support
//!
//! This crate is `no_std` and uses `alloc`. Vertex radii need a square root:
//! disable the default `std` feature and enable `libm` to build without the
//! standard library.
//!
//! ## Features
//!
//! - `std` (default): float math from the standard library; forwards to
//!   `tracing/std`.
//! - `libm`: float math from [`libm`](https://docs.rs/libm) for `no_std` targets.
//! - `serde`: derives `Serialize`/`Deserialize` for the data model and
//!   [`SkimConfig`].

#![no_std]

#[cfg(not(any(feature = "std", feature = "libm")))]
compile_error!("decay_skim requires either the `std` or `libm` feature");

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

mod compact;
mod config;
mod error;
mod forest;
mod node;
mod scratch;
mod select;
mod skim;

pub use compact::{Compaction, compact, compact_with_scratch};
pub use config::{
    DEFAULT_MAX_DEPTH, DEFAULT_MAX_RADIUS, DEFAULT_MIN_RADIUS, EmitMode, MissingMotherPolicy,
    RadiusWindow, SkimConfig, Whitelist,
};
pub use error::{ConfigError, SkimError};
pub use forest::{Forest, SubtreeDisplay};
pub use node::{Node, NodeIndex, Vertex};
pub use scratch::CompactScratch;
pub use select::{Selection, pass_through, select};
pub use skim::{SkimOutput, SkimReport, Skimmer};
