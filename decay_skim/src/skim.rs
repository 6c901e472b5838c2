// Copyright 2026 the Decay Skim Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-batch driver: configuration, selection, compaction, and reporting.

use alloc::vec::Vec;

use tracing::{debug, warn};

use crate::compact::compact_with_scratch;
use crate::config::{EmitMode, SkimConfig};
use crate::error::{ConfigError, SkimError};
use crate::forest::Forest;
use crate::node::{Node, NodeIndex};
use crate::scratch::CompactScratch;
use crate::select::{pass_through, select};

/// Counters describing one processed batch.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SkimReport {
    /// Nodes in the input forest.
    pub input_nodes: usize,
    /// Input nodes inside the radius window.
    pub vertices_of_interest: usize,
    /// Selected roots. Zero in pass-through mode.
    pub roots: usize,
    /// Nodes written to the output forest.
    pub copied_nodes: usize,
    /// Vertices of interest whose mother failed the whitelist.
    pub rejected_by_whitelist: usize,
    /// Motherless vertices of interest that were skipped.
    pub skipped_missing_mother: usize,
}

/// Outputs of one batch.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SkimOutput {
    /// Every emitted node.
    ///
    /// With [`EmitMode::SubtreeExtract`] this is a closed forest: every link
    /// is `None` or an index into it. With [`EmitMode::PassThrough`] the nodes
    /// are verbatim copies whose links still refer to the input forest.
    pub all: Forest,
    /// Indices into [`all`](Self::all) of the selected roots, in selection
    /// order. Empty in pass-through mode.
    pub roots: Vec<NodeIndex>,
    /// Counters for this batch.
    pub report: SkimReport,
}

impl SkimOutput {
    /// The selected root nodes, resolved against [`all`](Self::all).
    pub fn root_nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.roots.iter().map(|&index| &self.all[index])
    }
}

/// Runs the selection and compaction pipeline once per batch.
///
/// A `Skimmer` owns an immutable [`SkimConfig`] and a [`CompactScratch`]
/// whose buffers are reused from batch to batch. Nothing else carries over:
/// each call to [`process`](Self::process) builds its outputs from empty.
///
/// # Example
///
/// ```
/// use decay_skim::{Forest, Node, NodeIndex, SkimConfig, Skimmer, Vertex};
///
/// let mut forest = Forest::new();
/// let top = forest.push(Node::new(9900016, Vertex::new(500.0, 0.0, 0.0, 0.0)));
/// let a = forest.push(Node::new(11, Vertex::new(500.01, 0.0, 0.0, 0.0)).with_mother(top));
/// let b = forest.push(Node::new(-11, Vertex::new(0.0, 500.01, 0.0, 0.0)).with_mother(top));
/// forest.link_daughters(top, Some(a), Some(b)).unwrap();
///
/// let mut skimmer = Skimmer::new(SkimConfig::default().with_whitelist([9900016])).unwrap();
/// let out = skimmer.process(&forest).unwrap();
///
/// assert_eq!(out.all.len(), 3);
/// assert_eq!(out.roots, [NodeIndex::new(0)]);
/// assert_eq!(out.all[NodeIndex::new(1)].mother, Some(NodeIndex::new(0)));
/// ```
#[derive(Debug)]
pub struct Skimmer {
    config: SkimConfig,
    scratch: CompactScratch,
}

impl Skimmer {
    /// Validates `config` and creates a skimmer.
    pub fn new(config: SkimConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            scratch: CompactScratch::new(),
        })
    }

    /// The configuration in effect.
    #[must_use]
    pub fn config(&self) -> &SkimConfig {
        &self.config
    }

    /// Processes one batch.
    ///
    /// # Errors
    ///
    /// Any [`SkimError`] from input validation (when enabled), selection, or
    /// compaction. The batch produces no output in that case.
    pub fn process(&mut self, forest: &Forest) -> Result<SkimOutput, SkimError> {
        let result = self.run(forest);
        if let Err(err) = &result {
            warn!(nodes = forest.len(), error = %err, "batch rejected");
        }
        result
    }

    fn run(&mut self, forest: &Forest) -> Result<SkimOutput, SkimError> {
        if self.config.validate_input {
            forest.validate()?;
        }

        let output = match self.config.emit_mode {
            EmitMode::PassThrough => {
                let all = pass_through(forest, self.config.window);
                let report = SkimReport {
                    input_nodes: forest.len(),
                    vertices_of_interest: all.len(),
                    copied_nodes: all.len(),
                    ..SkimReport::default()
                };
                SkimOutput {
                    all,
                    roots: Vec::new(),
                    report,
                }
            }
            EmitMode::SubtreeExtract => {
                let selection = select(
                    forest,
                    self.config.window,
                    &self.config.whitelist,
                    self.config.missing_mother,
                )?;
                let compaction = compact_with_scratch(
                    forest,
                    &selection.roots,
                    self.config.max_depth,
                    &mut self.scratch,
                )?;
                let report = SkimReport {
                    input_nodes: forest.len(),
                    vertices_of_interest: selection.vertices_of_interest,
                    roots: compaction.roots.len(),
                    copied_nodes: compaction.all.len(),
                    rejected_by_whitelist: selection.rejected_by_whitelist,
                    skipped_missing_mother: selection.skipped_missing_mother,
                };
                SkimOutput {
                    all: compaction.all,
                    roots: compaction.roots,
                    report,
                }
            }
        };

        let r = &output.report;
        debug!(
            input = r.input_nodes,
            vertices = r.vertices_of_interest,
            roots = r.roots,
            copied = r.copied_nodes,
            "batch processed"
        );
        Ok(output)
    }
}
