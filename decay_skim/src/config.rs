// Copyright 2026 the Decay Skim Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Static configuration, fixed before the first batch.

use alloc::vec::Vec;

use crate::error::ConfigError;

/// Default lower bound of the radius window.
pub const DEFAULT_MIN_RADIUS: f64 = 100.0;

/// Default upper bound of the radius window.
pub const DEFAULT_MAX_RADIUS: f64 = 10000.0;

/// Default bound on the depth of a copied decay chain.
pub const DEFAULT_MAX_DEPTH: usize = 4096;

/// Inclusive window on the spatial vertex radius.
///
/// ```
/// use decay_skim::RadiusWindow;
///
/// let window = RadiusWindow::new(100.0, 10000.0).unwrap();
/// assert!(window.contains(100.0));
/// assert!(window.contains(10000.0));
/// assert!(!window.contains(99.999));
///
/// assert!(RadiusWindow::new(5.0, 1.0).is_err());
/// ```
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RadiusWindow {
    min: f64,
    max: f64,
}

impl RadiusWindow {
    /// Creates a window `[min, max]`.
    ///
    /// Returns [`ConfigError::InvalidWindow`] if either bound is NaN or
    /// `min > max`. A degenerate window `min == max` is allowed.
    pub fn new(min: f64, max: f64) -> Result<Self, ConfigError> {
        let window = Self { min, max };
        window.check()?;
        Ok(window)
    }

    /// Lower bound (inclusive).
    #[must_use]
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Upper bound (inclusive).
    #[must_use]
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Returns `true` if `radius` lies inside the window, bounds included.
    #[must_use]
    pub fn contains(&self, radius: f64) -> bool {
        self.min <= radius && radius <= self.max
    }

    // Deserialized windows bypass `new`, so configs re-check here.
    pub(crate) fn check(&self) -> Result<(), ConfigError> {
        if self.min.is_nan() || self.max.is_nan() || self.min > self.max {
            return Err(ConfigError::InvalidWindow {
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

impl Default for RadiusWindow {
    fn default() -> Self {
        Self {
            min: DEFAULT_MIN_RADIUS,
            max: DEFAULT_MAX_RADIUS,
        }
    }
}

/// Ordered set of identity codes a mother must match to qualify as a root.
///
/// An empty whitelist admits every mother. Codes keep their insertion order
/// and duplicates are dropped.
///
/// ```
/// use decay_skim::Whitelist;
///
/// let open = Whitelist::new();
/// assert!(open.admits(42));
///
/// let list: Whitelist = [9900016, 1000022, 9900016].into_iter().collect();
/// assert_eq!(list.codes(), &[9900016, 1000022]);
/// assert!(list.admits(1000022));
/// assert!(!list.admits(42));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Whitelist {
    codes: Vec<i32>,
}

impl Whitelist {
    /// Creates an empty whitelist, which admits every identity.
    #[must_use]
    pub fn new() -> Self {
        Self { codes: Vec::new() }
    }

    /// Adds a code. Returns `false` if it was already listed.
    pub fn insert(&mut self, code: i32) -> bool {
        if self.codes.contains(&code) {
            return false;
        }
        self.codes.push(code);
        true
    }

    /// Returns `true` if `code` is listed.
    #[must_use]
    pub fn contains(&self, code: i32) -> bool {
        self.codes.contains(&code)
    }

    /// Returns `true` if a mother with `identity` qualifies: the list is
    /// empty, or lists `identity`.
    #[must_use]
    pub fn admits(&self, identity: i32) -> bool {
        self.codes.is_empty() || self.contains(identity)
    }

    /// Listed codes in insertion order.
    #[must_use]
    pub fn codes(&self) -> &[i32] {
        &self.codes
    }

    /// Number of listed codes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    /// Returns `true` if no code is listed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

impl FromIterator<i32> for Whitelist {
    fn from_iter<I: IntoIterator<Item = i32>>(iter: I) -> Self {
        let mut list = Self::new();
        list.extend(iter);
        list
    }
}

impl Extend<i32> for Whitelist {
    fn extend<I: IntoIterator<Item = i32>>(&mut self, iter: I) {
        for code in iter {
            self.insert(code);
        }
    }
}

/// What a batch emits.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EmitMode {
    /// Select roots and copy their full decay subtrees, reindexed.
    #[default]
    SubtreeExtract,
    /// Copy every node inside the radius window unmodified. No subtrees,
    /// no reindexing: links in the output still refer to the input forest.
    PassThrough,
}

/// How the selector treats a vertex-of-interest that has no mother.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MissingMotherPolicy {
    /// Log the node, count it, and keep scanning.
    ///
    /// Primary particles of an event have no mother, so this is the default.
    #[default]
    Skip,
    /// Abort the batch with [`SkimError::MissingMother`](crate::SkimError::MissingMother).
    Fail,
}

/// Immutable configuration for a [`Skimmer`](crate::Skimmer).
///
/// ```
/// use decay_skim::{EmitMode, RadiusWindow, SkimConfig};
///
/// let config = SkimConfig::default()
///     .with_window(RadiusWindow::new(50.0, 500.0).unwrap())
///     .with_whitelist([9900016])
///     .with_emit_mode(EmitMode::SubtreeExtract);
///
/// assert_eq!(config.window.min(), 50.0);
/// assert!(config.whitelist.contains(9900016));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SkimConfig {
    /// Radius window for vertices of interest.
    pub window: RadiusWindow,
    /// Identity codes a mother must match. Empty admits all.
    pub whitelist: Whitelist,
    /// Subtree extraction or pass-through.
    pub emit_mode: EmitMode,
    /// Treatment of motherless vertices of interest.
    pub missing_mother: MissingMotherPolicy,
    /// Bound on the depth of a copied decay chain.
    pub max_depth: usize,
    /// Run [`Forest::validate`](crate::Forest::validate) on every input before processing.
    pub validate_input: bool,
}

impl Default for SkimConfig {
    fn default() -> Self {
        Self {
            window: RadiusWindow::default(),
            whitelist: Whitelist::new(),
            emit_mode: EmitMode::default(),
            missing_mother: MissingMotherPolicy::default(),
            max_depth: DEFAULT_MAX_DEPTH,
            validate_input: false,
        }
    }
}

impl SkimConfig {
    /// Returns this config with the given radius window.
    #[must_use]
    pub fn with_window(mut self, window: RadiusWindow) -> Self {
        self.window = window;
        self
    }

    /// Returns this config with the given whitelist.
    #[must_use]
    pub fn with_whitelist(mut self, codes: impl IntoIterator<Item = i32>) -> Self {
        self.whitelist = codes.into_iter().collect();
        self
    }

    /// Returns this config with the given emit mode.
    #[must_use]
    pub fn with_emit_mode(mut self, emit_mode: EmitMode) -> Self {
        self.emit_mode = emit_mode;
        self
    }

    /// Returns this config with the given missing-mother policy.
    #[must_use]
    pub fn with_missing_mother(mut self, policy: MissingMotherPolicy) -> Self {
        self.missing_mother = policy;
        self
    }

    /// Returns this config with the given depth bound.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Returns this config with input validation switched on or off.
    #[must_use]
    pub fn with_validate_input(mut self, validate_input: bool) -> Self {
        self.validate_input = validate_input;
        self
    }

    /// Checks the window and the depth bound.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.window.check()?;
        if self.max_depth == 0 {
            return Err(ConfigError::ZeroDepth);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_window() {
        let config = SkimConfig::default();
        assert_eq!(config.window.min(), 100.0);
        assert_eq!(config.window.max(), 10000.0);
        assert!(config.whitelist.is_empty());
        assert_eq!(config.emit_mode, EmitMode::SubtreeExtract);
        assert_eq!(config.missing_mother, MissingMotherPolicy::Skip);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn window_rejects_nan_and_inverted_bounds() {
        assert!(RadiusWindow::new(f64::NAN, 1.0).is_err());
        assert!(RadiusWindow::new(0.0, f64::NAN).is_err());
        assert_eq!(
            RadiusWindow::new(2.0, 1.0),
            Err(ConfigError::InvalidWindow { min: 2.0, max: 1.0 })
        );
        assert!(RadiusWindow::new(1.0, 1.0).is_ok());
        assert!(RadiusWindow::new(0.0, f64::INFINITY).is_ok());
    }

    #[test]
    fn zero_depth_is_rejected() {
        let config = SkimConfig::default().with_max_depth(0);
        assert_eq!(config.validate(), Err(ConfigError::ZeroDepth));
    }

    #[test]
    fn whitelist_dedups_in_insertion_order() {
        let mut list = Whitelist::new();
        assert!(list.insert(3));
        assert!(list.insert(1));
        assert!(!list.insert(3));
        assert_eq!(list.codes(), &[3, 1]);
        assert_eq!(list.len(), 2);
    }
}
