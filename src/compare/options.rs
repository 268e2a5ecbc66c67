//! Comparison options and validation.

use crate::error::{Error, Result};

/// Default minimum text similarity for a candidate pairing.
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.8;

/// Default maximum top-left corner distance, in points, for a candidate pairing.
pub const DEFAULT_POSITION_TOLERANCE: f64 = 5.0;

/// Options controlling how pages are matched and classified.
#[derive(Debug, Clone, PartialEq)]
pub struct CompareOptions {
    /// Minimum normalized text similarity (0.0-1.0)
    pub similarity_threshold: f64,

    /// Maximum positional distance in points (>= 0)
    pub position_tolerance: f64,

    /// Suppress formatting-change detection and its influence on matching
    pub ignore_formatting: bool,

    /// Compare pages on the rayon thread pool
    pub parallel: bool,
}

impl CompareOptions {
    /// Create new compare options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the similarity threshold.
    pub fn with_similarity_threshold(mut self, threshold: f64) -> Self {
        self.similarity_threshold = threshold;
        self
    }

    /// Set the position tolerance in points.
    pub fn with_position_tolerance(mut self, tolerance: f64) -> Self {
        self.position_tolerance = tolerance;
        self
    }

    /// Enable or disable formatting checks.
    pub fn with_ignore_formatting(mut self, ignore: bool) -> Self {
        self.ignore_formatting = ignore;
        self
    }

    /// Ignore font, size and colour changes.
    pub fn ignore_formatting(mut self) -> Self {
        self.ignore_formatting = true;
        self
    }

    /// Enable or disable parallel page processing.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Reject out-of-range thresholds. Values are never clamped.
    pub fn validate(&self) -> Result<()> {
        let similarity = self.similarity_threshold;
        if !(0.0..=1.0).contains(&similarity) {
            return Err(Error::InvalidConfig(format!(
                "similarity threshold {} is outside [0, 1]",
                similarity
            )));
        }

        let tolerance = self.position_tolerance;
        if tolerance.is_nan() || tolerance < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "position tolerance {} must be a non-negative number of points",
                tolerance
            )));
        }

        Ok(())
    }
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self {
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            position_tolerance: DEFAULT_POSITION_TOLERANCE,
            ignore_formatting: false,
            parallel: false,
        }
    }
}
