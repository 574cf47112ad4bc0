//! Engine configuration.

use stowage_core::{Error, Result, EPSILON};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration for the placement engine.
///
/// The defaults encode the numeric contract of the placement search:
/// changing them changes which spots the engine finds, so tests that
/// pin exact coordinates must share this configuration.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct EngineConfig {
    /// Tolerance for coordinate comparisons.
    pub epsilon: f64,

    /// Number of grid divisions per container axis.
    pub grid_divisions: f64,

    /// Lower bound on the grid step, so small containers still get a
    /// usable search resolution.
    pub min_grid_step: f64,

    /// Items with priority at or above this threshold are searched
    /// front-first and may trigger rearrangement.
    pub high_priority_threshold: i32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            epsilon: EPSILON,
            grid_divisions: 25.0,
            min_grid_step: 0.02,
            high_priority_threshold: 75,
        }
    }
}

impl EngineConfig {
    /// Creates a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the coordinate tolerance.
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Sets the number of grid divisions per axis.
    pub fn with_grid_divisions(mut self, divisions: f64) -> Self {
        self.grid_divisions = divisions;
        self
    }

    /// Sets the minimum grid step.
    pub fn with_min_grid_step(mut self, step: f64) -> Self {
        self.min_grid_step = step;
        self
    }

    /// Sets the high-priority threshold.
    pub fn with_high_priority_threshold(mut self, threshold: i32) -> Self {
        self.high_priority_threshold = threshold;
        self
    }

    /// Tolerance under which candidate base heights collapse into one
    /// shelf. Coarser than `epsilon` to absorb accumulated rounding on
    /// stacked items.
    pub fn shelf_tolerance(&self) -> f64 {
        self.epsilon * 10.0
    }

    /// Returns true if the given priority counts as high-priority.
    pub fn is_high_priority(&self, priority: i32) -> bool {
        priority >= self.high_priority_threshold
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.epsilon <= 0.0 {
            return Err(Error::ConfigError("epsilon must be positive".into()));
        }
        if self.grid_divisions < 1.0 {
            return Err(Error::ConfigError(
                "grid_divisions must be at least 1".into(),
            ));
        }
        if self.min_grid_step <= 0.0 {
            return Err(Error::ConfigError("min_grid_step must be positive".into()));
        }
        Ok(())
    }
}
