//! Parameters for plane fitting and quadric accumulation.

use qemcrate_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Parameters shared by the plane solver and the quadric accumulator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuadricConfig {
    /// Faces with `|e1 × e2| <= tolerance · |e1| · |e2|` are degenerate,
    /// i.e. the sine of the corner angle at the first vertex is below the
    /// tolerance. Default: 1e-10
    pub degeneracy_tolerance: f64,

    /// Process faces and vertices on the rayon thread pool. Default: true
    pub parallel: bool,

    /// Items processed between cancellation checks and progress reports.
    /// Default: 4096
    pub batch_size: usize,
}

impl Default for QuadricConfig {
    fn default() -> Self {
        Self {
            degeneracy_tolerance: 1e-10,
            parallel: true,
            batch_size: 4096,
        }
    }
}

impl QuadricConfig {
    /// Create default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the degeneracy tolerance
    pub fn with_degeneracy_tolerance(mut self, tolerance: f64) -> Self {
        self.degeneracy_tolerance = tolerance;
        self
    }

    /// Enable or disable parallel processing
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Set the batch size
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Batch size clamped to at least one item
    pub fn effective_batch_size(&self) -> usize {
        self.batch_size.max(1)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.degeneracy_tolerance.is_finite() || self.degeneracy_tolerance < 0.0 {
            return Err(Error::InvalidData(format!(
                "degeneracy tolerance must be finite and non-negative, got {}",
                self.degeneracy_tolerance
            )));
        }
        Ok(())
    }
}
