//! Curve configuration

use serde::{Deserialize, Serialize};

/// Tolerances used when building and resampling curves
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurveConfig {
    /// Measured depth gap that splits extraction curve intervals
    pub depth_diff_tolerance: f64,
    /// Two depths closer than this are the same sample
    pub depth_match_tolerance: f64,
}

impl Default for CurveConfig {
    fn default() -> Self {
        Self {
            depth_diff_tolerance: 0.1,
            depth_match_tolerance: 1e-8,
        }
    }
}
