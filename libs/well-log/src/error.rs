//! Curve Error Types

use thiserror::Error;

use crate::depth::DepthType;

/// Result type for well-log operations
pub type Result<T> = std::result::Result<T, CurveError>;

/// Curve construction and resampling errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CurveError {
    /// A depth sequence does not pair up with the property values
    #[error("Length mismatch for {depth_type}: expected {expected} values, found {found}")]
    LengthMismatch {
        depth_type: DepthType,
        expected: usize,
        found: usize,
    },

    /// The requested depth axis is neither stored nor derivable
    #[error("Depth type not available: {0}")]
    MissingDepthType(DepthType),

    /// Resampling a curve without samples
    #[error("Curve has no samples")]
    EmptyCurve,

    /// Fixed-step resampling needs a positive finite step
    #[error("Invalid step size: {0}")]
    InvalidStepSize(f64),
}

impl CurveError {
    pub fn length_mismatch(depth_type: DepthType, expected: usize, found: usize) -> Self {
        CurveError::LengthMismatch {
            depth_type,
            expected,
            found,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = CurveError::length_mismatch(DepthType::MeasuredDepth, 4, 3);
        assert_eq!(
            err.to_string(),
            "Length mismatch for MEASURED_DEPTH: expected 4 values, found 3"
        );
        assert_eq!(
            CurveError::MissingDepthType(DepthType::TrueVerticalDepthRkb).to_string(),
            "Depth type not available: TRUE_VERTICAL_DEPTH_RKB"
        );
    }
}
