//! Well-log curve data
//!
//! A [`CurveSeries`] pairs property values with depth axes (measured depth,
//! TVD, TVD-RKB, connection number). It derives TVD from TVD-RKB and back,
//! converts property units through the hydrostatic column, resamples onto
//! new depths and reports the runs of valid values that plot as one line.
//!
//! ```
//! use well_log::{CurveOptions, CurveSeries, DepthType};
//!
//! let mut curve = CurveSeries::new();
//! curve
//!     .set_values_and_depth(
//!         vec![1.0, 3.0],
//!         vec![1000.0, 1100.0],
//!         DepthType::MeasuredDepth,
//!         CurveOptions::default(),
//!     )
//!     .unwrap();
//!
//! let resampled = curve.resample(DepthType::MeasuredDepth, &[1050.0]).unwrap();
//! assert_eq!(resampled.property_values(), &[2.0]);
//! ```

pub mod config;
pub mod curve;
pub mod depth;
pub mod error;
pub mod intervals;
mod resample;
pub mod units;

pub use config::CurveConfig;
pub use curve::{CurveOptions, CurveSeries};
pub use depth::{convert_depths, DepthType, DepthUnit};
pub use error::{CurveError, Result};
pub use intervals::ValidInterval;
pub use units::{convert_values, PropertyUnit};
