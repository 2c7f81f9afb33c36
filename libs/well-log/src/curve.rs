//! Curve Series
//!
//! Property values paired with one or more depth axes. TVD and TVD-RKB are
//! never both stored: one is kept and the other derived with the RKB
//! offset whenever it is requested.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::config::CurveConfig;
use crate::depth::{convert_depths, DepthType, DepthUnit};
use crate::error::{CurveError, Result};
use crate::intervals::{self, ValidInterval};
use crate::units::{self, PropertyUnit};

/// Curve attributes that accompany the value and depth sequences
#[derive(Debug, Clone, PartialEq)]
pub struct CurveOptions {
    /// TVD-RKB minus TVD
    pub rkb_diff: f64,
    pub depth_unit: DepthUnit,
    pub property_unit: String,
    /// Samples come in (enter cell, exit cell) pairs from a grid extraction
    pub is_extraction_curve: bool,
    pub use_logarithmic_scale: bool,
    pub config: CurveConfig,
}

impl Default for CurveOptions {
    fn default() -> Self {
        Self {
            rkb_diff: 0.0,
            depth_unit: DepthUnit::Meter,
            property_unit: String::new(),
            is_extraction_curve: false,
            use_logarithmic_scale: false,
            config: CurveConfig::default(),
        }
    }
}

impl CurveOptions {
    pub fn with_rkb_diff(mut self, rkb_diff: f64) -> Self {
        self.rkb_diff = rkb_diff;
        self
    }

    pub fn with_depth_unit(mut self, depth_unit: DepthUnit) -> Self {
        self.depth_unit = depth_unit;
        self
    }

    pub fn with_property_unit(mut self, unit: impl Into<String>) -> Self {
        self.property_unit = unit.into();
        self
    }

    pub fn extraction(mut self, is_extraction_curve: bool) -> Self {
        self.is_extraction_curve = is_extraction_curve;
        self
    }

    pub fn logarithmic(mut self, use_logarithmic_scale: bool) -> Self {
        self.use_logarithmic_scale = use_logarithmic_scale;
        self
    }

    pub fn with_config(mut self, config: CurveConfig) -> Self {
        self.config = config;
        self
    }
}

/// Property values along a well with their depth axes
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CurveSeries {
    values: Vec<f64>,
    depths: BTreeMap<DepthType, Vec<f64>>,
    options: CurveOptions,
    intervals: Vec<ValidInterval>,
}

impl CurveSeries {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a curve in one step
    pub fn from_values_and_depths(
        values: Vec<f64>,
        depths: BTreeMap<DepthType, Vec<f64>>,
        options: CurveOptions,
    ) -> Result<Self> {
        let mut curve = Self::new();
        curve.set_values_and_depths(values, depths, options)?;
        Ok(curve)
    }

    /// Replace all curve data and recompute the valid intervals
    ///
    /// Every depth sequence must have one value per property value; on a
    /// mismatch the curve is left untouched. When both TVD and TVD-RKB are
    /// given, TVD is kept and TVD-RKB is derived from it.
    pub fn set_values_and_depths(
        &mut self,
        values: Vec<f64>,
        mut depths: BTreeMap<DepthType, Vec<f64>>,
        options: CurveOptions,
    ) -> Result<()> {
        for (depth_type, sequence) in &depths {
            if sequence.len() != values.len() {
                return Err(CurveError::length_mismatch(
                    *depth_type,
                    values.len(),
                    sequence.len(),
                ));
            }
        }

        if depths.contains_key(&DepthType::TrueVerticalDepth) {
            if let Some(tvd_rkb) = depths.remove(&DepthType::TrueVerticalDepthRkb) {
                check_rkb_consistency(&depths[&DepthType::TrueVerticalDepth], &tvd_rkb, &options);
            }
        }

        self.values = values;
        self.depths = depths;
        self.options = options;
        self.intervals = self.compute_valid_intervals();

        debug!(
            samples = self.values.len(),
            depth_types = self.depths.len(),
            intervals = self.intervals.len(),
            "Curve data set"
        );
        Ok(())
    }

    /// Single depth axis shorthand for [`CurveSeries::set_values_and_depths`]
    pub fn set_values_and_depth(
        &mut self,
        values: Vec<f64>,
        depths: Vec<f64>,
        depth_type: DepthType,
        options: CurveOptions,
    ) -> Result<()> {
        self.set_values_and_depths(values, BTreeMap::from([(depth_type, depths)]), options)
    }

    fn compute_valid_intervals(&self) -> Vec<ValidInterval> {
        let intervals =
            intervals::valid_value_intervals(&self.values, self.options.use_logarithmic_scale);
        match self.depths.get(&DepthType::MeasuredDepth) {
            Some(md) if self.options.is_extraction_curve => intervals::split_at_depth_gaps(
                &intervals,
                md,
                self.options.config.depth_diff_tolerance,
            ),
            _ => intervals,
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Property values in the stored unit
    pub fn property_values(&self) -> &[f64] {
        &self.values
    }

    pub fn property_unit(&self) -> &str {
        &self.options.property_unit
    }

    pub fn depth_unit(&self) -> DepthUnit {
        self.options.depth_unit
    }

    pub fn rkb_diff(&self) -> f64 {
        self.options.rkb_diff
    }

    pub fn is_extraction_curve(&self) -> bool {
        self.options.is_extraction_curve
    }

    pub fn use_logarithmic_scale(&self) -> bool {
        self.options.use_logarithmic_scale
    }

    pub fn options(&self) -> &CurveOptions {
        &self.options
    }

    pub fn config(&self) -> &CurveConfig {
        &self.options.config
    }

    /// Depth axes as stored, without derived ones
    pub fn stored_depths(&self) -> &BTreeMap<DepthType, Vec<f64>> {
        &self.depths
    }

    /// Depth values along `depth_type` in the curve's depth unit
    ///
    /// TVD and TVD-RKB are derived from each other when only one is stored.
    /// Returns an empty sequence when the axis is not available.
    pub fn depths(&self, depth_type: DepthType) -> Vec<f64> {
        if let Some(stored) = self.depths.get(&depth_type) {
            return stored.clone();
        }
        let rkb_diff = self.options.rkb_diff;
        match depth_type {
            DepthType::TrueVerticalDepthRkb => self
                .depths
                .get(&DepthType::TrueVerticalDepth)
                .map(|tvd| tvd.iter().map(|d| d + rkb_diff).collect())
                .unwrap_or_default(),
            DepthType::TrueVerticalDepth => self
                .depths
                .get(&DepthType::TrueVerticalDepthRkb)
                .map(|tvd_rkb| tvd_rkb.iter().map(|d| d - rkb_diff).collect())
                .unwrap_or_default(),
            _ => Vec::new(),
        }
    }

    /// Depth values along `depth_type` converted to `unit`
    ///
    /// Connection numbers are ordinal and returned unconverted.
    pub fn depths_in_unit(&self, depth_type: DepthType, unit: DepthUnit) -> Vec<f64> {
        let depths = self.depths(depth_type);
        if depth_type.is_metric() {
            convert_depths(&depths, self.options.depth_unit, unit)
        } else {
            depths
        }
    }

    pub fn has_depth_type(&self, depth_type: DepthType) -> bool {
        self.depths.contains_key(&depth_type)
            || depth_type
                .rkb_counterpart()
                .is_some_and(|counterpart| self.depths.contains_key(&counterpart))
    }

    /// Stored and derivable depth axes
    pub fn available_depth_types(&self) -> Vec<DepthType> {
        DepthType::ALL
            .into_iter()
            .filter(|depth_type| self.has_depth_type(*depth_type))
            .collect()
    }

    /// Property values converted to `target_unit`
    ///
    /// Depth dependent conversions use TVD-RKB in meters. When there is no
    /// conversion path between the units the stored values are returned.
    pub fn property_values_in_unit(&self, target_unit: &str) -> Vec<f64> {
        let stored_unit = self.options.property_unit.as_str();
        if stored_unit.trim().eq_ignore_ascii_case(target_unit.trim()) {
            return self.values.clone();
        }

        let (Some(from), Some(to)) = (
            PropertyUnit::from_name(stored_unit),
            PropertyUnit::from_name(target_unit),
        ) else {
            debug!(from = stored_unit, to = target_unit, "Unknown property unit, values kept");
            return self.values.clone();
        };

        let tvd_rkb = if from.is_depth_dependent() || to.is_depth_dependent() {
            self.depths_in_unit(DepthType::TrueVerticalDepthRkb, DepthUnit::Meter)
        } else {
            Vec::new()
        };
        units::convert_values(&tvd_rkb, &self.values, from, to).unwrap_or_else(|| {
            debug!(%from, %to, "No unit conversion available, values kept");
            self.values.clone()
        })
    }

    // ========================================================================
    // Valid intervals
    // ========================================================================

    pub fn valid_intervals(&self) -> &[ValidInterval] {
        &self.intervals
    }

    /// Values of every valid interval, concatenated
    pub fn property_values_by_intervals(&self) -> Vec<f64> {
        intervals::values_by_intervals(&self.values, &self.intervals)
    }

    /// Depths of every valid interval, concatenated
    ///
    /// Empty when the axis is not available.
    pub fn depth_values_by_intervals(&self, depth_type: DepthType, unit: DepthUnit) -> Vec<f64> {
        let depths = self.depths_in_unit(depth_type, unit);
        if depths.is_empty() {
            return depths;
        }
        intervals::values_by_intervals(&depths, &self.intervals)
    }

    /// Valid intervals re-indexed onto the concatenated per-interval arrays
    pub fn polyline_start_stop_indices(&self) -> Vec<(usize, usize)> {
        intervals::polyline_start_stop_indices(&self.intervals)
    }

    /// Minimum and maximum depth over the valid intervals
    ///
    /// Non-finite depths are skipped. `None` when there is no valid value or
    /// the axis is not available.
    pub fn depth_range(&self, depth_type: DepthType, unit: DepthUnit) -> Option<(f64, f64)> {
        self.depth_values_by_intervals(depth_type, unit)
            .into_iter()
            .filter(|depth| depth.is_finite())
            .fold(None, |range, depth| match range {
                None => Some((depth, depth)),
                Some((min, max)) => Some((f64::min(min, depth), f64::max(max, depth))),
            })
    }
}

fn check_rkb_consistency(tvd: &[f64], tvd_rkb: &[f64], options: &CurveOptions) {
    let tolerance = options.config.depth_match_tolerance;
    let mismatch = tvd.iter().zip(tvd_rkb).position(|(tvd, tvd_rkb)| {
        let expected = tvd + options.rkb_diff;
        (tvd_rkb - expected).abs() > tolerance * expected.abs().max(1.0)
    });
    if let Some(index) = mismatch {
        warn!(
            index,
            tvd = tvd[index],
            tvd_rkb = tvd_rkb[index],
            rkb_diff = options.rkb_diff,
            "TVD-RKB disagrees with TVD + RKB offset, deriving it from TVD"
        );
    }
}
