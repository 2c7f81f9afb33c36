//! Curve resampling
//!
//! Two derived-copy operations on [`CurveSeries`]:
//! - `resample`: onto arbitrary target depths along any available axis,
//!   interpolating inside the stored samples and extrapolating linearly
//!   beyond them
//! - `resample_with_step`: onto a regular measured depth grid
//!
//! Neither mutates the source curve.

use std::collections::BTreeMap;

use tracing::debug;

use crate::curve::{CurveOptions, CurveSeries};
use crate::depth::DepthType;
use crate::error::{CurveError, Result};

/// Where a target depth falls relative to the stored samples
#[derive(Debug, Clone, Copy, PartialEq)]
enum Position {
    /// Coincides with a stored sample
    Exact(usize),
    /// Between (or beyond) samples `i0` and `i1`, at fraction `t`
    Interpolated { i0: usize, i1: usize, t: f64 },
}

/// Fraction of the way from `d0` to `d1`; zero on a degenerate segment
fn fraction(target: f64, d0: f64, d1: f64, tolerance: f64) -> f64 {
    let span = d1 - d0;
    if span.abs() < tolerance {
        0.0
    } else {
        (target - d0) / span
    }
}

fn lerp(v0: f64, v1: f64, t: f64) -> f64 {
    v0 + t * (v1 - v0)
}

/// Linear scan over stored depths with a cursor that only moves forward
///
/// Monotone targets are located in one pass overall. A target not found
/// ahead of the cursor is searched again from the first sample, so the
/// result does not depend on target order.
struct SegmentSearch<'a> {
    depths: &'a [f64],
    tolerance: f64,
    cursor: usize,
}

impl<'a> SegmentSearch<'a> {
    fn new(depths: &'a [f64], tolerance: f64) -> Self {
        Self {
            depths,
            tolerance,
            cursor: 0,
        }
    }

    fn locate(&mut self, target: f64) -> Position {
        if let Some(position) = self.scan(self.cursor, target) {
            return position;
        }
        if self.cursor > 0 {
            if let Some(position) = self.scan(0, target) {
                return position;
            }
        }
        self.extrapolate(target)
    }

    fn scan(&mut self, from: usize, target: f64) -> Option<Position> {
        let depths = self.depths;
        for index in from..depths.len() {
            if (depths[index] - target).abs() < self.tolerance {
                self.cursor = index;
                return Some(Position::Exact(index));
            }
            if index + 1 < depths.len() {
                let (d0, d1) = (depths[index], depths[index + 1]);
                if d0.min(d1) < target && target < d0.max(d1) {
                    self.cursor = index;
                    return Some(Position::Interpolated {
                        i0: index,
                        i1: index + 1,
                        t: fraction(target, d0, d1, self.tolerance),
                    });
                }
            }
        }
        None
    }

    /// Beyond the stored samples: extend the end segment nearest to `target`
    ///
    /// The segment is anchored at its end sample (`i0`), so a degenerate end
    /// segment yields that sample's value.
    fn extrapolate(&self, target: f64) -> Position {
        let depths = self.depths;
        let last = depths.len() - 1;
        if last == 0 {
            return Position::Interpolated { i0: 0, i1: 0, t: 0.0 };
        }

        let before_first = (target - depths[0]).abs() <= (target - depths[last]).abs();
        let (i0, i1) = if before_first { (0, 1) } else { (last, last - 1) };
        Position::Interpolated {
            i0,
            i1,
            t: fraction(target, depths[i0], depths[i1], self.tolerance),
        }
    }
}

impl CurveSeries {
    /// Resample onto `target_depths` along `depth_type`
    ///
    /// Targets that coincide with a stored depth (within the configured match
    /// tolerance) copy that sample verbatim. Other targets interpolate the
    /// property value and every stored depth axis with the same fraction;
    /// targets outside the stored range extrapolate from the first or last
    /// two samples. A curve with one sample resamples flat.
    ///
    /// The result is not an extraction curve.
    pub fn resample(&self, depth_type: DepthType, target_depths: &[f64]) -> Result<CurveSeries> {
        if self.is_empty() {
            return Err(CurveError::EmptyCurve);
        }
        let axis = self.depths(depth_type);
        if axis.is_empty() {
            return Err(CurveError::MissingDepthType(depth_type));
        }

        let values = self.property_values();
        let stored = self.stored_depths();
        let mut search = SegmentSearch::new(&axis, self.config().depth_match_tolerance);

        let mut resampled_values = Vec::with_capacity(target_depths.len());
        let mut resampled_depths: BTreeMap<DepthType, Vec<f64>> = stored
            .keys()
            .map(|key| (*key, Vec::with_capacity(target_depths.len())))
            .collect();

        for &target in target_depths {
            match search.locate(target) {
                Position::Exact(index) => {
                    resampled_values.push(values[index]);
                    for (key, sequence) in stored {
                        push_depth(&mut resampled_depths, *key, sequence[index]);
                    }
                }
                Position::Interpolated { i0, i1, t } => {
                    resampled_values.push(lerp(values[i0], values[i1], t));
                    for (key, sequence) in stored {
                        let depth = if *key == depth_type {
                            target
                        } else {
                            lerp(sequence[i0], sequence[i1], t)
                        };
                        push_depth(&mut resampled_depths, *key, depth);
                    }
                }
            }
        }

        debug!(
            %depth_type,
            source_samples = self.len(),
            targets = target_depths.len(),
            "Resampled curve"
        );
        CurveSeries::from_values_and_depths(
            resampled_values,
            resampled_depths,
            self.derived_options(),
        )
    }

    /// Resample onto a regular measured depth grid
    ///
    /// Samples are placed at `md[0] + k * step` for every `k` up to the last
    /// measured depth, walking the stored measured depth segments in order.
    /// Property values and TVD (when available) are interpolated; other axes
    /// are dropped.
    pub fn resample_with_step(&self, step: f64) -> Result<CurveSeries> {
        if !step.is_finite() || step <= 0.0 {
            return Err(CurveError::InvalidStepSize(step));
        }
        if self.is_empty() {
            return Err(CurveError::EmptyCurve);
        }
        let md = self.depths(DepthType::MeasuredDepth);
        if md.is_empty() {
            return Err(CurveError::MissingDepthType(DepthType::MeasuredDepth));
        }
        let tvd = self.depths(DepthType::TrueVerticalDepth);
        let values = self.property_values();
        let tolerance = self.config().depth_match_tolerance;

        let mut resampled_md = Vec::new();
        let mut resampled_tvd = Vec::new();
        let mut resampled_values = Vec::new();

        if md.len() == 1 {
            resampled_md.push(md[0]);
            resampled_values.push(values[0]);
            resampled_tvd.extend(tvd.first().copied());
        }

        let mut step_index = 0u64;
        let mut segment = 0;
        while segment + 1 < md.len() {
            let current = md[0] + step_index as f64 * step;
            let (start, end) = (md[segment], md[segment + 1]);
            if current <= end {
                let t = fraction(current, start, end, tolerance);
                resampled_md.push(current);
                resampled_values.push(lerp(values[segment], values[segment + 1], t));
                if !tvd.is_empty() {
                    resampled_tvd.push(lerp(tvd[segment], tvd[segment + 1], t));
                }
                step_index += 1;
            } else {
                segment += 1;
            }
        }

        let mut depths = BTreeMap::from([(DepthType::MeasuredDepth, resampled_md)]);
        if !tvd.is_empty() {
            depths.insert(DepthType::TrueVerticalDepth, resampled_tvd);
        }

        debug!(
            step,
            source_samples = self.len(),
            samples = resampled_values.len(),
            "Resampled curve on measured depth step"
        );
        CurveSeries::from_values_and_depths(resampled_values, depths, self.derived_options())
    }

    fn derived_options(&self) -> CurveOptions {
        self.options().clone().extraction(false)
    }
}

fn push_depth(depths: &mut BTreeMap<DepthType, Vec<f64>>, key: DepthType, value: f64) {
    if let Some(sequence) = depths.get_mut(&key) {
        sequence.push(value);
    }
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)] // Test code - unwrap is acceptable
mod tests {
    use super::*;

    fn curve(values: Vec<f64>, depths: Vec<(DepthType, Vec<f64>)>) -> CurveSeries {
        CurveSeries::from_values_and_depths(
            values,
            depths.into_iter().collect(),
            CurveOptions::default(),
        )
        .unwrap()
    }

    fn assert_close(actual: &[f64], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len(), "{:?} vs {:?}", actual, expected);
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < 1e-9, "{:?} vs {:?}", actual, expected);
        }
    }

    #[test]
    fn test_segment_search_exact_and_between() {
        let depths = [0.0, 10.0, 20.0];
        let mut search = SegmentSearch::new(&depths, 1e-8);
        assert_eq!(search.locate(10.0), Position::Exact(1));
        assert_eq!(
            search.locate(15.0),
            Position::Interpolated {
                i0: 1,
                i1: 2,
                t: 0.5
            }
        );
        // Behind the cursor: restarts from the first sample
        assert_eq!(
            search.locate(5.0),
            Position::Interpolated {
                i0: 0,
                i1: 1,
                t: 0.5
            }
        );
    }

    #[test]
    fn test_segment_search_extrapolates_nearest_end() {
        let depths = [0.0, 10.0, 20.0];
        let mut search = SegmentSearch::new(&depths, 1e-8);
        assert_eq!(
            search.locate(-5.0),
            Position::Interpolated {
                i0: 0,
                i1: 1,
                t: -0.5
            }
        );
        assert_eq!(
            search.locate(25.0),
            Position::Interpolated {
                i0: 2,
                i1: 1,
                t: -0.5
            }
        );
    }

    #[test]
    fn test_interpolates_every_axis() {
        let source = curve(
            vec![1.0, 3.0],
            vec![
                (DepthType::MeasuredDepth, vec![100.0, 200.0]),
                (DepthType::TrueVerticalDepth, vec![90.0, 170.0]),
            ],
        );
        let resampled = source.resample(DepthType::MeasuredDepth, &[150.0]).unwrap();
        assert_close(resampled.property_values(), &[2.0]);
        assert_close(&resampled.depths(DepthType::MeasuredDepth), &[150.0]);
        assert_close(&resampled.depths(DepthType::TrueVerticalDepth), &[130.0]);
    }

    #[test]
    fn test_resample_along_derived_axis() {
        let source = CurveSeries::from_values_and_depths(
            vec![1.0, 3.0],
            BTreeMap::from([
                (DepthType::MeasuredDepth, vec![100.0, 200.0]),
                (DepthType::TrueVerticalDepth, vec![90.0, 170.0]),
            ]),
            CurveOptions::default().with_rkb_diff(10.0),
        )
        .unwrap();

        let resampled = source
            .resample(DepthType::TrueVerticalDepthRkb, &[140.0])
            .unwrap();
        assert_close(resampled.property_values(), &[2.0]);
        assert_close(&resampled.depths(DepthType::TrueVerticalDepth), &[130.0]);
        assert_close(&resampled.depths(DepthType::TrueVerticalDepthRkb), &[140.0]);
    }

    #[test]
    fn test_stacked_depths_use_zero_slope() {
        let source = curve(
            vec![1.0, 5.0, 9.0],
            vec![(DepthType::MeasuredDepth, vec![0.0, 10.0, 10.0])],
        );
        // Extrapolating past the last, zero-length segment keeps the last value
        let resampled = source.resample(DepthType::MeasuredDepth, &[12.0]).unwrap();
        assert_close(resampled.property_values(), &[9.0]);
        assert_close(&resampled.depths(DepthType::MeasuredDepth), &[12.0]);

        let source = curve(
            vec![3.0, 1.0, 9.0],
            vec![(DepthType::MeasuredDepth, vec![0.0, 0.0, 10.0])],
        );
        let resampled = source.resample(DepthType::MeasuredDepth, &[-2.0]).unwrap();
        assert_close(resampled.property_values(), &[3.0]);
    }

    #[test]
    fn test_extrapolation_is_anchored_at_end_sample() {
        let source = curve(
            vec![1.0, 2.0, 4.0],
            vec![
                (DepthType::MeasuredDepth, vec![0.0, 10.0, 20.0]),
                (DepthType::TrueVerticalDepth, vec![0.0, 8.0, 16.0]),
            ],
        );
        let resampled = source
            .resample(DepthType::MeasuredDepth, &[25.0, -5.0])
            .unwrap();
        assert_close(resampled.property_values(), &[5.0, 0.5]);
        assert_close(
            &resampled.depths(DepthType::TrueVerticalDepth),
            &[20.0, -4.0],
        );
    }

    #[test]
    fn test_descending_connection_numbers() {
        let source = curve(
            vec![10.0, 20.0, 30.0],
            vec![(DepthType::ConnectionNumber, vec![3.0, 2.0, 1.0])],
        );
        let resampled = source
            .resample(DepthType::ConnectionNumber, &[3.0, 2.5, 1.5, 0.0])
            .unwrap();
        assert_close(resampled.property_values(), &[10.0, 15.0, 25.0, 40.0]);
    }

    #[test]
    fn test_single_sample_is_flat() {
        let source = curve(vec![7.0], vec![(DepthType::MeasuredDepth, vec![100.0])]);
        let resampled = source
            .resample(DepthType::MeasuredDepth, &[50.0, 100.0, 150.0])
            .unwrap();
        assert_eq!(resampled.property_values(), &[7.0, 7.0, 7.0]);
        assert_eq!(
            resampled.depths(DepthType::MeasuredDepth),
            vec![50.0, 100.0, 150.0]
        );
    }

    #[test]
    fn test_resample_errors() {
        assert_eq!(
            CurveSeries::new()
                .resample(DepthType::MeasuredDepth, &[1.0])
                .unwrap_err(),
            CurveError::EmptyCurve
        );

        let source = curve(vec![1.0], vec![(DepthType::MeasuredDepth, vec![1.0])]);
        assert_eq!(
            source
                .resample(DepthType::TrueVerticalDepth, &[1.0])
                .unwrap_err(),
            CurveError::MissingDepthType(DepthType::TrueVerticalDepth)
        );
    }

    #[test]
    fn test_resampled_copy_is_not_extraction_curve() {
        let source = CurveSeries::from_values_and_depths(
            vec![1.0, 2.0],
            BTreeMap::from([(DepthType::MeasuredDepth, vec![0.0, 1.0])]),
            CurveOptions::default().extraction(true),
        )
        .unwrap();
        let resampled = source.resample(DepthType::MeasuredDepth, &[0.5]).unwrap();
        assert!(!resampled.is_extraction_curve());
        assert!(source.is_extraction_curve());
    }

    #[test]
    fn test_fixed_step() {
        let source = curve(
            vec![0.0, 10.0, 30.0],
            vec![
                (DepthType::MeasuredDepth, vec![100.0, 110.0, 120.0]),
                (DepthType::TrueVerticalDepth, vec![100.0, 105.0, 110.0]),
            ],
        );
        let resampled = source.resample_with_step(4.0).unwrap();
        assert_close(
            &resampled.depths(DepthType::MeasuredDepth),
            &[100.0, 104.0, 108.0, 112.0, 116.0, 120.0],
        );
        assert_close(
            resampled.property_values(),
            &[0.0, 4.0, 8.0, 14.0, 22.0, 30.0],
        );
        assert_close(
            &resampled.depths(DepthType::TrueVerticalDepth),
            &[100.0, 102.0, 104.0, 106.0, 108.0, 110.0],
        );
    }

    #[test]
    fn test_fixed_step_without_tvd() {
        let source = curve(
            vec![1.0, 2.0],
            vec![(DepthType::MeasuredDepth, vec![0.0, 1.0])],
        );
        let resampled = source.resample_with_step(0.25).unwrap();
        assert_eq!(resampled.len(), 5);
        assert!(resampled.depths(DepthType::TrueVerticalDepth).is_empty());
        assert_eq!(
            resampled.available_depth_types(),
            vec![DepthType::MeasuredDepth]
        );
    }

    #[test]
    fn test_fixed_step_errors() {
        let source = curve(vec![1.0], vec![(DepthType::TrueVerticalDepth, vec![1.0])]);
        for step in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                source.resample_with_step(step),
                Err(CurveError::InvalidStepSize(_))
            ));
        }
        assert_eq!(
            source.resample_with_step(1.0).unwrap_err(),
            CurveError::MissingDepthType(DepthType::MeasuredDepth)
        );
    }
}
