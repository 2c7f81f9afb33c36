//! Curve Series Property Tests
//!
//! - Depth derivation between TVD and TVD-RKB
//! - Resampling onto the stored grid is exact
//! - Linear extrapolation beyond both ends
//! - Valid interval coverage and extraction splitting
//! - Density / pressure unit round trip

#![allow(clippy::disallowed_methods)] // Test code - unwrap is acceptable

use std::collections::BTreeMap;

use well_log::units::{self, PropertyUnit};
use well_log::{CurveConfig, CurveOptions, CurveSeries, DepthType, DepthUnit, ValidInterval};

fn survey() -> (Vec<f64>, BTreeMap<DepthType, Vec<f64>>) {
    let md: Vec<f64> = (0..40).map(|i| 1500.0 + 12.5 * i as f64).collect();
    let tvd: Vec<f64> = md.iter().map(|d| 1400.0 + 0.8 * (d - 1500.0)).collect();
    let values: Vec<f64> = md.iter().map(|d| 0.2 + ((d - 1500.0) / 100.0).sin() * 0.05).collect();
    let depths = BTreeMap::from([
        (DepthType::MeasuredDepth, md),
        (DepthType::TrueVerticalDepth, tvd),
    ]);
    (values, depths)
}

#[test]
fn test_depth_derivation_invariant() {
    for rkb_diff in [25.0, -3.5, 0.0] {
        let (values, depths) = survey();
        let options = CurveOptions::default().with_rkb_diff(rkb_diff);

        let from_tvd =
            CurveSeries::from_values_and_depths(values.clone(), depths.clone(), options.clone())
                .unwrap();

        let tvd_rkb: Vec<f64> = depths[&DepthType::TrueVerticalDepth]
            .iter()
            .map(|d| d + rkb_diff)
            .collect();
        let from_rkb = CurveSeries::from_values_and_depths(
            values,
            BTreeMap::from([(DepthType::TrueVerticalDepthRkb, tvd_rkb)]),
            options,
        )
        .unwrap();

        for curve in [&from_tvd, &from_rkb] {
            let tvd = curve.depths(DepthType::TrueVerticalDepth);
            let rkb = curve.depths(DepthType::TrueVerticalDepthRkb);
            assert_eq!(tvd.len(), rkb.len());
            for (t, r) in tvd.iter().zip(&rkb) {
                assert!((r - t - rkb_diff).abs() < 1e-9);
            }
        }
    }
}

#[test]
fn test_resample_onto_own_depths_is_exact() {
    let (values, depths) = survey();
    let md = depths[&DepthType::MeasuredDepth].clone();
    let curve = CurveSeries::from_values_and_depths(values.clone(), depths, CurveOptions::default())
        .unwrap();

    let resampled = curve.resample(DepthType::MeasuredDepth, &md).unwrap();
    assert_eq!(resampled.len(), values.len());
    for (a, b) in resampled.property_values().iter().zip(&values) {
        assert!((a - b).abs() < 1e-8);
    }
    assert_eq!(
        resampled.depths(DepthType::TrueVerticalDepth),
        curve.depths(DepthType::TrueVerticalDepth)
    );
}

#[test]
fn test_resample_with_unordered_targets() {
    let (values, depths) = survey();
    let curve = CurveSeries::from_values_and_depths(values, depths, CurveOptions::default())
        .unwrap();

    let ordered = curve
        .resample(DepthType::MeasuredDepth, &[1510.0, 1700.0, 1900.0])
        .unwrap();
    let shuffled = curve
        .resample(DepthType::MeasuredDepth, &[1900.0, 1510.0, 1700.0])
        .unwrap();

    let a = ordered.property_values();
    let b = shuffled.property_values();
    assert_eq!(a[0], b[1]);
    assert_eq!(a[1], b[2]);
    assert_eq!(a[2], b[0]);
}

#[test]
fn test_extrapolation_beyond_both_ends() {
    let md = vec![100.0, 102.0, 104.0, 110.0];
    let values = vec![5.0, 6.0, 4.0, 1.0];
    let mut curve = CurveSeries::new();
    curve
        .set_values_and_depth(
            values,
            md,
            DepthType::MeasuredDepth,
            CurveOptions::default(),
        )
        .unwrap();

    let first_slope = (6.0 - 5.0) / 2.0;
    let last_slope = (1.0 - 4.0) / 6.0;
    let resampled = curve
        .resample(DepthType::MeasuredDepth, &[99.0, 111.0])
        .unwrap();
    let v = resampled.property_values();
    assert!((v[0] - (5.0 - first_slope)).abs() < 1e-12);
    assert!((v[1] - (1.0 + last_slope)).abs() < 1e-12);
}

#[test]
fn test_all_valid_curve_is_one_interval() {
    let (values, depths) = survey();
    let n = values.len();
    let curve = CurveSeries::from_values_and_depths(values, depths, CurveOptions::default())
        .unwrap();
    assert_eq!(curve.valid_intervals(), &[ValidInterval::new(0, n - 1)]);
    assert_eq!(curve.polyline_start_stop_indices(), vec![(0, n - 1)]);
}

#[test]
fn test_extraction_curve_splits_at_md_gap() {
    let md = vec![0.0, 10.0, 10.0, 10.2, 50.0, 60.0];
    let options = CurveOptions::default().extraction(true);
    let mut curve = CurveSeries::new();
    curve
        .set_values_and_depth(vec![1.0; 6], md.clone(), DepthType::MeasuredDepth, options.clone())
        .unwrap();
    assert_eq!(
        curve.valid_intervals(),
        &[ValidInterval::new(0, 3), ValidInterval::new(4, 5)]
    );
    assert_eq!(
        curve.depth_range(DepthType::MeasuredDepth, DepthUnit::Meter),
        Some((0.0, 60.0))
    );

    // Same data, not an extraction curve
    curve
        .set_values_and_depth(
            vec![1.0; 6],
            md.clone(),
            DepthType::MeasuredDepth,
            CurveOptions::default(),
        )
        .unwrap();
    assert_eq!(curve.valid_intervals().len(), 1);

    // A wider tolerance keeps the gap
    let options = options.with_config(CurveConfig {
        depth_diff_tolerance: 50.0,
        ..CurveConfig::default()
    });
    curve
        .set_values_and_depth(vec![1.0; 6], md, DepthType::MeasuredDepth, options)
        .unwrap();
    assert_eq!(curve.valid_intervals().len(), 1);
}

#[test]
fn test_density_pressure_round_trip() {
    let tvd_rkb = [500.0, 1250.0, 2800.0, 4100.0];
    for density in [0.8, 1.03, 1.6, 2.5] {
        let values = vec![density; tvd_rkb.len()];
        let bar = units::gpcm3_to_bar(&tvd_rkb, &values);
        let back =
            units::convert_values(&tvd_rkb, &bar, PropertyUnit::Bar, PropertyUnit::GramPerCm3)
                .unwrap();
        for v in back {
            assert!((v - density).abs() < 1e-12);
        }
    }
}

#[test]
fn test_curve_unit_conversion_in_feet() {
    // TVD-RKB of 3280.84 ft is 1000 m
    let curve = CurveSeries::from_values_and_depths(
        vec![1.0],
        BTreeMap::from([(DepthType::TrueVerticalDepthRkb, vec![1000.0 / 0.3048])]),
        CurveOptions::default()
            .with_depth_unit(DepthUnit::Feet)
            .with_property_unit("SG_EMW"),
    )
    .unwrap();
    let bar = curve.property_values_in_unit("bar");
    assert!((bar[0] - 98.1).abs() < 1e-9);
}
