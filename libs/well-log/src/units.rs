//! Property unit conversion matrix
//!
//! Density and pore-pressure normalized values are converted to pressure
//! through the hydrostatic column above each sample, so those conversions
//! need one TVD-RKB value (meters) per property value. Unsupported pairs
//! return `None` and callers keep the unconverted values.

use serde::{Deserialize, Serialize};

/// Standard gravity used for the hydrostatic column
pub const GRAVITY: f64 = 9.81;

/// Unit weight of water in N/m3
pub const UNIT_WEIGHT_OF_WATER: f64 = 9810.0;

pub const PASCAL_PER_BAR: f64 = 1.0e5;

const KG_PER_M3_PER_G_PER_CM3: f64 = 1000.0;

/// Units a well-log property can be expressed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PropertyUnit {
    /// Density, also written as SG_EMW
    GramPerCm3,
    Bar,
    /// Hundreds of bar
    BarX100,
    MPa,
    /// Normalized by hydrostatic pore pressure
    NoUnit,
}

/// Name table, first entry per unit is canonical
const UNIT_NAMES: [(&str, PropertyUnit); 6] = [
    ("g/cm3", PropertyUnit::GramPerCm3),
    ("SG_EMW", PropertyUnit::GramPerCm3),
    ("Bar", PropertyUnit::Bar),
    ("Bar x100", PropertyUnit::BarX100),
    ("MPa", PropertyUnit::MPa),
    ("NO_UNIT", PropertyUnit::NoUnit),
];

impl PropertyUnit {
    /// Look up a unit name, case-insensitive
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        UNIT_NAMES
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, unit)| *unit)
    }

    pub fn as_str(&self) -> &'static str {
        UNIT_NAMES
            .iter()
            .find(|(_, unit)| unit == self)
            .map(|(key, _)| *key)
            .unwrap_or_default()
    }

    /// Conversions to and from this unit depend on sample depth
    pub fn is_depth_dependent(&self) -> bool {
        matches!(self, PropertyUnit::GramPerCm3 | PropertyUnit::NoUnit)
    }
}

impl std::fmt::Display for PropertyUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Hydrostatic water pressure in bar at a TVD-RKB in meters
pub fn hydrostatic_pressure_bar(tvd_rkb: f64) -> f64 {
    UNIT_WEIGHT_OF_WATER * tvd_rkb / PASCAL_PER_BAR
}

pub fn gpcm3_to_bar(tvd_rkb: &[f64], values: &[f64]) -> Vec<f64> {
    tvd_rkb
        .iter()
        .zip(values)
        .map(|(depth, value)| value * KG_PER_M3_PER_G_PER_CM3 * GRAVITY * depth / PASCAL_PER_BAR)
        .collect()
}

pub fn bar_to_gpcm3(tvd_rkb: &[f64], values: &[f64]) -> Vec<f64> {
    tvd_rkb
        .iter()
        .zip(values)
        .map(|(depth, value)| value * PASCAL_PER_BAR / (KG_PER_M3_PER_G_PER_CM3 * GRAVITY * depth))
        .collect()
}

pub fn normalized_to_bar(tvd_rkb: &[f64], values: &[f64]) -> Vec<f64> {
    tvd_rkb
        .iter()
        .zip(values)
        .map(|(depth, value)| value * hydrostatic_pressure_bar(*depth))
        .collect()
}

pub fn bar_to_normalized(tvd_rkb: &[f64], values: &[f64]) -> Vec<f64> {
    tvd_rkb
        .iter()
        .zip(values)
        .map(|(depth, value)| value / hydrostatic_pressure_bar(*depth))
        .collect()
}

fn scale(values: &[f64], factor: f64) -> Vec<f64> {
    values.iter().map(|v| v * factor).collect()
}

/// Convert `values` from one unit to another
///
/// Returns `None` when the pair has no conversion, or when a depth
/// dependent conversion is given a TVD-RKB sequence of the wrong length.
pub fn convert_values(
    tvd_rkb: &[f64],
    values: &[f64],
    from: PropertyUnit,
    to: PropertyUnit,
) -> Option<Vec<f64>> {
    use PropertyUnit::*;

    if from == to {
        return Some(values.to_vec());
    }
    if (from.is_depth_dependent() || to.is_depth_dependent()) && tvd_rkb.len() != values.len() {
        return None;
    }

    let converted = match (from, to) {
        (GramPerCm3, Bar) => gpcm3_to_bar(tvd_rkb, values),
        (Bar, GramPerCm3) => bar_to_gpcm3(tvd_rkb, values),
        (GramPerCm3, BarX100) => scale(&gpcm3_to_bar(tvd_rkb, values), 0.01),
        (BarX100, GramPerCm3) => bar_to_gpcm3(tvd_rkb, &scale(values, 100.0)),
        (NoUnit, Bar) => normalized_to_bar(tvd_rkb, values),
        (Bar, NoUnit) => bar_to_normalized(tvd_rkb, values),
        (MPa, Bar) => scale(values, 10.0),
        (Bar, MPa) => scale(values, 0.1),
        (Bar, BarX100) => scale(values, 0.01),
        (BarX100, Bar) => scale(values, 100.0),
        (BarX100, MPa) => scale(values, 10.0),
        (MPa, BarX100) => scale(values, 0.1),
        _ => return None,
    };
    Some(converted)
}

/// Name based variant of [`convert_values`]
///
/// Identical names (ignoring case) convert to themselves even when the name
/// is not a known unit.
pub fn convert_values_by_name(
    tvd_rkb: &[f64],
    values: &[f64],
    from: &str,
    to: &str,
) -> Option<Vec<f64>> {
    if from.trim().eq_ignore_ascii_case(to.trim()) {
        return Some(values.to_vec());
    }
    let from = PropertyUnit::from_name(from)?;
    let to = PropertyUnit::from_name(to)?;
    convert_values(tvd_rkb, values, from, to)
}
