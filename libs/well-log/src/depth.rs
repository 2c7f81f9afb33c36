//! Depth axes and depth units

use serde::{Deserialize, Serialize};

/// Meters per foot
pub const METERS_PER_FOOT: f64 = 0.3048;

/// Depth representation a curve can be indexed by
///
/// `ConnectionNumber` is an ordinal axis; it is usually stored in
/// descending order and never converted between units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DepthType {
    MeasuredDepth,
    TrueVerticalDepth,
    TrueVerticalDepthRkb,
    ConnectionNumber,
}

const DEPTH_TYPE_NAMES: [(DepthType, &str, &str); 4] = [
    (DepthType::MeasuredDepth, "MEASURED_DEPTH", "Measured Depth"),
    (DepthType::TrueVerticalDepth, "TRUE_VERTICAL_DEPTH", "True Vertical Depth (MSL)"),
    (DepthType::TrueVerticalDepthRkb, "TRUE_VERTICAL_DEPTH_RKB", "True Vertical Depth (RKB)"),
    (DepthType::ConnectionNumber, "CONNECTION_NUMBER", "Connection Number"),
];

impl DepthType {
    pub const ALL: [DepthType; 4] = [
        DepthType::MeasuredDepth,
        DepthType::TrueVerticalDepth,
        DepthType::TrueVerticalDepthRkb,
        DepthType::ConnectionNumber,
    ];

    /// Look up by canonical name, case-insensitive
    pub fn from_name(name: &str) -> Option<Self> {
        DEPTH_TYPE_NAMES
            .iter()
            .find(|(_, key, _)| key.eq_ignore_ascii_case(name.trim()))
            .map(|(depth_type, _, _)| *depth_type)
    }

    pub fn as_str(&self) -> &'static str {
        self.names().1
    }

    /// Human readable axis title
    pub fn label(&self) -> &'static str {
        self.names().2
    }

    /// The axis this one is derived from via the RKB offset, if any
    pub fn rkb_counterpart(&self) -> Option<Self> {
        match self {
            DepthType::TrueVerticalDepth => Some(DepthType::TrueVerticalDepthRkb),
            DepthType::TrueVerticalDepthRkb => Some(DepthType::TrueVerticalDepth),
            _ => None,
        }
    }

    /// Metric axes take part in depth unit conversion
    pub fn is_metric(&self) -> bool {
        !matches!(self, DepthType::ConnectionNumber)
    }

    fn names(&self) -> &'static (DepthType, &'static str, &'static str) {
        // Table order follows declaration order
        &DEPTH_TYPE_NAMES[*self as usize]
    }
}

impl std::fmt::Display for DepthType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Unit of the depth axes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DepthUnit {
    #[default]
    Meter,
    Feet,
    /// Unitless axis (connection numbers)
    None,
}

impl DepthUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            DepthUnit::Meter => "m",
            DepthUnit::Feet => "ft",
            DepthUnit::None => "",
        }
    }
}

/// Convert depth values between units
///
/// Identity when the units match or either side is `DepthUnit::None`.
pub fn convert_depths(values: &[f64], from: DepthUnit, to: DepthUnit) -> Vec<f64> {
    match (from, to) {
        (DepthUnit::Meter, DepthUnit::Feet) => values.iter().map(|v| v / METERS_PER_FOOT).collect(),
        (DepthUnit::Feet, DepthUnit::Meter) => values.iter().map(|v| v * METERS_PER_FOOT).collect(),
        _ => values.to_vec(),
    }
}
