//! Codec configuration

use serde::{Deserialize, Serialize};

use crate::bytes::ByteOrder;

/// How the format of a file is chosen when it is opened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatSelection {
    /// Extension first, then content sniffing
    #[default]
    Auto,
    Binary,
    Formatted,
}

/// Keyword codec settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Byte order of numeric payloads and record markers in binary files
    pub byte_order: ByteOrder,
    pub format: FormatSelection,
}

impl CodecConfig {
    pub fn binary(byte_order: ByteOrder) -> Self {
        Self {
            byte_order,
            format: FormatSelection::Binary,
        }
    }

    pub fn formatted() -> Self {
        Self {
            byte_order: ByteOrder::default(),
            format: FormatSelection::Formatted,
        }
    }
}
