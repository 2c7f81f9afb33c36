//! File byte order representation
//!
//! Replaces a process-wide "flip endian" switch: every `FortIo` carries the
//! byte order of the file it wraps, and payloads are flipped only when that
//! order differs from the host.

use std::io::{self, Write};

use byteorder::{WriteBytesExt, BE, LE};
use serde::{Deserialize, Serialize};

/// Byte order of numeric data in a keyword file
///
/// For 32-bit value `0x12345678`:
/// - `BigEndian`: [0x12, 0x34, 0x56, 0x78]
/// - `LittleEndian`: [0x78, 0x56, 0x34, 0x12]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ByteOrder {
    /// Most significant byte first
    ///
    /// The order ECLIPSE writes unformatted files in.
    BigEndian,

    /// Least significant byte first
    LittleEndian,
}

impl ByteOrder {
    /// Convert from common string spellings
    ///
    /// - "BE", "BIG_ENDIAN", "ABCD" → BigEndian
    /// - "LE", "LITTLE_ENDIAN", "DCBA" → LittleEndian
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        let normalized = s.to_uppercase().replace('-', "_");
        match normalized.as_str() {
            "BE" | "BIG_ENDIAN" | "BIGENDIAN" | "ABCD" => Some(Self::BigEndian),
            "LE" | "LITTLE_ENDIAN" | "LITTLEENDIAN" | "DCBA" => Some(Self::LittleEndian),
            _ => None,
        }
    }

    /// Get descriptive name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BigEndian => "big-endian",
            Self::LittleEndian => "little-endian",
        }
    }

    /// Byte order of the host
    pub fn native() -> Self {
        if cfg!(target_endian = "big") {
            Self::BigEndian
        } else {
            Self::LittleEndian
        }
    }

    /// Check if payloads in this order can be used without flipping
    pub fn is_native(&self) -> bool {
        *self == Self::native()
    }

    /// Write one 32-bit signed integer
    pub fn write_i32<W: Write + ?Sized>(&self, writer: &mut W, value: i32) -> io::Result<()> {
        match self {
            Self::BigEndian => writer.write_i32::<BE>(value),
            Self::LittleEndian => writer.write_i32::<LE>(value),
        }
    }

    /// Decode a 32-bit signed integer already held in memory
    pub fn decode_i32(&self, bytes: [u8; 4]) -> i32 {
        match self {
            Self::BigEndian => i32::from_be_bytes(bytes),
            Self::LittleEndian => i32::from_le_bytes(bytes),
        }
    }

    /// Encode a 32-bit signed integer for in-memory assembly of a record
    pub fn encode_i32(&self, value: i32) -> [u8; 4] {
        match self {
            Self::BigEndian => value.to_be_bytes(),
            Self::LittleEndian => value.to_le_bytes(),
        }
    }
}

impl std::fmt::Display for ByteOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Default for ByteOrder {
    /// Default to big-endian (ECLIPSE unformatted files)
    fn default() -> Self {
        Self::BigEndian
    }
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)] // Test code - unwrap is acceptable
mod tests {
    use super::*;

    #[test]
    fn test_from_str_valid() {
        assert_eq!(ByteOrder::from_str("BE"), Some(ByteOrder::BigEndian));
        assert_eq!(ByteOrder::from_str("big-endian"), Some(ByteOrder::BigEndian));
        assert_eq!(ByteOrder::from_str("abcd"), Some(ByteOrder::BigEndian));
        assert_eq!(ByteOrder::from_str("le"), Some(ByteOrder::LittleEndian));
        assert_eq!(
            ByteOrder::from_str("LITTLE_ENDIAN"),
            Some(ByteOrder::LittleEndian)
        );
    }

    #[test]
    fn test_from_str_invalid() {
        assert_eq!(ByteOrder::from_str("CDAB"), None);
        assert_eq!(ByteOrder::from_str(""), None);
    }

    #[test]
    fn test_native_matches_target() {
        let native = ByteOrder::native();
        assert!(native.is_native());
        let other = match native {
            ByteOrder::BigEndian => ByteOrder::LittleEndian,
            ByteOrder::LittleEndian => ByteOrder::BigEndian,
        };
        assert!(!other.is_native());
    }

    #[test]
    fn test_integer_io() {
        let mut buf = Vec::new();
        ByteOrder::BigEndian.write_i32(&mut buf, 16).unwrap();
        ByteOrder::LittleEndian.write_i32(&mut buf, 16).unwrap();
        assert_eq!(buf, [0, 0, 0, 16, 16, 0, 0, 0]);

        assert_eq!(ByteOrder::BigEndian.decode_i32([0, 0, 0, 16]), 16);
        assert_eq!(ByteOrder::LittleEndian.decode_i32([16, 0, 0, 0]), 16);
        assert_eq!(ByteOrder::BigEndian.decode_i32([0, 0, 1, 0]), 256);
        assert_eq!(ByteOrder::LittleEndian.encode_i32(256), [0, 1, 0, 0]);
    }

    #[test]
    fn test_default() {
        assert_eq!(ByteOrder::default(), ByteOrder::BigEndian);
    }
}
