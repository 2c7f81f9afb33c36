//! Keyword element types
//!
//! The 4 character type code of a keyword header maps to one `DataType`.
//! Sizes, block sizes and formatted column counts hang off the variant.

use std::fmt;

/// Numeric and boolean data is blocked in groups of this many elements
pub const NUMERIC_BLOCK_SIZE: usize = 1000;

/// Character data is blocked in groups of this many elements
pub const CHAR_BLOCK_SIZE: usize = 105;

/// Width of a CHAR element
pub const CHAR_WIDTH: usize = 8;

/// Largest width a `C0nn` string type can describe
pub const MAX_STRING_WIDTH: usize = 999;

/// Element type of a keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    /// 32-bit signed integer (`INTE`)
    Int,
    /// 32-bit IEEE float (`REAL`)
    Float,
    /// 64-bit IEEE float (`DOUB`)
    Double,
    /// Logical stored as a 32-bit integer sentinel (`LOGI`)
    Bool,
    /// 8 byte fixed string (`CHAR`)
    Char,
    /// Fixed string of the given width (`C0nn`)
    String(usize),
    /// Message keyword without payload (`MESS`)
    Message,
}

/// Static type code table for the fixed-width variants
const TYPE_CODES: [(DataType, &str); 6] = [
    (DataType::Int, "INTE"),
    (DataType::Float, "REAL"),
    (DataType::Double, "DOUB"),
    (DataType::Bool, "LOGI"),
    (DataType::Char, "CHAR"),
    (DataType::Message, "MESS"),
];

impl DataType {
    /// Map a header type code to a data type
    ///
    /// Trailing blanks and NUL bytes are ignored. `C0nn` codes describe
    /// strings of width `nn` (three decimal digits after the `C`).
    pub fn from_type_code(code: &str) -> Option<Self> {
        let code = code.trim_end_matches([' ', '\0']);
        if let Some((data_type, _)) = TYPE_CODES.iter().find(|(_, c)| *c == code) {
            return Some(*data_type);
        }

        let digits = code.strip_prefix('C')?;
        if digits.len() != 3 || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        match digits.parse::<usize>() {
            Ok(width) if width > 0 => Some(Self::String(width)),
            _ => None,
        }
    }

    /// The 4 character code written to headers
    pub fn type_code(&self) -> String {
        match self {
            Self::String(width) => format!("C{:03}", width),
            other => TYPE_CODES
                .iter()
                .find(|(t, _)| t == other)
                .map(|(_, code)| (*code).to_string())
                .unwrap_or_default(),
        }
    }

    /// Size in bytes of one element
    pub fn element_size(&self) -> usize {
        match self {
            Self::Int | Self::Float | Self::Bool => 4,
            Self::Double => 8,
            Self::Char => CHAR_WIDTH,
            Self::String(width) => *width,
            Self::Message => 0,
        }
    }

    /// Number of elements per data block
    pub fn block_size(&self) -> usize {
        if self.is_alphanumeric() {
            CHAR_BLOCK_SIZE
        } else {
            NUMERIC_BLOCK_SIZE
        }
    }

    /// Elements per line in formatted files
    pub fn format_columns(&self) -> usize {
        match self {
            Self::Int => 6,
            Self::Float => 4,
            Self::Double => 3,
            Self::Bool => 25,
            Self::Char | Self::String(_) => 7,
            Self::Message => 1,
        }
    }

    /// Character types occupy fixed-width text slots and are never byte-flipped
    pub fn is_alphanumeric(&self) -> bool {
        matches!(self, Self::Char | Self::String(_) | Self::Message)
    }

    /// Check if this type holds numeric (or boolean) data
    pub fn is_numeric(&self) -> bool {
        !self.is_alphanumeric()
    }

    /// Payload bytes for `count` elements
    pub fn payload_size(&self, count: usize) -> usize {
        count * self.element_size()
    }

    /// Bytes occupied on disk by the binary data region of `count` elements,
    /// including the leading and trailing marker of every block
    pub fn data_size(&self, count: usize) -> u64 {
        let element_size = self.element_size();
        if element_size == 0 || count == 0 {
            return 0;
        }
        let block_size = self.block_size();
        let blocks = count.div_ceil(block_size);
        (blocks * 8 + count * element_size) as u64
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_code())
    }
}
