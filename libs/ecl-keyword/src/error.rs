//! Keyword Codec Error Types
//!
//! Every failure is terminal for the current keyword read or write; callers
//! decide whether to abandon the whole file.

use thiserror::Error;

/// Result type for ecl-keyword operations
pub type Result<T> = std::result::Result<T, EclError>;

/// Keyword codec errors
#[derive(Debug, Error)]
pub enum EclError {
    /// Malformed or truncated keyword header
    #[error("Header read failure: {0}")]
    HeaderRead(String),

    /// Truncated or malformed data region
    #[error("Data read failure: {0}")]
    DataRead(String),

    /// Leading and trailing FORTRAN record markers disagree
    #[error("Record marker mismatch: expected {expected}, found {found}")]
    RecordMarkerMismatch { expected: i64, found: i64 },

    /// Seek miss with abort requested
    #[error("Keyword not found: {0}")]
    KeywordNotFound(String),

    /// Stream ended cleanly before the first byte of a header
    #[error("End of stream")]
    EndOfStream,

    /// Keyword name cannot be serialized into the 8 character field
    #[error("Invalid keyword name: {0}")]
    InvalidName(String),

    /// Value cannot be represented in the file layout
    #[error("Encode failure: {0}")]
    Encode(String),

    /// Attempt to resize a payload borrowed from caller storage
    #[error("Cannot resize shared payload of keyword {0}")]
    SharedPayload(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

// Helper methods for creating errors
impl EclError {
    pub fn header_read(msg: impl Into<String>) -> Self {
        EclError::HeaderRead(msg.into())
    }

    pub fn data_read(msg: impl Into<String>) -> Self {
        EclError::DataRead(msg.into())
    }

    pub fn encode(msg: impl Into<String>) -> Self {
        EclError::Encode(msg.into())
    }

    pub fn not_found(name: impl Into<String>) -> Self {
        EclError::KeywordNotFound(name.into())
    }

    pub fn invalid_name(name: impl Into<String>) -> Self {
        EclError::InvalidName(name.into())
    }

    /// Check if this error only signals a clean end of input
    pub fn is_end_of_stream(&self) -> bool {
        matches!(self, EclError::EndOfStream)
    }

    /// Check if this error indicates corrupted framing rather than short input
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            EclError::RecordMarkerMismatch { .. } | EclError::HeaderRead(_) | EclError::DataRead(_)
        )
    }
}
