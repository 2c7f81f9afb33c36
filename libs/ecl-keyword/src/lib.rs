//! ECLIPSE keyword codec
//!
//! Reads and writes the self-describing records ("keywords") of ECLIPSE
//! simulator files: an 8 character name, an element count, a 4 character
//! type code and a typed payload.
//!
//! # Architecture
//!
//! - **Bytes**: file byte order and in-place element flips
//! - **DataType / Keyword**: element types and the typed payload model
//! - **FortIo**: FORTRAN record framing (binary) and tokenizing (formatted)
//! - **Reader / Writer**: header, data, skip and seek operations on `FortIo`
//!
//! # Example
//!
//! ```rust
//! use ecl_keyword::{FortIo, Keyword};
//! use std::io::Cursor;
//!
//! let pressure = Keyword::from_values("PRESSURE", &[250.0f32, 251.5, 249.75]);
//!
//! let mut out = FortIo::binary(Cursor::new(Vec::new()));
//! out.write_keyword(&pressure).unwrap();
//!
//! let mut input = FortIo::binary(Cursor::new(out.into_inner().into_inner()));
//! let read = input.read_keyword().unwrap().unwrap();
//! assert_eq!(read, pressure);
//! assert_eq!(read.get::<f32>(1), 251.5);
//! ```

pub mod bytes;
pub mod config;
pub mod data_type;
pub mod error;
pub mod formatted;
pub mod fortio;
pub mod keyword;
pub mod reader;
pub mod writer;

// Re-export core types
pub use bytes::ByteOrder;
pub use config::{CodecConfig, FormatSelection};
pub use data_type::{DataType, CHAR_BLOCK_SIZE, NUMERIC_BLOCK_SIZE};
pub use error::{EclError, Result};
pub use fortio::{FileFormat, FortIo};
pub use keyword::{Element, Keyword, KeywordHeader, Payload};
