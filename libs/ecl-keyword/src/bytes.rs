//! Binary data processing utilities
//!
//! Byte order selection for keyword payloads and the in-place element flips
//! applied after a raw read or before a raw write.

pub mod byte_order;
pub mod flip;

pub use byte_order::ByteOrder;
pub use flip::{flip_elements, flipped_copy};
