//! Keyword data model
//!
//! A keyword is a name, a `DataType`, an element count and a payload of
//! exactly `count * element_size` bytes held in host byte order. The payload
//! is either owned by the keyword or borrowed from caller storage; only owned
//! payloads can be resized.

use std::fmt;

use crate::data_type::DataType;
use crate::error::{EclError, Result};

/// Significant characters in a keyword name
pub const NAME_LENGTH: usize = 8;

/// Integer sentinel stored for a true logical; any nonzero value reads as true
pub const BOOL_TRUE: i32 = -1;

/// Integer sentinel stored for a false logical
pub const BOOL_FALSE: i32 = 0;

mod private {
    pub trait Sealed {}
    impl Sealed for i32 {}
    impl Sealed for f32 {}
    impl Sealed for f64 {}
    impl Sealed for bool {}
}

/// Fixed-width element stored in a numeric keyword payload
pub trait Element: Copy + PartialOrd + fmt::Debug + private::Sealed + 'static {
    /// Keyword type holding elements of this Rust type
    const DATA_TYPE: DataType;

    /// Decode from host order bytes
    fn read_ne(bytes: &[u8]) -> Self;

    /// Encode into host order bytes
    fn write_ne(self, out: &mut [u8]);
}

impl Element for i32 {
    const DATA_TYPE: DataType = DataType::Int;

    fn read_ne(bytes: &[u8]) -> Self {
        i32::from_ne_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
    }

    fn write_ne(self, out: &mut [u8]) {
        out[..4].copy_from_slice(&self.to_ne_bytes());
    }
}

impl Element for f32 {
    const DATA_TYPE: DataType = DataType::Float;

    fn read_ne(bytes: &[u8]) -> Self {
        f32::from_ne_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
    }

    fn write_ne(self, out: &mut [u8]) {
        out[..4].copy_from_slice(&self.to_ne_bytes());
    }
}

impl Element for f64 {
    const DATA_TYPE: DataType = DataType::Double;

    fn read_ne(bytes: &[u8]) -> Self {
        let mut raw = [0u8; 8];
        raw.copy_from_slice(&bytes[..8]);
        f64::from_ne_bytes(raw)
    }

    fn write_ne(self, out: &mut [u8]) {
        out[..8].copy_from_slice(&self.to_ne_bytes());
    }
}

impl Element for bool {
    const DATA_TYPE: DataType = DataType::Bool;

    fn read_ne(bytes: &[u8]) -> Self {
        i32::read_ne(bytes) != BOOL_FALSE
    }

    fn write_ne(self, out: &mut [u8]) {
        let sentinel = if self { BOOL_TRUE } else { BOOL_FALSE };
        sentinel.write_ne(out);
    }
}

/// Name, type and element count as stored in a keyword header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordHeader {
    pub name: String,
    pub data_type: DataType,
    pub count: usize,
}

impl KeywordHeader {
    pub fn new(name: impl Into<String>, data_type: DataType, count: usize) -> Self {
        Self {
            name: trim_name(&name.into()),
            data_type,
            count,
        }
    }
}

/// Keyword payload storage
#[derive(Debug)]
pub enum Payload<'a> {
    /// Buffer owned by the keyword
    Owned(Vec<u8>),
    /// Caller-owned storage, never reallocated
    Shared(&'a mut [u8]),
}

impl Payload<'_> {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Payload::Owned(buf) => buf,
            Payload::Shared(buf) => buf,
        }
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        match self {
            Payload::Owned(buf) => buf,
            Payload::Shared(buf) => buf,
        }
    }

    pub fn is_shared(&self) -> bool {
        matches!(self, Payload::Shared(_))
    }
}

/// A named, typed, fixed-length record
#[derive(Debug)]
pub struct Keyword<'a> {
    name: String,
    data_type: DataType,
    count: usize,
    payload: Payload<'a>,
}

impl Keyword<'static> {
    /// Create an owned keyword with a zero-filled payload
    pub fn new(name: impl Into<String>, data_type: DataType, count: usize) -> Self {
        Self {
            name: trim_name(&name.into()),
            data_type,
            count,
            payload: Payload::Owned(vec![0u8; data_type.payload_size(count)]),
        }
    }

    /// Allocate the zero-filled keyword a header announces, ready for `read_data`
    ///
    /// The full payload is allocated up front. `FortIo::read_keyword` instead
    /// grows its buffer as data arrives, which suits untrusted headers.
    pub fn from_header(header: &KeywordHeader) -> Self {
        Self::new(header.name.clone(), header.data_type, header.count)
    }

    /// Wrap a payload read from a stream; `payload` holds exactly the
    /// elements `header` announces
    pub(crate) fn from_payload(header: KeywordHeader, payload: Vec<u8>) -> Self {
        debug_assert_eq!(payload.len(), header.data_type.payload_size(header.count));
        Self {
            name: header.name,
            data_type: header.data_type,
            count: header.count,
            payload: Payload::Owned(payload),
        }
    }

    /// Create an owned numeric keyword from values
    pub fn from_values<T: Element>(name: impl Into<String>, values: &[T]) -> Self {
        let mut keyword = Self::new(name, T::DATA_TYPE, values.len());
        let size = T::DATA_TYPE.element_size();
        for (slot, value) in keyword
            .payload
            .as_bytes_mut()
            .chunks_exact_mut(size)
            .zip(values)
        {
            value.write_ne(slot);
        }
        keyword
    }

    /// Create an owned CHAR keyword; longer strings are truncated to 8 bytes
    pub fn from_strings<S: AsRef<str>>(name: impl Into<String>, values: &[S]) -> Self {
        Self::from_strings_with_type(name, DataType::Char, values)
    }

    /// Create an owned keyword of any alphanumeric type from strings
    pub fn from_strings_with_type<S: AsRef<str>>(
        name: impl Into<String>,
        data_type: DataType,
        values: &[S],
    ) -> Self {
        assert!(
            data_type.is_alphanumeric(),
            "string keyword requires an alphanumeric type, got {}",
            data_type
        );
        let mut keyword = Self::new(name, data_type, values.len());
        if data_type.element_size() > 0 {
            for (index, value) in values.iter().enumerate() {
                keyword.set_str(index, value.as_ref());
            }
        }
        keyword
    }
}

impl<'a> Keyword<'a> {
    /// Wrap caller-owned storage of exactly `count * element_size` bytes
    ///
    /// The buffer is interpreted in host byte order and is never reallocated.
    pub fn shared(
        name: impl Into<String>,
        data_type: DataType,
        count: usize,
        storage: &'a mut [u8],
    ) -> Result<Self> {
        let expected = data_type.payload_size(count);
        if storage.len() != expected {
            return Err(EclError::data_read(format!(
                "shared storage holds {} bytes, {} x {} needs {}",
                storage.len(),
                count,
                data_type,
                expected
            )));
        }
        Ok(Self {
            name: trim_name(&name.into()),
            data_type,
            count,
            payload: Payload::Shared(storage),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn header(&self) -> KeywordHeader {
        KeywordHeader {
            name: self.name.clone(),
            data_type: self.data_type,
            count: self.count,
        }
    }

    /// Raw payload in host byte order
    pub fn as_bytes(&self) -> &[u8] {
        self.payload.as_bytes()
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        self.payload.as_bytes_mut()
    }

    pub fn is_shared(&self) -> bool {
        self.payload.is_shared()
    }

    /// Compare names ignoring trailing blanks
    pub fn name_equal(&self, name: &str) -> bool {
        self.name == trim_name(name)
    }

    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = trim_name(&name.into());
    }

    // ------------------------------------------------------------------
    // Typed access
    // ------------------------------------------------------------------

    fn assert_type(&self, expected: DataType) {
        assert_eq!(
            self.data_type, expected,
            "type mismatch on keyword {}: stored {}, requested {}",
            self.name, self.data_type, expected
        );
    }

    fn slot_range(&self, index: usize) -> std::ops::Range<usize> {
        assert!(
            index < self.count,
            "index {} out of range for keyword {} with {} elements",
            index,
            self.name,
            self.count
        );
        let size = self.data_type.element_size();
        index * size..(index + 1) * size
    }

    /// Element at `index`; panics on a type mismatch or an out of range index
    pub fn get<T: Element>(&self, index: usize) -> T {
        self.assert_type(T::DATA_TYPE);
        let range = self.slot_range(index);
        T::read_ne(&self.as_bytes()[range])
    }

    /// Overwrite the element at `index`
    pub fn set<T: Element>(&mut self, index: usize, value: T) {
        self.assert_type(T::DATA_TYPE);
        let range = self.slot_range(index);
        value.write_ne(&mut self.as_bytes_mut()[range]);
    }

    /// Iterate over all elements
    pub fn iter<T: Element>(&self) -> impl Iterator<Item = T> + '_ {
        self.assert_type(T::DATA_TYPE);
        self.as_bytes()
            .chunks_exact(T::DATA_TYPE.element_size())
            .map(T::read_ne)
    }

    /// Copy all elements out
    pub fn values<T: Element>(&self) -> Vec<T> {
        self.iter().collect()
    }

    /// Set every element to `value`
    pub fn scalar_set<T: Element>(&mut self, value: T) {
        self.assert_type(T::DATA_TYPE);
        let size = T::DATA_TYPE.element_size();
        for slot in self.as_bytes_mut().chunks_exact_mut(size) {
            value.write_ne(slot);
        }
    }

    /// Smallest and largest element, `None` for an empty keyword
    ///
    /// NaN elements never become the minimum or maximum.
    pub fn min_max<T: Element>(&self) -> Option<(T, T)> {
        let mut values = self.iter::<T>();
        let first = values.next()?;
        Some(values.fold((first, first), |(min, max), v| {
            let min = if v < min || min.partial_cmp(&min).is_none() {
                v
            } else {
                min
            };
            let max = if v > max || max.partial_cmp(&max).is_none() {
                v
            } else {
                max
            };
            (min, max)
        }))
    }

    /// Sum of all elements as f64
    pub fn sum<T: Element + Into<f64>>(&self) -> f64 {
        self.iter::<T>().map(Into::into).sum()
    }

    /// String at `index` with trailing blanks and NULs removed
    pub fn get_str(&self, index: usize) -> String {
        assert!(
            self.data_type.is_alphanumeric(),
            "type mismatch on keyword {}: {} is not a character type",
            self.name,
            self.data_type
        );
        let range = self.slot_range(index);
        let slot = &self.as_bytes()[range];
        String::from_utf8_lossy(slot)
            .trim_end_matches([' ', '\0'])
            .to_string()
    }

    /// Store `value` blank-padded (or truncated) to the element width
    pub fn set_str(&mut self, index: usize, value: &str) {
        assert!(
            self.data_type.is_alphanumeric(),
            "type mismatch on keyword {}: {} is not a character type",
            self.name,
            self.data_type
        );
        let range = self.slot_range(index);
        let slot = &mut self.as_bytes_mut()[range];
        slot.fill(b' ');
        let bytes = value.as_bytes();
        let n = bytes.len().min(slot.len());
        slot[..n].copy_from_slice(&bytes[..n]);
    }

    /// All strings of a character keyword
    pub fn strings(&self) -> Vec<String> {
        (0..self.count).map(|i| self.get_str(i)).collect()
    }

    // ------------------------------------------------------------------
    // Shape changes and copies
    // ------------------------------------------------------------------

    /// Change the element count, zero-filling new elements
    pub fn resize(&mut self, count: usize) -> Result<()> {
        match &mut self.payload {
            Payload::Owned(buf) => {
                buf.resize(self.data_type.payload_size(count), 0);
                self.count = count;
                Ok(())
            }
            Payload::Shared(_) => Err(EclError::SharedPayload(self.name.clone())),
        }
    }

    /// Owned deep copy
    pub fn to_owned_keyword(&self) -> Keyword<'static> {
        Keyword {
            name: self.name.clone(),
            data_type: self.data_type,
            count: self.count,
            payload: Payload::Owned(self.as_bytes().to_vec()),
        }
    }

    /// Owned copy of elements `start, start + stride, ...` below `stop`
    ///
    /// `stop` is clamped to the element count; a `stride` of 0 is treated as 1.
    pub fn slice_copy(&self, start: usize, stop: usize, stride: usize) -> Keyword<'static> {
        let stop = stop.min(self.count);
        let stride = stride.max(1);
        let size = self.data_type.element_size();
        let indices: Vec<usize> = (start..stop).step_by(stride).collect();

        let mut payload = Vec::with_capacity(indices.len() * size);
        for index in &indices {
            payload.extend_from_slice(&self.as_bytes()[index * size..(index + 1) * size]);
        }
        Keyword {
            name: self.name.clone(),
            data_type: self.data_type,
            count: indices.len(),
            payload: Payload::Owned(payload),
        }
    }

    // ------------------------------------------------------------------
    // Comparison
    // ------------------------------------------------------------------

    /// Same name, type and count
    pub fn header_equal(&self, other: &Keyword<'_>) -> bool {
        self.name == other.name && self.data_type == other.data_type && self.count == other.count
    }

    /// Bitwise payload equality
    pub fn data_equal(&self, other: &Keyword<'_>) -> bool {
        self.data_type == other.data_type && self.as_bytes() == other.as_bytes()
    }

    /// Element-wise numeric comparison
    ///
    /// Two elements match when `|a - b| <= abs_epsilon` or
    /// `|a - b| <= rel_epsilon * max(|a|, |b|)`. Non-numeric keywords fall
    /// back to bitwise equality.
    pub fn numeric_equal(&self, other: &Keyword<'_>, abs_epsilon: f64, rel_epsilon: f64) -> bool {
        if !self.header_equal(other) {
            return false;
        }
        let close = |a: f64, b: f64| {
            let diff = (a - b).abs();
            diff <= abs_epsilon || diff <= rel_epsilon * a.abs().max(b.abs())
        };
        match self.data_type {
            DataType::Int => self
                .iter::<i32>()
                .zip(other.iter::<i32>())
                .all(|(a, b)| close(a as f64, b as f64)),
            DataType::Float => self
                .iter::<f32>()
                .zip(other.iter::<f32>())
                .all(|(a, b)| close(a as f64, b as f64)),
            DataType::Double => self
                .iter::<f64>()
                .zip(other.iter::<f64>())
                .all(|(a, b)| close(a, b)),
            _ => self.data_equal(other),
        }
    }
}

impl PartialEq for Keyword<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.header_equal(other) && self.data_equal(other)
    }
}

impl fmt::Display for Keyword<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<8}  {:>10}  {}",
            self.name,
            self.count,
            self.data_type.type_code()
        )
    }
}

/// Names are compared and stored without trailing blanks
fn trim_name(name: &str) -> String {
    name.trim_end_matches([' ', '\0']).to_string()
}
