//! FORTRAN-style stream wrapper
//!
//! Binary (unformatted) files frame every record with a 4-byte length
//! marker before and after the payload. Formatted files carry no markers;
//! readers tokenize on whitespace and single quotes instead.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::Path;

use tracing::{trace, warn};

use crate::bytes::ByteOrder;
use crate::config::{CodecConfig, FormatSelection};
use crate::error::{EclError, Result};

/// Binary or formatted keyword file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileFormat {
    /// FORTRAN unformatted sequential records
    Binary,
    /// Fixed-column text
    Formatted,
}

impl FileFormat {
    /// Guess the format from ECLIPSE extension conventions
    ///
    /// `.FEGRID`, `.FUNRST`, `.F0001`... are formatted, `.EGRID`, `.UNRST`,
    /// `.X0001`... are binary. Unknown extensions return `None`.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_uppercase();
        const BINARY: [&str; 8] = [
            "EGRID", "GRID", "INIT", "UNRST", "SMSPEC", "UNSMRY", "RFT", "RSSPEC",
        ];
        const FORMATTED: [&str; 8] = [
            "FEGRID", "FGRID", "FINIT", "FUNRST", "FSMSPEC", "FUNSMRY", "FRFT", "FRSSPEC",
        ];

        if BINARY.contains(&ext.as_str()) {
            return Some(Self::Binary);
        }
        if FORMATTED.contains(&ext.as_str()) {
            return Some(Self::Formatted);
        }

        // Report steps: Xnnnn / Snnnn binary, Fnnnn / Annnn formatted
        if ext.len() != 5 || !ext.is_ascii() {
            return None;
        }
        let (prefix, digits) = ext.split_at(1);
        if digits.bytes().all(|b| b.is_ascii_digit()) {
            return match prefix {
                "X" | "S" => Some(Self::Binary),
                "F" | "A" => Some(Self::Formatted),
                _ => None,
            };
        }
        None
    }

    /// Guess the format from the leading bytes of a file
    ///
    /// A formatted file opens with printable text; a binary file opens with
    /// the 16-byte header record marker.
    pub fn sniff(prefix: &[u8]) -> Self {
        if prefix.is_empty() {
            return Self::Binary;
        }
        let printable = prefix
            .iter()
            .all(|b| b.is_ascii_graphic() || b.is_ascii_whitespace());
        if printable {
            Self::Formatted
        } else {
            Self::Binary
        }
    }
}

/// Keyword stream with its byte order and format
#[derive(Debug)]
pub struct FortIo<S> {
    stream: S,
    byte_order: ByteOrder,
    format: FileFormat,
}

impl<S> FortIo<S> {
    pub fn new(stream: S, byte_order: ByteOrder, format: FileFormat) -> Self {
        Self {
            stream,
            byte_order,
            format,
        }
    }

    /// Big-endian unformatted stream
    pub fn binary(stream: S) -> Self {
        Self::new(stream, ByteOrder::BigEndian, FileFormat::Binary)
    }

    /// Formatted text stream
    pub fn formatted(stream: S) -> Self {
        Self::new(stream, ByteOrder::default(), FileFormat::Formatted)
    }

    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    pub fn format(&self) -> FileFormat {
        self.format
    }

    pub fn is_formatted(&self) -> bool {
        self.format == FileFormat::Formatted
    }

    /// Numeric payloads need flipping between file and host order
    pub fn needs_flip(&self) -> bool {
        !self.byte_order.is_native()
    }

    pub fn get_ref(&self) -> &S {
        &self.stream
    }

    pub fn get_mut(&mut self) -> &mut S {
        &mut self.stream
    }

    pub fn into_inner(self) -> S {
        self.stream
    }
}

impl FortIo<BufReader<File>> {
    /// Open a keyword file for reading
    ///
    /// With `FormatSelection::Auto` the format comes from the file extension,
    /// or from the first bytes of the file when the extension is unknown.
    pub fn open<P: AsRef<Path>>(path: P, config: &CodecConfig) -> Result<Self> {
        let path = path.as_ref();
        let mut reader = BufReader::new(File::open(path)?);
        let format = match config.format {
            FormatSelection::Binary => FileFormat::Binary,
            FormatSelection::Formatted => FileFormat::Formatted,
            FormatSelection::Auto => match FileFormat::from_path(path) {
                Some(format) => format,
                None => {
                    let mut prefix = [0u8; 4];
                    let n = read_fill(&mut reader, &mut prefix)?;
                    reader.seek(SeekFrom::Start(0))?;
                    FileFormat::sniff(&prefix[..n])
                }
            },
        };
        trace!(path = %path.display(), ?format, "Opened keyword file");
        Ok(Self::new(reader, config.byte_order, format))
    }
}

impl FortIo<BufWriter<File>> {
    /// Create (truncate) a keyword file for writing
    ///
    /// `FormatSelection::Auto` resolves from the extension, defaulting to binary.
    pub fn create<P: AsRef<Path>>(path: P, config: &CodecConfig) -> Result<Self> {
        let path = path.as_ref();
        let format = match config.format {
            FormatSelection::Binary => FileFormat::Binary,
            FormatSelection::Formatted => FileFormat::Formatted,
            FormatSelection::Auto => FileFormat::from_path(path).unwrap_or(FileFormat::Binary),
        };
        let writer = BufWriter::new(File::create(path)?);
        Ok(Self::new(writer, config.byte_order, format))
    }
}

/// Read into `buf` until it is full or the stream ends; returns bytes read
fn read_fill<R: Read + ?Sized>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

// ============================================================================
// Positioning
// ============================================================================

impl<S: Seek> FortIo<S> {
    pub fn position(&mut self) -> Result<u64> {
        Ok(self.stream.stream_position()?)
    }

    pub fn seek_to(&mut self, position: u64) -> Result<()> {
        self.stream.seek(SeekFrom::Start(position))?;
        Ok(())
    }

    pub fn rewind(&mut self) -> Result<()> {
        self.seek_to(0)
    }

    /// Move forward (or backward) relative to the current position
    pub fn skip_bytes(&mut self, offset: i64) -> Result<()> {
        self.stream.seek(SeekFrom::Current(offset))?;
        Ok(())
    }
}

// ============================================================================
// Binary records
// ============================================================================

impl<S: Read> FortIo<S> {
    /// Read a record marker; `Ok(None)` when the stream ends before its first byte
    pub fn read_marker(&mut self) -> Result<Option<i32>> {
        let mut raw = [0u8; 4];
        match read_fill(&mut self.stream, &mut raw)? {
            0 => Ok(None),
            4 => Ok(Some(self.byte_order.decode_i32(raw))),
            n => Err(EclError::data_read(format!(
                "truncated record marker ({} of 4 bytes)",
                n
            ))),
        }
    }

    pub(crate) fn expect_marker(&mut self, expected: usize) -> Result<()> {
        let found = self
            .read_marker()?
            .ok_or_else(|| EclError::data_read("stream ended where a record marker was expected"))?;
        if found as i64 != expected as i64 {
            warn!(expected, found, "FORTRAN record marker mismatch");
            return Err(EclError::RecordMarkerMismatch {
                expected: expected as i64,
                found: found as i64,
            });
        }
        Ok(())
    }

    pub(crate) fn read_exact_data(&mut self, buf: &mut [u8]) -> Result<()> {
        self.stream.read_exact(buf).map_err(|e| {
            if e.kind() == io::ErrorKind::UnexpectedEof {
                EclError::data_read(format!("record truncated, wanted {} bytes", buf.len()))
            } else {
                EclError::Io(e)
            }
        })
    }

    /// Read one record whose payload must be exactly `buf.len()` bytes
    pub fn read_record_into(&mut self, buf: &mut [u8]) -> Result<()> {
        self.expect_marker(buf.len())?;
        self.read_exact_data(buf)?;
        self.expect_marker(buf.len())
    }

    /// Read one record of any length; `Ok(None)` at a clean end of stream
    pub fn read_record(&mut self) -> Result<Option<Vec<u8>>> {
        let Some(head) = self.read_marker()? else {
            return Ok(None);
        };
        if head < 0 {
            return Err(EclError::data_read(format!("negative record length {}", head)));
        }
        let mut buf = vec![0u8; head as usize];
        self.read_exact_data(&mut buf)?;
        self.expect_marker(buf.len())?;
        Ok(Some(buf))
    }

    /// Read a block of fixed-width slots one element at a time
    ///
    /// Used for character data: each slot is read separately so a short
    /// final slot is reported against the element, not the whole block.
    pub fn read_record_slots(&mut self, buf: &mut [u8], slot_size: usize) -> Result<()> {
        self.expect_marker(buf.len())?;
        for slot in buf.chunks_mut(slot_size.max(1)) {
            self.read_exact_data(slot)?;
        }
        self.expect_marker(buf.len())
    }
}

impl<S: Read + Seek> FortIo<S> {
    /// Skip one record after validating that its two markers agree
    pub fn skip_record(&mut self) -> Result<bool> {
        let Some(head) = self.read_marker()? else {
            return Ok(false);
        };
        self.skip_bytes(head as i64)?;
        self.expect_marker(head.max(0) as usize)?;
        Ok(true)
    }

    /// Skip one record whose payload must be exactly `length` bytes
    pub fn skip_record_of(&mut self, length: usize) -> Result<()> {
        self.expect_marker(length)?;
        self.skip_bytes(length as i64)?;
        self.expect_marker(length)
    }
}

impl<S: Write> FortIo<S> {
    pub fn write_marker(&mut self, length: usize) -> Result<()> {
        let length = i32::try_from(length)
            .map_err(|_| EclError::encode(format!("record of {} bytes too large", length)))?;
        self.byte_order.write_i32(&mut self.stream, length)?;
        Ok(())
    }

    /// Write `data` bracketed by its length markers
    pub fn write_record(&mut self, data: &[u8]) -> Result<()> {
        self.write_marker(data.len())?;
        self.stream.write_all(data)?;
        self.write_marker(data.len())
    }

    /// Write raw text (formatted files)
    pub fn write_text(&mut self, text: &str) -> Result<()> {
        self.stream.write_all(text.as_bytes())?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.stream.flush()?;
        Ok(())
    }
}

// ============================================================================
// Formatted tokens
// ============================================================================

impl<S: Read> FortIo<S> {
    fn read_byte(&mut self) -> Result<Option<u8>> {
        let mut byte = [0u8; 1];
        match read_fill(&mut self.stream, &mut byte)? {
            0 => Ok(None),
            _ => Ok(Some(byte[0])),
        }
    }

    /// Skip whitespace and newlines; returns the first other byte (consumed)
    fn next_non_space(&mut self) -> Result<Option<u8>> {
        loop {
            match self.read_byte()? {
                Some(b) if b.is_ascii_whitespace() => continue,
                other => return Ok(other),
            }
        }
    }

    /// Next whitespace-delimited token; `Ok(None)` at end of stream
    ///
    /// The delimiting whitespace byte is consumed.
    pub fn read_token(&mut self) -> Result<Option<String>> {
        let Some(first) = self.next_non_space()? else {
            return Ok(None);
        };
        let mut token = vec![first];
        while let Some(b) = self.read_byte()? {
            if b.is_ascii_whitespace() {
                break;
            }
            token.push(b);
        }
        Ok(Some(String::from_utf8_lossy(&token).into_owned()))
    }

    /// Next quote-delimited field, without the quotes; `Ok(None)` at end of stream
    ///
    /// Leading whitespace and newlines before the opening quote are skipped.
    /// A doubled quote inside the field stands for one quote character. The
    /// closing quote must be followed by whitespace or the end of the stream.
    pub fn read_quoted(&mut self) -> Result<Option<String>> {
        let Some(first) = self.next_non_space()? else {
            return Ok(None);
        };
        if first != b'\'' {
            return Err(EclError::data_read(format!(
                "expected opening quote, found '{}'",
                first as char
            )));
        }
        let mut field = Vec::new();
        loop {
            match self.read_byte()? {
                Some(b'\'') => match self.read_byte()? {
                    Some(b'\'') => field.push(b'\''),
                    Some(b) if !b.is_ascii_whitespace() => {
                        return Err(EclError::data_read(format!(
                            "unexpected '{}' after closing quote",
                            b as char
                        )));
                    }
                    _ => break,
                },
                Some(b) => field.push(b),
                None => return Err(EclError::data_read("unterminated quoted field")),
            }
        }
        Ok(Some(String::from_utf8_lossy(&field).into_owned()))
    }
}
