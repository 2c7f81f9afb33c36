//! Keyword reading: headers, data, skipping and seeking
//!
//! Binary data is read block by block. Numeric blocks are read in bulk and
//! flipped in place when the file order differs from the host; character
//! blocks are read one fixed-width slot at a time and never flipped.

use std::io::{Read, Seek};

use tracing::{debug, trace};

use crate::bytes::flip_elements;
use crate::data_type::DataType;
use crate::error::{EclError, Result};
use crate::formatted::{parse_bool, parse_int, parse_scientific};
use crate::fortio::{FileFormat, FortIo};
use crate::keyword::{Element, Keyword, KeywordHeader, NAME_LENGTH};

/// Payload bytes of a binary header record: name, count, type code
pub const HEADER_RECORD_SIZE: usize = NAME_LENGTH + 4 + 4;

/// Framing and short-read errors inside a header are header failures
fn as_header_error(err: EclError) -> EclError {
    match err {
        EclError::DataRead(msg) => EclError::HeaderRead(msg),
        other => other,
    }
}

impl<S: Read + Seek> FortIo<S> {
    /// Read the next keyword header
    ///
    /// Returns `EclError::EndOfStream` when the stream ends before the first
    /// byte of a header.
    pub fn read_header(&mut self) -> Result<KeywordHeader> {
        let header = match self.format() {
            FileFormat::Binary => self.read_binary_header(),
            FileFormat::Formatted => self.read_formatted_header(),
        }?;
        trace!(
            name = %header.name,
            count = header.count,
            data_type = %header.data_type,
            "Read keyword header"
        );
        Ok(header)
    }

    fn read_binary_header(&mut self) -> Result<KeywordHeader> {
        let Some(head) = self.read_marker().map_err(as_header_error)? else {
            return Err(EclError::EndOfStream);
        };
        if head as i64 != HEADER_RECORD_SIZE as i64 {
            return Err(EclError::RecordMarkerMismatch {
                expected: HEADER_RECORD_SIZE as i64,
                found: head as i64,
            });
        }

        let mut raw = [0u8; HEADER_RECORD_SIZE];
        self.read_exact_data(&mut raw).map_err(as_header_error)?;
        self.expect_marker(HEADER_RECORD_SIZE)
            .map_err(as_header_error)?;

        let name = String::from_utf8_lossy(&raw[..NAME_LENGTH]).into_owned();
        let count = self.byte_order().decode_i32([raw[8], raw[9], raw[10], raw[11]]);
        let code = String::from_utf8_lossy(&raw[12..16]).into_owned();
        build_header(name, count as i64, &code)
    }

    fn read_formatted_header(&mut self) -> Result<KeywordHeader> {
        let Some(name) = self.read_quoted().map_err(as_header_error)? else {
            return Err(EclError::EndOfStream);
        };
        let count = self
            .read_token()
            .map_err(as_header_error)?
            .ok_or_else(|| EclError::header_read(format!("missing element count for {}", name)))?;
        let count = count
            .parse::<i64>()
            .map_err(|_| EclError::header_read(format!("invalid element count '{}'", count)))?;
        let code = self
            .read_quoted()
            .map_err(as_header_error)?
            .ok_or_else(|| EclError::header_read(format!("missing type code for {}", name)))?;
        build_header(name, count, &code)
    }

    /// Fill `keyword` with the data that follows its header
    ///
    /// Works for owned and shared payloads alike; the payload is written in
    /// place and never reallocated.
    pub fn read_data(&mut self, keyword: &mut Keyword<'_>) -> Result<()> {
        let data_type = keyword.data_type();
        let count = keyword.len();
        match self.format() {
            FileFormat::Binary => self.read_binary_data(data_type, keyword.as_bytes_mut()),
            FileFormat::Formatted => {
                self.read_formatted_data(data_type, count, keyword.as_bytes_mut())
            }
        }?;
        debug!(keyword = keyword.name(), count, "Read keyword data");
        Ok(())
    }

    fn read_binary_data(&mut self, data_type: DataType, buf: &mut [u8]) -> Result<()> {
        let size = data_type.element_size();
        if size == 0 || buf.is_empty() {
            return Ok(());
        }
        for block in buf.chunks_mut(data_type.block_size() * size) {
            self.read_binary_block(data_type, block)?;
        }
        Ok(())
    }

    fn read_binary_block(&mut self, data_type: DataType, block: &mut [u8]) -> Result<()> {
        let size = data_type.element_size();
        if data_type.is_alphanumeric() {
            self.read_record_slots(block, size)
        } else {
            self.read_record_into(block)?;
            if self.needs_flip() {
                flip_elements(block, size);
            }
            Ok(())
        }
    }

    /// Read `count` elements into a new buffer, growing it one block at a time
    ///
    /// Memory follows the data actually present, so a header announcing more
    /// elements than the stream holds fails with `DataRead` on the first
    /// missing block.
    fn read_binary_payload(&mut self, data_type: DataType, count: usize) -> Result<Vec<u8>> {
        let size = data_type.element_size();
        let mut payload = Vec::new();
        if size == 0 {
            return Ok(payload);
        }
        let mut remaining = count;
        while remaining > 0 {
            let elements = remaining.min(data_type.block_size());
            let start = payload.len();
            payload.resize(start + elements * size, 0);
            self.read_binary_block(data_type, &mut payload[start..])?;
            remaining -= elements;
        }
        Ok(payload)
    }

    fn read_formatted_data(
        &mut self,
        data_type: DataType,
        count: usize,
        buf: &mut [u8],
    ) -> Result<()> {
        let size = data_type.element_size();
        if size == 0 {
            return Ok(());
        }
        for (index, slot) in buf.chunks_mut(size).enumerate() {
            self.read_formatted_element(data_type, index, count, slot)?;
        }
        Ok(())
    }

    fn read_formatted_payload(&mut self, data_type: DataType, count: usize) -> Result<Vec<u8>> {
        let size = data_type.element_size();
        let mut payload = Vec::new();
        if size == 0 {
            return Ok(payload);
        }
        let mut slot = vec![0u8; size];
        for index in 0..count {
            self.read_formatted_element(data_type, index, count, &mut slot)?;
            payload.extend_from_slice(&slot);
        }
        Ok(payload)
    }

    fn read_formatted_element(
        &mut self,
        data_type: DataType,
        index: usize,
        count: usize,
        slot: &mut [u8],
    ) -> Result<()> {
        let truncated = || {
            EclError::data_read(format!(
                "stream ended after {} of {} elements",
                index, count
            ))
        };
        match data_type {
            DataType::Int => {
                let token = self.read_token()?.ok_or_else(truncated)?;
                parse_int(&token)?.write_ne(slot);
            }
            DataType::Float => {
                let token = self.read_token()?.ok_or_else(truncated)?;
                (parse_scientific(&token)? as f32).write_ne(slot);
            }
            DataType::Double => {
                let token = self.read_token()?.ok_or_else(truncated)?;
                parse_scientific(&token)?.write_ne(slot);
            }
            DataType::Bool => {
                let token = self.read_token()?.ok_or_else(truncated)?;
                parse_bool(&token)?.write_ne(slot);
            }
            DataType::Char | DataType::String(_) | DataType::Message => {
                let field = self.read_quoted()?.ok_or_else(truncated)?;
                slot.fill(b' ');
                let bytes = field.as_bytes();
                let n = bytes.len().min(slot.len());
                slot[..n].copy_from_slice(&bytes[..n]);
            }
        }
        Ok(())
    }

    /// Advance past `count` elements of `data_type` without keeping them
    ///
    /// Binary streams seek over each block after checking its leading
    /// marker, and check the trailing marker after the seek, so a truncated
    /// data region fails instead of passing for the end of the stream.
    /// Formatted streams have no seekable length and are parsed element by
    /// element.
    pub fn skip_data(&mut self, data_type: DataType, count: usize) -> Result<()> {
        let size = data_type.element_size();
        if size == 0 {
            return Ok(());
        }
        match self.format() {
            FileFormat::Binary => {
                let mut remaining = count;
                while remaining > 0 {
                    let elements = remaining.min(data_type.block_size());
                    self.skip_record_of(elements * size)?;
                    remaining -= elements;
                }
                trace!(
                    count,
                    bytes = data_type.data_size(count),
                    "Skipped binary keyword data"
                );
                Ok(())
            }
            FileFormat::Formatted => {
                let mut slot = vec![0u8; size];
                for index in 0..count {
                    self.read_formatted_element(data_type, index, count, &mut slot)?;
                }
                Ok(())
            }
        }
    }

    /// Read the next complete keyword; `Ok(None)` at a clean end of stream
    pub fn read_keyword(&mut self) -> Result<Option<Keyword<'static>>> {
        let header = match self.read_header() {
            Ok(header) => header,
            Err(EclError::EndOfStream) => return Ok(None),
            Err(e) => return Err(e),
        };
        let payload = match self.format() {
            FileFormat::Binary => self.read_binary_payload(header.data_type, header.count),
            FileFormat::Formatted => self.read_formatted_payload(header.data_type, header.count),
        }?;
        debug!(keyword = %header.name, count = header.count, "Read keyword data");
        Ok(Some(Keyword::from_payload(header, payload)))
    }

    /// Read every remaining keyword
    pub fn read_all(&mut self) -> Result<Vec<Keyword<'static>>> {
        let mut keywords = Vec::new();
        while let Some(keyword) = self.read_keyword()? {
            keywords.push(keyword);
        }
        debug!(count = keywords.len(), "Read all keywords");
        Ok(keywords)
    }

    /// Read the next header and skip its data; `Ok(None)` at a clean end of stream
    pub fn skip_keyword(&mut self) -> Result<Option<KeywordHeader>> {
        let header = match self.read_header() {
            Ok(header) => header,
            Err(EclError::EndOfStream) => return Ok(None),
            Err(e) => return Err(e),
        };
        self.skip_data(header.data_type, header.count)?;
        Ok(Some(header))
    }

    /// Position the stream at the header of the next keyword called `name`
    ///
    /// Scans forward from the current position. On a miss with `rewind` set,
    /// the scan restarts once from the beginning of the stream and stops at
    /// the original position. Returns `false` after restoring the original
    /// position when the keyword is not found.
    pub fn seek_keyword(&mut self, name: &str, rewind: bool) -> Result<bool> {
        let start = self.position()?;
        if self.scan_for(name, None)? {
            return Ok(true);
        }
        if rewind {
            self.rewind()?;
            if self.scan_for(name, Some(start))? {
                return Ok(true);
            }
        }
        self.seek_to(start)?;
        trace!(name, "Keyword not found, position restored");
        Ok(false)
    }

    /// Like `seek_keyword`, but a miss is an error and the position is not restored
    pub fn seek_keyword_or_fail(&mut self, name: &str, rewind: bool) -> Result<()> {
        let start = self.position()?;
        if self.scan_for(name, None)? {
            return Ok(());
        }
        if rewind {
            self.rewind()?;
            if self.scan_for(name, Some(start))? {
                return Ok(());
            }
        }
        Err(EclError::not_found(name))
    }

    fn scan_for(&mut self, name: &str, limit: Option<u64>) -> Result<bool> {
        let target = name.trim_end();
        loop {
            let here = self.position()?;
            if limit.is_some_and(|limit| here >= limit) {
                return Ok(false);
            }
            let header = match self.read_header() {
                Ok(header) => header,
                Err(EclError::EndOfStream) => return Ok(false),
                Err(e) => return Err(e),
            };
            if header.name == target {
                self.seek_to(here)?;
                return Ok(true);
            }
            self.skip_data(header.data_type, header.count)?;
        }
    }
}

fn build_header(name: String, count: i64, code: &str) -> Result<KeywordHeader> {
    if count < 0 || count > i32::MAX as i64 {
        return Err(EclError::header_read(format!(
            "invalid element count {} for {}",
            count,
            name.trim_end()
        )));
    }
    let data_type = DataType::from_type_code(code).ok_or_else(|| {
        EclError::header_read(format!(
            "unknown type code '{}' for {}",
            code,
            name.trim_end()
        ))
    })?;
    Ok(KeywordHeader::new(name, data_type, count as usize))
}
