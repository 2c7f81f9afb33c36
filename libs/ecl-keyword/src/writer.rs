//! Keyword writing, mirroring the reader byte for byte

use std::io::Write;

use tracing::debug;

use crate::bytes::flipped_copy;
use crate::error::{EclError, Result};
use crate::formatted::{format_element, quote};
use crate::fortio::{FileFormat, FortIo};
use crate::keyword::{Keyword, KeywordHeader, NAME_LENGTH};
use crate::reader::HEADER_RECORD_SIZE;

fn validate_name(name: &str) -> Result<()> {
    if name.len() > NAME_LENGTH || !name.is_ascii() {
        return Err(EclError::invalid_name(format!(
            "'{}' must be at most {} ASCII characters",
            name, NAME_LENGTH
        )));
    }
    Ok(())
}

impl<S: Write> FortIo<S> {
    /// Write a keyword header
    pub fn write_header(&mut self, header: &KeywordHeader) -> Result<()> {
        validate_name(&header.name)?;
        let count = i32::try_from(header.count).map_err(|_| {
            EclError::encode(format!(
                "element count {} of {} does not fit a header",
                header.count, header.name
            ))
        })?;
        let code = header.data_type.type_code();
        if code.len() != 4 {
            return Err(EclError::encode(format!(
                "type {} of {} has no 4 character code",
                code, header.name
            )));
        }

        match self.format() {
            FileFormat::Binary => {
                let mut raw = [b' '; HEADER_RECORD_SIZE];
                raw[..header.name.len()].copy_from_slice(header.name.as_bytes());
                raw[8..12].copy_from_slice(&self.byte_order().encode_i32(count));
                raw[12..16].copy_from_slice(code.as_bytes());
                self.write_record(&raw)
            }
            FileFormat::Formatted => self.write_text(&format!(
                " {} {:>11} {}\n",
                quote(&header.name, NAME_LENGTH),
                count,
                quote(&code, 4)
            )),
        }
    }

    /// Write the data region of `keyword`
    ///
    /// Binary blocks get markers computed from their actual size; formatted
    /// blocks are laid out in the type's column count with a line break at
    /// the end of every block.
    pub fn write_data(&mut self, keyword: &Keyword<'_>) -> Result<()> {
        let data_type = keyword.data_type();
        let size = data_type.element_size();
        if size == 0 || keyword.is_empty() {
            return Ok(());
        }
        let block_bytes = data_type.block_size() * size;

        match self.format() {
            FileFormat::Binary => {
                let flip = data_type.is_numeric() && self.needs_flip();
                for block in keyword.as_bytes().chunks(block_bytes) {
                    if flip {
                        self.write_record(&flipped_copy(block, size))?;
                    } else {
                        self.write_record(block)?;
                    }
                }
            }
            FileFormat::Formatted => {
                let columns = data_type.format_columns();
                for block in keyword.as_bytes().chunks(block_bytes) {
                    let elements = block.len() / size;
                    let mut text = String::new();
                    for (index, slot) in block.chunks(size).enumerate() {
                        text.push_str(&format_element(data_type, slot));
                        if (index + 1) % columns == 0 || index + 1 == elements {
                            text.push('\n');
                        }
                    }
                    self.write_text(&text)?;
                }
            }
        }
        Ok(())
    }

    /// Write header and data
    pub fn write_keyword(&mut self, keyword: &Keyword<'_>) -> Result<()> {
        self.write_header(&keyword.header())?;
        self.write_data(keyword)?;
        debug!(
            keyword = keyword.name(),
            count = keyword.len(),
            data_type = %keyword.data_type(),
            "Wrote keyword"
        );
        Ok(())
    }
}
