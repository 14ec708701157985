//! Writers mirroring [`BinaryReader`](super::BinaryReader)
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`
//!
//! SPDX-License-Identifier: MIT

use crate::error::{Error, Result};
use byteorder::{LittleEndian, WriteBytesExt};
use std::io::Write;

/// String and varint writers for any `Write`.
///
/// Scalars are written with `byteorder`'s `WriteBytesExt` directly.
pub trait BinaryWriteExt: Write {
    /// Write a string followed by a single NUL.
    ///
    /// Anything after an embedded NUL is dropped.
    fn write_asciiz(&mut self, value: &str) -> Result<()> {
        let bytes = value.as_bytes();
        let len = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
        self.write_all(&bytes[..len])?;
        self.write_u8(0)?;
        Ok(())
    }

    /// Write a string into a fixed `width`-byte field, null padded.
    ///
    /// A string of exactly `width` bytes fills the field with no NUL, which
    /// [`read_asciiz_field`](super::BinaryReader::read_asciiz_field) reads back whole.
    ///
    /// # Errors
    /// Returns [`Error::FieldTooLong`] if the string is longer than `width`.
    fn write_asciiz_field(&mut self, value: &str, width: usize) -> Result<()> {
        let bytes = value.as_bytes();
        if bytes.len() > width {
            return Err(Error::FieldTooLong {
                value: value.to_string(),
                width,
            });
        }
        let mut field = vec![0u8; width];
        field[..bytes.len()].copy_from_slice(bytes);
        self.write_all(&field)?;
        Ok(())
    }

    /// Write a `u32`-length-prefixed string.
    fn write_lascii(&mut self, value: &str) -> Result<()> {
        self.write_u32::<LittleEndian>(value.len() as u32)?;
        self.write_all(value.as_bytes())?;
        Ok(())
    }

    /// Write a 7-bit-per-byte variable-length unsigned integer.
    fn write_compressed_uint(&mut self, value: u64) -> Result<()> {
        let mut remaining = value;
        loop {
            let byte = (remaining & 0x7F) as u8;
            remaining >>= 7;
            if remaining == 0 {
                self.write_u8(byte)?;
                break;
            }
            self.write_u8(byte | 0x80)?;
        }
        Ok(())
    }
}

impl<W: Write + ?Sized> BinaryWriteExt for W {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::BinaryReader;

    #[test]
    fn test_compressed_uint_encoding() {
        let mut buffer = Vec::new();
        buffer.write_compressed_uint(0).unwrap();
        buffer.write_compressed_uint(300).unwrap();
        assert_eq!(buffer, vec![0x00, 0xAC, 0x02]);
    }

    #[test]
    fn test_compressed_uint_boundaries() {
        let values = [0u64, 1, 127, 128, 16_383, 16_384, 2_097_151, 2_097_152, u64::from(u32::MAX)];
        let mut buffer = Vec::new();
        for value in values {
            buffer.write_compressed_uint(value).unwrap();
        }
        let mut reader = BinaryReader::from_bytes(&buffer);
        for value in values {
            assert_eq!(reader.read_compressed_uint().unwrap(), value);
        }
        assert!(reader.is_at_end().unwrap());
    }

    #[test]
    fn test_asciiz_field_pads_and_fills() {
        let mut buffer = Vec::new();
        buffer.write_asciiz_field("abc", 6).unwrap();
        buffer.write_asciiz_field("full", 4).unwrap();
        assert_eq!(buffer, b"abc\0\0\0full");

        let mut reader = BinaryReader::from_bytes(&buffer);
        assert_eq!(reader.read_asciiz_field(6).unwrap(), "abc");
        assert_eq!(reader.read_asciiz_field(4).unwrap(), "full");
    }

    #[test]
    fn test_asciiz_field_rejects_overflow() {
        let mut buffer = Vec::new();
        assert!(matches!(
            buffer.write_asciiz_field("toolong", 4),
            Err(Error::FieldTooLong { width: 4, .. })
        ));
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_asciiz_stops_at_embedded_nul() {
        let mut buffer = Vec::new();
        buffer.write_asciiz("a\0b").unwrap();
        assert_eq!(buffer, b"a\0");
    }
}
