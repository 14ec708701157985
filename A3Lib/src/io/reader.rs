//! Stream reader with offset-aware errors
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`
//!
//! SPDX-License-Identifier: MIT

use crate::error::{Error, Result};
use byteorder::{LittleEndian, ReadBytesExt};
use std::io::{self, Cursor, Read, Seek, SeekFrom};

/// Little-endian reader over a seekable stream.
#[derive(Debug)]
pub struct BinaryReader<R> {
    inner: R,
}

impl<'a> BinaryReader<Cursor<&'a [u8]>> {
    /// Create a reader over an in-memory buffer.
    #[must_use]
    pub fn from_bytes(data: &'a [u8]) -> Self {
        Self::new(Cursor::new(data))
    }
}

impl<R: Read + Seek> BinaryReader<R> {
    /// Wrap a stream. Reading starts at the stream's current position.
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    /// Unwrap the underlying stream.
    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Current byte offset.
    pub fn position(&mut self) -> Result<u64> {
        Ok(self.inner.stream_position()?)
    }

    /// Seek to an absolute byte offset.
    pub fn seek_to(&mut self, offset: u64) -> Result<()> {
        self.inner.seek(SeekFrom::Start(offset))?;
        Ok(())
    }

    /// Skip `count` bytes forward. Fails if that would pass the end of the stream.
    pub fn skip(&mut self, count: u64) -> Result<()> {
        let offset = self.position()?;
        if self.remaining()? < count {
            return Err(Error::UnexpectedEof { offset });
        }
        self.inner.seek(SeekFrom::Current(count as i64))?;
        Ok(())
    }

    /// Total stream length in bytes.
    pub fn stream_len(&mut self) -> Result<u64> {
        let current = self.position()?;
        let end = self.inner.seek(SeekFrom::End(0))?;
        self.seek_to(current)?;
        Ok(end)
    }

    /// Bytes left between the current position and the end of the stream.
    pub fn remaining(&mut self) -> Result<u64> {
        let current = self.position()?;
        Ok(self.stream_len()?.saturating_sub(current))
    }

    /// Whether the stream is exhausted.
    pub fn is_at_end(&mut self) -> Result<bool> {
        Ok(self.remaining()? == 0)
    }

    /// Fail with [`Error::InvalidTerminator`] unless the stream is exhausted.
    pub fn expect_end(&mut self, after: &str) -> Result<()> {
        let trailing = self.remaining()?;
        if trailing == 0 {
            return Ok(());
        }
        Err(Error::InvalidTerminator {
            what: format!("{trailing} trailing bytes after {after}"),
            offset: self.position()?,
        })
    }

    /// Run `f` at `offset`, then return to the current position.
    ///
    /// The saved position is restored even when `f` fails, so callers can
    /// propagate the error with `?` without leaving the stream misplaced.
    pub fn with_position<T>(
        &mut self,
        offset: u64,
        f: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<T> {
        let saved = self.position()?;
        self.seek_to(offset)?;
        let result = f(self);
        let restored = self.seek_to(saved);
        let value = result?;
        restored?;
        Ok(value)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        let offset = self.position()?;
        self.inner.read_u8().map_err(|e| map_io(e, offset))
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        let offset = self.position()?;
        self.inner
            .read_u16::<LittleEndian>()
            .map_err(|e| map_io(e, offset))
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        let offset = self.position()?;
        self.inner
            .read_i16::<LittleEndian>()
            .map_err(|e| map_io(e, offset))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        let offset = self.position()?;
        self.inner
            .read_u32::<LittleEndian>()
            .map_err(|e| map_io(e, offset))
    }

    pub fn read_i32(&mut self) -> Result<i32> {
        let offset = self.position()?;
        self.inner
            .read_i32::<LittleEndian>()
            .map_err(|e| map_io(e, offset))
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        let offset = self.position()?;
        self.inner
            .read_f32::<LittleEndian>()
            .map_err(|e| map_io(e, offset))
    }

    /// Read an IEEE 754 half-precision float, widened to `f32`.
    pub fn read_f16(&mut self) -> Result<f32> {
        Ok(half::f16::from_bits(self.read_u16()?).to_f32())
    }

    /// Read exactly `count` bytes.
    pub fn read_bytes(&mut self, count: usize) -> Result<Vec<u8>> {
        let offset = self.position()?;
        if self.remaining()? < count as u64 {
            return Err(Error::UnexpectedEof { offset });
        }
        let mut buffer = vec![0u8; count];
        self.inner
            .read_exact(&mut buffer)
            .map_err(|e| map_io(e, offset))?;
        Ok(buffer)
    }

    /// Read a fixed-size magic signature.
    pub fn read_signature<const N: usize>(&mut self) -> Result<[u8; N]> {
        let offset = self.position()?;
        let mut magic = [0u8; N];
        self.inner
            .read_exact(&mut magic)
            .map_err(|e| map_io(e, offset))?;
        Ok(magic)
    }

    /// Read a null-terminated string with no length prefix.
    pub fn read_asciiz(&mut self) -> Result<String> {
        let offset = self.position()?;
        let mut bytes = Vec::new();
        loop {
            match self.inner.read_u8() {
                Ok(0) => break,
                Ok(b) => bytes.push(b),
                Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                    return Err(Error::MalformedString { offset });
                }
                Err(e) => return Err(Error::Io(e)),
            }
        }
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Read a fixed-width, null-padded string field, truncated at the first NUL.
    pub fn read_asciiz_field(&mut self, width: usize) -> Result<String> {
        let bytes = self.read_bytes(width)?;
        let len = bytes.iter().position(|&b| b == 0).unwrap_or(width);
        Ok(String::from_utf8_lossy(&bytes[..len]).into_owned())
    }

    /// Read a `u32`-length-prefixed string.
    pub fn read_lascii(&mut self) -> Result<String> {
        let len = self.read_u32()? as usize;
        let bytes = self.read_bytes(len)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    /// Read a variable-length unsigned integer: 7 data bits per byte,
    /// high bit set on every byte except the last, least significant group first.
    pub fn read_compressed_uint(&mut self) -> Result<u64> {
        let mut value = 0u64;
        let mut shift = 0u32;
        loop {
            let byte = self.read_u8()?;
            if shift < u64::BITS {
                value |= u64::from(byte & 0x7F) << shift;
            }
            if byte & 0x80 == 0 {
                break;
            }
            shift += 7;
        }
        Ok(value)
    }
}

fn map_io(err: io::Error, offset: u64) -> Error {
    if err.kind() == io::ErrorKind::UnexpectedEof {
        Error::UnexpectedEof { offset }
    } else {
        Error::Io(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scalars_little_endian() {
        let data = [0x01, 0x34, 0x12, 0x78, 0x56, 0x34, 0x12, 0x00, 0x00, 0x80, 0x3F];
        let mut reader = BinaryReader::from_bytes(&data);
        assert_eq!(reader.read_u8().unwrap(), 1);
        assert_eq!(reader.read_u16().unwrap(), 0x1234);
        assert_eq!(reader.read_u32().unwrap(), 0x1234_5678);
        assert_eq!(reader.read_f32().unwrap(), 1.0);
        assert!(reader.is_at_end().unwrap());
    }

    #[test]
    fn test_short_read_reports_offset() {
        let data = [0x01, 0x02, 0x03];
        let mut reader = BinaryReader::from_bytes(&data);
        reader.read_u8().unwrap();
        match reader.read_u32() {
            Err(Error::UnexpectedEof { offset }) => assert_eq!(offset, 1),
            other => panic!("expected UnexpectedEof, got {other:?}"),
        }
    }

    #[test]
    fn test_asciiz() {
        let data = b"hello\0world\0";
        let mut reader = BinaryReader::from_bytes(data);
        assert_eq!(reader.read_asciiz().unwrap(), "hello");
        assert_eq!(reader.read_asciiz().unwrap(), "world");
    }

    #[test]
    fn test_asciiz_without_terminator() {
        let data = b"abc";
        let mut reader = BinaryReader::from_bytes(data);
        assert!(matches!(
            reader.read_asciiz(),
            Err(Error::MalformedString { offset: 0 })
        ));
    }

    #[test]
    fn test_asciiz_field_truncates_at_nul() {
        let data = b"bone\0\0garbage\0";
        let mut reader = BinaryReader::from_bytes(data);
        assert_eq!(reader.read_asciiz_field(8).unwrap(), "bone");
        assert_eq!(reader.position().unwrap(), 8);
    }

    #[test]
    fn test_compressed_uint() {
        let data = [0x7F, 0x80, 0x01, 0xFF, 0xFF, 0xFF, 0xFF, 0x0F];
        let mut reader = BinaryReader::from_bytes(&data);
        assert_eq!(reader.read_compressed_uint().unwrap(), 127);
        assert_eq!(reader.read_compressed_uint().unwrap(), 128);
        assert_eq!(reader.read_compressed_uint().unwrap(), u64::from(u32::MAX));
    }

    #[test]
    fn test_with_position_restores_on_error() {
        let data = [0u8; 4];
        let mut reader = BinaryReader::from_bytes(&data);
        reader.read_u8().unwrap();
        let result = reader.with_position(3, |r| r.read_u32());
        assert!(matches!(result, Err(Error::UnexpectedEof { offset: 3 })));
        assert_eq!(reader.position().unwrap(), 1);
    }

    #[test]
    fn test_skip_past_end() {
        let data = [0u8; 2];
        let mut reader = BinaryReader::from_bytes(&data);
        assert!(reader.skip(2).is_ok());
        assert!(matches!(reader.skip(1), Err(Error::UnexpectedEof { .. })));
    }
}
