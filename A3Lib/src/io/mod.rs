//! Little-endian binary primitives shared by every codec
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`
//!
//! SPDX-License-Identifier: MIT
//!
//! [`BinaryReader`] wraps any `Read + Seek` stream and reports short reads as
//! [`Error::UnexpectedEof`](crate::Error::UnexpectedEof) with the offset of
//! the failed read. [`BinaryWriteExt`] adds the matching writers to every
//! `Write`.

mod reader;
mod writer;

pub use reader::BinaryReader;
pub use writer::BinaryWriteExt;
