//! Rapified (binary) config support
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`
//!
//! SPDX-License-Identifier: MIT
//!
//! Rapified files are the compiled form of text configs. They decode into
//! the same [`Config`](crate::formats::cfg::Config) tree the text parser
//! builds. Only reading is supported.

mod reader;

pub use reader::{RAP_MAGIC, is_rapified, parse_rap_bytes, read_rap};
