//! Text config (`.cpp`, `.hpp`, `.cfg`) support
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`
//!
//! SPDX-License-Identifier: MIT
//!
//! Parses preprocessed config source into a [`Config`] class tree and
//! writes it back out. Rapified configs share the same tree and are read
//! by [`crate::formats::rap`].

mod dict;
mod document;
mod parser;
mod tokenizer;
mod writer;

pub use dict::{ClassDict, ValueDict};
pub use document::{ClassId, ClassRef, Config, ConfigArray, ConfigProperty, ConfigValue};
pub use parser::{CfgParseOptions, parse_cfg, read_cfg};
pub use tokenizer::{Token, TokenKind, Tokenizer, tokenize};
pub use writer::{format_cfg, write_cfg};
