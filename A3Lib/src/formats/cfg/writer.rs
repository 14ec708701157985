//! Config text writer
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`
//!
//! SPDX-License-Identifier: MIT
//!
//! Output is tab-indented, properties before child classes, and parses back
//! to an equal tree with [`parse_cfg`](super::parse_cfg).

use super::document::{ClassRef, Config, ConfigArray, ConfigValue};
use crate::error::Result;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

/// Render the whole config. The root's own name is not written.
pub fn format_cfg(config: &Config) -> String {
    let mut out = String::new();
    write_body(&mut out, config.root(), 0);
    out
}

/// Write a config as text.
///
/// # Errors
/// Returns an error if the file cannot be written.
pub fn write_cfg<P: AsRef<Path>>(config: &Config, path: P) -> Result<()> {
    fs::write(path, format_cfg(config))?;
    Ok(())
}

impl ClassRef<'_> {
    /// Render this class as a `class` statement at the given tab depth.
    pub fn format(&self, indent: usize) -> String {
        let mut out = String::new();
        write_class(&mut out, *self, indent);
        out
    }
}

impl ConfigValue {
    /// Render the value as it appears on the right of `=`.
    pub fn format(&self) -> String {
        match self {
            ConfigValue::String(s) => format!("\"{}\"", s.replace('"', "\"\"")),
            ConfigValue::Long(v) => v.to_string(),
            ConfigValue::Float(v) => format_float(*v),
            ConfigValue::Array(array) => format_array(array),
        }
    }
}

fn format_float(value: f64) -> String {
    // Debug output always keeps a '.' or an exponent, so it lexes as a float again.
    format!("{value:?}")
}

fn format_array(array: &ConfigArray) -> String {
    let items: Vec<String> = array.items.iter().map(ConfigValue::format).collect();
    format!("{{{}}}", items.join(", "))
}

fn write_body(out: &mut String, class: ClassRef<'_>, indent: usize) {
    let tabs = "\t".repeat(indent);
    for property in class.properties() {
        let _ = match &property.value {
            ConfigValue::Array(array) => writeln!(
                out,
                "{tabs}{}[] {}= {};",
                property.name,
                if array.extends { "+" } else { "" },
                format_array(array)
            ),
            value => writeln!(out, "{tabs}{} = {};", property.name, value.format()),
        };
    }
    for child in class.classes() {
        write_class(out, child, indent);
    }
}

fn write_class(out: &mut String, class: ClassRef<'_>, indent: usize) {
    let tabs = "\t".repeat(indent);
    let header = match class.parent() {
        Some(parent) => format!("class {}: {}", class.name(), parent.name()),
        None => format!("class {}", class.name()),
    };

    if class.is_reference() {
        let _ = writeln!(out, "{tabs}{header};");
        return;
    }
    if class.properties().next().is_none() && class.classes().next().is_none() {
        let _ = writeln!(out, "{tabs}{header} {{}};");
        return;
    }

    let _ = writeln!(out, "{tabs}{header}");
    let _ = writeln!(out, "{tabs}{{");
    write_body(out, class, indent + 1);
    let _ = writeln!(out, "{tabs}}};");
}
