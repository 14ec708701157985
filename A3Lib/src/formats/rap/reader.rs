//! Rapified config reading
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`
//!
//! SPDX-License-Identifier: MIT

// Binary format parsing requires many intentional casts between integer types
#![allow(clippy::cast_possible_truncation)]

use crate::error::{Error, Result};
use crate::formats::cfg::{ClassId, Config, ConfigArray, ConfigValue};
use crate::io::BinaryReader;
use std::fs;
use std::io::{Read, Seek};
use std::path::Path;

/// Magic bytes at the start of every rapified config.
pub const RAP_MAGIC: &[u8; 4] = b"\0raP";

const HEADER_PADDING: (u32, u32) = (0, 8);
// Extra 4-byte steps tried when the padding pair is not where expected.
const HEADER_PROBES: usize = 2;

const ENTRY_CLASS: u8 = 0;
const ENTRY_VALUE: u8 = 1;
const ENTRY_ARRAY: u8 = 2;
const ENTRY_EXTERNAL: u8 = 3;
const ENTRY_DELETE: u8 = 4;
const ENTRY_ARRAY_EXTEND: u8 = 5;

const VALUE_STRING: u8 = 0;
const VALUE_FLOAT: u8 = 1;
const VALUE_LONG: u8 = 2;
const VALUE_ARRAY: u8 = 3;
const VALUE_VARIABLE: u8 = 4;

const MAX_CLASS_DEPTH: usize = 512;

/// Class bodies currently being read, and the furthest byte any body reached.
#[derive(Debug, Default)]
struct BodyWalk {
    active: Vec<u64>,
    end: u64,
}

impl BodyWalk {
    fn enter(&mut self, offset: u64) -> Result<()> {
        if self.active.contains(&offset) {
            return Err(Error::MalformedHeader {
                format: "rapified config",
                reason: format!("class body at offset {offset} contains itself"),
            });
        }
        if self.active.len() >= MAX_CLASS_DEPTH {
            return Err(Error::MalformedHeader {
                format: "rapified config",
                reason: format!("class nesting deeper than {MAX_CLASS_DEPTH} at offset {offset}"),
            });
        }
        self.active.push(offset);
        Ok(())
    }

    fn leave(&mut self, end: u64) {
        self.active.pop();
        self.end = self.end.max(end);
    }
}

/// Whether `data` starts with the rapified magic.
pub fn is_rapified(data: &[u8]) -> bool {
    data.starts_with(RAP_MAGIC)
}

/// Read a rapified config from disk
///
/// # Errors
/// Returns an error if the file cannot be read or is not a valid rapified config.
pub fn read_rap<P: AsRef<Path>>(path: P) -> Result<Config> {
    let buffer = fs::read(path)?;
    parse_rap_bytes(&buffer)
}

/// Parse a rapified config from bytes
///
/// # Errors
/// Returns an error on a bad header, unknown entry tags, duplicate names,
/// unresolvable parents, class bodies that contain themselves, or bytes left
/// over after the last body or the enum table.
pub fn parse_rap_bytes(data: &[u8]) -> Result<Config> {
    let mut reader = BinaryReader::from_bytes(data);

    let magic = reader.read_signature::<4>()?;
    if &magic != RAP_MAGIC {
        return Err(Error::UnsupportedSignature {
            format: "rapified config",
            found: String::from_utf8_lossy(&magic).into_owned(),
        });
    }
    read_header_padding(&mut reader)?;
    let enum_offset = reader.read_u32()?;

    let mut config = Config::new("config");
    let root = config.root_id();

    let mut walk = BodyWalk::default();
    walk.enter(reader.position()?)?;
    let inherited = reader.read_asciiz()?;
    if !inherited.is_empty() {
        tracing::warn!("Ignoring parent '{}' declared on the root class", inherited);
    }
    read_entries(&mut reader, &mut config, root, &mut walk)?;
    walk.leave(reader.position()?);

    if enum_offset == 0 {
        reader.seek_to(walk.end)?;
    } else {
        reader.seek_to(u64::from(enum_offset))?;
        let count = reader.read_u32()?;
        for _ in 0..count {
            let name = reader.read_asciiz()?;
            let value = reader.read_u32()?;
            tracing::debug!("Discarding enum entry {} = {}", name, value);
        }
        if count > 0 {
            tracing::warn!("Discarded {} enum entries", count);
        }
    }

    reader.expect_end("config data")?;

    tracing::debug!("Read rapified config with {} classes", config.class_count());
    Ok(config)
}

fn read_header_padding<R: Read + Seek>(reader: &mut BinaryReader<R>) -> Result<()> {
    let start = reader.position()?;
    let mut window = (reader.read_u32()?, reader.read_u32()?);

    for probe in 0..=HEADER_PROBES {
        if window == HEADER_PADDING {
            if probe > 0 {
                tracing::warn!(
                    "Rapified header padding found {} bytes later than expected",
                    probe * 4
                );
            }
            return Ok(());
        }
        if probe < HEADER_PROBES {
            window = (window.1, reader.read_u32()?);
        }
    }

    Err(Error::MalformedHeader {
        format: "rapified config",
        reason: format!(
            "expected padding (0, 8) at offset {start}, last read ({}, {})",
            window.0, window.1
        ),
    })
}

fn read_entries<R: Read + Seek>(
    reader: &mut BinaryReader<R>,
    config: &mut Config,
    class: ClassId,
    walk: &mut BodyWalk,
) -> Result<()> {
    let count = reader.read_compressed_uint()?;
    for _ in 0..count {
        read_entry(reader, config, class, walk)?;
    }
    Ok(())
}

fn read_entry<R: Read + Seek>(
    reader: &mut BinaryReader<R>,
    config: &mut Config,
    class: ClassId,
    walk: &mut BodyWalk,
) -> Result<()> {
    let offset = reader.position()?;
    let tag = reader.read_u8()?;

    match tag {
        ENTRY_CLASS => {
            let name = reader.read_asciiz()?;
            let pointer = reader.position()?;
            let body_offset = u64::from(reader.read_u32()?);
            if body_offset >= reader.stream_len()? {
                return Err(Error::UnexpectedEof { offset: pointer });
            }
            walk.enter(body_offset)?;
            reader.with_position(body_offset, |r| {
                let parent = r.read_asciiz()?;
                let id = config.add_class(class, &name, Some(&parent), false)?;
                read_entries(r, config, id, walk)?;
                walk.leave(r.position()?);
                Ok(())
            })?;
        }
        ENTRY_VALUE => {
            let subtype_offset = reader.position()?;
            let subtype = reader.read_u8()?;
            let name = reader.read_asciiz()?;
            let value = read_value(reader, subtype, subtype_offset)?;
            insert_unique(config, class, &name, value)?;
        }
        ENTRY_ARRAY => {
            let name = reader.read_asciiz()?;
            let array = read_array(reader)?;
            insert_unique(config, class, &name, ConfigValue::Array(array))?;
        }
        ENTRY_EXTERNAL => {
            let name = reader.read_asciiz()?;
            config.add_class(class, &name, None, true)?;
        }
        ENTRY_DELETE => {
            let name = reader.read_asciiz()?;
            tracing::warn!(
                "Discarding delete directive for '{}' in '{}'",
                name,
                config.class(class).path()
            );
        }
        ENTRY_ARRAY_EXTEND => {
            let name = reader.read_asciiz()?;
            let flag = reader.read_u32()?;
            if flag != 1 {
                tracing::debug!("Array extension '{}' has unusual flag {}", name, flag);
            }
            let mut array = read_array(reader)?;
            array.extends = true;
            insert_unique(config, class, &name, ConfigValue::Array(array))?;
        }
        _ => return Err(Error::InvalidEntryType { tag, offset }),
    }
    Ok(())
}

fn read_value<R: Read + Seek>(
    reader: &mut BinaryReader<R>,
    subtype: u8,
    offset: u64,
) -> Result<ConfigValue> {
    Ok(match subtype {
        VALUE_STRING | VALUE_VARIABLE => ConfigValue::String(reader.read_asciiz()?),
        VALUE_FLOAT => ConfigValue::Float(f64::from(reader.read_f32()?)),
        VALUE_LONG => ConfigValue::Long(i64::from(reader.read_i32()?)),
        VALUE_ARRAY => ConfigValue::Array(read_array(reader)?),
        _ => {
            return Err(Error::InvalidEntryType {
                tag: subtype,
                offset,
            });
        }
    })
}

fn read_array<R: Read + Seek>(reader: &mut BinaryReader<R>) -> Result<ConfigArray> {
    let count = reader.read_compressed_uint()?;
    let mut items = Vec::with_capacity(count.min(4096) as usize);
    for _ in 0..count {
        let offset = reader.position()?;
        let subtype = reader.read_u8()?;
        items.push(read_value(reader, subtype, offset)?);
    }
    Ok(ConfigArray {
        items,
        extends: false,
    })
}

fn insert_unique(config: &mut Config, class: ClassId, name: &str, value: ConfigValue) -> Result<()> {
    if config.insert_property(class, name, value) {
        Ok(())
    } else {
        Err(Error::DuplicateDefinition {
            path: config.class(class).path(),
            name: name.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::cfg::{CfgParseOptions, format_cfg, parse_cfg};
    use crate::io::BinaryWriteExt;
    use byteorder::{LittleEndian, WriteBytesExt};
    use pretty_assertions::assert_eq;

    fn patch(out: &mut [u8], at: usize, value: usize) {
        out[at..at + 4].copy_from_slice(&(value as u32).to_le_bytes());
    }

    /// Hand-assembled equivalent of:
    /// `version = -3; class Base; class Item: Base {...}; class More: Item {...};`
    fn sample() -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(RAP_MAGIC);
        out.write_u32::<LittleEndian>(0).unwrap();
        out.write_u32::<LittleEndian>(8).unwrap();
        let enum_ptr = out.len();
        out.write_u32::<LittleEndian>(0).unwrap();

        out.write_asciiz("").unwrap();
        out.write_compressed_uint(4).unwrap();
        out.push(ENTRY_VALUE);
        out.push(VALUE_LONG);
        out.write_asciiz("version").unwrap();
        out.write_i32::<LittleEndian>(-3).unwrap();
        out.push(ENTRY_EXTERNAL);
        out.write_asciiz("Base").unwrap();
        out.push(ENTRY_CLASS);
        out.write_asciiz("Item").unwrap();
        let item_ptr = out.len();
        out.write_u32::<LittleEndian>(0).unwrap();
        out.push(ENTRY_CLASS);
        out.write_asciiz("More").unwrap();
        let more_ptr = out.len();
        out.write_u32::<LittleEndian>(0).unwrap();

        let here = out.len();
        patch(&mut out, item_ptr, here);
        out.write_asciiz("Base").unwrap();
        out.write_compressed_uint(4).unwrap();
        out.push(ENTRY_VALUE);
        out.push(VALUE_STRING);
        out.write_asciiz("model").unwrap();
        out.write_asciiz("\\a3\\box.p3d").unwrap();
        out.push(ENTRY_VALUE);
        out.push(VALUE_FLOAT);
        out.write_asciiz("mass").unwrap();
        out.write_f32::<LittleEndian>(1.5).unwrap();
        out.push(ENTRY_ARRAY);
        out.write_asciiz("tags").unwrap();
        out.write_compressed_uint(2).unwrap();
        out.push(VALUE_STRING);
        out.write_asciiz("a").unwrap();
        out.push(VALUE_ARRAY);
        out.write_compressed_uint(1).unwrap();
        out.push(VALUE_LONG);
        out.write_i32::<LittleEndian>(7).unwrap();
        out.push(ENTRY_DELETE);
        out.write_asciiz("Old").unwrap();

        let here = out.len();
        patch(&mut out, more_ptr, here);
        out.write_asciiz("Item").unwrap();
        out.write_compressed_uint(1).unwrap();
        out.push(ENTRY_ARRAY_EXTEND);
        out.write_asciiz("tags").unwrap();
        out.write_u32::<LittleEndian>(1).unwrap();
        out.write_compressed_uint(1).unwrap();
        out.push(VALUE_STRING);
        out.write_asciiz("c").unwrap();

        let here = out.len();
        patch(&mut out, enum_ptr, here);
        out.write_u32::<LittleEndian>(1).unwrap();
        out.write_asciiz("red").unwrap();
        out.write_u32::<LittleEndian>(0).unwrap();
        out
    }

    #[test]
    fn test_read_sample() {
        let config = parse_rap_bytes(&sample()).unwrap();
        let root = config.root();
        assert_eq!(root.get_prop("version"), Some(&ConfigValue::Long(-3)));
        assert!(root.get_class("Base").unwrap().is_reference());

        let item = root.get_class("Item").unwrap();
        assert_eq!(item.parent().unwrap().name(), "Base");
        assert_eq!(item.get_prop("model"), Some(&ConfigValue::from("\\a3\\box.p3d")));
        assert_eq!(item.get_prop("mass"), Some(&ConfigValue::Float(1.5)));
        assert_eq!(
            item.get_prop("tags"),
            Some(&ConfigValue::from(vec![
                ConfigValue::from("a"),
                ConfigValue::from(vec![ConfigValue::Long(7)]),
            ]))
        );

        let more = root.get_class("More").unwrap();
        let tags = more.local_prop("tags").and_then(ConfigValue::as_array).unwrap();
        assert!(tags.extends);
        assert!(more.inherits_from("base"));
    }

    #[test]
    fn test_matches_text_equivalent() {
        let text = r#"
            version = -3;
            class Base;
            class Item: Base { model = "\a3\box.p3d"; mass = 1.5; tags[] = {"a", {7}}; };
            class More: Item { tags[] += {"c"}; };
        "#;
        let parsed = parse_cfg(text, &CfgParseOptions::default()).unwrap();
        let rapified = parse_rap_bytes(&sample()).unwrap();
        assert_eq!(format_cfg(&rapified), format_cfg(&parsed));
    }

    #[test]
    fn test_is_rapified() {
        assert!(is_rapified(&sample()));
        assert!(!is_rapified(b"class A {};"));
    }

    #[test]
    fn test_bad_magic() {
        let mut data = sample();
        data[1] = b'X';
        assert!(matches!(
            parse_rap_bytes(&data),
            Err(Error::UnsupportedSignature { .. })
        ));
    }

    #[test]
    fn test_header_drift_is_tolerated() {
        let original = sample();
        let mut data = original[..4].to_vec();
        data.extend_from_slice(&[0xAA, 0, 0, 0]);
        data.extend_from_slice(&original[4..]);
        // Every absolute offset moved by four bytes.
        let shift = |data: &mut Vec<u8>, at: usize| {
            let value = u32::from_le_bytes([data[at], data[at + 1], data[at + 2], data[at + 3]]);
            data[at..at + 4].copy_from_slice(&(value + 4).to_le_bytes());
        };
        shift(&mut data, 16);
        let config_offsets: Vec<usize> = data
            .windows(5)
            .enumerate()
            .filter(|(_, w)| *w == b"Item\0" || *w == b"More\0")
            .map(|(i, _)| i + 5)
            .take(2)
            .collect();
        for at in config_offsets {
            shift(&mut data, at);
        }

        let config = parse_rap_bytes(&data).unwrap();
        assert_eq!(
            config.root().get_prop("More/mass"),
            Some(&ConfigValue::Float(1.5))
        );
    }

    #[test]
    fn test_header_drift_gives_up() {
        let mut data = RAP_MAGIC.to_vec();
        data.extend_from_slice(&[1u8; 24]);
        assert!(matches!(
            parse_rap_bytes(&data),
            Err(Error::MalformedHeader { .. })
        ));
    }

    #[test]
    fn test_trailing_bytes() {
        let mut data = sample();
        data.push(0);
        assert!(matches!(
            parse_rap_bytes(&data),
            Err(Error::InvalidTerminator { .. })
        ));
    }

    fn header_without_enums() -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(RAP_MAGIC);
        data.write_u32::<LittleEndian>(0).unwrap();
        data.write_u32::<LittleEndian>(8).unwrap();
        data.write_u32::<LittleEndian>(0).unwrap();
        data
    }

    /// Root body with a single class entry `name` whose body starts at `body`.
    fn push_class_entry(data: &mut Vec<u8>, name: &str, body: u32) {
        data.push(ENTRY_CLASS);
        data.write_asciiz(name).unwrap();
        data.write_u32::<LittleEndian>(body).unwrap();
    }

    #[test]
    fn test_class_body_containing_itself() {
        let mut data = header_without_enums();
        let root = data.len() as u32;
        data.write_asciiz("").unwrap();
        data.write_compressed_uint(1).unwrap();
        push_class_entry(&mut data, "A", root);
        assert!(matches!(
            parse_rap_bytes(&data),
            Err(Error::MalformedHeader { format: "rapified config", .. })
        ));
    }

    #[test]
    fn test_class_body_cycle_through_child() {
        let mut data = header_without_enums();
        data.write_asciiz("").unwrap();
        data.write_compressed_uint(1).unwrap();
        let a_ptr = data.len() + 3;
        push_class_entry(&mut data, "A", 0);

        let a_body = data.len();
        patch(&mut data, a_ptr, a_body);
        data.write_asciiz("").unwrap();
        data.write_compressed_uint(1).unwrap();
        let b_ptr = data.len() + 3;
        push_class_entry(&mut data, "B", 0);

        let b_body = data.len();
        patch(&mut data, b_ptr, b_body);
        data.write_asciiz("").unwrap();
        data.write_compressed_uint(1).unwrap();
        push_class_entry(&mut data, "C", a_body as u32);

        assert!(matches!(
            parse_rap_bytes(&data),
            Err(Error::MalformedHeader { .. })
        ));
    }

    #[test]
    fn test_class_body_past_end() {
        let mut data = header_without_enums();
        data.write_asciiz("").unwrap();
        data.write_compressed_uint(1).unwrap();
        push_class_entry(&mut data, "A", 4096);
        assert!(matches!(
            parse_rap_bytes(&data),
            Err(Error::UnexpectedEof { offset: 21 })
        ));
    }

    #[test]
    fn test_without_enum_table() {
        let mut data = header_without_enums();
        data.write_asciiz("").unwrap();
        data.write_compressed_uint(1).unwrap();
        let ptr = data.len() + 3;
        push_class_entry(&mut data, "A", 0);
        let body = data.len();
        patch(&mut data, ptr, body);
        data.write_asciiz("").unwrap();
        data.write_compressed_uint(1).unwrap();
        data.push(ENTRY_VALUE);
        data.push(VALUE_LONG);
        data.write_asciiz("x").unwrap();
        data.write_i32::<LittleEndian>(4).unwrap();

        let config = parse_rap_bytes(&data).unwrap();
        assert_eq!(config.root().get_prop("A/x"), Some(&ConfigValue::Long(4)));

        data.extend_from_slice(b"junk");
        assert!(matches!(
            parse_rap_bytes(&data),
            Err(Error::InvalidTerminator { .. })
        ));
    }

    #[test]
    fn test_unknown_entry_tag() {
        let mut data = Vec::new();
        data.extend_from_slice(RAP_MAGIC);
        data.write_u32::<LittleEndian>(0).unwrap();
        data.write_u32::<LittleEndian>(8).unwrap();
        data.write_u32::<LittleEndian>(0).unwrap();
        data.write_asciiz("").unwrap();
        data.write_compressed_uint(1).unwrap();
        data.push(9);
        assert!(matches!(
            parse_rap_bytes(&data),
            Err(Error::InvalidEntryType { tag: 9, offset: 18 })
        ));
    }

    #[test]
    fn test_duplicate_property() {
        let mut data = Vec::new();
        data.extend_from_slice(RAP_MAGIC);
        data.write_u32::<LittleEndian>(0).unwrap();
        data.write_u32::<LittleEndian>(8).unwrap();
        data.write_u32::<LittleEndian>(0).unwrap();
        data.write_asciiz("").unwrap();
        data.write_compressed_uint(2).unwrap();
        for value in [1, 2] {
            data.push(ENTRY_VALUE);
            data.push(VALUE_LONG);
            data.write_asciiz("x").unwrap();
            data.write_i32::<LittleEndian>(value).unwrap();
        }
        assert!(matches!(
            parse_rap_bytes(&data),
            Err(Error::DuplicateDefinition { .. })
        ));
    }
}
