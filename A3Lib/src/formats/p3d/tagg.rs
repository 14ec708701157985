//! TAGG records: named metadata attached to a LOD
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`
//!
//! SPDX-License-Identifier: MIT

/// Name of the record that closes a LOD's TAGG list.
pub const EOF_TAGG: &str = "#EndOfFile#";
pub const SHARP_EDGES_TAGG: &str = "#SharpEdges#";
pub const PROPERTY_TAGG: &str = "#Property#";
pub const MASS_TAGG: &str = "#Mass#";
pub const UV_SET_TAGG: &str = "#UVSet#";

/// Width of the key and value fields of a `#Property#` record.
pub const PROPERTY_FIELD_LEN: usize = 64;

const PROXY_PREFIX: &str = "proxy:";

/// A named TAGG record.
#[derive(Debug, Clone, PartialEq)]
pub struct Tagg {
    pub name: String,
    pub data: TaggData,
}

/// TAGG payloads.
#[derive(Debug, Clone, PartialEq)]
pub enum TaggData {
    /// Zero-length record.
    Empty,
    /// Pairs of vertex indices whose shared edge is hard.
    SharpEdges(Vec<(u32, u32)>),
    /// Named LOD property (`autocenter = 0`).
    Property { key: String, value: String },
    /// One mass value per vertex.
    Mass(Vec<f32>),
    /// Texture coordinates, one pair per face side in face order.
    UvSet { id: u32, uvs: Vec<[f32; 2]> },
    /// Named selection with one weight per vertex and per face.
    Selection { vertices: Vec<f32>, faces: Vec<f32> },
}

/// A proxy model placed through a `proxy:<path>.<index>` selection.
#[derive(Debug, Clone, PartialEq)]
pub struct Proxy {
    /// Model path as written in the selection name.
    pub path: String,
    pub index: u32,
    /// The full selection name.
    pub selection: String,
}

impl Tagg {
    pub fn new(name: impl Into<String>, data: TaggData) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    /// Reserved names are wrapped in `#`.
    pub fn is_system(&self) -> bool {
        is_system_name(&self.name)
    }

    /// Proxy reference encoded in the selection name, if any.
    pub fn proxy(&self) -> Option<Proxy> {
        if !matches!(self.data, TaggData::Selection { .. }) {
            return None;
        }
        parse_proxy_name(&self.name)
    }
}

pub(crate) fn is_system_name(name: &str) -> bool {
    name.len() >= 2 && name.starts_with('#') && name.ends_with('#')
}

/// Split `proxy:<path>.<index>` into its path and index.
pub fn parse_proxy_name(name: &str) -> Option<Proxy> {
    let prefix = name.get(..PROXY_PREFIX.len())?;
    if !prefix.eq_ignore_ascii_case(PROXY_PREFIX) {
        return None;
    }
    let rest = &name[PROXY_PREFIX.len()..];
    let (path, index) = rest.rsplit_once('.')?;
    Some(Proxy {
        path: path.to_string(),
        index: index.parse().ok()?,
        selection: name.to_string(),
    })
}

/// Decode a stored selection weight.
///
/// The byte is treated as a signed char: `0` is unselected, `1` is fully
/// selected, everything else maps to `(256 - s) / 255`. Bytes from 128 up
/// therefore decode above 1.0; callers treat those as unassigned.
pub fn decode_weight(byte: u8) -> f32 {
    match byte {
        0 => 0.0,
        1 => 1.0,
        _ => {
            let signed = i32::from(byte as i8);
            (256 - signed) as f32 / 255.0
        }
    }
}

/// Encode a selection weight. Exact inverse of [`decode_weight`] over its range.
///
/// Weights between 0 and 0.5 that the curve cannot represent fall back to
/// the plain unsigned `256 - w * 255` byte.
pub fn encode_weight(weight: f32) -> u8 {
    if weight.is_nan() || weight <= 0.0 {
        return 0;
    }
    let scaled = (weight * 255.0).round() as i32;
    match scaled {
        0 => 0,
        255 | 256 => 1,
        1..=254 => (256 - scaled) as u8,
        _ => (512 - scaled.min(384)) as u8,
    }
}
