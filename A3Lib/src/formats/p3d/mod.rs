//! MLOD P3D (editable model) support
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`
//!
//! SPDX-License-Identifier: MIT
//!
//! An MLOD file is a list of LODs. Each LOD holds a vertex, normal and face
//! table, a list of TAGG metadata records (selections, mass, UV sets,
//! named properties) and a resolution signature that identifies its role.

mod document;
mod reader;
mod resolution;
mod tagg;
mod writer;

pub use document::{Face, FaceSide, LOD_VERSION, Lod, MLOD_VERSION, MloDFile, Vertex};
pub use reader::{parse_p3d_bytes, read_p3d};
pub use resolution::{LodKind, LodResolution};
pub use tagg::{
    EOF_TAGG, MASS_TAGG, PROPERTY_TAGG, Proxy, SHARP_EDGES_TAGG, Tagg, TaggData, UV_SET_TAGG,
    decode_weight, encode_weight, parse_proxy_name,
};
pub use writer::{serialize_p3d, write_p3d};
