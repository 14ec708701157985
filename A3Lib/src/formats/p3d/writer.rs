//! MLOD P3D writing
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`
//!
//! SPDX-License-Identifier: MIT

// Binary format writing requires many intentional casts between integer types
#![allow(clippy::cast_possible_truncation)]

use super::document::{Face, Lod, MloDFile};
use super::tagg::{EOF_TAGG, PROPERTY_FIELD_LEN, Tagg, TaggData, encode_weight};
use crate::error::{Error, Result};
use crate::io::BinaryWriteExt;
use byteorder::{LittleEndian, WriteBytesExt};
use glam::Vec3;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Write an MLOD P3D file to disk
///
/// # Errors
/// Returns an error if the model is inconsistent or the file cannot be written.
pub fn write_p3d<P: AsRef<Path>>(file: &MloDFile, path: P) -> Result<()> {
    let bytes = serialize_p3d(file)?;
    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}

/// Serialize an MLOD P3D to bytes
///
/// # Errors
/// Returns an error on faces without 3 or 4 sides, or TAGG payloads that do
/// not match their LOD.
pub fn serialize_p3d(file: &MloDFile) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    out.write_all(b"MLOD")?;
    out.write_u32::<LittleEndian>(file.version)?;
    out.write_u32::<LittleEndian>(file.lods.len() as u32)?;
    for lod in &file.lods {
        write_lod(&mut out, lod)?;
    }
    Ok(out)
}

fn write_lod<W: Write>(out: &mut W, lod: &Lod) -> Result<()> {
    out.write_all(b"P3DM")?;
    out.write_u32::<LittleEndian>(lod.version.0)?;
    out.write_u32::<LittleEndian>(lod.version.1)?;
    out.write_u32::<LittleEndian>(lod.vertices.len() as u32)?;
    out.write_u32::<LittleEndian>(lod.normals.len() as u32)?;
    out.write_u32::<LittleEndian>(lod.faces.len() as u32)?;
    out.write_u32::<LittleEndian>(lod.flags)?;

    for vertex in &lod.vertices {
        write_vec3(out, vertex.position)?;
        out.write_u32::<LittleEndian>(vertex.flags)?;
    }
    for normal in &lod.normals {
        write_vec3(out, *normal)?;
    }
    for (index, face) in lod.faces.iter().enumerate() {
        write_face(out, face, index)?;
    }

    out.write_all(b"TAGG")?;
    for tagg in &lod.taggs {
        write_tagg(out, lod, tagg)?;
    }
    out.write_u8(1)?;
    out.write_asciiz(EOF_TAGG)?;
    out.write_u32::<LittleEndian>(0)?;

    out.write_f32::<LittleEndian>(lod.resolution.encode())?;
    Ok(())
}

fn write_vec3<W: Write>(out: &mut W, v: Vec3) -> Result<()> {
    out.write_f32::<LittleEndian>(v.x)?;
    out.write_f32::<LittleEndian>(v.y)?;
    out.write_f32::<LittleEndian>(v.z)?;
    Ok(())
}

fn write_face<W: Write>(out: &mut W, face: &Face, index: usize) -> Result<()> {
    let sides = face.sides.len();
    if !(3..=4).contains(&sides) {
        return Err(Error::InvalidFace {
            index,
            sides: sides as u32,
        });
    }
    out.write_u32::<LittleEndian>(sides as u32)?;
    for side in &face.sides {
        out.write_u32::<LittleEndian>(side.vertex)?;
        out.write_u32::<LittleEndian>(side.normal)?;
        out.write_f32::<LittleEndian>(side.uv[0])?;
        out.write_f32::<LittleEndian>(side.uv[1])?;
    }
    if sides == 3 {
        out.write_all(&[0u8; 16])?;
    }
    out.write_u32::<LittleEndian>(face.flags)?;
    out.write_asciiz(&face.texture)?;
    out.write_asciiz(&face.material)?;
    Ok(())
}

fn mismatch(tagg: &Tagg, expected: usize, found: usize) -> Error {
    Error::InvalidTaggLength {
        name: tagg.name.clone(),
        expected: expected as u32,
        found: found as u32,
    }
}

fn write_tagg<W: Write>(out: &mut W, lod: &Lod, tagg: &Tagg) -> Result<()> {
    let mut payload = Vec::new();
    match &tagg.data {
        TaggData::Empty => {}
        TaggData::SharpEdges(edges) => {
            for &(a, b) in edges {
                payload.write_u32::<LittleEndian>(a)?;
                payload.write_u32::<LittleEndian>(b)?;
            }
        }
        TaggData::Property { key, value } => {
            payload.write_asciiz_field(key, PROPERTY_FIELD_LEN)?;
            payload.write_asciiz_field(value, PROPERTY_FIELD_LEN)?;
        }
        TaggData::Mass(masses) => {
            if masses.len() != lod.vertices.len() {
                return Err(mismatch(tagg, lod.vertices.len() * 4, masses.len() * 4));
            }
            for &mass in masses {
                payload.write_f32::<LittleEndian>(mass)?;
            }
        }
        TaggData::UvSet { id, uvs } => {
            let sides = lod.side_count();
            if uvs.len() != sides {
                return Err(mismatch(tagg, 4 + sides * 8, 4 + uvs.len() * 8));
            }
            payload.write_u32::<LittleEndian>(*id)?;
            for uv in uvs {
                payload.write_f32::<LittleEndian>(uv[0])?;
                payload.write_f32::<LittleEndian>(uv[1])?;
            }
        }
        TaggData::Selection { vertices, faces } => {
            if vertices.len() != lod.vertices.len() || faces.len() != lod.faces.len() {
                return Err(mismatch(
                    tagg,
                    lod.vertices.len() + lod.faces.len(),
                    vertices.len() + faces.len(),
                ));
            }
            payload.extend(vertices.iter().map(|&w| encode_weight(w)));
            payload.extend(faces.iter().map(|&w| encode_weight(w)));
        }
    }

    out.write_u8(1)?;
    out.write_asciiz(&tagg.name)?;
    out.write_u32::<LittleEndian>(payload.len() as u32)?;
    out.write_all(&payload)?;
    Ok(())
}
