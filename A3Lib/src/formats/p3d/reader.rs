//! MLOD P3D reading
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`
//!
//! SPDX-License-Identifier: MIT

// Binary format parsing requires many intentional casts between integer types
#![allow(clippy::cast_possible_truncation)]

use super::document::{Face, FaceSide, LOD_VERSION, Lod, MLOD_VERSION, MloDFile, Vertex};
use super::resolution::LodResolution;
use super::tagg::{
    EOF_TAGG, MASS_TAGG, PROPERTY_FIELD_LEN, PROPERTY_TAGG, SHARP_EDGES_TAGG, Tagg, TaggData,
    UV_SET_TAGG, decode_weight, is_system_name,
};
use crate::error::{Error, Result};
use crate::io::BinaryReader;
use glam::Vec3;
use std::fs;
use std::io::{Read, Seek};
use std::path::Path;

/// Read an MLOD P3D file from disk
///
/// # Errors
/// Returns an error if the file cannot be read or is not a valid MLOD.
pub fn read_p3d<P: AsRef<Path>>(path: P) -> Result<MloDFile> {
    let buffer = fs::read(path)?;
    parse_p3d_bytes(&buffer)
}

/// Parse MLOD P3D data from bytes
///
/// # Errors
/// Returns an error on bad signatures or versions, malformed faces, bad
/// TAGG sections, a missing end marker or bytes after the last LOD.
pub fn parse_p3d_bytes(data: &[u8]) -> Result<MloDFile> {
    let mut reader = BinaryReader::from_bytes(data);

    let magic = reader.read_signature::<4>()?;
    if &magic != b"MLOD" {
        return Err(Error::UnsupportedSignature {
            format: "MLOD",
            found: String::from_utf8_lossy(&magic).into_owned(),
        });
    }
    let version = reader.read_u32()?;
    if version != MLOD_VERSION {
        return Err(Error::UnsupportedVersion {
            format: "MLOD",
            version: version.to_string(),
        });
    }

    let lod_count = reader.read_u32()?;
    tracing::debug!("Reading MLOD with {} LODs", lod_count);

    let mut lods = Vec::with_capacity(lod_count.min(256) as usize);
    for index in 0..lod_count {
        let lod = read_lod(&mut reader)?;
        tracing::debug!(
            "LOD {}: {} ({} vertices, {} faces, {} taggs)",
            index,
            lod.resolution,
            lod.vertices.len(),
            lod.faces.len(),
            lod.taggs.len()
        );
        lods.push(lod);
    }

    reader.expect_end("the last LOD")?;

    Ok(MloDFile { version, lods })
}

fn read_lod<R: Read + Seek>(reader: &mut BinaryReader<R>) -> Result<Lod> {
    let magic = reader.read_signature::<4>()?;
    if &magic != b"P3DM" {
        return Err(Error::UnsupportedSignature {
            format: "P3DM",
            found: String::from_utf8_lossy(&magic).into_owned(),
        });
    }
    let version = (reader.read_u32()?, reader.read_u32()?);
    if version != LOD_VERSION {
        return Err(Error::UnsupportedVersion {
            format: "P3DM",
            version: format!("{:#x}.{:#x}", version.0, version.1),
        });
    }

    let vertex_count = reader.read_u32()? as usize;
    let normal_count = reader.read_u32()? as usize;
    let face_count = reader.read_u32()? as usize;
    let flags = reader.read_u32()?;

    // Each table entry is at least 12 bytes, so counts past the stream size are corrupt.
    let bound = reader.remaining()? as usize / 12 + 1;

    let mut vertices = Vec::with_capacity(vertex_count.min(bound));
    for _ in 0..vertex_count {
        vertices.push(Vertex {
            position: read_vec3(reader)?,
            flags: reader.read_u32()?,
        });
    }

    let mut normals = Vec::with_capacity(normal_count.min(bound));
    for _ in 0..normal_count {
        normals.push(read_vec3(reader)?);
    }

    let mut faces = Vec::with_capacity(face_count.min(bound));
    for index in 0..face_count {
        faces.push(read_face(reader, index)?);
    }

    let mut lod = Lod {
        version,
        flags,
        vertices,
        normals,
        faces,
        taggs: Vec::new(),
        resolution: LodResolution::default(),
    };
    read_taggs(reader, &mut lod)?;
    lod.resolution = LodResolution::decode(reader.read_f32()?);
    Ok(lod)
}

fn read_vec3<R: Read + Seek>(reader: &mut BinaryReader<R>) -> Result<Vec3> {
    Ok(Vec3::new(reader.read_f32()?, reader.read_f32()?, reader.read_f32()?))
}

fn read_face<R: Read + Seek>(reader: &mut BinaryReader<R>, index: usize) -> Result<Face> {
    let side_count = reader.read_u32()?;
    if !(3..=4).contains(&side_count) {
        return Err(Error::InvalidFace {
            index,
            sides: side_count,
        });
    }

    // Four side slots are always stored; a triangle leaves the last one as padding.
    let mut sides = Vec::with_capacity(4);
    for slot in 0..4 {
        let side = FaceSide {
            vertex: reader.read_u32()?,
            normal: reader.read_u32()?,
            uv: [reader.read_f32()?, reader.read_f32()?],
        };
        if slot < side_count {
            sides.push(side);
        }
    }

    Ok(Face {
        sides,
        flags: reader.read_u32()?,
        texture: reader.read_asciiz()?,
        material: reader.read_asciiz()?,
    })
}

fn read_taggs<R: Read + Seek>(reader: &mut BinaryReader<R>, lod: &mut Lod) -> Result<()> {
    let offset = reader.position()?;
    let magic = reader
        .read_signature::<4>()
        .map_err(|_| Error::InvalidTaggSection { offset })?;
    if &magic != b"TAGG" {
        return Err(Error::InvalidTaggSection { offset });
    }

    loop {
        let offset = reader.position()?;
        if reader.is_at_end()? {
            return Err(Error::InvalidTerminator {
                what: format!("stream ended before {EOF_TAGG}"),
                offset,
            });
        }

        let (active, name, length) = match read_tagg_header(reader) {
            Ok(header) => header,
            Err(Error::UnexpectedEof { .. } | Error::MalformedString { .. }) => {
                return Err(Error::InvalidTerminator {
                    what: format!("truncated TAGG record before {EOF_TAGG}"),
                    offset,
                });
            }
            Err(err) => return Err(err),
        };

        if name == EOF_TAGG {
            if length != 0 {
                return Err(Error::InvalidTerminator {
                    what: format!("{EOF_TAGG} with length {length}"),
                    offset,
                });
            }
            return Ok(());
        }

        // Without its end marker the list runs into the resolution and the next
        // LOD, which never decode as a named record that fits in the stream.
        let payload_offset = reader.position()?;
        if name.is_empty() || name.chars().any(char::is_control) {
            return Err(Error::InvalidTerminator {
                what: format!("record {name:?} is not a TAGG, {EOF_TAGG} missing"),
                offset,
            });
        }
        if reader.remaining()? < u64::from(length) {
            return Err(Error::InvalidTerminator {
                what: format!(
                    "TAGG '{name}' declares {length} bytes past the end, {EOF_TAGG} missing"
                ),
                offset,
            });
        }

        if !active {
            tracing::debug!("Skipping inactive TAGG '{}'", name);
            reader.skip(u64::from(length))?;
            continue;
        }

        match read_tagg_data(reader, lod, &name, length)? {
            Some(data) => lod.taggs.push(Tagg { name, data }),
            None => {
                tracing::debug!("Skipping TAGG '{}' ({} bytes)", name, length);
                reader.seek_to(payload_offset + u64::from(length))?;
            }
        }
    }
}

fn read_tagg_header<R: Read + Seek>(reader: &mut BinaryReader<R>) -> Result<(bool, String, u32)> {
    Ok((reader.read_u8()? != 0, reader.read_asciiz()?, reader.read_u32()?))
}

fn check_length(name: &str, expected: usize, found: u32) -> Result<()> {
    if expected == found as usize {
        Ok(())
    } else {
        Err(Error::InvalidTaggLength {
            name: name.to_string(),
            expected: expected as u32,
            found,
        })
    }
}

/// Decode one TAGG payload. `None` means the record is not modelled.
fn read_tagg_data<R: Read + Seek>(
    reader: &mut BinaryReader<R>,
    lod: &Lod,
    name: &str,
    length: u32,
) -> Result<Option<TaggData>> {
    let data = match name {
        SHARP_EDGES_TAGG => {
            check_length(name, length as usize / 8 * 8, length)?;
            let mut edges = Vec::with_capacity(length as usize / 8);
            for _ in 0..length / 8 {
                edges.push((reader.read_u32()?, reader.read_u32()?));
            }
            TaggData::SharpEdges(edges)
        }
        PROPERTY_TAGG => {
            check_length(name, PROPERTY_FIELD_LEN * 2, length)?;
            TaggData::Property {
                key: reader.read_asciiz_field(PROPERTY_FIELD_LEN)?,
                value: reader.read_asciiz_field(PROPERTY_FIELD_LEN)?,
            }
        }
        MASS_TAGG => {
            check_length(name, lod.vertices.len() * 4, length)?;
            let mut masses = Vec::with_capacity(lod.vertices.len());
            for _ in 0..lod.vertices.len() {
                masses.push(reader.read_f32()?);
            }
            TaggData::Mass(masses)
        }
        UV_SET_TAGG => {
            let sides = lod.side_count();
            check_length(name, 4 + sides * 8, length)?;
            let id = reader.read_u32()?;
            let mut uvs = Vec::with_capacity(sides);
            for _ in 0..sides {
                uvs.push([reader.read_f32()?, reader.read_f32()?]);
            }
            TaggData::UvSet { id, uvs }
        }
        _ if is_system_name(name) => return Ok(None),
        _ if length == 0 && lod.vertices.is_empty() && lod.faces.is_empty() => {
            TaggData::Selection {
                vertices: Vec::new(),
                faces: Vec::new(),
            }
        }
        _ if length == 0 => TaggData::Empty,
        _ => {
            check_length(name, lod.vertices.len() + lod.faces.len(), length)?;
            let vertices = reader
                .read_bytes(lod.vertices.len())?
                .into_iter()
                .map(decode_weight)
                .collect();
            let faces = reader
                .read_bytes(lod.faces.len())?
                .into_iter()
                .map(decode_weight)
                .collect();
            TaggData::Selection { vertices, faces }
        }
    };
    Ok(Some(data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::p3d::serialize_p3d;

    // MLOD header, then one empty LOD: P3DM header, "TAGG", the end marker, resolution.
    fn empty_model() -> Vec<u8> {
        let file = MloDFile {
            lods: vec![Lod::default()],
            ..MloDFile::default()
        };
        serialize_p3d(&file).unwrap()
    }

    const TAGG_AT: usize = 12 + 28;
    const EOF_LENGTH_AT: usize = TAGG_AT + 4 + 1 + EOF_TAGG.len() + 1;

    #[test]
    fn test_empty_lod() {
        let file = parse_p3d_bytes(&empty_model()).unwrap();
        assert_eq!(file.lods.len(), 1);
        assert!(file.lods[0].taggs.is_empty());
    }

    #[test]
    fn test_eof_tagg_with_length() {
        let mut data = empty_model();
        data[EOF_LENGTH_AT] = 5;
        assert!(matches!(
            parse_p3d_bytes(&data),
            Err(Error::InvalidTerminator { .. })
        ));
    }

    #[test]
    fn test_missing_eof_tagg() {
        let mut data = empty_model();
        data.truncate(TAGG_AT + 4);
        assert!(matches!(
            parse_p3d_bytes(&data),
            Err(Error::InvalidTerminator { .. })
        ));
    }

    #[test]
    fn test_renamed_eof_tagg() {
        let mut data = empty_model();
        data[TAGG_AT + 4 + 10] = b'X';
        assert!(matches!(
            parse_p3d_bytes(&data),
            Err(Error::InvalidTerminator { .. })
        ));
    }

    #[test]
    fn test_tagg_past_end_of_stream() {
        let mut data = empty_model();
        let mut extra = vec![1u8];
        extra.extend_from_slice(b"lid\0");
        extra.extend_from_slice(&4096u32.to_le_bytes());
        let at = TAGG_AT + 4;
        data.splice(at..at, extra);
        assert!(matches!(
            parse_p3d_bytes(&data),
            Err(Error::InvalidTerminator { offset, .. }) if offset == at as u64
        ));
    }

    #[test]
    fn test_bytes_after_last_lod() {
        let mut data = empty_model();
        data.extend_from_slice(&[0, 0]);
        assert!(matches!(
            parse_p3d_bytes(&data),
            Err(Error::InvalidTerminator { .. })
        ));
    }

    #[test]
    fn test_bad_tagg_signature() {
        let mut data = empty_model();
        data[TAGG_AT + 3] = b'X';
        assert!(matches!(
            parse_p3d_bytes(&data),
            Err(Error::InvalidTaggSection { offset }) if offset == TAGG_AT as u64
        ));
    }

    #[test]
    fn test_bad_signatures_and_versions() {
        let mut data = empty_model();
        data[0] = b'O';
        assert!(matches!(
            parse_p3d_bytes(&data),
            Err(Error::UnsupportedSignature { format: "MLOD", .. })
        ));

        let mut data = empty_model();
        data[4] = 0;
        assert!(matches!(
            parse_p3d_bytes(&data),
            Err(Error::UnsupportedVersion { format: "MLOD", .. })
        ));

        let mut data = empty_model();
        data[16] = 0x1D;
        assert!(matches!(
            parse_p3d_bytes(&data),
            Err(Error::UnsupportedVersion { format: "P3DM", .. })
        ));
    }

    #[test]
    fn test_inactive_and_unknown_taggs_skipped() {
        let mut data = empty_model();
        let mut extra = Vec::new();
        extra.push(0u8);
        extra.extend_from_slice(b"hidden\0");
        extra.extend_from_slice(&3u32.to_le_bytes());
        extra.extend_from_slice(&[9, 9, 9]);
        extra.push(1u8);
        extra.extend_from_slice(b"#Lock#\0");
        extra.extend_from_slice(&2u32.to_le_bytes());
        extra.extend_from_slice(&[7, 7]);
        let at = TAGG_AT + 4;
        data.splice(at..at, extra);

        let file = parse_p3d_bytes(&data).unwrap();
        assert!(file.lods[0].taggs.is_empty());
    }
}
