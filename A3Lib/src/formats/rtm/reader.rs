//! RTM reading and layout detection
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`
//!
//! SPDX-License-Identifier: MIT

// Binary format parsing requires many intentional casts between integer types
#![allow(clippy::cast_possible_truncation)]

use super::bmtr::read_bmtr_body;
use super::document::{AnimationFile, BoneTransform, Frame, Rtm0101, RtmFile, RtmProp, RtmProps};
use crate::error::{Error, Result};
use crate::io::BinaryReader;
use glam::{Mat4, Vec3, Vec4};
use std::fs;
use std::io::{Read, Seek};
use std::path::Path;

pub const RTM_PROPS_MAGIC: &[u8; 8] = b"RTM_MDAT";
pub const RTM_ANIM_MAGIC: &[u8; 8] = b"RTM_0101";
pub const BMTR_MAGIC: &[u8; 4] = b"BMTR";

/// Width of a bone name field.
pub const BONE_NAME_LEN: usize = 32;

/// Read an RTM file from disk, in either layout
///
/// # Errors
/// Returns an error if the file cannot be read or is not a valid RTM.
pub fn read_rtm<P: AsRef<Path>>(path: P) -> Result<AnimationFile> {
    let buffer = fs::read(path)?;
    parse_rtm_bytes(&buffer)
}

/// Parse RTM data from bytes, dispatching on the leading signature
///
/// # Errors
/// Returns an error on unknown signatures, truncated data or trailing bytes.
pub fn parse_rtm_bytes(data: &[u8]) -> Result<AnimationFile> {
    let mut reader = BinaryReader::from_bytes(data);

    if data.starts_with(BMTR_MAGIC) {
        reader.skip(BMTR_MAGIC.len() as u64)?;
        tracing::debug!("Detected legacy BMTR animation");
        let bmtr = read_bmtr_body(&mut reader)?;
        reader.expect_end("BMTR animation data")?;
        return Ok(AnimationFile::Bmtr(bmtr));
    }

    let magic = reader.read_signature::<8>()?;
    let props = if &magic == RTM_PROPS_MAGIC {
        let props = read_props(&mut reader)?;
        let next = reader.read_signature::<8>()?;
        check_anim_magic(&next)?;
        Some(props)
    } else {
        check_anim_magic(&magic)?;
        None
    };

    let anim = read_anim(&mut reader)?;
    tracing::debug!(
        "Read RTM with {} bones and {} frames",
        anim.bones.len(),
        anim.frames.len()
    );

    reader.expect_end("RTM animation data")?;
    Ok(AnimationFile::Rtm(RtmFile { anim, props }))
}

fn check_anim_magic(magic: &[u8; 8]) -> Result<()> {
    if magic == RTM_ANIM_MAGIC {
        Ok(())
    } else {
        Err(Error::UnsupportedSignature {
            format: "RTM",
            found: String::from_utf8_lossy(magic).into_owned(),
        })
    }
}

fn read_props<R: Read + Seek>(reader: &mut BinaryReader<R>) -> Result<RtmProps> {
    let offset = reader.position()?;
    let reserved = reader.read_u32()?;
    if reserved != 0 {
        return Err(Error::MalformedHeader {
            format: "RTM_MDAT",
            reason: format!("expected 0 at offset {offset}, found {reserved}"),
        });
    }
    let count = reader.read_u32()?;
    let mut items = Vec::with_capacity(count.min(1024) as usize);
    for _ in 0..count {
        items.push(RtmProp {
            phase: reader.read_f32()?,
            name: reader.read_lascii()?,
            value: reader.read_lascii()?,
        });
    }
    Ok(RtmProps { items })
}

fn read_anim<R: Read + Seek>(reader: &mut BinaryReader<R>) -> Result<Rtm0101> {
    let motion = Vec3::new(reader.read_f32()?, reader.read_f32()?, reader.read_f32()?);
    let frame_count = reader.read_u32()? as usize;
    let bone_count = reader.read_u32()? as usize;

    // Every bone needs at least a name field, so larger counts are corrupt.
    let bound = reader.remaining()? as usize / BONE_NAME_LEN + 1;

    let mut bones = Vec::with_capacity(bone_count.min(bound));
    for _ in 0..bone_count {
        bones.push(reader.read_asciiz_field(BONE_NAME_LEN)?);
    }

    let mut frames = Vec::with_capacity(frame_count.min(bound));
    for _ in 0..frame_count {
        let phase = reader.read_f32()?;
        let mut transforms = Vec::with_capacity(bone_count);
        for _ in 0..bone_count {
            transforms.push(BoneTransform {
                bone: reader.read_asciiz_field(BONE_NAME_LEN)?,
                matrix: read_matrix(reader)?,
            });
        }
        frames.push(Frame { phase, transforms });
    }

    Ok(Rtm0101 {
        motion,
        bones,
        frames,
    })
}

/// 4x3 affine matrix, column-major, with an implicit `(0, 0, 0, 1)` row.
fn read_matrix<R: Read + Seek>(reader: &mut BinaryReader<R>) -> Result<Mat4> {
    let mut columns = [Vec4::ZERO; 4];
    for (index, column) in columns.iter_mut().enumerate() {
        let w = if index == 3 { 1.0 } else { 0.0 };
        *column = Vec4::new(reader.read_f32()?, reader.read_f32()?, reader.read_f32()?, w);
    }
    Ok(Mat4::from_cols(columns[0], columns[1], columns[2], columns[3]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_signature() {
        assert!(matches!(
            parse_rtm_bytes(b"NOT_AN_RTM_FILE!"),
            Err(Error::UnsupportedSignature { format: "RTM", .. })
        ));
    }

    #[test]
    fn test_truncated_anim() {
        let mut data = RTM_ANIM_MAGIC.to_vec();
        data.extend_from_slice(&[0u8; 6]);
        assert!(matches!(
            parse_rtm_bytes(&data),
            Err(Error::UnexpectedEof { .. })
        ));
    }

    #[test]
    fn test_trailing_bytes_rejected() {
        let mut modern = crate::formats::rtm::serialize_rtm(&RtmFile::default()).unwrap();
        assert!(parse_rtm_bytes(&modern).is_ok());
        modern.push(0);
        assert!(matches!(
            parse_rtm_bytes(&modern),
            Err(Error::InvalidTerminator { .. })
        ));

        let mut legacy = BMTR_MAGIC.to_vec();
        legacy.extend_from_slice(&4u32.to_le_bytes());
        legacy.extend_from_slice(&[0u8; 12]);
        legacy.extend_from_slice(&[0, 0, 0]);
        assert!(parse_rtm_bytes(&legacy).is_ok());
        legacy.extend_from_slice(b"pad");
        assert!(matches!(
            parse_rtm_bytes(&legacy),
            Err(Error::InvalidTerminator { .. })
        ));
    }

    #[test]
    fn test_props_reserved_field() {
        let mut data = RTM_PROPS_MAGIC.to_vec();
        data.extend_from_slice(&7u32.to_le_bytes());
        assert!(matches!(
            parse_rtm_bytes(&data),
            Err(Error::MalformedHeader { .. })
        ));
    }
}
