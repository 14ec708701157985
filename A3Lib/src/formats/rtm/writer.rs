//! RTM writing
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`
//!
//! SPDX-License-Identifier: MIT

// Binary format writing requires many intentional casts between integer types
#![allow(clippy::cast_possible_truncation)]

use super::document::{Rtm0101, RtmFile, RtmProps};
use super::reader::{BONE_NAME_LEN, RTM_ANIM_MAGIC, RTM_PROPS_MAGIC};
use crate::error::{Error, Result};
use crate::io::BinaryWriteExt;
use byteorder::{LittleEndian, WriteBytesExt};
use glam::Mat4;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Write a modern RTM file to disk
///
/// # Errors
/// Returns an error if a frame does not match the bone list or the file
/// cannot be written.
pub fn write_rtm<P: AsRef<Path>>(file: &RtmFile, path: P) -> Result<()> {
    let bytes = serialize_rtm(file)?;
    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}

/// Serialize a modern RTM file to bytes
///
/// # Errors
/// Returns an error if a frame's transform count differs from the bone count.
pub fn serialize_rtm(file: &RtmFile) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    if let Some(props) = &file.props {
        write_props(&mut out, props)?;
    }
    write_anim(&mut out, &file.anim)?;
    Ok(out)
}

fn write_props<W: Write>(out: &mut W, props: &RtmProps) -> Result<()> {
    out.write_all(RTM_PROPS_MAGIC)?;
    out.write_u32::<LittleEndian>(0)?;
    out.write_u32::<LittleEndian>(props.items.len() as u32)?;
    for item in &props.items {
        out.write_f32::<LittleEndian>(item.phase)?;
        out.write_lascii(&item.name)?;
        out.write_lascii(&item.value)?;
    }
    Ok(())
}

fn write_anim<W: Write>(out: &mut W, anim: &Rtm0101) -> Result<()> {
    out.write_all(RTM_ANIM_MAGIC)?;
    for component in anim.motion.to_array() {
        out.write_f32::<LittleEndian>(component)?;
    }
    out.write_u32::<LittleEndian>(anim.frames.len() as u32)?;
    out.write_u32::<LittleEndian>(anim.bones.len() as u32)?;
    for bone in &anim.bones {
        out.write_asciiz_field(bone, BONE_NAME_LEN)?;
    }

    for (index, frame) in anim.frames.iter().enumerate() {
        if frame.transforms.len() != anim.bones.len() {
            return Err(Error::MalformedHeader {
                format: "RTM_0101",
                reason: format!(
                    "frame {index} has {} transforms for {} bones",
                    frame.transforms.len(),
                    anim.bones.len()
                ),
            });
        }
        out.write_f32::<LittleEndian>(frame.phase)?;
        for transform in &frame.transforms {
            out.write_asciiz_field(&transform.bone, BONE_NAME_LEN)?;
            write_matrix(out, &transform.matrix)?;
        }
    }
    Ok(())
}

fn write_matrix<W: Write>(out: &mut W, matrix: &Mat4) -> Result<()> {
    for column in [matrix.x_axis, matrix.y_axis, matrix.z_axis, matrix.w_axis] {
        out.write_f32::<LittleEndian>(column.x)?;
        out.write_f32::<LittleEndian>(column.y)?;
        out.write_f32::<LittleEndian>(column.z)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::rtm::{AnimationFile, BoneTransform, Frame, RtmProp, parse_rtm_bytes};
    use glam::{Quat, Vec3};
    use pretty_assertions::assert_eq;

    fn sample() -> RtmFile {
        let bones = vec!["pelvis".to_string(), "spine".to_string()];
        let frames = [0.0_f32, 1.0]
            .into_iter()
            .map(|phase| Frame {
                phase,
                transforms: bones
                    .iter()
                    .map(|bone| BoneTransform {
                        bone: bone.clone(),
                        matrix: Mat4::from_rotation_translation(
                            Quat::from_rotation_y(phase),
                            Vec3::new(0.0, phase, 1.0),
                        ),
                    })
                    .collect(),
            })
            .collect();
        RtmFile {
            anim: Rtm0101 {
                motion: Vec3::new(0.0, 0.0, 1.5),
                bones,
                frames,
            },
            props: Some(RtmProps {
                items: vec![RtmProp {
                    phase: 0.5,
                    name: "sound".into(),
                    value: "step".into(),
                }],
            }),
        }
    }

    #[test]
    fn test_round_trip() {
        let file = sample();
        let bytes = serialize_rtm(&file).unwrap();
        assert!(bytes.starts_with(RTM_PROPS_MAGIC));
        assert_eq!(parse_rtm_bytes(&bytes).unwrap(), AnimationFile::Rtm(file));
    }

    #[test]
    fn test_without_props() {
        let mut file = sample();
        file.props = None;
        let bytes = serialize_rtm(&file).unwrap();
        assert!(bytes.starts_with(RTM_ANIM_MAGIC));
        // magic + motion + counts + names + 2 frames * (phase + 2 * (name + matrix))
        assert_eq!(bytes.len(), 8 + 12 + 8 + 2 * 32 + 2 * (4 + 2 * (32 + 48)));
        assert_eq!(parse_rtm_bytes(&bytes).unwrap(), AnimationFile::Rtm(file));
    }

    #[test]
    fn test_frame_bone_mismatch() {
        let mut file = sample();
        file.anim.frames[1].transforms.pop();
        assert!(matches!(
            serialize_rtm(&file),
            Err(Error::MalformedHeader { .. })
        ));
    }
}
