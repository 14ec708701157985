//! Legacy `BMTR` animations and their conversion to `RTM_0101`
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`
//!
//! SPDX-License-Identifier: MIT

// Binary format parsing requires many intentional casts between integer types
#![allow(clippy::cast_possible_truncation)]

use super::document::{
    BmtrBone, BmtrFile, BoneTransform, Frame, LocalTransform, Rtm0101, RtmFile, RtmProp, RtmProps,
};
use super::hierarchy::BoneHierarchy;
use super::reader::BMTR_MAGIC;
use crate::error::{Error, Result};
use crate::io::{BinaryReader, BinaryWriteExt};
use byteorder::{LittleEndian, WriteBytesExt};
use glam::{Mat4, Quat, Vec3};
use half::f16;
use std::fs::File;
use std::io::{BufWriter, Read, Seek, Write};
use std::path::Path;

/// Versions of the legacy layout this library reads.
pub const BMTR_VERSIONS: std::ops::RangeInclusive<u32> = 3..=5;

const QUAT_SCALE: f32 = 32767.0;

/// Read the legacy body that follows the `BMTR` signature.
pub(crate) fn read_bmtr_body<R: Read + Seek>(reader: &mut BinaryReader<R>) -> Result<BmtrFile> {
    let version = reader.read_u32()?;
    if !BMTR_VERSIONS.contains(&version) {
        return Err(Error::UnsupportedVersion {
            format: "BMTR",
            version: version.to_string(),
        });
    }
    let motion = Vec3::new(reader.read_f32()?, reader.read_f32()?, reader.read_f32()?);

    // Counts are bounded by the bytes left so corrupt headers cannot request huge buffers.
    let bound = reader.remaining()? as usize + 1;

    let bone_count = reader.read_compressed_uint()? as usize;
    let mut bones = Vec::with_capacity(bone_count.min(bound));
    for _ in 0..bone_count {
        bones.push(BmtrBone {
            name: reader.read_asciiz()?,
            parent: reader.read_asciiz()?,
        });
    }

    let prop_count = reader.read_compressed_uint()? as usize;
    let mut props = Vec::with_capacity(prop_count.min(bound));
    for _ in 0..prop_count {
        props.push(RtmProp {
            phase: reader.read_f32()?,
            name: reader.read_asciiz()?,
            value: reader.read_asciiz()?,
        });
    }

    let frame_count = reader.read_compressed_uint()? as usize;
    let mut phases = Vec::with_capacity(frame_count.min(bound));
    for _ in 0..frame_count {
        phases.push(reader.read_f32()?);
    }

    let mut frames = Vec::with_capacity(frame_count.min(bound));
    for _ in 0..frame_count {
        let mut transforms = Vec::with_capacity(bone_count);
        for _ in 0..bone_count {
            transforms.push(read_local_transform(reader)?);
        }
        frames.push(transforms);
    }

    tracing::debug!(
        "Read BMTR v{} with {} bones and {} frames",
        version,
        bones.len(),
        frames.len()
    );
    Ok(BmtrFile {
        version,
        motion,
        bones,
        props,
        phases,
        frames,
    })
}

fn read_local_transform<R: Read + Seek>(reader: &mut BinaryReader<R>) -> Result<LocalTransform> {
    let mut q = [0.0f32; 4];
    for component in &mut q {
        *component = f32::from(reader.read_i16()?) / QUAT_SCALE;
    }
    let rotation = Quat::from_array(q);
    let rotation = if rotation.length_squared() > 0.0 {
        rotation.normalize()
    } else {
        Quat::IDENTITY
    };
    let translation = Vec3::new(reader.read_f16()?, reader.read_f16()?, reader.read_f16()?);
    Ok(LocalTransform {
        rotation,
        translation,
    })
}

/// Write a legacy BMTR file to disk
///
/// # Errors
/// Returns an error if the frame table is inconsistent or the file cannot be written.
pub fn write_bmtr<P: AsRef<Path>>(file: &BmtrFile, path: P) -> Result<()> {
    let bytes = serialize_bmtr(file)?;
    let mut writer = BufWriter::new(File::create(path)?);
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}

/// Serialize a legacy BMTR file to bytes
///
/// Rotations are quantized to 16-bit integers and translations to half floats.
///
/// # Errors
/// Returns an error if the frame and phase counts differ, or a frame does
/// not have one transform per bone.
pub fn serialize_bmtr(file: &BmtrFile) -> Result<Vec<u8>> {
    if file.frames.len() != file.phases.len() {
        return Err(Error::MalformedHeader {
            format: "BMTR",
            reason: format!(
                "{} frames for {} phases",
                file.frames.len(),
                file.phases.len()
            ),
        });
    }

    let mut out = Vec::new();
    out.write_all(BMTR_MAGIC)?;
    out.write_u32::<LittleEndian>(file.version)?;
    for component in file.motion.to_array() {
        out.write_f32::<LittleEndian>(component)?;
    }

    out.write_compressed_uint(file.bones.len() as u64)?;
    for bone in &file.bones {
        out.write_asciiz(&bone.name)?;
        out.write_asciiz(&bone.parent)?;
    }

    out.write_compressed_uint(file.props.len() as u64)?;
    for prop in &file.props {
        out.write_f32::<LittleEndian>(prop.phase)?;
        out.write_asciiz(&prop.name)?;
        out.write_asciiz(&prop.value)?;
    }

    out.write_compressed_uint(file.phases.len() as u64)?;
    for &phase in &file.phases {
        out.write_f32::<LittleEndian>(phase)?;
    }

    for (index, frame) in file.frames.iter().enumerate() {
        if frame.len() != file.bones.len() {
            return Err(Error::MalformedHeader {
                format: "BMTR",
                reason: format!(
                    "frame {index} has {} transforms for {} bones",
                    frame.len(),
                    file.bones.len()
                ),
            });
        }
        for transform in frame {
            for component in transform.rotation.to_array() {
                let quantized = (component * QUAT_SCALE).round().clamp(-QUAT_SCALE, QUAT_SCALE);
                out.write_i16::<LittleEndian>(quantized as i16)?;
            }
            for component in transform.translation.to_array() {
                out.write_u16::<LittleEndian>(f16::from_f32(component).to_bits())?;
            }
        }
    }
    Ok(out)
}

impl BmtrFile {
    /// Convert to the modern layout.
    ///
    /// Each bone's parent comes from `hierarchy`, not from the file, and
    /// parent-relative transforms are composed into model space. Parents the
    /// animation does not key contribute an identity transform.
    ///
    /// # Errors
    /// Returns [`Error::UnresolvableBoneHierarchy`] if a bone is missing from
    /// `hierarchy` or its parent chain loops.
    pub fn to_rtm(&self, hierarchy: &BoneHierarchy) -> Result<RtmFile> {
        let parents = self.resolve_parents(hierarchy)?;

        let frames = self
            .phases
            .iter()
            .zip(&self.frames)
            .map(|(&phase, locals)| {
                let mut world: Vec<Option<Mat4>> = vec![None; self.bones.len()];
                for index in 0..self.bones.len() {
                    compose(index, locals, &parents, &mut world);
                }
                Frame {
                    phase,
                    transforms: self
                        .bones
                        .iter()
                        .zip(world)
                        .map(|(bone, matrix)| BoneTransform {
                            bone: bone.name.clone(),
                            matrix: matrix.unwrap_or(Mat4::IDENTITY),
                        })
                        .collect(),
                }
            })
            .collect();

        let props = (!self.props.is_empty()).then(|| RtmProps {
            items: self.props.clone(),
        });

        Ok(RtmFile {
            anim: Rtm0101 {
                motion: self.motion,
                bones: self.bones.iter().map(|b| b.name.clone()).collect(),
                frames,
            },
            props,
        })
    }

    /// Index of each bone's nearest keyed ancestor.
    fn resolve_parents(&self, hierarchy: &BoneHierarchy) -> Result<Vec<Option<usize>>> {
        let index_of = |name: &str| {
            self.bones
                .iter()
                .position(|b| b.name.eq_ignore_ascii_case(name))
        };

        let mut parents = Vec::with_capacity(self.bones.len());
        for bone in &self.bones {
            let unresolvable = || Error::UnresolvableBoneHierarchy {
                bone: bone.name.clone(),
            };

            // Walk up until a keyed bone or a root; more steps than bones means a loop.
            let mut current = bone.name.as_str();
            let mut parent = None;
            for _ in 0..=hierarchy.len() {
                match hierarchy.parent_of(current).ok_or_else(unresolvable)? {
                    None => break,
                    Some(name) => {
                        if let Some(index) = index_of(name) {
                            parent = Some(index);
                            break;
                        }
                        current = name;
                    }
                }
            }
            if parent.is_none() && hierarchy.parent_of(current).flatten().is_some() {
                return Err(unresolvable());
            }
            parents.push(parent);
        }

        // Keyed bones can still form a loop through each other.
        for start in 0..parents.len() {
            let mut current = parents[start];
            let mut steps = 0;
            while let Some(index) = current {
                steps += 1;
                if steps > parents.len() {
                    return Err(Error::UnresolvableBoneHierarchy {
                        bone: self.bones[start].name.clone(),
                    });
                }
                current = parents[index];
            }
        }
        Ok(parents)
    }
}

fn compose(
    index: usize,
    locals: &[LocalTransform],
    parents: &[Option<usize>],
    world: &mut [Option<Mat4>],
) -> Mat4 {
    if let Some(matrix) = world[index] {
        return matrix;
    }
    let local = locals[index].to_matrix();
    let matrix = match parents[index] {
        Some(parent) => compose(parent, locals, parents, world) * local,
        None => local,
    };
    world[index] = Some(matrix);
    matrix
}
