//! Legacy BMTR to modern RTM conversion
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`
//!
//! SPDX-License-Identifier: MIT

use crate::error::{Error, Result};
use crate::formats::rtm::{AnimationFile, BoneHierarchy, read_rtm, write_rtm};
use std::path::Path;

/// Convert a legacy BMTR animation to a modern RTM
///
/// Modern RTM sources are rewritten unchanged.
///
/// # Errors
/// Returns an error if the source cannot be read, a bone is missing from
/// `hierarchy`, or the output cannot be written.
pub fn convert_bmtr_to_rtm<P: AsRef<Path>>(
    source: P,
    dest: P,
    hierarchy: &BoneHierarchy,
) -> Result<()> {
    convert_bmtr_to_rtm_with_progress(source, dest, hierarchy, &|_| {})
}

/// Convert a legacy BMTR animation to a modern RTM with progress callback
///
/// # Errors
/// Returns an error if the source cannot be read, a bone is missing from
/// `hierarchy`, or the output cannot be written.
pub fn convert_bmtr_to_rtm_with_progress<P: AsRef<Path>>(
    source: P,
    dest: P,
    hierarchy: &BoneHierarchy,
    progress: crate::converter::ConvertProgressCallback,
) -> Result<()> {
    use crate::converter::{ConvertPhase, ConvertProgress};
    tracing::info!(
        "Converting BMTR→RTM: {:?} → {:?}",
        source.as_ref(),
        dest.as_ref()
    );

    progress(&ConvertProgress::with_file(
        ConvertPhase::ReadingSource,
        1,
        3,
        "Reading animation...",
    ));
    let rtm = match read_rtm(&source)? {
        AnimationFile::Bmtr(bmtr) => {
            progress(&ConvertProgress::with_file(
                ConvertPhase::Converting,
                2,
                3,
                format!(
                    "Resolving {} bones over {} frames...",
                    bmtr.bones.len(),
                    bmtr.frames.len()
                ),
            ));
            bmtr.to_rtm(hierarchy)?
        }
        AnimationFile::Rtm(rtm) => {
            tracing::warn!("{:?} is already a modern RTM", source.as_ref());
            rtm
        }
    };

    progress(&ConvertProgress::with_file(
        ConvertPhase::WritingOutput,
        3,
        3,
        "Writing RTM file...",
    ));
    write_rtm(&rtm, dest)?;

    tracing::info!("Conversion complete");
    Ok(())
}

/// Load a bone hierarchy from a model config's `CfgSkeletons` class.
///
/// # Errors
/// Returns an error if the config cannot be read or has no such skeleton.
pub fn load_skeleton<P: AsRef<Path>>(config: P, skeleton: &str) -> Result<BoneHierarchy> {
    let config = super::read_any_config(config)?;
    BoneHierarchy::from_config_skeleton(&config, skeleton).ok_or_else(|| Error::MissingSkeleton {
        name: skeleton.to_string(),
    })
}
