//! RTM animation structures
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`
//!
//! SPDX-License-Identifier: MIT

use glam::{Mat4, Quat, Vec3};

/// A modern RTM file: optional timeline events plus the animation itself.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RtmFile {
    pub anim: Rtm0101,
    pub props: Option<RtmProps>,
}

/// `RTM_0101` animation block.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Rtm0101 {
    /// Root translation over one full cycle.
    pub motion: Vec3,
    pub bones: Vec<String>,
    pub frames: Vec<Frame>,
}

/// One keyframe.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Frame {
    /// Normalized position in the animation, `0.0..=1.0`.
    pub phase: f32,
    pub transforms: Vec<BoneTransform>,
}

/// A bone's model-space matrix in one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct BoneTransform {
    pub bone: String,
    pub matrix: Mat4,
}

/// Named events along the timeline (`RTM_MDAT`).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RtmProps {
    pub items: Vec<RtmProp>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RtmProp {
    pub phase: f32,
    pub name: String,
    pub value: String,
}

/// Legacy `BMTR` animation.
///
/// Unlike [`Rtm0101`] it names each bone's parent and stores transforms
/// relative to that parent.
#[derive(Debug, Clone, PartialEq)]
pub struct BmtrFile {
    pub version: u32,
    pub motion: Vec3,
    pub bones: Vec<BmtrBone>,
    pub props: Vec<RtmProp>,
    pub phases: Vec<f32>,
    /// `frames[frame][bone]`, in `bones` order.
    pub frames: Vec<Vec<LocalTransform>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BmtrBone {
    pub name: String,
    /// Empty for root bones.
    pub parent: String,
}

/// Parent-relative bone transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalTransform {
    pub rotation: Quat,
    pub translation: Vec3,
}

/// Either RTM layout, as detected from the file signature.
#[derive(Debug, Clone, PartialEq)]
pub enum AnimationFile {
    Rtm(RtmFile),
    Bmtr(BmtrFile),
}

impl Rtm0101 {
    /// Frame whose phase is closest to `phase`.
    pub fn frame_at(&self, phase: f32) -> Option<&Frame> {
        self.frames
            .iter()
            .min_by(|a, b| (a.phase - phase).abs().total_cmp(&(b.phase - phase).abs()))
    }

    /// Root motion covered by a phase step.
    pub fn scale_motion(&self, phase_delta: f32) -> Vec3 {
        self.motion * phase_delta
    }

    pub fn has_bone(&self, name: &str) -> bool {
        self.bones.iter().any(|b| b.eq_ignore_ascii_case(name))
    }
}

impl Frame {
    /// Matrix of a bone in this frame, by case-insensitive name.
    pub fn transform(&self, bone: &str) -> Option<&Mat4> {
        self.transforms
            .iter()
            .find(|t| t.bone.eq_ignore_ascii_case(bone))
            .map(|t| &t.matrix)
    }
}

impl Default for LocalTransform {
    fn default() -> Self {
        Self {
            rotation: Quat::IDENTITY,
            translation: Vec3::ZERO,
        }
    }
}

impl LocalTransform {
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation, self.translation)
    }
}

impl AnimationFile {
    pub fn frame_count(&self) -> usize {
        match self {
            AnimationFile::Rtm(rtm) => rtm.anim.frames.len(),
            AnimationFile::Bmtr(bmtr) => bmtr.frames.len(),
        }
    }

    pub fn bone_names(&self) -> Vec<&str> {
        match self {
            AnimationFile::Rtm(rtm) => rtm.anim.bones.iter().map(String::as_str).collect(),
            AnimationFile::Bmtr(bmtr) => bmtr.bones.iter().map(|b| b.name.as_str()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_at_nearest() {
        let anim = Rtm0101 {
            motion: Vec3::new(0.0, 0.0, 2.0),
            bones: vec!["pelvis".into()],
            frames: [0.0, 0.5, 1.0]
                .into_iter()
                .map(|phase| Frame {
                    phase,
                    transforms: Vec::new(),
                })
                .collect(),
        };
        assert_eq!(anim.frame_at(0.3).unwrap().phase, 0.5);
        assert_eq!(anim.frame_at(0.1).unwrap().phase, 0.0);
        assert_eq!(anim.scale_motion(0.25), Vec3::new(0.0, 0.0, 0.5));
        assert!(anim.has_bone("Pelvis"));
    }
}
