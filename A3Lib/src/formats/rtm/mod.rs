//! RTM skeletal animation support
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`
//!
//! SPDX-License-Identifier: MIT
//!
//! Two on-disk layouts exist. Modern files (`RTM_0101`, optionally preceded
//! by an `RTM_MDAT` event block) store model-space matrices per bone per
//! frame. Legacy `BMTR` files store parent-relative rotations and
//! translations and need a [`BoneHierarchy`] to become modern files.

mod bmtr;
mod document;
mod hierarchy;
mod reader;
mod writer;

pub use bmtr::{BMTR_VERSIONS, serialize_bmtr, write_bmtr};
pub use document::{
    AnimationFile, BmtrBone, BmtrFile, BoneTransform, Frame, LocalTransform, Rtm0101, RtmFile,
    RtmProp, RtmProps,
};
pub use hierarchy::BoneHierarchy;
pub use reader::{
    BMTR_MAGIC, BONE_NAME_LEN, RTM_ANIM_MAGIC, RTM_PROPS_MAGIC, parse_rtm_bytes, read_rtm,
};
pub use writer::{serialize_rtm, write_rtm};
