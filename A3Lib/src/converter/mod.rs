//! Format conversion utilities
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`
//!
//! SPDX-License-Identifier: MIT
//!
//! File-to-file conversions between the supported formats:
//! - Rapified config → config text
//! - Config (text or rapified) ↔ JSON
//! - Legacy BMTR animation → modern RTM

mod bmtr_to_rtm;
mod cfg_json;
mod rap_to_cfg;
mod types;

pub use types::{ConvertPhase, ConvertProgress, ConvertProgressCallback};

pub use bmtr_to_rtm::{convert_bmtr_to_rtm, convert_bmtr_to_rtm_with_progress, load_skeleton};
pub use cfg_json::{
    convert_cfg_to_json, convert_cfg_to_json_with_progress, convert_json_to_cfg,
    convert_json_to_cfg_with_progress, read_any_config,
};
pub use rap_to_cfg::{convert_rap_to_cfg, convert_rap_to_cfg_with_progress};

// Convenience aliases matching the module names
pub use bmtr_to_rtm::convert_bmtr_to_rtm as bmtr_to_rtm;
pub use cfg_json::convert_cfg_to_json as cfg_to_json;
pub use cfg_json::convert_json_to_cfg as json_to_cfg;
pub use rap_to_cfg::convert_rap_to_cfg as rap_to_cfg;
