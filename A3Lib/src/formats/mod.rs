//! File format handlers for Arma content formats
//!
//! - [`cfg`] - text config model, parser and formatter
//! - [`rap`] - rapified (binary) config reader
//! - [`p3d`] - MLOD editable models
//! - [`rtm`] - skeletal animations, modern and legacy

pub mod cfg;
pub mod p3d;
pub mod rap;
pub mod rtm;

use std::path::Path;

// Re-export main document types
pub use cfg::{ClassRef, Config, ConfigValue};
pub use p3d::{Lod, LodKind, LodResolution, MloDFile};
pub use rtm::{AnimationFile, BmtrFile, BoneHierarchy, RtmFile};

/// File formats recognised by content or extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileFormat {
    P3d,
    Rtm,
    RapifiedConfig,
    ConfigText,
}

impl FileFormat {
    /// Detect a format, signature first and extension second.
    ///
    /// Files such as `config.bin` or `config.cpp` may hold either config
    /// form, so the signature decides between them.
    pub fn detect(path: &Path, data: &[u8]) -> Option<Self> {
        if data.starts_with(b"MLOD") {
            return Some(Self::P3d);
        }
        if data.starts_with(rtm::RTM_ANIM_MAGIC)
            || data.starts_with(rtm::RTM_PROPS_MAGIC)
            || data.starts_with(rtm::BMTR_MAGIC)
        {
            return Some(Self::Rtm);
        }
        if rap::is_rapified(data) {
            return Some(Self::RapifiedConfig);
        }
        let extension = path.extension()?.to_string_lossy().to_lowercase();
        match extension.as_str() {
            "cpp" | "hpp" | "h" | "cfg" | "ext" | "sqm" => Some(Self::ConfigText),
            _ => None,
        }
    }

    /// Get a human-readable name for this format
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::P3d => "MLOD P3D",
            Self::Rtm => "RTM animation",
            Self::RapifiedConfig => "Rapified config",
            Self::ConfigText => "Config text",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_by_signature() {
        assert_eq!(FileFormat::detect(Path::new("a.bin"), b"MLOD\x01\x01\0\0"), Some(FileFormat::P3d));
        assert_eq!(FileFormat::detect(Path::new("a.bin"), b"BMTR"), Some(FileFormat::Rtm));
        assert_eq!(
            FileFormat::detect(Path::new("config.cpp"), b"\0raP\0\0\0\0\x08\0\0\0"),
            Some(FileFormat::RapifiedConfig)
        );
    }

    #[test]
    fn test_detect_by_extension() {
        assert_eq!(FileFormat::detect(Path::new("Config.CPP"), b"class A {};"), Some(FileFormat::ConfigText));
        assert_eq!(FileFormat::detect(Path::new("readme.txt"), b"hello"), None);
        assert_eq!(FileFormat::detect(Path::new("noext"), b"hello"), None);
    }
}
