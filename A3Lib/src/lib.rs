//! # A3Lib
//!
//! A pure-Rust library for Arma 3 content pipeline formats.
//!
//! ## Supported Formats
//!
//! - **MLOD P3D** - Editable models: LODs, faces, selections, TAGG metadata
//! - **Config** - Text configs (`config.cpp`, `model.cfg`) and their JSON form
//! - **Rapified config** - Binary `config.bin` files
//! - **RTM** - Skeletal animations, including conversion of legacy `BMTR` files
//!
//! ## Quick Start
//!
//! ### Reading a Model
//!
//! ```no_run
//! use a3lib::formats::p3d::{LodKind, read_p3d};
//!
//! let model = read_p3d("box.p3d")?;
//! for lod in &model.lods {
//!     println!("{}: {} faces", lod.resolution, lod.faces.len());
//! }
//! let geometry = model.find_lod(LodKind::Geometry);
//! # Ok::<(), a3lib::Error>(())
//! ```
//!
//! ### Querying a Config
//!
//! ```
//! use a3lib::formats::cfg::{CfgParseOptions, ConfigValue, parse_cfg};
//!
//! let config = parse_cfg(
//!     "class Base { scale = 1; }; class Crate: Base { mass = 20.5; };",
//!     &CfgParseOptions::default(),
//! )?;
//! let crate_class = config.root().get_class("Crate").unwrap();
//! assert_eq!(crate_class.get_prop("scale"), Some(&ConfigValue::Long(1)));
//! # Ok::<(), a3lib::Error>(())
//! ```
//!
//! ### Converting Files
//!
//! ```no_run
//! use a3lib::converter::{cfg_to_json, rap_to_cfg};
//!
//! rap_to_cfg("config.bin", "config.cpp")?;
//! cfg_to_json("config.cpp", "config.json")?;
//! # Ok::<(), a3lib::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` - Enables the `a3lib` command-line binary

pub mod batch;
pub mod converter;
pub mod error;
pub mod formats;
pub mod io;
pub mod utils;

// Re-exports for convenience
pub use error::{Error, ErrorCategory, Result};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::error::{Error, ErrorCategory, Result};
    pub use crate::formats::FileFormat;
    pub use crate::formats::cfg::{
        CfgParseOptions, ClassRef, Config, ConfigValue, parse_cfg, read_cfg, write_cfg,
    };
    pub use crate::formats::p3d::{Lod, LodKind, LodResolution, MloDFile, read_p3d, write_p3d};
    pub use crate::formats::rap::{is_rapified, read_rap};
    pub use crate::formats::rtm::{
        AnimationFile, BmtrFile, BoneHierarchy, Rtm0101, RtmFile, read_rtm, write_rtm,
    };

    pub use crate::batch::{BatchOptions, BatchValidationResult, validate_directory};
    pub use crate::converter;
    pub use crate::utils::{ProjectRoot, normalize_path};
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// CLI module (feature-gated)
#[cfg(feature = "cli")]
pub mod cli;
