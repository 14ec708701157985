use clap::Subcommand;
use std::path::PathBuf;

pub mod config;
pub mod convert;
pub mod definitions;
pub mod execute;
pub mod info;
pub mod lods;
pub mod validate;

pub use definitions::ConfigCommands;

#[derive(Subcommand)]
pub enum Commands {
    /// Describe a model, animation or config file
    Info {
        /// File to inspect
        path: PathBuf,
    },

    /// Convert between formats (chosen by source content and destination extension)
    ///
    /// Supported: rapified config -> .cpp/.hpp/.cfg, config -> .json,
    /// .json -> config text, legacy BMTR .rtm -> .rtm
    Convert {
        /// Source file
        source: PathBuf,

        /// Output file
        destination: PathBuf,

        /// Config containing `CfgSkeletons` (required for BMTR -> RTM)
        #[arg(long = "skeleton-config", requires = "skeleton")]
        skeleton_config: Option<PathBuf>,

        /// Skeleton class name inside `CfgSkeletons`
        #[arg(long, requires = "skeleton_config")]
        skeleton: Option<String>,

        /// Suppress progress output
        #[arg(short, long)]
        quiet: bool,
    },

    /// Check that files decode cleanly (a file or a whole directory)
    Validate {
        /// File or directory
        path: PathBuf,

        /// Only print failures
        #[arg(short, long)]
        quiet: bool,
    },

    /// List the LODs of an MLOD P3D
    Lods {
        /// P3D file
        path: PathBuf,
    },

    /// Config lookups
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}
