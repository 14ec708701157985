//! Subcommand enum definitions for CLI

use clap::Subcommand;
use std::path::PathBuf;

/// Config file commands
#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print a property or class by path, following inheritance
    Get {
        /// Config file (text or rapified)
        file: PathBuf,

        /// Slash-separated path, e.g. `CfgVehicles/Car/maxSpeed`
        path: String,
    },
}
