//! Command execution implementations

use super::Commands;
use super::definitions::ConfigCommands;
use super::{config, convert, info, lods, validate};

impl Commands {
    /// Execute the selected command.
    ///
    /// # Errors
    /// Returns an error if the underlying command fails.
    pub fn execute(&self) -> anyhow::Result<()> {
        match self {
            Commands::Info { path } => info::execute(path),
            Commands::Convert {
                source,
                destination,
                skeleton_config,
                skeleton,
                quiet,
            } => convert::execute(
                source,
                destination,
                skeleton_config.as_deref(),
                skeleton.as_deref(),
                *quiet,
            ),
            Commands::Validate { path, quiet } => validate::execute(path, *quiet),
            Commands::Lods { path } => lods::execute(path),
            Commands::Config { command } => command.execute(),
        }
    }
}

impl ConfigCommands {
    /// Execute the selected config command.
    ///
    /// # Errors
    /// Returns an error if the config cannot be read or the path is missing.
    pub fn execute(&self) -> anyhow::Result<()> {
        match self {
            ConfigCommands::Get { file, path } => config::get(file, path),
        }
    }
}
