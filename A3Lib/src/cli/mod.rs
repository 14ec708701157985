//! `a3lib` command line
//!
//! Inspects, validates and converts Arma content: MLOD models, text and
//! rapified configs, and RTM/BMTR animations. Library logs go to stderr at
//! `warn` by default, raised with `-v` (info) or `-vv` (debug).

pub mod commands;
pub mod progress;

use clap::{ArgAction, Parser};
use commands::Commands;
use tracing::Level;

#[derive(Parser)]
#[command(name = "a3lib", version)]
#[command(about = "Inspect, validate and convert Arma models, configs and animations")]
#[command(
    long_about = "Inspect, validate and convert Arma content.\n\n\
    Formats: MLOD .p3d, config text (.cpp/.hpp/.cfg), rapified config (.bin),\n\
    RTM_0101/RTM_MDAT and legacy BMTR animations (.rtm)."
)]
struct Cli {
    /// Log more detail (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn log_level(&self) -> Level {
        match self.verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            _ => Level::DEBUG,
        }
    }
}

/// Parse arguments, set up logging and run the selected command.
///
/// # Errors
/// Returns the error of the failed command.
pub fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(cli.log_level())
        .with_writer(std::io::stderr)
        .init();

    cli.command.execute()
}
