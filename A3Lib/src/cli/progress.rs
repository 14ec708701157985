//! CLI progress display utilities
//!
//! Step indicators with emojis for single-file operations and a progress
//! bar for batch validation.

use std::time::Duration;

use console::{Emoji, style};
use indicatif::{HumanDuration, ProgressBar, ProgressStyle};

use crate::converter::{ConvertPhase, ConvertProgress};

// =============================================================================
// Emoji Constants (with ASCII fallbacks for terminals without emoji support)
// =============================================================================

/// Magnifying glass - for reading/scanning operations
pub static LOOKING_GLASS: Emoji<'_, '_> = Emoji("🔍 ", "");
/// Floppy disk - for writing/saving operations
pub static DISK: Emoji<'_, '_> = Emoji("💾 ", "");
/// Gear - for processing/conversion operations
pub static GEAR: Emoji<'_, '_> = Emoji("⚙️  ", "");
/// Sparkles - for completion
pub static SPARKLE: Emoji<'_, '_> = Emoji("✨ ", "");
/// Cross - for failures
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "x ");

/// Print a step indicator: `[1/3] 🔍 Message...`
pub fn print_step(current: usize, total: usize, emoji: &Emoji, msg: &str) {
    println!(
        "{} {}{}",
        style(format!("[{current}/{total}]")).bold().dim(),
        emoji,
        msg
    );
}

/// Print a conversion progress update as a step.
pub fn print_convert_step(progress: &ConvertProgress) {
    let emoji = match progress.phase {
        ConvertPhase::ReadingSource => &LOOKING_GLASS,
        ConvertPhase::Converting => &GEAR,
        ConvertPhase::WritingOutput => &DISK,
    };
    let msg = progress
        .current_file
        .as_deref()
        .unwrap_or_else(|| progress.phase.as_str());
    print_step(progress.current, progress.total, emoji, msg);
}

/// Print completion message: `✨ Done in 2s`
pub fn print_done(elapsed: Duration) {
    println!("{} Done in {}", SPARKLE, HumanDuration(elapsed));
}

/// Progress bar style with percentage
///
/// Format: `Validating [████████░░░░░░░░] 50% (50/100)`
#[must_use]
pub fn bar_style_with_percent() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template("{msg} [{bar:40.cyan/blue}] {percent}% ({pos}/{len})")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
}

/// Create a simple progress bar
#[must_use]
pub fn simple_bar(total: u64, msg: &str) -> ProgressBar {
    let pb = ProgressBar::new(total);
    pb.set_style(bar_style_with_percent());
    pb.set_message(msg.to_string());
    pb
}
