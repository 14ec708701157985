//! Rapified config to config text conversion
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`
//!
//! SPDX-License-Identifier: MIT

use crate::error::Result;
use crate::formats::cfg::write_cfg;
use crate::formats::rap::read_rap;
use std::path::Path;

/// Convert a rapified config file to config text
///
/// # Errors
/// Returns an error if the source is not a valid rapified config or the
/// output cannot be written.
pub fn convert_rap_to_cfg<P: AsRef<Path>>(source: P, dest: P) -> Result<()> {
    convert_rap_to_cfg_with_progress(source, dest, &|_| {})
}

/// Convert a rapified config file to config text with progress callback
///
/// # Errors
/// Returns an error if the source is not a valid rapified config or the
/// output cannot be written.
pub fn convert_rap_to_cfg_with_progress<P: AsRef<Path>>(
    source: P,
    dest: P,
    progress: crate::converter::ConvertProgressCallback,
) -> Result<()> {
    use crate::converter::{ConvertPhase, ConvertProgress};
    tracing::info!(
        "Converting RAP→CFG: {:?} → {:?}",
        source.as_ref(),
        dest.as_ref()
    );

    progress(&ConvertProgress::with_file(
        ConvertPhase::ReadingSource,
        1,
        2,
        "Reading rapified config...",
    ));
    let config = read_rap(&source)?;

    progress(&ConvertProgress::with_file(
        ConvertPhase::WritingOutput,
        2,
        2,
        format!("Writing {} classes as text...", config.class_count()),
    ));
    write_cfg(&config, dest)?;

    tracing::info!("Conversion complete");
    Ok(())
}
