//! Config text and JSON conversions
//!
//! SPDX-FileCopyrightText: 2025 `CyberDeco`
//!
//! SPDX-License-Identifier: MIT
//!
//! JSON output is the nested dictionary form of [`Config::as_dict`].

use crate::error::Result;
use crate::formats::cfg::{CfgParseOptions, Config, parse_cfg, write_cfg};
use crate::formats::rap::{is_rapified, parse_rap_bytes};
use std::fs;
use std::path::Path;

/// Convert a config (text or rapified) to JSON
///
/// # Errors
/// Returns an error if the source cannot be parsed or the output cannot be
/// written.
pub fn convert_cfg_to_json<P: AsRef<Path>>(source: P, dest: P) -> Result<()> {
    convert_cfg_to_json_with_progress(source, dest, &|_| {})
}

/// Convert a config (text or rapified) to JSON with progress callback
///
/// # Errors
/// Returns an error if the source cannot be parsed or the output cannot be
/// written.
pub fn convert_cfg_to_json_with_progress<P: AsRef<Path>>(
    source: P,
    dest: P,
    progress: crate::converter::ConvertProgressCallback,
) -> Result<()> {
    use crate::converter::{ConvertPhase, ConvertProgress};
    tracing::info!(
        "Converting CFG→JSON: {:?} → {:?}",
        source.as_ref(),
        dest.as_ref()
    );

    progress(&ConvertProgress::with_file(
        ConvertPhase::ReadingSource,
        1,
        3,
        "Reading config...",
    ));
    let config = read_any_config(&source)?;

    progress(&ConvertProgress::with_file(
        ConvertPhase::Converting,
        2,
        3,
        format!("Converting {} classes to JSON...", config.class_count()),
    ));
    let json = config.to_json()?;

    progress(&ConvertProgress::with_file(
        ConvertPhase::WritingOutput,
        3,
        3,
        "Writing JSON file...",
    ));
    fs::write(dest, json)?;

    tracing::info!("Conversion complete");
    Ok(())
}

/// Convert JSON produced by [`convert_cfg_to_json`] back to config text
///
/// # Errors
/// Returns an error if the JSON does not describe a valid config or the
/// output cannot be written.
pub fn convert_json_to_cfg<P: AsRef<Path>>(source: P, dest: P) -> Result<()> {
    convert_json_to_cfg_with_progress(source, dest, &|_| {})
}

/// Convert JSON back to config text with progress callback
///
/// # Errors
/// Returns an error if the JSON does not describe a valid config or the
/// output cannot be written.
pub fn convert_json_to_cfg_with_progress<P: AsRef<Path>>(
    source: P,
    dest: P,
    progress: crate::converter::ConvertProgressCallback,
) -> Result<()> {
    use crate::converter::{ConvertPhase, ConvertProgress};
    tracing::info!(
        "Converting JSON→CFG: {:?} → {:?}",
        source.as_ref(),
        dest.as_ref()
    );

    progress(&ConvertProgress::with_file(
        ConvertPhase::ReadingSource,
        1,
        3,
        "Reading JSON file...",
    ));
    let json = fs::read_to_string(&source)?;

    progress(&ConvertProgress::with_file(
        ConvertPhase::Converting,
        2,
        3,
        "Rebuilding class tree...",
    ));
    let config = Config::from_json(&json)?;

    progress(&ConvertProgress::with_file(
        ConvertPhase::WritingOutput,
        3,
        3,
        "Writing config file...",
    ));
    write_cfg(&config, dest)?;

    tracing::info!("Conversion complete");
    Ok(())
}

/// Read a config file, rapified or text, detected by content.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
pub fn read_any_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let data = fs::read(&path)?;
    if is_rapified(&data) {
        tracing::debug!("Detected rapified config");
        return parse_rap_bytes(&data);
    }
    parse_cfg(&String::from_utf8_lossy(&data), &CfgParseOptions::default())
}
