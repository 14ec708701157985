//! CLI interface for format conversion

use std::fs;
use std::path::Path;
use std::time::Instant;

use crate::cli::progress::{print_convert_step, print_done};
use crate::converter::{
    ConvertProgress, convert_bmtr_to_rtm_with_progress, convert_cfg_to_json_with_progress,
    convert_json_to_cfg_with_progress, convert_rap_to_cfg_with_progress, load_skeleton,
};
use crate::formats::FileFormat;

pub fn execute(
    source: &Path,
    destination: &Path,
    skeleton_config: Option<&Path>,
    skeleton: Option<&str>,
    quiet: bool,
) -> anyhow::Result<()> {
    let start = Instant::now();
    let data = fs::read(source)?;
    let input = FileFormat::detect(source, &data);
    let output = destination
        .extension()
        .map(|s| s.to_string_lossy().to_lowercase())
        .ok_or_else(|| anyhow::anyhow!("Cannot detect output format from destination file extension"))?;
    let source_is_json = source
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let quiet_progress = |_: &ConvertProgress| {};
    let progress: &(dyn Fn(&ConvertProgress) + Sync + Send) = if quiet {
        &quiet_progress
    } else {
        &print_convert_step
    };

    match (input, output.as_str()) {
        (Some(FileFormat::RapifiedConfig), "cpp" | "hpp" | "cfg" | "h" | "ext") => {
            convert_rap_to_cfg_with_progress(source, destination, progress)?;
        }
        (Some(FileFormat::RapifiedConfig | FileFormat::ConfigText), "json") => {
            convert_cfg_to_json_with_progress(source, destination, progress)?;
        }
        (None, "cpp" | "hpp" | "cfg" | "h" | "ext") if source_is_json => {
            convert_json_to_cfg_with_progress(source, destination, progress)?;
        }
        (Some(FileFormat::Rtm), "rtm") => {
            let (Some(config), Some(name)) = (skeleton_config, skeleton) else {
                anyhow::bail!("Converting animations needs --skeleton-config and --skeleton");
            };
            let hierarchy = load_skeleton(config, name)?;
            convert_bmtr_to_rtm_with_progress(source, destination, &hierarchy, progress)?;
        }
        (input, output) => {
            let input = input.map_or("unknown", |f| f.as_str());
            anyhow::bail!("Unsupported conversion: {input} -> .{output}");
        }
    }

    if !quiet {
        print_done(start.elapsed());
    }
    Ok(())
}
