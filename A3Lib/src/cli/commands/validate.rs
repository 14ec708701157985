//! CLI command validating files

use std::path::Path;
use std::time::Instant;

use console::style;

use crate::batch::{BatchOptions, validate_directory_with_progress, validate_file};
use crate::cli::progress::{CROSS, print_done, simple_bar};

pub fn execute(path: &Path, quiet: bool) -> anyhow::Result<()> {
    if path.is_file() {
        return match validate_file(path) {
            Ok((format, summary)) => {
                if !quiet {
                    println!("{}: {} ({summary})", path.display(), format.as_str());
                }
                Ok(())
            }
            Err(e) => {
                println!("{CROSS}{}: {e}", path.display());
                Err(e.into())
            }
        };
    }

    let start = Instant::now();
    let options = BatchOptions::default();
    let pb = (!quiet).then(|| simple_bar(0, "Validating"));
    let result = validate_directory_with_progress(path, &options, |current, total, _| {
        if let Some(pb) = &pb {
            pb.set_length(total as u64);
            pb.set_position(current as u64);
        }
    })?;
    if let Some(pb) = &pb {
        pb.finish_and_clear();
    }

    for file in &result.files {
        if file.is_ok() {
            if !quiet {
                println!("  {}: {}", file.path.display(), file.message);
            }
        } else {
            println!("{CROSS}{}: {}", file.path.display(), file.message);
        }
    }

    if !quiet {
        println!(
            "{} valid, {} failed",
            style(result.success_count).green(),
            style(result.fail_count).red()
        );
        print_done(start.elapsed());
    }

    if !result.is_clean() {
        anyhow::bail!("{} file(s) failed validation", result.fail_count);
    }
    Ok(())
}
