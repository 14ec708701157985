//! CLI commands for config lookups

use std::path::Path;

use crate::converter::read_any_config;

/// Print the value or class at `path`
pub fn get(file: &Path, path: &str) -> anyhow::Result<()> {
    let config = read_any_config(file)?;
    let root = config.root();

    if let Some(value) = root.get_prop(path) {
        println!("{}", value.format());
    } else if let Some(class) = root.get_class(path) {
        print!("{}", class.format(0));
    } else {
        anyhow::bail!("'{path}' not found in {}", file.display());
    }
    Ok(())
}
