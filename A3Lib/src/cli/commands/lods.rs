//! CLI command listing the LODs of a model

use std::path::Path;

use crate::formats::p3d::read_p3d;

pub fn execute(path: &Path) -> anyhow::Result<()> {
    let model = read_p3d(path)?;

    println!("{} ({} LODs)", path.display(), model.lods.len());
    println!();
    println!(
        "{:<28} {:>9} {:>9} {:>10} {:>8}",
        "LOD", "Vertices", "Faces", "Selections", "Proxies"
    );
    for lod in &model.lods {
        println!(
            "{:<28} {:>9} {:>9} {:>10} {:>8}",
            lod.resolution.to_string(),
            lod.vertices.len(),
            lod.faces.len(),
            lod.selections().count(),
            lod.proxies().len()
        );
    }
    Ok(())
}
