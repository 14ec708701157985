//! CLI command describing a single file

use std::fs;
use std::path::Path;

use crate::formats::FileFormat;
use crate::formats::cfg::{CfgParseOptions, Config, parse_cfg};
use crate::formats::p3d::parse_p3d_bytes;
use crate::formats::rap::parse_rap_bytes;
use crate::formats::rtm::{AnimationFile, parse_rtm_bytes};

pub fn execute(path: &Path) -> anyhow::Result<()> {
    let data = fs::read(path)?;
    let Some(format) = FileFormat::detect(path, &data) else {
        anyhow::bail!("Unrecognised file format: {}", path.display());
    };

    println!("{}: {}", path.display(), format.as_str());
    match format {
        FileFormat::P3d => {
            let model = parse_p3d_bytes(&data)?;
            println!("Version: {}", model.version);
            println!("LODs: {}", model.lods.len());
            for lod in &model.lods {
                println!(
                    "  {} - {} vertices, {} faces",
                    lod.resolution,
                    lod.vertices.len(),
                    lod.faces.len()
                );
            }
        }
        FileFormat::Rtm => match parse_rtm_bytes(&data)? {
            AnimationFile::Rtm(rtm) => {
                println!("Layout: RTM_0101");
                println!("Bones: {}", rtm.anim.bones.len());
                println!("Frames: {}", rtm.anim.frames.len());
                println!(
                    "Motion: ({}, {}, {})",
                    rtm.anim.motion.x, rtm.anim.motion.y, rtm.anim.motion.z
                );
                if let Some(props) = &rtm.props {
                    println!("Events: {}", props.items.len());
                }
            }
            AnimationFile::Bmtr(bmtr) => {
                println!("Layout: BMTR (legacy, version {})", bmtr.version);
                println!("Bones: {}", bmtr.bones.len());
                println!("Frames: {}", bmtr.frames.len());
                println!("Events: {}", bmtr.props.len());
            }
        },
        FileFormat::RapifiedConfig => print_config(&parse_rap_bytes(&data)?),
        FileFormat::ConfigText => {
            let text = String::from_utf8_lossy(&data);
            print_config(&parse_cfg(&text, &CfgParseOptions::default())?);
        }
    }
    Ok(())
}

fn print_config(config: &Config) {
    let root = config.root();
    println!("Classes: {}", config.class_count());
    println!("Top-level properties: {}", root.properties().count());
    for class in root.classes() {
        let children = class.classes().count();
        match class.parent() {
            Some(parent) => println!("  class {}: {} ({children} classes)", class.name(), parent.name()),
            None => println!("  class {} ({children} classes)", class.name()),
        }
    }
}
