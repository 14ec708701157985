use a3lib::formats::cfg::{ConfigValue, format_cfg};
use a3lib::formats::p3d::{
    Face, FaceSide, TaggData, Tagg, Vertex, decode_weight, parse_p3d_bytes, serialize_p3d,
};
use a3lib::formats::rtm::{BmtrBone, LocalTransform, RtmProp};
use a3lib::prelude::*;
use glam::{Quat, Vec3};
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::tempdir;

fn side(vertex: u32) -> FaceSide {
    FaceSide {
        vertex,
        normal: 0,
        uv: [vertex as f32 * 0.25, 0.5],
    }
}

fn crate_model() -> MloDFile {
    let mut visual = Lod::new(LodResolution::new(LodKind::Visual, 0));
    visual.vertices = [
        Vec3::ZERO,
        Vec3::X,
        Vec3::new(1.0, 1.0, 0.0),
        Vec3::Y,
    ]
    .into_iter()
    .map(|position| Vertex { position, flags: 0 })
    .collect();
    visual.normals = vec![Vec3::new(0.0, 0.0, 2.0)];
    visual.faces = vec![Face {
        sides: (0..4).map(side).collect(),
        flags: 0,
        texture: "a3\\data_f\\crate_co.paa".into(),
        material: "a3\\data_f\\crate.rvmat".into(),
    }];
    visual.taggs = vec![
        Tagg::new(
            "lid",
            TaggData::Selection {
                vertices: vec![0.0, 0.0, 1.0, 1.0],
                faces: vec![1.0],
            },
        ),
        Tagg::new(
            "proxy:\\a3\\data_f\\handle.01",
            TaggData::Selection {
                vertices: vec![1.0, 0.0, 0.0, 0.0],
                faces: vec![0.0],
            },
        ),
    ];

    let mut geometry = Lod::new(LodResolution::new(LodKind::Geometry, 0));
    geometry.vertices = visual.vertices.clone();
    geometry.taggs = vec![
        Tagg::new("#Mass#", TaggData::Mass(vec![5.0; 4])),
        Tagg::new(
            "#Property#",
            TaggData::Property {
                key: "autocenter".into(),
                value: "0".into(),
            },
        ),
    ];

    MloDFile {
        lods: vec![visual, geometry],
        ..MloDFile::default()
    }
}

#[test]
fn test_p3d_file_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("crate.p3d");
    let model = crate_model();
    write_p3d(&model, &path).unwrap();

    let mut back = read_p3d(&path).unwrap();
    assert_eq!(back, model);

    let geometry = back.find_lod(LodKind::Geometry).unwrap();
    assert_eq!(geometry.resolution.to_string(), "Geometry");
    assert_eq!(geometry.total_mass(), 20.0);
    assert_eq!(geometry.property("autocenter"), Some("0"));

    let visual = back.find_lod_mut(LodKind::Visual).unwrap();
    assert_eq!(visual.selected_vertices("LID"), vec![2, 3]);
    let proxies = visual.proxies();
    assert_eq!(proxies.len(), 1);
    assert_eq!(proxies[0].path, "\\a3\\data_f\\handle");
    assert_eq!(proxies[0].index, 1);

    visual.renormalize_normals();
    assert_eq!(visual.normals[0], Vec3::Z);
}

#[test]
fn test_p3d_eof_discipline() {
    let bytes = serialize_p3d(&crate_model()).unwrap();

    let first = bytes
        .windows(12)
        .position(|w| w == b"#EndOfFile#\0")
        .unwrap();
    // The last LOD's EOF record, followed only by its resolution.
    let at = bytes
        .windows(12)
        .rposition(|w| w == b"#EndOfFile#\0")
        .unwrap();
    assert!(first < at);

    for marker in [first, at] {
        let mut renamed = bytes.clone();
        renamed[marker + 1] = b'X';
        assert_eq!(
            parse_p3d_bytes(&renamed).unwrap_err().category(),
            ErrorCategory::InvalidTerminator
        );
    }

    let mut with_length = bytes;
    with_length[at + 12] = 4;
    assert_eq!(
        parse_p3d_bytes(&with_length).unwrap_err().category(),
        ErrorCategory::InvalidTerminator
    );
}

#[test]
fn test_selection_weight_scenario() {
    assert_eq!(decode_weight(0), 0.0);
    assert_eq!(decode_weight(1), 1.0);
    assert!(decode_weight(255) > 1.0);
}

#[test]
fn test_text_config_scenario() {
    let config = parse_cfg(
        r#"class Item { value = 5; tags[] = {"a","b"}; };"#,
        &CfgParseOptions::default(),
    )
    .unwrap();
    let item = config.root().get_class("Item").unwrap();
    assert_eq!(item.name(), "Item");
    assert_eq!(item.get_prop("value"), Some(&ConfigValue::Long(5)));
    assert_eq!(
        item.get_prop("tags"),
        Some(&ConfigValue::from(vec![
            ConfigValue::from("a"),
            ConfigValue::from("b"),
        ]))
    );

    let formatted = format_cfg(&config);
    let reparsed = parse_cfg(&formatted, &CfgParseOptions::default()).unwrap();
    assert_eq!(format_cfg(&reparsed), formatted);
    assert_eq!(reparsed.as_dict(), config.as_dict());
}

#[test]
fn test_inheritance_lookup() {
    let config = parse_cfg(
        "class A { x = 1; }; class B: A {}; class C: A { x = 2; };",
        &CfgParseOptions::default(),
    )
    .unwrap();
    let root = config.root();
    assert_eq!(root.get_prop("B/x"), Some(&ConfigValue::Long(1)));
    assert_eq!(root.get_prop("C/x"), Some(&ConfigValue::Long(2)));
    assert_eq!(root.get_prop("A/x"), Some(&ConfigValue::Long(1)));
    assert!(root.get_class("c").unwrap().inherits_from("A"));
}

#[test]
fn test_config_file_conversions() {
    let dir = tempdir().unwrap();
    let bin = dir.path().join("config.bin");
    let cpp = dir.path().join("config.cpp");
    let json = dir.path().join("config.json");
    let back = dir.path().join("back.hpp");

    // version = 12; class CfgPatches { name = "test"; };
    let mut data = b"\0raP".to_vec();
    data.extend_from_slice(&0u32.to_le_bytes());
    data.extend_from_slice(&8u32.to_le_bytes());
    data.extend_from_slice(&0u32.to_le_bytes());
    data.extend_from_slice(&[0, 2]);
    data.extend_from_slice(&[1, 2]);
    data.extend_from_slice(b"version\0");
    data.extend_from_slice(&12i32.to_le_bytes());
    data.push(0);
    data.extend_from_slice(b"CfgPatches\0");
    let body = data.len() as u32 + 4;
    data.extend_from_slice(&body.to_le_bytes());
    data.extend_from_slice(&[0, 1]);
    data.extend_from_slice(&[1, 0]);
    data.extend_from_slice(b"name\0test\0");
    fs::write(&bin, &data).unwrap();

    a3lib::converter::rap_to_cfg(&bin, &cpp).unwrap();
    let text = read_cfg(&cpp).unwrap();
    assert_eq!(text.root().get_prop("version"), Some(&ConfigValue::Long(12)));
    assert_eq!(
        text.root().get_prop("CfgPatches/name"),
        Some(&ConfigValue::from("test"))
    );

    a3lib::converter::cfg_to_json(&bin, &json).unwrap();
    a3lib::converter::json_to_cfg(&json, &back).unwrap();
    assert_eq!(format_cfg(&read_cfg(&back).unwrap()), format_cfg(&text));
}

fn legacy_walk() -> BmtrFile {
    let local = |y: f32| LocalTransform {
        rotation: Quat::IDENTITY,
        translation: Vec3::new(0.0, y, 0.0),
    };
    BmtrFile {
        version: 4,
        motion: Vec3::new(0.0, 0.0, 1.0),
        bones: vec![
            BmtrBone {
                name: "pelvis".into(),
                parent: String::new(),
            },
            BmtrBone {
                name: "spine".into(),
                parent: "pelvis".into(),
            },
        ],
        props: vec![RtmProp {
            phase: 0.5,
            name: "step".into(),
            value: "left".into(),
        }],
        phases: vec![0.0, 1.0],
        frames: vec![vec![local(1.0), local(0.5)], vec![local(1.0), local(0.25)]],
    }
}

#[test]
fn test_legacy_rtm_scenario() {
    let bmtr = legacy_walk();
    let hierarchy = BoneHierarchy::from_pairs([("pelvis", ""), ("spine", "pelvis")]);
    let rtm = bmtr.to_rtm(&hierarchy).unwrap();

    assert_eq!(rtm.anim.bones, vec!["pelvis", "spine"]);
    for frame in &rtm.anim.frames {
        let keys: Vec<&str> = frame.transforms.iter().map(|t| t.bone.as_str()).collect();
        assert_eq!(keys, vec!["pelvis", "spine"]);
    }
    let spine = rtm.anim.frames[1].transform("spine").unwrap();
    assert_eq!(spine.w_axis.truncate(), Vec3::new(0.0, 1.25, 0.0));
    assert_eq!(rtm.props.as_ref().unwrap().items.len(), 1);

    let partial = BoneHierarchy::from_pairs([("pelvis", "")]);
    let err = bmtr.to_rtm(&partial).unwrap_err();
    assert!(matches!(err, Error::UnresolvableBoneHierarchy { ref bone } if bone == "spine"));
    assert_eq!(err.category(), ErrorCategory::UnresolvedReference);
}

#[test]
fn test_rtm_files_through_disk() {
    let dir = tempdir().unwrap();
    let legacy = dir.path().join("walk_old.rtm");
    let modern = dir.path().join("walk.rtm");
    a3lib::formats::rtm::write_bmtr(&legacy_walk(), &legacy).unwrap();

    let AnimationFile::Bmtr(read_back) = read_rtm(&legacy).unwrap() else {
        panic!("expected legacy animation");
    };
    assert_eq!(read_back.bones, legacy_walk().bones);

    let hierarchy = BoneHierarchy::from_pairs([("Pelvis", ""), ("Spine", "Pelvis")]);
    a3lib::converter::bmtr_to_rtm(&legacy, &modern, &hierarchy).unwrap();
    let AnimationFile::Rtm(rtm) = read_rtm(&modern).unwrap() else {
        panic!("expected modern animation");
    };
    assert_eq!(rtm.anim.frames.len(), 2);
    assert_eq!(rtm.anim.scale_motion(0.5), Vec3::new(0.0, 0.0, 0.5));
}

#[test]
fn test_validate_directory() {
    let dir = tempdir().unwrap();
    write_p3d(&crate_model(), dir.path().join("crate.p3d")).unwrap();
    fs::write(dir.path().join("config.cpp"), "class A { delete B; };").unwrap();

    let result = validate_directory(dir.path(), &BatchOptions::default()).unwrap();
    assert_eq!(result.success_count, 1);
    assert_eq!(result.fail_count, 1);
    let failure = result.failures().next().unwrap();
    assert!(failure.path.ends_with("config.cpp"));
    assert_eq!(failure.failure, Some(ErrorCategory::UnsupportedConstruct));
}

#[test]
fn test_project_root_paths() {
    let dir = tempdir().unwrap();
    let root = ProjectRoot::new(dir.path());
    let host = root.to_host("\\A3\\Data_F\\crate.p3d").unwrap();
    assert_eq!(root.to_internal(&host).as_deref(), Some("a3\\data_f\\crate.p3d"));
    assert_eq!(normalize_path("a3\\data_f"), "a3/data_f");
}
