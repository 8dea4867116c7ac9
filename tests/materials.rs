use gltf_ior::gltf::{GltfLoader, LoaderOptions};
use gltf_ior::{Error, load};
use std::borrow::Cow;
use tempfile::tempdir;

const SCENE: &str = r#"{
    "asset": { "version": "2.0" },
    "extensionsUsed": ["KHR_materials_ior", "KHR_materials_unlit"],
    "materials": [
        { "name": "diamond", "extensions": { "KHR_materials_ior": { "ior": 2.0 } } },
        { "name": "glass", "extensions": { "KHR_materials_ior": {} } },
        { "name": "plastic", "pbrMetallicRoughness": { "metallicFactor": 0.0 } },
        { "name": "flat", "extensions": { "KHR_materials_unlit": {} } }
    ]
}"#;

fn ior_of(m: &dyn gltf_ior::Material) -> Option<f32> {
    m.as_ior().map(|i| i.index_of_refraction() as f32)
}

#[test]
fn test_load_gltf_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("scene.gltf");
    std::fs::write(&path, SCENE).unwrap();

    let mats = load(&path).unwrap();
    assert_eq!(mats.len(), 4);
    let names = mats.iter().map(|m| m.surface().name.as_str()).collect::<Vec<_>>();
    assert_eq!(names, ["diamond", "glass", "plastic", "flat"]);
    assert_eq!(ior_of(mats[0].as_ref()), Some(2.0));
    assert_eq!(ior_of(mats[1].as_ref()), Some(1.5));
    assert_eq!(ior_of(mats[2].as_ref()), Some(1.5));
    assert_eq!(ior_of(mats[3].as_ref()), None);
}

#[test]
fn test_load_glb_file() {
    let mut json = SCENE.as_bytes().to_vec();
    while json.len() % 4 != 0 {
        json.push(b' ');
    }
    let glb = gltf::binary::Glb {
        header: gltf::binary::Header {
            magic: *b"glTF",
            version: 2,
            length: (12 + 8 + json.len()) as u32,
        },
        json: Cow::Owned(json),
        bin: None,
    };
    let dir = tempdir().unwrap();
    let path = dir.path().join("scene.glb");
    let f = std::fs::File::create(&path).unwrap();
    glb.to_writer(std::io::BufWriter::new(f)).unwrap();

    let mats = load(&path).unwrap();
    assert_eq!(mats.len(), 4);
    assert_eq!(ior_of(mats[0].as_ref()), Some(2.0));
}

#[test]
fn test_unknown_format() {
    let err = GltfLoader::open("scene.obj").err().unwrap();
    assert!(matches!(err, Error::UnknownFormat(_)));
}

#[test]
fn test_missing_file() {
    let dir = tempdir().unwrap();
    let err = GltfLoader::open(dir.path().join("missing.gltf")).err().unwrap();
    assert!(matches!(err, Error::Io(_)));
}

#[test]
fn test_unlit_with_ior_fails() {
    let src = r#"{
        "extensionsUsed": ["KHR_materials_ior", "KHR_materials_unlit"],
        "materials": [
            { "name": "ok" },
            { "name": "bad", "extensions": { "KHR_materials_unlit": {}, "KHR_materials_ior": { "ior": 1.2 } } }
        ]
    }"#;
    let loader = GltfLoader::from_slice(src.as_bytes()).unwrap();
    let err = loader.load_materials().unwrap_err();
    assert!(matches!(err, Error::UnsupportedMaterial { .. }));
    let msg = err.to_string();
    assert!(msg.contains("/materials/1/extensions/KHR_materials_ior"), "{msg}");
    assert!(msg.contains("not supported"), "{msg}");
}

#[test]
fn test_extension_not_declared() {
    // Payload present but the extension is missing from extensionsUsed, so it is ignored.
    let src = r#"{ "materials": [{ "extensions": { "KHR_materials_ior": { "ior": 3.0 } } }] }"#;
    let mats = GltfLoader::from_slice(src.as_bytes())
        .unwrap()
        .load_materials()
        .unwrap();
    assert_eq!(ior_of(mats[0].as_ref()), Some(1.5));
}

#[test]
fn test_disabled_by_options() {
    let dir = tempdir().unwrap();
    let opts_path = dir.path().join("options.json");
    std::fs::write(
        &opts_path,
        r#"{ "extensions": { "KHR_materials_ior": { "enabled": false } } }"#,
    )
    .unwrap();
    let opts = LoaderOptions::load_from_file(&opts_path).unwrap();

    let mats = GltfLoader::from_slice(SCENE.as_bytes())
        .unwrap()
        .with_options(opts)
        .load_materials()
        .unwrap();
    assert_eq!(ior_of(mats[0].as_ref()), Some(1.5));
    assert_eq!(mats[0].surface().name, "diamond");
}
