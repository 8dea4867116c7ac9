use gltf_ior::gltf::extension::load_extension;
use gltf_ior::gltf::{
    ExtensionRegistry, GltfLoader, LoaderExtension, LoaderOptions, MaterialEntry,
};
use gltf_ior::{Error, Material, Result};
use serde::Deserialize;

const NAME: &str = "EXT_tint";

#[derive(Deserialize)]
struct Tint {
    color: [f32; 4],
}

/// Overrides the base color after the core properties are loaded.
struct ExtTint<'a> {
    loader: &'a GltfLoader,
}

fn create(loader: &GltfLoader) -> Box<dyn LoaderExtension + '_> {
    Box::new(ExtTint { loader })
}

impl LoaderExtension for ExtTint<'_> {
    fn name(&self) -> &'static str {
        NAME
    }
    fn enabled(&self) -> bool {
        self.loader.is_extension_used(NAME)
    }
    fn order(&self) -> i32 {
        100
    }
    fn load_material_properties(
        &self,
        context: &str,
        entry: &MaterialEntry,
        material: &mut dyn Material,
    ) -> Option<Result<()>> {
        load_extension(context, entry, NAME, |_, tint: Tint| {
            self.loader.load_material_properties(context, entry, material)?;
            material.surface_mut().base_color_factor = tint.color.map(|v| v as gltf_ior::F);
            Ok(())
        })
    }
}

const SRC: &str = r#"{
    "extensionsUsed": ["KHR_materials_ior", "EXT_tint"],
    "extensionsRequired": ["EXT_tint"],
    "materials": [
        { "extensions": { "EXT_tint": { "color": [0, 0, 1, 1] }, "KHR_materials_ior": { "ior": 2.0 } } },
        { "extensions": { "KHR_materials_ior": { "ior": 2.0 } } }
    ]
}"#;

#[test]
fn test_required_extension_missing() {
    let loader = GltfLoader::from_slice(SRC.as_bytes()).unwrap();
    let err = loader.load_materials().unwrap_err();
    assert_eq!(err.to_string(), "Required extension EXT_tint is not available");
    assert!(matches!(err, Error::MissingRequiredExtension(_)));
}

#[test]
fn test_lower_order_runs_first() {
    let mut registry = ExtensionRegistry::default();
    registry.register(NAME, create);
    let loader = GltfLoader::from_slice(SRC.as_bytes())
        .unwrap()
        .with_registry(registry);

    let session = loader.start_session();
    let order = session.extensions().map(|e| e.name()).collect::<Vec<_>>();
    assert_eq!(order, [NAME, "KHR_materials_ior"]);

    let mats = loader.load_materials().unwrap();
    // The first extension that applies handles the material.
    assert_eq!(mats[0].surface().base_color_factor, [0., 0., 1., 1.]);
    assert_eq!(mats[0].as_ior().unwrap().index_of_refraction(), 1.5);
    assert_eq!(mats[1].surface().base_color_factor, [1.; 4]);
    assert_eq!(mats[1].as_ior().unwrap().index_of_refraction(), 2.0);
}

#[test]
fn test_unregister_builtin() {
    let mut registry = ExtensionRegistry::default();
    assert!(registry.unregister("KHR_materials_ior"));
    let src = r#"{
        "extensionsUsed": ["KHR_materials_ior"],
        "materials": [{ "extensions": { "KHR_materials_ior": { "ior": 2.0 } } }]
    }"#;
    let mats = GltfLoader::from_slice(src.as_bytes())
        .unwrap()
        .with_registry(registry)
        .load_materials()
        .unwrap();
    assert_eq!(mats[0].as_ior().unwrap().index_of_refraction(), 1.5);
}

#[test]
fn test_required_extension_disabled() {
    let src = r#"{
        "extensionsUsed": ["KHR_materials_ior"],
        "extensionsRequired": ["KHR_materials_ior"],
        "materials": [{ "extensions": { "KHR_materials_ior": { "ior": 2.0 } } }]
    }"#;
    let loader = GltfLoader::from_slice(src.as_bytes()).unwrap();
    assert_eq!(loader.load_materials().unwrap().len(), 1);

    let loader = GltfLoader::from_slice(src.as_bytes())
        .unwrap()
        .with_options(LoaderOptions::default().disable_extension("KHR_materials_ior"));
    let err = loader.load_materials().unwrap_err();
    assert!(matches!(err, Error::MissingRequiredExtension(ref n) if n == "KHR_materials_ior"));
}
