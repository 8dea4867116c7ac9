use crate::F;
use crate::error::{Error, Result};
use crate::gltf::document::MaterialEntry;
use crate::gltf::extension::{LoaderExtension, load_extension, try_join};
use crate::gltf::loader::GltfLoader;
use crate::material::{DEFAULT_IOR, Material};
use serde::Deserialize;
use tracing::debug;

pub const NAME: &str = "KHR_materials_ior";

/// Registry factory for [`KhrMaterialsIor`].
pub fn create(loader: &GltfLoader) -> Box<dyn LoaderExtension + '_> {
    Box::new(KhrMaterialsIor::new(loader))
}

/// Payload of the extension on a material.
#[derive(Debug, Default, Clone, Copy, PartialEq, Deserialize)]
pub struct KhrMaterialsIorPayload {
    pub ior: Option<F>,
}

/// [Specification](https://github.com/KhronosGroup/glTF/tree/main/extensions/2.0/Khronos/KHR_materials_ior)
///
/// Applies the index of refraction of a material on top of its core properties.
pub struct KhrMaterialsIor<'a> {
    loader: &'a GltfLoader,
    enabled: bool,
}

impl<'a> KhrMaterialsIor<'a> {
    pub const ORDER: i32 = 180;

    pub fn new(loader: &'a GltfLoader) -> Self {
        let enabled = loader.is_extension_used(NAME) && loader.options().extension_enabled(NAME);
        Self { loader, enabled }
    }

    /// Write the payload's IOR, or the default, into `material`.
    pub fn load_ior_properties(
        context: &str,
        payload: &KhrMaterialsIorPayload,
        material: &mut dyn Material,
    ) -> Result<()> {
        let Some(target) = material.as_ior_mut() else {
            return Err(Error::UnsupportedMaterial {
                context: context.to_string(),
            });
        };
        let ior = payload.ior.unwrap_or(DEFAULT_IOR);
        target.set_index_of_refraction(ior);
        debug!("{context}: ior = {ior}");
        Ok(())
    }
}

impl LoaderExtension for KhrMaterialsIor<'_> {
    fn name(&self) -> &'static str {
        NAME
    }
    fn enabled(&self) -> bool {
        self.enabled
    }
    fn order(&self) -> i32 {
        Self::ORDER
    }

    fn load_material_properties(
        &self,
        context: &str,
        entry: &MaterialEntry,
        material: &mut dyn Material,
    ) -> Option<Result<()>> {
        load_extension(context, entry, NAME, |ext_context, payload: KhrMaterialsIorPayload| {
            try_join(
                material,
                |m| Self::load_ior_properties(ext_context, &payload, m),
                |m| self.loader.load_material_properties(context, entry, m),
            )
        })
    }
}

#[cfg(test)]
use crate::material::{PbrMaterial, UnlitMaterial};

#[cfg(test)]
fn loader(src: &str) -> GltfLoader {
    GltfLoader::from_slice(src.as_bytes()).unwrap()
}

#[test]
fn test_enabled_follows_extensions_used() {
    let used = loader(r#"{ "extensionsUsed": ["KHR_materials_ior"] }"#);
    assert!(KhrMaterialsIor::new(&used).enabled());

    let unused = loader(r#"{ "extensionsUsed": ["KHR_materials_unlit"] }"#);
    assert!(!KhrMaterialsIor::new(&unused).enabled());

    let disabled = loader(r#"{ "extensionsUsed": ["KHR_materials_ior"] }"#)
        .with_options(crate::gltf::LoaderOptions::default().disable_extension(NAME));
    assert!(!KhrMaterialsIor::new(&disabled).enabled());
}

#[test]
fn test_fixed_order_and_name() {
    let l = loader("{}");
    let ext = KhrMaterialsIor::new(&l);
    assert_eq!(ext.order(), 180);
    assert_eq!(ext.name(), "KHR_materials_ior");
}

#[test]
fn test_assigns_value_verbatim() {
    let mut mat = PbrMaterial::default();
    for ior in [2.0, 1.0, 0.0, -3.5] {
        let payload = KhrMaterialsIorPayload { ior: Some(ior) };
        KhrMaterialsIor::load_ior_properties("ctx", &payload, &mut mat).unwrap();
        assert_eq!(mat.index_of_refraction, ior);
    }
}

#[test]
fn test_assigns_default_when_absent() {
    let mut mat = PbrMaterial {
        index_of_refraction: 3.,
        ..Default::default()
    };
    KhrMaterialsIor::load_ior_properties("ctx", &KhrMaterialsIorPayload::default(), &mut mat)
        .unwrap();
    assert_eq!(mat.index_of_refraction, 1.5);
}

#[test]
fn test_rejects_material_without_ior() {
    let mut mat = UnlitMaterial::default();
    let payload = KhrMaterialsIorPayload { ior: Some(2.) };
    let ctx = "/materials/4/extensions/KHR_materials_ior";
    let err = KhrMaterialsIor::load_ior_properties(ctx, &payload, &mut mat).unwrap_err();
    assert!(matches!(err, Error::UnsupportedMaterial { .. }));
    assert_eq!(
        err.to_string(),
        "/materials/4/extensions/KHR_materials_ior: Material type not supported"
    );
    assert_eq!(mat, UnlitMaterial::default());
}

#[test]
fn test_not_applicable_without_payload() {
    let l = loader(
        r#"{ "extensionsUsed": ["KHR_materials_ior"], "materials": [{ "name": "plain" }] }"#,
    );
    let ext = KhrMaterialsIor::new(&l);
    let mut mat = PbrMaterial {
        index_of_refraction: 1.2,
        ..Default::default()
    };
    let out = ext.load_material_properties("/materials/0", &l.document().materials[0], &mut mat);
    assert!(out.is_none());
    assert_eq!(mat.index_of_refraction, 1.2);
    assert_eq!(mat.surface.name, "");
}

#[test]
fn test_applies_ior_and_core_properties() {
    let l = loader(
        r#"{
            "extensionsUsed": ["KHR_materials_ior"],
            "materials": [
                { "name": "sapphire", "doubleSided": true, "extensions": { "KHR_materials_ior": { "ior": 1.75 } } },
                { "name": "glass", "extensions": { "KHR_materials_ior": {} } }
            ]
        }"#,
    );
    let ext = KhrMaterialsIor::new(&l);
    let doc = l.document();

    let mut sapphire = PbrMaterial::default();
    ext.load_material_properties("/materials/0", &doc.materials[0], &mut sapphire)
        .unwrap()
        .unwrap();
    assert_eq!(sapphire.index_of_refraction, 1.75);
    assert_eq!(sapphire.surface.name, "sapphire");
    assert!(sapphire.surface.double_sided);

    let mut glass = PbrMaterial {
        index_of_refraction: 9.,
        ..Default::default()
    };
    ext.load_material_properties("/materials/1", &doc.materials[1], &mut glass)
        .unwrap()
        .unwrap();
    assert_eq!(glass.index_of_refraction, 1.5);
    assert_eq!(glass.surface.name, "glass");
}

#[test]
fn test_core_failure_keeps_ior() {
    let l = loader(
        r#"{ "materials": [{ "name": "bad", "alphaMode": "NOPE", "extensions": { "KHR_materials_ior": { "ior": 2.0 } } }] }"#,
    );
    let ext = KhrMaterialsIor::new(&l);
    let mut mat = PbrMaterial::default();
    let err = ext
        .load_material_properties("/materials/0", &l.document().materials[0], &mut mat)
        .unwrap()
        .unwrap_err();
    assert!(matches!(err, Error::InvalidValue { .. }));
    assert_eq!(mat.index_of_refraction, 2.0);
    assert_eq!(mat.surface.name, "");
}

#[test]
fn test_invalid_payload() {
    let l = loader(r#"{ "materials": [{ "extensions": { "KHR_materials_ior": { "ior": "high" } } }] }"#);
    let ext = KhrMaterialsIor::new(&l);
    let mut mat = PbrMaterial::default();
    let err = ext
        .load_material_properties("/materials/0", &l.document().materials[0], &mut mat)
        .unwrap()
        .unwrap_err();
    assert!(matches!(err, Error::InvalidExtension { .. }));
    assert_eq!(mat, PbrMaterial::default());
}

#[test]
fn test_unlit_left_unmodified() {
    let l = loader(
        r#"{
            "extensionsUsed": ["KHR_materials_ior", "KHR_materials_unlit"],
            "materials": [{
                "name": "flat",
                "doubleSided": true,
                "extensions": { "KHR_materials_unlit": {}, "KHR_materials_ior": { "ior": 2.0 } }
            }]
        }"#,
    );
    let ext = KhrMaterialsIor::new(&l);
    let mut mat = UnlitMaterial::default();
    let err = ext
        .load_material_properties("/materials/0", &l.document().materials[0], &mut mat)
        .unwrap()
        .unwrap_err();
    assert!(err.to_string().contains("/materials/0/extensions/KHR_materials_ior"));
    assert!(matches!(err, Error::UnsupportedMaterial { .. }));
    // core properties are not loaded either
    assert_eq!(mat, UnlitMaterial::default());
}

#[test]
fn test_null_payload_not_applicable() {
    let l = loader(
        r#"{ "extensionsUsed": ["KHR_materials_ior"], "materials": [{ "extensions": { "KHR_materials_ior": null } }] }"#,
    );
    let ext = KhrMaterialsIor::new(&l);
    let mut mat = PbrMaterial {
        index_of_refraction: 1.2,
        ..Default::default()
    };
    let out = ext.load_material_properties("/materials/0", &l.document().materials[0], &mut mat);
    assert!(out.is_none());
    assert_eq!(mat.index_of_refraction, 1.2);
}
