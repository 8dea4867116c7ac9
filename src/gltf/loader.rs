use super::document::{Document, MaterialEntry};
use super::extension::{ExtensionRegistry, LoaderExtension};
use super::extensions::KHR_MATERIALS_UNLIT;
use super::options::LoaderOptions;
use crate::F;
use crate::error::{Error, Result};
use crate::material::{AlphaMode, Material, PbrMaterial, UnlitMaterial};
use crate::util::{FileFormat, extension_to_format};
use std::path::Path;
use tracing::{debug, info, warn};

/// Default cutoff for `MASK` materials without an explicit `alphaCutoff`.
const DEFAULT_ALPHA_CUTOFF: F = 0.5;

/// Loads the materials of one GLTF document.
pub struct GltfLoader {
    document: Document,
    options: LoaderOptions,
    registry: ExtensionRegistry,
}

impl GltfLoader {
    pub fn new(document: Document) -> Self {
        Self {
            document,
            options: LoaderOptions::default(),
            registry: ExtensionRegistry::default(),
        }
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        Ok(Self::new(Document::from_slice(bytes)?))
    }

    /// Open a `.gltf` or `.glb` file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        match extension_to_format(path) {
            FileFormat::GLTF | FileFormat::GLB => Self::from_slice(&std::fs::read(path)?),
            FileFormat::Unknown => Err(Error::UnknownFormat(path.display().to_string())),
        }
    }

    pub fn with_options(mut self, options: LoaderOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_registry(mut self, registry: ExtensionRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn options(&self) -> &LoaderOptions {
        &self.options
    }

    /// Whether the document lists `name` in `extensionsUsed`.
    pub fn is_extension_used(&self, name: &str) -> bool {
        self.document.extensions_used.iter().any(|e| e == name)
    }

    /// Every extension in `extensionsRequired` must have an enabled handler.
    pub fn check_required_extensions(&self) -> Result<()> {
        self.start_session().check_required_extensions()
    }

    /// Instantiate every registered extension for a new load session.
    pub fn start_session(&self) -> Session<'_> {
        for name in &self.document.extensions_used {
            if !self.registry.contains(name) && name != KHR_MATERIALS_UNLIT {
                warn!("Extension {name} is used but not supported, ignoring");
            }
        }
        let mut extensions = self
            .registry
            .factories()
            .map(|factory| factory(self))
            .collect::<Vec<_>>();
        extensions.sort_by_key(|e| e.order());
        Session {
            loader: self,
            extensions,
        }
    }

    /// Load every material of the document.
    pub fn load_materials(&self) -> Result<Vec<Box<dyn Material>>> {
        let session = self.start_session();
        session.check_required_extensions()?;
        let out = (0..self.document.materials.len())
            .map(|i| session.load_material(i))
            .collect::<Result<Vec<_>>>()?;
        info!("Loaded {} materials", out.len());
        Ok(out)
    }

    /// Build the in-memory material for `entry`, without loading any property.
    pub fn create_material(&self, entry: &MaterialEntry) -> Box<dyn Material> {
        if entry.extension(KHR_MATERIALS_UNLIT).is_some() {
            Box::new(UnlitMaterial::default())
        } else {
            Box::new(PbrMaterial::default())
        }
    }

    /// Load the core GLTF properties of `entry` into `material`.
    ///
    /// Extensions are not consulted here. Nothing is written if the entry is invalid.
    pub fn load_material_properties(
        &self,
        context: &str,
        entry: &MaterialEntry,
        material: &mut dyn Material,
    ) -> Result<()> {
        let alpha_mode = match entry.alpha_mode.as_deref() {
            None | Some("OPAQUE") => AlphaMode::Opaque,
            Some("MASK") => AlphaMode::Mask(
                entry
                    .alpha_cutoff
                    .as_ref()
                    .map_or(DEFAULT_ALPHA_CUTOFF, |c| c.0 as F),
            ),
            Some("BLEND") => AlphaMode::Blend,
            Some(v) => {
                return Err(Error::InvalidValue {
                    context: format!("{context}/alphaMode"),
                    value: v.to_string(),
                });
            }
        };

        let pbr = &entry.pbr_metallic_roughness;
        let surface = material.surface_mut();
        if let Some(name) = &entry.name {
            surface.name = name.clone();
        }
        surface.base_color_factor = pbr.base_color_factor.0.map(|v| v as F);
        surface.emissive_factor = entry.emissive_factor.0.map(|v| v as F);
        surface.alpha_mode = alpha_mode;
        surface.double_sided = entry.double_sided;

        if let Some(mr) = material.as_metallic_roughness_mut() {
            mr.set_metallic_factor(pbr.metallic_factor.0 as F);
            mr.set_roughness_factor(pbr.roughness_factor.0 as F);
        }
        Ok(())
    }
}

/// The extensions instantiated for one pass over a document.
///
/// Extensions borrow the loader, so they are released when the session is dropped.
pub struct Session<'a> {
    loader: &'a GltfLoader,
    extensions: Vec<Box<dyn LoaderExtension + 'a>>,
}

impl<'a> Session<'a> {
    /// Enabled extensions, in the order they are applied.
    pub fn extensions(&self) -> impl Iterator<Item = &(dyn LoaderExtension + 'a)> + '_ {
        self.extensions
            .iter()
            .map(|e| e.as_ref())
            .filter(|e| e.enabled())
    }

    /// Fails if a required extension has no handler in this session, or its handler is disabled.
    pub fn check_required_extensions(&self) -> Result<()> {
        for name in &self.loader.document.extensions_required {
            if name == KHR_MATERIALS_UNLIT {
                continue;
            }
            if !self.extensions().any(|e| e.name() == name) {
                return Err(Error::MissingRequiredExtension(name.clone()));
            }
        }
        Ok(())
    }

    /// Load the material at `index` of the document.
    pub fn load_material(&self, index: usize) -> Result<Box<dyn Material>> {
        let context = format!("/materials/{index}");
        let Some(entry) = self.loader.document.materials.get(index) else {
            return Err(Error::MissingIndex { context });
        };
        let mut material = self.loader.create_material(entry);
        self.load_material_properties(&context, entry, material.as_mut())?;
        Ok(material)
    }

    /// The first enabled extension that applies to `entry` loads its properties,
    /// otherwise the loader's own property loading is used.
    pub fn load_material_properties(
        &self,
        context: &str,
        entry: &MaterialEntry,
        material: &mut dyn Material,
    ) -> Result<()> {
        for ext in self.extensions() {
            if let Some(res) = ext.load_material_properties(context, entry, &mut *material) {
                debug!("{context}: properties loaded by {}", ext.name());
                return res;
            }
        }
        self.loader
            .load_material_properties(context, entry, material)
    }
}

#[cfg(test)]
fn loader_from(src: &str) -> GltfLoader {
    GltfLoader::from_slice(src.as_bytes()).unwrap()
}

#[test]
fn test_generic_properties() {
    let loader = loader_from(
        r#"{ "materials": [{
            "name": "m",
            "pbrMetallicRoughness": { "baseColorFactor": [1, 0, 0, 1], "metallicFactor": 0.25, "roughnessFactor": 0.5 },
            "emissiveFactor": [0, 1, 0],
            "alphaMode": "MASK",
            "doubleSided": true
        }] }"#,
    );
    let mut mat = PbrMaterial::default();
    let entry = &loader.document().materials[0];
    loader
        .load_material_properties("/materials/0", entry, &mut mat)
        .unwrap();
    assert_eq!(mat.surface.name, "m");
    assert_eq!(mat.surface.base_color_factor, [1., 0., 0., 1.]);
    assert_eq!(mat.surface.emissive_factor, [0., 1., 0.]);
    assert_eq!(mat.surface.alpha_mode, AlphaMode::Mask(0.5));
    assert!(mat.surface.double_sided);
    assert_eq!(mat.metallic_factor, 0.25);
    assert_eq!(mat.roughness_factor, 0.5);
}

#[test]
fn test_invalid_alpha_mode() {
    let loader = loader_from(r#"{ "materials": [{ "name": "m", "alphaMode": "SOMETIMES" }] }"#);
    let mut mat = PbrMaterial::default();
    let err = loader
        .load_material_properties("/materials/0", &loader.document().materials[0], &mut mat)
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "/materials/0/alphaMode: Invalid value (SOMETIMES)"
    );
    assert_eq!(mat, PbrMaterial::default());
}

#[test]
fn test_create_material() {
    let loader = loader_from(
        r#"{ "materials": [{}, { "extensions": { "KHR_materials_unlit": {} } }] }"#,
    );
    let doc = loader.document();
    assert!(loader.create_material(&doc.materials[0]).as_ior().is_some());
    assert!(loader.create_material(&doc.materials[1]).as_ior().is_none());
}

#[test]
fn test_required_extensions() {
    let loader = loader_from(
        r#"{ "extensionsUsed": ["KHR_materials_ior"], "extensionsRequired": ["KHR_materials_ior"] }"#,
    );
    assert!(loader.check_required_extensions().is_ok());

    // Required but not declared as used, so the handler stays disabled.
    let loader = loader_from(r#"{ "extensionsRequired": ["KHR_materials_ior"] }"#);
    assert!(loader.check_required_extensions().is_err());

    let loader = loader_from(r#"{ "extensionsRequired": ["KHR_materials_unlit"] }"#);
    assert!(loader.check_required_extensions().is_ok());

    let loader = loader_from(r#"{ "extensionsRequired": ["EXT_unknown"] }"#);
    let err = loader.load_materials().unwrap_err();
    assert!(matches!(err, Error::MissingRequiredExtension(ref n) if n == "EXT_unknown"));
}

#[test]
fn test_missing_index() {
    let loader = loader_from(r#"{ "materials": [{}] }"#);
    let session = loader.start_session();
    assert!(session.load_material(0).is_ok());
    let err = session.load_material(3).unwrap_err();
    assert_eq!(err.to_string(), "/materials/3: Failed to find index");
}

#[test]
fn test_session_skips_disabled() {
    let loader = loader_from(r#"{ "extensionsUsed": ["KHR_materials_ior"] }"#);
    assert_eq!(loader.start_session().extensions().count(), 1);

    let loader = loader_from(r#"{ "extensionsUsed": [] }"#);
    assert_eq!(loader.start_session().extensions().count(), 0);
}
