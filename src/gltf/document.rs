use crate::error::Result;
use gltf_json::material::{AlphaCutoff, EmissiveFactor, PbrMetallicRoughness};
use serde::Deserialize;
use serde_json::{Map, Value};

/// The material-related portion of a GLTF document.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(default)]
    pub extensions_used: Vec<String>,
    #[serde(default)]
    pub extensions_required: Vec<String>,
    #[serde(default)]
    pub materials: Vec<MaterialEntry>,
}

impl Document {
    /// Parse either a JSON document or a binary GLB container.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        if bytes.starts_with(b"glTF") {
            let glb = ::gltf::binary::Glb::from_slice(bytes)?;
            return Ok(serde_json::from_slice(&glb.json)?);
        }
        Ok(serde_json::from_slice(bytes)?)
    }
}

/// One entry of the document's `materials` array, as written in the file.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialEntry {
    pub name: Option<String>,
    #[serde(default)]
    pub pbr_metallic_roughness: PbrMetallicRoughness,
    #[serde(default)]
    pub emissive_factor: EmissiveFactor,
    pub alpha_mode: Option<String>,
    pub alpha_cutoff: Option<AlphaCutoff>,
    #[serde(default)]
    pub double_sided: bool,

    /// Raw extension payloads keyed by extension name.
    #[serde(default)]
    pub extensions: Map<String, Value>,
}

impl MaterialEntry {
    pub fn extension(&self, name: &str) -> Option<&Value> {
        self.extensions.get(name)
    }
}

#[test]
fn test_parse_materials() {
    let src = r#"{
        "asset": { "version": "2.0" },
        "extensionsUsed": ["KHR_materials_ior"],
        "materials": [
            {
                "name": "glass",
                "pbrMetallicRoughness": { "baseColorFactor": [0.5, 0.5, 0.5, 1.0], "metallicFactor": 0.0 },
                "alphaMode": "BLEND",
                "extensions": { "KHR_materials_ior": { "ior": 1.4 } }
            },
            {}
        ]
    }"#;
    let doc = Document::from_slice(src.as_bytes()).unwrap();
    assert_eq!(doc.extensions_used, ["KHR_materials_ior"]);
    assert!(doc.extensions_required.is_empty());
    assert_eq!(doc.materials.len(), 2);

    let glass = &doc.materials[0];
    assert_eq!(glass.name.as_deref(), Some("glass"));
    assert_eq!(glass.pbr_metallic_roughness.metallic_factor.0, 0.0);
    assert_eq!(glass.pbr_metallic_roughness.roughness_factor.0, 1.0);
    assert_eq!(glass.alpha_mode.as_deref(), Some("BLEND"));
    assert!(glass.extension("KHR_materials_ior").is_some());

    let empty = &doc.materials[1];
    assert_eq!(empty.pbr_metallic_roughness.base_color_factor.0, [1.0; 4]);
    assert!(empty.extensions.is_empty());
}

#[test]
fn test_parse_glb() {
    use std::borrow::Cow;
    let mut json = br#"{"asset":{"version":"2.0"},"materials":[{"name":"a"}]}"#.to_vec();
    while json.len() % 4 != 0 {
        json.push(b' ');
    }
    let glb = ::gltf::binary::Glb {
        header: ::gltf::binary::Header {
            magic: *b"glTF",
            version: 2,
            length: (12 + 8 + json.len()) as u32,
        },
        json: Cow::Owned(json),
        bin: None,
    };
    let mut bytes = vec![];
    glb.to_writer(&mut bytes).unwrap();

    let doc = Document::from_slice(&bytes).unwrap();
    assert_eq!(doc.materials.len(), 1);
    assert_eq!(doc.materials[0].name.as_deref(), Some("a"));
}

#[test]
fn test_parse_invalid() {
    assert!(Document::from_slice(b"not json").is_err());
}
