use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Per-extension settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtensionOptions {
    pub enabled: bool,
}

impl Default for ExtensionOptions {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Settings for a loader, keyed by extension name.
///
/// ```json
/// { "extensions": { "KHR_materials_ior": { "enabled": false } } }
/// ```
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderOptions {
    pub extensions: HashMap<String, ExtensionOptions>,
}

impl LoaderOptions {
    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let s = std::fs::read_to_string(path)?;
        Self::from_json_str(&s)
    }

    /// Extensions without an entry are enabled.
    pub fn extension_enabled(&self, name: &str) -> bool {
        self.extensions.get(name).is_none_or(|o| o.enabled)
    }

    pub fn disable_extension(mut self, name: impl Into<String>) -> Self {
        self.extensions
            .insert(name.into(), ExtensionOptions { enabled: false });
        self
    }
}

#[test]
fn test_options_json() {
    let opts = LoaderOptions::from_json_str(
        r#"{ "extensions": { "KHR_materials_ior": { "enabled": false }, "OTHER": {} } }"#,
    )
    .unwrap();
    assert!(!opts.extension_enabled("KHR_materials_ior"));
    assert!(opts.extension_enabled("OTHER"));
    assert!(opts.extension_enabled("MISSING"));

    assert_eq!(LoaderOptions::from_json_str("{}").unwrap(), LoaderOptions::default());
    assert!(LoaderOptions::from_json_str("[").is_err());
}
