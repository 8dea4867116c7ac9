use super::document::MaterialEntry;
use super::loader::GltfLoader;
use crate::error::{Error, Result};
use crate::material::Material;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;

/// A handler for one named GLTF extension, created once per load session.
pub trait LoaderExtension {
    fn name(&self) -> &'static str;

    /// Disabled extensions are never invoked by the session.
    fn enabled(&self) -> bool;

    /// Extensions touching the same material run in ascending order.
    fn order(&self) -> i32;

    /// Load the properties of `material` from `entry`.
    ///
    /// Returns `None` if this extension does not apply to `entry`, in which case the
    /// loader falls back to its own property loading.
    fn load_material_properties(
        &self,
        _context: &str,
        _entry: &MaterialEntry,
        _material: &mut dyn Material,
    ) -> Option<Result<()>> {
        None
    }
}

/// Builds an extension bound to the loader of one session.
pub type ExtensionFactory = for<'a> fn(&'a GltfLoader) -> Box<dyn LoaderExtension + 'a>;

/// Maps extension names to the factories that build them.
#[derive(Clone)]
pub struct ExtensionRegistry {
    factories: BTreeMap<String, ExtensionFactory>,
}

impl ExtensionRegistry {
    /// A registry with no extensions at all.
    pub fn empty() -> Self {
        Self {
            factories: BTreeMap::new(),
        }
    }

    /// Registers `factory` under `name`, replacing any previous factory.
    pub fn register(&mut self, name: impl Into<String>, factory: ExtensionFactory) {
        self.factories.insert(name.into(), factory);
    }

    pub fn unregister(&mut self, name: &str) -> bool {
        self.factories.remove(name).is_some()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.factories.keys().map(String::as_str)
    }

    pub(crate) fn factories(&self) -> impl Iterator<Item = ExtensionFactory> + '_ {
        self.factories.values().copied()
    }
}

impl Default for ExtensionRegistry {
    /// All extensions shipped with this crate.
    fn default() -> Self {
        let mut out = Self::empty();
        for &(name, factory) in super::extensions::BUILTIN {
            out.register(name, factory);
        }
        out
    }
}

/// Runs `action` on the payload of extension `name`, if `entry` carries one.
///
/// A `null` payload counts as absent.
/// The action receives the extension's own context, `{context}/extensions/{name}`.
pub fn load_extension<T, R>(
    context: &str,
    entry: &MaterialEntry,
    name: &str,
    action: impl FnOnce(&str, T) -> Result<R>,
) -> Option<Result<R>>
where
    T: DeserializeOwned,
{
    let raw = entry.extension(name).filter(|v| !v.is_null())?;
    let ext_context = format!("{context}/extensions/{name}");
    let payload = match T::deserialize(raw) {
        Ok(p) => p,
        Err(source) => {
            return Some(Err(Error::InvalidExtension {
                context: ext_context,
                source,
            }));
        }
    };
    Some(action(&ext_context, payload))
}

/// Waits on both units of work, failing with the first error.
///
/// `a` always runs first and `b` is skipped once `a` has failed.
pub fn try_join<A, B>(material: &mut dyn Material, a: A, b: B) -> Result<()>
where
    A: FnOnce(&mut dyn Material) -> Result<()>,
    B: FnOnce(&mut dyn Material) -> Result<()>,
{
    a(&mut *material)?;
    b(&mut *material)
}

#[cfg(test)]
fn entry_with(ext: &str, payload: serde_json::Value) -> MaterialEntry {
    let mut entry = MaterialEntry::default();
    entry.extensions.insert(ext.into(), payload);
    entry
}

#[test]
fn test_load_extension_absent() {
    let entry = MaterialEntry::default();
    let out = load_extension(
        "/materials/0",
        &entry,
        "EXT_test",
        |_, _: serde_json::Value| -> Result<()> { panic!("should not run") },
    );
    assert!(out.is_none());
}

#[test]
fn test_load_extension_null() {
    let entry = entry_with("EXT_test", serde_json::Value::Null);
    let out = load_extension(
        "/materials/0",
        &entry,
        "EXT_test",
        |_, _: serde_json::Value| -> Result<()> { panic!("should not run") },
    );
    assert!(out.is_none());
}

#[test]
fn test_load_extension_context() {
    let entry = entry_with("EXT_test", serde_json::json!({ "v": 3 }));
    #[derive(serde::Deserialize)]
    struct P {
        v: u32,
    }
    let out = load_extension("/materials/2", &entry, "EXT_test", |ctx, p: P| {
        Ok(format!("{ctx}:{}", p.v))
    });
    assert_eq!(out.unwrap().unwrap(), "/materials/2/extensions/EXT_test:3");
}

#[test]
fn test_load_extension_bad_payload() {
    let entry = entry_with("EXT_test", serde_json::json!({ "v": "three" }));
    #[derive(Debug, serde::Deserialize)]
    struct P {
        #[allow(unused)]
        v: u32,
    }
    let err = load_extension("/materials/0", &entry, "EXT_test", |_, _: P| Ok(()))
        .unwrap()
        .unwrap_err();
    assert!(matches!(err, Error::InvalidExtension { .. }));
    assert!(err.to_string().starts_with("/materials/0/extensions/EXT_test:"));
}

#[test]
fn test_try_join_first_failure() {
    use crate::material::PbrMaterial;
    let mut mat = PbrMaterial::default();
    let mut ran_b = false;
    let err = try_join(
        &mut mat,
        |_| Err(Error::UnsupportedMaterial { context: "a".into() }),
        |_| {
            ran_b = true;
            Ok(())
        },
    )
    .unwrap_err();
    assert_eq!(err.to_string(), "a: Material type not supported");
    assert!(!ran_b);

    let err = try_join(
        &mut mat,
        |m| {
            m.surface_mut().double_sided = true;
            Ok(())
        },
        |_| Err(Error::MissingRequiredExtension("b".into())),
    )
    .unwrap_err();
    assert!(matches!(err, Error::MissingRequiredExtension(_)));
    assert!(mat.surface.double_sided);
}

#[test]
fn test_registry() {
    let mut reg = ExtensionRegistry::default();
    assert!(reg.contains("KHR_materials_ior"));
    assert!(reg.unregister("KHR_materials_ior"));
    assert!(!reg.unregister("KHR_materials_ior"));
    assert_eq!(reg.names().count(), 0);
    assert_eq!(ExtensionRegistry::empty().factories().count(), 0);
}
