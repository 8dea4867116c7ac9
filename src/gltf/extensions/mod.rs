use super::extension::ExtensionFactory;

/// KHR_materials_ior
pub mod khr_materials_ior;
pub use khr_materials_ior::KhrMaterialsIor;

/// Marks a material as unlit. Only consulted when creating materials.
pub const KHR_MATERIALS_UNLIT: &str = "KHR_materials_unlit";

/// Extensions registered in every default registry.
pub const BUILTIN: &[(&str, ExtensionFactory)] =
    &[(khr_materials_ior::NAME, khr_materials_ior::create)];
