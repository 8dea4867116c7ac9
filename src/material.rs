use crate::F;
use std::fmt::Debug;

/// Default index of refraction for physically-based materials.
pub const DEFAULT_IOR: F = 1.5;

/// How the alpha channel of the base color is interpreted.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub enum AlphaMode {
    #[default]
    Opaque,
    /// Fragments below the cutoff are discarded.
    Mask(F),
    Blend,
}

/// Properties shared by every kind of material.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceProperties {
    pub name: String,
    pub base_color_factor: [F; 4],
    pub emissive_factor: [F; 3],
    pub alpha_mode: AlphaMode,
    pub double_sided: bool,
}

impl Default for SurfaceProperties {
    fn default() -> Self {
        Self {
            name: String::new(),
            base_color_factor: [1.; 4],
            emissive_factor: [0.; 3],
            alpha_mode: AlphaMode::Opaque,
            double_sided: false,
        }
    }
}

/// Capability of materials which carry an index of refraction.
pub trait IndexOfRefraction {
    fn index_of_refraction(&self) -> F;
    fn set_index_of_refraction(&mut self, ior: F);
}

/// Capability of materials driven by metallic/roughness factors.
pub trait MetallicRoughness {
    fn set_metallic_factor(&mut self, m: F);
    fn set_roughness_factor(&mut self, r: F);
}

/// An in-memory material built from a document entry.
///
/// Kind-specific fields are only reachable through capability queries, so callers
/// never need to know the concrete material type.
pub trait Material: Debug {
    fn surface(&self) -> &SurfaceProperties;
    fn surface_mut(&mut self) -> &mut SurfaceProperties;

    fn as_ior(&self) -> Option<&dyn IndexOfRefraction> {
        None
    }
    fn as_ior_mut(&mut self) -> Option<&mut dyn IndexOfRefraction> {
        None
    }
    fn as_metallic_roughness_mut(&mut self) -> Option<&mut dyn MetallicRoughness> {
        None
    }
}

/// Physically-based metallic/roughness material.
#[derive(Debug, Clone, PartialEq)]
pub struct PbrMaterial {
    pub surface: SurfaceProperties,
    pub metallic_factor: F,
    pub roughness_factor: F,
    pub index_of_refraction: F,
}

impl Default for PbrMaterial {
    fn default() -> Self {
        Self {
            surface: SurfaceProperties::default(),
            metallic_factor: 1.,
            roughness_factor: 1.,
            index_of_refraction: DEFAULT_IOR,
        }
    }
}

impl IndexOfRefraction for PbrMaterial {
    fn index_of_refraction(&self) -> F {
        self.index_of_refraction
    }
    fn set_index_of_refraction(&mut self, ior: F) {
        self.index_of_refraction = ior;
    }
}

impl MetallicRoughness for PbrMaterial {
    fn set_metallic_factor(&mut self, m: F) {
        self.metallic_factor = m;
    }
    fn set_roughness_factor(&mut self, r: F) {
        self.roughness_factor = r;
    }
}

impl Material for PbrMaterial {
    fn surface(&self) -> &SurfaceProperties {
        &self.surface
    }
    fn surface_mut(&mut self) -> &mut SurfaceProperties {
        &mut self.surface
    }
    fn as_ior(&self) -> Option<&dyn IndexOfRefraction> {
        Some(self)
    }
    fn as_ior_mut(&mut self) -> Option<&mut dyn IndexOfRefraction> {
        Some(self)
    }
    fn as_metallic_roughness_mut(&mut self) -> Option<&mut dyn MetallicRoughness> {
        Some(self)
    }
}

/// Constant-shaded material, only the surface color is used.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct UnlitMaterial {
    pub surface: SurfaceProperties,
}

impl Material for UnlitMaterial {
    fn surface(&self) -> &SurfaceProperties {
        &self.surface
    }
    fn surface_mut(&mut self) -> &mut SurfaceProperties {
        &mut self.surface
    }
}

#[test]
fn test_capabilities() {
    let mut pbr = PbrMaterial::default();
    assert_eq!(pbr.as_ior().map(|i| i.index_of_refraction()), Some(DEFAULT_IOR));
    pbr.as_ior_mut().unwrap().set_index_of_refraction(1.33);
    assert_eq!(pbr.index_of_refraction, 1.33);

    let mut unlit = UnlitMaterial::default();
    assert!(unlit.as_ior().is_none());
    assert!(unlit.as_ior_mut().is_none());
    assert!(unlit.as_metallic_roughness_mut().is_none());
}
