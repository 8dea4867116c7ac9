use std::path::Path;

#[cfg(not(feature = "f64"))]
pub type F = f32;

#[cfg(feature = "f64")]
pub type F = f64;

/// Errors raised while loading.
pub mod error;
pub use error::{Error, Result};

/// In-memory materials and their capabilities.
pub mod material;
pub use material::{Material, PbrMaterial, UnlitMaterial};

/// Load GLTF materials and run extensions over them.
pub mod gltf;

pub mod util;

/// Load all materials of a `.gltf` or `.glb` file with the default extensions.
pub fn load(v: impl AsRef<Path>) -> Result<Vec<Box<dyn Material>>> {
    gltf::GltfLoader::open(v)?.load_materials()
}
