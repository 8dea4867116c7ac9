/// Serde model of the material portion of a GLTF document.
pub mod document;
pub use document::{Document, MaterialEntry};

/// Extension handler trait, registry and helpers shared by handlers.
pub mod extension;
pub use extension::{ExtensionFactory, ExtensionRegistry, LoaderExtension};

/// Material extensions shipped with this crate.
pub mod extensions;

/// Loader options.
pub mod options;
pub use options::{ExtensionOptions, LoaderOptions};

pub mod loader;
pub use loader::{GltfLoader, Session};
