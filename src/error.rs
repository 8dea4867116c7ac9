//! Errors raised while loading materials.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// The in-memory material lacks a capability the extension needs.
    #[error("{context}: Material type not supported")]
    UnsupportedMaterial { context: String },

    #[error("{context}: Invalid extension payload: {source}")]
    InvalidExtension {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{context}: Invalid value ({value})")]
    InvalidValue { context: String, value: String },

    #[error("{context}: Failed to find index")]
    MissingIndex { context: String },

    #[error("Required extension {0} is not available")]
    MissingRequiredExtension(String),

    #[error("Don't know how to load {0}")]
    UnknownFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("GLTF error: {0}")]
    Gltf(#[from] ::gltf::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
