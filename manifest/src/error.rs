//! Error types for manifest loading and registry construction.

use std::path::PathBuf;

use option_parser_core::RegistrationError;
use thiserror::Error;

/// Errors that can occur while reading, writing, or building a manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing or serialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A definition in the manifest was rejected by the registry.
    #[error("invalid definition: {0}")]
    Registration(#[from] RegistrationError),

    /// The file extension is not `.json`, `.yaml`, or `.yml`.
    #[error("unsupported manifest format: {}", .0.display())]
    UnsupportedFormat(PathBuf),
}

/// Convenience alias for results with [`ManifestError`].
pub type Result<T> = std::result::Result<T, ManifestError>;
