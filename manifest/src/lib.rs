//! YAML and JSON manifests for option parser registries.
//!
//! A manifest describes a [`Registry`](option_parser_core::Registry)
//! declaratively so option sets can live in configuration files instead of
//! code.
//!
//! # Quick start
//!
//! ```no_run
//! use option_parser_manifest::RegistryManifest;
//!
//! let manifest = RegistryManifest::load("options.yaml").unwrap();
//! let registry = manifest
//!     .build(|event| println!("{} = {:?}", event.qualified_name(), event.value))
//!     .unwrap();
//!
//! let args: Vec<String> = std::env::args().collect();
//! let outcome = registry.parse(&args);
//! if let Some(message) = outcome.error_message() {
//!     eprintln!("{message}");
//! }
//! ```

mod error;
mod manifest;

pub use error::{ManifestError, Result};
pub use manifest::{
    ManifestFormat, OptionManifest, RegistryManifest, SubOptionManifest, SubRegistryManifest,
};
