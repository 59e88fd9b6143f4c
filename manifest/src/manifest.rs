//! Serializable registry descriptions.
//!
//! A [`RegistryManifest`] mirrors a [`Registry`]: parser flags plus ordered
//! option definitions, each with an optional sub-option group. Flag fields
//! sit directly on each definition and default to `false`:
//!
//! ```yaml
//! flags:
//!   allow_remainder: true
//! options:
//!   - name: required
//!     alias: r
//!     description: A required option
//!     required: true
//!   - name: sub
//!     alias: s
//!     sub_options:
//!       options:
//!         - name: animal
//!           required: true
//!           value_required: true
//! ```

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use option_parser_core::{
    Definition, OptionEvent, OptionFlags, ParserFlags, Registry, SubRegistry,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ManifestError, Result};

/// On-disk encoding of a manifest, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestFormat {
    /// `.json`
    Json,
    /// `.yaml` or `.yml`
    Yaml,
}

impl ManifestFormat {
    /// Picks the format from a path's extension.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::UnsupportedFormat`] for any other extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Self::Json),
            Some("yaml" | "yml") => Ok(Self::Yaml),
            _ => Err(ManifestError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

/// Description of a top-level registry.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RegistryManifest {
    /// Registry-level behavior flags.
    #[serde(default)]
    pub flags: ParserFlags,
    /// Options in registration order.
    #[serde(default)]
    pub options: Vec<OptionManifest>,
}

/// Description of a top-level option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionManifest {
    /// Long name, matched after `--`, `/`, or `-`.
    pub name: String,
    /// Optional one-character alias.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<char>,
    /// Help text.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Policy flags, written inline next to the name.
    #[serde(flatten)]
    pub flags: OptionFlags,
    /// Sub-options consumed after this option.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_options: Option<SubRegistryManifest>,
}

/// Description of a sub-option registry.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SubRegistryManifest {
    /// Group behavior flags; only `always_check_alias` has an effect.
    #[serde(default)]
    pub flags: ParserFlags,
    /// Sub-options in registration order.
    #[serde(default)]
    pub options: Vec<SubOptionManifest>,
}

/// Description of a sub-option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubOptionManifest {
    /// Name, matched as a bare `name` or `name=value` token.
    pub name: String,
    /// Optional alias, reachable only through the one-character retry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<char>,
    /// Help text.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Policy flags, written inline next to the name.
    #[serde(flatten)]
    pub flags: OptionFlags,
}

impl RegistryManifest {
    /// Loads a manifest, choosing YAML or JSON by the file extension.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::UnsupportedFormat`] for unknown extensions,
    /// [`ManifestError::Io`] if the file cannot be read, or a JSON/YAML error
    /// if it does not parse.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let format = ManifestFormat::from_path(path)?;
        let reader = BufReader::new(File::open(path)?);
        let manifest: Self = match format {
            ManifestFormat::Json => serde_json::from_reader(reader)?,
            ManifestFormat::Yaml => serde_yaml::from_reader(reader)?,
        };
        debug!(path = %path.display(), options = manifest.options.len(), "loaded manifest");
        Ok(manifest)
    }

    /// Parses a YAML manifest.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::Yaml`] if the text does not parse.
    pub fn from_yaml_str(text: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Parses a JSON manifest.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::Json`] if the text does not parse.
    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Writes the manifest, choosing YAML or JSON by the file extension.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::UnsupportedFormat`] for unknown extensions,
    /// or an I/O or serialization error.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let format = ManifestFormat::from_path(path)?;
        let writer = BufWriter::new(File::create(path)?);
        match format {
            ManifestFormat::Json => serde_json::to_writer_pretty(writer, self)?,
            ManifestFormat::Yaml => serde_yaml::to_writer(writer, self)?,
        }
        Ok(())
    }

    /// Builds a [`Registry`] with every option and sub-option registered in
    /// manifest order.
    ///
    /// `handler` is installed on the registry and on every sub-registry; use
    /// [`OptionEvent::parent`] to tell the levels apart.
    ///
    /// # Errors
    ///
    /// Returns [`ManifestError::Registration`] for the first definition the
    /// registry rejects.
    ///
    /// # Examples
    ///
    /// ```
    /// use option_parser_manifest::RegistryManifest;
    ///
    /// let manifest = RegistryManifest::from_yaml_str(
    ///     "options:\n  - name: time\n    alias: t\n    value_forbidden: true\n",
    /// )
    /// .unwrap();
    /// let registry = manifest.build(|_| {}).unwrap();
    /// assert!(registry.parse(&["prog", "-t"]).is_success());
    /// ```
    pub fn build<F>(&self, handler: F) -> Result<Registry>
    where
        F: Fn(&OptionEvent<'_>) + Clone + Send + Sync + 'static,
    {
        let mut registry = Registry::new(self.flags).with_handler(handler.clone());
        for option in &self.options {
            let def = registry.add_option(
                &option.name,
                option.alias,
                option.flags,
                &option.description,
            )?;
            if let Some(group) = &option.sub_options {
                let sub = def.attach_sub_options(
                    SubRegistry::new(group.flags).with_handler(handler.clone()),
                )?;
                for sub_option in &group.options {
                    sub.add_option(
                        &sub_option.name,
                        sub_option.alias,
                        sub_option.flags,
                        &sub_option.description,
                    )?;
                }
            }
        }
        debug!(options = registry.options().len(), "built registry from manifest");
        Ok(registry)
    }

    /// Captures the definitions of an existing registry.
    pub fn from_registry(registry: &Registry) -> Self {
        let options = registry
            .options()
            .iter()
            .map(|option| OptionManifest {
                name: option.name().to_string(),
                alias: option.alias(),
                description: option.description().to_string(),
                flags: option.flags(),
                sub_options: option.sub_options().map(|group| SubRegistryManifest {
                    flags: group.flags(),
                    options: group.options().iter().map(sub_option_manifest).collect(),
                }),
            })
            .collect();

        Self {
            flags: registry.flags(),
            options,
        }
    }
}

fn sub_option_manifest(def: &impl Definition) -> SubOptionManifest {
    SubOptionManifest {
        name: def.name().to_string(),
        alias: def.alias(),
        description: def.description().to_string(),
        flags: def.flags(),
    }
}
