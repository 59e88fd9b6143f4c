//! Definition types for registered options.
//!
//! This module defines the policy flag sets, the [`Definition`] trait shared
//! by top-level options and sub-options, and the [`OptionEvent`] passed to
//! handlers when a definition is recognized on the command line.

use serde::{Deserialize, Serialize};

use crate::error::RegistrationError;
use crate::registry::SubRegistry;

/// Policy flags for a single option or sub-option.
///
/// All flags are independent, except that `value_required` and
/// `value_forbidden` may not both be set; registering such a definition
/// fails with [`RegistrationError::ConflictingValuePolicy`].
///
/// # Examples
///
/// ```
/// use option_parser_core::OptionFlags;
///
/// let flags = OptionFlags::new().require().require_value();
/// assert!(flags.required);
/// assert!(flags.value_required);
/// assert!(!flags.duplicates_allowed);
/// assert!(!flags.has_value_conflict());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OptionFlags {
    /// Parsing fails if the option is never encountered.
    pub required: bool,
    /// The option must be given a value (`--name=value`).
    pub value_required: bool,
    /// The option must not be given a value.
    pub value_forbidden: bool,
    /// The option may appear more than once in a single parse.
    pub duplicates_allowed: bool,
}

impl OptionFlags {
    /// Creates an empty flag set (optional, value optional, no duplicates).
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the option as required.
    pub fn require(mut self) -> Self {
        self.required = true;
        self
    }

    /// Marks the option as requiring a value.
    pub fn require_value(mut self) -> Self {
        self.value_required = true;
        self
    }

    /// Marks the option as refusing a value.
    pub fn forbid_value(mut self) -> Self {
        self.value_forbidden = true;
        self
    }

    /// Allows the option to appear multiple times.
    pub fn allow_duplicates(mut self) -> Self {
        self.duplicates_allowed = true;
        self
    }

    /// Returns `true` if both value policies are set.
    pub fn has_value_conflict(&self) -> bool {
        self.value_required && self.value_forbidden
    }
}

/// Registry-level behavior flags.
///
/// # Examples
///
/// ```
/// use option_parser_core::ParserFlags;
///
/// let flags = ParserFlags::new().with_remainder().with_dash_as_full_option();
/// assert!(flags.allow_remainder);
/// assert!(flags.dash_as_full_option);
/// assert!(!flags.settable_flags);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserFlags {
    /// Non-option tokens are collected instead of rejected.
    pub allow_remainder: bool,
    /// A one-character long-form name that matches no option is retried as
    /// an alias (`/t` resolves the option aliased `t`).
    pub always_check_alias: bool,
    /// A single leading dash introduces a long name (`-name`) instead of an
    /// alias run.
    pub dash_as_full_option: bool,
    /// The first alias of a run may take a value directly (`-e=value`).
    pub settable_flags: bool,
}

impl ParserFlags {
    /// Creates an empty flag set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `allow_remainder`.
    pub fn with_remainder(mut self) -> Self {
        self.allow_remainder = true;
        self
    }

    /// Sets `always_check_alias`.
    pub fn with_alias_fallback(mut self) -> Self {
        self.always_check_alias = true;
        self
    }

    /// Sets `dash_as_full_option`.
    pub fn with_dash_as_full_option(mut self) -> Self {
        self.dash_as_full_option = true;
        self
    }

    /// Sets `settable_flags`.
    pub fn with_settable_flags(mut self) -> Self {
        self.settable_flags = true;
        self
    }

    /// Returns a flag set with every behavior enabled.
    pub fn all() -> Self {
        Self {
            allow_remainder: true,
            always_check_alias: true,
            dash_as_full_option: true,
            settable_flags: true,
        }
    }
}

/// Read-only view of a registered definition.
///
/// Implemented by [`OptionDef`] and [`SubOptionDef`] so that lookup, encounter
/// tracking, required verification, and help rendering share one code path.
pub trait Definition {
    /// The long name, matched after `--`, `/`, or (when configured) `-`.
    fn name(&self) -> &str;
    /// The single-character alias, if any.
    fn alias(&self) -> Option<char>;
    /// Human-readable description used for help output.
    fn description(&self) -> &str;
    /// The definition's policy flags.
    fn flags(&self) -> OptionFlags;
}

/// Fields common to both definition kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
struct DefinitionBase {
    name: String,
    alias: Option<char>,
    description: String,
    flags: OptionFlags,
}

impl DefinitionBase {
    fn new(
        name: &str,
        alias: Option<char>,
        flags: OptionFlags,
        description: &str,
    ) -> Result<Self, RegistrationError> {
        if name.is_empty() {
            return Err(RegistrationError::EmptyName);
        }
        if name.contains(['=', '\0']) {
            return Err(RegistrationError::InvalidName(name.to_string()));
        }
        if flags.has_value_conflict() {
            return Err(RegistrationError::ConflictingValuePolicy(name.to_string()));
        }

        Ok(Self {
            name: name.to_string(),
            alias,
            description: description.to_string(),
            flags,
        })
    }
}

/// A top-level option, optionally owning a [`SubRegistry`].
///
/// Created through [`Registry::add_option`](crate::Registry::add_option).
#[derive(Debug)]
pub struct OptionDef {
    base: DefinitionBase,
    sub_options: Option<SubRegistry>,
}

impl OptionDef {
    pub(crate) fn new(
        name: &str,
        alias: Option<char>,
        flags: OptionFlags,
        description: &str,
    ) -> Result<Self, RegistrationError> {
        Ok(Self {
            base: DefinitionBase::new(name, alias, flags, description)?,
            sub_options: None,
        })
    }

    /// Attaches a sub-option registry to this option.
    ///
    /// Returns the attached registry so sub-options can be added to it. An
    /// option owns at most one sub-registry for its whole lifetime.
    ///
    /// # Errors
    ///
    /// Returns [`RegistrationError::SubRegistryAlreadyAttached`] if this
    /// option already owns a sub-registry.
    ///
    /// # Examples
    ///
    /// ```
    /// use option_parser_core::{OptionFlags, ParserFlags, Registry, SubRegistry};
    ///
    /// let mut registry = Registry::new(ParserFlags::new());
    /// let sub = registry
    ///     .add_option("sub", Some('s'), OptionFlags::new(), "Has sub-options")
    ///     .unwrap()
    ///     .attach_sub_options(SubRegistry::new(ParserFlags::new()))
    ///     .unwrap();
    /// sub.add_option("tree", Some('t'), OptionFlags::new(), "Names a tree")
    ///     .unwrap();
    /// assert_eq!(registry.options()[0].sub_options().unwrap().options().len(), 1);
    /// ```
    pub fn attach_sub_options(
        &mut self,
        sub_options: SubRegistry,
    ) -> Result<&mut SubRegistry, RegistrationError> {
        if self.sub_options.is_some() {
            return Err(RegistrationError::SubRegistryAlreadyAttached(
                self.base.name.clone(),
            ));
        }
        Ok(self.sub_options.insert(sub_options))
    }

    /// Returns the attached sub-option registry, if any.
    pub fn sub_options(&self) -> Option<&SubRegistry> {
        self.sub_options.as_ref()
    }
}

impl Definition for OptionDef {
    fn name(&self) -> &str {
        &self.base.name
    }

    fn alias(&self) -> Option<char> {
        self.base.alias
    }

    fn description(&self) -> &str {
        &self.base.description
    }

    fn flags(&self) -> OptionFlags {
        self.base.flags
    }
}

/// An option nested under a parent option's [`SubRegistry`].
///
/// Sub-options cannot own a further registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubOptionDef {
    base: DefinitionBase,
}

impl SubOptionDef {
    pub(crate) fn new(
        name: &str,
        alias: Option<char>,
        flags: OptionFlags,
        description: &str,
    ) -> Result<Self, RegistrationError> {
        Ok(Self {
            base: DefinitionBase::new(name, alias, flags, description)?,
        })
    }
}

impl Definition for SubOptionDef {
    fn name(&self) -> &str {
        &self.base.name
    }

    fn alias(&self) -> Option<char> {
        self.base.alias
    }

    fn description(&self) -> &str {
        &self.base.description
    }

    fn flags(&self) -> OptionFlags {
        self.base.flags
    }
}

/// A recognized option or sub-option, delivered to the registry's handler.
///
/// Borrowed from the registry and the argument vector for the duration of
/// the handler call; use [`to_record`](OptionEvent::to_record) to keep it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OptionEvent<'a> {
    /// Name of the recognized definition.
    pub name: &'a str,
    /// Alias of the recognized definition.
    pub alias: Option<char>,
    /// Value given after `=`, if any.
    pub value: Option<&'a str>,
    /// Name of the parent option when this is a sub-option.
    pub parent: Option<&'a str>,
}

impl OptionEvent<'_> {
    /// Returns `parent.name` for sub-options and `name` otherwise.
    pub fn qualified_name(&self) -> String {
        match self.parent {
            Some(parent) => format!("{parent}.{}", self.name),
            None => self.name.to_string(),
        }
    }

    /// Copies the event into an owned [`EventRecord`].
    pub fn to_record(&self) -> EventRecord {
        EventRecord {
            name: self.name.to_string(),
            alias: self.alias,
            value: self.value.map(String::from),
            parent: self.parent.map(String::from),
        }
    }
}

/// Owned copy of an [`OptionEvent`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Name of the recognized definition.
    pub name: String,
    /// Alias of the recognized definition.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<char>,
    /// Value given after `=`, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Name of the parent option when this is a sub-option.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
}
