//! Option registries and the registration API.
//!
//! A [`Registry`] holds top-level [`OptionDef`]s in registration order. Each
//! option may own one [`SubRegistry`] of [`SubOptionDef`]s. Registration
//! order is significant: it is the help order and the tie-break order when
//! more than one definition could match a token.
//!
//! Registries are never mutated by parsing, so a fully built registry can be
//! shared across threads and parsed against concurrently.

use std::fmt;

use crate::error::RegistrationError;
use crate::types::{Definition, OptionDef, OptionEvent, OptionFlags, ParserFlags, SubOptionDef};

/// Callback invoked synchronously for every recognized definition.
pub type Handler = Box<dyn Fn(&OptionEvent<'_>) + Send + Sync>;

/// Ordered set of top-level options plus the handler and behavior flags
/// governing how they are matched.
///
/// # Examples
///
/// ```
/// use option_parser_core::{OptionFlags, ParserFlags, Registry};
///
/// let mut registry = Registry::new(ParserFlags::new().with_alias_fallback());
/// registry
///     .add_option("name", Some('n'), OptionFlags::new().require_value(), "Sets the name")
///     .unwrap();
/// registry
///     .add_option("time", Some('t'), OptionFlags::new().forbid_value(), "Gets the time")
///     .unwrap();
///
/// assert_eq!(registry.options().len(), 2);
/// assert_eq!(registry.option_description("time"), Some("Gets the time"));
/// ```
pub struct Registry {
    options: Vec<OptionDef>,
    flags: ParserFlags,
    handler: Option<Handler>,
}

impl Registry {
    /// Creates an empty registry with no handler.
    pub fn new(flags: ParserFlags) -> Self {
        Self {
            options: Vec::new(),
            flags,
            handler: None,
        }
    }

    /// Sets the handler invoked for each recognized top-level option.
    pub fn with_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&OptionEvent<'_>) + Send + Sync + 'static,
    {
        self.handler = Some(Box::new(handler));
        self
    }

    /// Registers an option and returns it so a sub-registry can be attached.
    ///
    /// # Errors
    ///
    /// Returns a [`RegistrationError`] if the name is empty, contains `=` or
    /// NUL, or is already registered, or if the flags both require and
    /// forbid a value.
    pub fn add_option(
        &mut self,
        name: &str,
        alias: Option<char>,
        flags: OptionFlags,
        description: &str,
    ) -> Result<&mut OptionDef, RegistrationError> {
        let option = OptionDef::new(name, alias, flags, description)?;
        if self.option(name).is_some() {
            return Err(RegistrationError::DuplicateName(name.to_string()));
        }
        self.options.push(option);
        let index = self.options.len() - 1;
        Ok(&mut self.options[index])
    }

    /// Returns the registry's behavior flags.
    pub fn flags(&self) -> ParserFlags {
        self.flags
    }

    /// Returns the options in registration order.
    pub fn options(&self) -> &[OptionDef] {
        &self.options
    }

    /// Looks up an option by its exact name.
    pub fn option(&self, name: &str) -> Option<&OptionDef> {
        self.options.iter().find(|option| option.name() == name)
    }

    /// Returns the description of the named option.
    pub fn option_description(&self, name: &str) -> Option<&str> {
        self.option(name).map(Definition::description)
    }

    /// Returns the description of a sub-option of the named option.
    pub fn sub_option_description(&self, option: &str, sub_option: &str) -> Option<&str> {
        self.option(option)?
            .sub_options()?
            .option(sub_option)
            .map(Definition::description)
    }

    pub(crate) fn notify(&self, event: &OptionEvent<'_>) {
        if let Some(handler) = &self.handler {
            handler(event);
        }
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("options", &self.options)
            .field("flags", &self.flags)
            .field("handler", &self.handler.is_some())
            .finish()
    }
}

/// Ordered set of sub-options owned by exactly one parent option.
///
/// Only `always_check_alias` affects sub-option matching; the other
/// [`ParserFlags`] have no meaning inside a sub-option group.
pub struct SubRegistry {
    options: Vec<SubOptionDef>,
    flags: ParserFlags,
    handler: Option<Handler>,
}

impl SubRegistry {
    /// Creates an empty sub-registry with no handler.
    pub fn new(flags: ParserFlags) -> Self {
        Self {
            options: Vec::new(),
            flags,
            handler: None,
        }
    }

    /// Sets the handler invoked for each recognized sub-option.
    pub fn with_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&OptionEvent<'_>) + Send + Sync + 'static,
    {
        self.handler = Some(Box::new(handler));
        self
    }

    /// Registers a sub-option.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Registry::add_option`].
    pub fn add_option(
        &mut self,
        name: &str,
        alias: Option<char>,
        flags: OptionFlags,
        description: &str,
    ) -> Result<&mut SubOptionDef, RegistrationError> {
        let option = SubOptionDef::new(name, alias, flags, description)?;
        if self.option(name).is_some() {
            return Err(RegistrationError::DuplicateName(name.to_string()));
        }
        self.options.push(option);
        let index = self.options.len() - 1;
        Ok(&mut self.options[index])
    }

    /// Returns the sub-registry's behavior flags.
    pub fn flags(&self) -> ParserFlags {
        self.flags
    }

    /// Returns the sub-options in registration order.
    pub fn options(&self) -> &[SubOptionDef] {
        &self.options
    }

    /// Looks up a sub-option by its exact name.
    pub fn option(&self, name: &str) -> Option<&SubOptionDef> {
        self.options.iter().find(|option| option.name() == name)
    }

    pub(crate) fn notify(&self, event: &OptionEvent<'_>) {
        if let Some(handler) = &self.handler {
            handler(event);
        }
    }
}

impl fmt::Debug for SubRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubRegistry")
            .field("options", &self.options)
            .field("flags", &self.flags)
            .field("handler", &self.handler.is_some())
            .finish()
    }
}
