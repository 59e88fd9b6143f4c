//! Error types for registration and parsing.
//!
//! Parse failures are first-failure-wins: the pass stops at the first
//! violated contract and reports a single [`ParseError`]. Each variant
//! carries the offending identifier, dot-qualified (`parent.child`) when the
//! failure happened inside a sub-option group, and renders a fixed message
//! template through `Display`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while building a registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    /// The option name is empty.
    #[error("option name cannot be empty")]
    EmptyName,
    /// The option name contains `=` or NUL.
    #[error("option name cannot contain '=' or NUL: {0:?}")]
    InvalidName(String),
    /// An option with the same name is already registered at this level.
    #[error("option name already registered: {0}")]
    DuplicateName(String),
    /// Both `value_required` and `value_forbidden` were set.
    #[error("option cannot both require and forbid a value: {0}")]
    ConflictingValuePolicy(String),
    /// The option already owns a sub-option registry.
    #[error("option already has sub-options: {0}")]
    SubRegistryAlreadyAttached(String),
}

/// Fieldless discriminant of a [`ParseError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParseErrorKind {
    /// A long name matched no option.
    InvalidName,
    /// An alias matched no option.
    InvalidAlias,
    /// A matched name was followed by something other than `=` or the end.
    InvalidNameToken,
    /// An alias run contained a character that cannot be an alias.
    InvalidAliasToken,
    /// An option without `duplicates_allowed` appeared twice.
    Duplicate,
    /// A required option never appeared.
    RequiredMissing,
    /// Nothing followed the `=`.
    ValueInvalid,
    /// An option requiring a value got none.
    ValueMissing,
    /// An option forbidding a value got one.
    ValueGiven,
    /// A non-option token appeared without `allow_remainder`.
    RemainderNotAllowed,
}

/// The first violation found during a parse.
///
/// # Examples
///
/// ```
/// use option_parser_core::{ParseError, ParseErrorKind};
///
/// let err = ParseError::ValueGiven("time".to_string());
/// assert_eq!(err.kind(), ParseErrorKind::ValueGiven);
/// assert_eq!(err.context(), "time");
/// assert_eq!(err.to_string(), "Cannot set option: time");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", content = "context")]
pub enum ParseError {
    /// A long name matched no option.
    #[error("Encountered invalid option: {0}")]
    InvalidName(String),
    /// An alias matched no option.
    #[error("Encountered invalid option alias: {0}")]
    InvalidAlias(String),
    /// Text followed a matched name without `=`.
    #[error("Encountered invalid token in option: {0}")]
    InvalidNameToken(String),
    /// A non-alphanumeric character appeared in an alias run.
    #[error("Encountered invalid token in alias list: {0}")]
    InvalidAliasToken(String),
    /// An option was seen twice without `duplicates_allowed`.
    #[error("Encountered an invalid duplicate option: {0}")]
    Duplicate(String),
    /// A required option was never seen.
    #[error("Missing required option: {0}")]
    RequiredMissing(String),
    /// Nothing followed the `=` sign.
    #[error("Missing value after equals sign for option: {0}")]
    ValueInvalid(String),
    /// An option requiring a value was given none.
    #[error("Expected value for option: {0}")]
    ValueMissing(String),
    /// An option forbidding a value was given one.
    #[error("Cannot set option: {0}")]
    ValueGiven(String),
    /// A non-option token appeared without `allow_remainder`.
    #[error("Cannot accept non-option value: {0}")]
    RemainderNotAllowed(String),
}

impl ParseError {
    /// Builds an error of the given kind.
    pub fn new(kind: ParseErrorKind, context: impl Into<String>) -> Self {
        let context = context.into();
        match kind {
            ParseErrorKind::InvalidName => Self::InvalidName(context),
            ParseErrorKind::InvalidAlias => Self::InvalidAlias(context),
            ParseErrorKind::InvalidNameToken => Self::InvalidNameToken(context),
            ParseErrorKind::InvalidAliasToken => Self::InvalidAliasToken(context),
            ParseErrorKind::Duplicate => Self::Duplicate(context),
            ParseErrorKind::RequiredMissing => Self::RequiredMissing(context),
            ParseErrorKind::ValueInvalid => Self::ValueInvalid(context),
            ParseErrorKind::ValueMissing => Self::ValueMissing(context),
            ParseErrorKind::ValueGiven => Self::ValueGiven(context),
            ParseErrorKind::RemainderNotAllowed => Self::RemainderNotAllowed(context),
        }
    }

    /// Returns the error's kind.
    pub fn kind(&self) -> ParseErrorKind {
        match self {
            Self::InvalidName(_) => ParseErrorKind::InvalidName,
            Self::InvalidAlias(_) => ParseErrorKind::InvalidAlias,
            Self::InvalidNameToken(_) => ParseErrorKind::InvalidNameToken,
            Self::InvalidAliasToken(_) => ParseErrorKind::InvalidAliasToken,
            Self::Duplicate(_) => ParseErrorKind::Duplicate,
            Self::RequiredMissing(_) => ParseErrorKind::RequiredMissing,
            Self::ValueInvalid(_) => ParseErrorKind::ValueInvalid,
            Self::ValueMissing(_) => ParseErrorKind::ValueMissing,
            Self::ValueGiven(_) => ParseErrorKind::ValueGiven,
            Self::RemainderNotAllowed(_) => ParseErrorKind::RemainderNotAllowed,
        }
    }

    /// Returns the offending identifier.
    pub fn context(&self) -> &str {
        match self {
            Self::InvalidName(context)
            | Self::InvalidAlias(context)
            | Self::InvalidNameToken(context)
            | Self::InvalidAliasToken(context)
            | Self::Duplicate(context)
            | Self::RequiredMissing(context)
            | Self::ValueInvalid(context)
            | Self::ValueMissing(context)
            | Self::ValueGiven(context)
            | Self::RemainderNotAllowed(context) => context,
        }
    }
}

/// Returned by [`ParseOutcome::remainder`](crate::ParseOutcome::remainder)
/// when the registry was built without `allow_remainder`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("remainder is not available: registry does not allow non-option values")]
pub struct RemainderUnavailable;

/// Joins a sub-option identifier with its parent's name.
pub(crate) fn qualify(parent: Option<&str>, name: &str) -> String {
    match parent {
        Some(parent) => format!("{parent}.{name}"),
        None => name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trips_through_new() {
        let err = ParseError::new(ParseErrorKind::RequiredMissing, "sub.animal");
        assert_eq!(err.kind(), ParseErrorKind::RequiredMissing);
        assert_eq!(err.context(), "sub.animal");
        assert_eq!(err.to_string(), "Missing required option: sub.animal");
    }

    #[test]
    fn test_messages_follow_templates() {
        assert_eq!(
            ParseError::InvalidAliasToken("-a+".into()).to_string(),
            "Encountered invalid token in alias list: -a+"
        );
        assert_eq!(
            ParseError::ValueInvalid("any".into()).to_string(),
            "Missing value after equals sign for option: any"
        );
        assert_eq!(
            ParseError::RemainderNotAllowed("moo".into()).to_string(),
            "Cannot accept non-option value: moo"
        );
    }

    #[test]
    fn test_serializes_kind_and_context() {
        let json = serde_json::to_value(ParseError::Duplicate("any".into())).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "Duplicate", "context": "any"}));
    }

    #[test]
    fn test_qualify() {
        assert_eq!(qualify(Some("sub"), "animal"), "sub.animal");
        assert_eq!(qualify(None, "any"), "any");
    }
}
