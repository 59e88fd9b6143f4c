//! Value extraction from the tail of a matched token.

use crate::error::{ParseError, ParseErrorKind};
use crate::types::OptionFlags;

/// A value-policy violation, before it is given context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ValueFault {
    /// No `=` but the definition requires a value.
    Missing,
    /// `=` but the definition forbids a value.
    Given,
    /// `=` followed by nothing.
    Empty,
    /// The name was followed by something other than `=` or the end.
    Token,
}

impl ValueFault {
    /// Converts the fault into a [`ParseError`].
    ///
    /// `name` is the qualified definition name; `token` is the qualified
    /// token text, reported only for [`ValueFault::Token`].
    pub(crate) fn into_error(self, name: String, token: String) -> ParseError {
        match self {
            Self::Missing => ParseError::new(ParseErrorKind::ValueMissing, name),
            Self::Given => ParseError::new(ParseErrorKind::ValueGiven, name),
            Self::Empty => ParseError::new(ParseErrorKind::ValueInvalid, name),
            Self::Token => ParseError::new(ParseErrorKind::InvalidNameToken, token),
        }
    }
}

/// Applies the definition's value policy to the text after its name.
pub(crate) fn extract_value(flags: OptionFlags, tail: &str) -> Result<Option<&str>, ValueFault> {
    if tail.is_empty() {
        return if flags.value_required {
            Err(ValueFault::Missing)
        } else {
            Ok(None)
        };
    }

    match tail.strip_prefix('=') {
        Some(_) if flags.value_forbidden => Err(ValueFault::Given),
        Some("") => Err(ValueFault::Empty),
        Some(value) => Ok(Some(value)),
        None => Err(ValueFault::Token),
    }
}
