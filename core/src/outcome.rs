//! The result of one parse pass.

use crate::error::{ParseError, ParseErrorKind, RemainderUnavailable};

/// Outcome of [`Registry::parse`](crate::Registry::parse).
///
/// Created fresh per call. Remainder tokens are borrowed from the argument
/// vector that was parsed.
///
/// # Examples
///
/// ```
/// use option_parser_core::{OptionFlags, ParserFlags, Registry};
///
/// let mut registry = Registry::new(ParserFlags::new().with_remainder());
/// registry.add_option("required", Some('r'), OptionFlags::new().require(), "").unwrap();
///
/// let args = ["prog", "--required", "remaining", "values"];
/// let outcome = registry.parse(&args);
/// assert!(outcome.is_success());
/// assert_eq!(outcome.options_parsed(), 1);
/// assert_eq!(outcome.remainder().unwrap(), &["remaining", "values"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOutcome<'a> {
    error: Option<ParseError>,
    options_parsed: usize,
    remainder: Option<Vec<&'a str>>,
}

impl<'a> ParseOutcome<'a> {
    pub(crate) fn new(
        error: Option<ParseError>,
        options_parsed: usize,
        remainder: Option<Vec<&'a str>>,
    ) -> Self {
        Self {
            error,
            options_parsed,
            remainder,
        }
    }

    /// Returns `true` if no error was reported.
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// Returns the error that stopped the pass.
    pub fn error(&self) -> Option<&ParseError> {
        self.error.as_ref()
    }

    /// Returns the kind of the error that stopped the pass.
    pub fn error_kind(&self) -> Option<ParseErrorKind> {
        self.error.as_ref().map(ParseError::kind)
    }

    /// Returns the identifier the error refers to.
    pub fn error_context(&self) -> Option<&str> {
        self.error.as_ref().map(ParseError::context)
    }

    /// Returns a human-readable message for the error, if any.
    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(ToString::to_string)
    }

    /// Number of options and sub-options recognized before the pass ended.
    pub fn options_parsed(&self) -> usize {
        self.options_parsed
    }

    /// Returns the non-option tokens in encounter order.
    ///
    /// After a failed pass this holds the tokens collected before the
    /// failure.
    ///
    /// # Errors
    ///
    /// Returns [`RemainderUnavailable`] if the registry was built without
    /// `allow_remainder`.
    pub fn remainder(&self) -> Result<&[&'a str], RemainderUnavailable> {
        self.remainder.as_deref().ok_or(RemainderUnavailable)
    }

    /// Converts the outcome into a `Result`, keeping it on success.
    ///
    /// # Errors
    ///
    /// Returns the [`ParseError`] that stopped the pass.
    pub fn into_result(self) -> Result<Self, ParseError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(self),
        }
    }
}
