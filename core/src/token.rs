//! Token classification by leading characters.

use crate::types::ParserFlags;

/// How a raw argument is routed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TokenKind<'t> {
    /// `--name`, `/name`, or `-name` with `dash_as_full_option`; holds the
    /// text after the prefix.
    LongName(&'t str),
    /// `-xyz`; holds the characters after the dash.
    AliasRun(&'t str),
    /// Anything else.
    Value,
}

/// Classifies one raw token. Evaluated once per token.
pub(crate) fn classify(token: &str, flags: ParserFlags) -> TokenKind<'_> {
    if let Some(rest) = token.strip_prefix("--") {
        TokenKind::LongName(rest)
    } else if let Some(rest) = token.strip_prefix('-') {
        if flags.dash_as_full_option {
            TokenKind::LongName(rest)
        } else {
            TokenKind::AliasRun(rest)
        }
    } else if let Some(rest) = token.strip_prefix('/') {
        TokenKind::LongName(rest)
    } else {
        TokenKind::Value
    }
}

/// Returns the leading name segment: everything before the first `=` or NUL.
pub(crate) fn name_segment(text: &str) -> &str {
    let end = text.find(['=', '\0']).unwrap_or(text.len());
    &text[..end]
}
