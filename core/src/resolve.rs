//! Name and alias lookup against a definition list.
//!
//! Lookups scan in registration order and return the first structural
//! match. A stored name matches when the token text begins with the whole
//! stored name; whatever follows it is returned as the tail for value
//! extraction.

use tracing::trace;

use crate::token::name_segment;
use crate::types::Definition;

/// A resolved definition and the unconsumed rest of the token.
#[derive(Debug)]
pub(crate) struct Resolved<'d, 't, D> {
    pub index: usize,
    pub def: &'d D,
    pub tail: &'t str,
}

/// Why a long-name lookup failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Miss {
    /// No stored name is a prefix of the text.
    Name,
    /// The alias retry for a one-character name also failed.
    Alias(char),
}

/// Finds the first definition whose alias is `alias`.
pub(crate) fn find_by_alias<D: Definition>(defs: &[D], alias: char) -> Option<(usize, &D)> {
    defs.iter()
        .enumerate()
        .find(|(_, def)| def.alias() == Some(alias))
}

/// Resolves long-form text (the token after its `--`, `/`, or `-` prefix).
///
/// With `alias_fallback`, a one-character name segment that matches no name
/// is retried as an alias.
pub(crate) fn resolve_name<'d, 't, D: Definition>(
    defs: &'d [D],
    text: &'t str,
    alias_fallback: bool,
) -> Result<Resolved<'d, 't, D>, Miss> {
    let by_name = defs
        .iter()
        .enumerate()
        .find(|(_, def)| text.starts_with(def.name()));
    if let Some((index, def)) = by_name {
        trace!(name = def.name(), "resolved by name");
        return Ok(Resolved {
            index,
            def,
            tail: &text[def.name().len()..],
        });
    }

    let segment = name_segment(text);
    let mut chars = segment.chars();
    match (chars.next(), chars.next()) {
        (Some(alias), None) if alias_fallback => match find_by_alias(defs, alias) {
            Some((index, def)) => {
                trace!(alias = %alias, name = def.name(), "resolved by alias fallback");
                Ok(Resolved {
                    index,
                    def,
                    tail: &text[alias.len_utf8()..],
                })
            }
            None => Err(Miss::Alias(alias)),
        },
        _ => Err(Miss::Name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{OptionFlags, ParserFlags, Registry};

    fn registry() -> Registry {
        let mut registry = Registry::new(ParserFlags::new());
        registry
            .add_option("name", Some('n'), OptionFlags::new(), "")
            .unwrap();
        registry
            .add_option("time", Some('t'), OptionFlags::new(), "")
            .unwrap();
        registry
            .add_option("timeout", Some('o'), OptionFlags::new(), "")
            .unwrap();
        registry
    }

    #[test]
    fn test_resolve_name_returns_tail() {
        let registry = registry();
        let resolved = resolve_name(registry.options(), "name=Moo", false).unwrap();
        assert_eq!(resolved.index, 0);
        assert_eq!(resolved.tail, "=Moo");
    }

    #[test]
    fn test_resolve_name_first_registered_wins() {
        let registry = registry();
        let resolved = resolve_name(registry.options(), "timeout", false).unwrap();
        assert_eq!(resolved.def.name(), "time");
        assert_eq!(resolved.tail, "out");
    }

    #[test]
    fn test_resolve_name_is_case_sensitive() {
        let registry = registry();
        assert_eq!(
            resolve_name(registry.options(), "NAME", false).unwrap_err(),
            Miss::Name
        );
    }

    #[test]
    fn test_alias_fallback_only_for_single_character() {
        let registry = registry();
        let resolved = resolve_name(registry.options(), "t", true).unwrap();
        assert_eq!(resolved.def.name(), "time");
        assert_eq!(resolved.tail, "");

        let resolved = resolve_name(registry.options(), "n=Moo", true).unwrap();
        assert_eq!(resolved.def.name(), "name");
        assert_eq!(resolved.tail, "=Moo");

        assert_eq!(
            resolve_name(registry.options(), "t", false).unwrap_err(),
            Miss::Name
        );
        assert_eq!(
            resolve_name(registry.options(), "x", true).unwrap_err(),
            Miss::Alias('x')
        );
        assert_eq!(
            resolve_name(registry.options(), "xy", true).unwrap_err(),
            Miss::Name
        );
    }

    #[test]
    fn test_find_by_alias() {
        let registry = registry();
        assert_eq!(find_by_alias(registry.options(), 'o').map(|(i, _)| i), Some(2));
        assert!(find_by_alias(registry.options(), 'z').is_none());
    }
}
