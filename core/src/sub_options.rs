//! Sub-option group consumption.
//!
//! After an option that owns a [`SubRegistry`] is recognized, the tokens
//! that follow it are read as bare `name` or `name=value` sub-options. The
//! group ends, without error, at the first token whose name segment is
//! empty or that names no sub-option; that token is left for the driver.

use tracing::debug;

use crate::error::{ParseError, qualify};
use crate::parser::Cursor;
use crate::registry::SubRegistry;
use crate::resolve::resolve_name;
use crate::token::name_segment;
use crate::tracker::EncounterTracker;
use crate::types::{Definition, OptionEvent};
use crate::value::extract_value;

/// Consumes one sub-option group for `parent`, advancing the shared cursor
/// past every token it accepts, then verifies the group's required
/// sub-options.
pub(crate) fn consume_group<'a, S: AsRef<str>>(
    sub_options: &SubRegistry,
    parent: &str,
    cursor: &mut Cursor<'a, S>,
    options_parsed: &mut usize,
) -> Result<(), ParseError> {
    let defs = sub_options.options();
    let alias_fallback = sub_options.flags().always_check_alias;
    let mut tracker = EncounterTracker::new(defs.len());
    debug!(parent, position = cursor.position(), "entering sub-option group");

    while let Some(token) = cursor.peek() {
        if name_segment(token).is_empty() {
            break;
        }
        let Ok(resolved) = resolve_name(defs, token, alias_fallback) else {
            break;
        };
        cursor.advance();

        let option = resolved.def;
        if !tracker.encounter(resolved.index, option) {
            return Err(ParseError::Duplicate(qualify(Some(parent), option.name())));
        }
        let value = extract_value(option.flags(), resolved.tail).map_err(|fault| {
            fault.into_error(
                qualify(Some(parent), option.name()),
                qualify(Some(parent), token),
            )
        })?;

        sub_options.notify(&OptionEvent {
            name: option.name(),
            alias: option.alias(),
            value,
            parent: Some(parent),
        });
        *options_parsed += 1;
    }

    debug!(parent, position = cursor.position(), "leaving sub-option group");
    match tracker.finish(defs) {
        Some(missing) => Err(ParseError::RequiredMissing(qualify(
            Some(parent),
            missing.name(),
        ))),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::{EventRecord, OptionFlags, ParserFlags};

    fn animals(flags: ParserFlags) -> (SubRegistry, Arc<Mutex<Vec<EventRecord>>>) {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        let mut sub = SubRegistry::new(flags)
            .with_handler(move |event| sink.lock().unwrap().push(event.to_record()));
        sub.add_option(
            "animal",
            Some('a'),
            OptionFlags::new().require().require_value(),
            "",
        )
        .unwrap();
        sub.add_option("tree", Some('t'), OptionFlags::new(), "")
            .unwrap();
        (sub, events)
    }

    fn consume(sub: &SubRegistry, args: &[&str]) -> (Result<(), ParseError>, usize, usize) {
        let mut cursor = Cursor::new(args);
        let mut parsed = 0;
        let result = consume_group(sub, "sub", &mut cursor, &mut parsed);
        (result, parsed, cursor.position())
    }

    #[test]
    fn test_group_consumes_until_end_of_input() {
        let (sub, events) = animals(ParserFlags::new());
        let (result, parsed, position) = consume(&sub, &["prog", "--sub", "animal=cow", "tree"]);
        assert_eq!(result, Ok(()));
        assert_eq!(parsed, 2);
        assert_eq!(position, 3);

        let events = events.lock().unwrap();
        assert_eq!(events[0].value.as_deref(), Some("cow"));
        assert_eq!(events[0].parent.as_deref(), Some("sub"));
        assert_eq!(events[1].name, "tree");
        assert_eq!(events[1].value, None);
    }

    #[test]
    fn test_group_stops_at_unknown_token() {
        let (sub, _) = animals(ParserFlags::new());
        let (result, parsed, position) =
            consume(&sub, &["prog", "--sub", "animal=cow", "--other", "tree"]);
        assert_eq!(result, Ok(()));
        assert_eq!(parsed, 1);
        assert_eq!(position, 2);
    }

    #[test]
    fn test_group_stops_at_empty_name_segment() {
        let (sub, _) = animals(ParserFlags::new());
        let (result, _, position) = consume(&sub, &["prog", "--sub", "animal=cow", "=x"]);
        assert_eq!(result, Ok(()));
        assert_eq!(position, 2);
    }

    #[test]
    fn test_group_reports_missing_required() {
        let (sub, _) = animals(ParserFlags::new());
        let (result, _, _) = consume(&sub, &["prog", "--sub", "tree"]);
        assert_eq!(result, Err(ParseError::RequiredMissing("sub.animal".into())));
    }

    #[test]
    fn test_group_errors_are_qualified() {
        let (sub, _) = animals(ParserFlags::new());
        let (result, _, _) = consume(&sub, &["prog", "--sub", "animal"]);
        assert_eq!(result, Err(ParseError::ValueMissing("sub.animal".into())));

        let (result, _, _) = consume(&sub, &["prog", "--sub", "tree", "tree"]);
        assert_eq!(result, Err(ParseError::Duplicate("sub.tree".into())));

        let (result, _, _) = consume(&sub, &["prog", "--sub", "animal=", "tree"]);
        assert_eq!(result, Err(ParseError::ValueInvalid("sub.animal".into())));

        let (result, _, _) = consume(&sub, &["prog", "--sub", "treehouse"]);
        assert_eq!(
            result,
            Err(ParseError::InvalidNameToken("sub.treehouse".into()))
        );
    }

    #[test]
    fn test_group_value_given_is_qualified() {
        let (mut sub, events) = animals(ParserFlags::new());
        sub.add_option("flag", Some('f'), OptionFlags::new().forbid_value(), "")
            .unwrap();

        let (result, parsed, _) = consume(&sub, &["prog", "--sub", "animal=cow", "flag=x"]);
        assert_eq!(result, Err(ParseError::ValueGiven("sub.flag".into())));
        assert_eq!(parsed, 1);
        assert_eq!(events.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_group_alias_fallback() {
        let (sub, events) = animals(ParserFlags::new().with_alias_fallback());
        let (result, _, _) = consume(&sub, &["prog", "--sub", "a=cow", "t"]);
        assert_eq!(result, Ok(()));
        assert_eq!(events.lock().unwrap().len(), 2);
    }
}
