//! The parse driver.
//!
//! One pass walks the argument vector with a single [`Cursor`], starting at
//! index 1 (index 0 is the program name). Each token is classified, resolved,
//! checked against the encounter tracker and its value policy, and handed to
//! the registry's handler. An option owning a sub-registry then consumes the
//! following tokens through the same cursor. The first error ends the pass;
//! otherwise required options are verified once the input is exhausted.

use tracing::debug;

use crate::error::ParseError;
use crate::outcome::ParseOutcome;
use crate::registry::Registry;
use crate::resolve::{Miss, find_by_alias, resolve_name};
use crate::sub_options::consume_group;
use crate::token::{TokenKind, classify, name_segment};
use crate::tracker::EncounterTracker;
use crate::types::{Definition, OptionDef, OptionEvent};
use crate::value::extract_value;

/// Position in the argument vector, shared by the driver and the sub-option
/// consumer.
#[derive(Debug)]
pub(crate) struct Cursor<'a, S> {
    args: &'a [S],
    position: usize,
}

impl<'a, S: AsRef<str>> Cursor<'a, S> {
    pub(crate) fn new(args: &'a [S]) -> Self {
        Self { args, position: 1 }
    }

    /// The token under the cursor.
    pub(crate) fn current(&self) -> Option<&'a str> {
        self.args.get(self.position).map(|arg| arg.as_ref())
    }

    /// The token after the cursor.
    pub(crate) fn peek(&self) -> Option<&'a str> {
        self.args.get(self.position + 1).map(|arg| arg.as_ref())
    }

    pub(crate) fn advance(&mut self) {
        self.position += 1;
    }

    pub(crate) fn position(&self) -> usize {
        self.position
    }
}

impl Registry {
    /// Parses an argument vector against this registry.
    ///
    /// `args[0]` is taken to be the program name and skipped. Handlers are
    /// invoked synchronously, in token order, for every recognized option and
    /// sub-option. Parsing never mutates the registry, so the same registry
    /// can be parsed against any number of times, including concurrently.
    ///
    /// # Examples
    ///
    /// ```
    /// use option_parser_core::{OptionFlags, ParseErrorKind, ParserFlags, Registry};
    ///
    /// let mut registry = Registry::new(ParserFlags::new());
    /// registry.add_option("name", Some('n'), OptionFlags::new().require_value(), "").unwrap();
    /// registry.add_option("time", Some('t'), OptionFlags::new().forbid_value(), "").unwrap();
    ///
    /// assert!(registry.parse(&["prog", "--name=Moo", "-t"]).is_success());
    ///
    /// let outcome = registry.parse(&["prog", "--time=value"]);
    /// assert_eq!(outcome.error_kind(), Some(ParseErrorKind::ValueGiven));
    /// assert_eq!(outcome.error_context(), Some("time"));
    /// ```
    pub fn parse<'a, S: AsRef<str>>(&self, args: &'a [S]) -> ParseOutcome<'a> {
        let mut session = ParseSession {
            registry: self,
            tracker: EncounterTracker::new(self.options().len()),
            remainder: Vec::new(),
            options_parsed: 0,
        };
        let mut cursor = Cursor::new(args);
        let result = session.run(&mut cursor);

        let ParseSession {
            tracker,
            remainder,
            options_parsed,
            ..
        } = session;
        let error = match result {
            Err(err) => Some(err),
            Ok(()) => tracker
                .finish(self.options())
                .map(|missing| ParseError::RequiredMissing(missing.name().to_string())),
        };

        match &error {
            Some(err) => debug!(error = %err, options_parsed, "parse failed"),
            None => debug!(options_parsed, remainder = remainder.len(), "parse succeeded"),
        }

        ParseOutcome::new(
            error,
            options_parsed,
            self.flags().allow_remainder.then_some(remainder),
        )
    }
}

/// State for one pass over the top-level registry.
struct ParseSession<'r, 'a> {
    registry: &'r Registry,
    tracker: EncounterTracker,
    remainder: Vec<&'a str>,
    options_parsed: usize,
}

impl<'r, 'a> ParseSession<'r, 'a> {
    fn run<S: AsRef<str>>(&mut self, cursor: &mut Cursor<'a, S>) -> Result<(), ParseError> {
        while let Some(token) = cursor.current() {
            self.parse_token(token, cursor)?;
            cursor.advance();
        }
        Ok(())
    }

    fn parse_token<S: AsRef<str>>(
        &mut self,
        token: &'a str,
        cursor: &mut Cursor<'a, S>,
    ) -> Result<(), ParseError> {
        let flags = self.registry.flags();
        let kind = classify(token, flags);
        debug!(token, kind = ?kind, position = cursor.position(), "dispatching token");

        match kind {
            TokenKind::LongName(text) => self.parse_long_name(text, cursor),
            TokenKind::AliasRun(run) => self.parse_alias_run(token, run, cursor),
            TokenKind::Value if flags.allow_remainder => {
                self.remainder.push(token);
                Ok(())
            }
            TokenKind::Value => Err(ParseError::RemainderNotAllowed(token.to_string())),
        }
    }

    fn parse_long_name<S: AsRef<str>>(
        &mut self,
        text: &'a str,
        cursor: &mut Cursor<'a, S>,
    ) -> Result<(), ParseError> {
        let registry = self.registry;
        let resolved = match resolve_name(
            registry.options(),
            text,
            registry.flags().always_check_alias,
        ) {
            Ok(resolved) => resolved,
            Err(Miss::Name) => {
                return Err(ParseError::InvalidName(name_segment(text).to_string()));
            }
            Err(Miss::Alias(alias)) => return Err(ParseError::InvalidAlias(alias.to_string())),
        };

        let option = resolved.def;
        if !self.tracker.encounter(resolved.index, option) {
            return Err(ParseError::Duplicate(option.name().to_string()));
        }
        let value = extract_value(option.flags(), resolved.tail)
            .map_err(|fault| fault.into_error(option.name().to_string(), text.to_string()))?;

        self.recognize(option, value, cursor)
    }

    fn parse_alias_run<S: AsRef<str>>(
        &mut self,
        token: &'a str,
        run: &'a str,
        cursor: &mut Cursor<'a, S>,
    ) -> Result<(), ParseError> {
        let registry = self.registry;
        let settable = registry.flags().settable_flags;

        for (offset, alias) in run.char_indices() {
            if !alias.is_ascii_alphanumeric() {
                return Err(ParseError::InvalidAliasToken(token.to_string()));
            }
            let Some((index, option)) = find_by_alias(registry.options(), alias) else {
                return Err(ParseError::InvalidAlias(alias.to_string()));
            };
            if !self.tracker.encounter(index, option) {
                return Err(ParseError::Duplicate(option.name().to_string()));
            }

            // `=` is only honored directly after the first alias of the run.
            let rest = &run[offset + alias.len_utf8()..];
            if offset == 0 && settable && rest.starts_with('=') {
                let value = extract_value(option.flags(), rest)
                    .map_err(|fault| fault.into_error(option.name().to_string(), token.to_string()))?;
                return self.recognize(option, value, cursor);
            }

            if option.flags().value_required {
                return Err(ParseError::ValueMissing(option.name().to_string()));
            }
            self.recognize(option, None, cursor)?;
        }

        Ok(())
    }

    /// Delivers a recognized option to the handler, then runs its sub-option
    /// group if it has one.
    fn recognize<S: AsRef<str>>(
        &mut self,
        option: &'r OptionDef,
        value: Option<&'a str>,
        cursor: &mut Cursor<'a, S>,
    ) -> Result<(), ParseError> {
        self.registry.notify(&OptionEvent {
            name: option.name(),
            alias: option.alias(),
            value,
            parent: None,
        });
        self.options_parsed += 1;

        match option.sub_options() {
            Some(sub_options) => {
                consume_group(sub_options, option.name(), cursor, &mut self.options_parsed)
            }
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::{EventRecord, OptionFlags, ParseErrorKind, ParserFlags, SubRegistry};

    fn recording_registry(flags: ParserFlags) -> (Registry, Arc<Mutex<Vec<EventRecord>>>) {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&events);
        let registry =
            Registry::new(flags).with_handler(move |event| sink.lock().unwrap().push(event.to_record()));
        (registry, events)
    }

    #[test]
    fn test_cursor_skips_program_name() {
        let args = ["prog", "a", "b"];
        let mut cursor = Cursor::new(&args[..]);
        assert_eq!(cursor.current(), Some("a"));
        assert_eq!(cursor.peek(), Some("b"));
        cursor.advance();
        assert_eq!(cursor.current(), Some("b"));
        assert_eq!(cursor.peek(), None);
    }

    #[test]
    fn test_empty_argument_vector() {
        let registry = Registry::new(ParserFlags::new());
        let args: [&str; 0] = [];
        let outcome = registry.parse(&args);
        assert!(outcome.is_success());
        assert_eq!(outcome.options_parsed(), 0);
    }

    #[test]
    fn test_alias_run_invokes_handler_per_character() {
        let (mut registry, events) = recording_registry(ParserFlags::new());
        registry.add_option("time", Some('t'), OptionFlags::new(), "").unwrap();
        registry.add_option("date", Some('d'), OptionFlags::new(), "").unwrap();

        let outcome = registry.parse(&["prog", "-td"]);
        assert!(outcome.is_success());
        assert_eq!(outcome.options_parsed(), 2);
        let names: Vec<String> = events.lock().unwrap().iter().map(|e| e.name.clone()).collect();
        assert_eq!(names, vec!["time", "date"]);
    }

    #[test]
    fn test_alias_run_value_required() {
        let (mut registry, _) = recording_registry(ParserFlags::new());
        registry
            .add_option("echo", Some('e'), OptionFlags::new().require_value(), "")
            .unwrap();

        let outcome = registry.parse(&["prog", "-e"]);
        assert_eq!(outcome.error(), Some(&ParseError::ValueMissing("echo".into())));
    }

    #[test]
    fn test_settable_flag_first_character_only() {
        let (mut registry, events) = recording_registry(ParserFlags::new().with_settable_flags());
        registry
            .add_option("echo", Some('e'), OptionFlags::new().require_value(), "")
            .unwrap();
        registry.add_option("time", Some('t'), OptionFlags::new(), "").unwrap();

        let outcome = registry.parse(&["prog", "-e=hello"]);
        assert!(outcome.is_success());
        assert_eq!(events.lock().unwrap()[0].value.as_deref(), Some("hello"));

        let outcome = registry.parse(&["prog", "-te=hello"]);
        assert_eq!(outcome.error_kind(), Some(ParseErrorKind::ValueMissing));
    }

    #[test]
    fn test_settable_flag_stops_run() {
        let (mut registry, events) = recording_registry(ParserFlags::new().with_settable_flags());
        registry.add_option("any", Some('a'), OptionFlags::new(), "").unwrap();

        let outcome = registry.parse(&["prog", "-a=tb"]);
        assert!(outcome.is_success());
        assert_eq!(outcome.options_parsed(), 1);
        assert_eq!(events.lock().unwrap()[0].value.as_deref(), Some("tb"));
    }

    #[test]
    fn test_settable_flag_value_rules() {
        let (mut registry, _) = recording_registry(ParserFlags::new().with_settable_flags());
        registry.add_option("any", Some('a'), OptionFlags::new(), "").unwrap();
        registry
            .add_option("time", Some('t'), OptionFlags::new().forbid_value(), "")
            .unwrap();

        assert_eq!(
            registry.parse(&["prog", "-a="]).error(),
            Some(&ParseError::ValueInvalid("any".into()))
        );
        assert_eq!(
            registry.parse(&["prog", "-t=now"]).error(),
            Some(&ParseError::ValueGiven("time".into()))
        );
    }

    #[test]
    fn test_equals_in_run_without_settable_flags() {
        let (mut registry, _) = recording_registry(ParserFlags::new());
        registry.add_option("any", Some('a'), OptionFlags::new(), "").unwrap();

        assert_eq!(
            registry.parse(&["prog", "-a=x"]).error(),
            Some(&ParseError::InvalidAliasToken("-a=x".into()))
        );
    }

    #[test]
    fn test_duplicate_within_alias_run() {
        let (mut registry, _) = recording_registry(ParserFlags::new());
        registry.add_option("any", Some('a'), OptionFlags::new(), "").unwrap();

        assert_eq!(
            registry.parse(&["prog", "-aa"]).error(),
            Some(&ParseError::Duplicate("any".into()))
        );
    }

    #[test]
    fn test_trailing_text_after_name() {
        let (mut registry, _) = recording_registry(ParserFlags::new());
        registry.add_option("time", Some('t'), OptionFlags::new(), "").unwrap();

        assert_eq!(
            registry.parse(&["prog", "--timeout"]).error(),
            Some(&ParseError::InvalidNameToken("timeout".into()))
        );
    }

    #[test]
    fn test_alias_fallback_miss_reports_alias() {
        let (mut registry, _) = recording_registry(ParserFlags::new().with_alias_fallback());
        registry.add_option("time", Some('t'), OptionFlags::new(), "").unwrap();

        assert_eq!(
            registry.parse(&["prog", "/x"]).error(),
            Some(&ParseError::InvalidAlias("x".into()))
        );
        assert_eq!(
            registry.parse(&["prog", "--nope=1"]).error(),
            Some(&ParseError::InvalidName("nope".into()))
        );
    }

    #[test]
    fn test_sub_group_entered_from_alias_run() {
        let (mut registry, events) = recording_registry(ParserFlags::new());
        registry.add_option("time", Some('t'), OptionFlags::new(), "").unwrap();
        let sink = Arc::clone(&events);
        registry
            .add_option("props", Some('p'), OptionFlags::new(), "")
            .unwrap()
            .attach_sub_options(
                SubRegistry::new(ParserFlags::new())
                    .with_handler(move |event| sink.lock().unwrap().push(event.to_record())),
            )
            .unwrap()
            .add_option("config", Some('c'), OptionFlags::new().require_value(), "")
            .unwrap();

        let outcome = registry.parse(&["prog", "-pt", "config=a.toml"]);
        assert!(outcome.is_success());
        let names: Vec<String> = events
            .lock()
            .unwrap()
            .iter()
            .map(|e| e.name.clone())
            .collect();
        assert_eq!(names, vec!["props", "config", "time"]);
    }
}
