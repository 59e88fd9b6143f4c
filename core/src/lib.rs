//! Declarative command-line option parsing.
//!
//! This crate matches a raw argument vector against a set of registered
//! option definitions:
//!
//! - [`Registry`]: ordered top-level options, a handler, and
//!   [`ParserFlags`] controlling token syntax.
//! - [`OptionDef`] / [`SubOptionDef`]: definitions with a name, an optional
//!   one-character alias, a description, and [`OptionFlags`] policy.
//! - [`SubRegistry`]: sub-options consumed from the tokens that follow
//!   their parent option.
//! - [`ParseOutcome`]: the first [`ParseError`] (if any), the number of
//!   options recognized, and the collected remainder.
//!
//! Recognized tokens:
//!
//! | form | meaning |
//! |---|---|
//! | `--name`, `--name=value` | long name |
//! | `/name`, `/name=value` | long name |
//! | `-abc` | run of aliases `a`, `b`, `c` |
//! | `-a=value` | first alias with a value (`settable_flags`) |
//! | `-name`, `-name=value` | long name (`dash_as_full_option`) |
//! | anything else | remainder (`allow_remainder`) |
//!
//! # Example
//!
//! ```
//! use std::sync::{Arc, Mutex};
//!
//! use option_parser_core::*;
//!
//! let seen = Arc::new(Mutex::new(Vec::new()));
//! let sink = Arc::clone(&seen);
//! let sub_sink = Arc::clone(&seen);
//!
//! let mut registry = Registry::new(ParserFlags::new().with_remainder())
//!     .with_handler(move |event| sink.lock().unwrap().push(event.to_record()));
//! registry
//!     .add_option("required", Some('r'), OptionFlags::new().require(), "A required option")
//!     .unwrap();
//! registry
//!     .add_option("sub", Some('s'), OptionFlags::new(), "An option with sub-options")
//!     .unwrap()
//!     .attach_sub_options(
//!         SubRegistry::new(ParserFlags::new())
//!             .with_handler(move |event| sub_sink.lock().unwrap().push(event.to_record())),
//!     )
//!     .unwrap()
//!     .add_option("animal", Some('a'), OptionFlags::new().require().require_value(), "")
//!     .unwrap();
//!
//! let args = ["prog", "--required", "--sub", "animal=cow", "leftover"];
//! let outcome = registry.parse(&args);
//! assert!(outcome.is_success());
//! assert_eq!(outcome.remainder().unwrap(), &["leftover"]);
//!
//! let seen = seen.lock().unwrap();
//! assert_eq!(seen[2].name, "animal");
//! assert_eq!(seen[2].value.as_deref(), Some("cow"));
//! assert_eq!(seen[2].parent.as_deref(), Some("sub"));
//! ```

mod error;
mod help;
mod outcome;
mod parser;
mod registry;
mod resolve;
mod sub_options;
mod token;
mod tracker;
mod types;
mod value;

pub use error::{ParseError, ParseErrorKind, RegistrationError, RemainderUnavailable};
pub use outcome::ParseOutcome;
pub use registry::{Handler, Registry, SubRegistry};
pub use types::*;
