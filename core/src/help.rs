//! Help text rendering.
//!
//! Options are listed in registration order, one row each, with their
//! sub-options indented below them. Optional definitions are wrapped in
//! brackets and descriptions are aligned to a shared column.

use crate::registry::Registry;
use crate::types::{Definition, OptionDef, SubOptionDef};

const OPTION_INDENT: &str = "  ";
const SUB_OPTION_INDENT: &str = "      ";
const COLUMN_GAP: &str = "  ";

fn bracket_unless_required(label: String, required: bool) -> String {
    if required {
        label
    } else {
        format!("[{label}]")
    }
}

fn option_label(option: &OptionDef) -> String {
    let label = match option.alias() {
        Some(alias) => format!("--{}|-{alias}", option.name()),
        None => format!("--{}", option.name()),
    };
    bracket_unless_required(label, option.flags().required)
}

fn sub_option_label(sub_option: &SubOptionDef) -> String {
    bracket_unless_required(sub_option.name().to_string(), sub_option.flags().required)
}

fn option_rows(option: &OptionDef) -> Vec<(String, &str)> {
    let mut rows = vec![(
        format!("{OPTION_INDENT}{}", option_label(option)),
        option.description(),
    )];
    if let Some(sub_options) = option.sub_options() {
        rows.extend(sub_options.options().iter().map(|sub_option| {
            (
                format!("{SUB_OPTION_INDENT}{}", sub_option_label(sub_option)),
                sub_option.description(),
            )
        }));
    }
    rows
}

fn render(rows: &[(String, &str)]) -> String {
    let width = rows
        .iter()
        .map(|(left, _)| left.chars().count())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for (left, description) in rows {
        let description = description.trim();
        if description.is_empty() {
            out.push_str(left);
            out.push('\n');
        } else {
            out.push_str(&format!("{left:width$}{COLUMN_GAP}{description}\n"));
        }
    }
    out
}

impl Registry {
    /// Renders help for every option and sub-option.
    ///
    /// # Examples
    ///
    /// ```
    /// use option_parser_core::{OptionFlags, ParserFlags, Registry};
    ///
    /// let mut registry = Registry::new(ParserFlags::new());
    /// registry.add_option("any", Some('a'), OptionFlags::new(), "Any value").unwrap();
    /// registry.add_option("req", Some('r'), OptionFlags::new().require(), "Required").unwrap();
    ///
    /// assert_eq!(
    ///     registry.help(),
    ///     "  [--any|-a]  Any value\n  --req|-r    Required\n"
    /// );
    /// ```
    pub fn help(&self) -> String {
        let rows: Vec<(String, &str)> = self.options().iter().flat_map(option_rows).collect();
        render(&rows)
    }

    /// Renders help for one option and its sub-options.
    ///
    /// Returns `None` if no option has exactly this name.
    pub fn option_help(&self, name: &str) -> Option<String> {
        self.option(name).map(|option| render(&option_rows(option)))
    }

    /// Renders help for one sub-option.
    ///
    /// Returns `None` if the option or sub-option does not exist.
    pub fn sub_option_help(&self, option: &str, sub_option: &str) -> Option<String> {
        let sub_option = self.option(option)?.sub_options()?.option(sub_option)?;
        Some(render(&[(
            format!("{OPTION_INDENT}{}", sub_option_label(sub_option)),
            sub_option.description(),
        )]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{OptionFlags, ParserFlags, SubRegistry};

    fn registry() -> Registry {
        let mut registry = Registry::new(ParserFlags::new());
        registry
            .add_option("time", Some('t'), OptionFlags::new().forbid_value(), "Gets the time.")
            .unwrap();
        registry
            .add_option("quiet", None, OptionFlags::new(), "")
            .unwrap();
        let sub = registry
            .add_option("sub", Some('s'), OptionFlags::new().require(), "Has sub-options.")
            .unwrap()
            .attach_sub_options(SubRegistry::new(ParserFlags::new()))
            .unwrap();
        sub.add_option("animal", Some('a'), OptionFlags::new().require(), "Sets the animal.")
            .unwrap();
        sub.add_option("tree", Some('t'), OptionFlags::new(), "Names a tree.")
            .unwrap();
        registry
    }

    #[test]
    fn test_help_lists_options_and_sub_options() {
        let help = registry().help();
        let lines: Vec<&str> = help.lines().collect();
        assert_eq!(
            lines,
            vec![
                "  [--time|-t]  Gets the time.",
                "  [--quiet]",
                "  --sub|-s     Has sub-options.",
                "      animal   Sets the animal.",
                "      [tree]   Names a tree.",
            ]
        );
    }

    #[test]
    fn test_option_help() {
        let registry = registry();
        assert_eq!(
            registry.option_help("time").as_deref(),
            Some("  [--time|-t]  Gets the time.\n")
        );
        assert!(registry.option_help("sub").unwrap().contains("[tree]"));
        assert_eq!(registry.option_help("nonoption"), None);
    }

    #[test]
    fn test_sub_option_help() {
        let registry = registry();
        assert_eq!(
            registry.sub_option_help("sub", "animal").as_deref(),
            Some("  animal  Sets the animal.\n")
        );
        assert_eq!(registry.sub_option_help("sub", "flora"), None);
        assert_eq!(registry.sub_option_help("what", "fauna"), None);
        assert_eq!(registry.sub_option_help("time", "animal"), None);
    }
}
