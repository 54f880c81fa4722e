//! A parser described entirely as data.
//!
//! [`StaticParser`] implements [`ParserHandle`] from plain fields, so a
//! command-line interface can be documented from a YAML or JSON
//! description without linking the real program. Help output follows the
//! argparse layout: usage line, description, option groups, epilog.

use serde::{Deserialize, Serialize};

use crate::handle::{Action, HelpView, ParserHandle};
use crate::types::OptionSpec;

/// Width of the flag column in generated help.
const FLAG_COLUMN: usize = 24;

/// Sub-command registration inside a [`StaticAction`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticChoice {
    /// Name the sub-command is registered under
    pub name: String,
    /// The nested parser
    pub parser: StaticParser,
}

/// Serializable form of an [`Action`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticAction {
    /// Destination name
    pub dest: String,
    /// Sub-commands dispatched by this action
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub choices: Option<Vec<StaticChoice>>,
}

/// Data-backed parser.
///
/// # Examples
///
/// ```
/// use command_docs_core::{HelpView, OptionSpec, ParserHandle, StaticParser};
///
/// let create = StaticParser::new("create", "borg create")
///     .with_usage("[-h] ARCHIVE")
///     .with_epilog("Long text")
///     .with_option(OptionSpec::new(["-h", "--help"]).with_help("show this help message and exit"));
///
/// let help = create.format_help(HelpView::WITHOUT_EPILOG);
/// assert!(help.starts_with("usage: borg create [-h] ARCHIVE"));
/// assert!(!help.contains("Long text"));
/// assert_eq!(create.format_usage(HelpView::SYNOPSIS), "usage:  [-h] ARCHIVE\n");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticParser {
    /// Parser name
    pub name: String,
    /// Program label shown in usage lines
    pub prog: String,
    /// Short description
    #[serde(default)]
    pub description: Option<String>,
    /// Text printed after the options
    #[serde(default)]
    pub epilog: Option<String>,
    /// Usage line after the program label
    #[serde(default)]
    pub usage: String,
    /// Options and positional arguments
    #[serde(default)]
    pub options: Vec<OptionSpec>,
    /// Registered actions
    #[serde(default)]
    pub actions: Vec<StaticAction>,
}

impl StaticParser {
    /// Creates a parser with a name and program label.
    pub fn new(name: &str, prog: &str) -> Self {
        Self {
            name: name.to_string(),
            prog: prog.to_string(),
            ..Default::default()
        }
    }

    /// Sets the description.
    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    /// Sets the epilog.
    pub fn with_epilog(mut self, epilog: &str) -> Self {
        self.epilog = Some(epilog.to_string());
        self
    }

    /// Sets the usage line (without the program label).
    pub fn with_usage(mut self, usage: &str) -> Self {
        self.usage = usage.to_string();
        self
    }

    /// Appends an option.
    pub fn with_option(mut self, option: OptionSpec) -> Self {
        self.options.push(option);
        self
    }

    /// Appends an action.
    pub fn with_action(mut self, action: Action<StaticParser>) -> Self {
        self.actions.push(StaticAction {
            dest: action.dest,
            choices: action.choices.map(|choices| {
                choices
                    .into_iter()
                    .map(|(name, parser)| StaticChoice { name, parser })
                    .collect()
            }),
        });
        self
    }

    /// Appends an action that registers `parsers` under their own names.
    pub fn with_commands(self, dest: &str, parsers: Vec<StaticParser>) -> Self {
        let choices = parsers.into_iter().map(|p| (p.name.clone(), p)).collect();
        self.with_action(Action::with_choices(dest, choices))
    }

    fn usage_line(&self, view: HelpView) -> String {
        let label = if view.program { self.prog.as_str() } else { "" };
        format!("usage: {label} {}", self.usage)
    }
}

impl ParserHandle for StaticParser {
    fn name(&self) -> String {
        self.name.clone()
    }

    fn prog(&self) -> String {
        self.prog.clone()
    }

    fn description(&self) -> Option<String> {
        self.description.clone()
    }

    fn epilog(&self) -> Option<String> {
        self.epilog.clone()
    }

    fn format_help(&self, view: HelpView) -> String {
        let mut out = self.usage_line(view).trim_end().to_string();
        out.push('\n');

        if let Some(description) = &self.description {
            out.push('\n');
            out.push_str(description.trim_end());
            out.push('\n');
        }

        let mut current: Option<Option<&str>> = None;
        for option in &self.options {
            let heading = option.heading.as_deref();
            if current != Some(heading) {
                out.push('\n');
                if let Some(heading) = heading {
                    out.push_str(&format!("{heading}:\n"));
                }
                current = Some(heading);
            }
            let flags = option.flags.join(", ");
            match &option.help {
                Some(help) if flags.len() + 2 < FLAG_COLUMN => {
                    out.push_str(&format!("  {flags:<width$}{help}\n", width = FLAG_COLUMN - 2));
                }
                Some(help) => {
                    out.push_str(&format!("  {flags}\n{:indent$}{help}\n", "", indent = FLAG_COLUMN));
                }
                None => out.push_str(&format!("  {flags}\n")),
            }
        }

        if view.epilog {
            if let Some(epilog) = &self.epilog {
                out.push('\n');
                out.push_str(epilog.trim_end());
                out.push('\n');
            }
        }
        out
    }

    fn format_usage(&self, view: HelpView) -> String {
        format!("{}\n", self.usage_line(view))
    }

    fn options(&self) -> Vec<OptionSpec> {
        self.options.clone()
    }

    fn actions(&self) -> Vec<Action<Self>> {
        self.actions
            .iter()
            .map(|action| Action {
                dest: action.dest.clone(),
                choices: action.choices.as_ref().map(|choices| {
                    choices
                        .iter()
                        .map(|choice| (choice.name.clone(), choice.parser.clone()))
                        .collect()
                }),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_help_groups_options() {
        let parser = StaticParser::new("create", "borg create")
            .with_usage("[-h] ARCHIVE")
            .with_description("Create new archive")
            .with_option(OptionSpec::new(["ARCHIVE"]).with_heading("positional arguments").with_help("archive name"))
            .with_option(
                OptionSpec::new(["-h", "--help"])
                    .with_heading("optional arguments")
                    .with_help("show this help message and exit"),
            )
            .with_epilog("Create new archive\nMore text");

        let help = parser.format_help(HelpView::FULL);
        let expected = "\
usage: borg create [-h] ARCHIVE

Create new archive

positional arguments:
  ARCHIVE               archive name

optional arguments:
  -h, --help            show this help message and exit

Create new archive
More text
";
        assert_eq!(help, expected);
    }

    #[test]
    fn test_long_flags_wrap_help() {
        let parser = StaticParser::new("x", "x").with_option(
            OptionSpec::new(["--a-very-long-option-name"]).with_help("does things"),
        );
        let help = parser.format_help(HelpView::FULL);
        assert!(help.contains("  --a-very-long-option-name\n                        does things\n"));
    }

    #[test]
    fn test_usage_without_program() {
        let parser = StaticParser::new("x", "prog x").with_usage("[-h]");
        assert_eq!(parser.format_usage(HelpView::FULL), "usage: prog x [-h]\n");
        assert_eq!(parser.format_usage(HelpView::SYNOPSIS), "usage:  [-h]\n");
    }

    #[test]
    fn test_deserialize_from_yaml() {
        let yaml = r#"
name: borg
prog: borg
actions:
  - dest: command
    choices:
      - name: create
        parser:
          name: create
          prog: borg create
          description: Create new archive
          options:
            - flags: ["-s", "--stats"]
              help: print statistics
              heading: null
"#;
        let parser: StaticParser = serde_yaml::from_str(yaml).unwrap();
        let actions = parser.actions();
        assert_eq!(actions.len(), 1);
        let choices = actions[0].choices.as_ref().unwrap();
        assert_eq!(choices[0].0, "create");
        assert_eq!(choices[0].1.options[0].flags, vec!["-s", "--stats"]);
    }
}
