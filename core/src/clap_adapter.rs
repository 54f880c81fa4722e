//! [`ParserHandle`] implementation for `clap` commands.

use clap::{Arg, Command};

use crate::handle::{Action, HelpView, ParserHandle};
use crate::types::OptionSpec;

/// A `clap::Command` prepared for introspection.
///
/// The root command is built once on construction so every nested command
/// knows its full bin name (`prog create`), which clap uses in usage lines.
///
/// # Examples
///
/// ```
/// use clap::Command;
/// use command_docs_core::{ClapParser, IntrospectOptions, introspect};
///
/// let cmd = Command::new("borg")
///     .subcommand(Command::new("create").about("Create new archive"))
///     .subcommand(Command::new("extract").about("Extract archive contents"));
///
/// let tree = introspect(&ClapParser::new(cmd), &IntrospectOptions::default()).unwrap();
/// assert_eq!(tree.commands["create"].description.as_deref(), Some("Create new archive"));
/// assert!(tree.commands.contains_key("help"));
/// ```
#[derive(Debug, Clone)]
pub struct ClapParser {
    cmd: Command,
    include_aliases: bool,
}

impl ClapParser {
    /// Builds `cmd` and wraps it.
    ///
    /// A command without a bin name uses its own name, so nested labels
    /// read `<root> <sub>`.
    pub fn new(mut cmd: Command) -> Self {
        if cmd.get_bin_name().is_none() {
            let name = cmd.get_name().to_string();
            cmd = cmd.bin_name(name);
        }
        cmd.build();
        Self {
            cmd,
            include_aliases: false,
        }
    }

    /// Also registers visible aliases as sub-command choices.
    pub fn with_aliases(mut self, include: bool) -> Self {
        self.include_aliases = include;
        self
    }

    /// The wrapped command.
    pub fn command(&self) -> &Command {
        &self.cmd
    }

    fn child(&self, cmd: &Command) -> Self {
        Self {
            cmd: cmd.clone(),
            include_aliases: self.include_aliases,
        }
    }

    fn label(&self) -> &str {
        self.cmd.get_bin_name().unwrap_or(self.cmd.get_name())
    }

    fn prepared(&self, view: HelpView) -> Command {
        let cmd = self.cmd.clone();
        if view.epilog {
            cmd
        } else {
            cmd.after_help(None::<&'static str>)
                .after_long_help(None::<&'static str>)
        }
    }

    fn blank_label(&self, rendered: String, view: HelpView) -> String {
        if view.program {
            rendered
        } else {
            rendered.replacen(self.label(), "", 1)
        }
    }
}

impl ParserHandle for ClapParser {
    fn name(&self) -> String {
        self.cmd.get_name().to_string()
    }

    fn prog(&self) -> String {
        self.label().to_string()
    }

    fn description(&self) -> Option<String> {
        self.cmd
            .get_about()
            .or_else(|| self.cmd.get_long_about())
            .map(ToString::to_string)
    }

    fn epilog(&self) -> Option<String> {
        self.cmd
            .get_after_long_help()
            .or_else(|| self.cmd.get_after_help())
            .map(ToString::to_string)
    }

    fn format_help(&self, view: HelpView) -> String {
        let rendered = self.prepared(view).render_help().to_string();
        self.blank_label(rendered, view)
    }

    fn format_usage(&self, view: HelpView) -> String {
        let rendered = self.prepared(view).render_usage().to_string();
        self.blank_label(rendered, view)
    }

    fn options(&self) -> Vec<OptionSpec> {
        self.cmd
            .get_arguments()
            .filter(|arg| !arg.is_hide_set())
            .map(option_spec)
            .collect()
    }

    fn actions(&self) -> Vec<Action<Self>> {
        let mut choices = Vec::new();
        for sub in self.cmd.get_subcommands().filter(|sub| !sub.is_hide_set()) {
            choices.push((sub.get_name().to_string(), self.child(sub)));
            if self.include_aliases {
                for alias in sub.get_visible_aliases() {
                    choices.push((alias.to_string(), self.child(sub)));
                }
            }
        }

        if choices.is_empty() {
            Vec::new()
        } else {
            vec![Action::with_choices("command", choices)]
        }
    }
}

fn option_spec(arg: &Arg) -> OptionSpec {
    let mut flags = Vec::new();
    if arg.is_positional() {
        let value_name = arg
            .get_value_names()
            .and_then(|names| names.first())
            .map(ToString::to_string)
            .unwrap_or_else(|| arg.get_id().as_str().to_uppercase());
        flags.push(value_name);
    } else {
        if let Some(short) = arg.get_short() {
            flags.push(format!("-{short}"));
        }
        for short in arg.get_visible_short_aliases().unwrap_or_default() {
            flags.push(format!("-{short}"));
        }
        if let Some(long) = arg.get_long() {
            flags.push(format!("--{long}"));
        }
        for long in arg.get_visible_aliases().unwrap_or_default() {
            flags.push(format!("--{long}"));
        }
    }

    let default_heading = if arg.is_positional() {
        "Arguments"
    } else {
        "Options"
    };

    OptionSpec {
        flags,
        help: arg
            .get_help()
            .or_else(|| arg.get_long_help())
            .map(ToString::to_string),
        heading: Some(
            arg.get_help_heading()
                .unwrap_or(default_heading)
                .to_string(),
        ),
    }
}
