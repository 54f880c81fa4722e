//! Document model for command-line interface documentation.
//!
//! This module defines the normalized in-memory representation of a
//! program's command hierarchy. The types are designed for serialization
//! with [`serde`] so a tree can be dumped as JSON or YAML for inspection.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Name of the pseudo-command that never gets its own document.
pub const RESERVED_HELP_COMMAND: &str = "help";

/// One option (or positional argument) of a command.
///
/// `flags` holds every synonym spelling of the same option, e.g. `-v` and
/// `--verbose`. Positional arguments carry their value name as their only
/// flag.
///
/// # Examples
///
/// ```
/// use command_docs_core::OptionSpec;
///
/// let verbose = OptionSpec::new(["-v", "--verbose"])
///     .with_help("Enable verbose output")
///     .with_heading("Options");
/// assert_eq!(verbose.canonical_flag(), "--verbose");
/// assert!(verbose.matches("-v"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionSpec {
    /// Synonym flag strings (short/long forms or a positional name)
    pub flags: Vec<String>,
    /// Help text from the parser definition
    pub help: Option<String>,
    /// Option group title; `None` is the implicit root group
    pub heading: Option<String>,
}

impl OptionSpec {
    /// Creates an option from its synonym flag strings.
    pub fn new<I, S>(flags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            flags: flags.into_iter().map(Into::into).collect(),
            help: None,
            heading: None,
        }
    }

    /// Adds help text.
    pub fn with_help(mut self, help: &str) -> Self {
        self.help = Some(help.to_string());
        self
    }

    /// Places the option under a group heading.
    pub fn with_heading(mut self, heading: &str) -> Self {
        self.heading = Some(heading.to_string());
        self
    }

    /// Returns the longest spelling, which is the long form when one exists.
    pub fn canonical_flag(&self) -> &str {
        self.flags
            .iter()
            .max_by_key(|flag| flag.len())
            .map(String::as_str)
            .unwrap_or("unknown")
    }

    /// Checks if `flag` is one of this option's spellings.
    pub fn matches(&self, flag: &str) -> bool {
        self.flags.iter().any(|f| f == flag)
    }

    /// Returns `true` if this entry describes a positional argument.
    pub fn is_positional(&self) -> bool {
        !self.flags.is_empty() && self.flags.iter().all(|f| !f.starts_with('-'))
    }
}

/// One command of the documented program.
///
/// `usage_text` is the parser's own formatted help with the epilog left
/// out, and `synopsis` is the usage line with the program label blanked.
/// Both are treated as opaque pre-formatted text by the renderers.
///
/// # Examples
///
/// ```
/// use command_docs_core::{CommandNode, OptionSpec};
///
/// let node = CommandNode::new("create", "borg create")
///     .with_description("Create new archive")
///     .with_epilog("Create new archive\n\nThis command creates a backup archive.")
///     .with_option(OptionSpec::new(["-s", "--stats"]));
///
/// assert_eq!(node.summary(), Some("Create new archive"));
/// assert_eq!(node.epilog_body(), Some("This command creates a backup archive."));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandNode {
    /// Leaf name of the command, used for file names and headings
    pub name: String,
    /// The command's own program label (e.g. "borg create")
    pub prog: String,
    /// Short description
    pub description: Option<String>,
    /// Long-form text shown after the option listing
    pub epilog: Option<String>,
    /// Formatted help block, epilog excluded
    pub usage_text: String,
    /// Usage line(s) without the program label
    pub synopsis: String,
    /// Options and positional arguments in parser order
    pub options: Vec<OptionSpec>,
    /// Nested commands (e.g. `borg key export`)
    pub subcommands: BTreeMap<String, CommandNode>,
}

impl CommandNode {
    /// Creates an empty node with a leaf name and program label.
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

    /// Sets the formatted help block.
    pub fn with_usage_text(mut self, usage_text: &str) -> Self {
        self.usage_text = usage_text.to_string();
        self
    }

    /// Sets the synopsis line.
    pub fn with_synopsis(mut self, synopsis: &str) -> Self {
        self.synopsis = synopsis.to_string();
        self
    }

    /// Appends an option.
    pub fn with_option(mut self, option: OptionSpec) -> Self {
        self.options.push(option);
        self
    }

    /// Adds a nested command, replacing any previous one with the same name.
    pub fn with_subcommand(mut self, sub: CommandNode) -> Self {
        self.subcommands.insert(sub.name.clone(), sub);
        self
    }

    /// First line of the description.
    pub fn summary(&self) -> Option<&str> {
        self.description
            .as_deref()
            .and_then(|d| d.lines().next())
            .map(str::trim)
            .filter(|line| !line.is_empty())
    }

    /// Epilog without its first line, which restates the summary.
    ///
    /// Returns `None` when there is no epilog or nothing follows the first
    /// line.
    pub fn epilog_body(&self) -> Option<&str> {
        let epilog = self.epilog.as_deref()?;
        let (_, rest) = epilog.split_once('\n')?;
        let rest = rest.trim_matches('\n');
        if rest.trim().is_empty() {
            None
        } else {
            Some(rest)
        }
    }

    /// Returns `true` for the reserved `help` pseudo-command.
    pub fn is_reserved(&self) -> bool {
        self.name == RESERVED_HELP_COMMAND
    }
}

/// Normalized command hierarchy of one program.
///
/// Commands are kept in a [`BTreeMap`], so iteration is sorted by name.
///
/// # Examples
///
/// ```
/// use command_docs_core::{CommandNode, CommandTree};
///
/// let tree = CommandTree::new("borg")
///     .with_command(CommandNode::new("help", "borg help"))
///     .with_command(CommandNode::new("extract", "borg extract"))
///     .with_command(CommandNode::new("create", "borg create"));
///
/// assert_eq!(tree.command_names(), vec!["create", "extract", "help"]);
/// let documented: Vec<String> = tree
///     .documented(false)
///     .into_iter()
///     .map(|(words, _)| words.join(" "))
///     .collect();
/// assert_eq!(documented, vec!["create", "extract"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandTree {
    /// Root program label (e.g. "borg")
    pub prog: String,
    /// The root parser itself
    pub root: CommandNode,
    /// Top-level commands by name
    pub commands: BTreeMap<String, CommandNode>,
}

impl CommandTree {
    /// Creates an empty tree for `prog`.
    pub fn new(prog: &str) -> Self {
        Self {
            prog: prog.to_string(),
            root: CommandNode::new(prog, prog),
            commands: BTreeMap::new(),
        }
    }

    /// Adds a top-level command, replacing any previous one with the same
    /// name.
    pub fn with_command(mut self, node: CommandNode) -> Self {
        self.commands.insert(node.name.clone(), node);
        self
    }

    /// Finds a command by its name path (`["key", "export"]`).
    pub fn find(&self, words: &[&str]) -> Option<&CommandNode> {
        let (first, rest) = words.split_first()?;
        let mut node = self.commands.get(*first)?;
        for word in rest {
            node = node.subcommands.get(*word)?;
        }
        Some(node)
    }

    /// Gets all top-level command names in iteration order.
    pub fn command_names(&self) -> Vec<&str> {
        self.commands.keys().map(String::as_str).collect()
    }

    /// Returns `true` if the tree holds no commands.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Lists every command that gets a document, with its name path.
    ///
    /// The reserved `help` command is skipped at every level. Nested
    /// commands are listed after their parent when `include_nested` is set.
    pub fn documented(&self, include_nested: bool) -> Vec<(Vec<String>, &CommandNode)> {
        let mut out = Vec::new();
        for node in self.commands.values() {
            collect_documented(node, Vec::new(), include_nested, &mut out);
        }
        out
    }
}

fn collect_documented<'a>(
    node: &'a CommandNode,
    mut words: Vec<String>,
    include_nested: bool,
    out: &mut Vec<(Vec<String>, &'a CommandNode)>,
) {
    if node.is_reserved() {
        return;
    }
    words.push(node.name.clone());
    out.push((words.clone(), node));
    if include_nested {
        for sub in node.subcommands.values() {
            collect_documented(sub, words.clone(), include_nested, out);
        }
    }
}

/// A rendered file: relative path plus full body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRecord {
    /// Path relative to the output directory
    pub path: PathBuf,
    /// Complete file contents
    pub content: String,
}

impl DocumentRecord {
    /// Creates a record.
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_spec_canonical_flag() {
        let opt = OptionSpec::new(["-v", "--verbose"]);
        assert_eq!(opt.canonical_flag(), "--verbose");
        assert!(!opt.is_positional());

        let positional = OptionSpec::new(["ARCHIVE"]);
        assert!(positional.is_positional());
        assert_eq!(OptionSpec::new(Vec::<String>::new()).canonical_flag(), "unknown");
    }

    #[test]
    fn test_summary_uses_first_description_line() {
        let node = CommandNode::new("create", "borg create")
            .with_description("make an archive\nmore words");
        assert_eq!(node.summary(), Some("make an archive"));

        let blank = CommandNode::new("create", "borg create").with_description("");
        assert_eq!(blank.summary(), None);
    }

    #[test]
    fn test_epilog_body_drops_first_line() {
        let node = CommandNode::new("create", "borg create")
            .with_epilog("Summary line\nFirst real line\nSecond line\n");
        assert_eq!(node.epilog_body(), Some("First real line\nSecond line"));

        let single = CommandNode::new("create", "borg create").with_epilog("Only a summary");
        assert_eq!(single.epilog_body(), None);

        let none = CommandNode::new("create", "borg create");
        assert_eq!(none.epilog_body(), None);
    }

    #[test]
    fn test_find_nested_command() {
        let tree = CommandTree::new("borg").with_command(
            CommandNode::new("key", "borg key")
                .with_subcommand(CommandNode::new("export", "borg key export")),
        );
        assert_eq!(tree.find(&["key", "export"]).map(|n| n.prog.as_str()), Some("borg key export"));
        assert!(tree.find(&["key", "import"]).is_none());
        assert!(tree.find(&[]).is_none());
    }

    #[test]
    fn test_documented_skips_help_and_recurses_on_request() {
        let tree = CommandTree::new("borg")
            .with_command(CommandNode::new("help", "borg help"))
            .with_command(
                CommandNode::new("key", "borg key")
                    .with_subcommand(CommandNode::new("export", "borg key export"))
                    .with_subcommand(CommandNode::new("help", "borg key help")),
            );

        let flat: Vec<Vec<String>> = tree.documented(false).into_iter().map(|(w, _)| w).collect();
        assert_eq!(flat, vec![vec!["key".to_string()]]);

        let nested: Vec<Vec<String>> = tree.documented(true).into_iter().map(|(w, _)| w).collect();
        assert_eq!(
            nested,
            vec![
                vec!["key".to_string()],
                vec!["key".to_string(), "export".to_string()],
            ]
        );
    }
}
