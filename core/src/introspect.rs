//! Parser introspection.
//!
//! Walks a [`ParserHandle`] and produces the normalized [`CommandTree`].
//! Sub-parsers are collected from every action that carries choices; when
//! two actions register the same command name, the later registration wins.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, info, warn};

use crate::error::{DocError, Result};
use crate::handle::{HelpView, ParserHandle};
use crate::types::{CommandNode, CommandTree};

/// Controls how deep the introspector descends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntrospectOptions {
    /// Number of command levels to capture below the root (1 = top-level
    /// commands only)
    pub max_depth: usize,
}

impl Default for IntrospectOptions {
    fn default() -> Self {
        Self { max_depth: 1 }
    }
}

impl IntrospectOptions {
    /// Captures every level of nested commands.
    pub fn unbounded() -> Self {
        Self {
            max_depth: usize::MAX,
        }
    }
}

/// Builds a [`CommandTree`] from a root parser.
///
/// # Errors
///
/// Returns [`DocError::Introspection`] when the root parser has no name or
/// exposes no action with sub-command choices.
///
/// # Examples
///
/// ```
/// use command_docs_core::{IntrospectOptions, StaticParser, introspect};
///
/// let root = StaticParser::new("borg", "borg")
///     .with_commands("command", vec![
///         StaticParser::new("create", "borg create").with_description("Create new archive"),
///         StaticParser::new("help", "borg help"),
///     ]);
///
/// let tree = introspect(&root, &IntrospectOptions::default()).unwrap();
/// assert_eq!(tree.command_names(), vec!["create", "help"]);
/// assert_eq!(tree.commands["create"].prog, "borg create");
/// ```
pub fn introspect<P: ParserHandle>(root: &P, options: &IntrospectOptions) -> Result<CommandTree> {
    let prog = root.name();
    if prog.trim().is_empty() {
        return Err(DocError::Introspection(
            "root parser has an empty name".to_string(),
        ));
    }

    let choices = collect_choices(root);
    if choices.is_empty() {
        return Err(DocError::Introspection(format!(
            "parser '{prog}' exposes no actions with sub-command choices"
        )));
    }

    let mut tree = CommandTree::new(&prog);
    tree.root = describe(root, &prog, &label_or(root, &prog));
    tree.commands = build_level(choices, &prog, 1, options);

    info!(prog = %prog, commands = ?tree.command_names(), "Found commands");
    Ok(tree)
}

/// Flattens the choices of every action, in registration order.
fn collect_choices<P: ParserHandle>(parser: &P) -> Vec<(String, P)> {
    parser
        .actions()
        .into_iter()
        .filter_map(|action| action.choices)
        .flatten()
        .collect()
}

fn build_level<P: ParserHandle>(
    choices: Vec<(String, P)>,
    parent_prog: &str,
    depth: usize,
    options: &IntrospectOptions,
) -> BTreeMap<String, CommandNode> {
    let mut merged: BTreeMap<String, P> = BTreeMap::new();
    for (name, parser) in choices {
        if name.trim().is_empty() {
            warn!(parent = %parent_prog, "Skipping sub-command with an empty name");
            continue;
        }
        if merged.insert(name.clone(), parser).is_some() {
            debug!(parent = %parent_prog, command = %name, "Duplicate registration, keeping the later one");
        }
    }

    merged
        .into_iter()
        .map(|(name, parser)| {
            let prog = label_or(&parser, &format!("{parent_prog} {name}"));
            let mut node = describe(&parser, &name, &prog);
            if depth < options.max_depth {
                let nested = collect_choices(&parser);
                if !nested.is_empty() {
                    node.subcommands = build_level(nested, &prog, depth + 1, options);
                }
            }
            debug!(command = %prog, options = node.options.len(), "Captured command");
            (name, node)
        })
        .collect()
}

fn describe<P: ParserHandle>(parser: &P, name: &str, prog: &str) -> CommandNode {
    CommandNode {
        name: name.to_string(),
        prog: prog.to_string(),
        description: non_blank(parser.description()),
        epilog: non_blank(parser.epilog()),
        usage_text: normalize_block(&parser.format_help(HelpView::WITHOUT_EPILOG)),
        synopsis: normalize_synopsis(&parser.format_usage(HelpView::SYNOPSIS)),
        options: parser.options(),
        subcommands: BTreeMap::new(),
    }
}

/// The parser's own program label, or `fallback` when it is blank.
fn label_or<P: ParserHandle>(parser: &P, fallback: &str) -> String {
    let label = parser.prog();
    if label.trim().is_empty() {
        fallback.to_string()
    } else {
        label.trim().to_string()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Normalizes captured help text.
///
/// Strips ANSI styling, folds CRLF line endings, trims trailing whitespace
/// from every line and drops trailing blank lines.
pub fn normalize_block(raw: &str) -> String {
    // SAFETY: This regex is a compile-time constant and is validated by tests.
    static ANSI_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r"\x1b\[[0-9;?]*[ -/]*[@-~]").expect("static regex must compile")
    });

    let stripped = ANSI_RE.replace_all(raw, "");
    let replaced = stripped.replace("\r\n", "\n").replace('\r', "\n");

    let mut lines: Vec<&str> = replaced.lines().map(str::trim_end).collect();
    while lines.last().is_some_and(|line| line.is_empty()) {
        lines.pop();
    }
    lines.join("\n")
}

/// Normalizes a usage line for a man page synopsis.
///
/// Removes the leading `usage:` label and the indentation of continuation
/// lines.
pub fn normalize_synopsis(raw: &str) -> String {
    static LABEL_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"(?i)^\s*usage:\s*").expect("static regex must compile"));

    let block = normalize_block(raw);
    let without_label = LABEL_RE.replace(&block, "");
    without_label
        .lines()
        .map(str::trim_start)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
