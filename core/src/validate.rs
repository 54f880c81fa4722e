//! Command tree validation.
//!
//! Catches structural problems that would produce broken documents: command
//! names that cannot be used as file names, options without flags, malformed
//! or duplicated flags.
//!
//! # Examples
//!
//! ```
//! use command_docs_core::*;
//!
//! let tree = CommandTree::new("borg").with_command(
//!     CommandNode::new("create", "borg create")
//!         .with_option(OptionSpec::new(["-s", "--stats"])),
//! );
//! assert!(validate_tree(&tree).is_empty());
//!
//! // Invalid: the same flag twice in one command
//! let bad = CommandTree::new("borg").with_command(
//!     CommandNode::new("create", "borg create")
//!         .with_option(OptionSpec::new(["-s", "--stats"]))
//!         .with_option(OptionSpec::new(["--stats"])),
//! );
//! assert!(!validate_tree(&bad).is_empty());
//! ```

use std::collections::HashSet;

use thiserror::Error;

use crate::{CommandNode, CommandTree};

/// Command tree validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Command name is empty or whitespace-only.
    #[error("command name cannot be empty (under '{0}')")]
    EmptyCommandName(String),
    /// Command name cannot be used in a file name.
    #[error("invalid command name '{name}': {reason}")]
    InvalidCommandName { name: String, reason: &'static str },
    /// An option has no flag strings.
    #[error("option without flags in '{0}'")]
    MissingFlagName(String),
    /// A flag string is malformed (e.g. a lone `-`).
    #[error("invalid flag '{flag}' in '{command}'")]
    InvalidFlag { command: String, flag: String },
    /// Two options of one command share a flag.
    #[error("duplicate flag '{flag}' in '{command}'")]
    DuplicateFlag { command: String, flag: String },
}

/// Explains why `name` cannot be used for a document, if it cannot.
///
/// # Examples
///
/// ```
/// use command_docs_core::command_name_problem;
///
/// assert_eq!(command_name_problem("create"), None);
/// assert!(command_name_problem("../etc").is_some());
/// ```
pub fn command_name_problem(name: &str) -> Option<&'static str> {
    if name.trim().is_empty() {
        Some("name is empty")
    } else if name.contains(['/', '\\']) {
        Some("name contains a path separator")
    } else if name.chars().any(char::is_whitespace) {
        Some("name contains whitespace")
    } else if name.starts_with('.') {
        Some("name starts with a dot")
    } else {
        None
    }
}

/// Validates a command tree, collecting every problem found.
///
/// The root node's options are validated too; nested commands are walked
/// recursively.
pub fn validate_tree(tree: &CommandTree) -> Vec<ValidationError> {
    let mut errors = validate_options(&tree.root);
    for node in tree.commands.values() {
        validate_node(node, &tree.prog, &mut errors);
    }
    errors
}

fn validate_node(node: &CommandNode, parent: &str, errors: &mut Vec<ValidationError>) {
    if node.name.trim().is_empty() {
        errors.push(ValidationError::EmptyCommandName(parent.to_string()));
        return;
    }
    if let Some(reason) = command_name_problem(&node.name) {
        errors.push(ValidationError::InvalidCommandName {
            name: node.name.clone(),
            reason,
        });
    }

    errors.extend(validate_options(node));
    for sub in node.subcommands.values() {
        validate_node(sub, &node.prog, errors);
    }
}

fn validate_options(node: &CommandNode) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();

    for option in &node.options {
        if option.flags.is_empty() {
            errors.push(ValidationError::MissingFlagName(node.prog.clone()));
            continue;
        }

        for flag in &option.flags {
            if !is_valid_flag(flag) {
                errors.push(ValidationError::InvalidFlag {
                    command: node.prog.clone(),
                    flag: flag.clone(),
                });
                continue;
            }
            if flag.starts_with('-') && !seen.insert(flag.as_str()) {
                errors.push(ValidationError::DuplicateFlag {
                    command: node.prog.clone(),
                    flag: flag.clone(),
                });
            }
        }
    }

    errors
}

fn is_valid_flag(flag: &str) -> bool {
    if flag.trim().is_empty() {
        return false;
    }
    match flag.strip_prefix("--") {
        Some(long) => !long.is_empty() && !long.starts_with('-'),
        None => match flag.strip_prefix('-') {
            Some(short) => !short.is_empty(),
            None => true,
        },
    }
}
