//! reStructuredText usage fragments.
//!
//! Each documented command becomes `usage/<name>.rst.inc`: an anchor, a
//! title, the captured help text as a literal block, and the epilog as the
//! description. Commands with no help text get no literal block.

use command_docs_core::{CommandNode, CommandTree, DocumentRecord, command_name_problem};
use tracing::{debug, warn};

use crate::escape::escape_rst;
use crate::report::{RenderError, RenderReport};

/// Directory (relative to the docs root) holding the fragments.
pub const USAGE_DIR: &str = "usage";

/// Indentation of literal block lines.
const LITERAL_INDENT: &str = "    ";

/// Renders one RST include fragment per command.
///
/// # Examples
///
/// ```
/// use command_docs_core::{CommandNode, CommandTree};
/// use command_docs_render::UsageDocRenderer;
///
/// let tree = CommandTree::new("borg")
///     .with_command(CommandNode::new("help", "borg help"))
///     .with_command(
///         CommandNode::new("create", "borg create")
///             .with_usage_text("usage: borg create [-h] ARCHIVE")
///             .with_epilog("This command creates a backup archive.\n"),
///     );
///
/// let docs = UsageDocRenderer::new("borg").render(&tree);
/// assert_eq!(docs.len(), 1);
/// assert_eq!(docs[0].path.to_str(), Some("usage/create.rst.inc"));
/// assert!(docs[0].content.starts_with(".. _borg_create:\n\nborg create\n-----------\n::\n\n"));
/// ```
#[derive(Debug, Clone)]
pub struct UsageDocRenderer {
    prog: String,
    include_nested: bool,
}

impl UsageDocRenderer {
    /// Creates a renderer for program `prog`.
    pub fn new(prog: &str) -> Self {
        Self {
            prog: prog.to_string(),
            include_nested: false,
        }
    }

    /// Also renders nested commands (`usage/key_export.rst.inc`).
    pub fn include_nested(mut self, include: bool) -> Self {
        self.include_nested = include;
        self
    }

    /// Renders every documented command.
    pub fn render(&self, tree: &CommandTree) -> Vec<DocumentRecord> {
        self.render_with_report(tree).documents
    }

    /// Renders every documented command and reports degraded or skipped
    /// ones.
    pub fn render_with_report(&self, tree: &CommandTree) -> RenderReport {
        let mut report = RenderReport::default();

        for (words, node) in tree.documented(self.include_nested) {
            if let Some(reason) = command_name_problem(&node.name) {
                warn!(command = %node.name, reason, "Skipping usage document");
                report.issues.push(RenderError::InvalidCommandName {
                    command: node.prog.clone(),
                    reason,
                });
                continue;
            }

            debug!(command = %node.prog, "Generating usage document");
            let (record, issue) = self.render_command(&words, node);
            report.documents.push(record);
            report.issues.extend(issue);
        }

        report
    }

    fn render_command(
        &self,
        words: &[String],
        node: &CommandNode,
    ) -> (DocumentRecord, Option<RenderError>) {
        let slug = words.join("_");
        let title = format!("{} {}", self.prog, words.join(" "));
        let underline = "-".repeat(title.chars().count());

        let mut out = format!(".. _{}_{slug}:\n\n{title}\n{underline}\n", self.prog);
        // RST rejects an empty literal block.
        if node.usage_text.trim().is_empty() {
            debug!(command = %node.prog, "No usage text, omitting literal block");
        } else {
            out.push_str("::\n\n");
            out.push_str(&indent_literal(&escape_rst(&node.usage_text)));
        }

        let issue = match &node.epilog {
            Some(epilog) => {
                out.push_str("\nDescription\n~~~~~~~~~~~\n");
                out.push_str(&escape_rst(epilog));
                if !out.ends_with('\n') {
                    out.push('\n');
                }
                None
            }
            None => {
                warn!(command = %node.prog, "No epilog, omitting description");
                Some(RenderError::MissingEpilog {
                    command: node.prog.clone(),
                })
            }
        };

        let path = format!("{USAGE_DIR}/{slug}.rst.inc");
        (DocumentRecord::new(path, out), issue)
    }
}

/// Indents every non-empty line by four spaces.
fn indent_literal(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 64);
    for line in text.lines() {
        if !line.is_empty() {
            out.push_str(LITERAL_INDENT);
            out.push_str(line);
        }
        out.push('\n');
    }
    out
}

/// Extracts the literal block of a usage fragment, without indentation.
///
/// Returns `None` when the fragment has no `::` literal block marker.
///
/// # Examples
///
/// ```
/// use command_docs_render::extract_literal_block;
///
/// let fragment = "title\n::\n\n    usage: x\n\n    -h  help\n\nDescription\n";
/// assert_eq!(extract_literal_block(fragment).as_deref(), Some("usage: x\n\n-h  help"));
/// ```
pub fn extract_literal_block(fragment: &str) -> Option<String> {
    let mut lines = fragment.lines();
    lines.by_ref().find(|line| line.trim_end() == "::")?;

    // One blank line separates the marker from the block.
    let mut lines = lines.peekable();
    if lines.peek().is_some_and(|line| line.trim().is_empty()) {
        lines.next();
    }

    let mut block: Vec<&str> = Vec::new();
    for line in lines {
        if line.trim().is_empty() {
            block.push("");
        } else if let Some(content) = line.strip_prefix(LITERAL_INDENT) {
            block.push(content);
        } else {
            break;
        }
    }
    while block.last().is_some_and(|line| line.is_empty()) {
        block.pop();
    }

    Some(block.join("\n"))
}
