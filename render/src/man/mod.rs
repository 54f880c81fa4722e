//! Troff man pages.
//!
//! One page per top-level command (`prog-create.1`), made of a header
//! (title, NAME, SYNOPSIS, DESCRIPTION), the OPTIONS listing and a footer
//! (AUTHORS, DISTRIBUTION). Every user-supplied string is escaped exactly
//! once: raw text goes through [`escape_troff`], captured usage lines go
//! through [`OptionFormatter::format_usage`], and the page is assembled from
//! [`RoffText`] only.

mod formatter;

pub use formatter::OptionFormatter;

use chrono::{DateTime, NaiveDate, Utc};
use command_docs_core::{
    CommandNode, CommandTree, DocError, DocumentRecord, Result, command_name_problem,
};
use tracing::{debug, warn};

use crate::escape::{RoffText, escape_troff, escape_troff_block};
use crate::report::{RenderError, RenderReport};

/// Manual section every page is filed under.
pub const MAN_SECTION: u8 = 1;

/// Static metadata shared by every page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManMeta {
    /// Root program label
    pub prog: String,
    /// Author name
    pub author: String,
    /// Author contact address
    pub author_email: Option<String>,
    /// Project homepage URL
    pub homepage: String,
    /// Date printed in the page title; today when unset
    pub build_date: Option<NaiveDate>,
}

impl ManMeta {
    /// Creates metadata without email or fixed build date.
    pub fn new(prog: &str, author: &str, homepage: &str) -> Self {
        Self {
            prog: prog.to_string(),
            author: author.to_string(),
            author_email: None,
            homepage: homepage.to_string(),
            build_date: None,
        }
    }

    /// Sets the author's email.
    pub fn with_email(mut self, email: &str) -> Self {
        self.author_email = Some(email.to_string());
        self
    }

    /// Pins the build date.
    pub fn with_build_date(mut self, date: NaiveDate) -> Self {
        self.build_date = Some(date);
        self
    }
}

/// Turns an optional build timestamp override (seconds since the epoch)
/// into the date printed on every page.
///
/// Without an override the current UTC date is used.
///
/// # Errors
///
/// Returns [`DocError::Configuration`] if the timestamp is out of range.
///
/// # Examples
///
/// ```
/// use command_docs_render::resolve_build_date;
///
/// let date = resolve_build_date(Some(1_700_000_000)).unwrap();
/// assert_eq!(date.to_string(), "2023-11-14");
/// ```
pub fn resolve_build_date(epoch: Option<i64>) -> Result<NaiveDate> {
    match epoch {
        Some(secs) => DateTime::from_timestamp(secs, 0)
            .map(|dt| dt.date_naive())
            .ok_or_else(|| {
                DocError::Configuration(format!("build timestamp {secs} is out of range"))
            }),
        None => Ok(Utc::now().date_naive()),
    }
}

/// Renders troff man pages.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use command_docs_core::{CommandNode, CommandTree};
/// use command_docs_render::{ManMeta, ManPageRenderer};
///
/// let meta = ManMeta::new("prog", "The Authors", "https://example.org")
///     .with_build_date(NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
/// let tree = CommandTree::new("prog").with_command(
///     CommandNode::new("create", "prog create").with_description("make an archive"),
/// );
///
/// let pages = ManPageRenderer::new(meta).render(&tree);
/// assert_eq!(pages[0].path.to_str(), Some("prog-create.1"));
/// assert!(pages[0].content.starts_with(".TH prog\\-create 1 2024-05-01\n"));
/// assert!(pages[0].content.contains("NAME\nprog create \\- make an archive"));
/// ```
#[derive(Debug, Clone)]
pub struct ManPageRenderer {
    meta: ManMeta,
    formatter: OptionFormatter,
    include_nested: bool,
}

impl ManPageRenderer {
    /// Creates a renderer with the given metadata.
    pub fn new(meta: ManMeta) -> Self {
        Self {
            meta,
            formatter: OptionFormatter,
            include_nested: false,
        }
    }

    /// Also renders pages for nested commands (`prog-key-export.1`).
    pub fn include_nested(mut self, include: bool) -> Self {
        self.include_nested = include;
        self
    }

    /// Renders one page per documented command.
    pub fn render(&self, tree: &CommandTree) -> Vec<DocumentRecord> {
        self.render_with_report(tree).documents
    }

    /// Renders one page per documented command and reports degraded or
    /// skipped ones.
    pub fn render_with_report(&self, tree: &CommandTree) -> RenderReport {
        let date = self
            .meta
            .build_date
            .unwrap_or_else(|| Utc::now().date_naive());
        let mut report = RenderReport::default();

        for (_, node) in tree.documented(self.include_nested) {
            if let Some(reason) = command_name_problem(&node.name) {
                warn!(command = %node.name, reason, "Skipping man page");
                report.issues.push(RenderError::InvalidCommandName {
                    command: node.prog.clone(),
                    reason,
                });
                continue;
            }

            debug!(command = %node.prog, "Generating man page");
            let mut page = self.header(node, date);
            page.push(&self.options(node));
            page.push(&self.footer());

            if node.epilog.is_none() {
                report.issues.push(RenderError::MissingEpilog {
                    command: node.prog.clone(),
                });
            }

            let path = format!("{}.{MAN_SECTION}", page_name(node));
            report
                .documents
                .push(DocumentRecord::new(path, page.into_string()));
        }

        report
    }

    fn header(&self, node: &CommandNode, date: NaiveDate) -> RoffText {
        let mut out = RoffText::new();

        out.push_literal(".TH ");
        out.push(&escape_troff(&page_name(node)));
        out.push_literal(&format!(" {MAN_SECTION} {}", date.format("%Y-%m-%d")));
        out.newline();

        out.push_request(".SH NAME");
        out.push(&escape_troff(&node.prog));
        if let Some(summary) = node.summary() {
            out.push_literal(" \\- ");
            out.push(&escape_troff(summary));
        }
        out.newline();

        out.push_request(".SH SYNOPSIS");
        out.push_literal(".B ");
        out.push(&escape_troff(&node.prog));
        out.newline();
        if !node.synopsis.is_empty() {
            out.push(&self.formatter.format_usage(&node.synopsis));
            out.newline();
        }

        if let Some(body) = node.epilog_body() {
            out.push_request(".SH DESCRIPTION");
            out.push(&escape_troff_block(body));
            out.newline();
        }

        out
    }

    fn options(&self, node: &CommandNode) -> RoffText {
        let mut out = RoffText::request(".SH OPTIONS");
        out.push(&self.formatter.format_options(&node.options));
        out
    }

    fn footer(&self) -> RoffText {
        let mut out = RoffText::request(".SH AUTHORS");
        out.push(&escape_troff(&self.meta.prog));
        out.push_literal(" was written by ");
        out.push(&escape_troff(&self.meta.author));
        if let Some(email) = &self.meta.author_email {
            out.push_literal(" <");
            out.push(&escape_troff(email));
            out.push_literal(">");
        }
        out.push_literal(".");
        out.newline();

        out.push_request(".SH DISTRIBUTION");
        out.push(&escape_troff(&self.meta.homepage));
        out.newline();
        out
    }
}

/// File stem of a command's page: its program label with spaces replaced
/// by dashes (`prog create` becomes `prog-create`).
pub fn page_name(node: &CommandNode) -> String {
    node.prog.split_whitespace().collect::<Vec<_>>().join("-")
}

#[cfg(test)]
mod tests {
    use command_docs_core::OptionSpec;

    use super::*;

    fn meta() -> ManMeta {
        ManMeta::new("prog", "The Prog-Authors", "https://example.org/prog-home")
            .with_email("dev@example.org")
            .with_build_date(NaiveDate::from_ymd_opt(2024, 1, 2).unwrap())
    }

    fn create() -> CommandNode {
        CommandNode::new("create", "prog create")
            .with_description("make an archive")
            .with_synopsis("[-h] [--stats] ARCHIVE")
            .with_epilog("Make an archive\nThis command creates a backup archive.\nFiles are read-only.")
            .with_option(OptionSpec::new(["ARCHIVE"]).with_heading("positional arguments").with_help("archive name"))
            .with_option(
                OptionSpec::new(["-s", "--stats"])
                    .with_heading("optional arguments")
                    .with_help("print statistics"),
            )
    }

    #[test]
    fn test_full_page_layout() {
        let tree = CommandTree::new("prog").with_command(create());
        let pages = ManPageRenderer::new(meta()).render(&tree);

        let expected = "\
.TH prog\\-create 1 2024-01-02
.SH NAME
prog create \\- make an archive
.SH SYNOPSIS
.B prog create
[\\-h] [\\-\\-stats] ARCHIVE
.SH DESCRIPTION
This command creates a backup archive.
Files are read\\-only.
.SH OPTIONS
.TP
POSITIONAL ARGUMENTS
.TP
.B ARCHIVE
archive name
.TP
OPTIONAL ARGUMENTS
.TP
.B \\-s, \\-\\-stats
print statistics
.SH AUTHORS
prog was written by The Prog\\-Authors <dev@example.org>.
.SH DISTRIBUTION
https://example.org/prog\\-home
";
        assert_eq!(pages.len(), 1);
        assert_eq!(pages[0].path.to_str(), Some("prog-create.1"));
        assert_eq!(pages[0].content, expected);
    }

    #[test]
    fn test_empty_tree_renders_no_pages() {
        let report = ManPageRenderer::new(meta())
            .include_nested(true)
            .render_with_report(&CommandTree::new("prog"));
        assert!(report.documents.is_empty());
        assert!(report.issues.is_empty());
    }

    #[test]
    fn test_option_help_lines_starting_with_dot_are_protected() {
        let node = create().with_option(
            OptionSpec::new(["--exclude"]).with_help("exclude paths\n.git directories are always skipped"),
        );
        let tree = CommandTree::new("prog").with_command(node);
        let pages = ManPageRenderer::new(meta()).render(&tree);
        assert!(pages[0].content.contains("exclude paths\n\\&.git directories are always skipped\n"));
        assert!(!pages[0].content.contains("\n.git"));
    }

    #[test]
    fn test_no_epilog_has_no_description() {
        let node = CommandNode::new("create", "prog create").with_description("make an archive");
        let tree = CommandTree::new("prog").with_command(node);
        let report = ManPageRenderer::new(meta()).render_with_report(&tree);

        let content = &report.documents[0].content;
        assert!(content.contains("NAME\nprog create \\- make an archive"));
        assert!(!content.contains("DESCRIPTION"));
        assert_eq!(
            report.issues,
            vec![RenderError::MissingEpilog {
                command: "prog create".to_string()
            }]
        );
    }

    #[test]
    fn test_no_description_omits_dash() {
        let tree = CommandTree::new("prog").with_command(CommandNode::new("list", "prog list"));
        let pages = ManPageRenderer::new(meta()).render(&tree);
        assert!(pages[0].content.contains(".SH NAME\nprog list\n.SH SYNOPSIS"));
    }

    #[test]
    fn test_options_heading_only_without_options() {
        let tree = CommandTree::new("prog").with_command(CommandNode::new("list", "prog list"));
        let pages = ManPageRenderer::new(meta()).render(&tree);
        assert!(pages[0].content.contains(".SH OPTIONS\n.SH AUTHORS"));
    }

    #[test]
    fn test_synopsis_is_not_escaped_twice() {
        let tree = CommandTree::new("prog").with_command(create());
        let pages = ManPageRenderer::new(meta()).render(&tree);
        assert!(pages[0].content.contains("[\\-h]"));
        assert!(!pages[0].content.contains("\\\\-"));
    }

    #[test]
    fn test_help_is_skipped_and_nested_on_request() {
        let tree = CommandTree::new("prog")
            .with_command(CommandNode::new("help", "prog help"))
            .with_command(
                CommandNode::new("key", "prog key")
                    .with_subcommand(CommandNode::new("export", "prog key export")),
            );

        let flat = ManPageRenderer::new(meta()).render(&tree);
        let paths: Vec<_> = flat.iter().map(|d| d.path.display().to_string()).collect();
        assert_eq!(paths, vec!["prog-key.1"]);

        let nested = ManPageRenderer::new(meta()).include_nested(true).render(&tree);
        let paths: Vec<_> = nested.iter().map(|d| d.path.display().to_string()).collect();
        assert_eq!(paths, vec!["prog-key.1", "prog-key-export.1"]);
    }

    #[test]
    fn test_description_lines_starting_with_dot_are_protected() {
        let node = CommandNode::new("x", "prog x").with_epilog("Summary\n.hidden files are skipped");
        let tree = CommandTree::new("prog").with_command(node);
        let pages = ManPageRenderer::new(meta()).render(&tree);
        assert!(pages[0].content.contains(".SH DESCRIPTION\n\\&.hidden files are skipped\n"));
    }

    #[test]
    fn test_resolve_build_date() {
        assert_eq!(
            resolve_build_date(Some(0)).unwrap(),
            NaiveDate::from_ymd_opt(1970, 1, 1).unwrap()
        );
        assert!(matches!(
            resolve_build_date(Some(i64::MAX)),
            Err(DocError::Configuration(_))
        ));
        assert!(resolve_build_date(None).is_ok());
    }
}
