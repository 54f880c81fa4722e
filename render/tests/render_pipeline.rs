//! End-to-end tests: parser description -> command tree -> documents.

use chrono::NaiveDate;
use command_docs_core::{
    CommandTree, IntrospectOptions, OptionSpec, StaticParser, introspect, normalize_block,
};
use command_docs_render::{
    ManMeta, ManPageRenderer, UsageDocRenderer, escape_troff, extract_literal_block,
    unescape_troff,
};
use proptest::prelude::*;

fn borg() -> StaticParser {
    StaticParser::new("borg", "borg").with_commands(
        "command",
        vec![
            StaticParser::new("create", "borg create")
                .with_description("make an archive")
                .with_usage("[-h] [-s] [--exclude PATTERN] ARCHIVE PATH")
                .with_epilog("Make an archive\nThis command creates a backup archive\ncontaining all files found while recursively traversing\nall paths specified.")
                .with_option(
                    OptionSpec::new(["ARCHIVE"])
                        .with_heading("positional arguments")
                        .with_help("name of archive to create"),
                )
                .with_option(
                    OptionSpec::new(["-s", "--stats"])
                        .with_heading("optional arguments")
                        .with_help("print statistics for the created archive"),
                )
                .with_option(
                    OptionSpec::new(["--exclude"])
                        .with_heading("optional arguments")
                        .with_help("exclude paths matching PATTERN"),
                ),
            StaticParser::new("extract", "borg extract")
                .with_description("Extract archive contents")
                .with_usage("[-h] [-n] ARCHIVE"),
            StaticParser::new("help", "borg help").with_usage("[-h] [TOPIC]"),
        ],
    )
}

fn tree() -> CommandTree {
    introspect(&borg(), &IntrospectOptions::default()).unwrap()
}

fn meta() -> ManMeta {
    ManMeta::new("borg", "The Borg Collective", "https://borgbackup.org/")
        .with_email("borgbackup@python.org")
        .with_build_date(NaiveDate::from_ymd_opt(2024, 3, 9).unwrap())
}

#[test]
fn test_help_command_gets_no_documents() {
    let tree = tree();
    assert!(tree.commands.contains_key("help"));

    let usage = UsageDocRenderer::new("borg").render(&tree);
    let man = ManPageRenderer::new(meta()).render(&tree);

    let usage_paths: Vec<String> = usage.iter().map(|d| d.path.display().to_string()).collect();
    let man_paths: Vec<String> = man.iter().map(|d| d.path.display().to_string()).collect();
    assert_eq!(usage_paths, vec!["usage/create.rst.inc", "usage/extract.rst.inc"]);
    assert_eq!(man_paths, vec!["borg-create.1", "borg-extract.1"]);
}

#[test]
fn test_usage_fragment_round_trips_help_text() {
    let tree = tree();
    let docs = UsageDocRenderer::new("borg").render(&tree);

    for doc in &docs {
        let name = doc
            .path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(|n| n.strip_suffix(".rst.inc"))
            .unwrap();
        let node = &tree.commands[name];
        assert_eq!(
            extract_literal_block(&doc.content).as_deref(),
            Some(node.usage_text.as_str()),
            "literal block of {name}"
        );
        assert!(!node.usage_text.contains("This command creates"));
    }
}

#[test]
fn test_man_page_header_and_sections() {
    let tree = tree();
    let report = ManPageRenderer::new(meta()).render_with_report(&tree);
    let create = &report.documents[0].content;

    assert!(create.starts_with(".TH borg\\-create 1 2024-03-09\n.SH NAME\nborg create \\- make an archive\n"));
    assert!(create.contains(".SH SYNOPSIS\n.B borg create\n[\\-h] [\\-s] [\\-\\-exclude PATTERN] ARCHIVE PATH\n"));
    assert!(create.contains(".SH DESCRIPTION\nThis command creates a backup archive\n"));
    assert!(create.contains(".B \\-s, \\-\\-stats\nprint statistics for the created archive\n"));
    assert!(create.contains(".SH AUTHORS\nborg was written by The Borg Collective <borgbackup@python.org>.\n"));
    assert!(create.ends_with(".SH DISTRIBUTION\nhttps://borgbackup.org/\n"));

    let extract = &report.documents[1].content;
    assert!(extract.contains("NAME\nborg extract \\- Extract archive contents"));
    assert!(!extract.contains("DESCRIPTION"));
    assert_eq!(report.issues.len(), 1);
    assert!(!report.issues[0].is_skip());
}

#[test]
fn test_man_pages_escape_every_hyphen() {
    let tree = tree();
    for doc in ManPageRenderer::new(meta()).render(&tree) {
        for line in doc.content.lines() {
            let bare = line.replace("\\-", "");
            assert!(!bare.contains('-') || line.starts_with(".TH"), "unescaped hyphen in {line:?}");
        }
    }
}

#[test]
fn test_rendering_is_deterministic() {
    let first = UsageDocRenderer::new("borg").render(&tree());
    let second = UsageDocRenderer::new("borg").render(&tree());
    assert_eq!(first, second);

    let first = ManPageRenderer::new(meta()).render(&tree());
    let second = ManPageRenderer::new(meta()).render(&tree());
    assert_eq!(first, second);
}

proptest! {
    #[test]
    fn literal_block_round_trips(lines in prop::collection::vec("[a-zA-Z0-9 :\\[\\]-]{0,30}", 1..8)) {
        let usage = normalize_block(&lines.join("\n"));
        prop_assume!(!usage.is_empty());
        let tree = CommandTree::new("prog").with_command(
            command_docs_core::CommandNode::new("run", "prog run").with_usage_text(&usage),
        );
        let docs = UsageDocRenderer::new("prog").render(&tree);
        prop_assert_eq!(extract_literal_block(&docs[0].content), Some(usage));
    }

    #[test]
    fn troff_escaping_is_reversible(text in "[a-z -]{0,40}") {
        let escaped = escape_troff(&text);
        prop_assert_eq!(unescape_troff(escaped.as_str()), text);
    }
}
