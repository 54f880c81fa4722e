//! Runs a documentation build: constructs the parser, introspects it,
//! renders and writes the documents.

use std::fs;
use std::path::{Path, PathBuf};

use command_docs_core::{
    BuildSettings, CommandTree, DocumentRecord, IntrospectOptions, ParserSource, Result,
    introspect, validate_tree,
};
use command_docs_render::{
    ManPageRenderer, RenderError, RenderReport, UsageDocRenderer, resolve_build_date,
};
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::config::DocsConfig;

/// Outcome of one generation step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerationSummary {
    /// Files written, in render order
    pub written: Vec<PathBuf>,
    /// Commands that were degraded or skipped
    pub issues: Vec<RenderError>,
}

/// Drives introspection and rendering for one program.
///
/// Holds the parser construction routine directly; it is invoked once per
/// [`Orchestrator::tree`] call with [`BuildSettings::for_docs`].
///
/// # Examples
///
/// ```
/// use command_docs_cli::{DocsConfig, Orchestrator};
/// use command_docs_core::{BuildSettings, Result, StaticParser};
///
/// let source = |settings: &BuildSettings| -> Result<StaticParser> {
///     Ok(StaticParser::new(&settings.prog, &settings.prog)
///         .with_commands("command", vec![StaticParser::new("create", "prog create")]))
/// };
/// let config = DocsConfig { prog: "prog".to_string(), ..DocsConfig::default() };
///
/// let orchestrator = Orchestrator::new(source, config);
/// let tree = orchestrator.tree().unwrap();
/// assert_eq!(tree.command_names(), vec!["create"]);
/// ```
#[derive(Debug, Clone)]
pub struct Orchestrator<S> {
    source: S,
    config: DocsConfig,
}

impl<S: ParserSource> Orchestrator<S> {
    /// Creates an orchestrator for the given parser source.
    pub fn new(source: S, config: DocsConfig) -> Self {
        Self { source, config }
    }

    /// The active configuration.
    pub fn config(&self) -> &DocsConfig {
        &self.config
    }

    /// Builds the parser and introspects it.
    ///
    /// Validation problems are logged as warnings and do not fail the run.
    ///
    /// # Errors
    ///
    /// Propagates errors from parser construction and introspection.
    pub fn tree(&self) -> Result<CommandTree> {
        let settings = BuildSettings::for_docs(&self.config.prog);
        let parser = self.source.build(&settings)?;

        let options = if self.config.include_nested {
            IntrospectOptions::unbounded()
        } else {
            IntrospectOptions::default()
        };
        let tree = introspect(&parser, &options)?;

        for problem in validate_tree(&tree) {
            warn!(%problem, "Command tree problem");
        }
        Ok(tree)
    }

    /// Renders usage fragments into the docs directory.
    ///
    /// Anchors and titles use the configured program label, falling back to
    /// the tree's root name.
    ///
    /// # Errors
    ///
    /// Returns [`DocError::Io`](command_docs_core::DocError::Io) if a
    /// document cannot be written.
    pub fn generate_usage(&self, tree: &CommandTree) -> Result<GenerationSummary> {
        let report = UsageDocRenderer::new(self.config.prog_or(&tree.prog))
            .include_nested(self.config.include_nested)
            .render_with_report(tree);
        finish("usage", &self.config.docs_dir, report)
    }

    /// Renders man pages into the man directory.
    ///
    /// `epoch` overrides the build date (seconds since the epoch).
    ///
    /// # Errors
    ///
    /// Returns [`DocError::Configuration`](command_docs_core::DocError::Configuration)
    /// for missing metadata or an out-of-range epoch, and
    /// [`DocError::Io`](command_docs_core::DocError::Io) if a page cannot be
    /// written.
    pub fn generate_man(&self, tree: &CommandTree, epoch: Option<i64>) -> Result<GenerationSummary> {
        let date = resolve_build_date(epoch)?;
        let meta = self.config.man_meta(&tree.prog, date)?;
        let report = ManPageRenderer::new(meta)
            .include_nested(self.config.include_nested)
            .render_with_report(tree);
        finish("man", &self.config.man_dir, report)
    }
}

fn finish(kind: &str, root: &Path, report: RenderReport) -> Result<GenerationSummary> {
    for issue in &report.issues {
        warn!(kind, %issue, "Degraded document");
    }

    let written = write_documents(root, &report.documents)?;
    info!(
        kind,
        dir = %root.display(),
        written = written.len(),
        skipped = report.skipped(),
        "Documents written"
    );

    Ok(GenerationSummary {
        written,
        issues: report.issues,
    })
}

/// Writes documents below `root`, creating directories as needed.
///
/// Directories that already exist are reused. Writes run in parallel; the
/// first failure is returned.
///
/// # Errors
///
/// Returns [`DocError::Io`](command_docs_core::DocError::Io) if a directory
/// or file cannot be written.
pub fn write_documents(root: &Path, documents: &[DocumentRecord]) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(root)?;

    documents
        .par_iter()
        .map(|doc| -> Result<PathBuf> {
            let path = root.join(&doc.path);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&path, &doc.content)?;
            debug!(path = %path.display(), bytes = doc.content.len(), "Wrote document");
            Ok(path)
        })
        .collect()
}
