use std::path::PathBuf;

use clap::{ArgAction, Args, CommandFactory, Parser, Subcommand};
use command_docs_cli::{
    DocsConfig, GenerationSummary, Orchestrator, load_parser_definition, source_date_epoch_from_env,
};
use command_docs_core::{BuildSettings, ClapParser, ParserSource, StaticParser};
use tracing::debug;

/// Tree dump format.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum TreeFormat {
    Json,
    Yaml,
}

#[derive(Debug, Parser)]
#[command(name = "command-docs", version)]
#[command(about = "Generate usage fragments and man pages for a command-line interface")]
#[command(after_help = "Generate usage fragments and man pages for a command-line interface\n\n\
Without --parser, command-docs documents its own interface.")]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Write reStructuredText usage fragments.
    #[command(after_help = "Write reStructuredText usage fragments\n\n\
One fragment per command is written to <docs-dir>/usage/<command>.rst.inc.\n\
The help command is never documented.")]
    Usage(UsageArgs),
    /// Write troff man pages.
    #[command(after_help = "Write troff man pages\n\n\
One page per command is written to <man-dir>/<prog>-<command>.1.\n\
The page date comes from --source-date-epoch or SOURCE_DATE_EPOCH, else today.")]
    Man(ManArgs),
    /// Write usage fragments and man pages.
    #[command(after_help = "Write usage fragments and man pages\n\n\
Runs the usage and man steps against a single introspection of the parser.")]
    All(AllArgs),
    /// Print the introspected command tree.
    #[command(after_help = "Print the introspected command tree\n\n\
The tree is the normalized model both renderers consume.")]
    Tree(TreeArgs),
}

#[derive(Debug, Args)]
struct SourceArgs {
    /// YAML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Parser description (YAML or JSON) to document instead of this tool.
    #[arg(long)]
    parser: Option<PathBuf>,
    /// Also document nested commands.
    #[arg(long)]
    nested: bool,
}

impl SourceArgs {
    fn load_config(&self) -> Result<DocsConfig, String> {
        let mut config = match &self.config {
            Some(path) => DocsConfig::load(path)
                .map_err(|e| format!("Failed to load config {}: {e}", path.display()))?,
            None => DocsConfig::default(),
        };
        if self.nested {
            config.include_nested = true;
        }
        Ok(config)
    }
}

#[derive(Debug, Args)]
struct ManOutputArgs {
    /// Output directory for man pages.
    #[arg(long)]
    man_dir: Option<PathBuf>,
    /// Author credited in the AUTHORS section.
    #[arg(long)]
    author: Option<String>,
    /// Author email.
    #[arg(long)]
    author_email: Option<String>,
    /// Homepage listed in the DISTRIBUTION section.
    #[arg(long)]
    homepage: Option<String>,
    /// Build timestamp (seconds since the epoch) used for the page date.
    #[arg(long, allow_negative_numbers = true)]
    source_date_epoch: Option<i64>,
}

impl ManOutputArgs {
    /// Applies overrides and returns the build timestamp override.
    fn apply(self, config: &mut DocsConfig) -> Result<Option<i64>, String> {
        if let Some(dir) = self.man_dir {
            config.man_dir = dir;
        }
        if let Some(author) = self.author {
            config.author = author;
        }
        if let Some(email) = self.author_email {
            config.author_email = Some(email);
        }
        if let Some(homepage) = self.homepage {
            config.homepage = homepage;
        }
        match self.source_date_epoch {
            Some(epoch) => Ok(Some(epoch)),
            None => source_date_epoch_from_env().map_err(|e| e.to_string()),
        }
    }
}

#[derive(Debug, Args)]
struct UsageArgs {
    #[command(flatten)]
    source: SourceArgs,
    /// Documentation root; fragments go to <docs-dir>/usage.
    #[arg(long)]
    docs_dir: Option<PathBuf>,
}

#[derive(Debug, Args)]
struct ManArgs {
    #[command(flatten)]
    source: SourceArgs,
    #[command(flatten)]
    man: ManOutputArgs,
}

#[derive(Debug, Args)]
struct AllArgs {
    #[command(flatten)]
    source: SourceArgs,
    /// Documentation root; fragments go to <docs-dir>/usage.
    #[arg(long)]
    docs_dir: Option<PathBuf>,
    #[command(flatten)]
    man: ManOutputArgs,
}

#[derive(Debug, Args)]
struct TreeArgs {
    #[command(flatten)]
    source: SourceArgs,
    /// Output format.
    #[arg(long, default_value = "json")]
    format: TreeFormat,
}

/// What to do with the introspected tree.
#[derive(Debug, Clone, Copy)]
enum Job {
    Usage,
    Man(Option<i64>),
    All(Option<i64>),
    Tree(TreeFormat),
}

fn main() {
    let cli = Cli::parse();

    let result = init_tracing(cli.verbose).and_then(|()| run(cli.command));

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8) -> Result<(), String> {
    let level = match verbose {
        0 => tracing::Level::INFO,
        1 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| format!("Failed to initialize logging: {e}"))
}

fn run(command: Command) -> Result<(), String> {
    match command {
        Command::Usage(args) => {
            let mut config = args.source.load_config()?;
            if let Some(dir) = args.docs_dir {
                config.docs_dir = dir;
            }
            execute(&args.source, config, Job::Usage)
        }
        Command::Man(args) => {
            let mut config = args.source.load_config()?;
            let epoch = args.man.apply(&mut config)?;
            execute(&args.source, config, Job::Man(epoch))
        }
        Command::All(args) => {
            let mut config = args.source.load_config()?;
            if let Some(dir) = args.docs_dir {
                config.docs_dir = dir;
            }
            let epoch = args.man.apply(&mut config)?;
            execute(&args.source, config, Job::All(epoch))
        }
        Command::Tree(args) => {
            let config = args.source.load_config()?;
            execute(&args.source, config, Job::Tree(args.format))
        }
    }
}

fn execute(source: &SourceArgs, config: DocsConfig, job: Job) -> Result<(), String> {
    match &source.parser {
        Some(path) => {
            let parser = load_parser_definition(path)
                .map_err(|e| format!("Failed to load parser definition {}: {e}", path.display()))?;
            let from_file = move |_: &BuildSettings| -> command_docs_core::Result<StaticParser> {
                Ok(parser.clone())
            };
            run_job(&Orchestrator::new(from_file, config), job)
        }
        None => run_job(&Orchestrator::new(self_parser, config), job),
    }
}

/// Builds the parser of this tool, used when no parser definition is given.
fn self_parser(settings: &BuildSettings) -> command_docs_core::Result<ClapParser> {
    debug!(prog = %settings.prog, docs_build = settings.docs_build, "Building own parser");
    let mut cmd = Cli::command();
    if !settings.prog.trim().is_empty() {
        cmd = cmd.bin_name(settings.prog.trim().to_string());
    }
    Ok(ClapParser::new(cmd))
}

fn run_job<S: ParserSource>(orchestrator: &Orchestrator<S>, job: Job) -> Result<(), String> {
    let tree = orchestrator.tree().map_err(|e| e.to_string())?;

    match job {
        Job::Usage => {
            let summary = orchestrator.generate_usage(&tree).map_err(|e| e.to_string())?;
            print_summary("usage fragments", &summary);
        }
        Job::Man(epoch) => {
            let summary = orchestrator
                .generate_man(&tree, epoch)
                .map_err(|e| e.to_string())?;
            print_summary("man pages", &summary);
        }
        Job::All(epoch) => {
            let usage = orchestrator.generate_usage(&tree).map_err(|e| e.to_string())?;
            let man = orchestrator
                .generate_man(&tree, epoch)
                .map_err(|e| e.to_string())?;
            print_summary("usage fragments", &usage);
            print_summary("man pages", &man);
        }
        Job::Tree(TreeFormat::Json) => {
            let json = serde_json::to_string_pretty(&tree)
                .map_err(|e| format!("JSON serialization failed: {e}"))?;
            println!("{json}");
        }
        Job::Tree(TreeFormat::Yaml) => {
            let yaml = serde_yaml::to_string(&tree)
                .map_err(|e| format!("YAML serialization failed: {e}"))?;
            print!("{yaml}");
        }
    }
    Ok(())
}

fn print_summary(kind: &str, summary: &GenerationSummary) {
    println!("Wrote {} {kind}", summary.written.len());
    for issue in &summary.issues {
        println!("  {issue}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_man_overrides_replace_config_values() {
        let mut config = DocsConfig {
            author: "From File".to_string(),
            ..DocsConfig::default()
        };
        let args = ManOutputArgs {
            man_dir: Some(PathBuf::from("out/man")),
            author: Some("From Flag".to_string()),
            author_email: None,
            homepage: Some("https://example.org".to_string()),
            source_date_epoch: Some(42),
        };

        let epoch = args.apply(&mut config).unwrap();
        assert_eq!(epoch, Some(42));
        assert_eq!(config.author, "From Flag");
        assert_eq!(config.homepage, "https://example.org");
        assert_eq!(config.man_dir, PathBuf::from("out/man"));
        assert_eq!(config.author_email, None);
    }

    #[test]
    fn test_own_parser_documents_every_subcommand() {
        let orchestrator = Orchestrator::new(self_parser, DocsConfig::default());
        let tree = orchestrator.tree().unwrap();
        assert_eq!(tree.prog, "command-docs");
        assert_eq!(tree.command_names(), vec!["all", "help", "man", "tree", "usage"]);
        assert!(tree.commands["man"].epilog.is_some());
        assert_eq!(tree.commands["man"].prog, "command-docs man");
    }

    #[test]
    fn test_own_parser_takes_configured_label() {
        let config = DocsConfig {
            prog: "docgen".to_string(),
            ..DocsConfig::default()
        };
        let tree = Orchestrator::new(self_parser, config).tree().unwrap();
        assert_eq!(tree.prog, "command-docs");
        assert_eq!(tree.commands["usage"].prog, "docgen usage");
    }
}
