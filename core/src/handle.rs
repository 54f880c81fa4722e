//! The capability set a parser must expose to be documented.
//!
//! The introspector never sees a concrete argument parser. It only talks to
//! [`ParserHandle`], so any parser that can name and label itself, describe itself,
//! render its help and list its sub-parsers can be documented.

use crate::error::Result;
use crate::types::OptionSpec;

/// What a help rendering should include.
///
/// Passing the view explicitly replaces the pattern of temporarily clearing
/// a parser's epilog or program name and restoring it afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HelpView {
    /// Append the epilog after the option listing
    pub epilog: bool,
    /// Show the program label in usage lines
    pub program: bool,
}

impl HelpView {
    /// Everything the parser would normally print.
    pub const FULL: HelpView = HelpView {
        epilog: true,
        program: true,
    };

    /// Synopsis and option listing without the epilog.
    pub const WITHOUT_EPILOG: HelpView = HelpView {
        epilog: false,
        program: true,
    };

    /// Usage for a man page synopsis: no epilog, no program label.
    pub const SYNOPSIS: HelpView = HelpView {
        epilog: false,
        program: false,
    };
}

impl Default for HelpView {
    fn default() -> Self {
        Self::FULL
    }
}

/// One registered parser action.
///
/// Only actions that dispatch to sub-parsers carry `choices`.
#[derive(Debug, Clone)]
pub struct Action<P> {
    /// Destination name of the action
    pub dest: String,
    /// Sub-command name to nested parser, in registration order
    pub choices: Option<Vec<(String, P)>>,
}

impl<P> Action<P> {
    /// An action without sub-parsers.
    pub fn plain(dest: &str) -> Self {
        Self {
            dest: dest.to_string(),
            choices: None,
        }
    }

    /// An action dispatching to sub-parsers.
    pub fn with_choices(dest: &str, choices: Vec<(String, P)>) -> Self {
        Self {
            dest: dest.to_string(),
            choices: Some(choices),
        }
    }
}

/// Narrow interface over an argument parser.
pub trait ParserHandle: Sized {
    /// The parser's own name.
    fn name(&self) -> String;

    /// Program label used in usage lines and man pages.
    ///
    /// May differ from the root program name. A blank label lets the
    /// introspector derive one from the parent label and the command name.
    fn prog(&self) -> String;

    /// Short description, if any.
    fn description(&self) -> Option<String>;

    /// Long-form text printed after the options, if any.
    fn epilog(&self) -> Option<String>;

    /// Renders the complete help text.
    fn format_help(&self, view: HelpView) -> String;

    /// Renders only the usage line(s).
    fn format_usage(&self, view: HelpView) -> String;

    /// Options and positional arguments in parser order.
    fn options(&self) -> Vec<OptionSpec>;

    /// Registered actions; sub-parsers hang off their `choices`.
    fn actions(&self) -> Vec<Action<Self>>;
}

/// Settings handed to the code that constructs the parser for a docs build.
///
/// This is passed explicitly instead of toggling process environment, so
/// nothing needs restoring once the build finishes or fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildSettings {
    /// Program label the parser should use
    pub prog: String,
    /// The parser is being built for documentation, not for a real run
    pub docs_build: bool,
}

impl BuildSettings {
    /// Settings for a documentation build of `prog`.
    pub fn for_docs(prog: &str) -> Self {
        Self {
            prog: prog.to_string(),
            docs_build: true,
        }
    }
}

/// Entry point that constructs the parser to document.
///
/// Implemented for closures, so an orchestrator can hold a direct reference
/// to the construction routine.
pub trait ParserSource {
    /// Parser type produced.
    type Parser: ParserHandle;

    /// Builds the parser with the given settings.
    fn build(&self, settings: &BuildSettings) -> Result<Self::Parser>;
}

impl<F, P> ParserSource for F
where
    F: Fn(&BuildSettings) -> Result<P>,
    P: ParserHandle,
{
    type Parser = P;

    fn build(&self, settings: &BuildSettings) -> Result<P> {
        self(settings)
    }
}
