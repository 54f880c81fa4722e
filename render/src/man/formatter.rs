//! Troff rendering of usage lines, option group headings and options.

use command_docs_core::OptionSpec;

use crate::escape::{RoffText, escape_troff, escape_troff_block};

/// Separator between synonym flags of one option.
const FLAG_SEPARATOR: &str = ", ";

/// Formats the synopsis and option listing of a man page.
///
/// Stateless: every method depends only on its arguments.
///
/// # Examples
///
/// ```
/// use command_docs_core::OptionSpec;
/// use command_docs_render::OptionFormatter;
///
/// let formatter = OptionFormatter;
/// let option = OptionSpec::new(["-s", "--stats"]).with_help("print statistics");
/// assert_eq!(
///     formatter.format_option(&option).as_str(),
///     ".TP\n.B \\-s, \\-\\-stats\nprint statistics\n"
/// );
/// assert_eq!(formatter.format_heading(0, "borg").as_str(), "");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct OptionFormatter;

impl OptionFormatter {
    /// Escapes a captured usage line.
    ///
    /// The result is final troff; it must not be passed through
    /// [`escape_troff`] again.
    pub fn format_usage(&self, raw: &str) -> RoffText {
        escape_troff(raw)
    }

    /// Renders an option group heading.
    ///
    /// Level 0 is the implicit root group and renders as nothing.
    pub fn format_heading(&self, level: usize, heading: &str) -> RoffText {
        if level == 0 {
            return RoffText::new();
        }
        let mut out = RoffText::request(".TP");
        out.push(&escape_troff_block(&heading.to_uppercase()));
        out.newline();
        out
    }

    /// Renders one option with its help text.
    ///
    /// Help lines starting with `.` or `'` are guarded so troff prints them.
    pub fn format_option(&self, option: &OptionSpec) -> RoffText {
        let mut out = RoffText::request(".TP");
        out.push_literal(".B ");
        out.push(&escape_troff(&option.flags.join(FLAG_SEPARATOR)));
        out.newline();
        if let Some(help) = option.help.as_deref().filter(|h| !h.trim().is_empty()) {
            out.push(&escape_troff_block(help.trim_end()));
            out.newline();
        }
        out
    }

    /// Renders all options, grouped by consecutive heading.
    ///
    /// Options without a heading belong to the root group (level 0); named
    /// groups are level 1.
    pub fn format_options(&self, options: &[OptionSpec]) -> RoffText {
        let mut out = RoffText::new();
        let mut current: Option<Option<&str>> = None;

        for option in options {
            let heading = option.heading.as_deref();
            if current != Some(heading) {
                match heading {
                    Some(title) => out.push(&self.format_heading(1, title)),
                    None => out.push(&self.format_heading(0, "")),
                }
                current = Some(heading);
            }
            out.push(&self.format_option(option));
        }

        out
    }
}
