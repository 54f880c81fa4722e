//! Renderers turning a [`CommandTree`](command_docs_core::CommandTree) into
//! documentation files.
//!
//! - [`UsageDocRenderer`] writes one reStructuredText include fragment per
//!   command (`usage/<name>.rst.inc`).
//! - [`ManPageRenderer`] writes one troff man page per command
//!   (`<prog>-<name>.1`), using [`OptionFormatter`] for the synopsis and
//!   option listing.
//!
//! Renderers return [`DocumentRecord`](command_docs_core::DocumentRecord)s
//! and never touch the filesystem. Problems with a single command are
//! collected in a [`RenderReport`] instead of failing the whole run.

mod escape;
mod man;
mod report;
mod rst;

pub use escape::{RoffText, escape_rst, escape_troff, escape_troff_block, unescape_troff};
pub use man::{MAN_SECTION, ManMeta, ManPageRenderer, OptionFormatter, page_name, resolve_build_date};
pub use report::{RenderError, RenderReport};
pub use rst::{USAGE_DIR, UsageDocRenderer, extract_literal_block};
