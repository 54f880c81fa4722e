//! Command tree model and parser introspection for CLI documentation.
//!
//! This crate turns an argument parser into a normalized document model:
//!
//! - [`ParserHandle`]: the narrow capability set a parser must expose
//!   (name, description, epilog, help rendering, options, sub-parsers).
//! - [`introspect`] walks a parser and builds a [`CommandTree`].
//! - [`CommandTree`], [`CommandNode`] and [`OptionSpec`] form the model consumed
//!   by the renderers.
//! - [`DocumentRecord`]: a rendered file (relative path plus contents).
//!
//! Two parser implementations ship with the crate: [`StaticParser`], which
//! is plain data (and can be loaded from YAML or JSON), and `ClapParser`
//! (feature `clap`, on by default) for `clap::Command`.
//!
//! Validation ([`validate_tree`]) catches command names that cannot become
//! file names and malformed or duplicated flags.
//!
//! # Example
//!
//! ```
//! use command_docs_core::*;
//!
//! let root = StaticParser::new("borg", "borg").with_commands(
//!     "command",
//!     vec![
//!         StaticParser::new("create", "borg create")
//!             .with_usage("[-h] ARCHIVE")
//!             .with_option(OptionSpec::new(["-h", "--help"])),
//!         StaticParser::new("help", "borg help"),
//!     ],
//! );
//!
//! let tree = introspect(&root, &IntrospectOptions::default()).unwrap();
//! assert_eq!(tree.commands["create"].synopsis, "[-h] ARCHIVE");
//! assert_eq!(tree.documented(false).len(), 1); // "help" is never documented
//! assert!(validate_tree(&tree).is_empty());
//! ```

#[cfg(feature = "clap")]
mod clap_adapter;
mod error;
mod handle;
mod introspect;
mod static_parser;
mod types;
mod validate;

#[cfg(feature = "clap")]
pub use clap_adapter::ClapParser;
pub use error::{DocError, Result};
pub use handle::{Action, BuildSettings, HelpView, ParserHandle, ParserSource};
pub use introspect::{IntrospectOptions, introspect, normalize_block, normalize_synopsis};
pub use static_parser::{StaticAction, StaticChoice, StaticParser};
pub use types::*;
pub use validate::{ValidationError, command_name_problem, validate_tree};
