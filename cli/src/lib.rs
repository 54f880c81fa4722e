//! Orchestration for the `command-docs` tool.
//!
//! [`Orchestrator`] ties the pieces together: it builds the parser through a
//! [`ParserSource`](command_docs_core::ParserSource), introspects it, renders
//! usage fragments and man pages, and writes them below the directories named
//! in [`DocsConfig`].

pub mod config;
pub mod orchestrator;

pub use config::{DocsConfig, SOURCE_DATE_EPOCH_ENV, load_parser_definition, source_date_epoch_from_env};
pub use orchestrator::{GenerationSummary, Orchestrator, write_documents};
