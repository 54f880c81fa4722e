//! Documentation run configuration.
//!
//! Loaded from a YAML file; command-line flags override individual fields.
//!
//! # Example YAML
//!
//! ```yaml
//! prog: borg
//! author: The Borg Collective
//! author_email: borgbackup@python.org
//! homepage: https://borgbackup.org/
//! docs_dir: docs
//! man_dir: docs/man
//! include_nested: false
//! ```

use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use command_docs_core::{DocError, Result, StaticParser};
use command_docs_render::ManMeta;
use serde::{Deserialize, Serialize};

/// Environment variable carrying the build timestamp override.
pub const SOURCE_DATE_EPOCH_ENV: &str = "SOURCE_DATE_EPOCH";

/// Settings for one documentation run.
///
/// Every field has a default, so a partial file is valid.
///
/// # Examples
///
/// ```
/// use command_docs_cli::DocsConfig;
///
/// let config: DocsConfig = serde_yaml::from_str("prog: borg\nauthor: Someone\n").unwrap();
/// assert_eq!(config.prog, "borg");
/// assert_eq!(config.docs_dir.to_str(), Some("docs"));
/// assert!(!config.include_nested);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocsConfig {
    /// Program label; the parser's own name when empty
    pub prog: String,
    /// Author credited in man pages
    pub author: String,
    /// Author contact address
    pub author_email: Option<String>,
    /// Project homepage
    pub homepage: String,
    /// Root of the documentation tree; usage fragments go to `<docs_dir>/usage`
    pub docs_dir: PathBuf,
    /// Directory receiving man pages
    pub man_dir: PathBuf,
    /// Document nested commands too
    pub include_nested: bool,
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            prog: String::new(),
            author: String::new(),
            author_email: None,
            homepage: String::new(),
            docs_dir: PathBuf::from("docs"),
            man_dir: PathBuf::from("docs/man"),
            include_nested: false,
        }
    }
}

impl DocsConfig {
    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`DocError::Io`] if the file cannot be read, or
    /// [`DocError::Yaml`] if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let config = serde_yaml::from_reader(reader)?;
        Ok(config)
    }

    /// Saves the configuration as YAML.
    ///
    /// # Errors
    ///
    /// Returns [`DocError::Io`] if the file cannot be written, or
    /// [`DocError::Yaml`] if serialization fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }

    /// The configured program label, or `default_prog` when none is set.
    pub fn prog_or<'a>(&'a self, default_prog: &'a str) -> &'a str {
        let prog = self.prog.trim();
        if prog.is_empty() {
            default_prog
        } else {
            prog
        }
    }

    /// Builds man page metadata, falling back to `default_prog` when no
    /// program label is configured.
    ///
    /// # Errors
    ///
    /// Returns [`DocError::Configuration`] when the author or homepage is
    /// missing.
    pub fn man_meta(&self, default_prog: &str, build_date: NaiveDate) -> Result<ManMeta> {
        if self.author.trim().is_empty() {
            return Err(DocError::Configuration(
                "man pages need an author".to_string(),
            ));
        }
        if self.homepage.trim().is_empty() {
            return Err(DocError::Configuration(
                "man pages need a homepage".to_string(),
            ));
        }

        let mut meta = ManMeta::new(self.prog_or(default_prog), &self.author, &self.homepage)
            .with_build_date(build_date);
        if let Some(email) = self.author_email.as_deref().filter(|e| !e.trim().is_empty()) {
            meta = meta.with_email(email);
        }
        Ok(meta)
    }
}

/// Reads the build timestamp override from `SOURCE_DATE_EPOCH`.
///
/// An unset or empty variable means no override.
///
/// # Errors
///
/// Returns [`DocError::Configuration`] if the value is not an integer.
pub fn source_date_epoch_from_env() -> Result<Option<i64>> {
    parse_epoch(std::env::var(SOURCE_DATE_EPOCH_ENV).ok().as_deref())
}

fn parse_epoch(value: Option<&str>) -> Result<Option<i64>> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(raw) => raw.parse::<i64>().map(Some).map_err(|err| {
            DocError::Configuration(format!("{SOURCE_DATE_EPOCH_ENV}={raw:?} is not a timestamp: {err}"))
        }),
    }
}

/// Loads a parser description from a YAML or JSON file.
///
/// Files ending in `.json` are read as JSON, everything else as YAML.
///
/// # Errors
///
/// Returns [`DocError::Io`], [`DocError::Json`] or [`DocError::Yaml`].
pub fn load_parser_definition(path: impl AsRef<Path>) -> Result<StaticParser> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if is_json {
        Ok(serde_json::from_str(&text)?)
    } else {
        Ok(serde_yaml::from_str(&text)?)
    }
}
