//! CLI configuration types.
//!
//! Configuration is read from `.dictool.toml` in the working directory unless
//! another file is given with `--config`. Every field is optional.
//!
//! # Configuration File Format
//!
//! ```toml
//! format = "markdown"
//! columns = ["name", "description", "type", "constraints", "format"]
//! suggested_columns = 2
//! fetch_timeout_secs = 10
//! output = "dictionary.md"
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::ValueEnum;
use schemadict::Column;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Default configuration file name.
pub const DEFAULT_CONFIG_FILE: &str = ".dictool.toml";

/// Rendering format for the data dictionary.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema, ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Aligned plain-text table.
    #[default]
    Table,
    /// Comma separated values.
    Csv,
    /// GitHub flavored Markdown.
    Markdown,
    /// Table model and keyword stats as JSON.
    Json,
}

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(default)]
pub struct DictConfig {
    /// Output format.
    pub format: OutputFormat,
    /// Column ids in display order.
    ///
    /// Fixed columns are `category`, `name`, `description`, `type`, `enum`,
    /// `constraints` and `required`; any other id shows that schema keyword.
    /// Empty means the default column set.
    pub columns: Vec<String>,
    /// Number of most used free keywords appended as extra columns.
    pub suggested_columns: usize,
    /// Timeout for each URL fetch, in seconds.
    pub fetch_timeout_secs: u64,
    /// Write output to this file instead of stdout.
    pub output: Option<PathBuf>,
}

impl Default for DictConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            columns: Vec::new(),
            suggested_columns: 0,
            fetch_timeout_secs: 30,
            output: None,
        }
    }
}

impl DictConfig {
    /// Load configuration from an explicitly given `path`, or from
    /// [`DEFAULT_CONFIG_FILE`] when `None`.
    ///
    /// Only a missing default file falls back to defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit file does not exist, or if the file
    /// cannot be read or parsed.
    pub async fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let path = match path {
            Some(path) => {
                if !path.exists() {
                    bail!("config file {} not found", path.display());
                }
                path
            }
            None => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if !path.exists() {
                    debug!("no config at {}, using defaults", path.display());
                    return Ok(Self::default());
                }
                path
            }
        };

        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: DictConfig = toml::from_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        info!("loaded config from {}", path.display());
        Ok(config)
    }

    /// Configured columns, or the default set when none are configured.
    ///
    /// An entry may itself be a comma separated list.
    pub fn base_columns(&self) -> Vec<Column> {
        let columns: Vec<Column> = self
            .columns
            .iter()
            .flat_map(|entry| Column::parse_list(entry))
            .collect();
        if columns.is_empty() {
            Column::defaults()
        } else {
            columns
        }
    }

    /// JSON Schema describing this configuration file.
    pub fn json_schema() -> anyhow::Result<String> {
        let schema = schemars::schema_for!(DictConfig);
        Ok(serde_json::to_string_pretty(&schema)?)
    }
}
