use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
    /// Required for store output, unused for file output.
    pub database: Option<DatabaseConfig>,
    /// Credential sets, selected by the 1-based `--index` argument.
    pub authentication: Vec<AuthConfig>,
    pub parameters: Parameters,
    pub report: Option<ReportConfig>,
}

#[derive(Debug, Deserialize)]
pub struct DatabaseConfig {
    pub server: String,
    pub port: u16,
    pub database: String,
}

#[derive(Debug, Deserialize)]
pub struct AuthConfig {
    pub bearer: String,
}

#[derive(Debug, Deserialize)]
pub struct Parameters {
    /// Posts requested per search page.
    pub count: u32,
    /// Hard cap on posts fetched per keyword phrase.
    pub max_number: u64,
    /// Minutes to block when the API reports a rate limit.
    pub rate_limit_window: u64,
    /// Days covered by the implicit date window.
    pub date_range: i64,
    pub file_path: PathBuf,
    pub log_path: PathBuf,
    pub output: OutputConfig,
    /// Attribute names projected into every persisted record, in order.
    pub tweet_attributes: Vec<String>,
    /// Keyword phrases per language code, phrases joined by "OR".
    pub keywords: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OutputConfig {
    /// Append-only CSV file named `<name>_<lang>_<date>.csv`.
    Csv { name: String },
    /// Upsert-keyed collection `twitter_<lang>`.
    Mongo,
}

#[derive(Debug, Deserialize)]
pub struct ReportConfig {
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
}

impl Config {
    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let conf_contents = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("failed to read config {}", path.as_ref().display()))?;
        Ok(toml::from_str(&conf_contents)?)
    }

    pub fn bearer(&self, index: usize) -> Result<&str> {
        self.authentication
            .get(index.checked_sub(1).ok_or_else(|| anyhow!("credential index starts at 1"))?)
            .map(|a| a.bearer.as_str())
            .ok_or_else(|| anyhow!("no credential set with index {}", index))
    }

    pub fn keywords_for(&self, lang: &str) -> Result<&str> {
        self.parameters
            .keywords
            .get(lang)
            .map(|s| s.as_str())
            .ok_or_else(|| anyhow!("no keywords configured for language {}", lang))
    }
}
