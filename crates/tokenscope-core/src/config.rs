//! Layered configuration.
//!
//! Resolution order (highest priority first):
//! 1. CLI flags (applied via [`Config::apply_cli_overrides`])
//! 2. Environment variables (`ANTHROPIC_API_KEY`, `TOKENSCOPE_*`)
//! 3. `tokenscope.toml` in the working directory, or the file given by `--config`
//! 4. Compiled defaults

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ScopeError, ScopeResult};

pub const CONFIG_FILE_NAME: &str = "tokenscope.toml";
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";
pub const DEFAULT_CLAUDE_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_MAX_CSS_BYTES: usize = 2 * 1024 * 1024;
pub const DEFAULT_DB_PATH: &str = ".tokenscope/tokenscope.db";
pub const DEFAULT_USER_ID: &str = "local";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub anthropic: AnthropicConfig,
    pub crawl: CrawlConfig,
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnthropicConfig {
    /// Claude strategies are used only when this is non-empty.
    pub api_key: String,
    pub model: String,
    /// Per-request timeout for Claude calls.
    pub timeout_secs: u64,
}

impl Default for AnthropicConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            timeout_secs: DEFAULT_CLAUDE_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlConfig {
    pub max_css_bytes: usize,
    pub timeout_secs: u64,
    pub max_stylesheets: usize,
    pub user_agent: String,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            max_css_bytes: DEFAULT_MAX_CSS_BYTES,
            timeout_secs: 20,
            max_stylesheets: 20,
            user_agent: format!("tokenscope/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub db_path: PathBuf,
    pub user_id: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            user_id: DEFAULT_USER_ID.to_string(),
        }
    }
}

/// Values from command-line flags; `None` leaves the lower layers alone.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub db_path: Option<PathBuf>,
    pub user_id: Option<String>,
    /// Force the heuristic strategies even when an API key is configured.
    pub heuristic_only: bool,
}

impl Config {
    /// Resolve the full configuration.
    ///
    /// An explicit `config_path` must exist; the default `tokenscope.toml` is
    /// optional.
    pub fn load(config_path: Option<&Path>, overrides: &CliOverrides) -> ScopeResult<Self> {
        let mut config = match config_path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = Path::new(CONFIG_FILE_NAME);
                if default_path.exists() {
                    Self::from_file(default_path)?
                } else {
                    Self::default()
                }
            }
        };

        config.apply_env(|key| std::env::var(key).ok());
        config.apply_cli_overrides(overrides);
        config.validate()?;

        debug!(
            claude = config.anthropic_enabled(),
            db = %config.storage.db_path.display(),
            user = %config.storage.user_id,
            "Configuration resolved"
        );
        Ok(config)
    }

    /// Parse a TOML file. Missing keys fall back to defaults.
    pub fn from_file(path: &Path) -> ScopeResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ScopeError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(toml_str: &str) -> ScopeResult<Self> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Apply environment overrides through `lookup`; empty values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = get("ANTHROPIC_API_KEY") {
            self.anthropic.api_key = key;
        }
        if let Some(model) = get("TOKENSCOPE_MODEL") {
            self.anthropic.model = model;
        }
        if let Some(path) = get("TOKENSCOPE_DB") {
            self.storage.db_path = PathBuf::from(path);
        }
        if let Some(user) = get("TOKENSCOPE_USER") {
            self.storage.user_id = user;
        }
    }

    pub fn apply_cli_overrides(&mut self, cli: &CliOverrides) {
        if let Some(path) = &cli.db_path {
            self.storage.db_path = path.clone();
        }
        if let Some(user) = &cli.user_id {
            self.storage.user_id = user.clone();
        }
        if cli.heuristic_only {
            self.anthropic.api_key.clear();
        }
    }

    pub fn validate(&self) -> ScopeResult<()> {
        if self.crawl.max_css_bytes == 0 {
            return Err(ScopeError::Config("crawl.max_css_bytes must be greater than 0".into()));
        }
        if self.crawl.max_stylesheets == 0 {
            return Err(ScopeError::Config("crawl.max_stylesheets must be greater than 0".into()));
        }
        if self.crawl.timeout_secs == 0 {
            return Err(ScopeError::Config("crawl.timeout_secs must be greater than 0".into()));
        }
        if self.anthropic.timeout_secs == 0 {
            return Err(ScopeError::Config("anthropic.timeout_secs must be greater than 0".into()));
        }
        if self.storage.user_id.trim().is_empty() {
            return Err(ScopeError::Config("storage.user_id must not be empty".into()));
        }
        Ok(())
    }

    /// Whether the Claude-backed strategies should be tried first.
    pub fn anthropic_enabled(&self) -> bool {
        !self.anthropic.api_key.trim().is_empty()
    }
}
