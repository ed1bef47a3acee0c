//! Configuration loading and management for insightai.
//!
//! Loads settings from `insightai.toml` with environment variable overrides for sensitive data.
//! A missing config file is not an error: the service must stay reachable without one.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default model used when a request does not name one
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Default upstream timeout for LLM calls, in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const CONFIG_FILE: &str = "insightai.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// LLM provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Model identifier (e.g., "gpt-4o-mini")
    pub model: String,
    /// Upper bound on a single provider call
    pub timeout_secs: u64,
    /// Provider API root, without the trailing endpoint
    pub base_url: String,
}

/// API keys configuration (loaded from environment)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ApiConfig {
    #[serde(default)]
    pub openai_key: Option<String>,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to listen on
    pub bind: String,
    /// Largest request body accepted, uploads included
    pub max_upload_bytes: usize,
    /// Characters of extracted text echoed back by `/extract`
    pub preview_chars: usize,
}

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub agent: AgentConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

impl Config {
    /// Load configuration from the default location (insightai.toml in cwd or home),
    /// falling back to defaults when no file exists.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match Self::find_config_file() {
            Some(path) => Self::read_file(&path)?,
            None => Config::default(),
        };
        config.apply_env();
        Ok(config)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::read_file(path)?;
        config.apply_env();
        Ok(config)
    }

    fn read_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Override settings from environment variables
    fn apply_env(&mut self) {
        if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            self.api.openai_key = Some(key);
        }
        if let Ok(url) = std::env::var("OPENAI_BASE_URL") {
            self.agent.base_url = url;
        }
        if let Ok(model) = std::env::var("INSIGHTAI_MODEL") {
            self.agent.model = model;
        }
        if let Ok(bind) = std::env::var("INSIGHTAI_BIND") {
            self.server.bind = bind;
        }
    }

    /// Find the config file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        // Check current directory first
        let local_config = PathBuf::from(CONFIG_FILE);
        if local_config.exists() {
            return Some(local_config);
        }

        // Check home directory
        let home_config = dirs::home_dir()?
            .join(".config")
            .join("insightai")
            .join(CONFIG_FILE);
        home_config.exists().then_some(home_config)
    }

    /// The provider credential, if one is configured.
    ///
    /// A blank key counts as missing so that `OPENAI_API_KEY=` selects dry-run mode.
    pub fn api_key(&self) -> Option<&str> {
        self.api
            .openai_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8000".to_string(),
            max_upload_bytes: 20 * 1024 * 1024,
            preview_chars: 2000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_documented_values() {
        let config = Config::default();
        assert_eq!(config.agent.model, "gpt-4o-mini");
        assert_eq!(config.agent.timeout_secs, 60);
        assert_eq!(config.server.preview_chars, 2000);
        assert!(config.api_key().is_none());
    }

    #[test]
    fn partial_file_keeps_defaults_for_missing_keys() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server]\nbind = \"127.0.0.1:9000\"").unwrap();

        let config = Config::read_file(file.path()).unwrap();
        assert_eq!(config.server.bind, "127.0.0.1:9000");
        assert_eq!(config.server.max_upload_bytes, 20 * 1024 * 1024);
        assert_eq!(config.agent.model, DEFAULT_MODEL);
    }

    #[test]
    fn load_from_reads_the_given_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server]\npreview_chars = 500\n\n[agent]\ntimeout_secs = 5").unwrap();

        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.server.preview_chars, 500);
        assert_eq!(config.agent.timeout_secs, 5);
    }

    #[test]
    fn load_from_missing_path_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load_from(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::ReadError(_)));
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[agent\nmodel = ").unwrap();

        let err = Config::read_file(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn blank_key_counts_as_missing() {
        let mut config = Config::default();
        config.api.openai_key = Some("   ".to_string());
        assert!(config.api_key().is_none());

        config.api.openai_key = Some("sk-test".to_string());
        assert_eq!(config.api_key(), Some("sk-test"));
    }
}
