//! Configuration management for Reflog
//!
//! This module handles loading, parsing, validating, and managing
//! configuration from files, environment variables, and CLI overrides.

use crate::error::{Result, ReflogError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure for Reflog
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// HTTP server and database settings
    #[serde(default)]
    pub server: ServerConfig,
    /// Language model provider settings
    #[serde(default)]
    pub provider: ProviderConfig,
    /// Coaching dialogue limits
    #[serde(default)]
    pub coach: CoachConfig,
    /// Log output settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// TCP address to bind
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// SQLite database file. When unset, `reflog.db` in the platform data
    /// directory is used.
    #[serde(default)]
    pub database_path: Option<PathBuf>,
}

fn default_bind_address() -> String {
    "127.0.0.1:3000".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            database_path: None,
        }
    }
}

/// OpenAI-compatible chat completion provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// API base URL; `/chat/completions` is appended
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Model to request
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Name of the environment variable holding the API key.
    ///
    /// The key itself is never stored in the config file and is read at
    /// call time.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// HTTP client timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

fn default_api_base() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_timeout_seconds() -> u64 {
    120
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            model: default_model(),
            temperature: default_temperature(),
            api_key_env: default_api_key_env(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

/// Limits for the coaching dialogue
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoachConfig {
    /// Assistant messages per session, including the closing summary
    #[serde(default = "default_max_assistant_messages")]
    pub max_assistant_messages: usize,

    /// Maximum characters accepted in a single user message
    #[serde(default = "default_max_message_chars")]
    pub max_message_chars: usize,

    /// Characters of the first user message kept as the session title
    #[serde(default = "default_title_max_chars")]
    pub title_max_chars: usize,
}

fn default_max_assistant_messages() -> usize {
    3
}

fn default_max_message_chars() -> usize {
    2000
}

fn default_title_max_chars() -> usize {
    32
}

impl Default for CoachConfig {
    fn default() -> Self {
        Self {
            max_assistant_messages: default_max_assistant_messages(),
            max_message_chars: default_max_message_chars(),
            title_max_chars: default_title_max_chars(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `tracing` filter used when `RUST_LOG` is not set
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit newline-delimited JSON instead of human-readable lines
    #[serde(default)]
    pub json_format: bool,
}

fn default_log_level() -> String {
    "reflog=info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json_format: false,
        }
    }
}

impl Config {
    /// Load configuration from file with environment and CLI overrides
    ///
    /// A missing file is not an error; defaults are used instead.
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed
    pub fn load(path: &str, cli: &crate::cli::Cli) -> Result<Self> {
        let mut config = if Path::new(path).exists() {
            Self::from_file(path)?
        } else {
            tracing::warn!("Config file not found at {}, using defaults", path);
            Self::default()
        };

        config.apply_env_vars();
        config.apply_cli_overrides(cli);

        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ReflogError::Config(format!("Failed to read config file: {}", e)))?;
        serde_yaml::from_str(&contents)
            .map_err(|e| ReflogError::Config(format!("Failed to parse config: {}", e)).into())
    }

    fn apply_env_vars(&mut self) {
        if let Ok(bind) = std::env::var("REFLOG_BIND") {
            self.server.bind_address = bind;
        }

        if let Ok(db) = std::env::var("REFLOG_DATABASE") {
            tracing::debug!(database = %db, "Env override: REFLOG_DATABASE");
            self.server.database_path = Some(PathBuf::from(db));
        }

        if let Ok(api_base) = std::env::var("REFLOG_API_BASE") {
            self.provider.api_base = api_base;
        }

        if let Ok(model) = std::env::var("REFLOG_MODEL") {
            self.provider.model = model;
        }

        if let Ok(level) = std::env::var("REFLOG_LOG_LEVEL") {
            self.logging.level = level;
        }

        if let Ok(json_logs) = std::env::var("REFLOG_JSON_LOGS") {
            match json_logs.parse::<bool>() {
                Ok(v) => self.logging.json_format = v,
                Err(_) => {
                    tracing::warn!("Invalid value for REFLOG_JSON_LOGS: {}", json_logs);
                }
            }
        }
    }

    fn apply_cli_overrides(&mut self, cli: &crate::cli::Cli) {
        if let Some(db) = &cli.database {
            self.server.database_path = Some(PathBuf::from(db));
        }

        if cli.verbose {
            self.logging.level = "reflog=debug".to_string();
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns `ReflogError::Config` describing the first invalid setting
    pub fn validate(&self) -> Result<()> {
        if self.server.bind_address.trim().is_empty() {
            return Err(
                ReflogError::Config("server.bind_address cannot be empty".to_string()).into(),
            );
        }

        if self.provider.model.trim().is_empty() {
            return Err(ReflogError::Config("provider.model cannot be empty".to_string()).into());
        }

        if !(0.0..=2.0).contains(&self.provider.temperature) {
            return Err(ReflogError::Config(
                "provider.temperature must be between 0.0 and 2.0".to_string(),
            )
            .into());
        }

        if self.provider.timeout_seconds == 0 {
            return Err(ReflogError::Config(
                "provider.timeout_seconds must be greater than 0".to_string(),
            )
            .into());
        }

        if self.coach.max_assistant_messages == 0 {
            return Err(ReflogError::Config(
                "coach.max_assistant_messages must be greater than 0".to_string(),
            )
            .into());
        }

        if self.coach.max_message_chars == 0 {
            return Err(ReflogError::Config(
                "coach.max_message_chars must be greater than 0".to_string(),
            )
            .into());
        }

        if self.coach.title_max_chars == 0 {
            return Err(ReflogError::Config(
                "coach.title_max_chars must be greater than 0".to_string(),
            )
            .into());
        }

        Ok(())
    }
}
