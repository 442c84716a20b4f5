//! Configuration file support for lokafit
//!
//! Supports TOML configuration files with the following search order:
//! 1. `--config <path>` - explicitly specified path
//! 2. `./lokafit.toml` - current directory
//! 3. `~/.config/lokafit/config.toml` - user config
//! 4. Default values
//!
//! The `ENVIRONMENT` variable overrides the `environment` key.
//!
//! # Example Configuration
//!
//! ```toml
//! environment = "production"
//!
//! [server]
//! port = 8000
//! bind = "0.0.0.0"
//! upload_limit = 10485760
//! cors_origins = ["https://lokafit.vercel.app", "https://*.vercel.app"]
//!
//! [logging]
//! level = "info"
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

#[cfg(feature = "web")]
use crate::web::{CorsConfig, ServerConfig};

/// Name of the environment variable selecting the deployment environment
pub const ENVIRONMENT_VAR: &str = "ENVIRONMENT";

/// Configuration file errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error reading config file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parse error
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// File not found
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),
}

/// Deployment environment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    pub fn as_str(self) -> &'static str {
        match self {
            Environment::Development => "development",
            Environment::Production => "production",
        }
    }

    /// Log level used when nothing else selects one
    pub fn default_log_level(self) -> &'static str {
        match self {
            Environment::Development => "debug",
            Environment::Production => "info",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(format!("Unknown environment: {}", other)),
        }
    }
}

/// HTTP server configuration options
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ServerSection {
    /// Port to listen on
    #[serde(default)]
    pub port: Option<u16>,

    /// Address to bind to
    #[serde(default)]
    pub bind: Option<String>,

    /// Maximum upload size in bytes
    #[serde(default)]
    pub upload_limit: Option<usize>,

    /// Enable CORS handling
    #[serde(default)]
    pub cors_enabled: Option<bool>,

    /// Allowed CORS origins; `*.` wildcards are accepted
    #[serde(default)]
    pub cors_origins: Option<Vec<String>>,
}

/// Logging configuration options
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LoggingSection {
    /// Filter directive such as `info` or `lokafit=debug`
    #[serde(default)]
    pub level: Option<String>,
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Deployment environment
    #[serde(default)]
    pub environment: Option<Environment>,

    /// Server settings
    #[serde(default)]
    pub server: ServerSection,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingSection,
}

impl Config {
    /// Create a new default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from the default search path
    ///
    /// Search order:
    /// 1. `./lokafit.toml`
    /// 2. `~/.config/lokafit/config.toml`
    /// 3. Default values (if no file found)
    pub fn load() -> Result<Self, ConfigError> {
        for path in Self::search_paths() {
            if path.exists() {
                return Self::load_from_path(&path);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file path
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Get config file search paths
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("lokafit.toml")];

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("lokafit").join("config.toml"));
        }

        paths
    }

    /// Apply an `ENVIRONMENT` value; unparsable values are ignored
    pub fn with_environment_override(mut self, value: Option<&str>) -> Self {
        if let Some(env) = value.and_then(|v| v.parse().ok()) {
            self.environment = Some(env);
        }
        self
    }

    /// Apply the `ENVIRONMENT` variable of the current process
    pub fn apply_env(self) -> Self {
        let value = std::env::var(ENVIRONMENT_VAR).ok();
        self.with_environment_override(value.as_deref())
    }

    /// Effective environment
    pub fn environment(&self) -> Environment {
        self.environment.unwrap_or_default()
    }

    /// Log filter from the config file, else the environment default
    pub fn log_filter(&self) -> String {
        self.logging
            .level
            .clone()
            .unwrap_or_else(|| self.environment().default_log_level().to_string())
    }

    /// Convert to ServerConfig
    #[cfg(feature = "web")]
    pub fn to_server_config(&self) -> ServerConfig {
        let mut config = ServerConfig::default();

        if let Some(port) = self.server.port {
            config = config.with_port(port);
        }
        if let Some(bind) = &self.server.bind {
            config = config.with_bind(bind.clone());
        }
        if let Some(limit) = self.server.upload_limit {
            config = config.with_upload_limit(limit);
        }
        if let Some(origins) = &self.server.cors_origins {
            config = config.with_cors_origins(origins.clone());
        }
        if self.server.cors_enabled == Some(false) {
            config = config.with_cors_disabled();
        }

        config
    }

    /// Merge with CLI arguments (CLI takes precedence)
    #[cfg(feature = "web")]
    pub fn merge_with_cli(&self, cli: &CliOverrides) -> ServerConfig {
        let mut config = self.to_server_config();

        if let Some(port) = cli.port {
            config = config.with_port(port);
        }
        if let Some(bind) = &cli.bind {
            config = config.with_bind(bind.clone());
        }
        if let Some(limit) = cli.upload_limit {
            config = config.with_upload_limit(limit);
        }
        if let Some(origins) = &cli.cors_origins {
            config = config.with_cors(CorsConfig::strict(origins.clone()));
        }
        if cli.no_cors {
            config = config.with_cors_disabled();
        }

        config
    }
}

/// CLI override values for merging with config file
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub port: Option<u16>,
    pub bind: Option<String>,
    /// Upload limit in bytes
    pub upload_limit: Option<usize>,
    pub cors_origins: Option<Vec<String>>,
    pub no_cors: bool,
}

impl CliOverrides {
    /// Create new empty overrides
    pub fn new() -> Self {
        Self::default()
    }

    /// Set port override
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Set bind address override
    pub fn with_bind(mut self, bind: impl Into<String>) -> Self {
        self.bind = Some(bind.into());
        self
    }

    /// Set upload limit override in bytes
    pub fn with_upload_limit(mut self, limit: usize) -> Self {
        self.upload_limit = Some(limit);
        self
    }

    /// Set CORS origins override
    pub fn with_cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = Some(origins);
        self
    }

    /// Disable CORS regardless of the config file
    pub fn with_no_cors(mut self, no_cors: bool) -> Self {
        self.no_cors = no_cors;
        self
    }
}
