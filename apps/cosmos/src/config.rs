//! # Configuration
//!
//! Settings come from four layers, later layers winning:
//!
//! 1. built-in defaults
//! 2. an optional TOML file (`--config cosmos.toml`)
//! 3. environment variables
//! 4. command-line flags (applied by the CLI module)
//!
//! ## Example file
//!
//! ```toml
//! [server]
//! host = "0.0.0.0"
//! port = 5555
//!
//! [storage]
//! backend = "redb"
//! database = "cosmos.db"
//!
//! [http]
//! cors_origins = ["http://localhost:3000"]
//! rate_limit = 100
//! ```
//!
//! ## Environment variables
//!
//! - `COSMOS_HOST`, `COSMOS_PORT`
//! - `COSMOS_BACKEND` (`redb` or `memory`)
//! - `COSMOS_DB`, or `DB_URI` (an optional `redb://` prefix is stripped)
//! - `COSMOS_CORS_ORIGINS`: comma-separated origins, or `*` for all
//! - `COSMOS_RATE_LIMIT`: requests per second, `0` disables limiting

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default request body limit (2 MiB).
pub const DEFAULT_BODY_LIMIT: usize = 2 * 1024 * 1024;

/// Default rate limit in requests per second.
pub const DEFAULT_RATE_LIMIT: u32 = 100;

// =============================================================================
// ERRORS
// =============================================================================

/// Errors raised while loading settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value for {key}: {value:?}")]
    InvalidEnv { key: &'static str, value: String },
}

// =============================================================================
// SETTINGS
// =============================================================================

/// Storage backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// redb database file (ACID, persistent).
    #[default]
    Redb,
    /// In-memory tables (volatile).
    Memory,
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Redb => f.write_str("redb"),
            Self::Memory => f.write_str("memory"),
        }
    }
}

impl std::str::FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "redb" => Ok(Self::Redb),
            "memory" => Ok(Self::Memory),
            other => Err(other.to_string()),
        }
    }
}

/// Listener address.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5555,
        }
    }
}

impl ServerSettings {
    /// `host:port` for binding.
    #[must_use]
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Where the catalog lives.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    pub backend: Backend,
    pub database: PathBuf,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            backend: Backend::Redb,
            database: PathBuf::from("cosmos.db"),
        }
    }
}

/// HTTP middleware settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HttpSettings {
    /// Allowed CORS origins. Empty means localhost only; `["*"]` allows all.
    pub cors_origins: Vec<String>,
    /// Requests per second; `0` disables rate limiting.
    pub rate_limit: u32,
    /// Maximum request body size in bytes.
    pub body_limit: usize,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            cors_origins: Vec::new(),
            rate_limit: DEFAULT_RATE_LIMIT,
            body_limit: DEFAULT_BODY_LIMIT,
        }
    }
}

/// All settings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub storage: StorageSettings,
    pub http: HttpSettings,
}

impl Settings {
    /// Load defaults, then the file (if given), then the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut settings = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        settings.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(settings)
    }

    /// Parse a TOML settings file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Parse TOML settings text. Missing keys keep their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Apply environment-style overrides read through `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("COSMOS_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("COSMOS_PORT") {
            self.server.port = parse_env("COSMOS_PORT", port)?;
        }
        if let Some(backend) = lookup("COSMOS_BACKEND") {
            self.storage.backend = backend
                .parse()
                .map_err(|value| ConfigError::InvalidEnv {
                    key: "COSMOS_BACKEND",
                    value,
                })?;
        }
        if let Some(database) = lookup("COSMOS_DB") {
            self.storage.database = PathBuf::from(database);
        } else if let Some(uri) = lookup("DB_URI") {
            let path = uri.strip_prefix("redb://").unwrap_or(&uri);
            self.storage.database = PathBuf::from(path);
        }
        if let Some(origins) = lookup("COSMOS_CORS_ORIGINS") {
            self.http.cors_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(str::to_string)
                .collect();
        }
        if let Some(limit) = lookup("COSMOS_RATE_LIMIT") {
            self.http.rate_limit = parse_env("COSMOS_RATE_LIMIT", limit)?;
        }
        Ok(())
    }
}

fn parse_env<T: std::str::FromStr>(key: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidEnv { key, value })
}

// =============================================================================
// TESTS
// =============================================================================
