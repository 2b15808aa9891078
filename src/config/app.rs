//! Application configuration loading.
//!
//! Settings come from an optional TOML file (`config.toml` by default, or the
//! path in `APP_CONFIG`) and are then overridden by environment variables, which
//! `main` populates from `.env` when present.

use crate::config::database::DEFAULT_DATABASE_URL;
use crate::errors::{Error, Result};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::Path;

/// Public dump of the product transaction dataset.
pub const DEFAULT_SEED_SOURCE_URL: &str =
    "https://s3.amazonaws.com/roxiler.com/product_transaction.json";

/// Runtime settings for the reporting service
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    /// `SeaORM` connection string
    pub database_url: String,
    /// Interface to bind
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Where `/seeddata` downloads the dataset from
    pub seed_source_url: String,
    /// `*` for any origin, otherwise a comma-separated list
    pub cors_origins: String,
    /// Timeout for the seed download, in seconds
    pub fetch_timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            host: "0.0.0.0".to_string(),
            port: 5000,
            seed_source_url: DEFAULT_SEED_SOURCE_URL.to_string(),
            cors_origins: "*".to_string(),
            fetch_timeout_secs: 30,
        }
    }
}

impl AppConfig {
    /// Socket address built from `host` and `port`.
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| Error::Config {
                message: format!("Invalid bind address {}:{}: {e}", self.host, self.port),
            })
    }

    /// Applies overrides from a key lookup, normally `std::env::var`.
    ///
    /// Taking the lookup as a closure keeps this testable without touching the
    /// process environment.
    pub fn apply_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("DATABASE_URL") {
            self.database_url = url;
        }
        if let Some(host) = lookup("HOST") {
            self.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.port = port.trim().parse().map_err(|e| Error::Config {
                message: format!("PORT must be a port number, got {port:?}: {e}"),
            })?;
        }
        if let Some(url) = lookup("SEED_SOURCE_URL") {
            self.seed_source_url = url;
        }
        if let Some(origins) = lookup("CORS_ORIGINS") {
            self.cors_origins = origins;
        }
        if let Some(secs) = lookup("FETCH_TIMEOUT_SECS") {
            self.fetch_timeout_secs = secs.trim().parse().map_err(|e| Error::Config {
                message: format!("FETCH_TIMEOUT_SECS must be a number, got {secs:?}: {e}"),
            })?;
        }
        Ok(self)
    }
}

/// Loads configuration from a TOML file.
///
/// # Errors
/// Returns an error if the file cannot be read or the TOML is invalid.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path_ref = path.as_ref();
    tracing::debug!("Attempting to load configuration from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {path_ref:?}: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse TOML from config file {path_ref:?}: {e}"),
    })
}

/// Loads the full application configuration.
///
/// A missing file is not an error: defaults are used and env vars still apply.
pub fn load_app_configuration() -> Result<AppConfig> {
    let path = std::env::var("APP_CONFIG").unwrap_or_else(|_| "config.toml".to_string());
    let base = if Path::new(&path).exists() {
        load_config(&path)?
    } else {
        tracing::info!("No config file at {path}, using defaults");
        AppConfig::default()
    };

    base.apply_overrides(|key| std::env::var(key).ok())
}
