//! Configuration management for Shopfront.
//!
//! Loads configuration from environment variables (after reading `.env`)
//! with sensible defaults.

use serde::{Deserialize, Serialize};
use shopfront_postgres::PostgresConfig;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

/// An environment variable held a value that could not be parsed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid value for {var}: '{value}'")]
pub struct ConfigError {
    /// Variable name
    pub var: &'static str,
    /// Offending value
    pub value: String,
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// `PostgreSQL` configuration
    pub postgres: PostgresConfig,
    /// HTTP server configuration
    pub server: ServerConfig,
    /// Directory CSV exports are written to
    pub export_dir: PathBuf,
}

/// Server configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,
    /// Port to bind to
    pub port: u16,
}

impl ServerConfig {
    /// `host:port` to bind the listener to.
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Config {
    /// Load configuration from `.env` and the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a numeric variable cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "Loaded .env");
        }
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a numeric variable cannot be parsed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = PostgresConfig::default();

        Ok(Self {
            postgres: PostgresConfig {
                url: lookup("DATABASE_URL"),
                host: lookup("DB_HOST").unwrap_or(defaults.host),
                port: parse_or(&lookup, "DB_PORT", defaults.port)?,
                user: lookup("DB_USER").unwrap_or(defaults.user),
                password: lookup("DB_PASSWORD"),
                database: lookup("DB_NAME").unwrap_or(defaults.database),
                ssl_mode: Some(lookup("DB_SSL_MODE").unwrap_or_else(|| "prefer".to_string())),
                max_connections: parse_or(
                    &lookup,
                    "DATABASE_MAX_CONNECTIONS",
                    defaults.max_connections,
                )?,
                min_connections: parse_or(
                    &lookup,
                    "DATABASE_MIN_CONNECTIONS",
                    defaults.min_connections,
                )?,
                connect_timeout: parse_or(
                    &lookup,
                    "DATABASE_CONNECT_TIMEOUT",
                    defaults.connect_timeout,
                )?,
            },
            server: ServerConfig {
                host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                port: parse_or(&lookup, "PORT", 3000)?,
            },
            export_dir: lookup("EXPORT_DIR").map_or_else(|| PathBuf::from("."), PathBuf::from),
        })
    }
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(var) {
        Some(value) => value.trim().parse().map_err(|_| ConfigError { var, value }),
        None => Ok(default),
    }
}
