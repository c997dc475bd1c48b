//! Connection pool configuration.

use serde::{Deserialize, Serialize};
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions, PgSslMode};
use std::str::FromStr;
use std::time::Duration;

/// `PostgreSQL` connection settings.
///
/// Either `url` is set, or the discrete `host`/`port`/`user`/`password`/
/// `database` fields are used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostgresConfig {
    /// Full connection URL; takes precedence over the discrete fields
    pub url: Option<String>,
    /// Database host
    pub host: String,
    /// Database port
    pub port: u16,
    /// Role to connect as
    pub user: String,
    /// Password for `user`
    pub password: Option<String>,
    /// Database name
    pub database: String,
    /// SSL mode: disable, allow, prefer, require, verify-ca, verify-full
    pub ssl_mode: Option<String>,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Minimum number of idle connections in the pool
    pub min_connections: u32,
    /// Seconds to wait for a pooled connection
    pub connect_timeout: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            url: None,
            host: "localhost".to_string(),
            port: 5432,
            user: "postgres".to_string(),
            password: None,
            database: "shopfront".to_string(),
            ssl_mode: None,
            max_connections: 10,
            min_connections: 1,
            connect_timeout: 30,
        }
    }
}

impl PostgresConfig {
    /// Build sqlx connect options.
    ///
    /// # Errors
    ///
    /// Returns an error if `url` or `ssl_mode` cannot be parsed.
    pub fn connect_options(&self) -> Result<PgConnectOptions, sqlx::Error> {
        let mut options = match &self.url {
            Some(url) => PgConnectOptions::from_str(url)?,
            None => {
                let options = PgConnectOptions::new()
                    .host(&self.host)
                    .port(self.port)
                    .username(&self.user)
                    .database(&self.database);
                match &self.password {
                    Some(password) => options.password(password),
                    None => options,
                }
            }
        };
        if let Some(mode) = &self.ssl_mode {
            options = options.ssl_mode(PgSslMode::from_str(mode)?);
        }
        Ok(options)
    }

    /// Open a connection pool.
    ///
    /// # Errors
    ///
    /// Returns an error if the options are invalid or the database is unreachable.
    pub async fn connect(&self) -> Result<PgPool, sqlx::Error> {
        let options = self.connect_options()?;
        tracing::info!(
            host = options.get_host(),
            database = ?options.get_database(),
            max_connections = self.max_connections,
            "Connecting to PostgreSQL"
        );
        PgPoolOptions::new()
            .max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .acquire_timeout(Duration::from_secs(self.connect_timeout))
            .connect_with(options)
            .await
    }
}
