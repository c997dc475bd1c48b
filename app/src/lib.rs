//! # Shopfront
//!
//! Application wiring for the Shopfront order API: configuration, the
//! interactive console and tracing setup shared by the two binaries.
//!
//! - `shopfront-server` serves the HTTP API from [`shopfront_web`].
//! - `shopfront-console` runs the line-oriented [`console`].
//!
//! Both connect to `PostgreSQL`, run the bootstrap and then hand the store to
//! their front end.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod console;

pub use config::{Config, ConfigError, ServerConfig};
pub use console::{Command, Console, ConsoleError};

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,shopfront=debug,sqlx=warn";

/// Install the global tracing subscriber.
///
/// Logs go to stderr so the console's stdout carries only command output.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
