//! Shopfront interactive console.
//!
//! Reads one command per line from stdin and prints results to stdout.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin shopfront-console
//! shopfront> recommendations 1
//! shopfront> placeorder 1 1 10
//! shopfront> exit
//! ```

use anyhow::Context;
use shopfront::{Config, Console, init_tracing};
use shopfront_core::Storefront;
use shopfront_postgres::PostgresStorefront;
use tokio::io::BufReader;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = Config::from_env()?;
    let pool = config
        .postgres
        .connect()
        .await
        .context("Failed to connect to PostgreSQL")?;
    let store = PostgresStorefront::new(pool);
    store.bootstrap().await?;

    Console::new(&store, &config.export_dir)
        .run(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
        .await?;

    store.pool().close().await;
    Ok(())
}
