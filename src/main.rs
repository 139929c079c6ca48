//! Feed relay daemon — binary entrypoint.
//! Loads configuration, then runs the fetch/publish loop until killed.

use anyhow::Result;
use feed_relay::{build_relay, logging, RelayConfig};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env if present; real environment variables win.
    let _ = dotenvy::dotenv();

    logging::init_tracing();

    // Missing credentials abort here, before the loop starts.
    let cfg = RelayConfig::from_env()?;
    tracing::info!(config = ?cfg, "starting feed relay");

    let relay = build_relay(&cfg).await?;
    relay.run().await;
    Ok(())
}
