//! Runs a single relay cycle (no sleep) and exits. Handy for cron and smoke tests.

use anyhow::Result;
use feed_relay::{build_relay, logging, CycleOutcome, RelayConfig};

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    logging::init_tracing();

    let cfg = RelayConfig::from_env()?;
    let mut relay = build_relay(&cfg).await?;

    match relay.run_cycle().await {
        CycleOutcome::Idle => println!("relay-once: nothing new"),
        CycleOutcome::Published { link } => println!("relay-once: posted {link}"),
        CycleOutcome::PublishFailed { link } => {
            anyhow::bail!("relay-once: publishing {link} failed")
        }
    }

    // A failed save was logged inside the cycle; surface it as an exit code here.
    if relay.store().is_dirty() {
        anyhow::bail!(
            "relay-once: posted set not saved to {}",
            relay.store().path().display()
        );
    }
    Ok(())
}
