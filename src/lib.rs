// src/lib.rs
// Public library surface for the binaries and integration tests.

pub mod config;
pub mod ingest;
pub mod logging;
pub mod notify;
pub mod scheduler;
pub mod select;
pub mod store;

// ---- Re-exports for stable public API ----
pub use crate::config::RelayConfig;
pub use crate::ingest::types::{Entry, FeedSource};
pub use crate::notify::{telegram::TelegramNotifier, MessagePayload, PublishError, Publisher};
pub use crate::scheduler::{CycleOutcome, DelayRange, Relay};
pub use crate::select::select_next;
pub use crate::store::PostedStore;

use anyhow::Result;
use tracing::info;

use crate::ingest::config::load_sources_default;
use crate::ingest::providers::rss::{build_providers, feed_client};

/// Wire a relay from configuration: feed registry, posted set from disk and
/// the Telegram publisher. Fails on unreadable state or registry files.
pub async fn build_relay(cfg: &RelayConfig) -> Result<Relay<TelegramNotifier>> {
    let sources = load_sources_default()?;
    info!(feeds = sources.len(), "feed registry loaded");

    let client = feed_client()?;
    let providers = build_providers(&sources, &client);
    let store = PostedStore::load(cfg.posted_path.clone()).await?;

    let publisher = TelegramNotifier::new(cfg.bot_token.clone(), cfg.chat_id.clone())
        .with_base_url(cfg.api_base.clone())
        .with_timeout(cfg.publish_timeout_secs);

    Ok(Relay::new(providers, store, publisher, cfg.delay))
}
