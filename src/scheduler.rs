// src/scheduler.rs
//! The relay loop: fetch → select → publish → persist → sleep, forever.

use metrics::{counter, describe_counter};
use once_cell::sync::OnceCell;
use rand::Rng;
use std::time::Duration;

use crate::ingest::{self, types::SourceProvider};
use crate::notify::{MessagePayload, Publisher};
use crate::select::select_next;
use crate::store::PostedStore;

/// Inclusive bounds for the pause between cycles, in seconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DelayRange {
    pub min_secs: u64,
    pub max_secs: u64,
}

impl Default for DelayRange {
    /// Two to three hours.
    fn default() -> Self {
        Self {
            min_secs: 2 * 3600,
            max_secs: 3 * 3600,
        }
    }
}

impl DelayRange {
    /// Bounds given in the wrong order are swapped.
    pub fn new(min_secs: u64, max_secs: u64) -> Self {
        Self {
            min_secs: min_secs.min(max_secs),
            max_secs: min_secs.max(max_secs),
        }
    }

    pub fn sample<R: Rng>(&self, rng: &mut R) -> Duration {
        Duration::from_secs(rng.random_range(self.min_secs..=self.max_secs))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Nothing unseen to publish.
    Idle,
    Published { link: String },
    /// Not recorded as posted; it stays eligible next cycle.
    PublishFailed { link: String },
}

fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("relay_cycles_total", "Relay cycles run.");
        describe_counter!("relay_published_total", "Entries published.");
        describe_counter!("relay_publish_errors_total", "Failed publish attempts.");
        describe_counter!(
            "relay_persist_errors_total",
            "Failed writes of the posted set."
        );
    });
}

pub struct Relay<P: Publisher> {
    providers: Vec<Box<dyn SourceProvider>>,
    store: PostedStore,
    publisher: P,
    delay: DelayRange,
}

impl<P: Publisher> Relay<P> {
    pub fn new(
        providers: Vec<Box<dyn SourceProvider>>,
        store: PostedStore,
        publisher: P,
        delay: DelayRange,
    ) -> Self {
        Self {
            providers,
            store,
            publisher,
            delay,
        }
    }

    pub fn store(&self) -> &PostedStore {
        &self.store
    }

    pub fn publisher(&self) -> &P {
        &self.publisher
    }

    /// One pass without the trailing sleep.
    pub async fn run_cycle(&mut self) -> CycleOutcome {
        ensure_metrics_described();
        counter!("relay_cycles_total").increment(1);

        // A save that failed earlier is retried before anything new happens.
        self.persist().await;

        let entries = ingest::fetch_all(&self.providers).await;
        let Some(entry) = select_next(&entries, &self.store) else {
            tracing::info!(fetched = entries.len(), "no new entries available to post");
            return CycleOutcome::Idle;
        };

        let payload = MessagePayload::for_entry(entry);
        let link = entry.link.trim().to_string();
        tracing::info!(
            source = %entry.source,
            link = %link,
            with_image = payload.image_url.is_some(),
            "publishing newest unseen entry"
        );

        match self.publisher.publish(&payload).await {
            Ok(()) => {
                counter!("relay_published_total").increment(1);
                tracing::info!(link = %link, "message posted");
                self.store.insert(&link);
                self.persist().await;
                CycleOutcome::Published { link }
            }
            Err(e) => {
                counter!("relay_publish_errors_total").increment(1);
                tracing::warn!(error = %e, link = %link, "publish failed, will retry next cycle");
                CycleOutcome::PublishFailed { link }
            }
        }
    }

    /// Cycle, sleep a random delay, repeat. Only process termination stops it.
    pub async fn run(mut self) {
        loop {
            self.run_cycle().await;

            let delay = self.delay.sample(&mut rand::rng());
            tracing::info!(
                delay_secs = delay.as_secs(),
                "sleeping for {:.2} hours",
                delay.as_secs_f64() / 3600.0
            );
            tokio::time::sleep(delay).await;
        }
    }

    async fn persist(&mut self) {
        if !self.store.is_dirty() {
            return;
        }
        if let Err(e) = self.store.flush().await {
            counter!("relay_persist_errors_total").increment(1);
            tracing::error!(
                error = ?e,
                path = %self.store.path().display(),
                "saving posted set failed, will retry next cycle"
            );
        }
    }
}
