// src/ingest/mod.rs
pub mod config;
pub mod normalize;
pub mod parse;
pub mod providers;
pub mod sources;
pub mod types;

pub use normalize::{clean_summary, extract_image};

use crate::ingest::types::{Entry, SourceProvider};
use metrics::{counter, describe_counter, describe_histogram};
use once_cell::sync::OnceCell;

/// One-time metrics registration (so series show up once a recorder exists).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("ingest_entries_total", "Total entries parsed from feeds.");
        describe_counter!(
            "ingest_provider_errors_total",
            "Feed fetch/parse errors."
        );
        describe_counter!("ingest_empty_feeds_total", "Feeds that yielded no entries.");
        describe_histogram!("ingest_parse_ms", "Feed parse time in milliseconds.");
    });
}

/// Fetch every provider in order and tag each entry with its source name.
///
/// A failing or empty feed is logged and skipped; it never aborts the batch.
pub async fn fetch_all(providers: &[Box<dyn SourceProvider>]) -> Vec<Entry> {
    ensure_metrics_described();

    let mut entries = Vec::new();
    for p in providers {
        match p.fetch_latest().await {
            Ok(raw) if raw.is_empty() => {
                tracing::info!(source = p.name(), "no entries found");
                counter!("ingest_empty_feeds_total").increment(1);
            }
            Ok(raw) => {
                tracing::info!(source = p.name(), entries = raw.len(), "fetched entries");
                entries.extend(raw.into_iter().map(|r| Entry::from_raw(r, p.name())));
            }
            Err(e) => {
                tracing::warn!(error = ?e, source = p.name(), "feed error");
                counter!("ingest_provider_errors_total").increment(1);
            }
        }
    }
    entries
}
