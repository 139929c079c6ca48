// src/ingest/providers/rss.rs
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;

use crate::ingest::parse::parse_feed;
use crate::ingest::types::{FeedSource, RawEntry, SourceProvider};

/// Identifying header sent with every feed request.
pub const USER_AGENT: &str = "Mozilla/5.0 (LibertyBot/1.0)";
const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Shared HTTP client for feed fetches.
pub fn feed_client() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(FETCH_TIMEOUT)
        .build()
        .context("building feed http client")
}

/// RSS/Atom provider backed by either an HTTP URL or an in-memory document.
pub struct RssProvider {
    name: String,
    mode: Mode,
}

enum Mode {
    Fixture(String),
    Http { url: String, client: reqwest::Client },
}

impl RssProvider {
    pub fn from_source(source: &FeedSource, client: reqwest::Client) -> Self {
        Self {
            name: source.name.clone(),
            mode: Mode::Http {
                url: source.url.clone(),
                client,
            },
        }
    }

    pub fn from_fixture(name: impl Into<String>, xml: &str) -> Self {
        Self {
            name: name.into(),
            mode: Mode::Fixture(xml.to_string()),
        }
    }
}

#[async_trait]
impl SourceProvider for RssProvider {
    async fn fetch_latest(&self) -> Result<Vec<RawEntry>> {
        match &self.mode {
            Mode::Fixture(s) => parse_feed(s.as_bytes()),
            Mode::Http { url, client } => {
                let body = client
                    .get(url)
                    .send()
                    .await
                    .with_context(|| format!("{} http get()", self.name))?
                    .error_for_status()
                    .with_context(|| format!("{} http status", self.name))?
                    .bytes()
                    .await
                    .with_context(|| format!("{} http .bytes()", self.name))?;
                parse_feed(&body).with_context(|| format!("{} feed", self.name))
            }
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// One HTTP provider per registry entry, sharing `client`.
pub fn build_providers(
    sources: &[FeedSource],
    client: &reqwest::Client,
) -> Vec<Box<dyn SourceProvider>> {
    sources
        .iter()
        .map(|s| Box::new(RssProvider::from_source(s, client.clone())) as Box<dyn SourceProvider>)
        .collect()
}
