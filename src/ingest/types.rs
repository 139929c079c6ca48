// src/ingest/types.rs
use anyhow::Result;
use chrono::{DateTime, Utc};

/// One entry of the feed registry.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub struct FeedSource {
    pub name: String, // e.g., "Phoronix"
    pub url: String,
}

impl FeedSource {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

/// A `media:content` (or RSS enclosure) attachment as the parser reported it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MediaRef {
    pub url: Option<String>,
    pub content_type: Option<String>,
}

/// A `<link>` element with its relation and declared MIME type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkRef {
    pub href: String,
    pub rel: Option<String>,
    pub media_type: Option<String>,
}

/// Parser output for a single item, before normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawEntry {
    pub title: Option<String>,
    pub link: Option<String>,
    pub summary: Option<String>, // raw markup
    pub published: Option<DateTime<Utc>>,
    pub media: Vec<MediaRef>,
    pub links: Vec<LinkRef>,
}

/// A normalized entry, tagged with the feed it came from.
///
/// `link` is the identity used for deduplication; it is empty when the feed
/// item had no usable link, and such entries are never selected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub title: String,
    pub link: String,
    pub summary: String, // raw markup, cleaned at format time
    pub source: String,
    pub published_at: Option<DateTime<Utc>>,
    pub image_url: Option<String>,
}

#[async_trait::async_trait]
pub trait SourceProvider: Send + Sync {
    async fn fetch_latest(&self) -> Result<Vec<RawEntry>>;
    fn name(&self) -> &str;
}
