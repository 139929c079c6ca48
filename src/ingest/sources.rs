//! Built-in feed registry, used when no feeds file is configured.

use crate::ingest::types::FeedSource;

/// Tech and Linux news feeds, in fetch order.
pub const DEFAULT_FEEDS: &[(&str, &str)] = &[
    ("Phoronix", "https://www.phoronix.com/rss.php"),
    ("OMG Ubuntu", "https://www.omgubuntu.co.uk/feed/"),
    ("TechCrunch", "https://techcrunch.com/feed/"),
    ("Wired", "https://www.wired.com/feed/rss"),
    ("Ars Technica", "https://feeds.arstechnica.com/arstechnica/index"),
    ("Linux Today", "http://www.linuxtoday.com/feed"),
];

pub fn default_sources() -> Vec<FeedSource> {
    DEFAULT_FEEDS
        .iter()
        .map(|(name, url)| FeedSource::new(*name, *url))
        .collect()
}
