pub mod telegram;

use crate::ingest::clean_summary;
use crate::ingest::types::Entry;

/// What goes out to the channel: HTML text, plus an optional photo URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessagePayload {
    pub text: String,
    pub image_url: Option<String>,
}

impl MessagePayload {
    pub fn for_entry(entry: &Entry) -> Self {
        Self {
            text: format_message(entry),
            image_url: entry.image_url.clone(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    /// Connection, TLS or timeout failure. The URL (which embeds the bot token) is stripped.
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("HTTP {status}: {description}")]
    Status { status: u16, description: String },
    #[error("rejected: {0}")]
    Rejected(String),
}

impl From<reqwest::Error> for PublishError {
    fn from(e: reqwest::Error) -> Self {
        Self::Transport(e.without_url())
    }
}

#[async_trait::async_trait]
pub trait Publisher: Send + Sync {
    async fn publish(&self, payload: &MessagePayload) -> Result<(), PublishError>;
}

/// `<b>title</b> (source)`, the cleaned summary, then a "Read more" link.
///
/// Title and source are escaped; the summary keeps whatever markup survives
/// `clean_summary`.
pub fn format_message(entry: &Entry) -> String {
    let title = html_escape::encode_text(&entry.title);
    let source = html_escape::encode_text(&entry.source);
    let summary = clean_summary(&entry.summary);
    let href = html_escape::encode_double_quoted_attribute(&entry.link);
    format!("<b>{title}</b> ({source})\n{summary}\n<a href=\"{href}\">Read more</a>")
}
