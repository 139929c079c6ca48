// src/ingest/normalize.rs
use once_cell::sync::OnceCell;
use regex::Regex;

use crate::ingest::types::{Entry, RawEntry};

pub const NO_TITLE: &str = "No Title";

/// Strip `<p>`/`</p>` and `<img>` tags (the Telegram HTML mode rejects both),
/// then decode HTML entities.
pub fn clean_summary(raw: &str) -> String {
    static RE_P: OnceCell<Regex> = OnceCell::new();
    static RE_IMG: OnceCell<Regex> = OnceCell::new();
    let re_p = RE_P.get_or_init(|| Regex::new(r"(?i)</?p(?:\s[^>]*)?/?>").unwrap());
    let re_img = RE_IMG.get_or_init(|| Regex::new(r"(?i)<img\b[^>]*>").unwrap());

    let out = re_p.replace_all(raw, "");
    let out = re_img.replace_all(&out, "");
    html_escape::decode_html_entities(&out).into_owned()
}

/// First match wins:
/// 1) a media-content attachment exposing a URL
/// 2) an `enclosure` link whose declared type mentions "image"
pub fn extract_image(raw: &RawEntry) -> Option<String> {
    if let Some(url) = raw
        .media
        .iter()
        .filter_map(|m| m.url.as_deref())
        .find(|u| !u.trim().is_empty())
    {
        return Some(url.to_string());
    }

    raw.links
        .iter()
        .find(|l| {
            l.rel.as_deref() == Some("enclosure")
                && l.media_type.as_deref().is_some_and(|t| t.contains("image"))
                && !l.href.trim().is_empty()
        })
        .map(|l| l.href.clone())
}

impl Entry {
    pub fn from_raw(raw: RawEntry, source: &str) -> Self {
        let image_url = extract_image(&raw);
        let title = raw
            .title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| NO_TITLE.to_string());
        Self {
            title,
            link: raw.link.map(|l| l.trim().to_string()).unwrap_or_default(),
            summary: raw.summary.unwrap_or_default(),
            source: source.to_string(),
            published_at: raw.published,
            image_url,
        }
    }
}
