// src/ingest/parse.rs
//! Turns a feed document into parser-independent [`RawEntry`] records.

use anyhow::{Context, Result};
use feed_rs::model;
use feed_rs::parser;
use metrics::{counter, histogram};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::collections::HashSet;

use crate::ingest::types::{LinkRef, MediaRef, RawEntry};

/// Parse RSS 0.9x/1.0/2.0, Atom or JSON Feed bytes.
/// Item order follows document order.
pub fn parse_feed(bytes: &[u8]) -> Result<Vec<RawEntry>> {
    let t0 = std::time::Instant::now();
    let feed = parser::parse(bytes).context("parsing feed document")?;
    let enclosures = rss_enclosure_urls(bytes);

    let out: Vec<RawEntry> = feed
        .entries
        .into_iter()
        .map(|e| raw_from_model(e, &enclosures))
        .collect();

    let ms = t0.elapsed().as_secs_f64() * 1_000.0;
    histogram!("ingest_parse_ms").record(ms);
    counter!("ingest_entries_total").increment(out.len() as u64);
    Ok(out)
}

/// URLs of RSS `<enclosure>` elements that are not also `media:content`.
///
/// feed-rs reports both as media objects; these are moved back to `links`
/// with `rel="enclosure"` so the image rules can tell them apart.
fn rss_enclosure_urls(bytes: &[u8]) -> HashSet<String> {
    let mut enclosures = HashSet::new();
    let mut media_content = HashSet::new();

    let mut reader = Reader::from_reader(bytes);
    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                let qname = e.name();
                let is_enclosure = qname.as_ref() == b"enclosure";
                let is_media =
                    qname.prefix().is_some() && qname.local_name().as_ref() == b"content";
                if is_enclosure || is_media {
                    let url = e
                        .attributes()
                        .flatten()
                        .find(|a| a.key.as_ref() == b"url")
                        .and_then(|a| a.unescape_value().ok().map(|v| normalize_url(&v)));
                    match url {
                        Some(u) if is_enclosure => {
                            enclosures.insert(u);
                        }
                        Some(u) => {
                            media_content.insert(u);
                        }
                        None => {}
                    }
                }
            }
            Ok(Event::Eof) => break,
            // feed-rs already accepted the document; stop scanning on odd markup.
            Err(_) => break,
            _ => {}
        }
        buf.clear();
    }

    enclosures.retain(|u| !media_content.contains(u));
    enclosures
}

/// Same textual form feed-rs produces for media URLs.
fn normalize_url(raw: &str) -> String {
    let raw = raw.trim();
    url::Url::parse(raw)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| raw.to_string())
}

fn raw_from_model(entry: model::Entry, enclosures: &HashSet<String>) -> RawEntry {
    let mut links: Vec<LinkRef> = entry
        .links
        .into_iter()
        .map(|l| LinkRef {
            href: l.href,
            rel: l.rel,
            media_type: l.media_type,
        })
        .collect();
    let link = primary_link(&links);

    let mut media = Vec::new();
    for c in entry.media.into_iter().flat_map(|m| m.content) {
        let url = c.url.map(|u| u.to_string());
        let content_type = c.content_type.map(|t| t.to_string());
        match url {
            Some(href) if enclosures.contains(&href) => links.push(LinkRef {
                href,
                rel: Some("enclosure".to_string()),
                media_type: content_type,
            }),
            url => media.push(MediaRef { url, content_type }),
        }
    }

    let summary = entry
        .summary
        .map(|s| s.content)
        .or_else(|| entry.content.and_then(|c| c.body));

    RawEntry {
        title: entry.title.map(|t| t.content),
        link,
        summary,
        published: entry.published.or(entry.updated),
        media,
        links,
    }
}

/// The article link: first `alternate` (or relation-less) link, else the
/// first link that is not an enclosure.
fn primary_link(links: &[LinkRef]) -> Option<String> {
    let usable = |l: &&LinkRef| !l.href.trim().is_empty();
    links
        .iter()
        .filter(usable)
        .find(|l| matches!(l.rel.as_deref(), None | Some("alternate")))
        .or_else(|| {
            links
                .iter()
                .filter(usable)
                .find(|l| l.rel.as_deref() != Some("enclosure"))
        })
        .map(|l| l.href.trim().to_string())
}
