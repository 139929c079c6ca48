//! Picks the next entry to publish.

use crate::ingest::types::Entry;
use crate::store::PostedStore;

/// Newest unseen entry with a non-empty link.
///
/// Undated entries rank below every dated one. On equal timestamps the
/// entry fetched first wins. Pure: neither argument is modified.
pub fn select_next<'a>(entries: &'a [Entry], posted: &PostedStore) -> Option<&'a Entry> {
    let mut best: Option<&Entry> = None;
    for e in entries {
        let link = e.link.trim();
        if link.is_empty() || posted.contains(link) {
            continue;
        }
        // Option<DateTime> orders None below any Some.
        match best {
            Some(b) if e.published_at <= b.published_at => {}
            _ => best = Some(e),
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn entry(link: &str, day: Option<u32>) -> Entry {
        Entry {
            title: link.to_uppercase(),
            link: link.into(),
            summary: String::new(),
            source: "Test".into(),
            published_at: day.map(|d| Utc.with_ymd_and_hms(2024, 1, d, 12, 0, 0).unwrap()),
            image_url: None,
        }
    }

    #[test]
    fn newest_unseen_wins() {
        let entries = vec![entry("a", Some(1)), entry("b", Some(3)), entry("c", Some(2))];
        let posted = PostedStore::new("unused.json");
        assert_eq!(select_next(&entries, &posted).unwrap().link, "b");
    }

    #[test]
    fn posted_links_are_never_returned() {
        let entries = vec![entry("a", Some(1)), entry("b", Some(3))];
        let mut posted = PostedStore::new("unused.json");
        posted.insert("b");
        assert_eq!(select_next(&entries, &posted).unwrap().link, "a");
        posted.insert("a");
        assert!(select_next(&entries, &posted).is_none());
    }

    #[test]
    fn undated_only_when_nothing_dated_is_left() {
        let entries = vec![entry("undated", None), entry("old", Some(1))];
        let mut posted = PostedStore::new("unused.json");
        assert_eq!(select_next(&entries, &posted).unwrap().link, "old");
        posted.insert("old");
        assert_eq!(select_next(&entries, &posted).unwrap().link, "undated");
    }

    #[test]
    fn empty_links_are_skipped() {
        let entries = vec![entry("", Some(9)), entry("  ", Some(8)), entry("ok", None)];
        let posted = PostedStore::new("unused.json");
        assert_eq!(select_next(&entries, &posted).unwrap().link, "ok");
    }

    #[test]
    fn padded_link_matches_its_posted_form() {
        let entries = vec![entry(" https://a.example/1 ", Some(4))];
        let mut posted = PostedStore::new("unused.json");
        assert!(select_next(&entries, &posted).is_some());
        posted.insert(&entries[0].link);
        assert!(select_next(&entries, &posted).is_none());
    }

    #[test]
    fn ties_keep_fetch_order() {
        let entries = vec![entry("first", Some(5)), entry("second", Some(5))];
        let posted = PostedStore::new("unused.json");
        assert_eq!(select_next(&entries, &posted).unwrap().link, "first");

        let undated = vec![entry("x", None), entry("y", None)];
        assert_eq!(select_next(&undated, &posted).unwrap().link, "x");
    }
}
