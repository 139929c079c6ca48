// src/ingest/config.rs
//! Optional replacement for the built-in feed registry.
//!
//! A feeds file is either a bare list of `{ name, url }` rows or a table with
//! a `feeds` list; TOML files can only use the table form.

use anyhow::{anyhow, bail, Context, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::ingest::sources::default_sources;
use crate::ingest::types::FeedSource;

const ENV_PATH: &str = "FEEDS_CONFIG_PATH";
const FALLBACK_PATHS: &[&str] = &["config/feeds.toml", "config/feeds.json"];

#[derive(Deserialize)]
#[serde(untagged)]
enum FeedsFile {
    Table { feeds: Vec<FeedSource> },
    List(Vec<FeedSource>),
}

impl FeedsFile {
    fn into_sources(self) -> Vec<FeedSource> {
        match self {
            FeedsFile::Table { feeds } | FeedsFile::List(feeds) => feeds,
        }
    }
}

/// Read a feeds file; `.toml` is parsed as TOML, anything else as JSON.
pub fn load_sources_from(path: &Path) -> Result<Vec<FeedSource>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading feeds from {}", path.display()))?;
    let is_toml = path
        .extension()
        .and_then(|s| s.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("toml"));

    let file: FeedsFile = if is_toml {
        toml::from_str(&content).with_context(|| format!("parsing {}", path.display()))?
    } else {
        serde_json::from_str(&content).with_context(|| format!("parsing {}", path.display()))?
    };

    let sources = clean_list(file.into_sources());
    if sources.is_empty() {
        bail!("{} lists no feeds", path.display());
    }
    Ok(sources)
}

/// `$FEEDS_CONFIG_PATH` if set (it must exist), else the first of
/// `config/feeds.toml` / `config/feeds.json` present, else the built-in table.
pub fn load_sources_default() -> Result<Vec<FeedSource>> {
    if let Ok(p) = std::env::var(ENV_PATH) {
        let pb = PathBuf::from(p);
        if !pb.exists() {
            return Err(anyhow!("FEEDS_CONFIG_PATH points to non-existent path"));
        }
        return load_sources_from(&pb);
    }
    match FALLBACK_PATHS.iter().map(Path::new).find(|p| p.exists()) {
        Some(p) => load_sources_from(p),
        None => Ok(default_sources()),
    }
}

/// Trim, drop blank rows, keep the first row for a repeated name.
fn clean_list(items: Vec<FeedSource>) -> Vec<FeedSource> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .map(|it| FeedSource::new(it.name.trim(), it.url.trim()))
        .filter(|it| !it.name.is_empty() && !it.url.is_empty())
        .filter(|it| seen.insert(it.name.clone()))
        .collect()
}
