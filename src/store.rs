//! store.rs — durable set of links that were already published.
//!
//! The whole set is rewritten on every save as a sorted JSON array, via a
//! temp file and a rename so a crash mid-write never truncates the record.

use anyhow::{Context, Result};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tokio::fs;

pub const DEFAULT_POSTED_FILE: &str = "posted_messages.json";

#[derive(Debug)]
pub struct PostedStore {
    path: PathBuf,
    links: BTreeSet<String>,
    dirty: bool,
}

impl PostedStore {
    /// Empty store bound to `path`; nothing is read from disk.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            links: BTreeSet::new(),
            dirty: false,
        }
    }

    /// Load from `path`. A missing file is a first run and yields an empty set.
    pub async fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let links = match fs::read_to_string(&path).await {
            Ok(s) => parse_links(&s)
                .with_context(|| format!("parsing posted links from {}", path.display()))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeSet::new(),
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("reading posted links from {}", path.display()))
            }
        };
        tracing::info!(path = %path.display(), posted = links.len(), "posted set loaded");
        Ok(Self {
            path,
            links,
            dirty: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn contains(&self, link: &str) -> bool {
        self.links.contains(link)
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// True when the in-memory set holds links not yet written to disk.
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Returns false for blank or already-known links.
    pub fn insert(&mut self, link: &str) -> bool {
        let link = link.trim();
        if link.is_empty() {
            return false;
        }
        let added = self.links.insert(link.to_string());
        self.dirty |= added;
        added
    }

    /// Full overwrite of the backing file with the current set.
    pub async fn save(&mut self) -> Result<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .await
                .with_context(|| format!("creating {}", dir.display()))?;
        }

        let body = serde_json::to_vec_pretty(&self.links).context("serializing posted links")?;
        let tmp = tmp_path(&self.path);
        fs::write(&tmp, body)
            .await
            .with_context(|| format!("writing {}", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .await
            .with_context(|| format!("renaming {} into place", tmp.display()))?;

        self.dirty = false;
        Ok(())
    }

    /// Save only if something changed since the last successful save.
    pub async fn flush(&mut self) -> Result<()> {
        if self.dirty {
            self.save().await?;
        }
        Ok(())
    }
}

fn parse_links(s: &str) -> Result<BTreeSet<String>> {
    if s.trim().is_empty() {
        return Ok(BTreeSet::new());
    }
    let v: Vec<String> = serde_json::from_str(s)?;
    Ok(v
        .into_iter()
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .collect())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| DEFAULT_POSTED_FILE.into());
    name.push(".tmp");
    path.with_file_name(name)
}
