//! Source (sourcebook) selection and its persistence.
//!
//! The selection is an explicit [`Sources`] value handed to every query.
//! [`SourceSelection`] owns the current value and writes it through a
//! [`SourceStore`] on every change.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Store key holding the JSON-encoded array of selected document slugs.
pub const SOURCES_KEY: &str = "sources";

pub const DEFAULT_SOURCES: [&str; 1] = ["wotc-srd"];

/// Ordered list of document slugs to include results from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sources(Vec<String>);

impl Sources {
    /// Blank slugs are dropped; they would send an empty `document__slug__in`.
    pub fn new(slugs: Vec<String>) -> Self {
        Self(
            slugs
                .into_iter()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        )
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, slug: &str) -> bool {
        self.0.iter().any(|s| s == slug)
    }

    /// Comma-joined form used for `document__slug__in`.
    pub fn joined(&self) -> String {
        self.0.join(",")
    }
}

impl<S: Into<String>> From<Vec<S>> for Sources {
    fn from(slugs: Vec<S>) -> Self {
        Self::new(slugs.into_iter().map(Into::into).collect())
    }
}

impl std::fmt::Display for Sources {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.joined())
    }
}

/// Key-value string store backing the selection.
pub trait SourceStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&self, key: &str, value: &str) -> Result<()>;
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    values: DashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SourceStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).map(|v| v.clone()))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Store persisted as a flat JSON object on disk.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load_all(&self) -> Result<HashMap<String, String>> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(HashMap::new());
        }
        match serde_json::from_str(&content) {
            Ok(all) => Ok(all),
            Err(e) => {
                // Treated as empty so the next `set` rewrites the file.
                tracing::warn!(path = %self.path.display(), error = %e, "store file is corrupt, ignoring it");
                Ok(HashMap::new())
            }
        }
    }
}

impl SourceStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.load_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut all = self.load_all()?;
        all.insert(key.to_string(), value.to_string());
        if let Some(dir) = self.path.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(&all)?)?;
        Ok(())
    }
}

/// The current selection plus the store it is persisted to.
#[derive(Debug)]
pub struct SourceSelection<S: SourceStore> {
    store: S,
    current: Sources,
}

impl<S: SourceStore> SourceSelection<S> {
    /// Reads the persisted selection once, falling back to `defaults` when
    /// nothing is stored or the stored value is not a JSON string array.
    pub fn load(store: S, defaults: &Sources) -> Result<Self> {
        let current = match store.get(SOURCES_KEY)? {
            Some(raw) => match serde_json::from_str::<Sources>(&raw) {
                Ok(sources) => sources,
                Err(e) => {
                    tracing::warn!(error = %e, "stored source selection is unreadable, using defaults");
                    defaults.clone()
                }
            },
            None => defaults.clone(),
        };
        tracing::debug!(sources = %current, "loaded source selection");
        Ok(Self { store, current })
    }

    pub fn current(&self) -> &Sources {
        &self.current
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Replaces the selection and persists it.
    pub fn set(&mut self, sources: Sources) -> Result<()> {
        self.store
            .set(SOURCES_KEY, &serde_json::to_string(&sources)?)?;
        tracing::info!(sources = %sources, "source selection changed");
        self.current = sources;
        Ok(())
    }

    /// Adds `slug` if not selected yet. Returns whether it changed anything.
    pub fn add(&mut self, slug: &str) -> Result<bool> {
        let slug = slug.trim();
        if slug.is_empty() || self.current.contains(slug) {
            return Ok(false);
        }
        let mut next = self.current.0.clone();
        next.push(slug.to_string());
        self.set(Sources(next))?;
        Ok(true)
    }

    /// Removes `slug` if selected. Returns whether it changed anything.
    pub fn remove(&mut self, slug: &str) -> Result<bool> {
        if !self.current.contains(slug) {
            return Ok(false);
        }
        let next = self.current.0.iter().filter(|s| *s != slug).cloned().collect();
        self.set(Sources(next))?;
        Ok(true)
    }
}
