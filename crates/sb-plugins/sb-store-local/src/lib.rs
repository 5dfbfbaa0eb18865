//! # sb-store-local
//! signboard/crates/sb-plugins/sb-store-local/src/lib.rs
//! Local implementations of `KeyValueStore`.
//! `MemoryStore` lives for the process; `JsonFileStore` keeps one JSON document
//! per key on disk and replaces it atomically on every write.

use std::path::{Path, PathBuf};

use anyhow::Context;
use async_trait::async_trait;
use dashmap::DashMap;
use sb_core::traits::KeyValueStore;
use tokio::fs;

/// Process-local store, mostly for tests and throwaway displays.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: DashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        Ok(self.entries.get(key).map(|entry| entry.value().clone()))
    }

    async fn put(&self, key: &str, value: String) -> anyhow::Result<()> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> anyhow::Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

pub struct JsonFileStore {
    /// Directory holding one `<key>.json` per key (e.g., "./data/store")
    root_path: PathBuf,
}

impl JsonFileStore {
    /// Creates the root directory if it does not exist yet.
    pub async fn open(root: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let root_path = root.into();
        fs::create_dir_all(&root_path)
            .await
            .with_context(|| format!("creating store directory {}", root_path.display()))?;
        tracing::debug!(root = %root_path.display(), "json file store opened");
        Ok(Self { root_path })
    }

    pub fn root(&self) -> &Path {
        &self.root_path
    }

    /// Maps a key to its file, refusing keys that could escape the root.
    fn key_path(&self, key: &str) -> anyhow::Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        anyhow::ensure!(valid, "invalid store key {key:?}");
        Ok(self.root_path.join(format!("{key}.json")))
    }
}

#[async_trait]
impl KeyValueStore for JsonFileStore {
    async fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        let path = self.key_path(key)?;
        match fs::read_to_string(&path).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("reading {}", path.display())),
        }
    }

    /// Writes to a sibling temp file and renames it over the target, so a reader
    /// sees either the old document or the new one, never a torn write.
    async fn put(&self, key: &str, value: String) -> anyhow::Result<()> {
        let path = self.key_path(key)?;
        let tmp_path = path.with_extension("json.tmp");

        fs::write(&tmp_path, value.as_bytes())
            .await
            .with_context(|| format!("writing {}", tmp_path.display()))?;
        fs::rename(&tmp_path, &path)
            .await
            .with_context(|| format!("replacing {}", path.display()))?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> anyhow::Result<()> {
        let path = self.key_path(key)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("removing {}", path.display())),
        }
    }
}
