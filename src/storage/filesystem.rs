//! File-Backed Keyed Store
//!
//! Information Hiding:
//! - On-disk layout (one JSON document per store) hidden from users
//! - Write-through persistence hidden behind the trait
//!
//! Loads the full document at open and rewrites it on every mutation; the
//! stores here hold tens of entries (remembered application paths), not
//! datasets.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tokio::fs;
use tokio::sync::RwLock;

use super::KeyedStore;

/// Keyed store persisted as a single JSON object on disk
pub struct FileStore {
    path: PathBuf,
    entries: RwLock<BTreeMap<String, String>>,
}

impl FileStore {
    /// Open the store at `path`, creating parent directories as needed.
    /// A missing file is an empty store, not an error.
    pub async fn open(path: PathBuf) -> Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .context("Failed to create store directory")?;
        }

        let entries = if path.exists() {
            let json = fs::read_to_string(&path)
                .await
                .with_context(|| format!("Failed to read store file {:?}", path))?;
            serde_json::from_str(&json)
                .with_context(|| format!("Store file {:?} is not valid JSON", path))?
        } else {
            BTreeMap::new()
        };

        tracing::debug!(path = ?path, "opened file store");
        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    async fn persist(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        let json = serde_json::to_string_pretty(entries).context("Failed to serialize store")?;
        fs::write(&self.path, json)
            .await
            .with_context(|| format!("Failed to write store file {:?}", self.path))?;
        Ok(())
    }
}

#[async_trait]
impl KeyedStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.read().await;
        Ok(entries.get(key).cloned())
    }

    async fn put(&self, key: &str, value: String) -> Result<()> {
        let mut entries = self.entries.write().await;
        entries.insert(key.to_string(), value);
        self.persist(&entries).await?;
        tracing::debug!(key, path = ?self.path, "stored persistent entry");
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.write().await;
        if entries.remove(key).is_some() {
            self.persist(&entries).await?;
        }
        Ok(())
    }

    async fn entries(&self) -> Result<Vec<(String, String)>> {
        let entries = self.entries.read().await;
        Ok(entries.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
    }
}
