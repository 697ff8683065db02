//! Keyed Store Abstraction
//!
//! Information Hiding:
//! - Backend data structures and persistence formats hidden behind the trait
//! - Swappable between in-memory and file-backed without touching tools
//!
//! Replaces the implicit class-level dictionaries the original assistant
//! kept for application paths and credentials: the store is an explicit
//! object created at process start and handed by `Arc` to the tools that
//! need it.

use anyhow::Result;
use async_trait::async_trait;

pub mod filesystem;
pub mod memory;

pub use filesystem::FileStore;
pub use memory::MemoryStore;

/// String-keyed value store shared by stateful tools
#[async_trait]
pub trait KeyedStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;

    async fn put(&self, key: &str, value: String) -> Result<()>;

    async fn remove(&self, key: &str) -> Result<()>;

    /// All entries, sorted by key.
    async fn entries(&self) -> Result<Vec<(String, String)>>;

    async fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.get(key).await?.is_some())
    }
}
