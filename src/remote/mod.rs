//! Document store abstraction for passage sync.
//!
//! The [`DocumentStore`] trait is the minimum the sync dispatcher needs
//! from a remote store: find a record by field equality, insert, and
//! update by id. Records are grouped into named collections and carry
//! their fields as a JSON object.
//!
//! Implementations must be `Send + Sync` so upserts can fan out across
//! tokio tasks.

pub mod memory;
pub mod sqlite;

use anyhow::Result;
use async_trait::async_trait;

pub use memory::MemoryDocumentStore;
pub use sqlite::SqliteDocumentStore;

/// A record as held by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredRecord {
    /// Store-assigned id.
    pub id: String,
    pub fields: serde_json::Value,
}

/// Abstract remote document store.
///
/// | Method | Purpose |
/// |--------|---------|
/// | [`find_one`](DocumentStore::find_one) | First record whose `field` equals `value` |
/// | [`insert`](DocumentStore::insert) | Add a record, returning its new id |
/// | [`update`](DocumentStore::update) | Replace the fields of an existing record |
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn find_one(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Option<StoredRecord>>;

    async fn insert(&self, collection: &str, fields: &serde_json::Value) -> Result<String>;

    /// Fails if no record with `id` exists in `collection`.
    async fn update(&self, collection: &str, id: &str, fields: &serde_json::Value) -> Result<()>;
}
