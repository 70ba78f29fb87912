//! In-memory [`DocumentStore`] for tests.

use std::collections::HashMap;

use anyhow::{bail, Result};
use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{DocumentStore, StoredRecord};

#[derive(Default)]
pub struct MemoryDocumentStore {
    collections: RwLock<HashMap<String, Vec<StoredRecord>>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of a collection in insertion order.
    pub async fn records(&self, collection: &str) -> Vec<StoredRecord> {
        self.collections
            .read()
            .await
            .get(collection)
            .cloned()
            .unwrap_or_default()
    }
}

fn field_matches(record: &StoredRecord, field: &str, value: &str) -> bool {
    record.fields.get(field).and_then(|v| v.as_str()) == Some(value)
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn find_one(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Option<StoredRecord>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|records| records.iter().find(|r| field_matches(r, field, value)))
            .cloned())
    }

    async fn insert(&self, collection: &str, fields: &serde_json::Value) -> Result<String> {
        let id = Uuid::new_v4().to_string();
        self.collections
            .write()
            .await
            .entry(collection.to_string())
            .or_default()
            .push(StoredRecord {
                id: id.clone(),
                fields: fields.clone(),
            });
        Ok(id)
    }

    async fn update(&self, collection: &str, id: &str, fields: &serde_json::Value) -> Result<()> {
        let mut collections = self.collections.write().await;
        let record = collections
            .get_mut(collection)
            .and_then(|records| records.iter_mut().find(|r| r.id == id));
        match record {
            Some(record) => {
                record.fields = fields.clone();
                Ok(())
            }
            None => bail!("record not found: {}/{}", collection, id),
        }
    }
}
