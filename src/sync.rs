//! Push loaded passages to a [`DocumentStore`].
//!
//! Each passage is upserted by permalink: find the record whose
//! `permalink` field matches, update it in place, or insert a new one.
//! Upserts fan out through a [`BoundedPool`]. A failed upsert is logged and
//! counted; the rest of the batch carries on. Remote records are never
//! deleted, so files removed from disk keep their last synced record.
//!
//! A dispatcher uploads at most once. Later calls log a notice and return
//! a skipped [`SyncReport`].

use anyhow::Result;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{error, info};

use crate::models::Passage;
use crate::pool::BoundedPool;
use crate::remote::DocumentStore;

/// Upserts allowed in flight when no cap is configured.
pub const DEFAULT_CONCURRENCY: usize = 10;

/// Unique key shared by local passages and remote records.
pub const PERMALINK_FIELD: &str = "permalink";

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SyncReport {
    pub inserted: usize,
    pub updated: usize,
    pub failed: usize,
    /// Set when the dispatcher had already run and did nothing.
    pub skipped: bool,
}

enum Upserted {
    Inserted(String),
    Updated(String),
}

pub struct SyncDispatcher {
    store: Arc<dyn DocumentStore>,
    collection: String,
    pool: BoundedPool,
    has_run_once: AtomicBool,
}

impl SyncDispatcher {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        collection: impl Into<String>,
        concurrency: usize,
    ) -> Self {
        Self {
            store,
            collection: collection.into(),
            pool: BoundedPool::new(concurrency),
            has_run_once: AtomicBool::new(false),
        }
    }

    pub fn has_run_once(&self) -> bool {
        self.has_run_once.load(Ordering::SeqCst)
    }

    pub async fn sync(&self, passages: &[Passage]) -> SyncReport {
        if self.has_run_once.swap(true, Ordering::SeqCst) {
            info!(
                category = "sync",
                collection = %self.collection,
                "passages were already uploaded by this process, skipping"
            );
            return SyncReport {
                skipped: true,
                ..SyncReport::default()
            };
        }

        info!(
            category = "sync",
            collection = %self.collection,
            count = passages.len(),
            concurrency = self.pool.capacity(),
            "uploading passages"
        );

        let tasks = passages.iter().cloned().map(|passage| {
            let store = Arc::clone(&self.store);
            let collection = self.collection.clone();
            async move {
                let result = upsert_passage(store.as_ref(), &collection, &passage).await;
                (passage.permalink, result)
            }
        });
        let results = self.pool.run_all(tasks).await;

        let mut report = SyncReport {
            failed: passages.len() - results.len(),
            ..SyncReport::default()
        };
        for (permalink, result) in results {
            match result {
                Ok(Upserted::Inserted(id)) => {
                    report.inserted += 1;
                    info!(category = "sync", %permalink, %id, "inserted passage");
                }
                Ok(Upserted::Updated(id)) => {
                    report.updated += 1;
                    info!(category = "sync", %permalink, %id, "updated passage");
                }
                Err(err) => {
                    report.failed += 1;
                    error!(category = "sync", %permalink, error = %err, "failed to upsert passage");
                }
            }
        }

        info!(
            category = "sync",
            inserted = report.inserted,
            updated = report.updated,
            failed = report.failed,
            "upload finished"
        );
        report
    }
}

async fn upsert_passage(
    store: &dyn DocumentStore,
    collection: &str,
    passage: &Passage,
) -> Result<Upserted> {
    let fields = passage.to_fields();
    match store
        .find_one(collection, PERMALINK_FIELD, &passage.permalink)
        .await?
    {
        Some(existing) => {
            store.update(collection, &existing.id, &fields).await?;
            Ok(Upserted::Updated(existing.id))
        }
        None => Ok(Upserted::Inserted(store.insert(collection, &fields).await?)),
    }
}
