//! Load-then-sync orchestration.
//!
//! A load replaces the in-memory snapshot; the sync that follows pushes
//! the same passages to the document store. The two run in sequence, so
//! the snapshot is queryable before the remote side has caught up.

use anyhow::Result;
use std::sync::Arc;

use crate::config::Config;
use crate::models::Passage;
use crate::remote::SqliteDocumentStore;
use crate::store::PassageStore;
use crate::sync::{SyncDispatcher, SyncReport};

/// Load from disk, then hand the fresh snapshot to the dispatcher.
///
/// A failed load returns before anything is synced.
pub async fn load_and_sync(
    store: &PassageStore,
    dispatcher: &SyncDispatcher,
    ascending: bool,
) -> Result<(Vec<Passage>, SyncReport)> {
    let passages = store.load(ascending).await?;
    let report = dispatcher.sync(&passages).await;
    Ok((passages, report))
}

/// CLI entry point for `psync load`.
pub async fn run_load(config: &Config, ascending: bool, dry_run: bool) -> Result<()> {
    let store = PassageStore::new(config.content.clone());

    if dry_run {
        let passages = store.load(ascending).await?;
        println!("load (dry-run)");
        println!("  passages loaded: {}", passages.len());
        println!("ok");
        return Ok(());
    }

    let remote = Arc::new(SqliteDocumentStore::open(&config.db.path).await?);
    remote.migrate().await?;

    let dispatcher = SyncDispatcher::new(
        remote.clone(),
        config.sync.collection.clone(),
        config.sync.concurrency,
    );
    let (passages, report) = load_and_sync(&store, &dispatcher, ascending).await?;

    println!("load");
    println!("  passages loaded: {}", passages.len());
    println!("  collection: {}", config.sync.collection);
    println!("  inserted: {}", report.inserted);
    println!("  updated: {}", report.updated);
    println!("  failed: {}", report.failed);
    println!("ok");

    remote.close().await;
    Ok(())
}
