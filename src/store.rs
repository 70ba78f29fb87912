//! In-memory passage snapshot.
//!
//! [`PassageStore::load`] walks the configured root, sorts the result by
//! `date` and swaps it in as the new snapshot. Queries only ever see the
//! most recent successful load; a failed load leaves the previous snapshot
//! in place.

use anyhow::{Context, Result};
use chrono::Local;
use tokio::sync::RwLock;
use tracing::info;

use crate::config::ContentConfig;
use crate::models::Passage;
use crate::walker::walk_passages;

pub struct PassageStore {
    content: ContentConfig,
    passages: RwLock<Vec<Passage>>,
}

impl PassageStore {
    pub fn new(content: ContentConfig) -> Self {
        Self {
            content,
            passages: RwLock::new(Vec::new()),
        }
    }

    /// Full re-scan of the content root.
    ///
    /// Returns the new snapshot, ordered by `date` ascending or descending.
    /// Passages with equal dates keep their traversal order, and each
    /// permalink appears at most once. Fails only
    /// when the root is missing or the walk itself cannot run.
    pub async fn load(&self, ascending: bool) -> Result<Vec<Passage>> {
        info!(category = "load", root = %self.content.root.display(), ascending, "loading passages");

        let content = self.content.clone();
        let now = Local::now().naive_local();
        let outcome = tokio::task::spawn_blocking(move || walk_passages(&content, now))
            .await
            .context("passage walk task failed")??;

        let mut passages = outcome.passages;
        sort_by_date(&mut passages, ascending);
        *self.passages.write().await = passages.clone();

        info!(
            category = "load",
            loaded = passages.len(),
            skipped = outcome.skipped,
            duplicates = outcome.duplicates,
            "load finished"
        );
        Ok(passages)
    }

    /// Linear scan by permalink.
    pub async fn get(&self, permalink: &str) -> Option<Passage> {
        self.passages
            .read()
            .await
            .iter()
            .find(|p| p.permalink == permalink)
            .cloned()
    }

    /// 1-indexed page of at most `limit` passages. Page zero, a zero limit
    /// or a page past the end yields an empty vec.
    pub async fn page(&self, limit: usize, page: usize) -> Vec<Passage> {
        if limit == 0 || page == 0 {
            return Vec::new();
        }
        let start = (page - 1).saturating_mul(limit);
        self.passages
            .read()
            .await
            .iter()
            .skip(start)
            .take(limit)
            .cloned()
            .collect()
    }

    pub async fn count(&self) -> usize {
        self.passages.read().await.len()
    }

    /// Permalinks in snapshot order.
    pub async fn ids(&self) -> Vec<String> {
        self.passages
            .read()
            .await
            .iter()
            .map(|p| p.permalink.clone())
            .collect()
    }
}

fn sort_by_date(passages: &mut [Passage], ascending: bool) {
    // `date` is fixed-width YYYY-MM-DD, so string order is calendar order.
    if ascending {
        passages.sort_by(|a, b| a.date.cmp(&b.date));
    } else {
        passages.sort_by(|a, b| b.date.cmp(&a.date));
    }
}
