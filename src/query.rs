//! Read commands over a fresh load.
//!
//! Each command performs its own full load (no sync) and answers from the
//! resulting snapshot. Passages are printed as JSON so the output can be
//! piped into other tools.

use anyhow::{bail, Result};

use crate::config::Config;
use crate::store::PassageStore;

async fn loaded_store(config: &Config, ascending: bool) -> Result<PassageStore> {
    let store = PassageStore::new(config.content.clone());
    store.load(ascending).await?;
    Ok(store)
}

/// `psync get <permalink>`: pretty-printed JSON of one passage.
pub async fn run_get(config: &Config, permalink: &str) -> Result<()> {
    let store = loaded_store(config, true).await?;
    let Some(passage) = store.get(permalink).await else {
        bail!("passage not found: {}", permalink);
    };
    println!("{}", serde_json::to_string_pretty(&passage)?);
    Ok(())
}

/// `psync list`: one JSON object per line for the requested page.
pub async fn run_list(config: &Config, limit: usize, page: usize, ascending: bool) -> Result<()> {
    let store = loaded_store(config, ascending).await?;
    for passage in store.page(limit, page).await {
        println!("{}", serde_json::to_string(&passage)?);
    }
    Ok(())
}

pub async fn run_count(config: &Config) -> Result<()> {
    let store = loaded_store(config, true).await?;
    println!("{}", store.count().await);
    Ok(())
}

pub async fn run_ids(config: &Config) -> Result<()> {
    let store = loaded_store(config, true).await?;
    for id in store.ids().await {
        println!("{}", id);
    }
    Ok(())
}
