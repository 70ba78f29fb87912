use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::dates::DatePolicy;
use crate::sync::DEFAULT_CONCURRENCY;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub content: ContentConfig,
    pub db: DbConfig,
    #[serde(default)]
    pub sync: SyncConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ContentConfig {
    pub root: PathBuf,
    #[serde(default)]
    pub date_policy: DatePolicy,
    #[serde(default)]
    pub follow_symlinks: bool,
}

impl ContentConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            date_policy: DatePolicy::default(),
            follow_symlinks: false,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct DbConfig {
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SyncConfig {
    #[serde(default = "default_collection")]
    pub collection: String,
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            collection: default_collection(),
            concurrency: default_concurrency(),
        }
    }
}

fn default_collection() -> String {
    "passages".to_string()
}
fn default_concurrency() -> usize {
    DEFAULT_CONCURRENCY
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;
    validate(&config)?;

    Ok(config)
}

fn validate(config: &Config) -> Result<()> {
    if config.sync.concurrency == 0 {
        anyhow::bail!("sync.concurrency must be >= 1");
    }

    if config.sync.collection.trim().is_empty() {
        anyhow::bail!("sync.collection must not be empty");
    }

    Ok(())
}
