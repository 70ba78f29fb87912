//! # Passage Sync CLI (`psync`)
//!
//! Loads a Markdown passage tree, upserts it into the configured document
//! store, and answers read queries over a fresh load.
//!
//! ## Usage
//!
//! ```bash
//! psync --config ./config/psync.toml <command>
//! ```
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `psync init` | Create the document store schema |
//! | `psync load` | Full re-scan, then upsert every passage by permalink |
//! | `psync get <permalink>` | Print one passage as JSON |
//! | `psync list` | Print a page of passages as JSON lines |
//! | `psync count` | Print the number of valid passages |
//! | `psync ids` | Print every permalink |
//!
//! Logs go to stderr; set `RUST_LOG` to adjust verbosity.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use passage_sync::remote::SqliteDocumentStore;
use passage_sync::{config, ingest, query};

/// Passage Sync CLI: ingest Markdown passages and sync them by permalink.
#[derive(Parser)]
#[command(
    name = "psync",
    about = "Passage Sync: ingest Markdown passages and sync them to a document store",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/psync.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the document store schema.
    ///
    /// Idempotent; `load` also applies the schema before syncing.
    Init,

    /// Load every passage and upsert it into the document store.
    ///
    /// Performs a full re-scan of the content root. Files that fail to
    /// parse are logged and skipped.
    Load {
        /// Sort newest first.
        #[arg(long)]
        desc: bool,

        /// Load and report without touching the document store.
        #[arg(long)]
        dry_run: bool,
    },

    /// Print one passage by permalink.
    Get {
        permalink: String,
    },

    /// Print a page of passages, one JSON object per line.
    List {
        /// Passages per page.
        #[arg(long, default_value_t = 10)]
        limit: usize,

        /// 1-indexed page number. Pages past the end print nothing.
        #[arg(long, default_value_t = 1)]
        page: usize,

        /// Sort newest first.
        #[arg(long)]
        desc: bool,
    },

    /// Print the number of valid passages.
    Count,

    /// Print every permalink, one per line.
    Ids,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "passage_sync=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let cfg = config::load_config(&cli.config)?;

    match cli.command {
        Commands::Init => {
            let remote = SqliteDocumentStore::open(&cfg.db.path).await?;
            remote.migrate().await?;
            remote.close().await;
            println!("Document store initialized successfully.");
        }
        Commands::Load { desc, dry_run } => {
            ingest::run_load(&cfg, !desc, dry_run).await?;
        }
        Commands::Get { permalink } => {
            query::run_get(&cfg, &permalink).await?;
        }
        Commands::List { limit, page, desc } => {
            query::run_list(&cfg, limit, page, !desc).await?;
        }
        Commands::Count => {
            query::run_count(&cfg).await?;
        }
        Commands::Ids => {
            query::run_ids(&cfg).await?;
        }
    }

    Ok(())
}
