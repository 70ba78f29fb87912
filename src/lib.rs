//! # Passage Sync
//!
//! Ingests a tree of Markdown files with YAML front-matter, keeps the
//! parsed passages in memory for read access, and upserts them into a
//! document store keyed by `permalink`.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌───────────┐   ┌──────────────┐   ┌────────────────┐
//! │  Walker  │──▶│  Builder  │──▶│ PassageStore │──▶│ SyncDispatcher │
//! │ walkdir  │   │ YAML + md │   │  (snapshot)  │   │ bounded upsert │
//! └──────────┘   └───────────┘   └──────┬───────┘   └───────┬────────┘
//!                                       │                   ▼
//!                                       ▼            ┌──────────────┐
//!                                 get / page /       │DocumentStore │
//!                                 count / ids        │ SQLite, mem  │
//!                                                    └──────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! psync init                    # create the document store schema
//! psync load                    # scan content and upsert every passage
//! psync list --limit 10 --page 2
//! psync get getting-started
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | The `Passage` record |
//! | [`frontmatter`] | Header/body split and YAML decoding |
//! | [`dates`] | Date normalization and policy |
//! | [`markdown`] | Body formatting and description |
//! | [`passage`] | Passage builder |
//! | [`walker`] | Recursive directory walk |
//! | [`store`] | In-memory snapshot and queries |
//! | [`pool`] | Bounded-concurrency task pool |
//! | [`remote`] | Document store trait and backends |
//! | [`sync`] | Find-or-create upload |
//! | [`ingest`] | Load-then-sync orchestration |
//! | [`query`] | Read commands |

pub mod config;
pub mod dates;
pub mod error;
pub mod frontmatter;
pub mod ingest;
pub mod markdown;
pub mod models;
pub mod passage;
pub mod pool;
pub mod query;
pub mod remote;
pub mod store;
pub mod sync;
pub mod walker;
