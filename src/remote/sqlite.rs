//! SQLite-backed [`DocumentStore`].
//!
//! Every record lives in the `records` table as a JSON object keyed by
//! `(collection, id)`. Field lookups go through SQLite's `json_extract`.

use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use std::path::Path;
use std::str::FromStr;
use uuid::Uuid;

use super::{DocumentStore, StoredRecord};

pub struct SqliteDocumentStore {
    pool: SqlitePool,
}

impl SqliteDocumentStore {
    /// Open the database at `db_path` in WAL mode, creating the file and
    /// its parent directory if needed. Call [`migrate`](Self::migrate)
    /// before the first write.
    pub async fn open(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let options = SqliteConnectOptions::from_str(&format!("sqlite:{}", db_path.display()))?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .with_context(|| format!("Failed to open document store: {}", db_path.display()))?;

        Ok(Self { pool })
    }

    /// Create the `records` table and its indexes. Idempotent.
    ///
    /// A permalink is unique within a collection, so a second insert for
    /// the same permalink fails instead of creating a shadow record.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS records (
                id TEXT PRIMARY KEY,
                collection TEXT NOT NULL,
                fields_json TEXT NOT NULL DEFAULT '{}',
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_records_collection ON records(collection)")
            .execute(&self.pool)
            .await?;
        // Superseded by the unique index below.
        sqlx::query("DROP INDEX IF EXISTS idx_records_permalink")
            .execute(&self.pool)
            .await?;
        sqlx::query(
            "CREATE UNIQUE INDEX IF NOT EXISTS idx_records_unique_permalink ON records(collection, json_extract(fields_json, '$.permalink'))",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl DocumentStore for SqliteDocumentStore {
    async fn find_one(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Option<StoredRecord>> {
        let row = sqlx::query(
            r#"
            SELECT id, fields_json FROM records
            WHERE collection = ? AND json_extract(fields_json, ?) = ?
            ORDER BY created_at ASC
            LIMIT 1
            "#,
        )
        .bind(collection)
        .bind(format!("$.{}", field))
        .bind(value)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        let fields_json: String = row.get("fields_json");

        Ok(Some(StoredRecord {
            id: row.get("id"),
            fields: serde_json::from_str(&fields_json)?,
        }))
    }

    async fn insert(&self, collection: &str, fields: &serde_json::Value) -> Result<String> {
        let id = Uuid::new_v4().to_string();
        let now = chrono::Utc::now().timestamp();

        sqlx::query(
            r#"
            INSERT INTO records (id, collection, fields_json, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(collection)
        .bind(fields.to_string())
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(id)
    }

    async fn update(&self, collection: &str, id: &str, fields: &serde_json::Value) -> Result<()> {
        let result = sqlx::query(
            "UPDATE records SET fields_json = ?, updated_at = ? WHERE collection = ? AND id = ?",
        )
        .bind(fields.to_string())
        .bind(chrono::Utc::now().timestamp())
        .bind(collection)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            bail!("record not found: {}/{}", collection, id);
        }
        Ok(())
    }
}
