//! Core data models used throughout Passage Sync.
//!
//! A [`Passage`] is built fresh from one Markdown file on every load and
//! discarded when the next load replaces the in-memory snapshot.

use serde::{Deserialize, Serialize};

/// Structured record derived from one source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passage {
    /// Absolute source location. Used for logging, never for dedup.
    pub filepath: String,
    /// Display slug derived from the path.
    pub filename: String,
    pub title: String,
    /// Markdown body as re-emitted by the formatter.
    pub content: String,
    pub description: String,
    /// `YYYY-MM-DD HH:MM:SS`
    pub mtime: String,
    /// Calendar day, always `mtime[..10]`.
    pub date: String,
    /// Unique key shared with the remote record.
    pub permalink: String,
}

impl Passage {
    /// Field map written to the document store.
    pub fn to_fields(&self) -> serde_json::Value {
        serde_json::json!({
            "filepath": self.filepath,
            "filename": self.filename,
            "title": self.title,
            "content": self.content,
            "description": self.description,
            "mtime": self.mtime,
            "date": self.date,
            "permalink": self.permalink,
        })
    }
}
