//! Error types for passage parsing and directory walking.
//!
//! Per-file failures ([`PassageError::MissingFrontMatter`],
//! [`PassageError::InvalidYaml`], [`PassageError::MissingPermalink`],
//! [`PassageError::InvalidDate`]) are recovered by the walker: the file is
//! logged and skipped. [`PassageError::RootNotFound`] is a configuration
//! error and aborts the whole load.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PassageError {
    #[error("content root does not exist: {}", .0.display())]
    RootNotFound(PathBuf),

    #[error("missing front-matter header")]
    MissingFrontMatter,

    #[error("invalid front-matter YAML: {0}")]
    InvalidYaml(#[from] serde_yaml::Error),

    #[error("front-matter is not a key/value mapping")]
    NotAMapping,

    #[error("front-matter has no permalink")]
    MissingPermalink,

    #[error("unparseable date: {0:?}")]
    InvalidDate(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
