//! The store interface the model assembler reads through.

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use ras_common::RasResult;

/// One entry of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListEntry {
    /// Final path component
    pub name: String,
    /// Full key
    pub path: String,
    pub is_dir: bool,
    /// Size in bytes (0 for directories)
    pub size: u64,
    pub modified: Option<DateTime<Utc>>,
}

/// Read access to model files by key.
#[async_trait]
pub trait ModelStore: Send + Sync {
    /// List entries under a directory prefix. Non-recursive listings include
    /// immediate subdirectories as `is_dir` entries.
    async fn list(&self, prefix: &str, recursive: bool) -> RasResult<Vec<ListEntry>>;

    /// Fetch a whole object. Missing keys are `RasError::NotFound`.
    async fn fetch(&self, key: &str) -> RasResult<Bytes>;
}
