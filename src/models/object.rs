//! Represents an object (file) stored in a bucket.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Metadata of a single stored blob. The payload itself lives on disk.
#[derive(Serialize, Deserialize, Clone, FromRow, Debug)]
pub struct StoredObject {
    pub id: Uuid,

    /// Foreign key linking to the parent bucket.
    pub bucket_id: Uuid,

    /// Object key (path-like identifier within the bucket).
    pub key: String,

    /// Declared content type (MIME type) at upload time.
    pub content_type: Option<String>,

    /// Cache lifetime hint in seconds, replayed as `Cache-Control: max-age=...`.
    pub cache_control: Option<String>,

    pub size_bytes: i64,

    /// MD5 of the payload, hex encoded.
    pub etag: Option<String>,

    pub last_modified: DateTime<Utc>,
}

/// Options attached to an upload.
#[derive(Clone, Debug, Default)]
pub struct UploadOptions {
    pub content_type: Option<String>,
    pub cache_control: Option<String>,
}

impl UploadOptions {
    pub fn new(content_type: Option<String>, cache_control: impl Into<String>) -> Self {
        Self {
            content_type,
            cache_control: Some(cache_control.into()),
        }
    }
}
