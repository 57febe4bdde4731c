//! src/services/storage_service.rs
//!
//! StorageService — bucketed object storage backed by SQLite for metadata
//! and local disk for payloads sharded beneath
//! `base_path/{bucket}/{shard}/{shard}/{key}`. Stored objects are reachable at
//! `{public_base_url}/objects/{bucket}/{key}`.

use crate::models::{
    bucket::Bucket,
    object::{StoredObject, UploadOptions},
};
use bytes::Bytes;
use chrono::Utc;
use futures::{Stream, StreamExt, pin_mut, stream};
use md5::Context;
use sqlx::SqlitePool;
use std::{
    io::{self, ErrorKind},
    path::{Path, PathBuf},
    sync::Arc,
};
use thiserror::Error;
use tokio::{
    fs::{self, File},
    io::AsyncWriteExt,
};
use tracing::{debug, info};
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("bucket `{0}` not found")]
    BucketNotFound(String),
    #[error("bucket `{name}` invalid: {reason}")]
    InvalidBucketName { name: String, reason: String },
    #[error("object `{key}` not found in bucket `{bucket}`")]
    ObjectNotFound { bucket: String, key: String },
    #[error("invalid object key")]
    InvalidObjectKey,
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// StorageService provides the object-storage half of the backend:
/// - Upload an object (writes bytes to disk and upserts metadata in SQLite)
/// - Resolve an object's public URL
/// - Read an object back (metadata from SQLite, payload from disk)
#[derive(Clone)]
pub struct StorageService {
    /// Shared SQLite connection pool used for metadata operations.
    pub db: Arc<SqlitePool>,

    /// Base directory on disk where object payloads are stored.
    pub base_path: PathBuf,

    /// Prefix of public URLs, without trailing slash.
    pub public_base_url: String,
}

const MAX_OBJECT_KEY_LEN: usize = 1024;
const BUCKET_NAME_MIN_LEN: usize = 3;
const BUCKET_NAME_MAX_LEN: usize = 63;

impl StorageService {
    /// Create a new StorageService backed by the provided SQLite pool and
    /// using `base_path` as the root directory for object payloads.
    pub fn new(
        db: Arc<SqlitePool>,
        base_path: impl Into<PathBuf>,
        public_base_url: impl Into<String>,
    ) -> Self {
        Self {
            db,
            base_path: base_path.into(),
            public_base_url: public_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Basic key validation to avoid trivial path traversal vectors.
    fn ensure_key_safe(&self, key: &str) -> StorageResult<()> {
        if key.is_empty() || key.len() > MAX_OBJECT_KEY_LEN {
            return Err(StorageError::InvalidObjectKey);
        }
        if key.starts_with('/') || key.contains("..") {
            return Err(StorageError::InvalidObjectKey);
        }
        if key
            .bytes()
            .any(|b| b.is_ascii_control() || b == b'\\' || b == b'\0')
        {
            return Err(StorageError::InvalidObjectKey);
        }
        Ok(())
    }

    /// Validate bucket name format.
    ///
    /// - 3–63 characters
    /// - lowercase letters, digits, dots, hyphens only
    /// - cannot start/end with dot or hyphen
    /// - cannot contain consecutive dots or dot-hyphen patterns
    fn ensure_bucket_name_safe(&self, name: &str) -> StorageResult<()> {
        let invalid = |reason: &str| StorageError::InvalidBucketName {
            name: name.to_string(),
            reason: reason.to_string(),
        };

        let len = name.len();
        if !(BUCKET_NAME_MIN_LEN..=BUCKET_NAME_MAX_LEN).contains(&len) {
            return Err(invalid("must be between 3 and 63 characters"));
        }

        if !name
            .chars()
            .all(|c| matches!(c, 'a'..='z' | '0'..='9' | '.' | '-'))
        {
            return Err(invalid(
                "allowed characters are lowercase letters, digits, dots, and hyphens",
            ));
        }

        if name.starts_with(['.', '-']) || name.ends_with(['.', '-']) {
            return Err(invalid("must start and end with a lowercase letter or digit"));
        }

        if name.contains("..") || name.contains("-.") || name.contains(".-") {
            return Err(invalid(
                "cannot contain consecutive dots or dot-hyphen combinations",
            ));
        }

        Ok(())
    }

    fn bucket_root(&self, bucket_name: &str) -> PathBuf {
        self.base_path.join(bucket_name)
    }

    /// Two-level shard identifiers from MD5(bucket/key), 00–ff each.
    fn object_shards(bucket_name: &str, key: &str) -> (String, String) {
        let digest = md5::compute(format!("{}/{}", bucket_name, key));
        (format!("{:02x}", digest[0]), format!("{:02x}", digest[1]))
    }

    /// base_path/bucket/{shard}/{shard}/{key}. Parent directories may not exist yet.
    fn object_path(&self, bucket_name: &str, key: &str) -> PathBuf {
        let (shard_a, shard_b) = Self::object_shards(bucket_name, key);
        let mut path = self.bucket_root(bucket_name);
        path.push(shard_a);
        path.push(shard_b);
        path.push(key);
        path
    }

    async fn fetch_bucket(&self, bucket: &str) -> StorageResult<Bucket> {
        self.ensure_bucket_name_safe(bucket)?;
        sqlx::query_as::<_, Bucket>("SELECT id, name, created_at FROM buckets WHERE name = ?")
            .bind(bucket)
            .fetch_one(&*self.db)
            .await
            .map_err(|err| match err {
                sqlx::Error::RowNotFound => StorageError::BucketNotFound(bucket.to_string()),
                other => StorageError::Sqlx(other),
            })
    }

    async fn fetch_object(&self, bucket: &Bucket, key: &str) -> StorageResult<StoredObject> {
        sqlx::query_as::<_, StoredObject>(
            "SELECT id, bucket_id, key, content_type, cache_control, size_bytes, etag,
                    last_modified
             FROM objects
             WHERE key = ? AND bucket_id = ?",
        )
        .bind(key)
        .bind(bucket.id)
        .fetch_one(&*self.db)
        .await
        .map_err(|err| match err {
            sqlx::Error::RowNotFound => StorageError::ObjectNotFound {
                bucket: bucket.name.clone(),
                key: key.to_string(),
            },
            other => StorageError::Sqlx(other),
        })
    }

    /// Create the bucket if it does not exist yet, and its directory on disk.
    pub async fn ensure_bucket(&self, name: &str) -> StorageResult<Bucket> {
        self.ensure_bucket_name_safe(name)?;
        fs::create_dir_all(self.bucket_root(name)).await?;

        match self.fetch_bucket(name).await {
            Ok(bucket) => return Ok(bucket),
            Err(StorageError::BucketNotFound(_)) => {}
            Err(err) => return Err(err),
        }

        let bucket = Bucket {
            id: Uuid::new_v4(),
            name: name.to_string(),
            created_at: Utc::now(),
        };

        match sqlx::query("INSERT INTO buckets (id, name, created_at) VALUES (?, ?, ?)")
            .bind(bucket.id)
            .bind(&bucket.name)
            .bind(bucket.created_at)
            .execute(&*self.db)
            .await
        {
            Ok(_) => {
                info!("created bucket `{}`", name);
                Ok(bucket)
            }
            // lost a race with another creator
            Err(err) if is_unique_violation(&err) => self.fetch_bucket(name).await,
            Err(err) => Err(StorageError::Sqlx(err)),
        }
    }

    /// Upload an in-memory payload.
    pub async fn upload_object(
        &self,
        bucket: &str,
        key: &str,
        data: Bytes,
        options: UploadOptions,
    ) -> StorageResult<StoredObject> {
        let body = stream::once(async move { Ok::<_, io::Error>(data) });
        self.upload_object_stream(bucket, key, options, body).await
    }

    /// Stream-upload an object to disk and update metadata.
    ///
    /// - Writes bytes incrementally to a temporary file.
    /// - Computes MD5/etag and size while streaming.
    /// - Renames into final location.
    /// - Upserts the metadata row (overwrite semantics).
    pub async fn upload_object_stream<S>(
        &self,
        bucket: &str,
        key: &str,
        options: UploadOptions,
        stream: S,
    ) -> StorageResult<StoredObject>
    where
        S: Stream<Item = io::Result<Bytes>> + Send,
    {
        self.ensure_key_safe(key)?;
        let bucket_rec = self.fetch_bucket(bucket).await?;

        let file_path = self.object_path(&bucket_rec.name, key);
        let parent = file_path
            .parent()
            .map(Path::to_path_buf)
            .ok_or_else(|| io::Error::other("object path missing parent directory"))?;
        fs::create_dir_all(&parent).await?;
        let tmp_path = parent.join(format!(".tmp-{}", Uuid::new_v4()));

        let (size_bytes, etag) = match write_payload(&tmp_path, stream).await {
            Ok(written) => written,
            Err(err) => {
                let _ = fs::remove_file(&tmp_path).await;
                return Err(StorageError::Io(err));
            }
        };

        if let Err(err) = fs::rename(&tmp_path, &file_path).await {
            if err.kind() == ErrorKind::AlreadyExists {
                fs::remove_file(&file_path).await?;
                fs::rename(&tmp_path, &file_path).await?;
            } else {
                let _ = fs::remove_file(&tmp_path).await;
                return Err(StorageError::Io(err));
            }
        }

        let insert_result = sqlx::query_as::<_, StoredObject>(
            r#"
            INSERT INTO objects (
                id, bucket_id, key, content_type, cache_control, size_bytes, etag, last_modified
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(bucket_id, key) DO UPDATE SET
                content_type = excluded.content_type,
                cache_control = excluded.cache_control,
                size_bytes = excluded.size_bytes,
                etag = excluded.etag,
                last_modified = excluded.last_modified
            RETURNING id, bucket_id, key, content_type, cache_control, size_bytes, etag,
                      last_modified
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(bucket_rec.id)
        .bind(key)
        .bind(options.content_type)
        .bind(options.cache_control)
        .bind(size_bytes)
        .bind(&etag)
        .bind(Utc::now())
        .fetch_one(&*self.db)
        .await;

        match insert_result {
            Ok(obj) => {
                debug!("stored {}/{} ({} bytes)", bucket, key, obj.size_bytes);
                Ok(obj)
            }
            Err(err) => {
                let _ = fs::remove_file(&file_path).await;
                Err(StorageError::Sqlx(err))
            }
        }
    }

    /// Public URL of an object. Does not check that the object exists.
    pub fn public_url(&self, bucket: &str, key: &str) -> String {
        format!("{}/objects/{}/{}", self.public_base_url, bucket, key)
    }

    /// Metadata plus an opened File handle ready for streaming out.
    /// Returns ObjectNotFound if metadata exists but the payload is missing.
    pub async fn get_object_reader(
        &self,
        bucket: &str,
        key: &str,
    ) -> StorageResult<(StoredObject, File)> {
        let object = self.get_object_metadata(bucket, key).await?;

        let file_path = self.object_path(bucket, key);
        let file = File::open(&file_path).await.map_err(|err| {
            if err.kind() == ErrorKind::NotFound {
                StorageError::ObjectNotFound {
                    bucket: bucket.to_string(),
                    key: key.to_string(),
                }
            } else {
                StorageError::Io(err)
            }
        })?;

        Ok((object, file))
    }

    pub async fn get_object_metadata(
        &self,
        bucket: &str,
        key: &str,
    ) -> StorageResult<StoredObject> {
        self.ensure_key_safe(key)?;
        let bucket_rec = self.fetch_bucket(bucket).await?;
        self.fetch_object(&bucket_rec, key).await
    }
}

/// Write a stream to `path`, fsync it, and return (size, md5 hex).
async fn write_payload<S>(path: &Path, stream: S) -> io::Result<(i64, String)>
where
    S: Stream<Item = io::Result<Bytes>>,
{
    let mut file = File::create(path).await?;
    let mut size_bytes: i64 = 0;
    let mut digest = Context::new();

    pin_mut!(stream);
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        size_bytes += chunk.len() as i64;
        digest.consume(&chunk);
        file.write_all(&chunk).await?;
    }
    file.flush().await?;
    file.sync_all().await?;

    Ok((size_bytes, format!("{:x}", digest.compute())))
}

/// Return true if SQLx error indicates a unique constraint violation.
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db_err) if db_err.message().to_ascii_lowercase().contains("unique")
    )
}

/// Lower-cased text after the last dot of `file_name`, keeping only ASCII
/// letters and digits so the key stays URL-safe. `None` when nothing is left.
pub fn file_extension(file_name: &str) -> Option<String> {
    let (_, raw) = file_name.rsplit_once('.')?;
    let ext: String = raw
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect();
    (!ext.is_empty()).then_some(ext)
}

/// Timestamp-derived object key keeping the original extension:
/// `{unix_millis}-{8 hex chars}.{ext}`, or without suffix when the name has no dot.
pub fn generate_object_key(original_file_name: &str) -> String {
    let millis = Utc::now().timestamp_millis();
    let nonce = Uuid::new_v4().simple().to_string();
    let stem = format!("{}-{}", millis, &nonce[..8]);
    match file_extension(original_file_name) {
        Some(ext) => format!("{}.{}", stem, ext),
        None => stem,
    }
}
