//! Represents a logical bucket — a named partition of object storage.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Bucket holding hero images.
pub const HERO_IMAGES_BUCKET: &str = "hero-images";

/// Bucket holding QR-code images.
pub const QR_CODES_BUCKET: &str = "qr-codes";

/// A storage bucket. Every object lives in exactly one bucket.
#[derive(Serialize, Deserialize, Clone, FromRow, Debug)]
pub struct Bucket {
    /// Unique identifier for this bucket (UUID for internal DB use).
    pub id: Uuid,

    /// Bucket name (DNS-style: lowercase letters, digits, dots, hyphens).
    pub name: String,

    /// When this bucket was created.
    pub created_at: DateTime<Utc>,
}
