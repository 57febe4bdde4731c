//! A QR-code image displayed on the website; at most one is active.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Serialize, Deserialize, Clone, FromRow, Debug, PartialEq)]
pub struct QrCode {
    pub id: Uuid,
    pub name: String,
    pub image_url: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Row to insert. `name` must already be trimmed and non-empty.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NewQrCode {
    pub name: String,
    pub image_url: String,
    pub is_active: bool,
}
