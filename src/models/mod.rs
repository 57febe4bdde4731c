//! Core data models.
//!
//! Storage entities (buckets, objects) and the two admin records (hero
//! images, QR codes). They map to SQLite tables via `sqlx::FromRow` and
//! serialize as JSON via `serde`.

pub mod bucket;
pub mod hero_image;
pub mod object;
pub mod qr_code;
pub mod upload;
