//! Defines routes for the admin API and public object serving.
//!
//! ## Structure
//! - **Hero images**
//!   - `POST   /api/hero-images/upload` — multipart upload
//!   - `GET    /api/hero-images` — list in carousel order (`?active=true`)
//!
//! - **QR codes**
//!   - `GET    /api/qr-codes` — list, newest first
//!   - `POST   /api/qr-codes` — multipart upload (`file`, `name`)
//!   - `DELETE /api/qr-codes/{id}` — delete one row
//!   - `POST   /api/qr-codes/{id}/activate` — make it the single active row
//!
//! - **Objects**
//!   - `GET|HEAD /objects/{bucket}/{*key}` — public URL target

use crate::{
    handlers::{
        health_handlers::{healthz, readyz},
        hero_image_handlers::{list_hero_images, upload_hero_image},
        object_handlers::{get_object, head_object},
        qr_code_handlers::{activate_qr_code, create_qr_code, delete_qr_code, list_qr_codes},
    },
    state::AppState,
};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
};

/// Build the router. `max_upload_bytes` caps request bodies on upload routes.
pub fn routes(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/api/hero-images/upload", post(upload_hero_image))
        .route("/api/hero-images", get(list_hero_images))
        .route("/api/qr-codes", get(list_qr_codes).post(create_qr_code))
        .route("/api/qr-codes/{id}", delete(delete_qr_code))
        .route("/api/qr-codes/{id}/activate", post(activate_qr_code))
        .route("/objects/{bucket}/{*key}", get(get_object).head(head_object))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
}
