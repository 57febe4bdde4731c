//! Helpers for pulling values out of multipart fields.

use crate::{errors::AppError, models::upload::UploadedFile};
use axum::{
    extract::multipart::{Field, MultipartError},
    http::StatusCode,
};
use tracing::warn;

/// Map a multipart read failure; a body over the upload limit is a 413.
pub fn multipart_error(what: &str, err: MultipartError) -> AppError {
    warn!("Failed to read {}: {}", what, err);
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::payload_too_large("Upload exceeds the maximum allowed size")
    } else {
        AppError::invalid_input(format!("Failed to read {}: {}", what, err))
    }
}

/// Buffer a file field. A missing filename becomes `"unnamed"`.
pub async fn read_file(field: Field<'_>) -> Result<UploadedFile, AppError> {
    let content_type = field.content_type().map(str::to_string);
    let file_name = field.file_name().unwrap_or("unnamed").to_string();

    let data = field
        .bytes()
        .await
        .map_err(|e| multipart_error("file data", e))?;

    Ok(UploadedFile::new(file_name, content_type, data))
}

pub async fn read_text(field: Field<'_>) -> Result<String, AppError> {
    let name = field.name().unwrap_or("").to_string();
    field
        .text()
        .await
        .map_err(|e| multipart_error(&format!("{} field", name), e))
}
