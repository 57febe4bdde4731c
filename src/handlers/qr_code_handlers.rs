//! HTTP handlers for QR codes.

use crate::{
    errors::AppError,
    handlers::multipart::{multipart_error, read_file, read_text},
    models::{qr_code::QrCode, upload::UploadedFile},
    state::AppState,
};
use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
};
use tracing::debug;
use uuid::Uuid;

/// `GET /api/qr-codes` — newest first.
pub async fn list_qr_codes(State(state): State<AppState>) -> Result<Json<Vec<QrCode>>, AppError> {
    Ok(Json(state.qr_codes.list().await?))
}

/// `POST /api/qr-codes` — multipart `file` + `name`.
pub async fn create_qr_code(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<QrCode>), AppError> {
    let mut file: Option<UploadedFile> = None;
    let mut name = String::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error("multipart data", e))?
    {
        let field_name = field.name().unwrap_or("").to_string();
        match field_name.as_str() {
            "file" => file = Some(read_file(field).await?),
            "name" => name = read_text(field).await?,
            _ => debug!("Ignoring unknown field: {}", field_name),
        }
    }

    let file = file.ok_or_else(|| AppError::missing_input("No file provided"))?;
    let code = state.qr_codes.create(&name, file).await?;
    Ok((StatusCode::CREATED, Json(code)))
}

/// `DELETE /api/qr-codes/{id}`
pub async fn delete_qr_code(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.qr_codes.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `POST /api/qr-codes/{id}/activate`
pub async fn activate_qr_code(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<QrCode>, AppError> {
    Ok(Json(state.qr_codes.activate(id).await?))
}
