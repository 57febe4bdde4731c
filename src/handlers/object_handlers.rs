//! Public object serving. Every public URL handed out by the upload paths
//! resolves here. Bodies are streamed from disk.

use crate::{errors::AppError, models::object::StoredObject, state::AppState};
use axum::{
    body::Body,
    extract::{Path, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::Response,
};
use tokio_util::io::ReaderStream;

/// `GET /objects/{bucket}/{*key}`
pub async fn get_object(
    State(state): State<AppState>,
    Path((bucket, key)): Path<(String, String)>,
) -> Result<Response, AppError> {
    let (meta, file) = state.storage.get_object_reader(&bucket, &key).await?;
    let body = Body::from_stream(ReaderStream::new(file));

    let mut response = Response::new(body);
    *response.status_mut() = StatusCode::OK;
    set_object_headers(response.headers_mut(), &meta);
    Ok(response)
}

/// `HEAD /objects/{bucket}/{*key}` — same headers as GET, no body.
pub async fn head_object(
    State(state): State<AppState>,
    Path((bucket, key)): Path<(String, String)>,
) -> Result<Response, AppError> {
    let meta = state.storage.get_object_metadata(&bucket, &key).await?;
    let mut response = Response::new(Body::empty());
    *response.status_mut() = StatusCode::OK;
    set_object_headers(response.headers_mut(), &meta);
    Ok(response)
}

fn set_object_headers(headers: &mut HeaderMap, meta: &StoredObject) {
    let content_type = meta
        .content_type
        .as_deref()
        .unwrap_or("application/octet-stream");
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_str(content_type)
            .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream")),
    );

    headers.insert(
        header::CONTENT_LENGTH,
        HeaderValue::from(meta.size_bytes.max(0) as u64),
    );

    if let Some(etag) = meta.etag.as_ref() {
        if let Ok(value) = HeaderValue::from_str(&format!("\"{}\"", etag)) {
            headers.insert(header::ETAG, value);
        }
    }

    if let Some(value) = meta
        .cache_control
        .as_deref()
        .and_then(cache_control_header)
    {
        headers.insert(header::CACHE_CONTROL, value);
    }

    if let Ok(value) = HeaderValue::from_str(&meta.last_modified.to_rfc2822()) {
        headers.insert(header::LAST_MODIFIED, value);
    }
}

/// A bare number of seconds becomes `max-age=N`; anything else is passed through.
fn cache_control_header(raw: &str) -> Option<HeaderValue> {
    let value = if raw.chars().all(|c| c.is_ascii_digit()) {
        format!("max-age={}", raw)
    } else {
        raw.to_string()
    };
    HeaderValue::from_str(&value).ok()
}
