//! Health & readiness handlers.
//!
//! - GET /healthz  -> simple liveness ("ok")
//! - GET /readyz   -> readiness that checks DB connectivity and disk I/O

use crate::state::AppState;
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use std::collections::HashMap;
use tokio::fs;
use uuid::Uuid;

/// `GET /healthz`
///
/// Liveness check. Never performs I/O.
pub async fn healthz() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok".into(),
        }),
    )
}

/// `GET /readyz`
///
/// 1. Runs `SELECT 1` against SQLite.
/// 2. Writes, reads back and removes a temp file under the storage root.
///
/// HTTP 200 when all checks pass, HTTP 503 otherwise.
pub async fn readyz(State(state): State<AppState>) -> impl IntoResponse {
    let sqlite_check = match sqlx::query_scalar::<_, i64>("SELECT 1")
        .fetch_one(&*state.storage.db)
        .await
    {
        Ok(1) => CheckStatus::ok(),
        Ok(v) => CheckStatus::failed(format!("unexpected result: {}", v)),
        Err(e) => CheckStatus::failed(format!("error: {}", e)),
    };

    let tmp_path = state
        .storage
        .base_path
        .join(format!(".readyz-{}", Uuid::new_v4()));
    let disk_check = match fs::write(&tmp_path, b"readyz").await {
        Ok(_) => {
            let check = match fs::read(&tmp_path).await {
                Ok(bytes) if bytes == b"readyz" => CheckStatus::ok(),
                Ok(_) => CheckStatus::failed("file content mismatch".to_string()),
                Err(e) => CheckStatus::failed(format!("could not read tmp file: {}", e)),
            };
            match fs::remove_file(&tmp_path).await {
                Err(e) if check.ok => CheckStatus {
                    ok: true,
                    error: Some(format!("could not remove tmp file: {}", e)),
                },
                _ => check,
            }
        }
        Err(e) => CheckStatus::failed(format!("could not write tmp file: {}", e)),
    };

    let overall_ok = sqlite_check.ok && disk_check.ok;
    let checks = HashMap::from([("sqlite", sqlite_check), ("disk", disk_check)]);

    let body = ReadyResponse {
        status: if overall_ok { "ok" } else { "error" }.into(),
        checks,
    };
    let status = if overall_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(body))
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
}

#[derive(Serialize)]
struct ReadyResponse {
    status: String,
    checks: HashMap<&'static str, CheckStatus>,
}

#[derive(Serialize)]
struct CheckStatus {
    ok: bool,
    error: Option<String>,
}

impl CheckStatus {
    fn ok() -> Self {
        Self {
            ok: true,
            error: None,
        }
    }

    fn failed(error: String) -> Self {
        Self {
            ok: false,
            error: Some(error),
        }
    }
}
