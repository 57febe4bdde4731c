#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Request, Response, StatusCode},
};
use carousel_admin::{AppState, db, routes::routes::routes};
use http_body_util::BodyExt;
use serde_json::Value;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

pub const PUBLIC_BASE_URL: &str = "http://assets.test";
pub const BOUNDARY: &str = "----carousel-admin-test-boundary";

/// A fresh database and storage root per test.
pub struct TestApp {
    pub state: AppState,
    pub router: Router,
    _dir: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_upload_limit(10 * 1024 * 1024).await
    }

    pub async fn with_upload_limit(max_upload_bytes: usize) -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let db_url = format!("sqlite://{}", dir.path().join("meta.db").display());
        let pool = db::connect(&db_url).await.expect("connect sqlite");
        db::run_migrations(&pool).await.expect("migrate");

        let state = AppState::new(Arc::new(pool), dir.path().join("objects"), PUBLIC_BASE_URL);
        state.ensure_buckets().await.expect("buckets");

        let router = routes(max_upload_bytes).with_state(state.clone());
        Self {
            state,
            router,
            _dir: dir,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible")
    }

    pub async fn count(&self, table: &str) -> i64 {
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
            .fetch_one(&*self.state.storage.db)
            .await
            .expect("count rows")
    }
}

pub enum Part<'a> {
    Text(&'a str, &'a str),
    File {
        field: &'a str,
        file_name: &'a str,
        content_type: &'a str,
        data: &'a [u8],
    },
}

pub fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name)
                        .as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File {
                field,
                file_name,
                content_type,
                data,
            } => {
                body.extend_from_slice(
                    format!(
                        concat!(
                            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                            "Content-Type: {}\r\n\r\n"
                        ),
                        field, file_name, content_type
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(data);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub fn multipart_request(uri: &str, parts: &[Part<'_>]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(multipart_body(parts)))
        .expect("request")
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .expect("read body")
        .to_bytes()
        .to_vec()
}

pub async fn json_body(response: Response<Body>) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = body_bytes(response).await;
    (status, serde_json::from_slice(&bytes).expect("json body"))
}

/// Bytes that look enough like a PNG for tests; only the declared type matters.
pub fn fake_png(len: usize) -> Vec<u8> {
    let mut data = vec![0u8; len];
    let signature = [0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];
    let n = signature.len().min(len);
    data[..n].copy_from_slice(&signature[..n]);
    data
}
