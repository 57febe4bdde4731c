mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use bytes::Bytes;
use carousel_admin::{
    AppState,
    errors::{AppError, ErrorKind},
    manager::{MAX_QR_FILE_BYTES, QrCodeBackend, QrCodeManager},
    models::{
        object::UploadOptions,
        qr_code::{NewQrCode, QrCode},
        upload::UploadedFile,
    },
};
use common::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use uuid::Uuid;

fn png(name: &str, len: usize) -> UploadedFile {
    UploadedFile::new(name, Some("image/png".to_string()), fake_png(len))
}

async fn manager_with(app: &TestApp) -> QrCodeManager<AppState> {
    let mut manager = QrCodeManager::new(app.state.clone());
    manager.refresh().await.expect("initial list");
    manager
}

async fn upload(manager: &mut QrCodeManager<AppState>, name: &str) -> QrCode {
    manager.select_file(png("qr.png", 1024)).expect("select");
    manager.set_name(name);
    manager.upload().await.expect("upload")
}

#[tokio::test]
async fn first_upload_is_active_and_second_is_not() {
    let app = TestApp::new().await;
    let mut manager = manager_with(&app).await;

    manager
        .select_file(png("payment.PNG", 2 * 1024 * 1024))
        .unwrap();
    manager.set_name("  Payment QR ");
    let payment = manager.upload().await.unwrap();
    assert!(payment.is_active);
    assert_eq!(payment.name, "Payment QR");
    assert!(payment.image_url.starts_with(PUBLIC_BASE_URL));
    assert!(payment.image_url.ends_with(".png"));

    // form fields reset and the list was re-fetched
    assert!(manager.selected_file.is_none());
    assert!(manager.name.is_empty());
    assert!(manager.success.is_some());
    assert_eq!(manager.codes.len(), 1);

    manager.select_file(png("backup.png", 512)).unwrap();
    manager.set_name("Backup QR");
    let backup = manager.upload().await.unwrap();
    assert!(!backup.is_active);

    assert_eq!(manager.codes.len(), 2);
    assert_eq!(manager.codes[0].id, backup.id, "newest first");
    assert_eq!(manager.active().map(|c| c.id), Some(payment.id));
    assert_eq!(app.count("objects").await, 2);
}

#[tokio::test]
async fn toggling_moves_the_single_active_flag() {
    let app = TestApp::new().await;
    let mut manager = manager_with(&app).await;
    let a = upload(&mut manager, "A").await;
    let b = upload(&mut manager, "B").await;
    assert!(a.is_active);

    manager.toggle_active(b.id).await.unwrap();

    let active: Vec<Uuid> = manager
        .codes
        .iter()
        .filter(|c| c.is_active)
        .map(|c| c.id)
        .collect();
    assert_eq!(active, vec![b.id]);

    // toggling the already active row keeps exactly one active
    manager.toggle_active(b.id).await.unwrap();
    assert_eq!(manager.codes.iter().filter(|c| c.is_active).count(), 1);
}

#[tokio::test]
async fn toggling_unknown_id_keeps_current_active() {
    let app = TestApp::new().await;
    let mut manager = manager_with(&app).await;
    let a = upload(&mut manager, "A").await;

    let err = manager.toggle_active(Uuid::new_v4()).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
    assert!(manager.error.is_some());

    manager.refresh().await.unwrap();
    assert_eq!(manager.active().map(|c| c.id), Some(a.id));
}

#[tokio::test]
async fn delete_removes_exactly_that_row() {
    let app = TestApp::new().await;
    let mut manager = manager_with(&app).await;
    let a = upload(&mut manager, "A").await;
    let b = upload(&mut manager, "B").await;

    let deleted = manager.delete(a.id, &|_: &str| true).await.unwrap();
    assert!(deleted);
    assert_eq!(manager.codes.len(), 1);
    assert_eq!(manager.codes[0].id, b.id);
    assert_eq!(app.count("qr_codes").await, 1);
}

#[tokio::test]
async fn declined_delete_does_nothing() {
    let app = TestApp::new().await;
    let mut manager = manager_with(&app).await;
    let a = upload(&mut manager, "A").await;

    let deleted = manager.delete(a.id, &|_: &str| false).await.unwrap();
    assert!(!deleted);
    assert_eq!(app.count("qr_codes").await, 1);
}

#[tokio::test]
async fn download_points_at_the_stored_object() {
    let app = TestApp::new().await;
    let mut manager = manager_with(&app).await;
    let code = upload(&mut manager, "Payment QR").await;

    let link = manager.download(&code);
    assert_eq!(link.href, code.image_url);
    assert_eq!(link.file_name, "Payment QR.png");

    let path = code.image_url.trim_start_matches(PUBLIC_BASE_URL);
    let response = app
        .send(Request::get(path).body(Body::empty()).unwrap())
        .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn inserting_an_active_row_clears_the_previous_one() {
    let app = TestApp::new().await;
    let first = app
        .state
        .qr_codes
        .insert(NewQrCode {
            name: "first".into(),
            image_url: "u1".into(),
            is_active: true,
        })
        .await
        .unwrap();
    let second = app
        .state
        .qr_codes
        .insert(NewQrCode {
            name: "second".into(),
            image_url: "u2".into(),
            is_active: true,
        })
        .await
        .unwrap();

    let codes = app.state.qr_codes.list().await.unwrap();
    let active: Vec<Uuid> = codes.iter().filter(|c| c.is_active).map(|c| c.id).collect();
    assert_eq!(active, vec![second.id]);
    assert!(codes.iter().any(|c| c.id == first.id && !c.is_active));
}

#[tokio::test]
async fn http_surface_creates_activates_and_deletes() {
    let app = TestApp::new().await;
    let data = fake_png(64);

    let mut ids = Vec::new();
    for name in ["Payment QR", "Backup QR"] {
        let response = app
            .send(multipart_request(
                "/api/qr-codes",
                &[
                    Part::Text("name", name),
                    Part::File {
                        field: "file",
                        file_name: "code.png",
                        content_type: "image/png",
                        data: &data,
                    },
                ],
            ))
            .await;
        let (status, body) = json_body(response).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["is_active"], name == "Payment QR");
        ids.push(body["id"].as_str().unwrap().to_string());
    }

    let response = app
        .send(
            Request::post(format!("/api/qr-codes/{}/activate", ids[1]))
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    let (status, body) = json_body(response).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_active"], true);

    let response = app
        .send(
            Request::delete(format!("/api/qr-codes/{}", ids[0]))
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .send(Request::get("/api/qr-codes").body(Body::empty()).unwrap())
        .await;
    let (_, body) = json_body(response).await;
    let listed = body.as_array().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["id"].as_str().unwrap(), ids[1]);

    let response = app
        .send(
            Request::delete(format!("/api/qr-codes/{}", ids[0]))
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn http_create_requires_a_name() {
    let app = TestApp::new().await;
    let response = app
        .send(multipart_request(
            "/api/qr-codes",
            &[
                Part::Text("name", "   "),
                Part::File {
                    field: "file",
                    file_name: "code.png",
                    content_type: "image/png",
                    data: b"png",
                },
            ],
        ))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(app.count("qr_codes").await, 0);
}

/// Backend that counts each operation and fails those not switched on.
#[derive(Default)]
struct CountingBackend {
    uploads_succeed: bool,
    inserts_succeed: bool,
    lists_succeed: bool,
    uploads: AtomicUsize,
    inserts: AtomicUsize,
    lists: AtomicUsize,
    deletes: AtomicUsize,
    activations: AtomicUsize,
}

impl CountingBackend {
    fn calls(&self) -> usize {
        [
            &self.uploads,
            &self.inserts,
            &self.lists,
            &self.deletes,
            &self.activations,
        ]
        .iter()
        .map(|counter| counter.load(Ordering::SeqCst))
        .sum()
    }

    fn count(counter: &AtomicUsize, succeed: bool) -> Result<(), AppError> {
        counter.fetch_add(1, Ordering::SeqCst);
        if succeed {
            Ok(())
        } else {
            Err(AppError::database("unavailable"))
        }
    }
}

fn loaded(counter: &AtomicUsize) -> usize {
    counter.load(Ordering::SeqCst)
}

impl QrCodeBackend for CountingBackend {
    async fn list_qr_codes(&self) -> Result<Vec<QrCode>, AppError> {
        Self::count(&self.lists, self.lists_succeed)?;
        Ok(Vec::new())
    }

    async fn upload_object(
        &self,
        _bucket: &str,
        _key: &str,
        _data: Bytes,
        _options: UploadOptions,
    ) -> Result<(), AppError> {
        Self::count(&self.uploads, self.uploads_succeed)
    }

    fn public_url(&self, bucket: &str, key: &str) -> String {
        format!("{PUBLIC_BASE_URL}/objects/{bucket}/{key}")
    }

    async fn insert_qr_code(&self, new: NewQrCode) -> Result<QrCode, AppError> {
        Self::count(&self.inserts, self.inserts_succeed)?;
        let now = chrono::Utc::now();
        Ok(QrCode {
            id: Uuid::new_v4(),
            name: new.name,
            image_url: new.image_url,
            is_active: new.is_active,
            created_at: now,
            updated_at: now,
        })
    }

    async fn delete_qr_code(&self, _id: Uuid) -> Result<(), AppError> {
        Self::count(&self.deletes, false)
    }

    async fn activate_qr_code(&self, _id: Uuid) -> Result<(), AppError> {
        Self::count(&self.activations, false)
    }
}

fn cached_code(name: &str) -> QrCode {
    let now = chrono::Utc::now();
    QrCode {
        id: Uuid::new_v4(),
        name: name.into(),
        image_url: "u".into(),
        is_active: true,
        created_at: now,
        updated_at: now,
    }
}

#[tokio::test]
async fn oversized_or_non_image_files_are_rejected_locally() {
    let mut manager = QrCodeManager::new(CountingBackend::default());

    let err = manager
        .select_file(png("huge.png", MAX_QR_FILE_BYTES + 1))
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidInput);
    assert!(manager.selected_file.is_none());
    assert!(manager.error.is_some());

    let pdf = UploadedFile::new("menu.pdf", Some("application/pdf".into()), vec![1u8; 10]);
    let err = manager.select_file(pdf).unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidInput);
    assert!(manager.selected_file.is_none());

    let untyped = UploadedFile::new("mystery.png", None, vec![1u8; 10]);
    assert!(manager.select_file(untyped).is_err());

    // exactly at the limit is fine
    manager
        .select_file(png("edge.png", MAX_QR_FILE_BYTES))
        .unwrap();
    assert!(manager.selected_file.is_some());
    assert!(manager.error.is_none());

    assert_eq!(manager.backend().calls(), 0);
}

#[tokio::test]
async fn upload_needs_file_and_name_before_any_call() {
    let mut manager = QrCodeManager::new(CountingBackend::default());

    manager.set_name("Payment QR");
    let err = manager.upload().await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::MissingInput);

    manager.select_file(png("qr.png", 10)).unwrap();
    manager.set_name("   ");
    let err = manager.upload().await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::MissingInput);
    assert!(manager.error.is_some());

    assert_eq!(manager.backend().calls(), 0);
}

#[tokio::test]
async fn failed_upload_keeps_form_and_stops_early() {
    let mut manager = QrCodeManager::new(CountingBackend::default());
    manager.select_file(png("qr.png", 10)).unwrap();
    manager.set_name("Payment QR");

    let err = manager.upload().await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Database);
    // storage rejected it, so insert and reload never ran
    assert_eq!(manager.backend().calls(), 1);
    assert!(manager.selected_file.is_some());
    assert_eq!(manager.name, "Payment QR");
    assert!(!manager.uploading);
    assert!(manager.error.is_some());
    assert!(manager.success.is_none());
}

#[tokio::test]
async fn failed_refresh_keeps_previous_list() {
    let mut manager = QrCodeManager::new(CountingBackend::default());
    manager.codes = vec![cached_code("cached")];

    assert!(manager.refresh().await.is_err());
    assert_eq!(manager.codes.len(), 1);
    assert!(!manager.loading);
    assert!(manager.error.is_some());
}

#[tokio::test]
async fn failed_insert_after_stored_image_keeps_form_and_skips_reload() {
    let mut manager = QrCodeManager::new(CountingBackend {
        uploads_succeed: true,
        ..Default::default()
    });
    manager.select_file(png("qr.png", 10)).unwrap();
    manager.set_name("Payment QR");

    let err = manager.upload().await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Database);
    let backend = manager.backend();
    assert_eq!(loaded(&backend.uploads), 1);
    assert_eq!(loaded(&backend.inserts), 1);
    assert_eq!(loaded(&backend.lists), 0);
    assert!(manager.selected_file.is_some());
    assert_eq!(manager.name, "Payment QR");
    assert!(!manager.uploading);
    assert!(manager.error.is_some());
    assert!(manager.success.is_none());
}

#[tokio::test]
async fn failed_delete_leaves_the_list_alone() {
    let mut manager = QrCodeManager::new(CountingBackend::default());
    let kept = cached_code("kept");
    let id = kept.id;
    manager.codes = vec![kept];

    let err = manager.delete(id, &|_: &str| true).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Database);
    assert_eq!(manager.codes.len(), 1);
    assert_eq!(manager.codes[0].id, id);
    assert!(manager.error.is_some());
    assert!(manager.success.is_none());
    assert_eq!(loaded(&manager.backend().deletes), 1);
    assert_eq!(manager.backend().calls(), 1);
}

#[tokio::test]
async fn failed_reload_after_upload_keeps_the_success_message() {
    let mut manager = QrCodeManager::new(CountingBackend {
        uploads_succeed: true,
        inserts_succeed: true,
        ..Default::default()
    });
    manager.select_file(png("qr.PNG?v=1", 10)).unwrap();
    manager.set_name("Payment QR");

    let code = manager.upload().await.unwrap();
    assert!(code.is_active);
    assert!(!code.image_url.contains('?'), "got {}", code.image_url);
    assert!(manager.success.is_some());
    assert!(manager.error.is_some());
    assert!(!manager.loading);
    assert!(manager.selected_file.is_none());
    assert!(manager.name.is_empty());
    assert_eq!(loaded(&manager.backend().lists), 1);
}
