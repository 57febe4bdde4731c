//! The storage + row operations the QR-code manager depends on.

use crate::{
    errors::AppError,
    models::{
        object::UploadOptions,
        qr_code::{NewQrCode, QrCode},
    },
    state::AppState,
};
use bytes::Bytes;
use std::future::Future;
use tracing::error;
use uuid::Uuid;

pub trait QrCodeBackend {
    /// All QR codes, newest first.
    fn list_qr_codes(&self) -> impl Future<Output = Result<Vec<QrCode>, AppError>> + Send;

    fn upload_object(
        &self,
        bucket: &str,
        key: &str,
        data: Bytes,
        options: UploadOptions,
    ) -> impl Future<Output = Result<(), AppError>> + Send;

    fn public_url(&self, bucket: &str, key: &str) -> String;

    fn insert_qr_code(
        &self,
        new: NewQrCode,
    ) -> impl Future<Output = Result<QrCode, AppError>> + Send;

    fn delete_qr_code(&self, id: Uuid) -> impl Future<Output = Result<(), AppError>> + Send;

    /// Make `id` the single active QR code.
    fn activate_qr_code(&self, id: Uuid) -> impl Future<Output = Result<(), AppError>> + Send;
}

/// In-process backend: the manager talks to the same services the HTTP
/// handlers use.
impl QrCodeBackend for AppState {
    async fn list_qr_codes(&self) -> Result<Vec<QrCode>, AppError> {
        self.qr_codes.list().await
    }

    async fn upload_object(
        &self,
        bucket: &str,
        key: &str,
        data: Bytes,
        options: UploadOptions,
    ) -> Result<(), AppError> {
        self.storage
            .upload_object(bucket, key, data, options)
            .await
            .map(|_| ())
            .map_err(|err| {
                error!("upload of {}/{} failed: {}", bucket, key, err);
                AppError::storage(format!("Failed to upload {}", key))
            })
    }

    fn public_url(&self, bucket: &str, key: &str) -> String {
        self.storage.public_url(bucket, key)
    }

    async fn insert_qr_code(&self, new: NewQrCode) -> Result<QrCode, AppError> {
        self.qr_codes.insert(new).await
    }

    async fn delete_qr_code(&self, id: Uuid) -> Result<(), AppError> {
        self.qr_codes.delete(id).await
    }

    async fn activate_qr_code(&self, id: Uuid) -> Result<(), AppError> {
        self.qr_codes.activate(id).await.map(|_| ())
    }
}
