//! QR-code rows. Activation is a single transaction so that readers never
//! see zero or two active rows; the partial unique index
//! `qr_codes_single_active` backs this at the schema level.

use crate::{
    errors::AppError,
    models::{
        bucket::QR_CODES_BUCKET,
        object::UploadOptions,
        qr_code::{NewQrCode, QrCode},
        upload::UploadedFile,
    },
    services::storage_service::{StorageService, generate_object_key},
};
use chrono::Utc;
use sqlx::{Sqlite, SqlitePool, Transaction};
use std::sync::Arc;
use tracing::{error, info};
use uuid::Uuid;

/// Cache lifetime hint for uploaded QR images, in seconds.
pub const QR_CODE_CACHE_CONTROL: &str = "3600";

const QR_CODE_COLUMNS: &str = "id, name, image_url, is_active, created_at, updated_at";

#[derive(Clone)]
pub struct QrCodeService {
    db: Arc<SqlitePool>,
    storage: StorageService,
}

impl QrCodeService {
    pub fn new(db: Arc<SqlitePool>, storage: StorageService) -> Self {
        Self { db, storage }
    }

    /// All rows, newest first.
    pub async fn list(&self) -> Result<Vec<QrCode>, AppError> {
        sqlx::query_as::<_, QrCode>(&format!(
            "SELECT {QR_CODE_COLUMNS} FROM qr_codes ORDER BY created_at DESC, rowid DESC"
        ))
        .fetch_all(&*self.db)
        .await
        .map_err(|err| {
            error!("qr code list failed: {}", err);
            AppError::database("Failed to load QR codes")
        })
    }

    /// Insert a row. When `is_active` is set, any other active row is cleared
    /// in the same transaction.
    pub async fn insert(&self, new: NewQrCode) -> Result<QrCode, AppError> {
        let name = new.name.trim();
        if name.is_empty() {
            return Err(AppError::missing_input("QR code name is required"));
        }

        let mut tx = self.db.begin().await.map_err(db_error)?;
        let now = Utc::now();
        if new.is_active {
            clear_active(&mut tx, None).await?;
        }

        let code = sqlx::query_as::<_, QrCode>(&format!(
            "INSERT INTO qr_codes (id, name, image_url, is_active, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?)
             RETURNING {QR_CODE_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(&new.image_url)
        .bind(new.is_active)
        .bind(now)
        .bind(now)
        .fetch_one(&mut *tx)
        .await
        .map_err(db_error)?;

        tx.commit().await.map_err(db_error)?;
        info!("qr code {} created (active: {})", code.id, code.is_active);
        Ok(code)
    }

    /// Store the image in the qr-codes bucket and record it. The row is active
    /// when the table holds no QR codes yet.
    pub async fn create(&self, name: &str, file: UploadedFile) -> Result<QrCode, AppError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::missing_input("QR code name is required"));
        }

        let key = generate_object_key(&file.file_name);
        let options = UploadOptions::new(
            Some(file.content_type_or_default()),
            QR_CODE_CACHE_CONTROL,
        );
        self.storage
            .upload_object(QR_CODES_BUCKET, &key, file.data, options)
            .await
            .map_err(|err| {
                error!("qr code upload to storage failed: {}", err);
                AppError::storage("Failed to upload QR code image")
            })?;
        let image_url = self.storage.public_url(QR_CODES_BUCKET, &key);

        let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM qr_codes")
            .fetch_one(&*self.db)
            .await
            .map_err(db_error)?;

        self.insert(NewQrCode {
            name: name.to_string(),
            image_url,
            is_active: existing == 0,
        })
        .await
    }

    /// Delete exactly the row with `id`. The stored image is left alone.
    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM qr_codes WHERE id = ?")
            .bind(id)
            .execute(&*self.db)
            .await
            .map_err(db_error)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("QR code {} not found", id)));
        }
        info!("qr code {} deleted", id);
        Ok(())
    }

    /// Make `id` the only active row. Both writes commit together or not at all.
    pub async fn activate(&self, id: Uuid) -> Result<QrCode, AppError> {
        let mut tx = self.db.begin().await.map_err(db_error)?;

        clear_active(&mut tx, Some(id)).await?;

        let code = sqlx::query_as::<_, QrCode>(&format!(
            "UPDATE qr_codes SET is_active = 1, updated_at = ? WHERE id = ?
             RETURNING {QR_CODE_COLUMNS}"
        ))
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(db_error)?
        .ok_or_else(|| AppError::not_found(format!("QR code {} not found", id)))?;

        tx.commit().await.map_err(db_error)?;
        info!("qr code {} activated", id);
        Ok(code)
    }
}

/// Clear `is_active` on every active row except `keep`.
async fn clear_active(
    tx: &mut Transaction<'_, Sqlite>,
    keep: Option<Uuid>,
) -> Result<(), AppError> {
    sqlx::query(
        "UPDATE qr_codes SET is_active = 0, updated_at = ?
         WHERE is_active = 1 AND (? IS NULL OR id <> ?)",
    )
    .bind(Utc::now())
    .bind(keep)
    .bind(keep)
    .execute(&mut **tx)
    .await
    .map_err(db_error)?;
    Ok(())
}

fn db_error(err: sqlx::Error) -> AppError {
    error!("qr code database operation failed: {}", err);
    AppError::database("QR code database operation failed")
}
