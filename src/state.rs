//! Shared state carried by the router.

use crate::{
    models::bucket::{HERO_IMAGES_BUCKET, QR_CODES_BUCKET},
    services::{
        hero_image_service::HeroImageService, qr_code_service::QrCodeService,
        storage_service::{StorageResult, StorageService},
    },
};
use sqlx::SqlitePool;
use std::{path::PathBuf, sync::Arc};

#[derive(Clone)]
pub struct AppState {
    pub storage: StorageService,
    pub hero_images: HeroImageService,
    pub qr_codes: QrCodeService,
}

impl AppState {
    pub fn new(
        db: Arc<SqlitePool>,
        storage_dir: impl Into<PathBuf>,
        public_base_url: impl Into<String>,
    ) -> Self {
        let storage = StorageService::new(db.clone(), storage_dir, public_base_url);
        Self {
            hero_images: HeroImageService::new(db.clone(), storage.clone()),
            qr_codes: QrCodeService::new(db, storage.clone()),
            storage,
        }
    }

    /// Create the buckets the admin panel writes to.
    pub async fn ensure_buckets(&self) -> StorageResult<()> {
        for bucket in [HERO_IMAGES_BUCKET, QR_CODES_BUCKET] {
            self.storage.ensure_bucket(bucket).await?;
        }
        Ok(())
    }
}
