//! Hero-image upload: store the file, then record it.

use crate::{
    errors::AppError,
    models::{
        bucket::HERO_IMAGES_BUCKET,
        hero_image::{HeroImage, HeroImageFields},
        object::UploadOptions,
        upload::UploadedFile,
    },
    services::storage_service::{StorageService, generate_object_key},
};
use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use std::sync::Arc;
use tracing::{error, info};
use uuid::Uuid;

/// Cache lifetime hint for uploaded hero images, in seconds.
pub const HERO_IMAGE_CACHE_CONTROL: &str = "3600";

const HERO_IMAGE_COLUMNS: &str = "id, file_name, file_url, title, subtitle, description, \
     display_order, show_content, is_active, created_at";

#[derive(Clone)]
pub struct HeroImageService {
    db: Arc<SqlitePool>,
    storage: StorageService,
}

impl HeroImageService {
    pub fn new(db: Arc<SqlitePool>, storage: StorageService) -> Self {
        Self { db, storage }
    }

    /// Upload `file` to the hero-images bucket and insert its row.
    ///
    /// An insert failure leaves the stored object in place.
    pub async fn upload(
        &self,
        file: UploadedFile,
        fields: HeroImageFields,
    ) -> Result<HeroImage, AppError> {
        let file_name = generate_object_key(&file.file_name);
        let options = UploadOptions::new(
            Some(file.content_type_or_default()),
            HERO_IMAGE_CACHE_CONTROL,
        );

        self.storage
            .upload_object(HERO_IMAGES_BUCKET, &file_name, file.data, options)
            .await
            .map_err(|err| {
                error!("hero image upload to storage failed: {}", err);
                AppError::storage("Failed to upload file to storage")
            })?;

        let file_url = self.storage.public_url(HERO_IMAGES_BUCKET, &file_name);

        let image = sqlx::query_as::<_, HeroImage>(&format!(
            "INSERT INTO hero_images (
                id, file_name, file_url, title, subtitle, description,
                display_order, show_content, is_active, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, 1, ?)
            RETURNING {HERO_IMAGE_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(&file_name)
        .bind(&file_url)
        .bind(&fields.title)
        .bind(&fields.subtitle)
        .bind(&fields.description)
        .bind(fields.display_order)
        .bind(fields.show_content)
        .bind(Utc::now())
        .fetch_one(&*self.db)
        .await
        .map_err(|err| {
            error!("hero image insert failed for {}: {}", file_name, err);
            AppError::database("Failed to save image metadata")
        })?;

        info!("hero image {} stored as {}", image.id, image.file_name);
        Ok(image)
    }

    /// Carousel order: `display_order` ascending, oldest first on ties.
    pub async fn list(&self, active_only: bool) -> Result<Vec<HeroImage>, AppError> {
        let mut builder = QueryBuilder::<Sqlite>::new(format!(
            "SELECT {HERO_IMAGE_COLUMNS} FROM hero_images"
        ));
        if active_only {
            builder.push(" WHERE is_active = 1");
        }
        builder.push(" ORDER BY display_order ASC, created_at ASC");

        let images = builder
            .build_query_as::<HeroImage>()
            .fetch_all(&*self.db)
            .await
            .map_err(|err| {
                error!("hero image list failed: {}", err);
                AppError::database("Failed to load hero images")
            })?;
        Ok(images)
    }
}
