//! HTTP handlers for the hero-image carousel.

use crate::{
    errors::AppError,
    handlers::multipart::{multipart_error, read_file, read_text},
    models::{
        hero_image::{HeroImage, HeroImageFields},
        upload::UploadedFile,
    },
    state::AppState,
};
use axum::{
    Json,
    extract::{Multipart, Query, State},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

#[derive(Debug, Serialize)]
pub struct UploadHeroImageResponse {
    pub success: bool,
    pub image: HeroImage,
    pub message: String,
}

#[derive(Debug, Deserialize, Default)]
pub struct ListHeroImagesQuery {
    pub active: Option<bool>,
}

/// `POST /api/hero-images/upload`
///
/// Multipart fields:
/// - `file`: the image (required)
/// - `title`, `subtitle`, `description`: optional text
/// - `display_order`: optional integer, 0 when unparsable
/// - `show_content`: `"true"` to render the caption overlay
pub async fn upload_hero_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadHeroImageResponse>, AppError> {
    let mut file: Option<UploadedFile> = None;
    let mut fields = HeroImageFields::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error("multipart data", e))?
    {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "file" => file = Some(read_file(field).await?),
            "title" => fields.title = read_text(field).await?,
            "subtitle" => fields.subtitle = read_text(field).await?,
            "description" => fields.description = read_text(field).await?,
            "display_order" => {
                let raw = read_text(field).await?;
                fields.display_order = HeroImageFields::parse_display_order(&raw);
            }
            "show_content" => {
                let raw = read_text(field).await?;
                fields.show_content = HeroImageFields::parse_show_content(&raw);
            }
            _ => debug!("Ignoring unknown field: {}", field_name),
        }
    }

    let file = file.ok_or_else(|| {
        warn!("hero image upload rejected: no file provided");
        AppError::missing_input("No file provided")
    })?;

    let image = state.hero_images.upload(file, fields).await?;

    Ok(Json(UploadHeroImageResponse {
        success: true,
        image,
        message: "Hero image uploaded successfully".to_string(),
    }))
}

/// `GET /api/hero-images` — carousel order; `?active=true` hides inactive slides.
pub async fn list_hero_images(
    State(state): State<AppState>,
    Query(query): Query<ListHeroImagesQuery>,
) -> Result<Json<Vec<HeroImage>>, AppError> {
    let images = state
        .hero_images
        .list(query.active.unwrap_or(false))
        .await?;
    Ok(Json(images))
}
