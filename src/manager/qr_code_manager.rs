//! The QR-code management panel as an explicit state struct.
//!
//! Each operation returns its outcome and also mirrors it into the banner
//! fields (`error`, `success`) that a front end renders.

use crate::{
    errors::AppError,
    manager::backend::QrCodeBackend,
    models::{
        bucket::QR_CODES_BUCKET,
        object::UploadOptions,
        qr_code::{NewQrCode, QrCode},
        upload::UploadedFile,
    },
    services::{
        qr_code_service::QR_CODE_CACHE_CONTROL,
        storage_service::{file_extension, generate_object_key},
    },
};
use tracing::{info, warn};
use uuid::Uuid;

/// Largest accepted QR image: 5 MiB.
pub const MAX_QR_FILE_BYTES: usize = 5 * 1024 * 1024;

const IMAGE_MEDIA_PREFIX: &str = "image/";
const DEFAULT_DOWNLOAD_EXTENSION: &str = "png";

/// Asks the operator to confirm a destructive action.
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Where to point a transient download link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadLink {
    pub href: String,
    /// Suggested filename for the saved file.
    pub file_name: String,
}

pub struct QrCodeManager<B> {
    backend: B,
    pub codes: Vec<QrCode>,
    pub loading: bool,
    pub uploading: bool,
    pub selected_file: Option<UploadedFile>,
    pub name: String,
    pub error: Option<String>,
    pub success: Option<String>,
}

impl<B: QrCodeBackend> QrCodeManager<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            codes: Vec::new(),
            loading: false,
            uploading: false,
            selected_file: None,
            name: String::new(),
            error: None,
            success: None,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Dismiss both banners.
    pub fn clear_messages(&mut self) {
        self.error = None;
        self.success = None;
    }

    /// The active QR code, if any.
    pub fn active(&self) -> Option<&QrCode> {
        self.codes.iter().find(|code| code.is_active)
    }

    /// Reload the list. On failure the previous list is kept.
    pub async fn refresh(&mut self) -> Result<(), AppError> {
        match self.reload().await {
            Ok(()) => Ok(()),
            Err(err) => Err(self.fail(err)),
        }
    }

    async fn reload(&mut self) -> Result<(), AppError> {
        if self.loading {
            return Err(AppError::busy("QR codes are already loading"));
        }
        self.loading = true;
        let result = self.backend.list_qr_codes().await;
        self.loading = false;

        self.codes = result?;
        Ok(())
    }

    /// Reload after a mutation that already went through. A failed reload
    /// reports the error next to the success banner instead of replacing it.
    async fn reload_after_change(&mut self) {
        if let Err(err) = self.reload().await {
            warn!("qr code manager: reload after change failed: {}", err);
            self.error = Some(err.message);
        }
    }

    /// Accept a file for the next upload. Only the declared type is checked.
    pub fn select_file(&mut self, file: UploadedFile) -> Result<(), AppError> {
        if file.size() > MAX_QR_FILE_BYTES {
            return Err(self.fail(AppError::invalid_input("File size must be less than 5MB")));
        }
        let is_image = file
            .content_type
            .as_deref()
            .is_some_and(|ct| ct.starts_with(IMAGE_MEDIA_PREFIX));
        if !is_image {
            return Err(self.fail(AppError::invalid_input("Please select an image file")));
        }

        self.error = None;
        self.selected_file = Some(file);
        Ok(())
    }

    /// Store the selected file and record it. The new row is active only when
    /// the locally held list is empty.
    pub async fn upload(&mut self) -> Result<QrCode, AppError> {
        let name = self.name.trim().to_string();
        let Some(file) = self.selected_file.clone() else {
            return Err(self.fail(AppError::missing_input(
                "Please select a file and enter a name",
            )));
        };
        if name.is_empty() {
            return Err(self.fail(AppError::missing_input(
                "Please select a file and enter a name",
            )));
        }
        if self.uploading {
            return Err(self.fail(AppError::busy("An upload is already in progress")));
        }

        self.uploading = true;
        self.clear_messages();
        let is_active = self.codes.is_empty();
        let result = self.store_and_record(name, file, is_active).await;
        self.uploading = false;

        let code = match result {
            Ok(code) => code,
            Err(err) => return Err(self.fail(err)),
        };

        info!("uploaded qr code {} ({})", code.id, code.name);
        self.selected_file = None;
        self.name.clear();
        self.success = Some("QR code uploaded successfully".to_string());
        self.reload_after_change().await;
        Ok(code)
    }

    async fn store_and_record(
        &self,
        name: String,
        file: UploadedFile,
        is_active: bool,
    ) -> Result<QrCode, AppError> {
        let key = generate_object_key(&file.file_name);
        let options = UploadOptions::new(file.content_type.clone(), QR_CODE_CACHE_CONTROL);
        self.backend
            .upload_object(QR_CODES_BUCKET, &key, file.data, options)
            .await?;

        let image_url = self.backend.public_url(QR_CODES_BUCKET, &key);
        self.backend
            .insert_qr_code(NewQrCode {
                name,
                image_url,
                is_active,
            })
            .await
    }

    /// Delete after confirmation. Returns `Ok(false)` when the operator declines.
    pub async fn delete(&mut self, id: Uuid, confirm: &impl Confirm) -> Result<bool, AppError> {
        if !confirm.confirm("Are you sure you want to delete this QR code?") {
            return Ok(false);
        }

        self.clear_messages();
        if let Err(err) = self.backend.delete_qr_code(id).await {
            return Err(self.fail(err));
        }

        self.success = Some("QR code deleted successfully".to_string());
        self.reload_after_change().await;
        Ok(true)
    }

    /// Make `id` the single active QR code, then reload.
    pub async fn toggle_active(&mut self, id: Uuid) -> Result<(), AppError> {
        self.clear_messages();
        if let Err(err) = self.backend.activate_qr_code(id).await {
            return Err(self.fail(err));
        }

        self.success = Some("Active QR code updated".to_string());
        self.reload_after_change().await;
        Ok(())
    }

    /// Client-local download link; the URL is not checked for reachability.
    pub fn download(&self, code: &QrCode) -> DownloadLink {
        DownloadLink {
            href: code.image_url.clone(),
            file_name: download_file_name(code),
        }
    }

    fn fail(&mut self, err: AppError) -> AppError {
        warn!("qr code manager: {}", err);
        self.success = None;
        self.error = Some(err.message.clone());
        err
    }
}

/// `{name}.{ext}` with the extension taken from the stored object's URL.
fn download_file_name(code: &QrCode) -> String {
    let last_segment = code.image_url.rsplit('/').next().unwrap_or_default();
    let ext = file_extension(last_segment)
        .unwrap_or_else(|| DEFAULT_DOWNLOAD_EXTENSION.to_string());
    format!("{}.{}", code.name.trim(), ext)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn code(name: &str, url: &str) -> QrCode {
        QrCode {
            id: Uuid::new_v4(),
            name: name.into(),
            image_url: url.into(),
            is_active: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn download_name_uses_url_extension() {
        let c = code(
            "Payment QR",
            "http://localhost:3000/objects/qr-codes/1700000000000-ab12cd34.jpeg",
        );
        assert_eq!(download_file_name(&c), "Payment QR.jpeg");
    }

    #[test]
    fn download_name_defaults_to_png() {
        let c = code(
            "Backup QR",
            "http://localhost:3000/objects/qr-codes/1700000000000-ab12cd34",
        );
        assert_eq!(download_file_name(&c), "Backup QR.png");
    }
}
