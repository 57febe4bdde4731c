//! QR-code management panel.

pub mod backend;
pub mod qr_code_manager;

pub use backend::QrCodeBackend;
pub use qr_code_manager::{Confirm, DownloadLink, MAX_QR_FILE_BYTES, QrCodeManager};
