pub mod hero_image_service;
pub mod qr_code_service;
pub mod storage_service;
