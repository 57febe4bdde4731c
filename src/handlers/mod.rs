pub mod health_handlers;
pub mod hero_image_handlers;
pub mod multipart;
pub mod object_handlers;
pub mod qr_code_handlers;
