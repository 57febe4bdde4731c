//! Admin backend for a website's hero-image carousel and QR-code assets.

pub mod config;
pub mod db;
pub mod errors;
pub mod handlers;
pub mod manager;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

pub use state::AppState;
