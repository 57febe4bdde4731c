use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;

use crate::services::storage_service::StorageError;

/// What went wrong, independent of the human-readable message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A required input (file, name) was not supplied.
    MissingInput,
    /// An input was supplied but rejected (size, media type, bad form data).
    InvalidInput,
    NotFound,
    /// The request body exceeded the configured upload limit.
    PayloadTooLarge,
    /// The operation is already in flight.
    Busy,
    /// Object storage rejected the operation.
    Storage,
    /// The row database rejected the operation.
    Database,
    Unexpected,
}

impl ErrorKind {
    pub fn status(self) -> StatusCode {
        match self {
            ErrorKind::MissingInput | ErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ErrorKind::Busy => StatusCode::CONFLICT,
            ErrorKind::Storage | ErrorKind::Database | ErrorKind::Unexpected => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// A lightweight error carrying its kind, HTTP status and a short message.
#[derive(Debug, Clone)]
pub struct AppError {
    pub kind: ErrorKind,
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    /// Create a new AppError of the given kind; the status follows the kind.
    pub fn new(kind: ErrorKind, msg: impl Into<String>) -> Self {
        Self {
            kind,
            status: kind.status(),
            message: msg.into(),
        }
    }

    pub fn missing_input(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::MissingInput, msg)
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidInput, msg)
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, msg)
    }

    pub fn payload_too_large(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::PayloadTooLarge, msg)
    }

    pub fn busy(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Busy, msg)
    }

    pub fn storage(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Storage, msg)
    }

    pub fn database(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Database, msg)
    }

    /// Shortcut for a 500 Internal Server Error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unexpected, msg)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "error": self.message }));
        (self.status, body).into_response()
    }
}

/// Used by the object-serving routes, where a missing key is a 404.
/// Write paths map storage failures with [`AppError::storage`] instead.
impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::BucketNotFound(_) | StorageError::ObjectNotFound { .. } => {
                AppError::not_found(err.to_string())
            }
            StorageError::InvalidObjectKey | StorageError::InvalidBucketName { .. } => {
                AppError::invalid_input(err.to_string())
            }
            other => AppError::storage(other.to_string()),
        }
    }
}
