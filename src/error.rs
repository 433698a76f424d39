//! Error types for the storage engine and its HTTP surface
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Storage Error Enum ==
/// Unified error type for drivers, the registry and the HTTP surface.
#[derive(Error, Debug)]
pub enum StorageError {
    /// No driver registered under this name
    #[error("storage: unknown driver {0:?} (forgotten registration?)")]
    UnknownDriver(String),

    /// A driver was registered twice under the same name
    #[error("storage: register called twice for driver {0:?}")]
    DuplicateDriver(String),

    /// The driver's initializer failed
    #[error("storage: {name:?} driver init failed")]
    DriverInit {
        name: String,
        #[source]
        source: Box<StorageError>,
    },

    /// Stored value is missing or cannot be read as an integer
    #[error("unable to find or parse the integer at {key:?}, found: {found}")]
    NotAnInteger { key: String, found: String },

    /// Failure reported by a driver implementation
    #[error("backend error: {0}")]
    Backend(String),

    /// Key not found
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for StorageError {
    fn into_response(self) -> Response {
        let status = match &self {
            StorageError::NotFound(_) => StatusCode::NOT_FOUND,
            StorageError::NotAnInteger { .. } | StorageError::InvalidRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            StorageError::UnknownDriver(_)
            | StorageError::DuplicateDriver(_)
            | StorageError::DriverInit { .. }
            | StorageError::Backend(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (status, Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the storage engine.
pub type Result<T> = std::result::Result<T, StorageError>;
