//! Error types for the Uploader server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::session::SessionError;
use crate::storage::StorageError;
use crate::transfer::TransferError;

/// Application-wide result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Upload failed: {0}")]
    Session(#[from] SessionError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Transfer error: {0}")]
    Transfer(#[from] TransferError),
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

fn storage_status(e: &StorageError) -> (StatusCode, &'static str, String) {
    match e {
        StorageError::PathEscapesRoot(_) | StorageError::InvalidName(_) => {
            (StatusCode::BAD_REQUEST, "invalid_name", e.to_string())
        }
        StorageError::Root { .. } => {
            tracing::error!("Storage error: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "storage_error",
                "Storage error".to_string(),
            )
        }
    }
}

fn transfer_status(e: &TransferError) -> (StatusCode, &'static str, String) {
    match e {
        TransferError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found", "Object not found".to_string()),
        _ => {
            tracing::error!("Transfer error: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "transfer_error",
                "Transfer failed".to_string(),
            )
        }
    }
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
            AppError::Session(e) => match e {
                SessionError::Unauthorized(file_name) => (
                    StatusCode::BAD_REQUEST,
                    "unauthorized",
                    format!("Failed authorization for file {}", file_name),
                ),
                SessionError::Parse(e) => {
                    tracing::error!("Multipart error: {}", e);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "parse_error",
                        e.to_string(),
                    )
                }
                SessionError::Storage(e) => storage_status(e),
                SessionError::Transfer(e) => transfer_status(e),
            },
            AppError::Storage(e) => storage_status(e),
            AppError::Transfer(e) => transfer_status(e),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = self.parts();

        let body = ErrorResponse {
            error: error_type.to_string(),
            message,
            details: None,
        };

        (status, Json(body)).into_response()
    }
}
