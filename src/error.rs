// src/error.rs
use crate::config::ConfigError;
use crate::models::auth::ErrorResponse;
use axum::{http::StatusCode, Json};
use thiserror::Error;

/// Error shape every JSON handler answers with.
pub type ApiError = (StatusCode, Json<ErrorResponse>);

pub fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (
        status,
        Json(ErrorResponse {
            success: false,
            message: message.into(),
        }),
    )
}

pub fn internal_error() -> ApiError {
    api_error(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
}

/// Fatal startup errors. Nothing after the listener is bound produces one.
#[derive(Error, Debug)]
pub enum PortalError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("logging setup failed: {0}")]
    Logging(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
