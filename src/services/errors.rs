use std::net::AddrParseError;

use axum::{
    Json,
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use log::{debug, error};
use serde_json::json;
use thiserror::Error;

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the services and their configuration
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed request, answered with 422
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The multipart stream broke or exceeded the body limit
    #[error("Upload error: {0}")]
    Upload(#[from] MultipartError),

    /// Writing an upload failed
    #[error("Storage error: {0}")]
    Io(#[from] std::io::Error),

    /// Bad environment or flag values at startup
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

impl Error {
    /// HTTP status this error is answered with
    pub fn status(&self) -> StatusCode {
        match self {
            Error::InvalidRequest(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Error::Upload(e) => e.status(),
            Error::Io(_) | Error::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<std::env::VarError> for Error {
    fn from(err: std::env::VarError) -> Self {
        Error::ConfigurationError(err.to_string())
    }
}

impl From<AddrParseError> for Error {
    fn from(err: AddrParseError) -> Self {
        Error::ConfigurationError(err.to_string())
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {self}");
        } else {
            debug!("Rejected request: {self}");
        }
        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}
