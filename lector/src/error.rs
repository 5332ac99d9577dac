use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LectorError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(#[from] libsql::Error),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Recognition engine error: {0}")]
    Engine(String),

    #[error("Recognition engine unavailable: {0}")]
    EngineUnavailable(String),

    #[error("Recognition engine timed out after {0} seconds")]
    EngineTimeout(u64),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for LectorError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            LectorError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            LectorError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            LectorError::Database(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            LectorError::Storage(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
            LectorError::Engine(msg) => (StatusCode::BAD_GATEWAY, msg.clone()),
            LectorError::EngineUnavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg.clone()),
            LectorError::EngineTimeout(_) => (StatusCode::BAD_GATEWAY, self.to_string()),
            LectorError::Http(e) => (StatusCode::BAD_GATEWAY, e.to_string()),
            LectorError::Json(e) => (StatusCode::BAD_REQUEST, e.to_string()),
            LectorError::Io(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            LectorError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        let body = Json(json!({
            "error": message,
            "code": status.as_u16()
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, LectorError>;
