//! Common error type and result alias.
//!
//! The composition engine itself is total and never produces these; they come
//! from collaborator I/O, template lookup, wizard navigation and variable
//! registration.
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Prompt backend error: {0}")]
    Backend(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid variable: {0}")]
    InvalidVariable(String),

    #[error("Cannot advance: required step '{step}' is incomplete")]
    WizardBlocked { step: String },

    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    #[error("Invalid override: {0}")]
    InvalidOverride(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidVariable(_)
            | AppError::InvalidOverride(_)
            | AppError::InvalidRequest(_)
            | AppError::Serialization(_) => StatusCode::BAD_REQUEST,
            AppError::TemplateNotFound(_) => StatusCode::NOT_FOUND,
            AppError::WizardBlocked { .. } => StatusCode::CONFLICT,
            AppError::HttpClient(_) | AppError::Backend(_) => StatusCode::BAD_GATEWAY,
            AppError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("request failed: {}", self);
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
