use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::models::RunStatus;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Run not found: {0}")]
    RunNotFound(i64),

    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Invalid status transition: {from} -> {to}")]
    InvalidTransition { from: RunStatus, to: RunStatus },

    #[error("Terraform execution failed: {0}")]
    Terraform(String),

    #[error("Azure not configured")]
    AzureNotConfigured,

    #[error("Azure API error: {0}")]
    Azure(String),

    #[error("Plan file not found for run {0}")]
    PlanFileNotFound(i64),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Database(e) => {
                tracing::error!("Database error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
            AppError::RunNotFound(id) => (StatusCode::NOT_FOUND, format!("Run '{}' not found", id)),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::InvalidTransition { from, to } => (
                StatusCode::CONFLICT,
                format!("Invalid status transition: {} -> {}", from, to),
            ),
            AppError::Terraform(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            AppError::AzureNotConfigured => (
                StatusCode::BAD_REQUEST,
                "Azure not configured. Save a subscription in settings first.".to_string(),
            ),
            AppError::Azure(msg) => {
                tracing::error!("Azure API error: {}", msg);
                (StatusCode::BAD_GATEWAY, msg)
            }
            AppError::PlanFileNotFound(id) => (
                StatusCode::NOT_FOUND,
                format!("Plan file not found for run '{}'", id),
            ),
            AppError::Io(e) => {
                tracing::error!("IO error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
        };

        let body = json!({
            "error": message
        });

        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
