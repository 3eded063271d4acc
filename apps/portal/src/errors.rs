use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::backend::BackendError;
use crate::ranking::export::{ExportError, PDF_UNAVAILABLE};
use crate::session::RoleError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Every failure is handled at the point of the user action: it is logged locally and
/// surfaced as a single message. Nothing is retried.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden")]
    Forbidden,

    #[error("Unknown role: {0}")]
    UnknownRole(String),

    /// A call to the HR backend failed. `alert` is the message shown to the user;
    /// the underlying cause is only logged.
    #[error("Upstream error ({alert}): {source}")]
    Upstream {
        alert: &'static str,
        #[source]
        source: BackendError,
    },

    #[error("Not implemented: {0}")]
    NotImplemented(&'static str),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Wraps a backend failure with the alert text of the action that triggered it.
    pub fn upstream(alert: &'static str) -> impl FnOnce(BackendError) -> AppError {
        move |source| AppError::Upstream { alert, source }
    }
}

impl From<RoleError> for AppError {
    fn from(err: RoleError) -> Self {
        match err {
            RoleError::Unknown(role) => AppError::UnknownRole(role),
        }
    }
}

impl From<ExportError> for AppError {
    fn from(err: ExportError) -> Self {
        match err {
            ExportError::PdfUnavailable => AppError::NotImplemented(PDF_UNAVAILABLE),
            other => AppError::Internal(anyhow::Error::new(other)),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Authentication required".to_string(),
            ),
            AppError::Forbidden => (
                StatusCode::FORBIDDEN,
                "FORBIDDEN",
                "Access denied".to_string(),
            ),
            AppError::UnknownRole(role) => {
                tracing::warn!("Session carries unrecognized role '{role}'");
                (
                    StatusCode::FORBIDDEN,
                    "UNKNOWN_ROLE",
                    format!("Rol desconocido: '{role}'"),
                )
            }
            AppError::Upstream { alert, source } => {
                tracing::error!("Backend error: {source}");
                let status = match source {
                    BackendError::Status { status: 401, .. } => StatusCode::UNAUTHORIZED,
                    BackendError::Status { status: 404, .. } => StatusCode::NOT_FOUND,
                    _ => StatusCode::BAD_GATEWAY,
                };
                (status, "UPSTREAM_ERROR", alert.to_string())
            }
            AppError::NotImplemented(msg) => {
                (StatusCode::NOT_IMPLEMENTED, "NOT_IMPLEMENTED", msg.to_string())
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
