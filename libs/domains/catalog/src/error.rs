use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::{Value, json};
use thiserror::Error;

/// Application error taxonomy.
///
/// This is the only failure channel of the catalog services: every operation
/// either returns its plain-data result or one of these variants. The
/// transport layer maps `status_code()` to the HTTP status and renders the
/// error envelope via `IntoResponse`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{resource} com ID {id} não encontrado")]
    NotFound { resource: &'static str, id: i64 },

    #[error("{message}")]
    BadRequest { message: String, details: Value },

    #[error("{resource} com {field} '{value}' já existe")]
    Conflict {
        resource: &'static str,
        field: &'static str,
        value: String,
    },

    /// Reserved for the auth layer, unused by the catalog core
    #[error("{0}")]
    Unauthorized(String),

    /// Reserved for the auth layer, unused by the catalog core
    #[error("{0}")]
    Forbidden(String),

    /// Unexpected storage failure, propagated unchanged
    #[error("{0}")]
    Internal(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn not_found(resource: &'static str, id: i64) -> Self {
        Self::NotFound { resource, id }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
            details: Value::Null,
        }
    }

    pub fn bad_request_with(message: impl Into<String>, details: Value) -> Self {
        Self::BadRequest {
            message: message.into(),
            details,
        }
    }

    /// Wrap collected validation messages as `details.errors`
    pub fn validation(errors: Vec<String>) -> Self {
        Self::bad_request_with("Dados inválidos", json!({ "errors": errors }))
    }

    pub fn conflict(resource: &'static str, field: &'static str, value: impl Into<String>) -> Self {
        Self::Conflict {
            resource,
            field,
            value: value.into(),
        }
    }

    pub fn unauthorized() -> Self {
        Self::Unauthorized("Acesso não autorizado".to_string())
    }

    pub fn forbidden() -> Self {
        Self::Forbidden("Acesso proibido".to_string())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Self::Conflict { .. } => StatusCode::CONFLICT,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Structured context attached to the error, when any
    pub fn details(&self) -> Option<&Value> {
        match self {
            Self::BadRequest { details, .. } if !details.is_null() => Some(details),
            _ => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(status = %status, error = %self, "Request failed");
        } else {
            tracing::debug!(status = %status, error = %self, "Request rejected");
        }

        let mut body = json!({
            "status": "error",
            "message": self.to_string(),
        });
        if let Some(details) = self.details() {
            body["details"] = details.clone();
        }

        (status, Json(body)).into_response()
    }
}
