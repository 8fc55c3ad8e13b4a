//! Error types for evaltrack-api
//!
//! Every failure is rendered as `{"message": ..., "detail": ...}`.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use evaltrack_common::Error;
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed request (400)
    #[error("{message}")]
    BadRequest {
        message: String,
        detail: Option<String>,
    },

    /// Admin password missing or wrong (401)
    #[error("{0}")]
    Unauthorized(String),

    /// Storage or other server-side failure (500) with a route-specific message
    #[error("{message}: {detail}")]
    Internal { message: String, detail: String },

    /// evaltrack-common error
    #[error(transparent)]
    Common(#[from] Error),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, detail) = match self {
            ApiError::BadRequest { message, detail } => (StatusCode::BAD_REQUEST, message, detail),
            ApiError::Unauthorized(message) => (StatusCode::UNAUTHORIZED, message, None),
            ApiError::Internal { message, detail } => {
                (StatusCode::INTERNAL_SERVER_ERROR, message, Some(detail))
            }
            ApiError::Common(err) => match err {
                Error::Validation(message) => (StatusCode::BAD_REQUEST, message, None),
                Error::InvalidKind(kind) => (
                    StatusCode::BAD_REQUEST,
                    "Tipo de nota inválido.".to_string(),
                    Some(format!("tipo '{}' (esperado: entrevista, carta, historico)", kind)),
                ),
                Error::NotFound(detail) => (
                    StatusCode::NOT_FOUND,
                    "Avaliado não encontrado.".to_string(),
                    Some(detail),
                ),
                other => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Erro interno.".to_string(),
                    Some(other.to_string()),
                ),
            },
        };

        if status.is_server_error() {
            error!(%status, %message, detail = ?detail, "Request failed");
        } else {
            warn!(%status, %message, detail = ?detail, "Request rejected");
        }

        (status, Json(ErrorBody { message, detail })).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest {
            message: "Dados inválidos".to_string(),
            detail: Some(rejection.body_text()),
        }
    }
}

/// Attach a route-specific message to server-side failures
///
/// Client errors (validation, unknown kind, not found) pass through unchanged.
pub trait OrInternal<T> {
    fn or_internal(self, message: &str) -> ApiResult<T>;
}

impl<T> OrInternal<T> for evaltrack_common::Result<T> {
    fn or_internal(self, message: &str) -> ApiResult<T> {
        self.map_err(|err| {
            if err.is_client_error() {
                ApiError::Common(err)
            } else {
                ApiError::Internal {
                    message: message.to_string(),
                    detail: err.to_string(),
                }
            }
        })
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
