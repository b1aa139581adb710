use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use profile_core::DomainError;
use profile_shared::constants::GENERIC_ERROR_MESSAGE;

use crate::response::ApiResponse;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Full error information attached to opaque 500 responses. Only the
/// development middleware puts it in front of the caller.
#[derive(Debug, Clone)]
pub struct ErrorDetail {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
    pub retryable: bool,
    pub debug: String,
}

impl ApiError {
    fn classify(&self) -> (StatusCode, &'static str, bool) {
        match self {
            ApiError::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", false),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", false),
            ApiError::Domain(e) => {
                let (status, code) = match e {
                    DomainError::MemberNotFound(_) | DomainError::PhotoNotFound(_) => {
                        (StatusCode::NOT_FOUND, "NOT_FOUND")
                    }
                    DomainError::InvalidOperation(_) => (StatusCode::BAD_REQUEST, "INVALID_OPERATION"),
                    DomainError::ValidationError(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
                    DomainError::PersistenceError(_) => (StatusCode::BAD_REQUEST, "PERSISTENCE_ERROR"),
                    DomainError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
                    DomainError::UploadError(_) => (StatusCode::BAD_GATEWAY, "UPLOAD_ERROR"),
                    DomainError::DeletionError(_) => (StatusCode::BAD_GATEWAY, "DELETION_ERROR"),
                    DomainError::DatabaseError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "DATABASE_ERROR"),
                    DomainError::InternalError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
                };
                (status, code, e.is_retryable())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, retryable) = self.classify();
        let message = self.to_string();

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("{}: {}", code, message);
            let detail = ErrorDetail {
                status,
                code,
                message,
                retryable,
                debug: format!("{:?}", self),
            };
            let body = Json(ApiResponse::error(code, GENERIC_ERROR_MESSAGE, retryable, None));
            let mut response = (status, body).into_response();
            response.extensions_mut().insert(detail);
            return response;
        }

        if status.is_server_error() {
            tracing::error!("{}: {}", code, message);
        } else {
            tracing::warn!("{}: {}", code, message);
        }
        (status, Json(ApiResponse::error(code, &message, retryable, None))).into_response()
    }
}
