//! Development-only error detail exposure and panic translation

use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use std::any::Any;

use profile_core::DomainError;

use crate::error::{ApiError, ErrorDetail};
use crate::response::ApiResponse;

/// Replace opaque 500 bodies with the full error. Installed only when the
/// service runs in the development environment.
pub async fn expose_error_details(request: Request, next: Next) -> Response {
    let response = next.run(request).await;

    let Some(detail) = response.extensions().get::<ErrorDetail>().cloned() else {
        return response;
    };

    let body = ApiResponse::error(detail.code, &detail.message, detail.retryable, Some(detail.debug));
    (detail.status, Json(body)).into_response()
}

/// Turn a handler panic into the regular internal error response
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };

    ApiError::from(DomainError::InternalError(format!("handler panicked: {}", message))).into_response()
}
