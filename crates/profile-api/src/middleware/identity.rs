//! Caller identity forwarded by the upstream gateway

use axum::{extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use profile_shared::constants::MEMBER_ID_HEADER;

use crate::error::ApiError;

/// Member id of the authenticated caller, taken from the `X-Member-Id` header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedMember(pub Uuid);

impl<S> FromRequestParts<S> for AuthenticatedMember
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(MEMBER_ID_HEADER)
            .ok_or_else(|| ApiError::Unauthorized("missing member identity".to_string()))?
            .to_str()
            .map_err(|_| ApiError::Unauthorized("malformed member identity".to_string()))?;

        Uuid::parse_str(raw.trim())
            .map(AuthenticatedMember)
            .map_err(|_| ApiError::Unauthorized("malformed member identity".to_string()))
    }
}
