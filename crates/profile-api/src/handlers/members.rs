// ============================================================================
// Profile API - Member Handlers
// File: crates/profile-api/src/handlers/members.rs
// ============================================================================
//! Member profile and photo gallery HTTP handlers

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;
use uuid::Uuid;

use profile_core::domain::AssetUpload;

use crate::dto::{MemberDto, PhotoDto, UpdateMemberRequest};
use crate::error::ApiError;
use crate::middleware::AuthenticatedMember;
use crate::response::ApiResponse;
use crate::state::AppState;

/// List members - GET /api/members
pub async fn list_members(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<MemberDto>>>, ApiError> {
    let members = state.profile_service.list_members().await?;
    Ok(Json(ApiResponse::success(
        members.into_iter().map(MemberDto::from).collect(),
    )))
}

/// Single member - GET /api/members/{id}
pub async fn get_member(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<MemberDto>>, ApiError> {
    let member = state.profile_service.get_member(&id).await?;
    Ok(Json(ApiResponse::success(member.into())))
}

/// Member photos - GET /api/members/{id}/photos
pub async fn get_member_photos(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<PhotoDto>>>, ApiError> {
    let photos = state.gallery_service.list_photos(&id).await?;
    Ok(Json(ApiResponse::success(
        photos.into_iter().map(PhotoDto::from).collect(),
    )))
}

/// Sparse profile update of the caller - PUT /api/members
pub async fn update_member(
    State(state): State<AppState>,
    AuthenticatedMember(member_id): AuthenticatedMember,
    Json(patch): Json<UpdateMemberRequest>,
) -> Result<StatusCode, ApiError> {
    state.profile_service.update_profile(&member_id, &patch).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Upload a photo for the caller - POST /api/members/add-photo
pub async fn add_photo(
    State(state): State<AppState>,
    AuthenticatedMember(member_id): AuthenticatedMember,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<PhotoDto>>), ApiError> {
    let mut asset: Option<AssetUpload> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Failed to read field: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field.file_name().unwrap_or("photo").to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Failed to read file: {}", e)))?;

        asset = Some(AssetUpload::new(file_name, content_type, data));
    }

    let asset = asset.ok_or_else(|| ApiError::BadRequest("file required".to_string()))?;
    info!("Photo upload from member {}: {}", member_id, asset.file_name);

    let photo = state.gallery_service.add_photo(&member_id, asset).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(photo.into()))))
}

/// Make one of the caller's photos the main photo - PUT /api/members/set-main-photo/{photo_id}
pub async fn set_main_photo(
    State(state): State<AppState>,
    AuthenticatedMember(member_id): AuthenticatedMember,
    Path(photo_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.gallery_service.set_main_photo(&member_id, &photo_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Delete one of the caller's photos - DELETE /api/members/delete-photo/{photo_id}
pub async fn delete_photo(
    State(state): State<AppState>,
    AuthenticatedMember(member_id): AuthenticatedMember,
    Path(photo_id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    state.gallery_service.delete_photo(&member_id, &photo_id).await?;
    Ok(Json(ApiResponse::success(())))
}
