//! Request/response DTOs (camelCase on the wire)

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use uuid::Uuid;

use profile_core::domain::{MainImage, MemberView, Photo};

/// Body of `PUT /api/members`, only present fields are applied
pub use profile_core::domain::ProfilePatch as UpdateMemberRequest;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoDto {
    pub id: Uuid,
    pub url: String,
    pub public_id: Option<String>,
}

impl From<Photo> for PhotoDto {
    fn from(photo: Photo) -> Self {
        Self {
            id: photo.id,
            url: photo.url,
            public_id: photo.public_id,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberDto {
    pub id: Uuid,
    pub date_of_birth: NaiveDate,
    pub image_url: Option<String>,
    /// Where `image_url` comes from: `{"kind": "assigned" | "derived" | "missing", "url"}`
    pub main_image: MainImage,
    pub display_name: String,
    pub created: DateTime<Utc>,
    pub last_active: DateTime<Utc>,
    pub gender: String,
    pub description: Option<String>,
    pub city: String,
    pub country: String,
    pub photos: Vec<PhotoDto>,
}

impl From<MemberView> for MemberDto {
    fn from(view: MemberView) -> Self {
        let MemberView { member, main_image } = view;
        Self {
            id: member.id,
            date_of_birth: member.date_of_birth,
            image_url: member.image_url,
            main_image,
            display_name: member.display_name,
            created: member.created,
            last_active: member.last_active,
            gender: member.gender,
            description: member.description,
            city: member.city,
            country: member.country,
            photos: member.photos.into_iter().map(PhotoDto::from).collect(),
        }
    }
}
