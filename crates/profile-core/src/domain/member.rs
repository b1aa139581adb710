// ============================================================================
// Profile Core - Member Entity
// File: crates/profile-core/src/domain/member.rs
// Description: Member profile record and sparse profile patch
// ============================================================================

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::main_image::MainImage;
use super::photo::Photo;

/// Member profile entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: Uuid,
    pub date_of_birth: NaiveDate,
    /// Address of the main photo, mirrored into `Account::image_url`
    pub image_url: Option<String>,
    pub display_name: String,
    pub created: DateTime<Utc>,
    pub last_active: DateTime<Utc>,
    pub gender: String,
    pub description: Option<String>,
    pub city: String,
    pub country: String,

    /// Photos in insertion order
    #[serde(default)]
    pub photos: Vec<Photo>,
}

impl Member {
    /// Main image as seen by readers, falling back to the first photo when
    /// nothing has been assigned yet. The fallback is never written back.
    pub fn main_image(&self) -> MainImage {
        MainImage::resolve(self.image_url.as_deref(), &self.photos)
    }

    /// Copy of this member with `image_url` replaced by the display image
    pub fn for_display(mut self) -> Self {
        self.image_url = self.main_image().url().map(str::to_string);
        self
    }

    pub fn photo(&self, photo_id: &Uuid) -> Option<&Photo> {
        self.photos.iter().find(|p| &p.id == photo_id)
    }

    pub fn is_main_photo(&self, photo: &Photo) -> bool {
        self.image_url.as_deref() == Some(photo.url.as_str())
    }

    /// Apply the present fields of `patch`.
    ///
    /// Returns `true` when the display name changed, the caller is
    /// responsible for mirroring it onto the account.
    pub fn apply_patch(&mut self, patch: &ProfilePatch) -> bool {
        let mut display_name_changed = false;

        if let Some(display_name) = &patch.display_name {
            display_name_changed = &self.display_name != display_name;
            self.display_name = display_name.clone();
        }
        if let Some(description) = &patch.description {
            self.description = Some(description.clone());
        }
        if let Some(city) = &patch.city {
            self.city = city.clone();
        }
        if let Some(country) = &patch.country {
            self.country = country.clone();
        }

        display_name_changed
    }
}

/// Member as shown to readers, together with where its image comes from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberView {
    /// Display copy, `image_url` holds the resolved main image
    pub member: Member,
    pub main_image: MainImage,
}

impl From<Member> for MemberView {
    fn from(member: Member) -> Self {
        let main_image = member.main_image();
        Self {
            member: member.for_display(),
            main_image,
        }
    }
}

/// Sparse profile update, only `Some` fields are written
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProfilePatch {
    #[validate(length(min = 2, max = 50, message = "Display name must be between 2 and 50 characters"))]
    pub display_name: Option<String>,

    #[validate(length(max = 2000, message = "Description too long"))]
    pub description: Option<String>,

    #[validate(length(max = 100, message = "City too long"))]
    pub city: Option<String>,

    #[validate(length(max = 100, message = "Country too long"))]
    pub country: Option<String>,
}

impl ProfilePatch {
    /// Copy with surrounding whitespace removed from the name and location
    /// fields. Validation runs on this copy, so a blank name is too short.
    pub fn normalized(&self) -> Self {
        let trim = |value: &Option<String>| value.as_ref().map(|v| v.trim().to_string());
        Self {
            display_name: trim(&self.display_name),
            description: self.description.clone(),
            city: trim(&self.city),
            country: trim(&self.country),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.display_name.is_none()
            && self.description.is_none()
            && self.city.is_none()
            && self.country.is_none()
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn member() -> Member {
        Member {
            id: Uuid::new_v4(),
            date_of_birth: NaiveDate::from_ymd_opt(1992, 4, 17).unwrap(),
            image_url: None,
            display_name: "Karen".to_string(),
            created: Utc::now(),
            last_active: Utc::now(),
            gender: "female".to_string(),
            description: Some("Loves hiking".to_string()),
            city: "Bandung".to_string(),
            country: "Indonesia".to_string(),
            photos: Vec::new(),
        }
    }
}
