// ============================================================================
// Profile Core - Photo Entity
// File: crates/profile-core/src/domain/photo.rs
// Description: Member photo and the asset values exchanged with the asset host
// ============================================================================

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Photo owned by a member
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Photo {
    pub id: Uuid,
    pub url: String,
    /// Remote asset reference, `None` for fixture photos with nothing to delete
    pub public_id: Option<String>,
    pub member_id: Uuid,
    /// Set while the hosted asset is being deleted, such a photo cannot become main
    #[serde(default)]
    pub pending_deletion: bool,
}

impl Photo {
    pub fn new(member_id: Uuid, url: String, public_id: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            url,
            public_id,
            member_id,
            pending_deletion: false,
        }
    }

    /// Fixture photo without a hosted asset
    pub fn seeded(member_id: Uuid, url: String) -> Self {
        Self::new(member_id, url, None)
    }
}

/// Binary payload handed to the asset host
#[derive(Debug, Clone)]
pub struct AssetUpload {
    pub file_name: String,
    pub content_type: String,
    pub data: Bytes,
}

impl AssetUpload {
    pub fn new(file_name: impl Into<String>, content_type: impl Into<String>, data: Bytes) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            data,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Where the asset host stored an upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedAsset {
    pub url: String,
    pub public_id: Option<String>,
}
