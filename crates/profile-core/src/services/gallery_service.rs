// ============================================================================
// Profile Core - Gallery Service
// File: crates/profile-core/src/services/gallery_service.rs
// ============================================================================
//! Photo gallery: add, set main, delete and list photos of a member

use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

use super::commit_aggregate;
use crate::domain::{AssetUpload, MemberAggregate, Photo};
use crate::error::DomainError;
use crate::gateways::AssetUploader;
use crate::repositories::MemberRepository;

/// Commit attempts when finishing a photo deletion
const SETTLE_ATTEMPTS: u32 = 3;

pub struct GalleryService {
    member_repo: Arc<dyn MemberRepository>,
    asset_uploader: Arc<dyn AssetUploader>,
}

impl GalleryService {
    pub fn new(member_repo: Arc<dyn MemberRepository>, asset_uploader: Arc<dyn AssetUploader>) -> Self {
        Self {
            member_repo,
            asset_uploader,
        }
    }

    pub async fn list_photos(&self, member_id: &Uuid) -> Result<Vec<Photo>, DomainError> {
        self.member_repo.find_photos_for_member(member_id).await
    }

    /// Upload the asset and append it to the member's photos
    pub async fn add_photo(&self, member_id: &Uuid, asset: AssetUpload) -> Result<Photo, DomainError> {
        if asset.is_empty() {
            return Err(DomainError::ValidationError("Photo file is empty".to_string()));
        }

        // Resolve the member first so nothing is uploaded for an unknown id
        let mut aggregate = self.load(member_id).await?;

        let uploaded = self.asset_uploader.upload(asset).await.map_err(|e| {
            error!(member_id = %member_id, "Photo upload failed: {}", e);
            match e {
                DomainError::UploadError(_) => e,
                other => DomainError::UploadError(other.to_string()),
            }
        })?;

        let photo = aggregate.add_photo(uploaded);

        if let Err(e) = commit_aggregate(self.member_repo.as_ref(), &aggregate, "Problem adding photo").await {
            warn!(
                member_id = %member_id,
                public_id = ?photo.public_id,
                "Photo uploaded but not recorded, remote asset is orphaned: {}",
                e
            );
            return Err(e);
        }

        info!(member_id = %member_id, photo_id = %photo.id, "Photo added");
        Ok(photo)
    }

    pub async fn set_main_photo(&self, member_id: &Uuid, photo_id: &Uuid) -> Result<Photo, DomainError> {
        let mut aggregate = self.load(member_id).await?;

        let photo = aggregate.set_main_photo(photo_id).map_err(|e| {
            warn!(member_id = %member_id, photo_id = %photo_id, "Set main photo rejected: {}", e);
            e
        })?;

        commit_aggregate(self.member_repo.as_ref(), &aggregate, "Problem setting main photo").await?;

        info!(member_id = %member_id, photo_id = %photo_id, "Main photo set");
        Ok(photo)
    }

    /// Delete a non-main photo.
    ///
    /// A photo with a hosted asset is first committed as pending deletion, which
    /// bumps the member version and keeps it from becoming main. The asset is
    /// deleted next and the record is removed last. If the asset host fails the
    /// flag is cleared again and the record stays.
    pub async fn delete_photo(&self, member_id: &Uuid, photo_id: &Uuid) -> Result<(), DomainError> {
        let mut aggregate = self.load(member_id).await?;

        let photo = aggregate
            .photo_for_removal(photo_id)
            .map_err(|e| {
                warn!(member_id = %member_id, photo_id = %photo_id, "Delete photo rejected: {}", e);
                e
            })?
            .clone();

        let Some(public_id) = photo.public_id else {
            aggregate.remove_photo(photo_id)?;
            commit_aggregate(self.member_repo.as_ref(), &aggregate, "Problem deleting the photo").await?;
            info!(member_id = %member_id, photo_id = %photo_id, "Photo deleted");
            return Ok(());
        };

        aggregate.begin_photo_removal(photo_id).map_err(|e| {
            warn!(member_id = %member_id, photo_id = %photo_id, "Delete photo rejected: {}", e);
            e
        })?;
        commit_aggregate(self.member_repo.as_ref(), &aggregate, "Problem deleting the photo").await?;

        if let Err(e) = self.asset_uploader.delete(&public_id).await {
            error!(member_id = %member_id, public_id = %public_id, "Asset deletion failed: {}", e);
            if let Err(restore) = self.settle_removal(member_id, photo_id, false).await {
                error!(
                    member_id = %member_id,
                    photo_id = %photo_id,
                    "Photo left pending deletion: {}",
                    restore
                );
            }
            return Err(match e {
                DomainError::DeletionError(_) => e,
                other => DomainError::DeletionError(other.to_string()),
            });
        }

        self.settle_removal(member_id, photo_id, true).await?;

        info!(member_id = %member_id, photo_id = %photo_id, "Photo deleted");
        Ok(())
    }

    /// Remove a photo flagged for deletion, or clear its flag. Writers that
    /// raced in after the flag was committed only cause a retry, they cannot
    /// have made the photo main.
    async fn settle_removal(&self, member_id: &Uuid, photo_id: &Uuid, remove: bool) -> Result<(), DomainError> {
        let mut attempt = 1;
        loop {
            let mut aggregate = self.load(member_id).await?;
            if remove {
                aggregate.remove_photo(photo_id)?;
            } else {
                aggregate.cancel_photo_removal(photo_id)?;
            }

            match commit_aggregate(self.member_repo.as_ref(), &aggregate, "Problem deleting the photo").await {
                Err(DomainError::Conflict(_)) if attempt < SETTLE_ATTEMPTS => {
                    warn!(member_id = %member_id, photo_id = %photo_id, attempt, "Member changed during photo deletion, retrying");
                    attempt += 1;
                }
                result => return result,
            }
        }
    }

    async fn load(&self, member_id: &Uuid) -> Result<MemberAggregate, DomainError> {
        self.member_repo
            .find_member_for_update(member_id)
            .await?
            .ok_or(DomainError::MemberNotFound(*member_id))
    }
}
