// ============================================================================
// Profile Core - Profile Service
// File: crates/profile-core/src/services/profile_service.rs
// ============================================================================
//! Member reads and sparse profile updates

use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use super::commit_aggregate;
use crate::domain::{MemberAggregate, MemberView, ProfilePatch};
use crate::error::DomainError;
use crate::repositories::MemberRepository;

pub struct ProfileService {
    member_repo: Arc<dyn MemberRepository>,
}

impl ProfileService {
    pub fn new(member_repo: Arc<dyn MemberRepository>) -> Self {
        Self { member_repo }
    }

    /// All members with photos, `image_url` set to the display image
    pub async fn list_members(&self) -> Result<Vec<MemberView>, DomainError> {
        let members = self.member_repo.find_all_members().await?;
        Ok(members.into_iter().map(MemberView::from).collect())
    }

    pub async fn get_member(&self, id: &Uuid) -> Result<MemberView, DomainError> {
        self.member_repo
            .find_member(id)
            .await?
            .map(MemberView::from)
            .ok_or(DomainError::MemberNotFound(*id))
    }

    pub async fn get_member_for_mutation(&self, id: &Uuid) -> Result<MemberAggregate, DomainError> {
        self.member_repo
            .find_member_for_update(id)
            .await?
            .ok_or(DomainError::MemberNotFound(*id))
    }

    /// Apply the present fields of `patch` to the member
    pub async fn update_profile(&self, id: &Uuid, patch: &ProfilePatch) -> Result<MemberView, DomainError> {
        let mut aggregate = self.get_member_for_mutation(id).await?;

        if let Err(e) = aggregate.update_profile(patch) {
            warn!(member_id = %id, "Profile update rejected: {}", e);
            return Err(e);
        }

        commit_aggregate(self.member_repo.as_ref(), &aggregate, "Failed to update member").await?;

        info!(member_id = %id, "Profile updated");
        Ok(aggregate.into_member().into())
    }
}
