//! Member repository trait (port)

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Account, Member, MemberAggregate, MemberChangeset, Photo};
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MemberRepository: Send + Sync {
    /// Member with its photos attached
    async fn find_member(&self, id: &Uuid) -> Result<Option<Member>, DomainError>;

    /// All members with photos, in creation order
    async fn find_all_members(&self) -> Result<Vec<Member>, DomainError>;

    /// Photos of one member in insertion order
    async fn find_photos_for_member(&self, member_id: &Uuid) -> Result<Vec<Photo>, DomainError>;

    /// Member, linked account, photos and the current version
    async fn find_member_for_update(&self, id: &Uuid) -> Result<Option<MemberAggregate>, DomainError>;

    /// Apply a changeset atomically.
    ///
    /// Returns whether anything was written. Fails with `Conflict` when the
    /// stored version no longer matches `changes.expected_version`.
    async fn commit(&self, changes: &MemberChangeset) -> Result<bool, DomainError>;

    async fn has_members(&self) -> Result<bool, DomainError>;

    /// Insert a new account/member pair with its initial photos
    async fn insert_member(
        &self,
        account: &Account,
        member: &Member,
        photos: &[Photo],
    ) -> Result<(), DomainError>;
}
