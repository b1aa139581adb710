// ============================================================================
// Profile Infrastructure - In-Memory Member Repository
// File: crates/profile-infrastructure/src/memory/member_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::warn;
use uuid::Uuid;

use profile_core::domain::{Account, Member, MemberAggregate, MemberChangeset, Photo};
use profile_core::error::DomainError;
use profile_core::repositories::MemberRepository;

#[derive(Debug, Clone)]
struct StoredMember {
    member: Member,
    account: Account,
    version: i64,
}

/// Member store kept in process memory.
///
/// Every commit is applied under one write lock, so readers see either all of
/// a changeset or none of it.
#[derive(Default)]
pub struct InMemoryMemberRepository {
    // creation order
    members: RwLock<Vec<StoredMember>>,
}

impl InMemoryMemberRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current account record, for inspection in tests and tooling
    pub fn account(&self, id: &Uuid) -> Option<Account> {
        self.members
            .read()
            .iter()
            .find(|s| &s.member.id == id)
            .map(|s| s.account.clone())
    }

    pub fn version(&self, id: &Uuid) -> Option<i64> {
        self.members
            .read()
            .iter()
            .find(|s| &s.member.id == id)
            .map(|s| s.version)
    }
}

#[async_trait]
impl MemberRepository for InMemoryMemberRepository {
    async fn find_member(&self, id: &Uuid) -> Result<Option<Member>, DomainError> {
        Ok(self
            .members
            .read()
            .iter()
            .find(|s| &s.member.id == id)
            .map(|s| s.member.clone()))
    }

    async fn find_all_members(&self) -> Result<Vec<Member>, DomainError> {
        Ok(self.members.read().iter().map(|s| s.member.clone()).collect())
    }

    async fn find_photos_for_member(&self, member_id: &Uuid) -> Result<Vec<Photo>, DomainError> {
        Ok(self
            .members
            .read()
            .iter()
            .find(|s| &s.member.id == member_id)
            .map(|s| s.member.photos.clone())
            .unwrap_or_default())
    }

    async fn find_member_for_update(&self, id: &Uuid) -> Result<Option<MemberAggregate>, DomainError> {
        let stored = self
            .members
            .read()
            .iter()
            .find(|s| &s.member.id == id)
            .cloned();

        match stored {
            Some(s) => MemberAggregate::new(s.member, s.account, s.version).map(Some),
            None => Ok(None),
        }
    }

    async fn commit(&self, changes: &MemberChangeset) -> Result<bool, DomainError> {
        if changes.is_empty() {
            return Ok(false);
        }

        let mut members = self.members.write();
        let stored = members
            .iter_mut()
            .find(|s| s.member.id == changes.member_id)
            .ok_or(DomainError::MemberNotFound(changes.member_id))?;

        if stored.version != changes.expected_version {
            warn!(
                member_id = %changes.member_id,
                expected = changes.expected_version,
                actual = stored.version,
                "Stale member version, commit rejected"
            );
            return Err(DomainError::Conflict(changes.member_id));
        }

        if let Some(row) = &changes.member {
            let photos = std::mem::take(&mut stored.member.photos);
            stored.member = Member {
                photos,
                ..row.clone()
            };
        }
        if let Some(account) = &changes.account {
            stored.account = account.clone();
        }

        for updated in &changes.updated_photos {
            if let Some(photo) = stored.member.photos.iter_mut().find(|p| p.id == updated.id) {
                *photo = updated.clone();
            }
        }
        stored
            .member
            .photos
            .retain(|p| !changes.removed_photo_ids.contains(&p.id));
        stored.member.photos.extend(changes.added_photos.iter().cloned());
        stored.version += 1;

        Ok(true)
    }

    async fn has_members(&self) -> Result<bool, DomainError> {
        Ok(!self.members.read().is_empty())
    }

    async fn insert_member(
        &self,
        account: &Account,
        member: &Member,
        photos: &[Photo],
    ) -> Result<(), DomainError> {
        let mut members = self.members.write();
        if members.iter().any(|s| s.member.id == member.id) {
            return Err(DomainError::PersistenceError(format!(
                "member {} already exists",
                member.id
            )));
        }

        let mut member = member.clone();
        member.photos = photos.to_vec();
        members.push(StoredMember {
            member,
            account: account.clone(),
            version: 0,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    fn member(id: Uuid) -> Member {
        Member {
            id,
            date_of_birth: NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(),
            image_url: None,
            display_name: "Lisa".to_string(),
            created: Utc::now(),
            last_active: Utc::now(),
            gender: "female".to_string(),
            description: None,
            city: "Jakarta".to_string(),
            country: "Indonesia".to_string(),
            photos: Vec::new(),
        }
    }

    async fn seeded_repo() -> (InMemoryMemberRepository, Uuid) {
        let repo = InMemoryMemberRepository::new();
        let id = Uuid::new_v4();
        let account = Account::new(id, "Lisa".to_string(), "lisa@test.com".to_string());
        let photo = Photo::seeded(id, "https://img/lisa.jpg".to_string());
        repo.insert_member(&account, &member(id), &[photo]).await.unwrap();
        (repo, id)
    }

    #[tokio::test]
    async fn test_stale_version_is_rejected_without_changes() {
        let (repo, id) = seeded_repo().await;

        let mut first = repo.find_member_for_update(&id).await.unwrap().unwrap();
        let mut second = repo.find_member_for_update(&id).await.unwrap().unwrap();
        let photo_id = first.photos()[0].id;

        first.set_main_photo(&photo_id).unwrap();
        assert!(repo.commit(&first.changeset()).await.unwrap());

        second.remove_photo(&photo_id).unwrap();
        let err = repo.commit(&second.changeset()).await.unwrap_err();

        assert!(matches!(err, DomainError::Conflict(_)));
        let stored = repo.find_member(&id).await.unwrap().unwrap();
        assert_eq!(stored.photos.len(), 1);
        assert_eq!(stored.image_url.as_deref(), Some("https://img/lisa.jpg"));
        assert_eq!(repo.account(&id).unwrap().image_url, stored.image_url);
        assert_eq!(repo.version(&id), Some(1));
    }

    #[tokio::test]
    async fn test_empty_changeset_writes_nothing() {
        let (repo, id) = seeded_repo().await;
        let aggregate = repo.find_member_for_update(&id).await.unwrap().unwrap();

        assert!(!repo.commit(&aggregate.changeset()).await.unwrap());
        assert_eq!(repo.version(&id), Some(0));
    }

    #[tokio::test]
    async fn test_duplicate_insert_fails() {
        let (repo, id) = seeded_repo().await;
        let account = Account::new(id, "Lisa".to_string(), "lisa@test.com".to_string());

        assert!(repo.insert_member(&account, &member(id), &[]).await.is_err());
        assert!(repo.has_members().await.unwrap());
    }
}
