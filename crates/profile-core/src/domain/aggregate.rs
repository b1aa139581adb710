// ============================================================================
// Profile Core - Member Aggregate
// File: crates/profile-core/src/domain/aggregate.rs
// Description: Member + account + photos loaded for a write, with the
//              pending changeset the repository commits atomically
// ============================================================================

use tracing::warn;
use uuid::Uuid;
use validator::Validate;

use super::account::Account;
use super::member::{Member, ProfilePatch};
use super::photo::{Photo, UploadedAsset};
use crate::error::DomainError;

/// Pending writes for one member, applied by a single repository commit
#[derive(Debug, Clone, PartialEq)]
pub struct MemberChangeset {
    pub member_id: Uuid,
    /// Version read with the aggregate, the commit fails with `Conflict` if it moved
    pub expected_version: i64,
    /// Member row to write, photos are carried separately
    pub member: Option<Member>,
    pub account: Option<Account>,
    pub added_photos: Vec<Photo>,
    /// Existing photos whose deletion flag changed
    pub updated_photos: Vec<Photo>,
    pub removed_photo_ids: Vec<Uuid>,
}

impl MemberChangeset {
    pub fn new(member_id: Uuid, expected_version: i64) -> Self {
        Self {
            member_id,
            expected_version,
            member: None,
            account: None,
            added_photos: Vec::new(),
            updated_photos: Vec::new(),
            removed_photo_ids: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.member.is_none()
            && self.account.is_none()
            && self.added_photos.is_empty()
            && self.updated_photos.is_empty()
            && self.removed_photo_ids.is_empty()
    }
}

/// Write model for a member.
///
/// `assign_main_image` is the only place either image field is written, so the
/// member and account copies cannot drift apart.
#[derive(Debug, Clone)]
pub struct MemberAggregate {
    member: Member,
    account: Account,
    version: i64,
    member_dirty: bool,
    account_dirty: bool,
    added_photos: Vec<Photo>,
    updated_photos: Vec<Photo>,
    removed_photo_ids: Vec<Uuid>,
}

impl MemberAggregate {
    pub fn new(member: Member, account: Account, version: i64) -> Result<Self, DomainError> {
        if member.id != account.id {
            return Err(DomainError::InternalError(format!(
                "account {} is not linked to member {}",
                account.id, member.id
            )));
        }
        if member.image_url != account.image_url {
            warn!(
                member_id = %member.id,
                "Member and account image urls disagree, member value wins on next write"
            );
        }
        Ok(Self {
            member,
            account,
            version,
            member_dirty: false,
            account_dirty: false,
            added_photos: Vec::new(),
            updated_photos: Vec::new(),
            removed_photo_ids: Vec::new(),
        })
    }

    pub fn id(&self) -> Uuid {
        self.member.id
    }

    pub fn member(&self) -> &Member {
        &self.member
    }

    pub fn account(&self) -> &Account {
        &self.account
    }

    pub fn version(&self) -> i64 {
        self.version
    }

    pub fn photos(&self) -> &[Photo] {
        &self.member.photos
    }

    pub fn into_member(self) -> Member {
        self.member
    }

    /// Apply a sparse patch, mirroring a display name change onto the account.
    /// An empty patch records nothing.
    pub fn update_profile(&mut self, patch: &ProfilePatch) -> Result<(), DomainError> {
        let patch = patch.normalized();
        patch.validate()?;

        if patch.is_empty() {
            return Ok(());
        }

        if self.member.apply_patch(&patch) {
            self.account.display_name = self.member.display_name.clone();
            self.account_dirty = true;
        }
        self.member_dirty = true;
        Ok(())
    }

    /// Append an uploaded photo. It becomes the main photo only when the
    /// member has none yet.
    pub fn add_photo(&mut self, asset: UploadedAsset) -> Photo {
        let photo = Photo::new(self.member.id, asset.url, asset.public_id);

        self.member.photos.push(photo.clone());
        self.added_photos.push(photo.clone());

        if self.member.image_url.is_none() {
            self.assign_main_image(Some(photo.url.clone()));
        }
        photo
    }

    pub fn set_main_photo(&mut self, photo_id: &Uuid) -> Result<Photo, DomainError> {
        let photo = self
            .member
            .photo(photo_id)
            .cloned()
            .ok_or(DomainError::PhotoNotFound(*photo_id))?;

        if self.member.is_main_photo(&photo) {
            return Err(DomainError::InvalidOperation(
                "This is already the main photo".to_string(),
            ));
        }
        if photo.pending_deletion {
            return Err(DomainError::InvalidOperation(
                "This photo is being deleted".to_string(),
            ));
        }

        self.assign_main_image(Some(photo.url.clone()));
        Ok(photo)
    }

    /// Check that a photo may be deleted without touching any state
    pub fn photo_for_removal(&self, photo_id: &Uuid) -> Result<&Photo, DomainError> {
        let photo = self
            .member
            .photo(photo_id)
            .ok_or(DomainError::PhotoNotFound(*photo_id))?;

        if self.member.is_main_photo(photo) {
            return Err(DomainError::InvalidOperation(
                "The main photo cannot be deleted".to_string(),
            ));
        }
        Ok(photo)
    }

    /// Flag a photo for deletion so that it cannot become main while its
    /// hosted asset is removed
    pub fn begin_photo_removal(&mut self, photo_id: &Uuid) -> Result<Photo, DomainError> {
        if self.photo_for_removal(photo_id)?.pending_deletion {
            return Err(DomainError::InvalidOperation(
                "This photo is already being deleted".to_string(),
            ));
        }
        self.set_pending_deletion(photo_id, true)
    }

    /// Clear the deletion flag after the hosted asset could not be removed
    pub fn cancel_photo_removal(&mut self, photo_id: &Uuid) -> Result<Photo, DomainError> {
        self.set_pending_deletion(photo_id, false)
    }

    pub fn remove_photo(&mut self, photo_id: &Uuid) -> Result<Photo, DomainError> {
        self.photo_for_removal(photo_id)?;

        let index = self
            .member
            .photos
            .iter()
            .position(|p| &p.id == photo_id)
            .ok_or(DomainError::PhotoNotFound(*photo_id))?;
        let photo = self.member.photos.remove(index);

        // Added and removed before commit: nothing to write for it
        self.updated_photos.retain(|p| &p.id != photo_id);
        if let Some(pos) = self.added_photos.iter().position(|p| &p.id == photo_id) {
            self.added_photos.remove(pos);
        } else {
            self.removed_photo_ids.push(photo.id);
        }
        Ok(photo)
    }

    pub fn has_changes(&self) -> bool {
        !self.changeset().is_empty()
    }

    pub fn changeset(&self) -> MemberChangeset {
        let mut changes = MemberChangeset::new(self.member.id, self.version);
        if self.member_dirty {
            let mut row = self.member.clone();
            row.photos.clear();
            changes.member = Some(row);
        }
        if self.account_dirty {
            changes.account = Some(self.account.clone());
        }
        changes.added_photos = self.added_photos.clone();
        changes.updated_photos = self.updated_photos.clone();
        changes.removed_photo_ids = self.removed_photo_ids.clone();
        changes
    }

    fn set_pending_deletion(&mut self, photo_id: &Uuid, pending: bool) -> Result<Photo, DomainError> {
        let photo = self
            .member
            .photos
            .iter_mut()
            .find(|p| &p.id == photo_id)
            .ok_or(DomainError::PhotoNotFound(*photo_id))?;
        photo.pending_deletion = pending;
        let photo = photo.clone();

        if let Some(added) = self.added_photos.iter_mut().find(|p| &p.id == photo_id) {
            *added = photo.clone();
        } else {
            self.updated_photos.retain(|p| &p.id != photo_id);
            self.updated_photos.push(photo.clone());
        }
        Ok(photo)
    }

    fn assign_main_image(&mut self, url: Option<String>) {
        self.member.image_url = url.clone();
        self.account.image_url = url;
        self.member_dirty = true;
        self.account_dirty = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::member::fixtures::member;

    fn aggregate_with(photos: &[(&str, Option<&str>)], main: Option<&str>) -> MemberAggregate {
        let mut m = member();
        for (url, public_id) in photos {
            m.photos.push(Photo::new(m.id, url.to_string(), public_id.map(str::to_string)));
        }
        m.image_url = main.map(str::to_string);
        let mut account = Account::new(m.id, m.display_name.clone(), "karen@test.com".to_string());
        account.image_url = m.image_url.clone();
        MemberAggregate::new(m, account, 3).unwrap()
    }

    fn uploaded(url: &str, public_id: &str) -> UploadedAsset {
        UploadedAsset {
            url: url.to_string(),
            public_id: Some(public_id.to_string()),
        }
    }

    #[test]
    fn test_first_added_photo_becomes_main() {
        let mut agg = aggregate_with(&[], None);

        let photo = agg.add_photo(uploaded("u1", "r1"));

        assert_eq!(agg.member().image_url.as_deref(), Some("u1"));
        assert_eq!(agg.account().image_url.as_deref(), Some("u1"));
        assert_eq!(photo.url, "u1");

        let changes = agg.changeset();
        assert_eq!(changes.expected_version, 3);
        assert_eq!(changes.added_photos, vec![photo]);
        assert_eq!(changes.member.unwrap().image_url.as_deref(), Some("u1"));
        assert_eq!(changes.account.unwrap().image_url.as_deref(), Some("u1"));
    }

    #[test]
    fn test_added_photo_keeps_existing_main() {
        let mut agg = aggregate_with(&[("u1", Some("r1"))], Some("u1"));

        agg.add_photo(uploaded("u2", "r2"));

        assert_eq!(agg.member().image_url.as_deref(), Some("u1"));
        assert_eq!(agg.photos().len(), 2);
        let changes = agg.changeset();
        assert!(changes.member.is_none());
        assert!(changes.account.is_none());
    }

    #[test]
    fn test_set_main_to_current_main_is_rejected() {
        let mut agg = aggregate_with(&[("u1", Some("r1"))], Some("u1"));
        let id = agg.photos()[0].id;

        let err = agg.set_main_photo(&id).unwrap_err();

        assert!(matches!(err, DomainError::InvalidOperation(_)));
        assert!(!agg.has_changes());
    }

    #[test]
    fn test_set_main_updates_both_copies() {
        let mut agg = aggregate_with(&[("u1", None), ("u2", Some("r2"))], Some("u1"));
        let id = agg.photos()[1].id;

        agg.set_main_photo(&id).unwrap();

        assert_eq!(agg.member().image_url.as_deref(), Some("u2"));
        assert_eq!(agg.account().image_url, agg.member().image_url);
    }

    #[test]
    fn test_set_main_unknown_photo() {
        let mut agg = aggregate_with(&[("u1", None)], None);
        let err = agg.set_main_photo(&Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, DomainError::PhotoNotFound(_)));
    }

    #[test]
    fn test_main_photo_cannot_be_removed() {
        let mut agg = aggregate_with(&[("u1", Some("r1"))], Some("u1"));
        let id = agg.photos()[0].id;

        assert!(matches!(agg.remove_photo(&id), Err(DomainError::InvalidOperation(_))));
        assert_eq!(agg.photos().len(), 1);
    }

    #[test]
    fn test_remove_non_main_photo_is_recorded() {
        let mut agg = aggregate_with(&[("u1", Some("r1")), ("u2", Some("r2"))], Some("u1"));
        let id = agg.photos()[1].id;

        let removed = agg.remove_photo(&id).unwrap();

        assert_eq!(removed.public_id.as_deref(), Some("r2"));
        assert_eq!(agg.changeset().removed_photo_ids, vec![id]);
        assert_eq!(agg.member().image_url.as_deref(), Some("u1"));
    }

    #[test]
    fn test_profile_rename_marks_account() {
        let mut agg = aggregate_with(&[], None);
        let patch = ProfilePatch {
            display_name: Some("Kara".to_string()),
            ..Default::default()
        };

        agg.update_profile(&patch).unwrap();

        let changes = agg.changeset();
        assert_eq!(changes.account.unwrap().display_name, "Kara");
        assert_eq!(changes.member.unwrap().display_name, "Kara");
    }

    #[test]
    fn test_unlinked_account_is_rejected() {
        let m = member();
        let account = Account::new(Uuid::new_v4(), "Other".to_string(), "o@test.com".to_string());
        assert!(MemberAggregate::new(m, account, 0).is_err());
    }

    #[test]
    fn test_blank_display_name_is_rejected() {
        let mut agg = aggregate_with(&[], None);
        let patch = ProfilePatch {
            display_name: Some("     ".to_string()),
            ..Default::default()
        };

        let err = agg.update_profile(&patch).unwrap_err();

        assert!(matches!(err, DomainError::ValidationError(_)));
        assert_eq!(agg.member().display_name, "Karen");
        assert_eq!(agg.account().display_name, "Karen");
        assert!(!agg.has_changes());
    }

    #[test]
    fn test_padded_display_name_is_trimmed() {
        let mut agg = aggregate_with(&[], None);
        let patch = ProfilePatch {
            display_name: Some("  Kara ".to_string()),
            ..Default::default()
        };

        agg.update_profile(&patch).unwrap();

        assert_eq!(agg.member().display_name, "Kara");
        assert_eq!(agg.account().display_name, "Kara");
    }

    #[test]
    fn test_empty_patch_records_nothing() {
        let mut agg = aggregate_with(&[], None);
        agg.update_profile(&ProfilePatch::default()).unwrap();
        assert!(!agg.has_changes());
    }

    #[test]
    fn test_photo_being_deleted_cannot_become_main() {
        let mut agg = aggregate_with(&[("u1", Some("r1")), ("u2", Some("r2"))], Some("u1"));
        let id = agg.photos()[1].id;

        let flagged = agg.begin_photo_removal(&id).unwrap();
        assert!(flagged.pending_deletion);
        assert_eq!(agg.changeset().updated_photos, vec![flagged]);

        assert!(matches!(agg.set_main_photo(&id), Err(DomainError::InvalidOperation(_))));
        assert!(matches!(agg.begin_photo_removal(&id), Err(DomainError::InvalidOperation(_))));
        assert_eq!(agg.member().image_url.as_deref(), Some("u1"));
    }

    #[test]
    fn test_cancelled_removal_allows_main_again() {
        let mut agg = aggregate_with(&[("u1", Some("r1")), ("u2", Some("r2"))], Some("u1"));
        let id = agg.photos()[1].id;

        agg.begin_photo_removal(&id).unwrap();
        agg.cancel_photo_removal(&id).unwrap();

        assert_eq!(agg.changeset().updated_photos.len(), 1);
        assert!(!agg.changeset().updated_photos[0].pending_deletion);
        assert!(agg.set_main_photo(&id).is_ok());
    }

    #[test]
    fn test_removing_flagged_photo_drops_flag_update() {
        let mut agg = aggregate_with(&[("u1", Some("r1")), ("u2", Some("r2"))], Some("u1"));
        let id = agg.photos()[1].id;

        agg.begin_photo_removal(&id).unwrap();
        agg.remove_photo(&id).unwrap();

        let changes = agg.changeset();
        assert!(changes.updated_photos.is_empty());
        assert_eq!(changes.removed_photo_ids, vec![id]);
    }
}
