use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use profile_core::domain::{Account, AssetUpload, Member, Photo, ProfilePatch, UploadedAsset};
use profile_core::gateways::AssetUploader;
use profile_core::repositories::MemberRepository;
use profile_core::services::{GalleryService, ProfileService};
use profile_core::DomainError;
use profile_infrastructure::InMemoryMemberRepository;

/// Uploader for services acting as the concurrent writer
struct NoopUploader;

#[async_trait]
impl AssetUploader for NoopUploader {
    async fn upload(&self, _asset: AssetUpload) -> Result<UploadedAsset, DomainError> {
        Err(DomainError::UploadError("not used".into()))
    }

    async fn delete(&self, _public_id: &str) -> Result<(), DomainError> {
        Ok(())
    }
}

enum WhileDeleting {
    SetMain(Uuid, Uuid),
    RenameCity(Uuid, &'static str),
    Fail,
}

/// Asset host that runs another write against the same store while a
/// delete is in flight
struct InterleavingHost {
    repo: Arc<InMemoryMemberRepository>,
    action: WhileDeleting,
    deleted: Mutex<Vec<String>>,
    concurrent_result: Mutex<Option<Result<(), DomainError>>>,
}

impl InterleavingHost {
    fn new(repo: Arc<InMemoryMemberRepository>, action: WhileDeleting) -> Self {
        Self {
            repo,
            action,
            deleted: Mutex::new(Vec::new()),
            concurrent_result: Mutex::new(None),
        }
    }
}

#[async_trait]
impl AssetUploader for InterleavingHost {
    async fn upload(&self, _asset: AssetUpload) -> Result<UploadedAsset, DomainError> {
        Err(DomainError::UploadError("not used".into()))
    }

    async fn delete(&self, public_id: &str) -> Result<(), DomainError> {
        let result = match &self.action {
            WhileDeleting::SetMain(member_id, photo_id) => {
                let gallery = GalleryService::new(self.repo.clone(), Arc::new(NoopUploader));
                gallery.set_main_photo(member_id, photo_id).await.map(|_| ())
            }
            WhileDeleting::RenameCity(member_id, city) => {
                let profiles = ProfileService::new(self.repo.clone());
                let patch = ProfilePatch {
                    city: Some(city.to_string()),
                    ..Default::default()
                };
                profiles.update_profile(member_id, &patch).await.map(|_| ())
            }
            WhileDeleting::Fail => {
                return Err(DomainError::DeletionError("host rejected delete".into()));
            }
        };
        *self.concurrent_result.lock().unwrap() = Some(result);
        self.deleted.lock().unwrap().push(public_id.to_string());
        Ok(())
    }
}

/// Member with main photo A (u1) and a second photo B (u2)
async fn member_with_two_photos(repo: &InMemoryMemberRepository) -> (Uuid, Uuid, Uuid) {
    let id = Uuid::new_v4();
    let mut account = Account::new(id, "Rina".to_string(), "rina@test.com".to_string());
    account.image_url = Some("u1".to_string());
    let member = Member {
        id,
        date_of_birth: NaiveDate::from_ymd_opt(1995, 3, 14).unwrap(),
        image_url: Some("u1".to_string()),
        display_name: "Rina".to_string(),
        created: Utc::now(),
        last_active: Utc::now(),
        gender: "female".to_string(),
        description: None,
        city: "Semarang".to_string(),
        country: "Indonesia".to_string(),
        photos: Vec::new(),
    };
    let a = Photo::new(id, "u1".to_string(), Some("r1".to_string()));
    let b = Photo::new(id, "u2".to_string(), Some("r2".to_string()));
    let (a_id, b_id) = (a.id, b.id);
    repo.insert_member(&account, &member, &[a, b]).await.unwrap();
    (id, a_id, b_id)
}

#[tokio::test]
async fn photo_being_deleted_cannot_be_made_main() {
    let repo = Arc::new(InMemoryMemberRepository::new());
    let (member_id, _, b) = member_with_two_photos(&repo).await;
    let host = Arc::new(InterleavingHost::new(repo.clone(), WhileDeleting::SetMain(member_id, b)));
    let gallery = GalleryService::new(repo.clone(), host.clone());

    gallery.delete_photo(&member_id, &b).await.unwrap();

    let concurrent = host.concurrent_result.lock().unwrap().take().unwrap();
    assert!(matches!(concurrent, Err(DomainError::InvalidOperation(_))));
    assert_eq!(*host.deleted.lock().unwrap(), vec!["r2".to_string()]);

    let member = repo.find_member(&member_id).await.unwrap().unwrap();
    let urls: Vec<&str> = member.photos.iter().map(|p| p.url.as_str()).collect();
    assert_eq!(urls, vec!["u1"]);
    assert_eq!(member.image_url.as_deref(), Some("u1"));
    assert_eq!(repo.account(&member_id).unwrap().image_url.as_deref(), Some("u1"));
}

#[tokio::test]
async fn unrelated_write_during_delete_is_kept() {
    let repo = Arc::new(InMemoryMemberRepository::new());
    let (member_id, _, b) = member_with_two_photos(&repo).await;
    let host = Arc::new(InterleavingHost::new(repo.clone(), WhileDeleting::RenameCity(member_id, "Solo")));
    let gallery = GalleryService::new(repo.clone(), host.clone());

    gallery.delete_photo(&member_id, &b).await.unwrap();

    assert!(matches!(host.concurrent_result.lock().unwrap().take(), Some(Ok(()))));
    let member = repo.find_member(&member_id).await.unwrap().unwrap();
    assert_eq!(member.city, "Solo");
    assert_eq!(member.photos.len(), 1);
    // flag, city update, removal
    assert_eq!(repo.version(&member_id), Some(3));
}

#[tokio::test]
async fn failed_asset_delete_restores_photo() {
    let repo = Arc::new(InMemoryMemberRepository::new());
    let (member_id, _, b) = member_with_two_photos(&repo).await;
    let host = Arc::new(InterleavingHost::new(repo.clone(), WhileDeleting::Fail));
    let gallery = GalleryService::new(repo.clone(), host.clone());

    let err = gallery.delete_photo(&member_id, &b).await.unwrap_err();
    assert!(matches!(err, DomainError::DeletionError(_)));

    let photos = repo.find_photos_for_member(&member_id).await.unwrap();
    assert_eq!(photos.len(), 2);
    assert!(photos.iter().all(|p| !p.pending_deletion));

    gallery.set_main_photo(&member_id, &b).await.unwrap();
    let member = repo.find_member(&member_id).await.unwrap().unwrap();
    assert_eq!(member.image_url.as_deref(), Some("u2"));
}
