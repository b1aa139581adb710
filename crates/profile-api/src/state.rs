use std::sync::Arc;

use profile_core::gateways::AssetUploader;
use profile_core::repositories::MemberRepository;
use profile_core::services::{GalleryService, ProfileService};

#[derive(Clone)]
pub struct AppState {
    pub profile_service: Arc<ProfileService>,
    pub gallery_service: Arc<GalleryService>,
}

impl AppState {
    pub fn new(member_repo: Arc<dyn MemberRepository>, asset_uploader: Arc<dyn AssetUploader>) -> Self {
        Self {
            profile_service: Arc::new(ProfileService::new(member_repo.clone())),
            gallery_service: Arc::new(GalleryService::new(member_repo, asset_uploader)),
        }
    }
}
