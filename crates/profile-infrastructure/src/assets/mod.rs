//! Asset host adapters

pub mod cloudinary;
pub mod local;

pub use cloudinary::CloudinaryAssetHost;
pub use local::LocalAssetHost;

use std::sync::Arc;
use tracing::info;

use profile_core::error::DomainError;
use profile_core::gateways::AssetUploader;
use profile_shared::config::{AssetHostSettings, AssetProvider};

/// Build the asset host selected by configuration
pub fn build_asset_host(settings: &AssetHostSettings) -> Result<Arc<dyn AssetUploader>, DomainError> {
    match settings.provider {
        AssetProvider::Cloudinary => {
            info!("Using Cloudinary asset host ({})", settings.cloud_name);
            Ok(Arc::new(CloudinaryAssetHost::new(settings)?))
        }
        AssetProvider::Local => {
            info!("Using local asset host at {}", settings.local_dir);
            Ok(Arc::new(LocalAssetHost::new(&settings.local_dir, &settings.public_base_url)))
        }
    }
}
