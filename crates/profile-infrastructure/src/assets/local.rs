//! Local directory asset host for development setups without a remote host

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::{error, info};
use uuid::Uuid;

use profile_core::domain::{AssetUpload, UploadedAsset};
use profile_core::error::DomainError;
use profile_core::gateways::AssetUploader;

pub struct LocalAssetHost {
    dir: PathBuf,
    public_base_url: String,
}

impl LocalAssetHost {
    pub fn new(dir: impl Into<PathBuf>, public_base_url: &str) -> Self {
        Self {
            dir: dir.into(),
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    fn extension_for(asset: &AssetUpload) -> String {
        Path::new(&asset.file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .or_else(|| {
                mime_guess::get_mime_extensions_str(&asset.content_type)
                    .and_then(|exts| exts.first())
                    .map(|e| e.to_string())
            })
            .unwrap_or_else(|| "bin".to_string())
    }
}

#[async_trait]
impl AssetUploader for LocalAssetHost {
    async fn upload(&self, asset: AssetUpload) -> Result<UploadedAsset, DomainError> {
        let file_name = format!("{}.{}", Uuid::new_v4(), Self::extension_for(&asset));

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| DomainError::UploadError(format!("cannot create {}: {}", self.dir.display(), e)))?;
        tokio::fs::write(self.dir.join(&file_name), &asset.data)
            .await
            .map_err(|e| {
                error!("Failed to store asset {}: {}", file_name, e);
                DomainError::UploadError(e.to_string())
            })?;

        info!("Stored asset {} as {}", asset.file_name, file_name);
        Ok(UploadedAsset {
            url: format!("{}/{}", self.public_base_url, file_name),
            public_id: Some(file_name),
        })
    }

    async fn delete(&self, public_id: &str) -> Result<(), DomainError> {
        // public ids are bare file names created by `upload`
        if public_id.is_empty() || public_id.contains(['/', '\\']) || public_id.starts_with('.') {
            return Err(DomainError::DeletionError(format!("invalid asset id: {}", public_id)));
        }

        tokio::fs::remove_file(self.dir.join(public_id))
            .await
            .map_err(|e| DomainError::DeletionError(format!("{}: {}", public_id, e)))?;

        info!("Deleted asset {}", public_id);
        Ok(())
    }
}
