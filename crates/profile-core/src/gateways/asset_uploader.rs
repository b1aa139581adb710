//! Asset host trait (port)

use async_trait::async_trait;

use crate::domain::{AssetUpload, UploadedAsset};
use crate::error::DomainError;

/// Remote storage for photo binaries
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AssetUploader: Send + Sync {
    /// Store the asset. Failures are reported as `DomainError::UploadError`.
    async fn upload(&self, asset: AssetUpload) -> Result<UploadedAsset, DomainError>;

    /// Remove a stored asset. Failures are reported as `DomainError::DeletionError`.
    async fn delete(&self, public_id: &str) -> Result<(), DomainError>;
}
