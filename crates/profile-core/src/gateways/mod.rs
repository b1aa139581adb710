//! Gateway traits (ports) for external services

pub mod asset_uploader;

pub use asset_uploader::AssetUploader;
#[cfg(test)]
pub use asset_uploader::MockAssetUploader;
