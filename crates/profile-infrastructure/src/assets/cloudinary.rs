// ============================================================================
// Profile Infrastructure - Cloudinary Asset Host
// File: crates/profile-infrastructure/src/assets/cloudinary.rs
// Description: Signed upload/destroy calls against a Cloudinary-compatible API
// ============================================================================

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::Utc;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{error, info};

use profile_core::domain::{AssetUpload, UploadedAsset};
use profile_core::error::DomainError;
use profile_core::gateways::AssetUploader;
use profile_shared::config::AssetHostSettings;

pub struct CloudinaryAssetHost {
    client: reqwest::Client,
    api_base_url: String,
    cloud_name: String,
    api_key: String,
    api_secret: String,
    folder: String,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: Option<String>,
    public_id: Option<String>,
    error: Option<HostError>,
}

#[derive(Debug, Deserialize)]
struct DestroyResponse {
    result: Option<String>,
    error: Option<HostError>,
}

#[derive(Debug, Deserialize)]
struct HostError {
    message: String,
}

impl CloudinaryAssetHost {
    pub fn new(settings: &AssetHostSettings) -> Result<Self, DomainError> {
        if settings.cloud_name.is_empty() || settings.api_key.is_empty() || settings.api_secret.is_empty() {
            return Err(DomainError::InternalError(
                "cloudinary asset host requires cloud_name, api_key and api_secret".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| DomainError::InternalError(format!("HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_base_url: settings.api_base_url.trim_end_matches('/').to_string(),
            cloud_name: settings.cloud_name.clone(),
            api_key: settings.api_key.clone(),
            api_secret: settings.api_secret.clone(),
            folder: settings.folder.clone(),
        })
    }

    fn endpoint(&self, action: &str) -> String {
        format!("{}/{}/image/{}", self.api_base_url, self.cloud_name, action)
    }

    /// Sign the parameters: sorted `key=value` pairs joined by `&`, followed
    /// by the api secret, hashed with SHA-256.
    fn sign(&self, params: &BTreeMap<&str, String>) -> String {
        let to_sign = params
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&");

        let mut hasher = Sha256::new();
        hasher.update(to_sign.as_bytes());
        hasher.update(self.api_secret.as_bytes());
        hex::encode(hasher.finalize())
    }

    fn signed_body(&self, mut params: BTreeMap<&str, String>) -> serde_json::Value {
        params.insert("timestamp", Utc::now().timestamp().to_string());
        let signature = self.sign(&params);

        let mut body = serde_json::Map::new();
        for (k, v) in params {
            body.insert(k.to_string(), serde_json::Value::String(v));
        }
        body.insert("api_key".into(), self.api_key.clone().into());
        body.insert("signature".into(), signature.into());
        body.insert("signature_algorithm".into(), "sha256".into());
        serde_json::Value::Object(body)
    }
}

#[async_trait]
impl AssetUploader for CloudinaryAssetHost {
    async fn upload(&self, asset: AssetUpload) -> Result<UploadedAsset, DomainError> {
        let mut params = BTreeMap::new();
        if !self.folder.is_empty() {
            params.insert("folder", self.folder.clone());
        }
        let mut body = self.signed_body(params);
        body["file"] = format!("data:{};base64,{}", asset.content_type, STANDARD.encode(&asset.data)).into();

        let response = self
            .client
            .post(self.endpoint("upload"))
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!("Asset upload request failed: {}", e);
                DomainError::UploadError(e.to_string())
            })?;

        let status = response.status();
        let parsed: UploadResponse = response
            .json()
            .await
            .map_err(|e| DomainError::UploadError(format!("invalid upload response ({}): {}", status, e)))?;

        if let Some(err) = parsed.error {
            return Err(DomainError::UploadError(err.message));
        }
        if !status.is_success() {
            return Err(DomainError::UploadError(format!("asset host returned {}", status)));
        }

        let url = parsed
            .secure_url
            .ok_or_else(|| DomainError::UploadError("upload response has no url".to_string()))?;

        info!("Uploaded asset {} ({})", asset.file_name, url);
        Ok(UploadedAsset {
            url,
            public_id: parsed.public_id,
        })
    }

    async fn delete(&self, public_id: &str) -> Result<(), DomainError> {
        let mut params = BTreeMap::new();
        params.insert("public_id", public_id.to_string());
        let body = self.signed_body(params);

        let response = self
            .client
            .post(self.endpoint("destroy"))
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!("Asset delete request failed: {}", e);
                DomainError::DeletionError(e.to_string())
            })?;

        let status = response.status();
        let parsed: DestroyResponse = response
            .json()
            .await
            .map_err(|e| DomainError::DeletionError(format!("invalid destroy response ({}): {}", status, e)))?;

        if let Some(err) = parsed.error {
            return Err(DomainError::DeletionError(err.message));
        }
        match parsed.result.as_deref() {
            Some("ok") => {
                info!("Deleted asset {}", public_id);
                Ok(())
            }
            other => Err(DomainError::DeletionError(format!(
                "asset host did not delete {}: {}",
                public_id,
                other.unwrap_or("no result")
            ))),
        }
    }
}
