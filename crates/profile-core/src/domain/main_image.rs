//! Read-side view of a member's main image

use serde::Serialize;

use super::photo::Photo;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "url", rename_all = "lowercase")]
pub enum MainImage {
    /// Stored on the member record
    Assigned(String),
    /// Not stored, taken from the first photo for display only
    Derived(String),
    Missing,
}

impl MainImage {
    /// Photos being deleted are never picked as the fallback
    pub fn resolve(image_url: Option<&str>, photos: &[Photo]) -> Self {
        match (image_url, photos.iter().find(|p| !p.pending_deletion)) {
            (Some(url), _) => MainImage::Assigned(url.to_string()),
            (None, Some(first)) => MainImage::Derived(first.url.clone()),
            (None, None) => MainImage::Missing,
        }
    }

    pub fn url(&self) -> Option<&str> {
        match self {
            MainImage::Assigned(url) | MainImage::Derived(url) => Some(url),
            MainImage::Missing => None,
        }
    }
}
