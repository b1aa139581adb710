//! Account domain entity

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity record linked 1:1 with a member (same id)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: Uuid,
    pub display_name: String,
    pub email: String,
    /// Mirror of `Member::image_url`
    pub image_url: Option<String>,
}

impl Account {
    pub fn new(id: Uuid, display_name: String, email: String) -> Self {
        Self {
            id,
            display_name: display_name.trim().to_string(),
            email: email.trim().to_lowercase(),
            image_url: None,
        }
    }
}
