// ============================================================================
// Profile Infrastructure - Fixture Seeder
// File: crates/profile-infrastructure/src/seed.rs
// Description: Loads member fixtures from JSON into an empty store
// ============================================================================

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use profile_core::domain::{Account, Member, Photo};
use profile_core::error::DomainError;
use profile_core::repositories::MemberRepository;
use profile_shared::types::deserialize_lenient_utc;

#[derive(Error, Debug)]
pub enum SeedError {
    #[error("Cannot read seed file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid seed data: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// One fixture record
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SeedMember {
    pub id: Uuid,
    pub email: String,
    pub date_of_birth: NaiveDate,
    pub image_url: Option<String>,
    pub display_name: String,
    #[serde(deserialize_with = "deserialize_lenient_utc")]
    pub created: DateTime<Utc>,
    #[serde(deserialize_with = "deserialize_lenient_utc")]
    pub last_active: DateTime<Utc>,
    pub gender: String,
    pub description: Option<String>,
    pub city: String,
    pub country: String,
}

impl SeedMember {
    /// Account, member and the fixture photo. Seeded photos have no remote
    /// asset and are not assigned as main, readers derive the display image.
    pub fn into_records(self) -> (Account, Member, Vec<Photo>) {
        let account = Account::new(self.id, self.display_name.clone(), self.email);
        let photos = self
            .image_url
            .filter(|url| !url.trim().is_empty())
            .map(|url| vec![Photo::seeded(self.id, url)])
            .unwrap_or_default();

        let member = Member {
            id: self.id,
            date_of_birth: self.date_of_birth,
            image_url: None,
            display_name: self.display_name,
            created: self.created,
            last_active: self.last_active,
            gender: self.gender,
            description: self.description,
            city: self.city,
            country: self.country,
            photos: Vec::new(),
        };
        (account, member, photos)
    }
}

pub fn parse_seed(json: &str) -> Result<Vec<SeedMember>, SeedError> {
    Ok(serde_json::from_str(json)?)
}

/// Insert every fixture when the store has no members yet.
///
/// Returns the number of members created, zero when seeding was skipped.
pub async fn seed_members(repo: &dyn MemberRepository, path: impl AsRef<Path>) -> Result<usize, SeedError> {
    if repo.has_members().await? {
        info!("Members already present, skipping seed");
        return Ok(0);
    }

    let json = tokio::fs::read_to_string(path.as_ref()).await?;
    let records = parse_seed(&json)?;
    if records.is_empty() {
        info!("No members to seed");
        return Ok(0);
    }

    let count = records.len();
    for record in records {
        let (account, member, photos) = record.into_records();
        repo.insert_member(&account, &member, &photos).await?;
    }

    info!("Seeded {} members from {}", count, path.as_ref().display());
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryMemberRepository;

    const FIXTURE: &str = r#"[
        {
            "Id": "7f1a3c1e-9a55-4f6e-9f0e-1c2d3e4f5a6b",
            "Email": "Mary@Test.com",
            "DateOfBirth": "1994-07-22",
            "ImageUrl": "https://randomuser.me/api/portraits/women/1.jpg",
            "DisplayName": "Mary",
            "Created": "2024-11-05T09:00:00",
            "LastActive": "2025-02-01T18:30:00Z",
            "Gender": "female",
            "Description": "Coffee and long walks",
            "City": "Yogyakarta",
            "Country": "Indonesia"
        },
        {
            "Id": "0b6a6f8e-2f7d-4d0a-8c55-0e2a1b3c4d5e",
            "Email": "bob@test.com",
            "DateOfBirth": "1988-02-10",
            "ImageUrl": null,
            "DisplayName": "Bob",
            "Created": "2024-11-06T09:00:00",
            "LastActive": "2025-02-02T18:30:00",
            "Gender": "male",
            "Description": null,
            "City": "Makassar",
            "Country": "Indonesia"
        }
    ]"#;

    #[test]
    fn test_seed_record_builds_linked_entities() {
        let records = parse_seed(FIXTURE).unwrap();
        let (account, member, photos) = records.into_iter().next().unwrap().into_records();

        assert_eq!(account.id, member.id);
        assert_eq!(account.email, "mary@test.com");
        assert_eq!(member.image_url, None);
        assert_eq!(account.image_url, None);
        assert_eq!(photos.len(), 1);
        assert!(photos[0].public_id.is_none());
    }

    #[tokio::test]
    async fn test_seed_runs_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("UserSeedData.json");
        std::fs::write(&path, FIXTURE).unwrap();
        let repo = InMemoryMemberRepository::new();

        assert_eq!(seed_members(&repo, &path).await.unwrap(), 2);
        assert_eq!(seed_members(&repo, &path).await.unwrap(), 0);

        let members = repo.find_all_members().await.unwrap();
        assert_eq!(members.len(), 2);
        assert_eq!(members[0].display_name, "Mary");
        assert!(members[1].photos.is_empty());
    }

    #[test]
    fn test_invalid_json_is_parse_error() {
        assert!(matches!(parse_seed("{ not json"), Err(SeedError::Parse(_))));
    }
}
