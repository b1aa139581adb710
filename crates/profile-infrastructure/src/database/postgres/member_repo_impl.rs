// ============================================================================
// Profile Infrastructure - PostgreSQL Member Repository
// File: crates/profile-infrastructure/src/database/postgres/member_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, PgPool, Postgres, Transaction};
use std::collections::HashMap;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use profile_core::domain::{Account, Member, MemberAggregate, MemberChangeset, Photo};
use profile_core::error::DomainError;
use profile_core::repositories::MemberRepository;

pub struct PgMemberRepository {
    pool: PgPool,
}

impl PgMemberRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn db_error(context: &'static str) -> impl Fn(sqlx::Error) -> DomainError {
    move |e: sqlx::Error| {
        error!("Database error {}: {}", context, e);
        DomainError::DatabaseError(e.to_string())
    }
}

// Internal row types for SQLx mapping
#[derive(Debug, FromRow)]
struct MemberRow {
    pub id: Uuid,
    pub date_of_birth: NaiveDate,
    pub image_url: Option<String>,
    pub display_name: String,
    pub created: DateTime<Utc>,
    pub last_active: DateTime<Utc>,
    pub gender: String,
    pub description: Option<String>,
    pub city: String,
    pub country: String,
    pub version: i64,
}

impl MemberRow {
    fn into_member(self, photos: Vec<Photo>) -> Member {
        Member {
            id: self.id,
            date_of_birth: self.date_of_birth,
            image_url: self.image_url,
            display_name: self.display_name,
            created: self.created,
            last_active: self.last_active,
            gender: self.gender,
            description: self.description,
            city: self.city,
            country: self.country,
            photos,
        }
    }
}

#[derive(Debug, FromRow)]
struct AccountRow {
    pub id: Uuid,
    pub display_name: String,
    pub email: String,
    pub image_url: Option<String>,
}

impl From<AccountRow> for Account {
    fn from(row: AccountRow) -> Self {
        Account {
            id: row.id,
            display_name: row.display_name,
            email: row.email,
            image_url: row.image_url,
        }
    }
}

#[derive(Debug, FromRow)]
struct PhotoRow {
    pub id: Uuid,
    pub url: String,
    pub public_id: Option<String>,
    pub member_id: Uuid,
    pub pending_deletion: bool,
}

impl From<PhotoRow> for Photo {
    fn from(row: PhotoRow) -> Self {
        Photo {
            id: row.id,
            url: row.url,
            public_id: row.public_id,
            member_id: row.member_id,
            pending_deletion: row.pending_deletion,
        }
    }
}

const MEMBER_COLUMNS: &str = r#"
    id, date_of_birth, image_url, display_name, created, last_active,
    gender, description, city, country, version
"#;

impl PgMemberRepository {
    async fn fetch_member_row(&self, id: &Uuid) -> Result<Option<MemberRow>, DomainError> {
        sqlx::query_as::<_, MemberRow>(&format!(
            "SELECT {} FROM members WHERE id = $1",
            MEMBER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("finding member by id"))
    }

    async fn fetch_photos(&self, member_id: &Uuid) -> Result<Vec<Photo>, DomainError> {
        let rows: Vec<PhotoRow> = sqlx::query_as(
            r#"
            SELECT id, url, public_id, member_id, pending_deletion
            FROM photos
            WHERE member_id = $1
            ORDER BY seq
            "#,
        )
        .bind(member_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("loading photos"))?;

        Ok(rows.into_iter().map(Photo::from).collect())
    }

    async fn insert_photo(
        tx: &mut Transaction<'_, Postgres>,
        photo: &Photo,
    ) -> Result<u64, DomainError> {
        let result = sqlx::query(
            r#"
            INSERT INTO photos (id, url, public_id, member_id, pending_deletion)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(photo.id)
        .bind(&photo.url)
        .bind(&photo.public_id)
        .bind(photo.member_id)
        .bind(photo.pending_deletion)
        .execute(&mut **tx)
        .await
        .map_err(db_error("inserting photo"))?;

        Ok(result.rows_affected())
    }
}

#[async_trait]
impl MemberRepository for PgMemberRepository {
    async fn find_member(&self, id: &Uuid) -> Result<Option<Member>, DomainError> {
        let Some(row) = self.fetch_member_row(id).await? else {
            return Ok(None);
        };
        let photos = self.fetch_photos(id).await?;
        Ok(Some(row.into_member(photos)))
    }

    async fn find_all_members(&self) -> Result<Vec<Member>, DomainError> {
        let rows: Vec<MemberRow> = sqlx::query_as(&format!(
            "SELECT {} FROM members ORDER BY created, id",
            MEMBER_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("listing members"))?;

        let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
        let photo_rows: Vec<PhotoRow> = sqlx::query_as(
            r#"
            SELECT id, url, public_id, member_id, pending_deletion
            FROM photos
            WHERE member_id = ANY($1)
            ORDER BY seq
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("loading photos for members"))?;

        let mut photos_by_member: HashMap<Uuid, Vec<Photo>> = HashMap::new();
        for row in photo_rows {
            photos_by_member.entry(row.member_id).or_default().push(row.into());
        }

        debug!("Loaded {} members", rows.len());
        Ok(rows
            .into_iter()
            .map(|row| {
                let photos = photos_by_member.remove(&row.id).unwrap_or_default();
                row.into_member(photos)
            })
            .collect())
    }

    async fn find_photos_for_member(&self, member_id: &Uuid) -> Result<Vec<Photo>, DomainError> {
        self.fetch_photos(member_id).await
    }

    async fn find_member_for_update(&self, id: &Uuid) -> Result<Option<MemberAggregate>, DomainError> {
        let Some(row) = self.fetch_member_row(id).await? else {
            return Ok(None);
        };

        let account: AccountRow = sqlx::query_as(
            r#"
            SELECT id, display_name, email, image_url
            FROM accounts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("finding account by id"))?
        .ok_or_else(|| DomainError::InternalError(format!("member {} has no account", id)))?;

        let photos = self.fetch_photos(id).await?;
        let version = row.version;
        MemberAggregate::new(row.into_member(photos), account.into(), version).map(Some)
    }

    async fn commit(&self, changes: &MemberChangeset) -> Result<bool, DomainError> {
        if changes.is_empty() {
            return Ok(false);
        }

        let mut tx = self.pool.begin().await.map_err(db_error("starting transaction"))?;

        // Version check and bump first, a stale writer stops here with nothing applied
        let bumped = match &changes.member {
            Some(member) => sqlx::query(
                r#"
                UPDATE members
                SET
                    display_name = $3,
                    description = $4,
                    city = $5,
                    country = $6,
                    image_url = $7,
                    last_active = $8,
                    version = version + 1
                WHERE id = $1 AND version = $2
                "#,
            )
            .bind(changes.member_id)
            .bind(changes.expected_version)
            .bind(&member.display_name)
            .bind(&member.description)
            .bind(&member.city)
            .bind(&member.country)
            .bind(&member.image_url)
            .bind(member.last_active)
            .execute(&mut *tx)
            .await,
            None => sqlx::query(
                r#"
                UPDATE members
                SET version = version + 1
                WHERE id = $1 AND version = $2
                "#,
            )
            .bind(changes.member_id)
            .bind(changes.expected_version)
            .execute(&mut *tx)
            .await,
        }
        .map_err(db_error("updating member"))?;

        if bumped.rows_affected() == 0 {
            tx.rollback().await.map_err(db_error("rolling back"))?;
            warn!(member_id = %changes.member_id, "Stale member version, commit rejected");
            return Err(DomainError::Conflict(changes.member_id));
        }

        if let Some(account) = &changes.account {
            sqlx::query(
                r#"
                UPDATE accounts
                SET display_name = $2, image_url = $3
                WHERE id = $1
                "#,
            )
            .bind(account.id)
            .bind(&account.display_name)
            .bind(&account.image_url)
            .execute(&mut *tx)
            .await
            .map_err(db_error("updating account"))?;
        }

        for photo in &changes.added_photos {
            Self::insert_photo(&mut tx, photo).await?;
        }

        for photo in &changes.updated_photos {
            sqlx::query("UPDATE photos SET pending_deletion = $3 WHERE member_id = $1 AND id = $2")
                .bind(changes.member_id)
                .bind(photo.id)
                .bind(photo.pending_deletion)
                .execute(&mut *tx)
                .await
                .map_err(db_error("flagging photo"))?;
        }

        if !changes.removed_photo_ids.is_empty() {
            sqlx::query("DELETE FROM photos WHERE member_id = $1 AND id = ANY($2)")
                .bind(changes.member_id)
                .bind(&changes.removed_photo_ids)
                .execute(&mut *tx)
                .await
                .map_err(db_error("deleting photos"))?;
        }

        tx.commit().await.map_err(|e| {
            error!("Database error committing member {}: {}", changes.member_id, e);
            DomainError::PersistenceError(e.to_string())
        })?;

        Ok(true)
    }

    async fn has_members(&self) -> Result<bool, DomainError> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM members)")
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("checking for members"))
    }

    async fn insert_member(
        &self,
        account: &Account,
        member: &Member,
        photos: &[Photo],
    ) -> Result<(), DomainError> {
        info!("Creating member with email: {}", account.email);

        let mut tx = self.pool.begin().await.map_err(db_error("starting transaction"))?;

        sqlx::query(
            r#"
            INSERT INTO accounts (id, display_name, email, image_url)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(account.id)
        .bind(&account.display_name)
        .bind(&account.email)
        .bind(&account.image_url)
        .execute(&mut *tx)
        .await
        .map_err(db_error("creating account"))?;

        sqlx::query(
            r#"
            INSERT INTO members (
                id, date_of_birth, image_url, display_name, created, last_active,
                gender, description, city, country, version
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, 0)
            "#,
        )
        .bind(member.id)
        .bind(member.date_of_birth)
        .bind(&member.image_url)
        .bind(&member.display_name)
        .bind(member.created)
        .bind(member.last_active)
        .bind(&member.gender)
        .bind(&member.description)
        .bind(&member.city)
        .bind(&member.country)
        .execute(&mut *tx)
        .await
        .map_err(db_error("creating member"))?;

        for photo in photos {
            Self::insert_photo(&mut tx, photo).await?;
        }

        tx.commit().await.map_err(db_error("committing new member"))?;
        Ok(())
    }
}
