//! Profile service: read access over market participants and staff

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::{Language, Profile, UserRole};

pub(crate) const PROFILE_COLUMNS: &str = "id, custom_id, name, phone, email, role, village, \
     preferred_language, is_active, created_at, updated_at";

/// Database row for a profile
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct ProfileRow {
    pub id: Uuid,
    pub custom_id: Option<String>,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub role: String,
    pub village: Option<String>,
    pub preferred_language: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<ProfileRow> for Profile {
    type Error = AppError;

    fn try_from(row: ProfileRow) -> AppResult<Self> {
        Ok(Profile {
            id: row.id,
            custom_id: row.custom_id,
            name: row.name,
            phone: row.phone,
            email: row.email,
            role: UserRole::from_str(&row.role)
                .ok_or_else(|| AppError::Internal(format!("invalid role '{}'", row.role)))?,
            village: row.village,
            preferred_language: match row.preferred_language.as_str() {
                "en" => Language::English,
                _ => Language::Marathi,
            },
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Profile service
#[derive(Clone)]
pub struct ProfileService {
    db: PgPool,
}

impl ProfileService {
    /// Create a new ProfileService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Get a profile by id
    pub async fn get_profile(&self, profile_id: Uuid) -> AppResult<Profile> {
        let row = sqlx::query_as::<_, ProfileRow>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM profiles WHERE id = $1"
        ))
        .bind(profile_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Profile".to_string()))?;

        Profile::try_from(row)
    }

    /// Find a profile by its normalized phone number
    pub async fn find_by_phone(&self, phone: &str) -> AppResult<Option<Profile>> {
        let row = sqlx::query_as::<_, ProfileRow>(&format!(
            "SELECT {PROFILE_COLUMNS} FROM profiles WHERE phone = $1"
        ))
        .bind(phone)
        .fetch_optional(&self.db)
        .await?;

        row.map(Profile::try_from).transpose()
    }

    /// List profiles, optionally restricted to one role
    pub async fn list_profiles(&self, role: Option<UserRole>) -> AppResult<Vec<Profile>> {
        let rows = sqlx::query_as::<_, ProfileRow>(&format!(
            r#"
            SELECT {PROFILE_COLUMNS} FROM profiles
            WHERE ($1::text IS NULL OR role = $1)
            ORDER BY created_at DESC
            "#
        ))
        .bind(role.map(|r| r.as_str()))
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(Profile::try_from).collect()
    }
}
