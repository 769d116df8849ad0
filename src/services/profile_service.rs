use crate::dto::profile_dto::UpsertProfilePayload;
use crate::error::Result;
use crate::models::profile::Profile;
use sqlx::PgPool;
use uuid::Uuid;

const PROFILE_COLUMNS: &str =
    "user_id, headline, bio, skills, experience_years, location, created_at, updated_at";

#[derive(Clone)]
pub struct ProfileService {
    pool: PgPool,
}

impl ProfileService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn get(&self, user_id: Uuid) -> Result<Option<Profile>> {
        let profile = sqlx::query_as::<_, Profile>(&format!(
            "SELECT {} FROM profiles WHERE user_id = $1",
            PROFILE_COLUMNS
        ))
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(profile)
    }

    pub async fn get_many(&self, user_ids: &[Uuid]) -> Result<Vec<Profile>> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }
        let profiles = sqlx::query_as::<_, Profile>(&format!(
            "SELECT {} FROM profiles WHERE user_id = ANY($1)",
            PROFILE_COLUMNS
        ))
        .bind(user_ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(profiles)
    }

    pub async fn upsert(&self, user_id: Uuid, payload: UpsertProfilePayload) -> Result<Profile> {
        let profile = sqlx::query_as::<_, Profile>(&format!(
            r#"
            INSERT INTO profiles (user_id, headline, bio, skills, experience_years, location)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (user_id) DO UPDATE SET
                headline = EXCLUDED.headline,
                bio = EXCLUDED.bio,
                skills = EXCLUDED.skills,
                experience_years = EXCLUDED.experience_years,
                location = EXCLUDED.location,
                updated_at = NOW()
            RETURNING {}
            "#,
            PROFILE_COLUMNS
        ))
        .bind(user_id)
        .bind(payload.headline)
        .bind(payload.bio)
        .bind(payload.skills)
        .bind(payload.experience_years)
        .bind(payload.location)
        .fetch_one(&self.pool)
        .await?;
        Ok(profile)
    }
}
