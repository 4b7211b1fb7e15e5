use async_trait::async_trait;
use uuid::Uuid;

#[cfg(test)]
use mockall::automock;

use crate::{
    entities::profile::{ProfileSummary, ProfileUpsert, UserProfile},
    errors::AppError,
    repositories::sqlx_repo::SqlxProfileRepo,
};

#[cfg_attr(test, automock)]
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn check_connection(&self) -> Result<(), AppError>;
    async fn upsert_profile(&self, profile: &ProfileUpsert) -> Result<UserProfile, AppError>;
    async fn get_profile(&self, id: &Uuid) -> Result<Option<UserProfile>, AppError>;
    async fn get_profile_summaries(&self, ids: &[Uuid]) -> Result<Vec<ProfileSummary>, AppError>;
    async fn refresh_skills_count(&self, user_id: &Uuid) -> Result<(), AppError>;
}

impl SqlxProfileRepo {
    pub fn new(pool: sqlx::PgPool) -> Self {
        SqlxProfileRepo { pool }
    }
}

#[async_trait]
impl ProfileRepository for SqlxProfileRepo {
    async fn check_connection(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(AppError::from)
    }

    async fn upsert_profile(&self, profile: &ProfileUpsert) -> Result<UserProfile, AppError> {
        let (name_touched, full_name) = profile.full_name.clone().into_touched();
        let (bio_touched, bio) = profile.bio.clone().into_touched();

        let saved = sqlx::query_as::<_, UserProfile>(
            r#"
            INSERT INTO profiles (id, full_name, bio, skills_count)
            VALUES ($1, $2, $4, (SELECT COUNT(*) FROM skills WHERE user_id = $1))
            ON CONFLICT (id) DO UPDATE SET
                full_name = CASE WHEN $3 THEN EXCLUDED.full_name ELSE profiles.full_name END,
                bio = CASE WHEN $5 THEN EXCLUDED.bio ELSE profiles.bio END,
                updated_at = NOW()
            RETURNING *
            "#
        )
        .bind(profile.id)
        .bind(full_name)
        .bind(name_touched)
        .bind(bio)
        .bind(bio_touched)
        .fetch_one(&self.pool)
        .await?;

        Ok(saved)
    }

    async fn get_profile(&self, id: &Uuid) -> Result<Option<UserProfile>, AppError> {
        sqlx::query_as::<_, UserProfile>("SELECT * FROM profiles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)
    }

    async fn get_profile_summaries(&self, ids: &[Uuid]) -> Result<Vec<ProfileSummary>, AppError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let summaries = sqlx::query_as::<_, ProfileSummary>(
            "SELECT id, full_name, bio FROM profiles WHERE id = ANY($1)"
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(summaries)
    }

    async fn refresh_skills_count(&self, user_id: &Uuid) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE profiles
            SET skills_count = (SELECT COUNT(*) FROM skills WHERE user_id = $1),
                updated_at = NOW()
            WHERE id = $1
            "#
        )
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
