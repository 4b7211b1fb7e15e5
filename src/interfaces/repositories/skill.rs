use async_trait::async_trait;
use sqlx::QueryBuilder;
use uuid::Uuid;

#[cfg(test)]
use mockall::automock;

use crate::{
    entities::skill::{Skill, SkillInsert, SkillType},
    errors::AppError,
    repositories::sqlx_repo::SqlxSkillRepo,
};

#[cfg_attr(test, automock)]
#[async_trait]
pub trait SkillRepository: Send + Sync {
    async fn create_skill(&self, skill: &SkillInsert) -> Result<Skill, AppError>;
    async fn get_skill(&self, id: &Uuid) -> Result<Option<Skill>, AppError>;
    async fn list_skills_for_user(&self, user_id: &Uuid) -> Result<Vec<Skill>, AppError>;
    /// All skills of one direction, optionally narrowed to an exact name.
    async fn list_skills_by_type(&self, skill_type: SkillType, name: Option<String>) -> Result<Vec<Skill>, AppError>;
    async fn delete_skill(&self, id: &Uuid) -> Result<(), AppError>;
}

impl SqlxSkillRepo {
    pub fn new(pool: sqlx::PgPool) -> Self {
        SqlxSkillRepo { pool }
    }
}

#[async_trait]
impl SkillRepository for SqlxSkillRepo {
    async fn create_skill(&self, skill: &SkillInsert) -> Result<Skill, AppError> {
        let created = sqlx::query_as::<_, Skill>(
            r#"
            INSERT INTO skills (user_id, name, description, category, skill_type, proficiency_level)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#
        )
        .bind(skill.user_id)
        .bind(&skill.name)
        .bind(&skill.description)
        .bind(&skill.category)
        .bind(skill.skill_type)
        .bind(skill.proficiency_level)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn get_skill(&self, id: &Uuid) -> Result<Option<Skill>, AppError> {
        sqlx::query_as::<_, Skill>("SELECT * FROM skills WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)
    }

    async fn list_skills_for_user(&self, user_id: &Uuid) -> Result<Vec<Skill>, AppError> {
        let skills = sqlx::query_as::<_, Skill>(
            "SELECT * FROM skills WHERE user_id = $1 ORDER BY created_at DESC"
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(skills)
    }

    async fn list_skills_by_type(&self, skill_type: SkillType, name: Option<String>) -> Result<Vec<Skill>, AppError> {
        let mut builder = QueryBuilder::new("SELECT * FROM skills WHERE skill_type = ");
        builder.push_bind(skill_type);

        if let Some(name) = name {
            builder.push(" AND name = ").push_bind(name);
        }

        builder.push(" ORDER BY created_at ASC");

        let skills = builder
            .build_query_as::<Skill>()
            .fetch_all(&self.pool)
            .await?;

        Ok(skills)
    }

    async fn delete_skill(&self, id: &Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM skills WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Skill not found".into()));
        }

        Ok(())
    }
}
