use async_trait::async_trait;
use uuid::Uuid;

#[cfg(test)]
use mockall::automock;

use crate::{
    entities::session::{SessionInsert, SessionReschedule, SessionStatus, SkillSwapSession},
    errors::AppError,
    repositories::sqlx_repo::SqlxSessionRepo,
};

#[cfg_attr(test, automock)]
#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn create_session(&self, session: &SessionInsert) -> Result<SkillSwapSession, AppError>;
    async fn get_session(&self, id: &Uuid) -> Result<Option<SkillSwapSession>, AppError>;
    async fn list_sessions_for_user(&self, user_id: &Uuid) -> Result<Vec<SkillSwapSession>, AppError>;
    /// Conditional on the current status still being `from`.
    async fn update_status(&self, id: &Uuid, from: SessionStatus, to: SessionStatus) -> Result<Option<SkillSwapSession>, AppError>;
    /// Never touches the participant columns. Only applies while scheduled.
    async fn reschedule(&self, id: &Uuid, changes: &SessionReschedule) -> Result<Option<SkillSwapSession>, AppError>;
}

impl SqlxSessionRepo {
    pub fn new(pool: sqlx::PgPool) -> Self {
        SqlxSessionRepo { pool }
    }
}

#[async_trait]
impl SessionRepository for SqlxSessionRepo {
    async fn create_session(&self, session: &SessionInsert) -> Result<SkillSwapSession, AppError> {
        let created = sqlx::query_as::<_, SkillSwapSession>(
            r#"
            INSERT INTO skill_swap_sessions (
                user_a_id, user_b_id, skill_a_id, skill_b_id,
                status, scheduled_at, duration_minutes, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#
        )
        .bind(session.user_a_id)
        .bind(session.user_b_id)
        .bind(session.skill_a_id)
        .bind(session.skill_b_id)
        .bind(SessionStatus::Scheduled)
        .bind(session.scheduled_at)
        .bind(session.duration_minutes)
        .bind(&session.notes)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn get_session(&self, id: &Uuid) -> Result<Option<SkillSwapSession>, AppError> {
        sqlx::query_as::<_, SkillSwapSession>("SELECT * FROM skill_swap_sessions WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)
    }

    async fn list_sessions_for_user(&self, user_id: &Uuid) -> Result<Vec<SkillSwapSession>, AppError> {
        let sessions = sqlx::query_as::<_, SkillSwapSession>(
            r#"
            SELECT * FROM skill_swap_sessions
            WHERE user_a_id = $1 OR user_b_id = $1
            ORDER BY scheduled_at ASC
            "#
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(sessions)
    }

    async fn update_status(&self, id: &Uuid, from: SessionStatus, to: SessionStatus) -> Result<Option<SkillSwapSession>, AppError> {
        sqlx::query_as::<_, SkillSwapSession>(
            r#"
            UPDATE skill_swap_sessions
            SET status = $3, updated_at = NOW()
            WHERE id = $1 AND status = $2
            RETURNING *
            "#
        )
        .bind(id)
        .bind(from)
        .bind(to)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)
    }

    async fn reschedule(&self, id: &Uuid, changes: &SessionReschedule) -> Result<Option<SkillSwapSession>, AppError> {
        sqlx::query_as::<_, SkillSwapSession>(
            r#"
            UPDATE skill_swap_sessions SET
                scheduled_at = $2,
                skill_a_id = $3,
                skill_b_id = $4,
                duration_minutes = $5,
                notes = $6,
                updated_at = NOW()
            WHERE id = $1 AND status = 'scheduled'
            RETURNING *
            "#
        )
        .bind(id)
        .bind(changes.scheduled_at)
        .bind(changes.skill_a_id)
        .bind(changes.skill_b_id)
        .bind(changes.duration_minutes)
        .bind(&changes.notes)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)
    }
}
