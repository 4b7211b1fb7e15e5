use async_trait::async_trait;
use sqlx::types::Json;
use uuid::Uuid;

#[cfg(test)]
use mockall::automock;

use crate::{
    entities::notification::{Notification, NotificationInsert, NotificationRow},
    errors::AppError,
    repositories::sqlx_repo::SqlxNotificationRepo,
};

#[cfg_attr(test, automock)]
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    async fn create_notification(&self, notification: &NotificationInsert) -> Result<Notification, AppError>;
    async fn list_notifications(&self, user_id: &Uuid, unread_only: bool) -> Result<Vec<Notification>, AppError>;
    /// `None` when no notification with that id belongs to `user_id`.
    async fn mark_read(&self, id: &Uuid, user_id: &Uuid) -> Result<Option<Notification>, AppError>;
    /// Returns the rows that were unread before the call.
    async fn mark_all_read(&self, user_id: &Uuid) -> Result<Vec<Notification>, AppError>;
}

impl SqlxNotificationRepo {
    pub fn new(pool: sqlx::PgPool) -> Self {
        SqlxNotificationRepo { pool }
    }
}

#[async_trait]
impl NotificationRepository for SqlxNotificationRepo {
    async fn create_notification(&self, notification: &NotificationInsert) -> Result<Notification, AppError> {
        let row = sqlx::query_as::<_, NotificationRow>(
            r#"
            INSERT INTO notifications (user_id, type, payload)
            VALUES ($1, $2, $3)
            RETURNING *
            "#
        )
        .bind(notification.user_id)
        .bind(notification.payload.kind())
        .bind(Json(notification.payload.body()))
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn list_notifications(&self, user_id: &Uuid, unread_only: bool) -> Result<Vec<Notification>, AppError> {
        let rows = sqlx::query_as::<_, NotificationRow>(
            r#"
            SELECT * FROM notifications
            WHERE user_id = $1
              AND ($2::boolean IS FALSE OR read = FALSE)
            ORDER BY created_at DESC
            "#
        )
        .bind(user_id)
        .bind(unread_only)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Notification::from).collect())
    }

    async fn mark_read(&self, id: &Uuid, user_id: &Uuid) -> Result<Option<Notification>, AppError> {
        let row = sqlx::query_as::<_, NotificationRow>(
            r#"
            UPDATE notifications SET read = TRUE
            WHERE id = $1 AND user_id = $2
            RETURNING *
            "#
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Notification::from))
    }

    async fn mark_all_read(&self, user_id: &Uuid) -> Result<Vec<Notification>, AppError> {
        let rows = sqlx::query_as::<_, NotificationRow>(
            r#"
            UPDATE notifications SET read = TRUE
            WHERE user_id = $1 AND read = FALSE
            RETURNING *
            "#
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Notification::from).collect())
    }
}
