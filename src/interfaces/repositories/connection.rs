use std::borrow::Cow;

use async_trait::async_trait;
use uuid::Uuid;

#[cfg(test)]
use mockall::automock;

use crate::{
    entities::{
        connection::{AcceptedConnection, ConnectionRequest, ConnectionStatus},
        conversation::Conversation,
    },
    errors::AppError,
    repositories::sqlx_repo::SqlxConnectionRepo,
};

#[cfg_attr(test, automock)]
#[async_trait]
pub trait ConnectionRepository: Send + Sync {
    async fn create_request(&self, requester_id: &Uuid, recipient_id: &Uuid) -> Result<ConnectionRequest, AppError>;
    async fn get_request(&self, id: &Uuid) -> Result<Option<ConnectionRequest>, AppError>;
    async fn list_requests_for_user(&self, user_id: &Uuid) -> Result<Vec<ConnectionRequest>, AppError>;
    /// The pending or accepted request between two users, in either direction.
    async fn find_live_request(&self, a: &Uuid, b: &Uuid) -> Result<Option<ConnectionRequest>, AppError>;
    /// Moves a pending request to accepted and opens the pair's conversation
    /// in one unit. `None` when the request is no longer pending.
    async fn accept_request(&self, id: &Uuid) -> Result<Option<AcceptedConnection>, AppError>;
    /// `None` when the request is no longer pending.
    async fn reject_request(&self, id: &Uuid) -> Result<Option<ConnectionRequest>, AppError>;
}

impl SqlxConnectionRepo {
    pub fn new(pool: sqlx::PgPool) -> Self {
        SqlxConnectionRepo { pool }
    }
}

#[async_trait]
impl ConnectionRepository for SqlxConnectionRepo {
    async fn create_request(&self, requester_id: &Uuid, recipient_id: &Uuid) -> Result<ConnectionRequest, AppError> {
        sqlx::query_as::<_, ConnectionRequest>(
            r#"
            INSERT INTO connection_requests (requester_id, recipient_id, status)
            VALUES ($1, $2, $3)
            RETURNING *
            "#
        )
        .bind(requester_id)
        .bind(recipient_id)
        .bind(ConnectionStatus::Pending)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db_err) if db_err.code() == Some(Cow::Borrowed("23505")) => {
                AppError::Conflict("A connection request already exists between these users".into())
            }
            _ => AppError::from(e),
        })
    }

    async fn get_request(&self, id: &Uuid) -> Result<Option<ConnectionRequest>, AppError> {
        sqlx::query_as::<_, ConnectionRequest>("SELECT * FROM connection_requests WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)
    }

    async fn list_requests_for_user(&self, user_id: &Uuid) -> Result<Vec<ConnectionRequest>, AppError> {
        let requests = sqlx::query_as::<_, ConnectionRequest>(
            r#"
            SELECT * FROM connection_requests
            WHERE requester_id = $1 OR recipient_id = $1
            ORDER BY created_at DESC
            "#
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(requests)
    }

    async fn find_live_request(&self, a: &Uuid, b: &Uuid) -> Result<Option<ConnectionRequest>, AppError> {
        sqlx::query_as::<_, ConnectionRequest>(
            r#"
            SELECT * FROM connection_requests
            WHERE ((requester_id = $1 AND recipient_id = $2)
                OR (requester_id = $2 AND recipient_id = $1))
              AND status IN ('pending', 'accepted')
            ORDER BY created_at DESC
            LIMIT 1
            "#
        )
        .bind(a)
        .bind(b)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)
    }

    async fn accept_request(&self, id: &Uuid) -> Result<Option<AcceptedConnection>, AppError> {
        let mut tx = self.pool.begin().await?;

        let request = sqlx::query_as::<_, ConnectionRequest>(
            r#"
            UPDATE connection_requests
            SET status = 'accepted', updated_at = NOW()
            WHERE id = $1 AND status = 'pending'
            RETURNING *
            "#
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(request) = request else {
            tx.rollback().await?;
            return Ok(None);
        };

        // The unordered-pair index makes this a no-op for an existing conversation
        sqlx::query(
            r#"
            INSERT INTO conversations (participant_a, participant_b)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            "#
        )
        .bind(request.requester_id)
        .bind(request.recipient_id)
        .execute(&mut *tx)
        .await?;

        let conversation = sqlx::query_as::<_, Conversation>(
            r#"
            SELECT * FROM conversations
            WHERE LEAST(participant_a, participant_b) = LEAST($1::uuid, $2::uuid)
              AND GREATEST(participant_a, participant_b) = GREATEST($1::uuid, $2::uuid)
            "#
        )
        .bind(request.requester_id)
        .bind(request.recipient_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Some(AcceptedConnection { request, conversation }))
    }

    async fn reject_request(&self, id: &Uuid) -> Result<Option<ConnectionRequest>, AppError> {
        sqlx::query_as::<_, ConnectionRequest>(
            r#"
            UPDATE connection_requests
            SET status = 'rejected', updated_at = NOW()
            WHERE id = $1 AND status = 'pending'
            RETURNING *
            "#
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(AppError::from)
    }
}
