use async_trait::async_trait;
use uuid::Uuid;

#[cfg(test)]
use mockall::automock;

use crate::{
    entities::conversation::{Conversation, Message, MessageInsert},
    errors::AppError,
    repositories::sqlx_repo::SqlxConversationRepo,
};

#[cfg_attr(test, automock)]
#[async_trait]
pub trait ConversationRepository: Send + Sync {
    async fn get_conversation(&self, id: &Uuid) -> Result<Option<Conversation>, AppError>;
    async fn list_conversations_for_user(&self, user_id: &Uuid) -> Result<Vec<Conversation>, AppError>;
    async fn insert_message(&self, message: &MessageInsert) -> Result<Message, AppError>;
    async fn list_messages(&self, conversation_id: &Uuid) -> Result<Vec<Message>, AppError>;
}

impl SqlxConversationRepo {
    pub fn new(pool: sqlx::PgPool) -> Self {
        SqlxConversationRepo { pool }
    }
}

#[async_trait]
impl ConversationRepository for SqlxConversationRepo {
    async fn get_conversation(&self, id: &Uuid) -> Result<Option<Conversation>, AppError> {
        sqlx::query_as::<_, Conversation>("SELECT * FROM conversations WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(AppError::from)
    }

    async fn list_conversations_for_user(&self, user_id: &Uuid) -> Result<Vec<Conversation>, AppError> {
        let conversations = sqlx::query_as::<_, Conversation>(
            r#"
            SELECT * FROM conversations
            WHERE participant_a = $1 OR participant_b = $1
            ORDER BY created_at DESC
            "#
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(conversations)
    }

    async fn insert_message(&self, message: &MessageInsert) -> Result<Message, AppError> {
        let inserted = sqlx::query_as::<_, Message>(
            r#"
            INSERT INTO messages (conversation_id, sender_id, body)
            VALUES ($1, $2, $3)
            RETURNING *
            "#
        )
        .bind(message.conversation_id)
        .bind(message.sender_id)
        .bind(&message.body)
        .fetch_one(&self.pool)
        .await?;

        Ok(inserted)
    }

    async fn list_messages(&self, conversation_id: &Uuid) -> Result<Vec<Message>, AppError> {
        let messages = sqlx::query_as::<_, Message>(
            "SELECT * FROM messages WHERE conversation_id = $1 ORDER BY created_at ASC"
        )
        .bind(conversation_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(messages)
    }
}
