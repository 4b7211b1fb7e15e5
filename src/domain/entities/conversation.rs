use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, Serialize, PartialEq, sqlx::FromRow)]
pub struct Conversation {
    pub id: Uuid,
    pub participant_a: Uuid,
    pub participant_b: Uuid,
    pub created_at: DateTime<Utc>,
}

impl Conversation {
    pub fn has_participant(&self, user_id: &Uuid) -> bool {
        self.participant_a == *user_id || self.participant_b == *user_id
    }

    /// The participant that is not `user_id`, if `user_id` takes part at all.
    pub fn other_participant(&self, user_id: &Uuid) -> Option<Uuid> {
        if self.participant_a == *user_id {
            Some(self.participant_b)
        } else if self.participant_b == *user_id {
            Some(self.participant_a)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, sqlx::FromRow)]
pub struct Message {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub sender_id: Uuid,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SendMessageRequest {
    pub conversation_id: Uuid,

    pub sender_id: Uuid,

    #[validate(
        length(max = 4000, message = "Must be at most 4000 characters"),
        custom(function = "validate_not_blank")
    )]
    pub body: String,
}

#[derive(Debug, Clone)]
pub struct MessageInsert {
    pub conversation_id: Uuid,
    pub sender_id: Uuid,
    pub body: String,
}

#[derive(Debug, Serialize)]
pub struct MessageSentResponse {
    pub ok: bool,
    pub message: Message,
}

fn validate_not_blank(body: &str) -> Result<(), ValidationError> {
    if body.trim().is_empty() {
        let mut error = ValidationError::new("blank");
        error.message = Some("Message body cannot be empty".into());
        return Err(error);
    }
    Ok(())
}
