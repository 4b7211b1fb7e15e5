use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::conversation::Conversation;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "connection_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    Pending,
    Accepted,
    Rejected,
}

impl ConnectionStatus {
    /// Pending and accepted requests occupy the pair; rejected ones do not.
    pub fn is_live(self) -> bool {
        matches!(self, ConnectionStatus::Pending | ConnectionStatus::Accepted)
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, sqlx::FromRow)]
pub struct ConnectionRequest {
    pub id: Uuid,
    pub requester_id: Uuid,
    pub recipient_id: Uuid,
    pub status: ConnectionStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ConnectionRequest {
    pub fn involves(&self, user_id: &Uuid) -> bool {
        self.requester_id == *user_id || self.recipient_id == *user_id
    }

    /// True when the request links `a` and `b` in either direction.
    pub fn links(&self, a: &Uuid, b: &Uuid) -> bool {
        (self.requester_id == *a && self.recipient_id == *b)
            || (self.requester_id == *b && self.recipient_id == *a)
    }
}

#[derive(Debug, Deserialize)]
pub struct NewConnectionRequest {
    pub recipient_id: Uuid,
}

/// Result of accepting a request: the updated request and the pair's conversation.
#[derive(Debug, Clone, Serialize)]
pub struct AcceptedConnection {
    pub request: ConnectionRequest,
    pub conversation: Conversation,
}
