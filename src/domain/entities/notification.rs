use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::entities::skill::SkillType;

const MESSAGE_PREVIEW_CHARS: usize = 80;

/// Notification body, tagged by the `type` column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum NotificationPayload {
    SkillMatch {
        skill_name: String,
        matched_user_id: Uuid,
        /// Direction of the matched user's skill.
        skill_type: SkillType,
    },
    ConnectionRequest {
        request_id: Uuid,
        requester_id: Uuid,
        requester_name: Option<String>,
    },
    Message {
        conversation_id: Uuid,
        sender_id: Uuid,
        preview: String,
    },
    Generic {
        message: String,
    },
}

impl NotificationPayload {
    pub fn message(conversation_id: Uuid, sender_id: Uuid, body: &str) -> Self {
        let mut preview: String = body.chars().take(MESSAGE_PREVIEW_CHARS).collect();
        if body.chars().count() > MESSAGE_PREVIEW_CHARS {
            preview.push('…');
        }

        NotificationPayload::Message { conversation_id, sender_id, preview }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            NotificationPayload::SkillMatch { .. } => "skill_match",
            NotificationPayload::ConnectionRequest { .. } => "connection_request",
            NotificationPayload::Message { .. } => "message",
            NotificationPayload::Generic { .. } => "generic",
        }
    }

    /// The `payload` column value, without the tag.
    pub fn body(&self) -> Value {
        match serde_json::to_value(self) {
            Ok(Value::Object(mut map)) => map.remove("payload").unwrap_or(Value::Null),
            _ => Value::Null,
        }
    }

    /// Rebuilds the variant from stored columns. Unknown types and
    /// malformed payloads degrade to `Generic`.
    pub fn from_parts(kind: &str, payload: Value) -> Self {
        let tagged = serde_json::json!({ "type": kind, "payload": payload.clone() });

        serde_json::from_value(tagged).unwrap_or_else(|_| {
            let message = payload
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("You have a new notification")
                .to_string();
            NotificationPayload::Generic { message }
        })
    }

    pub fn render(&self) -> String {
        match self {
            NotificationPayload::SkillMatch { skill_name, skill_type: SkillType::Teach, .. } => {
                format!("Someone can teach you {}", skill_name)
            }
            NotificationPayload::SkillMatch { skill_name, skill_type: SkillType::Learn, .. } => {
                format!("Someone wants to learn {} from you", skill_name)
            }
            NotificationPayload::ConnectionRequest { requester_name, .. } => {
                let name = requester_name.as_deref().unwrap_or("Someone");
                format!("{} sent you a connection request", name)
            }
            NotificationPayload::Message { preview, .. } => format!("New message: {}", preview),
            NotificationPayload::Generic { message } => message.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(flatten)]
    pub payload: NotificationPayload,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, sqlx::FromRow)]
pub struct NotificationRow {
    pub id: Uuid,
    pub user_id: Uuid,
    #[sqlx(rename = "type")]
    pub kind: String,
    pub payload: sqlx::types::Json<Value>,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

impl From<NotificationRow> for Notification {
    fn from(row: NotificationRow) -> Self {
        Notification {
            id: row.id,
            user_id: row.user_id,
            payload: NotificationPayload::from_parts(&row.kind, row.payload.0),
            read: row.read,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NotificationInsert {
    pub user_id: Uuid,
    pub payload: NotificationPayload,
}

/// API shape: the stored notification plus its rendered text.
#[derive(Debug, Serialize)]
pub struct NotificationView {
    #[serde(flatten)]
    pub notification: Notification,
    pub text: String,
}

impl From<Notification> for NotificationView {
    fn from(notification: Notification) -> Self {
        let text = notification.payload.render();
        NotificationView { notification, text }
    }
}

#[derive(Debug, Deserialize)]
pub struct NotificationListQuery {
    #[serde(default)]
    pub unread_only: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_parts_round_trip_through_the_tag() {
        let payload = NotificationPayload::ConnectionRequest {
            request_id: Uuid::new_v4(),
            requester_id: Uuid::new_v4(),
            requester_name: Some("Ann".into()),
        };

        let rebuilt = NotificationPayload::from_parts(payload.kind(), payload.body());
        assert_eq!(rebuilt, payload);
        assert_eq!(rebuilt.render(), "Ann sent you a connection request");
    }

    #[test]
    fn unknown_types_degrade_to_generic() {
        let payload = NotificationPayload::from_parts(
            "badge_earned",
            serde_json::json!({ "message": "You earned a badge" }),
        );
        assert_eq!(payload.render(), "You earned a badge");

        let payload = NotificationPayload::from_parts("message", serde_json::json!(42));
        assert_eq!(payload.render(), "You have a new notification");
    }

    #[test]
    fn long_message_previews_are_truncated() {
        let body = "x".repeat(200);
        let NotificationPayload::Message { preview, .. } =
            NotificationPayload::message(Uuid::new_v4(), Uuid::new_v4(), &body)
        else {
            panic!("expected a message payload");
        };
        assert_eq!(preview.chars().count(), MESSAGE_PREVIEW_CHARS + 1);
    }
}
