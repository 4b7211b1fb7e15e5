//! In-process change feed.
//!
//! Writers publish a [`ChangeEvent`] after a successful write; subscribers
//! get a stream filtered to one entity type and to events whose audience
//! includes them. Slow subscribers skip what they missed.

use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use futures_util::stream::{self, Stream};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::broadcast::{self, error::RecvError};
use uuid::Uuid;

use crate::{
    entities::notification::{Notification, NotificationPayload},
    errors::AppError,
};

const DEFAULT_CAPACITY: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedEntity {
    Notifications,
    Messages,
    Connections,
    Sessions,
    Skills,
}

impl FeedEntity {
    pub fn as_str(self) -> &'static str {
        match self {
            FeedEntity::Notifications => "notifications",
            FeedEntity::Messages => "messages",
            FeedEntity::Connections => "connections",
            FeedEntity::Sessions => "sessions",
            FeedEntity::Skills => "skills",
        }
    }
}

impl fmt::Display for FeedEntity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeedEntity {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "notifications" => Ok(FeedEntity::Notifications),
            "messages" => Ok(FeedEntity::Messages),
            "connections" => Ok(FeedEntity::Connections),
            "sessions" => Ok(FeedEntity::Sessions),
            "skills" => Ok(FeedEntity::Skills),
            other => Err(AppError::NotFound(format!("Unknown feed: {}", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChangeEvent {
    pub entity: FeedEntity,
    #[serde(rename = "event")]
    pub kind: ChangeKind,
    #[serde(skip)]
    pub audience: Vec<Uuid>,
    /// The affected row as the API serializes it.
    pub record: Value,
    pub at: DateTime<Utc>,
}

impl ChangeEvent {
    pub fn new<T: Serialize>(entity: FeedEntity, kind: ChangeKind, audience: Vec<Uuid>, record: &T) -> Self {
        let record = serde_json::to_value(record).unwrap_or_else(|e| {
            tracing::warn!(error = %e, %entity, "Failed to serialize change record");
            Value::Null
        });

        ChangeEvent { entity, kind, audience, record, at: Utc::now() }
    }

    fn is_visible_to(&self, entity: FeedEntity, user_id: &Uuid) -> bool {
        self.entity == entity && self.audience.contains(user_id)
    }
}

#[derive(Clone)]
pub struct ChangeFeed {
    sender: broadcast::Sender<ChangeEvent>,
}

impl Default for ChangeFeed {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl ChangeFeed {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Fire and forget; no subscribers is not an error.
    pub fn publish(&self, event: ChangeEvent) {
        let _ = self.sender.send(event);
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    pub fn subscribe(&self, entity: FeedEntity, user_id: Uuid) -> impl Stream<Item = ChangeEvent> + Send + use<> {
        let receiver = self.sender.subscribe();

        stream::unfold(receiver, move |mut receiver| async move {
            loop {
                match receiver.recv().await {
                    Ok(event) if event.is_visible_to(entity, &user_id) => return Some((event, receiver)),
                    Ok(_) => continue,
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(%entity, %user_id, skipped, "Feed subscriber lagged");
                        continue;
                    }
                    Err(RecvError::Closed) => return None,
                }
            }
        })
    }
}

/// Client-side view of a user's notifications kept current from the feed.
#[derive(Debug, Default)]
pub struct NotificationInbox {
    items: Vec<Notification>,
}

#[derive(Deserialize)]
struct NotificationRecord {
    id: Uuid,
    user_id: Uuid,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    payload: Value,
    read: bool,
    created_at: DateTime<Utc>,
}

impl From<NotificationRecord> for Notification {
    fn from(record: NotificationRecord) -> Self {
        Notification {
            id: record.id,
            user_id: record.user_id,
            payload: NotificationPayload::from_parts(&record.kind, record.payload),
            read: record.read,
            created_at: record.created_at,
        }
    }
}

impl NotificationInbox {
    pub fn new(initial: Vec<Notification>) -> Self {
        NotificationInbox { items: initial }
    }

    /// Newest first.
    pub fn items(&self) -> &[Notification] {
        &self.items
    }

    pub fn unread_count(&self) -> usize {
        self.items.iter().filter(|n| !n.read).count()
    }

    /// Folds one change into the inbox. Events for other entities and
    /// records that do not parse are ignored.
    pub fn apply(&mut self, event: &ChangeEvent) {
        if event.entity != FeedEntity::Notifications {
            return;
        }

        let Ok(record) = serde_json::from_value::<NotificationRecord>(event.record.clone()) else {
            tracing::debug!("Ignoring unparseable notification record");
            return;
        };
        let notification = Notification::from(record);

        match event.kind {
            ChangeKind::Insert => {
                if !self.items.iter().any(|n| n.id == notification.id) {
                    self.items.insert(0, notification);
                }
            }
            ChangeKind::Update => {
                match self.items.iter_mut().find(|n| n.id == notification.id) {
                    Some(existing) => *existing = notification,
                    None => self.items.insert(0, notification),
                }
            }
            ChangeKind::Delete => self.items.retain(|n| n.id != notification.id),
        }
    }
}
