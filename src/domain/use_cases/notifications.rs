use std::sync::Arc;

use uuid::Uuid;

use crate::{
    entities::notification::{NotificationInsert, NotificationListQuery, NotificationPayload, NotificationView},
    errors::AppError,
    realtime::{ChangeEvent, ChangeFeed, ChangeKind, FeedEntity},
    repositories::notification::NotificationRepository,
};

/// Best-effort producer used by the other use cases. A failed delivery is
/// logged and never surfaces to the action that triggered it.
#[derive(Clone)]
pub struct Notifier {
    notification_repo: Arc<dyn NotificationRepository>,
    feed: ChangeFeed,
}

impl Notifier {
    pub fn new(notification_repo: Arc<dyn NotificationRepository>, feed: ChangeFeed) -> Self {
        Notifier { notification_repo, feed }
    }

    pub async fn notify(&self, user_id: Uuid, payload: NotificationPayload) {
        let kind = payload.kind();
        let insert = NotificationInsert { user_id, payload };

        match self.notification_repo.create_notification(&insert).await {
            Ok(created) => {
                self.feed.publish(ChangeEvent::new(
                    FeedEntity::Notifications,
                    ChangeKind::Insert,
                    vec![user_id],
                    &created,
                ));
            }
            Err(e) => {
                tracing::warn!(%user_id, kind, error = %e, "Failed to deliver notification");
            }
        }
    }
}

pub struct NotificationHandler {
    pub notification_repo: Arc<dyn NotificationRepository>,
    feed: ChangeFeed,
}

impl NotificationHandler {
    pub fn new(notification_repo: Arc<dyn NotificationRepository>, feed: ChangeFeed) -> Self {
        NotificationHandler { notification_repo, feed }
    }

    /// Newest first, each with its rendered text.
    pub async fn list_notifications(&self, user_id: &Uuid, query: &NotificationListQuery) -> Result<Vec<NotificationView>, AppError> {
        let notifications = self.notification_repo
            .list_notifications(user_id, query.unread_only)
            .await?;

        Ok(notifications.into_iter().map(NotificationView::from).collect())
    }

    pub async fn mark_read(&self, user_id: &Uuid, notification_id: &Uuid) -> Result<NotificationView, AppError> {
        let updated = self.notification_repo
            .mark_read(notification_id, user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Notification not found".to_string()))?;

        self.feed.publish(ChangeEvent::new(
            FeedEntity::Notifications,
            ChangeKind::Update,
            vec![*user_id],
            &updated,
        ));

        Ok(updated.into())
    }

    /// Publishes one update per flipped row so subscribed inboxes stay in sync.
    pub async fn mark_all_read(&self, user_id: &Uuid) -> Result<u64, AppError> {
        let updated = self.notification_repo.mark_all_read(user_id).await?;

        for notification in &updated {
            self.feed.publish(ChangeEvent::new(
                FeedEntity::Notifications,
                ChangeKind::Update,
                vec![*user_id],
                notification,
            ));
        }

        tracing::debug!(%user_id, updated = updated.len(), "Marked notifications as read");
        Ok(updated.len() as u64)
    }
}
