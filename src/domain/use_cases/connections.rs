use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use crate::{
    entities::{
        connection::{AcceptedConnection, ConnectionRequest, ConnectionStatus, NewConnectionRequest},
        conversation::Conversation,
        notification::NotificationPayload,
    },
    errors::AppError,
    realtime::{ChangeEvent, ChangeFeed, ChangeKind, FeedEntity},
    repositories::{connection::ConnectionRepository, profile::ProfileRepository},
    use_cases::notifications::Notifier,
};

/// Feed record for an accepted request: the request's own fields plus the
/// conversation opened with it.
#[derive(Serialize)]
struct AcceptedRecord<'a> {
    #[serde(flatten)]
    request: &'a ConnectionRequest,
    conversation: &'a Conversation,
}

/// True when an accepted request links `a` and `b`, in either direction.
pub async fn has_accepted_connection(
    connection_repo: &dyn ConnectionRepository,
    a: &Uuid,
    b: &Uuid,
) -> Result<bool, AppError> {
    let live = connection_repo.find_live_request(a, b).await?;
    Ok(live.is_some_and(|r| r.status == ConnectionStatus::Accepted))
}

pub struct ConnectionHandler {
    pub connection_repo: Arc<dyn ConnectionRepository>,
    pub profile_repo: Arc<dyn ProfileRepository>,
    notifier: Notifier,
    feed: ChangeFeed,
}

impl ConnectionHandler {
    pub fn new(
        connection_repo: Arc<dyn ConnectionRepository>,
        profile_repo: Arc<dyn ProfileRepository>,
        notifier: Notifier,
        feed: ChangeFeed,
    ) -> Self {
        ConnectionHandler { connection_repo, profile_repo, notifier, feed }
    }

    pub async fn request_connection(&self, requester_id: &Uuid, request: NewConnectionRequest) -> Result<ConnectionRequest, AppError> {
        let recipient_id = request.recipient_id;

        if recipient_id == *requester_id {
            return Err(AppError::Forbidden("Cannot send a connection request to yourself".to_string()));
        }

        if self.connection_repo.find_live_request(requester_id, &recipient_id).await?.is_some() {
            return Err(AppError::Conflict("A connection request already exists between these users".to_string()));
        }

        let created = self.connection_repo.create_request(requester_id, &recipient_id).await?;
        self.publish(ChangeKind::Insert, &created, &created);

        let requester_name = match self.profile_repo.get_profile(requester_id).await {
            Ok(profile) => profile.and_then(|p| p.full_name),
            Err(e) => {
                tracing::warn!(%requester_id, error = %e, "Failed to load requester profile");
                None
            }
        };
        let payload = NotificationPayload::ConnectionRequest {
            request_id: created.id,
            requester_id: *requester_id,
            requester_name,
        };
        self.notifier.notify(recipient_id, payload).await;

        tracing::info!(request_id = %created.id, "Connection requested");
        Ok(created)
    }

    /// Accepts and opens the pair's conversation in one step.
    pub async fn accept(&self, user_id: &Uuid, request_id: &Uuid) -> Result<AcceptedConnection, AppError> {
        self.load_pending_for_recipient(user_id, request_id).await?;

        let accepted = self.connection_repo
            .accept_request(request_id)
            .await?
            .ok_or_else(|| AppError::Conflict("Connection request is no longer pending".to_string()))?;

        let record = AcceptedRecord { request: &accepted.request, conversation: &accepted.conversation };
        self.publish(ChangeKind::Update, &accepted.request, &record);
        tracing::info!(
            request_id = %accepted.request.id,
            conversation_id = %accepted.conversation.id,
            "Connection accepted"
        );
        Ok(accepted)
    }

    pub async fn reject(&self, user_id: &Uuid, request_id: &Uuid) -> Result<ConnectionRequest, AppError> {
        self.load_pending_for_recipient(user_id, request_id).await?;

        let rejected = self.connection_repo
            .reject_request(request_id)
            .await?
            .ok_or_else(|| AppError::Conflict("Connection request is no longer pending".to_string()))?;

        self.publish(ChangeKind::Update, &rejected, &rejected);
        Ok(rejected)
    }

    /// Sent and received, newest first.
    pub async fn list_connections(&self, user_id: &Uuid) -> Result<Vec<ConnectionRequest>, AppError> {
        self.connection_repo.list_requests_for_user(user_id).await
    }

    async fn load_pending_for_recipient(&self, user_id: &Uuid, request_id: &Uuid) -> Result<ConnectionRequest, AppError> {
        let request = self.connection_repo
            .get_request(request_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Connection request not found".to_string()))?;

        if request.recipient_id != *user_id {
            return Err(AppError::Forbidden("Only the recipient can respond to this request".to_string()));
        }

        if request.status != ConnectionStatus::Pending {
            return Err(AppError::Conflict("Connection request is no longer pending".to_string()));
        }

        Ok(request)
    }

    fn publish<T: Serialize>(&self, kind: ChangeKind, request: &ConnectionRequest, record: &T) {
        self.feed.publish(ChangeEvent::new(
            FeedEntity::Connections,
            kind,
            vec![request.requester_id, request.recipient_id],
            record,
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::{
        connection::MockConnectionRepository,
        notification::MockNotificationRepository,
        profile::MockProfileRepository,
    };
    use chrono::Utc;
    use futures_util::StreamExt;

    fn pending(requester_id: Uuid, recipient_id: Uuid) -> ConnectionRequest {
        ConnectionRequest {
            id: Uuid::new_v4(),
            requester_id,
            recipient_id,
            status: ConnectionStatus::Pending,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn handler(connections: MockConnectionRepository) -> ConnectionHandler {
        let feed = ChangeFeed::new(8);
        let notifier = Notifier::new(Arc::new(MockNotificationRepository::new()), feed.clone());
        ConnectionHandler::new(Arc::new(connections), Arc::new(MockProfileRepository::new()), notifier, feed)
    }

    #[tokio::test]
    async fn requesting_yourself_is_forbidden() {
        let me = Uuid::new_v4();
        let err = handler(MockConnectionRepository::new())
            .request_connection(&me, NewConnectionRequest { recipient_id: me })
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[tokio::test]
    async fn live_pair_conflicts_in_either_direction() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let mut connections = MockConnectionRepository::new();
        connections
            .expect_find_live_request()
            .returning(move |_, _| Ok(Some(pending(b, a))));
        connections.expect_create_request().never();

        let err = handler(connections)
            .request_connection(&a, NewConnectionRequest { recipient_id: b })
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn only_the_recipient_may_accept() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let request = pending(a, b);
        let mut connections = MockConnectionRepository::new();
        connections.expect_get_request().returning(move |_| Ok(Some(request.clone())));
        connections.expect_accept_request().never();

        let err = handler(connections).accept(&a, &Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[tokio::test]
    async fn accepting_a_settled_request_conflicts() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let mut request = pending(a, b);
        request.status = ConnectionStatus::Accepted;
        let mut connections = MockConnectionRepository::new();
        connections.expect_get_request().returning(move |_| Ok(Some(request.clone())));
        connections.expect_accept_request().never();

        let err = handler(connections).accept(&b, &Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn losing_the_accept_race_conflicts() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let request = pending(a, b);
        let mut connections = MockConnectionRepository::new();
        connections.expect_get_request().returning(move |_| Ok(Some(request.clone())));
        connections.expect_accept_request().returning(|_| Ok(None));

        let err = handler(connections).accept(&b, &Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn accept_event_carries_the_new_conversation() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let request = pending(a, b);
        let request_id = request.id;
        let conversation = Conversation {
            id: Uuid::new_v4(),
            participant_a: a,
            participant_b: b,
            created_at: Utc::now(),
        };
        let conversation_id = conversation.id;

        let mut connections = MockConnectionRepository::new();
        let stored = request.clone();
        connections.expect_get_request().returning(move |_| Ok(Some(stored.clone())));
        connections.expect_accept_request().returning(move |_| {
            let mut accepted = request.clone();
            accepted.status = ConnectionStatus::Accepted;
            Ok(Some(AcceptedConnection { request: accepted, conversation: conversation.clone() }))
        });

        let feed = ChangeFeed::new(8);
        let mut events = Box::pin(feed.subscribe(FeedEntity::Connections, a));
        let notifier = Notifier::new(Arc::new(MockNotificationRepository::new()), feed.clone());
        let handler = ConnectionHandler::new(Arc::new(connections), Arc::new(MockProfileRepository::new()), notifier, feed);

        handler.accept(&b, &request_id).await.unwrap();

        let event = events.next().await.unwrap();
        assert_eq!(event.kind, ChangeKind::Update);
        assert_eq!(event.record["id"], request_id.to_string());
        assert_eq!(event.record["status"], "accepted");
        assert_eq!(event.record["conversation"]["id"], conversation_id.to_string());
    }
}
