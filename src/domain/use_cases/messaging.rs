use std::sync::Arc;

use uuid::Uuid;
use validator::Validate;

use crate::{
    entities::{
        conversation::{Conversation, Message, MessageInsert, SendMessageRequest},
        notification::NotificationPayload,
    },
    errors::AppError,
    realtime::{ChangeEvent, ChangeFeed, ChangeKind, FeedEntity},
    repositories::{connection::ConnectionRepository, conversation::ConversationRepository},
    use_cases::{connections::has_accepted_connection, notifications::Notifier},
};

pub struct MessageHandler {
    pub conversation_repo: Arc<dyn ConversationRepository>,
    pub connection_repo: Arc<dyn ConnectionRepository>,
    notifier: Notifier,
    feed: ChangeFeed,
}

impl MessageHandler {
    pub fn new(
        conversation_repo: Arc<dyn ConversationRepository>,
        connection_repo: Arc<dyn ConnectionRepository>,
        notifier: Notifier,
        feed: ChangeFeed,
    ) -> Self {
        MessageHandler { conversation_repo, connection_repo, notifier, feed }
    }

    /// Stores a message once the sender is a participant and the pair's
    /// connection has been accepted.
    pub async fn send_message(&self, caller_id: &Uuid, request: SendMessageRequest) -> Result<Message, AppError> {
        request.validate()?;

        if request.sender_id != *caller_id {
            return Err(AppError::Forbidden("Cannot send messages on behalf of another user".to_string()));
        }

        let conversation = self.conversation_repo
            .get_conversation(&request.conversation_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Conversation not found".to_string()))?;

        let recipient_id = conversation
            .other_participant(&request.sender_id)
            .ok_or_else(|| AppError::Forbidden("Not a participant of this conversation".to_string()))?;

        // Conversations are only opened on accept, so over HTTP this fails only
        // for pairs whose request was later moved off `accepted` in storage.
        if !has_accepted_connection(self.connection_repo.as_ref(), &request.sender_id, &recipient_id).await? {
            return Err(AppError::Forbidden("Connection not accepted".to_string()));
        }

        let insert = MessageInsert {
            conversation_id: conversation.id,
            sender_id: request.sender_id,
            body: request.body,
        };
        let message = self.conversation_repo.insert_message(&insert).await?;

        self.feed.publish(ChangeEvent::new(
            FeedEntity::Messages,
            ChangeKind::Insert,
            vec![conversation.participant_a, conversation.participant_b],
            &message,
        ));
        self.notifier
            .notify(recipient_id, NotificationPayload::message(conversation.id, message.sender_id, &message.body))
            .await;

        Ok(message)
    }

    pub async fn list_conversations(&self, user_id: &Uuid) -> Result<Vec<Conversation>, AppError> {
        self.conversation_repo.list_conversations_for_user(user_id).await
    }

    /// Oldest first. Participants only.
    pub async fn list_messages(&self, user_id: &Uuid, conversation_id: &Uuid) -> Result<Vec<Message>, AppError> {
        let conversation = self.conversation_repo
            .get_conversation(conversation_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Conversation not found".to_string()))?;

        if !conversation.has_participant(user_id) {
            return Err(AppError::Forbidden("Not a participant of this conversation".to_string()));
        }

        self.conversation_repo.list_messages(conversation_id).await
    }
}
