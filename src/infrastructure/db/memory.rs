//! Process-local storage backend.
//!
//! Mirrors the PostgreSQL schema's constraints (unordered-pair uniqueness of
//! live connection requests and conversations, conditional status updates)
//! so the use cases behave the same against either backend. Used for
//! development without a database and by the test suite.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use uuid::Uuid;

use crate::{
    entities::{
        connection::{AcceptedConnection, ConnectionRequest, ConnectionStatus},
        conversation::{Conversation, Message, MessageInsert},
        notification::{Notification, NotificationInsert},
        profile::{ProfileSummary, ProfileUpsert, UserProfile},
        session::{SessionInsert, SessionReschedule, SessionStatus, SkillSwapSession},
        skill::{Skill, SkillInsert, SkillType},
    },
    errors::AppError,
    repositories::{
        connection::ConnectionRepository,
        conversation::ConversationRepository,
        notification::NotificationRepository,
        profile::ProfileRepository,
        session::SessionRepository,
        skill::SkillRepository,
    },
};

#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

#[derive(Default)]
struct Tables {
    profiles: HashMap<Uuid, UserProfile>,
    skills: Vec<Skill>,
    connection_requests: Vec<ConnectionRequest>,
    conversations: Vec<Conversation>,
    messages: Vec<Message>,
    sessions: Vec<SkillSwapSession>,
    notifications: Vec<Notification>,
}

impl Tables {
    fn skills_count(&self, user_id: &Uuid) -> i32 {
        self.skills.iter().filter(|s| s.user_id == *user_id).count() as i32
    }

    fn conversation_between(&self, a: &Uuid, b: &Uuid) -> Option<&Conversation> {
        self.conversations.iter().find(|c| {
            (c.participant_a == *a && c.participant_b == *b)
                || (c.participant_a == *b && c.participant_b == *a)
        })
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProfileRepository for InMemoryStore {
    async fn check_connection(&self) -> Result<(), AppError> {
        Ok(())
    }

    async fn upsert_profile(&self, profile: &ProfileUpsert) -> Result<UserProfile, AppError> {
        let mut tables = self.tables.write();
        let now = Utc::now();
        let skills_count = tables.skills_count(&profile.id);

        let saved = match tables.profiles.get_mut(&profile.id) {
            Some(existing) => {
                existing.full_name = profile.full_name.clone().apply(existing.full_name.take());
                existing.bio = profile.bio.clone().apply(existing.bio.take());
                existing.updated_at = now;
                existing.clone()
            }
            None => {
                let created = UserProfile {
                    id: profile.id,
                    full_name: profile.full_name.clone().apply(None),
                    bio: profile.bio.clone().apply(None),
                    swap_points: 0,
                    skills_count,
                    created_at: now,
                    updated_at: now,
                };
                tables.profiles.insert(created.id, created.clone());
                created
            }
        };

        Ok(saved)
    }

    async fn get_profile(&self, id: &Uuid) -> Result<Option<UserProfile>, AppError> {
        Ok(self.tables.read().profiles.get(id).cloned())
    }

    async fn get_profile_summaries(&self, ids: &[Uuid]) -> Result<Vec<ProfileSummary>, AppError> {
        let tables = self.tables.read();

        Ok(ids
            .iter()
            .filter_map(|id| tables.profiles.get(id))
            .map(ProfileSummary::from)
            .collect())
    }

    async fn refresh_skills_count(&self, user_id: &Uuid) -> Result<(), AppError> {
        let mut tables = self.tables.write();
        let count = tables.skills_count(user_id);

        if let Some(profile) = tables.profiles.get_mut(user_id) {
            profile.skills_count = count;
            profile.updated_at = Utc::now();
        }

        Ok(())
    }
}

#[async_trait]
impl SkillRepository for InMemoryStore {
    async fn create_skill(&self, skill: &SkillInsert) -> Result<Skill, AppError> {
        let created = Skill {
            id: Uuid::new_v4(),
            user_id: skill.user_id,
            name: skill.name.clone(),
            description: skill.description.clone(),
            category: skill.category.clone(),
            skill_type: skill.skill_type,
            proficiency_level: skill.proficiency_level,
            created_at: Utc::now(),
        };

        self.tables.write().skills.push(created.clone());
        Ok(created)
    }

    async fn get_skill(&self, id: &Uuid) -> Result<Option<Skill>, AppError> {
        Ok(self.tables.read().skills.iter().find(|s| s.id == *id).cloned())
    }

    async fn list_skills_for_user(&self, user_id: &Uuid) -> Result<Vec<Skill>, AppError> {
        Ok(self.tables.read().skills
            .iter()
            .rev()
            .filter(|s| s.user_id == *user_id)
            .cloned()
            .collect())
    }

    async fn list_skills_by_type(&self, skill_type: SkillType, name: Option<String>) -> Result<Vec<Skill>, AppError> {
        Ok(self.tables.read().skills
            .iter()
            .filter(|s| s.skill_type == skill_type)
            .filter(|s| name.as_deref().is_none_or(|n| s.name == n))
            .cloned()
            .collect())
    }

    async fn delete_skill(&self, id: &Uuid) -> Result<(), AppError> {
        let mut tables = self.tables.write();

        let referenced = tables.sessions
            .iter()
            .any(|s| s.skill_a_id == *id || s.skill_b_id == *id);
        if referenced {
            return Err(AppError::Conflict("Referenced record does not exist".into()));
        }

        let before = tables.skills.len();
        tables.skills.retain(|s| s.id != *id);

        if tables.skills.len() == before {
            return Err(AppError::NotFound("Skill not found".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl ConnectionRepository for InMemoryStore {
    async fn create_request(&self, requester_id: &Uuid, recipient_id: &Uuid) -> Result<ConnectionRequest, AppError> {
        let mut tables = self.tables.write();

        let occupied = tables.connection_requests
            .iter()
            .any(|r| r.status.is_live() && r.links(requester_id, recipient_id));
        if occupied {
            return Err(AppError::Conflict("A connection request already exists between these users".into()));
        }

        let now = Utc::now();
        let request = ConnectionRequest {
            id: Uuid::new_v4(),
            requester_id: *requester_id,
            recipient_id: *recipient_id,
            status: ConnectionStatus::Pending,
            created_at: now,
            updated_at: now,
        };

        tables.connection_requests.push(request.clone());
        Ok(request)
    }

    async fn get_request(&self, id: &Uuid) -> Result<Option<ConnectionRequest>, AppError> {
        Ok(self.tables.read().connection_requests.iter().find(|r| r.id == *id).cloned())
    }

    async fn list_requests_for_user(&self, user_id: &Uuid) -> Result<Vec<ConnectionRequest>, AppError> {
        Ok(self.tables.read().connection_requests
            .iter()
            .rev()
            .filter(|r| r.involves(user_id))
            .cloned()
            .collect())
    }

    async fn find_live_request(&self, a: &Uuid, b: &Uuid) -> Result<Option<ConnectionRequest>, AppError> {
        Ok(self.tables.read().connection_requests
            .iter()
            .rev()
            .find(|r| r.status.is_live() && r.links(a, b))
            .cloned())
    }

    async fn accept_request(&self, id: &Uuid) -> Result<Option<AcceptedConnection>, AppError> {
        let mut tables = self.tables.write();

        let Some(request) = tables.connection_requests
            .iter_mut()
            .find(|r| r.id == *id && r.status == ConnectionStatus::Pending)
        else {
            return Ok(None);
        };

        request.status = ConnectionStatus::Accepted;
        request.updated_at = Utc::now();
        let request = request.clone();

        let conversation = match tables.conversation_between(&request.requester_id, &request.recipient_id) {
            Some(existing) => existing.clone(),
            None => {
                let created = Conversation {
                    id: Uuid::new_v4(),
                    participant_a: request.requester_id,
                    participant_b: request.recipient_id,
                    created_at: Utc::now(),
                };
                tables.conversations.push(created.clone());
                created
            }
        };

        Ok(Some(AcceptedConnection { request, conversation }))
    }

    async fn reject_request(&self, id: &Uuid) -> Result<Option<ConnectionRequest>, AppError> {
        let mut tables = self.tables.write();

        Ok(tables.connection_requests
            .iter_mut()
            .find(|r| r.id == *id && r.status == ConnectionStatus::Pending)
            .map(|request| {
                request.status = ConnectionStatus::Rejected;
                request.updated_at = Utc::now();
                request.clone()
            }))
    }
}

#[async_trait]
impl ConversationRepository for InMemoryStore {
    async fn get_conversation(&self, id: &Uuid) -> Result<Option<Conversation>, AppError> {
        Ok(self.tables.read().conversations.iter().find(|c| c.id == *id).cloned())
    }

    async fn list_conversations_for_user(&self, user_id: &Uuid) -> Result<Vec<Conversation>, AppError> {
        Ok(self.tables.read().conversations
            .iter()
            .rev()
            .filter(|c| c.has_participant(user_id))
            .cloned()
            .collect())
    }

    async fn insert_message(&self, message: &MessageInsert) -> Result<Message, AppError> {
        let mut tables = self.tables.write();

        if !tables.conversations.iter().any(|c| c.id == message.conversation_id) {
            return Err(AppError::Conflict("Referenced record does not exist".into()));
        }

        let inserted = Message {
            id: Uuid::new_v4(),
            conversation_id: message.conversation_id,
            sender_id: message.sender_id,
            body: message.body.clone(),
            created_at: Utc::now(),
        };

        tables.messages.push(inserted.clone());
        Ok(inserted)
    }

    async fn list_messages(&self, conversation_id: &Uuid) -> Result<Vec<Message>, AppError> {
        Ok(self.tables.read().messages
            .iter()
            .filter(|m| m.conversation_id == *conversation_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl SessionRepository for InMemoryStore {
    async fn create_session(&self, session: &SessionInsert) -> Result<SkillSwapSession, AppError> {
        let now = Utc::now();
        let created = SkillSwapSession {
            id: Uuid::new_v4(),
            user_a_id: session.user_a_id,
            user_b_id: session.user_b_id,
            skill_a_id: session.skill_a_id,
            skill_b_id: session.skill_b_id,
            status: SessionStatus::Scheduled,
            scheduled_at: session.scheduled_at,
            duration_minutes: session.duration_minutes,
            notes: session.notes.clone(),
            created_at: now,
            updated_at: now,
        };

        self.tables.write().sessions.push(created.clone());
        Ok(created)
    }

    async fn get_session(&self, id: &Uuid) -> Result<Option<SkillSwapSession>, AppError> {
        Ok(self.tables.read().sessions.iter().find(|s| s.id == *id).cloned())
    }

    async fn list_sessions_for_user(&self, user_id: &Uuid) -> Result<Vec<SkillSwapSession>, AppError> {
        let mut sessions: Vec<_> = self.tables.read().sessions
            .iter()
            .filter(|s| s.has_participant(user_id))
            .cloned()
            .collect();

        sessions.sort_by_key(|s| s.scheduled_at);
        Ok(sessions)
    }

    async fn update_status(&self, id: &Uuid, from: SessionStatus, to: SessionStatus) -> Result<Option<SkillSwapSession>, AppError> {
        let mut tables = self.tables.write();

        Ok(tables.sessions
            .iter_mut()
            .find(|s| s.id == *id && s.status == from)
            .map(|session| {
                session.status = to;
                session.updated_at = Utc::now();
                session.clone()
            }))
    }

    async fn reschedule(&self, id: &Uuid, changes: &SessionReschedule) -> Result<Option<SkillSwapSession>, AppError> {
        let mut tables = self.tables.write();

        Ok(tables.sessions
            .iter_mut()
            .find(|s| s.id == *id && s.status == SessionStatus::Scheduled)
            .map(|session| {
                session.scheduled_at = changes.scheduled_at;
                session.skill_a_id = changes.skill_a_id;
                session.skill_b_id = changes.skill_b_id;
                session.duration_minutes = changes.duration_minutes;
                session.notes = changes.notes.clone();
                session.updated_at = Utc::now();
                session.clone()
            }))
    }
}

#[async_trait]
impl NotificationRepository for InMemoryStore {
    async fn create_notification(&self, notification: &NotificationInsert) -> Result<Notification, AppError> {
        let created = Notification {
            id: Uuid::new_v4(),
            user_id: notification.user_id,
            payload: notification.payload.clone(),
            read: false,
            created_at: Utc::now(),
        };

        self.tables.write().notifications.push(created.clone());
        Ok(created)
    }

    async fn list_notifications(&self, user_id: &Uuid, unread_only: bool) -> Result<Vec<Notification>, AppError> {
        Ok(self.tables.read().notifications
            .iter()
            .rev()
            .filter(|n| n.user_id == *user_id && (!unread_only || !n.read))
            .cloned()
            .collect())
    }

    async fn mark_read(&self, id: &Uuid, user_id: &Uuid) -> Result<Option<Notification>, AppError> {
        let mut tables = self.tables.write();

        Ok(tables.notifications
            .iter_mut()
            .find(|n| n.id == *id && n.user_id == *user_id)
            .map(|notification| {
                notification.read = true;
                notification.clone()
            }))
    }

    async fn mark_all_read(&self, user_id: &Uuid) -> Result<Vec<Notification>, AppError> {
        let mut tables = self.tables.write();

        Ok(tables.notifications
            .iter_mut()
            .filter(|n| n.user_id == *user_id && !n.read)
            .map(|notification| {
                notification.read = true;
                notification.clone()
            })
            .collect())
    }
}
