use std::sync::Arc;

use uuid::Uuid;
use validator::Validate;

use crate::{
    entities::session::{
        parse_scheduled_at, CreateSessionRequest, RescheduleSessionRequest, SessionInsert,
        SessionReschedule, SessionStatus, SkillSwapSession, UpdateSessionStatusRequest,
    },
    errors::AppError,
    realtime::{ChangeEvent, ChangeFeed, ChangeKind, FeedEntity},
    repositories::{connection::ConnectionRepository, session::SessionRepository, skill::SkillRepository},
    use_cases::connections::has_accepted_connection,
};

pub struct SessionHandler {
    pub session_repo: Arc<dyn SessionRepository>,
    pub skill_repo: Arc<dyn SkillRepository>,
    pub connection_repo: Arc<dyn ConnectionRepository>,
    feed: ChangeFeed,
}

impl SessionHandler {
    pub fn new(
        session_repo: Arc<dyn SessionRepository>,
        skill_repo: Arc<dyn SkillRepository>,
        connection_repo: Arc<dyn ConnectionRepository>,
        feed: ChangeFeed,
    ) -> Self {
        SessionHandler { session_repo, skill_repo, connection_repo, feed }
    }

    /// The caller becomes `user_a` and must own `skill_a`; the partner owns `skill_b`.
    pub async fn create_session(&self, user_id: &Uuid, request: CreateSessionRequest) -> Result<SkillSwapSession, AppError> {
        request.validate()?;

        let partner_id = request.partner_id
            .ok_or_else(|| AppError::invalid_field("partner_id", "Partner is required"))?;
        let skill_a_id = request.skill_a_id
            .ok_or_else(|| AppError::invalid_field("skill_a_id", "Select the skill you offer"))?;
        let skill_b_id = request.skill_b_id
            .ok_or_else(|| AppError::invalid_field("skill_b_id", "Select the skill you want to learn"))?;
        let scheduled_at = request.scheduled_at
            .as_deref()
            .ok_or_else(|| AppError::invalid_field("scheduled_at", "Date/time is required"))
            .and_then(parse_scheduled_at)?;

        if partner_id == *user_id {
            return Err(AppError::Forbidden("Cannot schedule a session with yourself".to_string()));
        }

        if !has_accepted_connection(self.connection_repo.as_ref(), user_id, &partner_id).await? {
            return Err(AppError::Forbidden("Connection not accepted".to_string()));
        }

        self.ensure_owned_skill(&skill_a_id, user_id, "skill_a_id").await?;
        self.ensure_owned_skill(&skill_b_id, &partner_id, "skill_b_id").await?;

        let insert = SessionInsert {
            user_a_id: *user_id,
            user_b_id: partner_id,
            skill_a_id,
            skill_b_id,
            scheduled_at,
            duration_minutes: request.duration_minutes,
            notes: request.notes.map(|n| n.trim().to_string()).filter(|n| !n.is_empty()),
        };

        let session = self.session_repo.create_session(&insert).await?;
        self.publish(ChangeKind::Insert, &session);

        tracing::info!(session_id = %session.id, scheduled_at = %session.scheduled_at, "Session scheduled");
        Ok(session)
    }

    pub async fn update_status(&self, user_id: &Uuid, session_id: &Uuid, request: UpdateSessionStatusRequest) -> Result<SkillSwapSession, AppError> {
        let session = self.load_for_participant(user_id, session_id).await?;
        let next = request.status;

        if !session.status.can_transition_to(next) {
            return Err(AppError::Conflict(format!(
                "Cannot change session status from {} to {}",
                session.status.as_str(),
                next.as_str()
            )));
        }

        let updated = self.session_repo
            .update_status(session_id, session.status, next)
            .await?
            .ok_or_else(|| AppError::Conflict("Session status changed concurrently".to_string()))?;

        self.publish(ChangeKind::Update, &updated);
        Ok(updated)
    }

    /// Only while scheduled. Participants stay fixed; replacement skills are
    /// checked against the existing owners.
    pub async fn reschedule(&self, user_id: &Uuid, session_id: &Uuid, request: RescheduleSessionRequest) -> Result<SkillSwapSession, AppError> {
        request.validate()?;
        let session = self.load_for_participant(user_id, session_id).await?;

        if session.status != SessionStatus::Scheduled {
            return Err(AppError::Conflict("Only scheduled sessions can be rescheduled".to_string()));
        }

        let scheduled_at = match request.scheduled_at.as_deref() {
            Some(raw) => parse_scheduled_at(raw)?,
            None => session.scheduled_at,
        };

        let skill_a_id = request.skill_a_id.unwrap_or(session.skill_a_id);
        if skill_a_id != session.skill_a_id {
            self.ensure_owned_skill(&skill_a_id, &session.user_a_id, "skill_a_id").await?;
        }

        let skill_b_id = request.skill_b_id.unwrap_or(session.skill_b_id);
        if skill_b_id != session.skill_b_id {
            self.ensure_owned_skill(&skill_b_id, &session.user_b_id, "skill_b_id").await?;
        }

        let changes = SessionReschedule {
            scheduled_at,
            skill_a_id,
            skill_b_id,
            duration_minutes: request.duration_minutes.unwrap_or(session.duration_minutes),
            notes: request.notes.normalized().apply(session.notes),
        };

        let updated = self.session_repo
            .reschedule(session_id, &changes)
            .await?
            .ok_or_else(|| AppError::Conflict("Only scheduled sessions can be rescheduled".to_string()))?;

        self.publish(ChangeKind::Update, &updated);
        Ok(updated)
    }

    /// Ordered by `scheduled_at`.
    pub async fn list_sessions(&self, user_id: &Uuid) -> Result<Vec<SkillSwapSession>, AppError> {
        self.session_repo.list_sessions_for_user(user_id).await
    }

    async fn load_for_participant(&self, user_id: &Uuid, session_id: &Uuid) -> Result<SkillSwapSession, AppError> {
        let session = self.session_repo
            .get_session(session_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Session not found".to_string()))?;

        if !session.has_participant(user_id) {
            return Err(AppError::Forbidden("Not a participant of this session".to_string()));
        }

        Ok(session)
    }

    async fn ensure_owned_skill(&self, skill_id: &Uuid, owner: &Uuid, field: &str) -> Result<(), AppError> {
        let skill = self.skill_repo
            .get_skill(skill_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Skill not found".to_string()))?;

        if skill.user_id != *owner {
            return Err(AppError::invalid_field(field, "Skill does not belong to this participant"));
        }

        Ok(())
    }

    fn publish(&self, kind: ChangeKind, session: &SkillSwapSession) {
        self.feed.publish(ChangeEvent::new(
            FeedEntity::Sessions,
            kind,
            vec![session.user_a_id, session.user_b_id],
            session,
        ));
    }
}
