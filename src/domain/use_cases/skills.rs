use std::{collections::BTreeSet, sync::Arc};

use uuid::Uuid;
use validator::Validate;

use crate::{
    entities::{
        notification::NotificationPayload,
        skill::{NewSkillRequest, Skill},
    },
    errors::AppError,
    realtime::{ChangeEvent, ChangeFeed, ChangeKind, FeedEntity},
    repositories::{profile::ProfileRepository, skill::SkillRepository},
    use_cases::notifications::Notifier,
};

pub struct SkillHandler {
    pub skill_repo: Arc<dyn SkillRepository>,
    pub profile_repo: Arc<dyn ProfileRepository>,
    notifier: Notifier,
    feed: ChangeFeed,
}

impl SkillHandler {
    pub fn new(
        skill_repo: Arc<dyn SkillRepository>,
        profile_repo: Arc<dyn ProfileRepository>,
        notifier: Notifier,
        feed: ChangeFeed,
    ) -> Self {
        SkillHandler { skill_repo, profile_repo, notifier, feed }
    }

    pub async fn create_skill(&self, user_id: &Uuid, request: NewSkillRequest) -> Result<Skill, AppError> {
        request.validate()?;

        let insert = request.prepare_for_insert(*user_id);
        if insert.name.is_empty() {
            return Err(AppError::invalid_field("name", "Must be between 1 and 100 characters"));
        }

        let skill = self.skill_repo.create_skill(&insert).await?;
        self.refresh_count(user_id).await;

        self.feed.publish(ChangeEvent::new(FeedEntity::Skills, ChangeKind::Insert, vec![*user_id], &skill));
        self.notify_counterparts(&skill).await;

        tracing::info!(skill_id = %skill.id, name = %skill.name, "Skill created");
        Ok(skill)
    }

    pub async fn list_skills(&self, user_id: &Uuid) -> Result<Vec<Skill>, AppError> {
        self.skill_repo.list_skills_for_user(user_id).await
    }

    pub async fn delete_skill(&self, user_id: &Uuid, skill_id: &Uuid) -> Result<(), AppError> {
        let skill = self.skill_repo
            .get_skill(skill_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Skill not found".to_string()))?;

        if skill.user_id != *user_id {
            return Err(AppError::Forbidden("You can only delete your own skills".to_string()));
        }

        self.skill_repo.delete_skill(skill_id).await.map_err(|e| match e {
            AppError::Conflict(_) => AppError::Conflict("Skill is used by a scheduled session".to_string()),
            _ => e,
        })?;
        self.refresh_count(user_id).await;

        self.feed.publish(ChangeEvent::new(FeedEntity::Skills, ChangeKind::Delete, vec![*user_id], &skill));
        Ok(())
    }

    /// `skills_count` is derived; a failed refresh is logged and repaired by the next one.
    async fn refresh_count(&self, user_id: &Uuid) {
        if let Err(e) = self.profile_repo.refresh_skills_count(user_id).await {
            tracing::warn!(%user_id, error = %e, "Failed to refresh skills count");
        }
    }

    /// Tells every other owner of a same-name skill of the opposite direction.
    async fn notify_counterparts(&self, skill: &Skill) {
        let counterparts = match self.skill_repo
            .list_skills_by_type(skill.skill_type.counterpart(), Some(skill.name.clone()))
            .await
        {
            Ok(skills) => skills,
            Err(e) => {
                tracing::warn!(skill_id = %skill.id, error = %e, "Failed to look up counterpart skills");
                return;
            }
        };

        let owners: BTreeSet<Uuid> = counterparts
            .into_iter()
            .map(|s| s.user_id)
            .filter(|owner| *owner != skill.user_id)
            .collect();

        for owner in owners {
            let payload = NotificationPayload::SkillMatch {
                skill_name: skill.name.clone(),
                matched_user_id: skill.user_id,
                skill_type: skill.skill_type,
            };
            self.notifier.notify(owner, payload).await;
        }
    }
}
