use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::profile::ProfileSummary;

/// One learner/teacher pairing on an identical skill name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SkillMatch {
    pub skill_name: String,
    pub learner_id: Uuid,
    pub teacher_id: Uuid,
    pub learn_skill_id: Uuid,
    pub teach_skill_id: Uuid,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchedSwap {
    #[serde(flatten)]
    pub pairing: SkillMatch,
    pub teacher_profile: Option<ProfileSummary>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MatchQuery {
    /// Restrict to one exact skill name.
    pub skill: Option<String>,
    pub learner_id: Option<Uuid>,
}
