use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "skill_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SkillType {
    Teach,
    Learn,
}

impl SkillType {
    /// The direction a matching skill must have.
    pub fn counterpart(self) -> Self {
        match self {
            SkillType::Teach => SkillType::Learn,
            SkillType::Learn => SkillType::Teach,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "proficiency_level", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ProficiencyLevel {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

#[derive(Debug, Clone, Serialize, PartialEq, sqlx::FromRow)]
pub struct Skill {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub skill_type: SkillType,
    pub proficiency_level: ProficiencyLevel,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct NewSkillRequest {
    #[validate(length(min = 1, max = 100, message = "Must be between 1 and 100 characters"))]
    pub name: String,

    #[validate(length(max = 1000, message = "Must be at most 1000 characters"))]
    pub description: Option<String>,

    #[validate(length(max = 50, message = "Must be at most 50 characters"))]
    pub category: Option<String>,

    pub skill_type: SkillType,

    #[serde(default)]
    pub proficiency_level: ProficiencyLevel,
}

#[derive(Debug, Clone)]
pub struct SkillInsert {
    pub user_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub skill_type: SkillType,
    pub proficiency_level: ProficiencyLevel,
}

impl NewSkillRequest {
    pub fn prepare_for_insert(self, user_id: Uuid) -> SkillInsert {
        SkillInsert {
            user_id,
            name: self.name.trim().to_string(),
            description: trimmed(self.description),
            category: trimmed(self.category),
            skill_type: self.skill_type,
            proficiency_level: self.proficiency_level,
        }
    }
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[derive(Debug, Deserialize)]
pub struct SkillListQuery {
    pub user_id: Option<Uuid>,
}
