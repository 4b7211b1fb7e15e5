use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::entities::option_fields::OptionField;

#[derive(Debug, Clone, Serialize, PartialEq, sqlx::FromRow)]
pub struct UserProfile {
    pub id: Uuid,
    pub full_name: Option<String>,
    pub bio: Option<String>,
    pub swap_points: i32,
    pub skills_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The public slice of a profile attached to match results.
#[derive(Debug, Clone, Serialize, PartialEq, sqlx::FromRow)]
pub struct ProfileSummary {
    pub id: Uuid,
    pub full_name: Option<String>,
    pub bio: Option<String>,
}

impl From<&UserProfile> for ProfileSummary {
    fn from(profile: &UserProfile) -> Self {
        ProfileSummary {
            id: profile.id,
            full_name: profile.full_name.clone(),
            bio: profile.bio.clone(),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct ProfileUpsertRequest {
    pub id: Uuid,

    #[serde(default)]
    #[validate(length(max = 100, message = "Must be at most 100 characters"))]
    pub full_name: OptionField<String>,

    #[serde(default)]
    #[validate(length(max = 1000, message = "Must be at most 1000 characters"))]
    pub bio: OptionField<String>,
}

/// Upsert keyed on `id`; untouched columns keep their stored value.
#[derive(Debug, Clone)]
pub struct ProfileUpsert {
    pub id: Uuid,
    pub full_name: OptionField<String>,
    pub bio: OptionField<String>,
}

impl From<ProfileUpsertRequest> for ProfileUpsert {
    fn from(request: ProfileUpsertRequest) -> Self {
        ProfileUpsert {
            id: request.id,
            full_name: request.full_name.normalized(),
            bio: request.bio.normalized(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProfileUpsertResponse {
    pub ok: bool,
    pub profile: UserProfile,
}
