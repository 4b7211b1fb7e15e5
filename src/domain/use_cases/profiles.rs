use std::sync::Arc;

use uuid::Uuid;
use validator::Validate;

use crate::{
    entities::profile::{ProfileUpsert, ProfileUpsertRequest, ProfileUpsertResponse, UserProfile},
    errors::AppError,
    repositories::profile::ProfileRepository,
};

pub struct ProfileHandler {
    pub profile_repo: Arc<dyn ProfileRepository>,
}

impl ProfileHandler {
    pub fn new(profile_repo: Arc<dyn ProfileRepository>) -> Self {
        ProfileHandler { profile_repo }
    }

    /// Creates the caller's profile on first call, overwrites the touched
    /// fields afterwards.
    pub async fn upsert_profile(&self, user_id: &Uuid, request: ProfileUpsertRequest) -> Result<ProfileUpsertResponse, AppError> {
        request.validate()?;

        if request.id != *user_id {
            return Err(AppError::Forbidden("You can only update your own profile".to_string()));
        }

        let upsert = ProfileUpsert::from(request);
        let profile = self.profile_repo.upsert_profile(&upsert).await?;

        tracing::info!(profile_id = %profile.id, "Profile saved");
        Ok(ProfileUpsertResponse { ok: true, profile })
    }

    pub async fn get_profile(&self, id: &Uuid) -> Result<UserProfile, AppError> {
        self.profile_repo
            .get_profile(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))
    }
}
