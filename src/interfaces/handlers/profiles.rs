use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;
use uuid::Uuid;

use crate::{entities::profile::ProfileUpsertRequest, errors::AppError, use_cases::extractors::AuthClaims, AppState};

#[instrument(skip(auth, state, data), fields(user_id = %auth.user_id))]
pub async fn upsert_profile(
    auth: AuthClaims,
    state: web::Data<AppState>,
    data: web::Json<ProfileUpsertRequest>,
) -> Result<impl Responder, AppError> {
    let profile_handler = &state.services()?.profile_handler;

    let response = profile_handler
        .upsert_profile(&auth.user_id, data.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(response))
}

#[instrument(skip(_auth, state))]
pub async fn get_profile(
    _auth: AuthClaims,
    profile_id: web::Path<Uuid>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let profile_handler = &state.services()?.profile_handler;

    let profile = profile_handler.get_profile(&profile_id).await?;
    Ok(HttpResponse::Ok().json(profile))
}
