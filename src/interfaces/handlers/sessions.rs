use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;
use uuid::Uuid;

use crate::{
    entities::session::{CreateSessionRequest, RescheduleSessionRequest, UpdateSessionStatusRequest},
    errors::AppError,
    use_cases::extractors::AuthClaims,
    AppState,
};

#[instrument(skip(auth, state), fields(user_id = %auth.user_id))]
pub async fn list_sessions(
    auth: AuthClaims,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let session_handler = &state.services()?.session_handler;

    let sessions = session_handler.list_sessions(&auth.user_id).await?;
    Ok(HttpResponse::Ok().json(sessions))
}

#[instrument(skip(auth, state, data), fields(user_id = %auth.user_id))]
pub async fn create_session(
    auth: AuthClaims,
    state: web::Data<AppState>,
    data: web::Json<CreateSessionRequest>,
) -> Result<impl Responder, AppError> {
    let session_handler = &state.services()?.session_handler;

    let session = session_handler.create_session(&auth.user_id, data.into_inner()).await?;
    Ok(HttpResponse::Created().json(session))
}

#[instrument(skip(auth, state, data), fields(user_id = %auth.user_id))]
pub async fn reschedule_session(
    auth: AuthClaims,
    session_id: web::Path<Uuid>,
    state: web::Data<AppState>,
    data: web::Json<RescheduleSessionRequest>,
) -> Result<impl Responder, AppError> {
    let session_handler = &state.services()?.session_handler;

    let session = session_handler
        .reschedule(&auth.user_id, &session_id, data.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(session))
}

#[instrument(skip(auth, state, data), fields(user_id = %auth.user_id))]
pub async fn update_session_status(
    auth: AuthClaims,
    session_id: web::Path<Uuid>,
    state: web::Data<AppState>,
    data: web::Json<UpdateSessionStatusRequest>,
) -> Result<impl Responder, AppError> {
    let session_handler = &state.services()?.session_handler;

    let session = session_handler
        .update_status(&auth.user_id, &session_id, data.into_inner())
        .await?;

    Ok(HttpResponse::Ok().json(session))
}
