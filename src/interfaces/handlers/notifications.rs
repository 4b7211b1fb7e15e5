use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;
use uuid::Uuid;

use crate::{entities::notification::NotificationListQuery, errors::AppError, use_cases::extractors::AuthClaims, AppState};

#[instrument(skip(auth, state, query), fields(user_id = %auth.user_id))]
pub async fn list_notifications(
    auth: AuthClaims,
    state: web::Data<AppState>,
    query: web::Query<NotificationListQuery>,
) -> Result<impl Responder, AppError> {
    let notification_handler = &state.services()?.notification_handler;

    let notifications = notification_handler.list_notifications(&auth.user_id, &query).await?;
    Ok(HttpResponse::Ok().json(notifications))
}

#[instrument(skip(auth, state), fields(user_id = %auth.user_id))]
pub async fn mark_notification_read(
    auth: AuthClaims,
    notification_id: web::Path<Uuid>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let notification_handler = &state.services()?.notification_handler;

    let notification = notification_handler.mark_read(&auth.user_id, &notification_id).await?;
    Ok(HttpResponse::Ok().json(notification))
}

#[instrument(skip(auth, state), fields(user_id = %auth.user_id))]
pub async fn mark_all_notifications_read(
    auth: AuthClaims,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let notification_handler = &state.services()?.notification_handler;

    let updated = notification_handler.mark_all_read(&auth.user_id).await?;
    Ok(HttpResponse::Ok().json(serde_json::json!({ "updated": updated })))
}
