use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;
use uuid::Uuid;

use crate::{entities::connection::NewConnectionRequest, errors::AppError, use_cases::extractors::AuthClaims, AppState};

#[instrument(skip(auth, state), fields(user_id = %auth.user_id))]
pub async fn list_connections(
    auth: AuthClaims,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let connection_handler = &state.services()?.connection_handler;

    let requests = connection_handler.list_connections(&auth.user_id).await?;
    Ok(HttpResponse::Ok().json(requests))
}

#[instrument(skip(auth, state, data), fields(user_id = %auth.user_id))]
pub async fn request_connection(
    auth: AuthClaims,
    state: web::Data<AppState>,
    data: web::Json<NewConnectionRequest>,
) -> Result<impl Responder, AppError> {
    let connection_handler = &state.services()?.connection_handler;

    let request = connection_handler
        .request_connection(&auth.user_id, data.into_inner())
        .await?;

    Ok(HttpResponse::Created().json(request))
}

#[instrument(skip(auth, state), fields(user_id = %auth.user_id))]
pub async fn accept_connection(
    auth: AuthClaims,
    request_id: web::Path<Uuid>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let connection_handler = &state.services()?.connection_handler;

    let accepted = connection_handler.accept(&auth.user_id, &request_id).await?;
    Ok(HttpResponse::Ok().json(accepted))
}

#[instrument(skip(auth, state), fields(user_id = %auth.user_id))]
pub async fn reject_connection(
    auth: AuthClaims,
    request_id: web::Path<Uuid>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let connection_handler = &state.services()?.connection_handler;

    let rejected = connection_handler.reject(&auth.user_id, &request_id).await?;
    Ok(HttpResponse::Ok().json(rejected))
}
