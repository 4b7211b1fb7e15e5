use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;
use uuid::Uuid;

use crate::{
    entities::conversation::{MessageSentResponse, SendMessageRequest},
    errors::AppError,
    use_cases::extractors::AuthClaims,
    AppState,
};

#[instrument(skip(auth, state), fields(user_id = %auth.user_id))]
pub async fn list_conversations(
    auth: AuthClaims,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let message_handler = &state.services()?.message_handler;

    let conversations = message_handler.list_conversations(&auth.user_id).await?;
    Ok(HttpResponse::Ok().json(conversations))
}

#[instrument(skip(auth, state), fields(user_id = %auth.user_id))]
pub async fn list_messages(
    auth: AuthClaims,
    conversation_id: web::Path<Uuid>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let message_handler = &state.services()?.message_handler;

    let messages = message_handler.list_messages(&auth.user_id, &conversation_id).await?;
    Ok(HttpResponse::Ok().json(messages))
}

#[instrument(skip(auth, state, data), fields(user_id = %auth.user_id))]
pub async fn send_message(
    auth: AuthClaims,
    state: web::Data<AppState>,
    data: web::Json<SendMessageRequest>,
) -> Result<impl Responder, AppError> {
    let message_handler = &state.services()?.message_handler;

    let message = message_handler.send_message(&auth.user_id, data.into_inner()).await?;
    Ok(HttpResponse::Created().json(MessageSentResponse { ok: true, message }))
}
