use actix_web::{web, web::Bytes, HttpResponse, Responder};
use futures_util::StreamExt;
use tracing::instrument;

use crate::{
    errors::AppError,
    realtime::{ChangeEvent, ChangeKind, FeedEntity},
    use_cases::extractors::AuthClaims,
    AppState,
};

/// Server-Sent Events stream of changes to one entity type that concern
/// the caller. Each event is named after its change kind.
#[instrument(skip(auth, state), fields(user_id = %auth.user_id))]
pub async fn subscribe(
    auth: AuthClaims,
    entity: web::Path<String>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let entity: FeedEntity = entity.parse()?;
    tracing::info!(%entity, "Feed subscriber connected");

    let events = state
        .feed
        .subscribe(entity, auth.user_id)
        .map(|event| Ok::<Bytes, actix_web::Error>(Bytes::from(to_sse_frame(&event))));

    let opening = futures_util::stream::once(async {
        Ok::<Bytes, actix_web::Error>(Bytes::from_static(b": connected\n\n"))
    });

    Ok(HttpResponse::Ok()
        .content_type("text/event-stream")
        .insert_header(("Cache-Control", "no-cache"))
        .streaming(opening.chain(events)))
}

fn to_sse_frame(event: &ChangeEvent) -> String {
    let kind = match event.kind {
        ChangeKind::Insert => "INSERT",
        ChangeKind::Update => "UPDATE",
        ChangeKind::Delete => "DELETE",
    };

    match serde_json::to_string(event) {
        Ok(data) => format!("event: {}\ndata: {}\n\n", kind, data),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to encode change event");
            String::from(": dropped\n\n")
        }
    }
}
