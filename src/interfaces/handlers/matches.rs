use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;

use crate::{entities::matching::MatchQuery, errors::AppError, AppState};

#[instrument(skip(state, query))]
pub async fn matched_swaps(
    state: web::Data<AppState>,
    query: web::Query<MatchQuery>,
) -> Result<impl Responder, AppError> {
    let match_handler = &state.services()?.match_handler;

    let swaps = match_handler.matched_swaps(&query).await?;
    Ok(HttpResponse::Ok().json(swaps))
}
