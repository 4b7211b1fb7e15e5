use actix_web::{web, HttpResponse, Responder};
use tracing::instrument;
use uuid::Uuid;

use crate::{
    entities::skill::{NewSkillRequest, SkillListQuery},
    errors::AppError,
    use_cases::extractors::AuthClaims,
    AppState,
};

/// Defaults to the caller's own skills.
#[instrument(skip(auth, state, query))]
pub async fn list_skills(
    auth: AuthClaims,
    state: web::Data<AppState>,
    query: web::Query<SkillListQuery>,
) -> Result<impl Responder, AppError> {
    let skill_handler = &state.services()?.skill_handler;
    let owner = query.user_id.unwrap_or(auth.user_id);

    let skills = skill_handler.list_skills(&owner).await?;
    Ok(HttpResponse::Ok().json(skills))
}

#[instrument(skip(auth, state, data), fields(user_id = %auth.user_id))]
pub async fn create_skill(
    auth: AuthClaims,
    state: web::Data<AppState>,
    data: web::Json<NewSkillRequest>,
) -> Result<impl Responder, AppError> {
    let skill_handler = &state.services()?.skill_handler;

    let skill = skill_handler.create_skill(&auth.user_id, data.into_inner()).await?;
    Ok(HttpResponse::Created().json(skill))
}

#[instrument(skip(auth, state), fields(user_id = %auth.user_id))]
pub async fn delete_skill(
    auth: AuthClaims,
    skill_id: web::Path<Uuid>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let skill_handler = &state.services()?.skill_handler;

    skill_handler.delete_skill(&auth.user_id, &skill_id).await?;
    Ok(HttpResponse::NoContent().finish())
}
