//! Axum route handlers for the caller's programming skills.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::auth::extractor::AuthUser;
use crate::errors::AppError;
use crate::models::skill::Skill;
use crate::skills::registry::{self, CreateSkillRequest, UpdateSkillRequest};
use crate::state::AppState;

/// GET /api/v1/skills
pub async fn handle_list_skills(
    State(state): State<AppState>,
    AuthUser(account): AuthUser,
) -> Result<Json<Vec<Skill>>, AppError> {
    Ok(Json(
        registry::list_skills(state.store.as_ref(), &account).await?,
    ))
}

/// POST /api/v1/skills
pub async fn handle_create_skill(
    State(state): State<AppState>,
    AuthUser(account): AuthUser,
    Json(request): Json<CreateSkillRequest>,
) -> Result<(StatusCode, Json<Skill>), AppError> {
    let skill = registry::create_skill(state.store.as_ref(), &account, request).await?;
    Ok((StatusCode::CREATED, Json(skill)))
}

/// GET /api/v1/skills/:id
pub async fn handle_get_skill(
    State(state): State<AppState>,
    AuthUser(account): AuthUser,
    Path(skill_id): Path<Uuid>,
) -> Result<Json<Skill>, AppError> {
    Ok(Json(
        registry::get_skill(state.store.as_ref(), &account, skill_id).await?,
    ))
}

/// PATCH /api/v1/skills/:id
pub async fn handle_update_skill(
    State(state): State<AppState>,
    AuthUser(account): AuthUser,
    Path(skill_id): Path<Uuid>,
    Json(request): Json<UpdateSkillRequest>,
) -> Result<Json<Skill>, AppError> {
    Ok(Json(
        registry::update_skill(state.store.as_ref(), &account, skill_id, request).await?,
    ))
}

/// DELETE /api/v1/skills/:id
pub async fn handle_delete_skill(
    State(state): State<AppState>,
    AuthUser(account): AuthUser,
    Path(skill_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    registry::delete_skill(state.store.as_ref(), &account, skill_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
