//! Axum route handlers for interviews and their lifecycle.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::auth::extractor::AuthUser;
use crate::errors::AppError;
use crate::interviews::completion::{complete_interview, CompletionReport};
use crate::interviews::evaluation::{submit_response, SubmitResponseRequest};
use crate::interviews::questions::{generate_questions, GenerationReport};
use crate::interviews::records::{self, CreateInterviewRequest, UpdateInterviewRequest};
use crate::models::interview::{AnswerRow, InterviewDetail};
use crate::state::AppState;

/// GET /api/v1/interviews
pub async fn handle_list_interviews(
    State(state): State<AppState>,
    AuthUser(account): AuthUser,
) -> Result<Json<Vec<InterviewDetail>>, AppError> {
    Ok(Json(
        records::list_interviews(state.store.as_ref(), &account).await?,
    ))
}

/// POST /api/v1/interviews
pub async fn handle_create_interview(
    State(state): State<AppState>,
    AuthUser(account): AuthUser,
    Json(request): Json<CreateInterviewRequest>,
) -> Result<(StatusCode, Json<InterviewDetail>), AppError> {
    let detail = records::create_interview(state.store.as_ref(), &account, request).await?;
    Ok((StatusCode::CREATED, Json(detail)))
}

/// GET /api/v1/interviews/:id
pub async fn handle_get_interview(
    State(state): State<AppState>,
    AuthUser(account): AuthUser,
    Path(interview_id): Path<Uuid>,
) -> Result<Json<InterviewDetail>, AppError> {
    Ok(Json(
        records::get_interview(state.store.as_ref(), &account, interview_id).await?,
    ))
}

/// PATCH /api/v1/interviews/:id
pub async fn handle_update_interview(
    State(state): State<AppState>,
    AuthUser(account): AuthUser,
    Path(interview_id): Path<Uuid>,
    Json(request): Json<UpdateInterviewRequest>,
) -> Result<Json<InterviewDetail>, AppError> {
    Ok(Json(
        records::update_interview(state.store.as_ref(), &account, interview_id, request).await?,
    ))
}

/// DELETE /api/v1/interviews/:id
pub async fn handle_delete_interview(
    State(state): State<AppState>,
    AuthUser(account): AuthUser,
    Path(interview_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    records::delete_interview(state.store.as_ref(), &account, interview_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/interviews/:id/generate-questions
///
/// One LLM call per candidate skill; questions are written and the interview started
/// only once every call has succeeded.
pub async fn handle_generate_questions(
    State(state): State<AppState>,
    AuthUser(account): AuthUser,
    Path(interview_id): Path<Uuid>,
) -> Result<(StatusCode, Json<GenerationReport>), AppError> {
    let report = generate_questions(
        state.store.as_ref(),
        state.llm.as_ref(),
        &account,
        interview_id,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(report)))
}

/// POST /api/v1/interviews/:id/submit-response
pub async fn handle_submit_response(
    State(state): State<AppState>,
    AuthUser(account): AuthUser,
    Path(interview_id): Path<Uuid>,
    Json(request): Json<SubmitResponseRequest>,
) -> Result<(StatusCode, Json<AnswerRow>), AppError> {
    let answer = submit_response(
        state.store.as_ref(),
        state.llm.as_ref(),
        &account,
        interview_id,
        request,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(answer)))
}

/// POST /api/v1/interviews/:id/complete-interview
pub async fn handle_complete_interview(
    State(state): State<AppState>,
    AuthUser(account): AuthUser,
    Path(interview_id): Path<Uuid>,
) -> Result<Json<CompletionReport>, AppError> {
    let report = complete_interview(
        state.store.as_ref(),
        state.notifier.as_ref(),
        &state.config.default_from_email,
        &account,
        interview_id,
    )
    .await?;
    Ok(Json(report))
}
