//! Interview CRUD. Recruiters manage interviews; candidates only ever see their own.

use std::collections::HashMap;

use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::account::{Account, Role};
use crate::models::interview::{InterviewDetail, InterviewRow, InterviewStatus, QuestionRow};
use crate::store::{InterviewScope, Store};

#[derive(Debug, Default, Deserialize)]
pub struct CreateInterviewRequest {
    #[serde(default)]
    pub candidate_id: Option<Uuid>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateInterviewRequest {
    /// `null` unassigns the candidate.
    #[serde(default)]
    pub candidate_id: Option<Uuid>,
}

pub fn require_recruiter(account: &Account) -> Result<(), AppError> {
    if account.role.is_recruiter() {
        Ok(())
    } else {
        Err(AppError::Forbidden)
    }
}

/// Loads an interview the caller is allowed to see, or `NotFound`.
pub async fn visible_interview(
    store: &dyn Store,
    caller: &Account,
    interview_id: Uuid,
) -> Result<InterviewRow, AppError> {
    store
        .get_interview(interview_id, InterviewScope::for_account(caller))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Interview {interview_id} not found")))
}

async fn check_candidate(store: &dyn Store, candidate_id: Option<Uuid>) -> Result<(), AppError> {
    let Some(candidate_id) = candidate_id else {
        return Ok(());
    };
    match store.get_account(candidate_id).await? {
        Some(account) if account.role == Role::Candidate => Ok(()),
        _ => Err(AppError::Validation(format!(
            "candidate_id {candidate_id} does not name a candidate account"
        ))),
    }
}

async fn with_questions(
    store: &dyn Store,
    interviews: Vec<InterviewRow>,
) -> Result<Vec<InterviewDetail>, AppError> {
    let ids: Vec<Uuid> = interviews.iter().map(|i| i.id).collect();
    let mut by_interview: HashMap<Uuid, Vec<QuestionRow>> = HashMap::new();
    for question in store.list_questions(&ids).await? {
        by_interview
            .entry(question.interview_id)
            .or_default()
            .push(question);
    }
    Ok(interviews
        .into_iter()
        .map(|interview| {
            let questions = by_interview.remove(&interview.id).unwrap_or_default();
            InterviewDetail {
                interview,
                questions,
            }
        })
        .collect())
}

pub async fn create_interview(
    store: &dyn Store,
    caller: &Account,
    request: CreateInterviewRequest,
) -> Result<InterviewDetail, AppError> {
    require_recruiter(caller)?;
    check_candidate(store, request.candidate_id).await?;

    let interview = store
        .create_interview(caller.id, request.candidate_id)
        .await?;
    info!(
        "Recruiter {} created interview {} for candidate {:?}",
        caller.id, interview.id, interview.candidate_id
    );
    Ok(InterviewDetail {
        interview,
        questions: Vec::new(),
    })
}

pub async fn list_interviews(
    store: &dyn Store,
    caller: &Account,
) -> Result<Vec<InterviewDetail>, AppError> {
    let interviews = store
        .list_interviews(InterviewScope::for_account(caller))
        .await?;
    with_questions(store, interviews).await
}

pub async fn get_interview(
    store: &dyn Store,
    caller: &Account,
    interview_id: Uuid,
) -> Result<InterviewDetail, AppError> {
    let interview = visible_interview(store, caller, interview_id).await?;
    let mut details = with_questions(store, vec![interview]).await?;
    details
        .pop()
        .ok_or_else(|| AppError::NotFound(format!("Interview {interview_id} not found")))
}

pub async fn update_interview(
    store: &dyn Store,
    caller: &Account,
    interview_id: Uuid,
    request: UpdateInterviewRequest,
) -> Result<InterviewDetail, AppError> {
    require_recruiter(caller)?;
    let interview = visible_interview(store, caller, interview_id).await?;
    if interview.status != InterviewStatus::Pending {
        return Err(AppError::Conflict(format!(
            "Interview {interview_id} has already started"
        )));
    }
    check_candidate(store, request.candidate_id).await?;

    let updated = store
        .set_candidate(interview_id, request.candidate_id)
        .await?
        .ok_or_else(|| {
            AppError::Conflict(format!("Interview {interview_id} has already started"))
        })?;
    Ok(InterviewDetail {
        interview: updated,
        questions: Vec::new(),
    })
}

pub async fn delete_interview(
    store: &dyn Store,
    caller: &Account,
    interview_id: Uuid,
) -> Result<(), AppError> {
    require_recruiter(caller)?;
    if store.delete_interview(interview_id).await? {
        info!("Recruiter {} deleted interview {interview_id}", caller.id);
        Ok(())
    } else {
        Err(AppError::NotFound(format!(
            "Interview {interview_id} not found"
        )))
    }
}
