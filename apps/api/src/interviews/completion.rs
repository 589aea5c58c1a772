use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::interviews::records::visible_interview;
use crate::models::account::Account;
use crate::models::interview::InterviewStatus;
use crate::notify::{notify_completion, Notifier};
use crate::store::Store;

#[derive(Debug, Serialize)]
pub struct CompletionReport {
    pub status: &'static str,
    pub interview_status: InterviewStatus,
    pub total_score: Option<f64>,
}

pub async fn complete_interview(
    store: &dyn Store,
    notifier: &dyn Notifier,
    mail_from: &str,
    caller: &Account,
    interview_id: Uuid,
) -> Result<CompletionReport, AppError> {
    visible_interview(store, caller, interview_id).await?;

    let interview = store.complete_interview(interview_id).await?;
    let total_score = interview.total_score;
    info!("Interview {interview_id} completed with total score {total_score:?}");

    if let Some(candidate_id) = interview.candidate_id {
        match store.get_account(candidate_id).await {
            Ok(Some(candidate)) => {
                notify_completion(notifier, mail_from, &candidate.email, total_score).await
            }
            Ok(None) => warn!("Candidate {candidate_id} vanished before notification"),
            Err(e) => warn!("Could not load candidate {candidate_id} for notification: {e}"),
        }
    }

    Ok(CompletionReport {
        status: "Interview completed",
        interview_status: interview.status,
        total_score,
    })
}
