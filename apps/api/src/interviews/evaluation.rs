//! Answer submission and AI evaluation.

use std::sync::OnceLock;

use regex::Regex;
use serde::Deserialize;
use tracing::{error, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::interviews::prompts::evaluation_prompt;
use crate::interviews::records::visible_interview;
use crate::llm_client::{GenerationParams, TextGenerator};
use crate::models::account::Account;
use crate::models::interview::{AnswerRow, InterviewStatus, NewAnswer};
use crate::store::Store;

#[derive(Debug, Deserialize)]
pub struct SubmitResponseRequest {
    pub question_id: Option<Uuid>,
    pub content: Option<String>,
}

fn labelled_score() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        // "Score: 85", "**Score (0-100):** 72", "Score (out of 100): 85", "score of 7 out of 10".
        // A bracketed label right after the word is skipped so its digits are not read as the score.
        Regex::new(
            r"(?i)\bscore\b(?:\s*[(\[][^)\]]*[)\]])?[^0-9]{0,20}?(\d{1,3}(?:\.\d+)?)(?:\s*(?:/|out\s+of)\s*(\d{1,3}))?",
        )
        .expect("labelled score pattern is valid")
    })
}

fn out_of_hundred() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)(\d{1,3}(?:\.\d+)?)\s*(?:/|out\s+of)\s*100\b")
            .expect("fraction pattern is valid")
    })
}

/// Extracts a 0-100 score from free-text evaluation.
///
/// Takes the first number after the word "score" (a trailing `/N` or `out of N` rescales it
/// to 100), falling back to the first `N/100` or `N out of 100` anywhere. Anything outside
/// 0-100 yields `None`.
pub fn parse_score(evaluation: &str) -> Option<f64> {
    let raw = if let Some(caps) = labelled_score().captures(evaluation) {
        let value: f64 = caps.get(1)?.as_str().parse().ok()?;
        match caps.get(2) {
            Some(denominator) => {
                let denominator: f64 = denominator.as_str().parse().ok()?;
                if denominator == 0.0 {
                    return None;
                }
                value * 100.0 / denominator
            }
            None => value,
        }
    } else {
        let caps = out_of_hundred().captures(evaluation)?;
        caps.get(1)?.as_str().parse().ok()?
    };

    (0.0..=100.0).contains(&raw).then_some(raw)
}

pub async fn submit_response(
    store: &dyn Store,
    llm: &dyn TextGenerator,
    caller: &Account,
    interview_id: Uuid,
    request: SubmitResponseRequest,
) -> Result<AnswerRow, AppError> {
    let (Some(question_id), Some(content)) = (
        request.question_id,
        request.content.filter(|c| !c.trim().is_empty()),
    ) else {
        return Err(AppError::Validation(
            "Missing question_id or content".to_string(),
        ));
    };

    let interview = visible_interview(store, caller, interview_id).await?;
    let question = store
        .get_question(interview_id, question_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Question {question_id} not found")))?;
    if interview.status == InterviewStatus::Completed {
        return Err(AppError::Conflict(format!(
            "Interview {interview_id} is already completed"
        )));
    }

    let prompt = evaluation_prompt(&question.content, &content);
    let evaluation = llm
        .generate(&prompt, GenerationParams::default())
        .await
        .map_err(|e| {
            error!("Failed to evaluate response to question {question_id}: {e}");
            AppError::Llm(format!(
                "Failed to evaluate response to question {question_id}"
            ))
        })?;

    let score = parse_score(&evaluation);
    if score.is_none() {
        info!("No score found in evaluation of question {question_id}; storing it unscored");
    }

    store
        .create_answer(NewAnswer {
            question_id,
            content,
            score,
            feedback: Some(evaluation),
        })
        .await
}
