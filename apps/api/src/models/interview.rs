use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Interview lifecycle. Only ever advances pending -> in_progress -> completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "interview_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum InterviewStatus {
    Pending,
    InProgress,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "question_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    Technical,
    Behavioural,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct InterviewRow {
    pub id: Uuid,
    pub recruiter_id: Uuid,
    pub candidate_id: Option<Uuid>,
    pub status: InterviewStatus,
    pub total_score: Option<f64>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct QuestionRow {
    pub id: Uuid,
    pub interview_id: Uuid,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub content: String,
    pub skill_id: Option<Uuid>,
    #[serde(skip)]
    pub position: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AnswerRow {
    pub id: Uuid,
    pub question_id: Uuid,
    pub content: String,
    pub score: Option<f64>,
    pub feedback: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A question produced by the generator but not yet persisted.
#[derive(Debug, Clone)]
pub struct QuestionDraft {
    pub question_type: QuestionType,
    pub content: String,
    pub skill_id: Option<Uuid>,
}

/// An answer ready to be stored against a question.
#[derive(Debug, Clone)]
pub struct NewAnswer {
    pub question_id: Uuid,
    pub content: String,
    pub score: Option<f64>,
    pub feedback: Option<String>,
}

/// Interview as returned over HTTP, with its questions in creation order.
#[derive(Debug, Clone, Serialize)]
pub struct InterviewDetail {
    #[serde(flatten)]
    pub interview: InterviewRow,
    pub questions: Vec<QuestionRow>,
}
