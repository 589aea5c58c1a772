//! Persistence seam. Handlers and the orchestrator talk to `dyn Store`;
//! `PgStore` is the production backend.

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::account::{Account, NewAccount, Role};
use crate::models::interview::{AnswerRow, InterviewRow, NewAnswer, QuestionDraft, QuestionRow};
use crate::models::skill::{Skill, SkillPatch};

pub mod postgres;

#[cfg(test)]
pub mod memory;

pub use postgres::PgStore;

/// Which interviews a caller may see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterviewScope {
    All,
    Candidate(Uuid),
}

impl InterviewScope {
    pub fn for_account(account: &Account) -> Self {
        match account.role {
            Role::Recruiter => InterviewScope::All,
            Role::Candidate => InterviewScope::Candidate(account.id),
        }
    }

    pub fn includes(&self, interview: &InterviewRow) -> bool {
        match self {
            InterviewScope::All => true,
            InterviewScope::Candidate(id) => interview.candidate_id == Some(*id),
        }
    }
}

#[async_trait]
pub trait Store: Send + Sync {
    // ── accounts ──────────────────────────────────────────────────────────
    /// Fails with `Conflict` when the username or email is taken.
    async fn create_account(&self, account: NewAccount) -> Result<Account, AppError>;
    async fn find_account_by_username(&self, username: &str) -> Result<Option<Account>, AppError>;
    async fn get_account(&self, id: Uuid) -> Result<Option<Account>, AppError>;

    // ── skills ────────────────────────────────────────────────────────────
    async fn list_skills(&self, account_id: Uuid) -> Result<Vec<Skill>, AppError>;
    async fn get_skill(&self, account_id: Uuid, skill_id: Uuid) -> Result<Option<Skill>, AppError>;
    /// Fails with `Conflict` when the account already has this language.
    async fn create_skill(
        &self,
        account_id: Uuid,
        language: &str,
        proficiency: i32,
    ) -> Result<Skill, AppError>;
    async fn update_skill(
        &self,
        account_id: Uuid,
        skill_id: Uuid,
        patch: SkillPatch,
    ) -> Result<Option<Skill>, AppError>;
    async fn delete_skill(&self, account_id: Uuid, skill_id: Uuid) -> Result<bool, AppError>;

    // ── interviews ────────────────────────────────────────────────────────
    async fn create_interview(
        &self,
        recruiter_id: Uuid,
        candidate_id: Option<Uuid>,
    ) -> Result<InterviewRow, AppError>;
    async fn list_interviews(&self, scope: InterviewScope) -> Result<Vec<InterviewRow>, AppError>;
    async fn get_interview(
        &self,
        id: Uuid,
        scope: InterviewScope,
    ) -> Result<Option<InterviewRow>, AppError>;
    /// Reassigns the candidate of a pending interview. `None` if no pending interview matched.
    async fn set_candidate(
        &self,
        id: Uuid,
        candidate_id: Option<Uuid>,
    ) -> Result<Option<InterviewRow>, AppError>;
    async fn delete_interview(&self, id: Uuid) -> Result<bool, AppError>;

    // ── questions & answers ──────────────────────────────────────────────
    /// Questions of the given interviews, in creation order.
    async fn list_questions(&self, interview_ids: &[Uuid]) -> Result<Vec<QuestionRow>, AppError>;
    async fn get_question(
        &self,
        interview_id: Uuid,
        question_id: Uuid,
    ) -> Result<Option<QuestionRow>, AppError>;
    /// Atomically inserts the drafts and moves the interview from pending to in_progress.
    /// Fails with `Conflict` (and inserts nothing) if the interview is no longer pending.
    async fn start_interview(
        &self,
        interview_id: Uuid,
        drafts: &[QuestionDraft],
    ) -> Result<Vec<QuestionRow>, AppError>;
    /// Stores an answer unless its interview is already completed (`Conflict`).
    /// Serialized against `complete_interview`: an answer either lands before completion and
    /// counts toward the total, or is rejected.
    async fn create_answer(&self, answer: NewAnswer) -> Result<AnswerRow, AppError>;
    /// Moves an in_progress interview to completed, setting total_score to the mean of the
    /// non-null scores of every answer it holds at that moment.
    /// Fails with `Validation` if there are no answers, then `Conflict` if not in progress.
    async fn complete_interview(&self, interview_id: Uuid) -> Result<InterviewRow, AppError>;
}
