use async_trait::async_trait;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::account::{Account, NewAccount};
use crate::models::interview::{
    AnswerRow, InterviewRow, InterviewStatus, NewAnswer, QuestionDraft, QuestionRow,
};
use crate::models::skill::{Skill, SkillPatch};
use crate::store::{InterviewScope, Store};

/// Postgres-backed store.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Maps unique-constraint violations to `Conflict`, everything else to `Database`.
fn conflict_on_unique(err: sqlx::Error, message: impl Into<String>) -> AppError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => AppError::Conflict(message.into()),
        _ => AppError::Database(err),
    }
}

#[async_trait]
impl Store for PgStore {
    async fn create_account(&self, account: NewAccount) -> Result<Account, AppError> {
        sqlx::query_as::<_, Account>(
            r#"
            INSERT INTO accounts (id, username, email, password_hash, role)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&account.username)
        .bind(&account.email)
        .bind(&account.password_hash)
        .bind(account.role)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "A user with that username or email already exists"))
    }

    async fn find_account_by_username(&self, username: &str) -> Result<Option<Account>, AppError> {
        Ok(
            sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE username = $1")
                .bind(username)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn get_account(&self, id: Uuid) -> Result<Option<Account>, AppError> {
        Ok(
            sqlx::query_as::<_, Account>("SELECT * FROM accounts WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn list_skills(&self, account_id: Uuid) -> Result<Vec<Skill>, AppError> {
        Ok(sqlx::query_as::<_, Skill>(
            "SELECT * FROM skills WHERE account_id = $1 ORDER BY language",
        )
        .bind(account_id)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn get_skill(&self, account_id: Uuid, skill_id: Uuid) -> Result<Option<Skill>, AppError> {
        Ok(
            sqlx::query_as::<_, Skill>("SELECT * FROM skills WHERE id = $1 AND account_id = $2")
                .bind(skill_id)
                .bind(account_id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn create_skill(
        &self,
        account_id: Uuid,
        language: &str,
        proficiency: i32,
    ) -> Result<Skill, AppError> {
        sqlx::query_as::<_, Skill>(
            r#"
            INSERT INTO skills (id, account_id, language, proficiency)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(account_id)
        .bind(language)
        .bind(proficiency)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, format!("Skill '{language}' already exists")))
    }

    async fn update_skill(
        &self,
        account_id: Uuid,
        skill_id: Uuid,
        patch: SkillPatch,
    ) -> Result<Option<Skill>, AppError> {
        sqlx::query_as::<_, Skill>(
            r#"
            UPDATE skills
            SET language = COALESCE($3, language),
                proficiency = COALESCE($4, proficiency)
            WHERE id = $1 AND account_id = $2
            RETURNING *
            "#,
        )
        .bind(skill_id)
        .bind(account_id)
        .bind(patch.language.as_deref())
        .bind(patch.proficiency)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| conflict_on_unique(e, "Skill with that language already exists"))
    }

    async fn delete_skill(&self, account_id: Uuid, skill_id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM skills WHERE id = $1 AND account_id = $2")
            .bind(skill_id)
            .bind(account_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn create_interview(
        &self,
        recruiter_id: Uuid,
        candidate_id: Option<Uuid>,
    ) -> Result<InterviewRow, AppError> {
        Ok(sqlx::query_as::<_, InterviewRow>(
            r#"
            INSERT INTO interviews (id, recruiter_id, candidate_id)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(recruiter_id)
        .bind(candidate_id)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn list_interviews(&self, scope: InterviewScope) -> Result<Vec<InterviewRow>, AppError> {
        let rows = match scope {
            InterviewScope::All => {
                sqlx::query_as::<_, InterviewRow>(
                    "SELECT * FROM interviews ORDER BY created_at DESC",
                )
                .fetch_all(&self.pool)
                .await?
            }
            InterviewScope::Candidate(candidate_id) => {
                sqlx::query_as::<_, InterviewRow>(
                    "SELECT * FROM interviews WHERE candidate_id = $1 ORDER BY created_at DESC",
                )
                .bind(candidate_id)
                .fetch_all(&self.pool)
                .await?
            }
        };
        Ok(rows)
    }

    async fn get_interview(
        &self,
        id: Uuid,
        scope: InterviewScope,
    ) -> Result<Option<InterviewRow>, AppError> {
        let row = sqlx::query_as::<_, InterviewRow>("SELECT * FROM interviews WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.filter(|interview| scope.includes(interview)))
    }

    async fn set_candidate(
        &self,
        id: Uuid,
        candidate_id: Option<Uuid>,
    ) -> Result<Option<InterviewRow>, AppError> {
        Ok(sqlx::query_as::<_, InterviewRow>(
            r#"
            UPDATE interviews SET candidate_id = $2
            WHERE id = $1 AND status = 'pending'
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(candidate_id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn delete_interview(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM interviews WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list_questions(&self, interview_ids: &[Uuid]) -> Result<Vec<QuestionRow>, AppError> {
        if interview_ids.is_empty() {
            return Ok(Vec::new());
        }
        Ok(sqlx::query_as::<_, QuestionRow>(
            r#"
            SELECT * FROM questions
            WHERE interview_id = ANY($1)
            ORDER BY created_at, position
            "#,
        )
        .bind(interview_ids)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn get_question(
        &self,
        interview_id: Uuid,
        question_id: Uuid,
    ) -> Result<Option<QuestionRow>, AppError> {
        Ok(sqlx::query_as::<_, QuestionRow>(
            "SELECT * FROM questions WHERE id = $1 AND interview_id = $2",
        )
        .bind(question_id)
        .bind(interview_id)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn start_interview(
        &self,
        interview_id: Uuid,
        drafts: &[QuestionDraft],
    ) -> Result<Vec<QuestionRow>, AppError> {
        let mut tx = self.pool.begin().await?;

        // The guarded UPDATE takes the row lock, so a concurrent generation waits here and then
        // sees zero affected rows.
        let flipped = sqlx::query(
            "UPDATE interviews SET status = 'in_progress' WHERE id = $1 AND status = 'pending'",
        )
        .bind(interview_id)
        .execute(&mut *tx)
        .await?;

        if flipped.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(AppError::Conflict(format!(
                "Interview {interview_id} is no longer pending"
            )));
        }

        let mut inserted = Vec::with_capacity(drafts.len());
        for (position, draft) in drafts.iter().enumerate() {
            let row = sqlx::query_as::<_, QuestionRow>(
                r#"
                INSERT INTO questions (id, interview_id, question_type, content, skill_id, position)
                VALUES ($1, $2, $3, $4, $5, $6)
                RETURNING *
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(interview_id)
            .bind(draft.question_type)
            .bind(&draft.content)
            .bind(draft.skill_id)
            .bind(i32::try_from(position).unwrap_or(i32::MAX))
            .fetch_one(&mut *tx)
            .await?;
            inserted.push(row);
        }

        tx.commit().await?;
        info!(
            "Inserted {} questions for interview {interview_id}",
            inserted.len()
        );
        Ok(inserted)
    }

    async fn create_answer(&self, answer: NewAnswer) -> Result<AnswerRow, AppError> {
        let mut tx = self.pool.begin().await?;

        // FOR SHARE holds off a concurrent completion until this answer is committed.
        let status = sqlx::query_scalar::<_, InterviewStatus>(
            r#"
            SELECT i.status
            FROM interviews i
            JOIN questions q ON q.interview_id = i.id
            WHERE q.id = $1
            FOR SHARE OF i
            "#,
        )
        .bind(answer.question_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Question {} not found", answer.question_id)))?;

        if status == InterviewStatus::Completed {
            tx.rollback().await?;
            return Err(AppError::Conflict(format!(
                "Interview for question {} is already completed",
                answer.question_id
            )));
        }

        let row = sqlx::query_as::<_, AnswerRow>(
            r#"
            INSERT INTO answers (id, question_id, content, score, feedback)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(answer.question_id)
        .bind(&answer.content)
        .bind(answer.score)
        .bind(answer.feedback.as_deref())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(row)
    }

    async fn complete_interview(&self, interview_id: Uuid) -> Result<InterviewRow, AppError> {
        let mut tx = self.pool.begin().await?;

        let status = sqlx::query_scalar::<_, InterviewStatus>(
            "SELECT status FROM interviews WHERE id = $1 FOR UPDATE",
        )
        .bind(interview_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Interview {interview_id} not found")))?;

        // Read after the lock: answers committed by submitters we waited on are included.
        let (answers, total_score) = sqlx::query_as::<_, (i64, Option<f64>)>(
            r#"
            SELECT COUNT(a.id), AVG(a.score)
            FROM answers a
            JOIN questions q ON q.id = a.question_id
            WHERE q.interview_id = $1
            "#,
        )
        .bind(interview_id)
        .fetch_one(&mut *tx)
        .await?;

        if answers == 0 {
            tx.rollback().await?;
            return Err(AppError::Validation("No responses found".to_string()));
        }
        if status != InterviewStatus::InProgress {
            tx.rollback().await?;
            return Err(AppError::Conflict(format!(
                "Interview {interview_id} is not in progress"
            )));
        }

        let row = sqlx::query_as::<_, InterviewRow>(
            r#"
            UPDATE interviews SET status = 'completed', total_score = $2
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(interview_id)
        .bind(total_score)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        info!("Interview {interview_id} completed over {answers} answers");
        Ok(row)
    }
}
