//! In-memory `Store` used by unit tests. Mirrors the constraints the Postgres schema enforces.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::account::{Account, NewAccount};
use crate::models::interview::{
    AnswerRow, InterviewRow, InterviewStatus, NewAnswer, QuestionDraft, QuestionRow,
};
use crate::models::skill::{Skill, SkillPatch};
use crate::store::{InterviewScope, Store};

/// Mean of the non-null scores, the way Postgres `AVG` treats them.
fn mean_score(scores: &[Option<f64>]) -> Option<f64> {
    let scored: Vec<f64> = scores.iter().flatten().copied().collect();
    if scored.is_empty() {
        return None;
    }
    Some(scored.iter().sum::<f64>() / scored.len() as f64)
}

#[derive(Default)]
struct Tables {
    accounts: Vec<Account>,
    skills: Vec<Skill>,
    interviews: Vec<InterviewRow>,
    questions: Vec<QuestionRow>,
    answers: Vec<AnswerRow>,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn question_count(&self, interview_id: Uuid) -> usize {
        let tables = self.tables.lock().unwrap();
        tables
            .questions
            .iter()
            .filter(|q| q.interview_id == interview_id)
            .count()
    }

    pub fn interview(&self, id: Uuid) -> Option<InterviewRow> {
        let tables = self.tables.lock().unwrap();
        tables.interviews.iter().find(|i| i.id == id).cloned()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn create_account(&self, account: NewAccount) -> Result<Account, AppError> {
        let mut tables = self.tables.lock().unwrap();
        if tables
            .accounts
            .iter()
            .any(|a| a.username == account.username || a.email == account.email)
        {
            return Err(AppError::Conflict(
                "A user with that username or email already exists".to_string(),
            ));
        }
        let row = Account {
            id: Uuid::new_v4(),
            username: account.username,
            email: account.email,
            password_hash: account.password_hash,
            role: account.role,
            created_at: Utc::now(),
        };
        tables.accounts.push(row.clone());
        Ok(row)
    }

    async fn find_account_by_username(&self, username: &str) -> Result<Option<Account>, AppError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .accounts
            .iter()
            .find(|a| a.username == username)
            .cloned())
    }

    async fn get_account(&self, id: Uuid) -> Result<Option<Account>, AppError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.accounts.iter().find(|a| a.id == id).cloned())
    }

    async fn list_skills(&self, account_id: Uuid) -> Result<Vec<Skill>, AppError> {
        let tables = self.tables.lock().unwrap();
        let mut skills: Vec<Skill> = tables
            .skills
            .iter()
            .filter(|s| s.account_id == account_id)
            .cloned()
            .collect();
        skills.sort_by(|a, b| a.language.cmp(&b.language));
        Ok(skills)
    }

    async fn get_skill(&self, account_id: Uuid, skill_id: Uuid) -> Result<Option<Skill>, AppError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .skills
            .iter()
            .find(|s| s.id == skill_id && s.account_id == account_id)
            .cloned())
    }

    async fn create_skill(
        &self,
        account_id: Uuid,
        language: &str,
        proficiency: i32,
    ) -> Result<Skill, AppError> {
        let mut tables = self.tables.lock().unwrap();
        if tables
            .skills
            .iter()
            .any(|s| s.account_id == account_id && s.language == language)
        {
            return Err(AppError::Conflict(format!(
                "Skill '{language}' already exists"
            )));
        }
        let skill = Skill {
            id: Uuid::new_v4(),
            account_id,
            language: language.to_string(),
            proficiency,
        };
        tables.skills.push(skill.clone());
        Ok(skill)
    }

    async fn update_skill(
        &self,
        account_id: Uuid,
        skill_id: Uuid,
        patch: SkillPatch,
    ) -> Result<Option<Skill>, AppError> {
        let mut tables = self.tables.lock().unwrap();
        if let Some(language) = &patch.language {
            if tables.skills.iter().any(|s| {
                s.account_id == account_id && s.id != skill_id && &s.language == language
            }) {
                return Err(AppError::Conflict(
                    "Skill with that language already exists".to_string(),
                ));
            }
        }
        let Some(skill) = tables
            .skills
            .iter_mut()
            .find(|s| s.id == skill_id && s.account_id == account_id)
        else {
            return Ok(None);
        };
        if let Some(language) = patch.language {
            skill.language = language;
        }
        if let Some(proficiency) = patch.proficiency {
            skill.proficiency = proficiency;
        }
        Ok(Some(skill.clone()))
    }

    async fn delete_skill(&self, account_id: Uuid, skill_id: Uuid) -> Result<bool, AppError> {
        let mut tables = self.tables.lock().unwrap();
        let before = tables.skills.len();
        tables
            .skills
            .retain(|s| !(s.id == skill_id && s.account_id == account_id));
        let removed = tables.skills.len() < before;
        if removed {
            for question in tables
                .questions
                .iter_mut()
                .filter(|q| q.skill_id == Some(skill_id))
            {
                question.skill_id = None;
            }
        }
        Ok(removed)
    }

    async fn create_interview(
        &self,
        recruiter_id: Uuid,
        candidate_id: Option<Uuid>,
    ) -> Result<InterviewRow, AppError> {
        let mut tables = self.tables.lock().unwrap();
        let row = InterviewRow {
            id: Uuid::new_v4(),
            recruiter_id,
            candidate_id,
            status: InterviewStatus::Pending,
            total_score: None,
            created_at: Utc::now(),
        };
        tables.interviews.push(row.clone());
        Ok(row)
    }

    async fn list_interviews(&self, scope: InterviewScope) -> Result<Vec<InterviewRow>, AppError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .interviews
            .iter()
            .filter(|i| scope.includes(i))
            .cloned()
            .collect())
    }

    async fn get_interview(
        &self,
        id: Uuid,
        scope: InterviewScope,
    ) -> Result<Option<InterviewRow>, AppError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .interviews
            .iter()
            .find(|i| i.id == id && scope.includes(i))
            .cloned())
    }

    async fn set_candidate(
        &self,
        id: Uuid,
        candidate_id: Option<Uuid>,
    ) -> Result<Option<InterviewRow>, AppError> {
        let mut tables = self.tables.lock().unwrap();
        let Some(interview) = tables
            .interviews
            .iter_mut()
            .find(|i| i.id == id && i.status == InterviewStatus::Pending)
        else {
            return Ok(None);
        };
        interview.candidate_id = candidate_id;
        Ok(Some(interview.clone()))
    }

    async fn delete_interview(&self, id: Uuid) -> Result<bool, AppError> {
        let mut tables = self.tables.lock().unwrap();
        let before = tables.interviews.len();
        tables.interviews.retain(|i| i.id != id);
        let removed: Vec<Uuid> = tables
            .questions
            .iter()
            .filter(|q| q.interview_id == id)
            .map(|q| q.id)
            .collect();
        tables.questions.retain(|q| q.interview_id != id);
        tables.answers.retain(|a| !removed.contains(&a.question_id));
        Ok(tables.interviews.len() < before)
    }

    async fn list_questions(&self, interview_ids: &[Uuid]) -> Result<Vec<QuestionRow>, AppError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .questions
            .iter()
            .filter(|q| interview_ids.contains(&q.interview_id))
            .cloned()
            .collect())
    }

    async fn get_question(
        &self,
        interview_id: Uuid,
        question_id: Uuid,
    ) -> Result<Option<QuestionRow>, AppError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .questions
            .iter()
            .find(|q| q.id == question_id && q.interview_id == interview_id)
            .cloned())
    }

    async fn start_interview(
        &self,
        interview_id: Uuid,
        drafts: &[QuestionDraft],
    ) -> Result<Vec<QuestionRow>, AppError> {
        let mut tables = self.tables.lock().unwrap();
        let Some(interview) = tables
            .interviews
            .iter_mut()
            .find(|i| i.id == interview_id && i.status == InterviewStatus::Pending)
        else {
            return Err(AppError::Conflict(format!(
                "Interview {interview_id} is no longer pending"
            )));
        };
        interview.status = InterviewStatus::InProgress;

        let now = Utc::now();
        let rows: Vec<QuestionRow> = drafts
            .iter()
            .enumerate()
            .map(|(position, draft)| QuestionRow {
                id: Uuid::new_v4(),
                interview_id,
                question_type: draft.question_type,
                content: draft.content.clone(),
                skill_id: draft.skill_id,
                position: position as i32,
                created_at: now,
            })
            .collect();
        tables.questions.extend(rows.iter().cloned());
        Ok(rows)
    }

    async fn create_answer(&self, answer: NewAnswer) -> Result<AnswerRow, AppError> {
        let mut tables = self.tables.lock().unwrap();
        let interview_id = tables
            .questions
            .iter()
            .find(|q| q.id == answer.question_id)
            .map(|q| q.interview_id)
            .ok_or_else(|| AppError::NotFound(format!("Question {} not found", answer.question_id)))?;
        if tables
            .interviews
            .iter()
            .any(|i| i.id == interview_id && i.status == InterviewStatus::Completed)
        {
            return Err(AppError::Conflict(format!(
                "Interview for question {} is already completed",
                answer.question_id
            )));
        }
        let row = AnswerRow {
            id: Uuid::new_v4(),
            question_id: answer.question_id,
            content: answer.content,
            score: answer.score,
            feedback: answer.feedback,
            created_at: Utc::now(),
        };
        tables.answers.push(row.clone());
        Ok(row)
    }

    async fn complete_interview(&self, interview_id: Uuid) -> Result<InterviewRow, AppError> {
        let mut tables = self.tables.lock().unwrap();
        let question_ids: Vec<Uuid> = tables
            .questions
            .iter()
            .filter(|q| q.interview_id == interview_id)
            .map(|q| q.id)
            .collect();
        let scores: Vec<Option<f64>> = tables
            .answers
            .iter()
            .filter(|a| question_ids.contains(&a.question_id))
            .map(|a| a.score)
            .collect();

        let interview = tables
            .interviews
            .iter_mut()
            .find(|i| i.id == interview_id)
            .ok_or_else(|| AppError::NotFound(format!("Interview {interview_id} not found")))?;
        if scores.is_empty() {
            return Err(AppError::Validation("No responses found".to_string()));
        }
        if interview.status != InterviewStatus::InProgress {
            return Err(AppError::Conflict(format!(
                "Interview {interview_id} is not in progress"
            )));
        }
        interview.status = InterviewStatus::Completed;
        interview.total_score = mean_score(&scores);
        Ok(interview.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_skips_unscored() {
        assert_eq!(mean_score(&[Some(80.0), None, Some(60.0)]), Some(70.0));
        assert_eq!(mean_score(&[None, None]), None);
        assert_eq!(mean_score(&[]), None);
    }
}
