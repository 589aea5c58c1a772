//! Question generation: one LLM call per candidate skill, then a single atomic write.

use serde::Serialize;
use tracing::{error, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::interviews::proficiency::ProficiencyBand;
use crate::interviews::prompts::{question_prompt, QUESTION_PARAMS};
use crate::interviews::records::visible_interview;
use crate::llm_client::TextGenerator;
use crate::models::account::Account;
use crate::models::interview::{InterviewStatus, QuestionDraft, QuestionType};
use crate::models::skill::Skill;
use crate::store::Store;

/// Lines at or under this many characters (after trimming) are numbering or noise.
pub const MIN_QUESTION_CHARS: usize = 10;

#[derive(Debug, Serialize)]
pub struct GeneratedQuestion {
    pub id: Uuid,
    pub content: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
}

#[derive(Debug, Serialize)]
pub struct SkillQuestions {
    pub language: String,
    pub proficiency: i32,
    pub questions: Vec<GeneratedQuestion>,
}

#[derive(Debug, Serialize)]
pub struct GenerationReport {
    pub status: &'static str,
    pub total_questions: usize,
    pub questions_by_skill: Vec<SkillQuestions>,
}

/// Splits raw model output into candidate questions.
pub fn extract_questions(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| line.chars().count() > MIN_QUESTION_CHARS)
        .map(String::from)
        .collect()
}

pub async fn generate_questions(
    store: &dyn Store,
    llm: &dyn TextGenerator,
    caller: &Account,
    interview_id: Uuid,
) -> Result<GenerationReport, AppError> {
    info!("Starting question generation for interview {interview_id}");

    let interview = visible_interview(store, caller, interview_id).await?;
    if interview.status != InterviewStatus::Pending {
        return Err(AppError::Conflict(format!(
            "Questions for interview {interview_id} were already generated"
        )));
    }

    let candidate_id = interview.candidate_id.ok_or_else(|| {
        AppError::Validation("Interview has no candidate assigned".to_string())
    })?;
    let skills = store.list_skills(candidate_id).await?;
    if skills.is_empty() {
        return Err(AppError::Validation(
            "No programming skills found".to_string(),
        ));
    }
    info!(
        "Found {} skills for candidate {candidate_id}",
        skills.len()
    );

    // Every LLM call completes before anything is written, so a failure leaves no questions.
    let mut per_skill: Vec<(&Skill, Vec<String>)> = Vec::with_capacity(skills.len());
    for skill in &skills {
        let band = ProficiencyBand::classify(skill.proficiency);
        let prompt = question_prompt(band, &skill.language);
        let text = llm.generate(&prompt, QUESTION_PARAMS).await.map_err(|e| {
            error!("Question generation failed for {}: {e}", skill.language);
            AppError::Llm(format!(
                "Failed to generate questions for {}",
                skill.language
            ))
        })?;
        per_skill.push((skill, extract_questions(&text)));
    }

    let drafts: Vec<QuestionDraft> = per_skill
        .iter()
        .flat_map(|(skill, questions)| {
            questions.iter().map(|content| QuestionDraft {
                question_type: QuestionType::Technical,
                content: content.clone(),
                skill_id: Some(skill.id),
            })
        })
        .collect();

    if drafts.is_empty() {
        return Err(AppError::Llm("No valid questions generated".to_string()));
    }

    let mut stored = store.start_interview(interview_id, &drafts).await?.into_iter();

    let mut questions_by_skill = Vec::new();
    for (skill, questions) in &per_skill {
        let generated: Vec<GeneratedQuestion> = stored
            .by_ref()
            .take(questions.len())
            .map(|row| GeneratedQuestion {
                id: row.id,
                content: row.content,
                question_type: row.question_type,
            })
            .collect();
        if generated.is_empty() {
            continue;
        }
        questions_by_skill.push(SkillQuestions {
            language: skill.language.clone(),
            proficiency: skill.proficiency,
            questions: generated,
        });
    }

    info!(
        "Generated {} questions for interview {interview_id}",
        drafts.len()
    );

    Ok(GenerationReport {
        status: "Questions generated successfully",
        total_questions: drafts.len(),
        questions_by_skill,
    })
}
