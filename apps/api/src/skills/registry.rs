use serde::Deserialize;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::errors::AppError;
use crate::models::account::Account;
use crate::models::skill::{Skill, SkillPatch};
use crate::store::Store;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateSkillRequest {
    #[validate(length(min = 1, max = 50, message = "language must be 1-50 characters"))]
    pub language: String,
    #[validate(range(min = 1, max = 10, message = "proficiency must be between 1 and 10"))]
    pub proficiency: i32,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateSkillRequest {
    #[validate(length(min = 1, max = 50, message = "language must be 1-50 characters"))]
    pub language: Option<String>,
    #[validate(range(min = 1, max = 10, message = "proficiency must be between 1 and 10"))]
    pub proficiency: Option<i32>,
}

pub async fn list_skills(store: &dyn Store, account: &Account) -> Result<Vec<Skill>, AppError> {
    store.list_skills(account.id).await
}

pub async fn get_skill(
    store: &dyn Store,
    account: &Account,
    skill_id: Uuid,
) -> Result<Skill, AppError> {
    store
        .get_skill(account.id, skill_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Skill {skill_id} not found")))
}

pub async fn create_skill(
    store: &dyn Store,
    account: &Account,
    request: CreateSkillRequest,
) -> Result<Skill, AppError> {
    request.validate()?;
    let language = request.language.trim();
    if language.is_empty() {
        return Err(AppError::Validation("language cannot be empty".to_string()));
    }

    let skill = store
        .create_skill(account.id, language, request.proficiency)
        .await?;
    info!(
        "Account {} declared {} at proficiency {}",
        account.id, skill.language, skill.proficiency
    );
    Ok(skill)
}

pub async fn update_skill(
    store: &dyn Store,
    account: &Account,
    skill_id: Uuid,
    request: UpdateSkillRequest,
) -> Result<Skill, AppError> {
    request.validate()?;
    let language = request.language.map(|l| l.trim().to_string());
    if language.as_deref() == Some("") {
        return Err(AppError::Validation("language cannot be empty".to_string()));
    }

    store
        .update_skill(
            account.id,
            skill_id,
            SkillPatch {
                language,
                proficiency: request.proficiency,
            },
        )
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Skill {skill_id} not found")))
}

pub async fn delete_skill(
    store: &dyn Store,
    account: &Account,
    skill_id: Uuid,
) -> Result<(), AppError> {
    if store.delete_skill(account.id, skill_id).await? {
        Ok(())
    } else {
        Err(AppError::NotFound(format!("Skill {skill_id} not found")))
    }
}
