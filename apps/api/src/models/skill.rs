use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Skill {
    pub id: Uuid,
    #[serde(skip_serializing)]
    pub account_id: Uuid,
    pub language: String,
    pub proficiency: i32,
}

/// Partial update for a skill. `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct SkillPatch {
    pub language: Option<String>,
    pub proficiency: Option<i32>,
}
