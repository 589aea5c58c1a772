use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Closed set of account roles. Drives query scope for interviews.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "account_role", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Recruiter,
    Candidate,
}

impl Role {
    pub fn from_recruiter_flag(is_recruiter: bool) -> Self {
        if is_recruiter {
            Role::Recruiter
        } else {
            Role::Candidate
        }
    }

    pub fn is_recruiter(self) -> bool {
        matches!(self, Role::Recruiter)
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Account {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// Insert payload. The password is already hashed by the time it reaches the store.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}
