//! Fakes and fixtures shared by the interview tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::llm_client::{GenerationParams, LlmError, TextGenerator};
use crate::models::account::{Account, NewAccount, Role};
use crate::store::memory::MemoryStore;
use crate::store::Store;

/// Replays canned replies in order and records what it was asked.
#[derive(Default)]
pub struct ScriptedGenerator {
    replies: Mutex<VecDeque<Result<String, LlmError>>>,
    pub calls: Mutex<Vec<(String, GenerationParams)>>,
}

impl ScriptedGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, text: &str) -> Self {
        self.replies.lock().unwrap().push_back(Ok(text.to_string()));
        self
    }

    pub fn fail(self, status: u16) -> Self {
        self.replies.lock().unwrap().push_back(Err(LlmError::Api {
            status,
            message: "upstream failure".to_string(),
        }));
        self
    }

    pub fn prompts(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(p, _)| p.clone())
            .collect()
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, prompt: &str, params: GenerationParams) -> Result<String, LlmError> {
        self.calls.lock().unwrap().push((prompt.to_string(), params));
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(LlmError::EmptyContent))
    }
}

pub async fn account(store: &MemoryStore, username: &str, role: Role) -> Account {
    store
        .create_account(NewAccount {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password_hash: "hash".to_string(),
            role,
        })
        .await
        .unwrap()
}

pub async fn recruiter(store: &MemoryStore) -> Account {
    account(store, "recruiter", Role::Recruiter).await
}

pub async fn candidate(store: &MemoryStore, username: &str) -> Account {
    account(store, username, Role::Candidate).await
}
