use std::sync::Arc;

use crate::auth::tokens::TokenIssuer;
use crate::config::Config;
use crate::llm_client::TextGenerator;
use crate::notify::Notifier;
use crate::store::Store;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    /// Generative-AI backend. `LlmClient` in production, scripted in tests.
    pub llm: Arc<dyn TextGenerator>,
    pub notifier: Arc<dyn Notifier>,
    pub tokens: TokenIssuer,
    pub config: Config,
}
