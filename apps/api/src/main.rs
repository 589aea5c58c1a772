mod auth;
mod config;
mod db;
mod errors;
mod interviews;
mod llm_client;
mod models;
mod notify;
mod routes;
mod skills;
mod state;
mod store;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::auth::tokens::TokenIssuer;
use crate::config::Config;
use crate::db::create_pool;
use crate::llm_client::LlmClient;
use crate::notify::{HttpMailer, LogNotifier, Notifier};
use crate::routes::build_router;
use crate::state::AppState;
use crate::store::PgStore;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Interview API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL (runs migrations)
    let pool = create_pool(&config.database_url).await?;
    let store = Arc::new(PgStore::new(pool));

    // Initialize LLM client
    let llm = LlmClient::new(config.gemini_api_key.clone(), config.gemini_model.clone())?;
    info!("LLM client initialized (model: {})", llm.model());

    // Initialize mail delivery
    let notifier: Arc<dyn Notifier> = match &config.mail_api_url {
        Some(url) => {
            info!("Mail delivery via {url}");
            Arc::new(HttpMailer::new(url.clone(), config.mail_api_key.clone())?)
        }
        None => {
            info!("MAIL_API_URL not set; completion emails will only be logged");
            Arc::new(LogNotifier)
        }
    };

    let tokens = TokenIssuer::new(
        &config.jwt_secret,
        chrono::Duration::minutes(config.access_token_ttl_minutes),
        chrono::Duration::days(config.refresh_token_ttl_days),
    );

    // Build app state
    let state = AppState {
        store,
        llm: Arc::new(llm),
        notifier,
        tokens,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins once the frontend host is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
