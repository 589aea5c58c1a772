use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub gemini_api_key: String,
    pub gemini_model: String,
    pub jwt_secret: String,
    pub access_token_ttl_minutes: i64,
    pub refresh_token_ttl_days: i64,
    /// Mail HTTP API endpoint. When unset, completion emails are only logged.
    pub mail_api_url: Option<String>,
    pub mail_api_key: Option<String>,
    pub default_from_email: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            gemini_api_key: require_env("GEMINI_API_KEY")?,
            gemini_model: optional_env("GEMINI_MODEL")
                .unwrap_or_else(|| "gemini-2.0-flash".to_string()),
            jwt_secret: require_env("JWT_SECRET")?,
            access_token_ttl_minutes: parse_env("ACCESS_TOKEN_TTL_MINUTES", 60)?,
            refresh_token_ttl_days: parse_env("REFRESH_TOKEN_TTL_DAYS", 1)?,
            mail_api_url: optional_env("MAIL_API_URL"),
            mail_api_key: optional_env("MAIL_API_KEY"),
            default_from_email: optional_env("DEFAULT_FROM_EMAIL")
                .unwrap_or_else(|| "noreply@interview.local".to_string()),
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
{
    match optional_env(key) {
        Some(raw) => raw
            .parse::<T>()
            .ok()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        None => Ok(default),
    }
}
