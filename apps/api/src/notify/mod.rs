//! Completion notifications. Delivery is best-effort: callers go through
//! `notify_completion`, which never returns an error.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

pub const COMPLETION_SUBJECT: &str = "Interview Results";

#[derive(Debug, Error)]
pub enum MailError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Mail API rejected message (status {status}): {message}")]
    Rejected { status: u16, message: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Email {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub text: String,
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, email: Email) -> Result<(), MailError>;
}

/// The score is printed as stored (`80.0`, `62.5`), without rounding.
pub fn completion_body(total_score: Option<f64>) -> String {
    let score = total_score
        .map(|s| format!("{s:?}"))
        .unwrap_or_else(|| "not available".to_string());
    format!("Your interview has been completed. Total Score: {score}")
}

/// Sends the completion email. Transport errors are logged and swallowed.
pub async fn notify_completion(
    notifier: &dyn Notifier,
    from: &str,
    candidate_email: &str,
    total_score: Option<f64>,
) {
    let email = Email {
        from: from.to_string(),
        to: candidate_email.to_string(),
        subject: COMPLETION_SUBJECT.to_string(),
        text: completion_body(total_score),
    };
    if let Err(e) = notifier.send(email).await {
        warn!("Completion email to {candidate_email} was not delivered: {e}");
    }
}

/// Posts messages as JSON to a transactional mail HTTP API.
#[derive(Clone)]
pub struct HttpMailer {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpMailer {
    pub fn new(endpoint: String, api_key: Option<String>) -> Result<Self, MailError> {
        Ok(Self {
            client: Client::builder().timeout(Duration::from_secs(10)).build()?,
            endpoint,
            api_key,
        })
    }
}

#[async_trait]
impl Notifier for HttpMailer {
    async fn send(&self, email: Email) -> Result<(), MailError> {
        let mut request = self.client.post(&self.endpoint).json(&email);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(MailError::Rejected {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }
        info!("Sent '{}' to {}", email.subject, email.to);
        Ok(())
    }
}

/// Used when no mail API is configured.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, email: Email) -> Result<(), MailError> {
        info!(
            "Mail delivery disabled; would send '{}' to {}: {}",
            email.subject, email.to, email.text
        );
        Ok(())
    }
}

#[cfg(test)]
pub mod testing {
    use std::sync::Mutex;

    use super::*;

    /// Records every message; optionally fails each send after recording it.
    #[derive(Default)]
    pub struct RecordingNotifier {
        pub sent: Mutex<Vec<Email>>,
        pub fail: bool,
    }

    impl RecordingNotifier {
        pub fn failing() -> Self {
            Self {
                sent: Mutex::default(),
                fail: true,
            }
        }

        pub fn sent(&self) -> Vec<Email> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn send(&self, email: Email) -> Result<(), MailError> {
            self.sent.lock().unwrap().push(email);
            if self.fail {
                return Err(MailError::Rejected {
                    status: 503,
                    message: "mail relay unavailable".to_string(),
                });
            }
            Ok(())
        }
    }
}
