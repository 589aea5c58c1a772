//! bcrypt hashing. Both operations are CPU-bound and run on the blocking pool so they
//! never stall the async workers.

use tokio::task;
use tracing::warn;

use crate::errors::AppError;

pub async fn hash_password(password: &str) -> Result<String, AppError> {
    let password = password.to_string();
    task::spawn_blocking(move || bcrypt::hash(password, bcrypt::DEFAULT_COST))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Password hashing task failed: {e}")))?
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Password hashing failed: {e}")))
}

/// A malformed stored hash counts as a mismatch.
pub async fn verify_password(password: &str, password_hash: &str) -> Result<bool, AppError> {
    let password = password.to_string();
    let password_hash = password_hash.to_string();
    let verified = task::spawn_blocking(move || bcrypt::verify(password, &password_hash))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Password verification task failed: {e}")))?;

    Ok(match verified {
        Ok(matches) => matches,
        Err(e) => {
            warn!("Stored password hash could not be verified: {e}");
            false
        }
    })
}
