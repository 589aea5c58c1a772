use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use validator::Validate;

use crate::auth::password::{hash_password, verify_password};
use crate::auth::tokens::{TokenIssuer, TokenKind};
use crate::errors::AppError;
use crate::models::account::{Account, NewAccount, Role};
use crate::store::Store;

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 150, message = "username must be 1-150 characters"))]
    pub username: String,
    #[serde(default)]
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 8, message = "password must be at least 8 characters"))]
    pub password: String,
    #[serde(default)]
    pub is_recruiter: bool,
}

/// Both fields are optional at the wire level so a missing one is a 400, not a 422.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access: String,
    pub refresh: String,
    pub username: String,
    pub email: String,
    pub role: Role,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub access: String,
}

pub async fn register(store: &dyn Store, request: RegisterRequest) -> Result<Account, AppError> {
    request.validate()?;

    let password_hash = hash_password(&request.password).await?;
    let account = store
        .create_account(NewAccount {
            username: request.username.trim().to_string(),
            email: request.email.trim().to_lowercase(),
            password_hash,
            role: Role::from_recruiter_flag(request.is_recruiter),
        })
        .await?;

    info!(
        "Registered account {} ({:?})",
        account.username, account.role
    );
    Ok(account)
}

pub async fn login(
    store: &dyn Store,
    tokens: &TokenIssuer,
    request: LoginRequest,
) -> Result<LoginResponse, AppError> {
    let (Some(username), Some(password)) = (
        request
            .username
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty()),
        request.password.filter(|p| !p.is_empty()),
    ) else {
        return Err(AppError::Validation(
            "Please provide both username and password".to_string(),
        ));
    };

    let found = store.find_account_by_username(&username).await?;
    let verified = match &found {
        Some(account) => verify_password(&password, &account.password_hash).await?,
        None => false,
    };
    let Some(account) = found.filter(|_| verified) else {
        warn!("Failed login attempt for {username}");
        return Err(AppError::Unauthorized);
    };

    let pair = tokens.issue_pair(account.id)?;
    Ok(LoginResponse {
        access: pair.access,
        refresh: pair.refresh,
        username: account.username,
        email: account.email,
        role: account.role,
    })
}

pub async fn refresh(
    store: &dyn Store,
    tokens: &TokenIssuer,
    request: RefreshRequest,
) -> Result<RefreshResponse, AppError> {
    let token = request
        .refresh
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::Validation("refresh is required".to_string()))?;

    let claims = tokens.verify(&token, TokenKind::Refresh)?;
    let account = store
        .get_account(claims.sub)
        .await?
        .ok_or(AppError::Unauthorized)?;

    Ok(RefreshResponse {
        access: tokens.issue(account.id, TokenKind::Access)?,
    })
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use super::*;
    use crate::store::memory::MemoryStore;

    fn issuer() -> TokenIssuer {
        TokenIssuer::new("test-secret", Duration::minutes(5), Duration::days(1))
    }

    fn register_request(username: &str, email: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: "hunter2hunter2".to_string(),
            is_recruiter: false,
        }
    }

    fn login_request(username: &str, password: &str) -> LoginRequest {
        LoginRequest {
            username: Some(username.to_string()),
            password: Some(password.to_string()),
        }
    }

    #[tokio::test]
    async fn test_register_hashes_password() {
        let store = MemoryStore::new();
        let account = register(&store, register_request("grace", "grace@example.com"))
            .await
            .unwrap();
        assert_eq!(account.role, Role::Candidate);
        assert_ne!(account.password_hash, "hunter2hunter2");
    }

    #[tokio::test]
    async fn test_register_rejects_malformed_email() {
        let store = MemoryStore::new();
        let result = register(&store, register_request("grace", "not-an-email")).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_register_rejects_taken_username() {
        let store = MemoryStore::new();
        register(&store, register_request("grace", "grace@example.com"))
            .await
            .unwrap();
        let result = register(&store, register_request("grace", "other@example.com")).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_login_with_correct_credentials_returns_tokens() {
        let store = MemoryStore::new();
        register(&store, register_request("grace", "grace@example.com"))
            .await
            .unwrap();

        let response = login(&store, &issuer(), login_request("grace", "hunter2hunter2"))
            .await
            .unwrap();
        assert!(!response.access.is_empty());
        assert!(!response.refresh.is_empty());
        assert_eq!(response.email, "grace@example.com");
    }

    #[tokio::test]
    async fn test_login_with_wrong_password_is_unauthorized() {
        let store = MemoryStore::new();
        register(&store, register_request("grace", "grace@example.com"))
            .await
            .unwrap();

        let result = login(&store, &issuer(), login_request("grace", "wrong-password")).await;
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_login_matches_username_trimmed_at_registration() {
        let store = MemoryStore::new();
        let account = register(&store, register_request("grace ", "grace@example.com"))
            .await
            .unwrap();
        assert_eq!(account.username, "grace");

        let response = login(&store, &issuer(), login_request("grace ", "hunter2hunter2"))
            .await
            .unwrap();
        assert_eq!(response.username, "grace");
    }

    #[tokio::test]
    async fn test_login_unknown_user_is_unauthorized() {
        let store = MemoryStore::new();
        let result = login(&store, &issuer(), login_request("nobody", "whatever1")).await;
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }

    #[tokio::test]
    async fn test_login_missing_field_is_bad_request() {
        let store = MemoryStore::new();
        let request = LoginRequest {
            username: Some("grace".to_string()),
            password: None,
        };
        let result = login(&store, &issuer(), request).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_refresh_issues_access_token() {
        let store = MemoryStore::new();
        register(&store, register_request("grace", "grace@example.com"))
            .await
            .unwrap();
        let tokens = issuer();
        let session = login(&store, &tokens, login_request("grace", "hunter2hunter2"))
            .await
            .unwrap();

        let refreshed = refresh(
            &store,
            &tokens,
            RefreshRequest {
                refresh: Some(session.refresh),
            },
        )
        .await
        .unwrap();
        assert!(tokens.verify(&refreshed.access, TokenKind::Access).is_ok());

        let with_access = refresh(
            &store,
            &tokens,
            RefreshRequest {
                refresh: Some(session.access),
            },
        )
        .await;
        assert!(matches!(with_access, Err(AppError::Unauthorized)));
    }
}
