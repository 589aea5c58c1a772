use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::auth::tokens::TokenKind;
use crate::errors::AppError;
use crate::models::account::Account;
use crate::state::AppState;

/// The authenticated caller, resolved from an `Authorization: Bearer <access token>` header.
pub struct AuthUser(pub Account);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(AppError::Unauthorized)?;

        let claims = state.tokens.verify(token, TokenKind::Access)?;

        // Token outlived its account.
        let account = state
            .store
            .get_account(claims.sub)
            .await?
            .ok_or(AppError::Unauthorized)?;

        Ok(AuthUser(account))
    }
}
