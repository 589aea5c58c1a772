use axum::{extract::State, http::StatusCode, Json};

use crate::auth::accounts::{
    login, refresh, register, LoginRequest, LoginResponse, RefreshRequest, RefreshResponse,
    RegisterRequest,
};
use crate::auth::extractor::AuthUser;
use crate::errors::AppError;
use crate::models::account::Account;
use crate::state::AppState;

/// POST /api/v1/register
pub async fn handle_register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<Account>), AppError> {
    let account = register(state.store.as_ref(), request).await?;
    Ok((StatusCode::CREATED, Json(account)))
}

/// POST /api/v1/login
pub async fn handle_login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    Ok(Json(login(state.store.as_ref(), &state.tokens, request).await?))
}

/// POST /api/v1/token/refresh
pub async fn handle_refresh(
    State(state): State<AppState>,
    Json(request): Json<RefreshRequest>,
) -> Result<Json<RefreshResponse>, AppError> {
    Ok(Json(
        refresh(state.store.as_ref(), &state.tokens, request).await?,
    ))
}

/// GET /api/v1/me
pub async fn handle_me(AuthUser(account): AuthUser) -> Json<Account> {
    Json(account)
}
