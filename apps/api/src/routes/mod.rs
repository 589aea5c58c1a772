pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::auth::handlers as auth;
use crate::interviews::handlers as interviews;
use crate::skills::handlers as skills;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Accounts
        .route("/api/v1/register", post(auth::handle_register))
        .route("/api/v1/login", post(auth::handle_login))
        .route("/api/v1/token/refresh", post(auth::handle_refresh))
        .route("/api/v1/me", get(auth::handle_me))
        // Skills
        .route(
            "/api/v1/skills",
            get(skills::handle_list_skills).post(skills::handle_create_skill),
        )
        .route(
            "/api/v1/skills/:id",
            get(skills::handle_get_skill)
                .patch(skills::handle_update_skill)
                .delete(skills::handle_delete_skill),
        )
        // Interviews
        .route(
            "/api/v1/interviews",
            get(interviews::handle_list_interviews).post(interviews::handle_create_interview),
        )
        .route(
            "/api/v1/interviews/:id",
            get(interviews::handle_get_interview)
                .patch(interviews::handle_update_interview)
                .delete(interviews::handle_delete_interview),
        )
        .route(
            "/api/v1/interviews/:id/generate-questions",
            post(interviews::handle_generate_questions),
        )
        .route(
            "/api/v1/interviews/:id/submit-response",
            post(interviews::handle_submit_response),
        )
        .route(
            "/api/v1/interviews/:id/complete-interview",
            post(interviews::handle_complete_interview),
        )
        .with_state(state)
}
