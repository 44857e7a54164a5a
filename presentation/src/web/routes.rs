//! Route table for the web UI.

use super::handlers;
use super::state::AppState;
use axum::Router;
use axum::routing::{get, post};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/healthz", get(handlers::healthz))
        .route("/api/sessions", post(handlers::create_session))
        .route(
            "/api/sessions/{id}",
            get(handlers::get_session).delete(handlers::delete_session),
        )
        .route(
            "/api/sessions/{id}/questions",
            post(handlers::generate_questions),
        )
        .route("/api/sessions/{id}/answers", post(handlers::generate_answers))
        .with_state(state)
}
