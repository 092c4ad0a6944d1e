pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::outreach::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/intents", get(handlers::handle_list_intents))
        // Session lifecycle
        .route("/api/v1/sessions", post(handlers::handle_create_session))
        .route(
            "/api/v1/sessions/:id",
            get(handlers::handle_get_session).delete(handlers::handle_end_session),
        )
        // Landing → Setup → Main
        .route(
            "/api/v1/sessions/:id/setup",
            post(handlers::handle_begin_setup),
        )
        .route(
            "/api/v1/sessions/:id/profile",
            post(handlers::handle_submit_profile),
        )
        .route(
            "/api/v1/sessions/:id/profile/edit",
            post(handlers::handle_edit_profile),
        )
        // Main: research and outreach
        .route(
            "/api/v1/sessions/:id/search",
            post(handlers::handle_search_company),
        )
        .route(
            "/api/v1/sessions/:id/outreach",
            post(handlers::handle_start_outreach).delete(handlers::handle_clear_outreach),
        )
        .route(
            "/api/v1/sessions/:id/outreach/draft",
            post(handlers::handle_draft_email),
        )
        .route(
            "/api/v1/sessions/:id/outreach/download",
            get(handlers::handle_download_email),
        )
        .with_state(state)
}
