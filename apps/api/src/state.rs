use crate::outreach::workflow::Pipeline;
use crate::session::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionStore,
    /// LLM, scraper, search and portfolio collaborators, each behind a trait object.
    pub pipeline: Pipeline,
}
