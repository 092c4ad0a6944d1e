//! Axum route handlers for the outreach wizard. One handler per button press.

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::profile::Intent;
use crate::outreach::workflow::{DraftEmailForm, ProfileForm, SearchOutcome, SetupStatus};
use crate::session::{SessionHandle, SessionState};
use crate::state::AppState;

const DOWNLOAD_FILE_NAME: &str = "proposal.txt";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub company: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct StartOutreachRequest {
    /// Index into the current job list; omit for a general partnership pitch.
    #[serde(default)]
    pub job_index: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct SetupResponse {
    pub status: SetupStatus,
    pub session: SessionState,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    #[serde(flatten)]
    pub outcome: SearchOutcome,
    pub session: SessionState,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<SessionState>) {
    let handle = state.sessions.create();
    let session = handle.lock().await.clone();
    tracing::info!(
        "Session {} started ({} active)",
        session.id,
        state.sessions.len()
    );
    (StatusCode::CREATED, Json(session))
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionState>, AppError> {
    let handle = find_session(&state, id)?;
    let session = handle.lock().await.clone();
    Ok(Json(session))
}

/// DELETE /api/v1/sessions/:id
pub async fn handle_end_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.sessions.remove(id) {
        tracing::info!("Session {id} ended");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(session_not_found(id))
    }
}

/// POST /api/v1/sessions/:id/setup
///
/// Landing → Setup.
pub async fn handle_begin_setup(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionState>, AppError> {
    let handle = find_session(&state, id)?;
    let mut session = handle.lock().await;
    session.begin_setup()?;
    Ok(Json(session.clone()))
}

/// POST /api/v1/sessions/:id/profile
///
/// Submits the persona and analyzes the institution website. Always advances
/// to Main when the form is complete, even if the site could not be scraped.
pub async fn handle_submit_profile(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(form): Json<ProfileForm>,
) -> Result<Json<SetupResponse>, AppError> {
    let handle = find_session(&state, id)?;
    let mut session = handle.lock().await;
    let status = state.pipeline.submit_profile(&mut session, form).await?;
    Ok(Json(SetupResponse {
        status,
        session: session.clone(),
    }))
}

/// POST /api/v1/sessions/:id/profile/edit
///
/// Main → Setup.
pub async fn handle_edit_profile(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionState>, AppError> {
    let handle = find_session(&state, id)?;
    let mut session = handle.lock().await;
    session.edit_profile()?;
    Ok(Json(session.clone()))
}

/// POST /api/v1/sessions/:id/search
///
/// Company research: report plus job list. Replaces the previous search.
pub async fn handle_search_company(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, AppError> {
    let handle = find_session(&state, id)?;
    let mut session = handle.lock().await;
    let outcome = state
        .pipeline
        .search_company(&mut session, &request.company)
        .await?;
    Ok(Json(SearchResponse {
        outcome,
        session: session.clone(),
    }))
}

/// POST /api/v1/sessions/:id/outreach
///
/// Opens an email draft for one job, or a general pitch when `job_index` is absent.
pub async fn handle_start_outreach(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<StartOutreachRequest>,
) -> Result<Json<SessionState>, AppError> {
    let handle = find_session(&state, id)?;
    let mut session = handle.lock().await;
    session.start_outreach(request.job_index)?;
    Ok(Json(session.clone()))
}

/// DELETE /api/v1/sessions/:id/outreach
pub async fn handle_clear_outreach(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionState>, AppError> {
    let handle = find_session(&state, id)?;
    let mut session = handle.lock().await;
    session.clear_outreach();
    Ok(Json(session.clone()))
}

/// POST /api/v1/sessions/:id/outreach/draft
pub async fn handle_draft_email(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(form): Json<DraftEmailForm>,
) -> Result<Json<SessionState>, AppError> {
    let handle = find_session(&state, id)?;
    let mut session = handle.lock().await;
    state.pipeline.draft_email(&mut session, form).await?;
    Ok(Json(session.clone()))
}

/// GET /api/v1/sessions/:id/outreach/download
///
/// The last generated email as a plain-text attachment.
pub async fn handle_download_email(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let handle = find_session(&state, id)?;
    let session = handle.lock().await;
    let email = session
        .latest_email()
        .ok_or_else(|| AppError::NotFound("No email has been generated yet".to_string()))?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{DOWNLOAD_FILE_NAME}\""),
            ),
        ],
        email.body_text.clone(),
    ))
}

/// GET /api/v1/intents
pub async fn handle_list_intents() -> Json<Vec<&'static str>> {
    Json(Intent::ALL.iter().map(|intent| intent.label()).collect())
}

fn find_session(state: &AppState, id: Uuid) -> Result<SessionHandle, AppError> {
    state.sessions.get(id).ok_or_else(|| session_not_found(id))
}

fn session_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Session {id} not found"))
}
