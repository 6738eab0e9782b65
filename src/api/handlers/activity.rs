//! Activity log, unsaved-change, and save endpoints.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::dto::{ActivityEntryResponse, ChangesResponse, UnsavedChangeDto};
use crate::app_state::AppState;
use crate::error::{EditorError, ErrorResponse};

/// `GET /activity` — The activity log, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/activity",
    tag = "Activity",
    summary = "List activity entries",
    description = "Returns the bounded activity log (at most 100 entries), newest first, each with its summary and field diff.",
    responses(
        (status = 200, description = "Activity entries", body = Vec<ActivityEntryResponse>),
    )
)]
pub async fn list_activity(State(state): State<AppState>) -> impl IntoResponse {
    let entries = state.editor.activity_entries().await;
    let responses: Vec<ActivityEntryResponse> =
        entries.iter().map(ActivityEntryResponse::from).collect();
    Json(responses)
}

/// `POST /activity/{id}/rollback` — Reverse a prior mutation.
///
/// # Errors
///
/// Returns [`EditorError::EntryNotFound`],
/// [`EditorError::RollbackTargetMissing`] or
/// [`EditorError::RollbackUnsupported`].
#[utoipa::path(
    post,
    path = "/api/v1/activity/{id}/rollback",
    tag = "Activity",
    summary = "Roll back an entry",
    description = "Restores the entry's before state and forward-logs the reversal as a new entry. The original entry is untouched. Shop-file deletions and creations cannot be rolled back.",
    params(("id" = String, Path, description = "Activity entry id")),
    responses(
        (status = 200, description = "The forward-logged reversal entry", body = ActivityEntryResponse),
        (status = 404, description = "Entry or live target missing", body = ErrorResponse),
        (status = 422, description = "Entry kind not rollback-capable", body = ErrorResponse),
    )
)]
pub async fn rollback_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, EditorError> {
    let forward = state.editor.rollback(&id).await?;
    Ok(Json(ActivityEntryResponse::from(&forward)))
}

/// `DELETE /activity` — Clear the activity log.
///
/// # Errors
///
/// Returns [`EditorError::PersistenceError`] when the store fails.
#[utoipa::path(
    delete,
    path = "/api/v1/activity",
    tag = "Activity",
    summary = "Clear the activity log",
    responses(
        (status = 204, description = "Log cleared"),
        (status = 500, description = "Store failure", body = ErrorResponse),
    )
)]
pub async fn clear_activity(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, EditorError> {
    state.editor.clear_activity().await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `GET /changes` — Pending unsaved changes.
#[utoipa::path(
    get,
    path = "/api/v1/changes",
    tag = "Activity",
    summary = "List pending changes",
    description = "The queue of change descriptions since the last persisted save; rendered as the pre-save confirmation summary.",
    responses(
        (status = 200, description = "Pending changes", body = ChangesResponse),
    )
)]
pub async fn list_changes(State(state): State<AppState>) -> impl IntoResponse {
    let changes = state.editor.pending_changes().await;
    Json(ChangesResponse {
        changes: changes.iter().map(UnsavedChangeDto::from).collect(),
    })
}

/// `POST /save` — Manually save every dirty document.
///
/// # Errors
///
/// Returns [`EditorError::PersistenceError`] on a write failure; the
/// change queue is kept so a retry resubmits the same content.
#[utoipa::path(
    post,
    path = "/api/v1/save",
    tag = "Activity",
    summary = "Save everything",
    description = "Writes every document whose serialized text differs from its on-disk baseline, then drains the change queue.",
    responses(
        (status = 200, description = "Changes covered by the save", body = ChangesResponse),
        (status = 500, description = "Write failure; queue kept", body = ErrorResponse),
    )
)]
pub async fn save_all(State(state): State<AppState>) -> Result<impl IntoResponse, EditorError> {
    let saved = state.editor.save_all().await?;
    Ok(Json(ChangesResponse {
        changes: saved.iter().map(UnsavedChangeDto::from).collect(),
    }))
}

/// `POST /resync` — Discard memory and re-read everything from disk.
///
/// # Errors
///
/// Returns [`EditorError::PersistenceError`] on a read failure.
#[utoipa::path(
    post,
    path = "/api/v1/resync",
    tag = "Activity",
    summary = "Resync from disk",
    description = "Waits out in-flight saves, re-reads every configuration file, and drains the change queue. In-memory edits that were never saved are lost.",
    responses(
        (status = 200, description = "Changes discarded by the resync", body = ChangesResponse),
        (status = 500, description = "Read failure", body = ErrorResponse),
    )
)]
pub async fn resync(State(state): State<AppState>) -> Result<impl IntoResponse, EditorError> {
    let discarded = state.editor.resync().await?;
    Ok(Json(ChangesResponse {
        changes: discarded.iter().map(UnsavedChangeDto::from).collect(),
    }))
}

/// Activity and save routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/activity", get(list_activity).delete(clear_activity))
        .route("/activity/{id}/rollback", post(rollback_entry))
        .route("/changes", get(list_changes))
        .route("/save", post(save_all))
        .route("/resync", post(resync))
}
