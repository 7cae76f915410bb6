use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;

use models::time_entry::{NewTimeEntry, TimeEntry, TimeEntryPatch};

use crate::errors::ApiError;
use crate::routes::AppState;

pub async fn list_all(State(state): State<AppState>) -> Result<Json<Vec<TimeEntry>>, ApiError> {
    let entries = state.time_entries.list_all().await?;
    info!(count = entries.len(), "list time entries");
    Ok(Json(entries))
}

pub async fn list_by_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<TimeEntry>>, ApiError> {
    let entries = state.time_entries.list_by_user(&id).await?;
    info!(user_id = %id, count = entries.len(), "list user time entries");
    Ok(Json(entries))
}

pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<NewTimeEntry>,
) -> Result<(StatusCode, Json<TimeEntry>), ApiError> {
    let entry = state.time_entries.create(input).await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<TimeEntryPatch>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.time_entries.update_by_id(&id, patch).await?;
    Ok(Json(serde_json::json!({"status": "ok"})))
}
