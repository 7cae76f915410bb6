use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::info;

use models::project::{NewProject, Project};

use crate::errors::ApiError;
use crate::routes::AppState;

pub async fn list_all(State(state): State<AppState>) -> Result<Json<Vec<Project>>, ApiError> {
    let projects = state.projects.list_all().await?;
    info!(count = projects.len(), "list projects");
    Ok(Json(projects))
}

pub async fn list_by_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Project>>, ApiError> {
    let projects = state.projects.get_by_user(&id).await?;
    info!(user_id = %id, count = projects.len(), "list user projects");
    Ok(Json(projects))
}

pub async fn create(
    State(state): State<AppState>,
    Json(input): Json<NewProject>,
) -> Result<(StatusCode, Json<Project>), ApiError> {
    let project = state.projects.create(input).await?;
    Ok((StatusCode::CREATED, Json(project)))
}

pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Project>, ApiError> {
    match state.projects.get_by_id(&id).await? {
        Some(project) => Ok(Json(project)),
        None => Err(ApiError::not_found("project")),
    }
}
