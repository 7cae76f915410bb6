use std::sync::Arc;

use axum::{
    routing::{get, put},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use common::types::Health;
use service::{
    project_service::ProjectService, storage::json_document_store::JsonDocumentStore,
    time_entry_service::TimeEntryService,
};

pub mod projects;
pub mod time_entries;

/// Shared handler state: the two record services over the file-backed store.
#[derive(Clone)]
pub struct AppState {
    pub time_entries: Arc<TimeEntryService<JsonDocumentStore>>,
    pub projects: Arc<ProjectService<JsonDocumentStore>>,
}

pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

/// Build the full application router.
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    let api = Router::new()
        .route(
            "/time-entries",
            get(time_entries::list_all).post(time_entries::create),
        )
        .route("/time-entries/:id", put(time_entries::update))
        .route("/users/:id/time-entries", get(time_entries::list_by_user))
        .route("/projects", get(projects::list_all).post(projects::create))
        .route("/projects/:id", get(projects::get_by_id))
        .route("/users/:id/projects", get(projects::list_by_user));

    Router::new()
        .route("/health", get(health))
        .merge(api)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
