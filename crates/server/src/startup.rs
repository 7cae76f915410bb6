use std::{env, net::SocketAddr, path::PathBuf, sync::Arc};

use axum::Router;
use common::utils::logging::init_logging_default;
use dotenvy::dotenv;
use tower_http::cors::CorsLayer;
use tracing::info;

use service::{
    project_service::{self, ProjectService},
    storage::json_document_store::JsonDocumentStore,
    time_entry_service::{self, TimeEntryService},
};

use crate::routes::{self, AppState};

/// Initialize logging via shared common utils
fn init_logging() {
    init_logging_default();
}

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Load host/port from configs or env vars, with sensible fallbacks
fn load_bind_addr() -> anyhow::Result<SocketAddr> {
    let (host, port) = match configs::load_default() {
        Ok(cfg) => {
            let s = cfg.server;
            (s.host, s.port)
        }
        Err(_) => {
            let host = env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
            let port = env::var("SERVER_PORT")
                .ok()
                .and_then(|p| p.parse::<u16>().ok())
                .unwrap_or(8081);
            (host, port)
        }
    };
    Ok(format!("{}:{}", host, port).parse()?)
}

/// Load the store's file path from configs or env vars
fn load_data_path() -> PathBuf {
    match configs::load_default() {
        Ok(cfg) => cfg.data_path(),
        Err(_) => {
            let dir = env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string());
            std::path::Path::new(&dir).join("records.json")
        }
    }
}

/// Public entry: build the app and run the HTTP server
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging();

    let data_path = load_data_path();
    if let Some(dir) = data_path.parent() {
        common::env::ensure_data_dir(&dir.to_string_lossy()).await?;
    }

    let store = JsonDocumentStore::new(
        &data_path,
        vec![time_entry_service::table_spec(), project_service::table_spec()],
    )
    .await?;

    let state = AppState {
        time_entries: Arc::new(TimeEntryService::new(Arc::clone(&store))),
        projects: Arc::new(ProjectService::new(store)),
    };

    let cors = build_cors();
    let app: Router = routes::build_router(state, cors);

    let addr = load_bind_addr()?;
    info!(%addr, data_path = %data_path.display(), "starting time tracking server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
