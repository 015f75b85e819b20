mod admin_routes;
mod editor_routes;
mod extract;
mod ftp_routes;
mod response;

pub use extract::ApiJson;

use crate::crypto::PasswordCipher;
use crate::error::Result;
use crate::ftp::RemoteFiles;
use crate::storage::Storage;
use axum::{
    http::Method,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use hyper::Server;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

/// Collaborators shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<dyn Storage>,
    pub files: Arc<dyn RemoteFiles>,
    pub cipher: Arc<PasswordCipher>,
}

impl AppState {
    pub fn new(storage: Arc<dyn Storage>, files: Arc<dyn RemoteFiles>, cipher: Arc<PasswordCipher>) -> Self {
        Self { storage, files, cipher }
    }
}

/// Health check endpoint
async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "site-editor",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Create the HTTP router with all API routes
pub fn create_server(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/api/projects", get(ftp_routes::list_projects))
        // FTP file access
        .route("/api/ftp/read", post(ftp_routes::read_file))
        .route("/api/ftp/write", post(ftp_routes::write_file))
        .route("/api/ftp/list", post(ftp_routes::list_files))
        // Fragment editor
        .route("/api/editor/events/parse", post(editor_routes::parse_events))
        .route("/api/editor/events/generate", post(editor_routes::generate_events))
        .route("/api/editor/schedule/parse", post(editor_routes::parse_schedule))
        .route("/api/editor/schedule/generate", post(editor_routes::generate_schedule))
        .route("/api/editor/preview", post(editor_routes::preview))
        // Administration
        .route(
            "/api/admin/users",
            get(admin_routes::list_users)
                .post(admin_routes::create_user)
                .delete(admin_routes::delete_user),
        )
        .route(
            "/api/admin/projects",
            post(admin_routes::create_project)
                .put(admin_routes::update_project)
                .delete(admin_routes::delete_project),
        )
        .route(
            "/api/admin/projects/assign",
            get(admin_routes::list_assignments)
                .post(admin_routes::assign_project)
                .delete(admin_routes::unassign_project),
        )
        .route("/api/admin/projects/test", post(admin_routes::test_connection))
        .with_state(state)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()).layer(cors))
}

/// Start the HTTP server on the given address
pub async fn start_server(state: AppState, host: &str, port: u16) -> Result<()> {
    let app = create_server(state);

    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .map_err(|e| crate::error::EditorError::Config(format!("invalid listen address {host}:{port}: {e}")))?;

    info!("HTTP server running on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    Server::try_bind(&addr)?.serve(app.into_make_service()).await?;

    Ok(())
}
