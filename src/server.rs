use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::{Method, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use hyper::Server;
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::catalog::{CatalogIndexer, CatalogLoader, CatalogTree, TagRecord};
use crate::config::CatalogConfig;
use crate::constants::normalize_prefix;

/// Shared, read-only state handed to every request.
#[derive(Clone)]
pub struct AppState {
    pub tree: Arc<CatalogTree>,
    pub loader: Arc<CatalogLoader>,
}

impl AppState {
    pub fn new(tree: CatalogTree, loader: CatalogLoader) -> Self {
        Self {
            tree: Arc::new(tree),
            loader: Arc::new(loader),
        }
    }

    /// Scan the catalog once and prepare the loader for the same root.
    pub fn from_config(catalog: &CatalogConfig) -> Self {
        let tree = CatalogIndexer::new(&catalog.data_dir)
            .with_extension(catalog.extension.clone())
            .with_max_depth(catalog.max_depth)
            .build();
        Self::new(tree, CatalogLoader::new(&catalog.data_dir))
    }
}

#[derive(Debug, Deserialize)]
pub struct TagsQuery {
    pub file: Option<String>,
}

/// Health check endpoint
async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "tag_catalog",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// The directory tree of catalog files, computed at startup
async fn list_files(State(state): State<AppState>) -> Response {
    Json(state.tree.as_ref()).into_response()
}

/// Normalized tags of one catalog file, `[]` when no file is given
async fn list_tags(
    State(state): State<AppState>,
    query: Result<Query<TagsQuery>, QueryRejection>,
) -> Response {
    let Query(query) = match query {
        Ok(query) => query,
        Err(rejection) => {
            warn!("Rejected tags query: {}", rejection);
            return error_response(StatusCode::BAD_REQUEST, rejection.body_text());
        }
    };
    let Some(file) = query.file else {
        return Json(Vec::<TagRecord>::new()).into_response();
    };

    let loader = state.loader.clone();
    let requested = file.clone();
    match tokio::task::spawn_blocking(move || loader.load(&requested)).await {
        Ok(Ok(records)) => Json(records).into_response(),
        Ok(Err(e)) => {
            warn!(file = %file, kind = e.kind(), "Error loading tags: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
        Err(e) => {
            error!(file = %file, "Tag loading task failed: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

fn error_response(status: StatusCode, message: String) -> Response {
    (status, Json(serde_json::json!({ "error": message }))).into_response()
}

fn api_routes(web_dir: &Path) -> Router<AppState> {
    Router::new()
        .route("/api/files", get(list_files))
        .route("/api/tags", get(list_tags))
        .nest_service("/web", ServeDir::new(web_dir))
}

/// Create the HTTP router with the API mounted under `prefix`
pub fn create_server(state: AppState, prefix: &str, web_dir: &Path) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET])
        .allow_headers(Any);

    let prefix = normalize_prefix(prefix);
    let api = api_routes(web_dir);
    // axum refuses to nest at "/"
    let router = if prefix.is_empty() {
        Router::new().merge(api)
    } else {
        Router::new().nest(&prefix, api)
    };

    router
        .route("/health", get(health))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

/// Serve until ctrl-c
pub async fn start_server(
    state: AppState,
    addr: SocketAddr,
    prefix: &str,
    web_dir: &Path,
) -> anyhow::Result<()> {
    let app = create_server(state, prefix, web_dir);
    let prefix = normalize_prefix(prefix);

    info!("HTTP server running on http://{}", addr);
    info!("Catalog tree: http://{}{}/api/files", addr, prefix);
    info!("Tags:         http://{}{}/api/tags?file=<path>", addr, prefix);
    info!("Health check: http://{}/health", addr);

    Server::try_bind(&addr)?
        .serve(app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
