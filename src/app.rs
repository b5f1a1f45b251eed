//! Application state and HTTP router construction.

use std::sync::Arc;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::api;
use crate::config::Config;
use crate::db::Database;
use crate::services::CatalogService;

/// Shared state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub db: Database,
    pub catalog: Arc<CatalogService>,
}

impl AppState {
    pub fn new(config: Arc<Config>, db: Database) -> Self {
        Self {
            catalog: Arc::new(CatalogService::new(db.clone())),
            config,
            db,
        }
    }
}

/// Build the full Axum router: /api, health probes, the entry page and
/// static assets. Returns Router<()> (state fully applied) for use with axum::serve.
pub fn build_app(state: AppState) -> Router<()> {
    let static_dir = state.config.static_dir.clone();

    Router::new()
        .nest("/api", api::router())
        .merge(api::health::router())
        .route_service("/", ServeFile::new(static_dir.join("index.html")))
        .nest_service("/static", ServeDir::new(&static_dir))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
