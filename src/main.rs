//! Grimoire - read-only spell catalog service
//!
//! Serves the spell listing and filter endpoints under /api and the static
//! catalog page at /.

mod api;
mod app;
mod config;
mod db;
mod pagination;
mod query;
mod services;
#[cfg(test)]
mod test_support;

#[cfg(not(feature = "sqlite"))]
compile_error!("grimoire requires the `sqlite` feature");

use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};

use crate::app::{AppState, build_app};
use crate::config::Config;
use crate::db::Database;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Arc::new(Config::from_env()?);

    services::init_tracing(config.log_format);
    info!("Starting Grimoire");

    db::ensure_parent_dir(&config.database_url)?;
    let db = Database::connect_with_retry(
        &config.database_url,
        &config.pool,
        config.connect_timeout,
    )
    .await?;
    info!(url = %config.database_url, "Database connected");

    let schema = db::schema::ensure_schema(db.pool()).await;
    if !schema.errors.is_empty() {
        warn!(errors = ?schema.errors, "Schema bootstrap finished with errors");
    }
    info!(tables_created = ?schema.tables_created, "Schema ready");

    let state = AppState::new(config.clone(), db.clone());
    let app = build_app(state);

    let listener = tokio::net::TcpListener::bind((config.host.as_str(), config.port))
        .await
        .context("HTTP server: bind failed")?;
    info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("axum::serve")?;

    db.close().await;
    info!("Shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}
