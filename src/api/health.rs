//! Liveness and catalog readiness probes
//!
//! `/healthz` answers as long as the process runs. `/readyz` answers 200 only
//! when every catalog table exists and can be queried, and 503 otherwise.

use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use serde::Serialize;
use tracing::warn;

use crate::app::AppState;
use crate::services::CatalogStatus;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

#[derive(Serialize)]
pub struct ReadyResponse {
    pub ready: bool,
    pub database: bool,
    #[serde(flatten)]
    pub catalog: Option<CatalogStatus>,
}

async fn healthz() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn readyz(State(state): State<AppState>) -> (StatusCode, Json<ReadyResponse>) {
    let response = match state.catalog.status().await {
        Ok(catalog) => ReadyResponse {
            ready: catalog.is_ready(),
            database: true,
            catalog: Some(catalog),
        },
        Err(e) => {
            warn!(error = %e, "Readiness check failed");
            ReadyResponse {
                ready: false,
                database: false,
                catalog: None,
            }
        }
    };

    let status = if response.ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(response))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
}
