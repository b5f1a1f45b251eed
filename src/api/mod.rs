//! REST API route definitions
//!
//! Everything here is read-only and nested under /api, except the health
//! probes which sit at the root.

pub mod error;
pub mod filters;
pub mod health;
pub mod spells;

use axum::Router;

use crate::app::AppState;

/// Routes nested under /api
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(filters::router())
        .merge(spells::router())
}
