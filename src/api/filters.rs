//! Filter option endpoint

use axum::{Json, Router, extract::State, routing::get};

use super::error::ApiError;
use crate::app::AppState;
use crate::services::FilterOptions;

/// School and spell type names for the listing filters
async fn list_filters(State(state): State<AppState>) -> Result<Json<FilterOptions>, ApiError> {
    Ok(Json(state.catalog.filter_options().await?))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/filtros", get(list_filters))
}
