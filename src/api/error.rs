//! Error responses for the REST endpoints

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::services::CatalogError;

/// Body of every error response
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub erro: String,
}

/// A failed API request. Every variant maps to a 500; client input never fails a request.
#[derive(Debug)]
pub struct ApiError(CatalogError);

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self.0, "Catalog request failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorBody {
                erro: format!("Ocorreu um erro ao buscar os dados: {}", self.0),
            }),
        )
            .into_response()
    }
}
