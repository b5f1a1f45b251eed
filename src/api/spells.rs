//! Spell listing endpoint

use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::PathRejection},
    routing::get,
};
use serde::Serialize;
use tracing::debug;

use super::error::ApiError;
use crate::app::AppState;
use crate::pagination::{PageRequest, Pagination};
use crate::query::{Language, SortKey, SpellListRequest};
use crate::services::ProjectedSpell;

/// Raw query parameters. Values stay strings so malformed input falls back
/// to defaults instead of being rejected by the extractor.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SpellListQuery {
    pub page: Option<String>,
    pub sort: Option<String>,
    pub school: Option<String>,
    pub spell_type: Option<String>,
}

impl SpellListQuery {
    /// Collect the known keys from decoded query pairs. The first occurrence
    /// of a repeated key wins and unknown keys are ignored.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut query = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "page" => &mut query.page,
                "sort" => &mut query.sort,
                "school" => &mut query.school,
                "type" => &mut query.spell_type,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        query
    }

    pub fn into_request(self, language: Language) -> SpellListRequest {
        SpellListRequest::new(language)
            .page(PageRequest::parse(self.page.as_deref()))
            .sort(self.sort.as_deref().map(SortKey::parse).unwrap_or_default())
            .school(self.school)
            .spell_type(self.spell_type)
    }
}

#[derive(Debug, Serialize)]
pub struct SpellListResponse {
    pub spells: Vec<ProjectedSpell>,
    pub pagination: Pagination,
}

/// Language from the path segment. A segment that can't be decoded falls
/// back to the default language like any other unknown value.
fn path_language(lang: Result<Path<String>, PathRejection>) -> Language {
    match lang {
        Ok(Path(lang)) => Language::resolve(&lang),
        Err(rejection) => {
            debug!(error = %rejection, "Undecodable language segment, using default");
            Language::default()
        }
    }
}

/// One page of spells in the language named by the path
async fn list_spells(
    State(state): State<AppState>,
    lang: Result<Path<String>, PathRejection>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<SpellListResponse>, ApiError> {
    let request = SpellListQuery::from_pairs(pairs).into_request(path_language(lang));
    let page = state.catalog.list_spells(&request).await?;

    Ok(Json(SpellListResponse {
        spells: page.items,
        pagination: page.pagination,
    }))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/magias/{lang}", get(list_spells))
}
