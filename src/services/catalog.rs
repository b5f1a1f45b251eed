//! Spell catalog service
//!
//! Runs one listing request end to end on a single pooled connection:
//! count, page window, id slice, batched aggregate load, projection.

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, instrument};

use super::assembler::{ProjectedSpell, project_all};
use crate::db::schema::missing_tables;
use crate::db::{Database, SpellRepository, TaxonomyRepository};
use crate::pagination::{Page, Pagination};
use crate::query::{SpellListRequest, SpellQuery};

/// Catalog error type
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Storage failure, including pool acquire timeouts
    #[error("{0}")]
    Database(#[from] sqlx::Error),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Names available for the school and type filters
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FilterOptions {
    #[serde(rename = "escolas")]
    pub schools: Vec<String>,
    #[serde(rename = "tipos")]
    pub spell_types: Vec<String>,
}

/// Whether the catalog can answer listing requests
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CatalogStatus {
    pub missing_tables: Vec<&'static str>,
    /// Number of spells, once every table is present
    pub spells: Option<i64>,
}

impl CatalogStatus {
    pub fn is_ready(&self) -> bool {
        self.missing_tables.is_empty()
    }
}

pub struct CatalogService {
    db: Database,
}

impl CatalogService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// One page of spells in the requested language.
    #[instrument(
        skip(self, request),
        fields(
            language = request.language.code(),
            sort = request.sort.as_str(),
            page = request.page.page()
        )
    )]
    pub async fn list_spells(
        &self,
        request: &SpellListRequest,
    ) -> CatalogResult<Page<ProjectedSpell>> {
        let mut conn = self.db.acquire().await?;
        let mut repo = SpellRepository::new(&mut conn);

        let query = SpellQuery::from_request(request);
        let total_items = repo.count(&query).await?;
        let pagination = Pagination::new(request.page, total_items);

        if pagination.is_out_of_range() {
            debug!(total_items, total_pages = pagination.total_pages, "Page out of range");
            return Ok(Page::empty(pagination));
        }

        let ids = repo.fetch_ids(&query.paginate(&request.page)).await?;
        let aggregates = repo.load_aggregates(&ids).await?;
        let items = project_all(&aggregates, request.language);

        debug!(
            total_items,
            sliced = ids.len(),
            returned = items.len(),
            "Listed spells"
        );

        Ok(Page { items, pagination })
    }

    /// Check the catalog tables and count the spells in them.
    pub async fn status(&self) -> CatalogResult<CatalogStatus> {
        let mut conn = self.db.acquire().await?;

        let missing_tables = missing_tables(&mut conn).await?;
        let spells = if missing_tables.is_empty() {
            Some(
                sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM spells")
                    .fetch_one(&mut *conn)
                    .await?,
            )
        } else {
            None
        };

        Ok(CatalogStatus {
            missing_tables,
            spells,
        })
    }

    /// School and spell type names, each sorted by name.
    pub async fn filter_options(&self) -> CatalogResult<FilterOptions> {
        let mut conn = self.db.acquire().await?;
        let mut repo = TaxonomyRepository::new(&mut conn);

        let schools = repo.list_schools().await?;
        let spell_types = repo.list_spell_types().await?;

        Ok(FilterOptions {
            schools: schools.into_iter().map(|s| s.name).collect(),
            spell_types: spell_types.into_iter().map(|t| t.name).collect(),
        })
    }
}
