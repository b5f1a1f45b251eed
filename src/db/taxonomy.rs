//! School and spell type lookups used to populate the listing filters

use sqlx::SqliteConnection;

use super::entities::{SchoolRecord, SpellTypeRecord};

pub struct TaxonomyRepository<'c> {
    conn: &'c mut SqliteConnection,
}

impl<'c> TaxonomyRepository<'c> {
    pub fn new(conn: &'c mut SqliteConnection) -> Self {
        Self { conn }
    }

    /// All schools, sorted by name
    pub async fn list_schools(&mut self) -> Result<Vec<SchoolRecord>, sqlx::Error> {
        sqlx::query_as::<_, SchoolRecord>("SELECT id, name, parent_id FROM schools ORDER BY name")
            .fetch_all(&mut *self.conn)
            .await
    }

    /// All spell types, sorted by name
    pub async fn list_spell_types(&mut self) -> Result<Vec<SpellTypeRecord>, sqlx::Error> {
        sqlx::query_as::<_, SpellTypeRecord>("SELECT id, name FROM spell_types ORDER BY name")
            .fetch_all(&mut *self.conn)
            .await
    }
}
