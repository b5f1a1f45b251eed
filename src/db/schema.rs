//! Catalog schema bootstrap
//!
//! Creates the normalized catalog tables and their lookup indexes if they are
//! missing. Never touches rows: the catalog is populated by a separate loader
//! and is read-only to this service.

use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info, warn};

/// Result of a schema bootstrap run
#[derive(Debug, Default)]
pub struct SchemaSyncResult {
    pub tables_created: Vec<String>,
    pub errors: Vec<String>,
}

/// Table name and its `CREATE TABLE IF NOT EXISTS` statement, in dependency order.
const TABLES: &[(&str, &str)] = &[
    (
        "schools",
        r#"CREATE TABLE IF NOT EXISTS schools (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            parent_id INTEGER REFERENCES schools(id)
        )"#,
    ),
    (
        "spell_types",
        r#"CREATE TABLE IF NOT EXISTS spell_types (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE
        )"#,
    ),
    (
        "spells",
        r#"CREATE TABLE IF NOT EXISTS spells (
            id INTEGER PRIMARY KEY,
            name_unique TEXT NOT NULL UNIQUE,
            type_id INTEGER NOT NULL REFERENCES spell_types(id),
            cost_numeric INTEGER,
            resistance TEXT,
            is_very_hard INTEGER NOT NULL DEFAULT 0,
            magery_level INTEGER NOT NULL DEFAULT 1,
            casting_time TEXT,
            duration TEXT,
            reference TEXT
        )"#,
    ),
    (
        "spell_schools",
        r#"CREATE TABLE IF NOT EXISTS spell_schools (
            spell_id INTEGER NOT NULL REFERENCES spells(id),
            school_id INTEGER NOT NULL REFERENCES schools(id),
            PRIMARY KEY (spell_id, school_id)
        )"#,
    ),
    (
        "spell_prerequisites",
        r#"CREATE TABLE IF NOT EXISTS spell_prerequisites (
            spell_id INTEGER NOT NULL REFERENCES spells(id),
            prerequisite_id INTEGER NOT NULL REFERENCES spells(id),
            PRIMARY KEY (spell_id, prerequisite_id)
        )"#,
    ),
    (
        "spell_translations",
        r#"CREATE TABLE IF NOT EXISTS spell_translations (
            id INTEGER PRIMARY KEY,
            spell_id INTEGER NOT NULL REFERENCES spells(id),
            language_code TEXT NOT NULL,
            name TEXT NOT NULL,
            description TEXT,
            cost_text TEXT,
            maintenance_cost_text TEXT,
            item_description TEXT,
            prerequisites_text TEXT,
            UNIQUE (spell_id, language_code)
        )"#,
    ),
];

const INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_spells_type ON spells(type_id)",
    "CREATE INDEX IF NOT EXISTS idx_spell_schools_school ON spell_schools(school_id)",
    "CREATE INDEX IF NOT EXISTS idx_spell_translations_lang_name ON spell_translations(language_code, name)",
];

/// Check if a table exists in the database
async fn table_exists(pool: &SqlitePool, table_name: &str) -> Result<bool, sqlx::Error> {
    let result: Option<(String,)> =
        sqlx::query_as("SELECT name FROM sqlite_master WHERE type='table' AND name = ?")
            .bind(table_name)
            .fetch_optional(pool)
            .await?;

    Ok(result.is_some())
}

/// Catalog tables absent from the database, in dependency order
pub async fn missing_tables(conn: &mut SqliteConnection) -> Result<Vec<&'static str>, sqlx::Error> {
    let present: Vec<String> =
        sqlx::query_scalar("SELECT name FROM sqlite_master WHERE type = 'table'")
            .fetch_all(&mut *conn)
            .await?;

    Ok(TABLES
        .iter()
        .map(|(name, _)| *name)
        .filter(|name| !present.iter().any(|p| p == name))
        .collect())
}

/// Create any missing catalog tables and indexes.
///
/// Failures are collected rather than aborting, so one bad statement doesn't
/// hide the rest; the caller decides whether the errors are fatal.
pub async fn ensure_schema(pool: &SqlitePool) -> SchemaSyncResult {
    let mut result = SchemaSyncResult::default();

    for (table_name, create_sql) in TABLES {
        let existed = match table_exists(pool, table_name).await {
            Ok(existed) => existed,
            Err(e) => {
                result
                    .errors
                    .push(format!("Failed to inspect table {}: {}", table_name, e));
                continue;
            }
        };
        if existed {
            continue;
        }

        debug!("Creating table {}", table_name);
        match sqlx::query(create_sql).execute(pool).await {
            Ok(_) => {
                info!("Created table: {}", table_name);
                result.tables_created.push(table_name.to_string());
            }
            Err(e) => {
                let msg = format!("Failed to create table {}: {}", table_name, e);
                warn!("{}", msg);
                result.errors.push(msg);
            }
        }
    }

    for index_sql in INDEXES {
        if let Err(e) = sqlx::query(index_sql).execute(pool).await {
            let msg = format!("Failed to create index: {}", e);
            warn!("{}", msg);
            result.errors.push(msg);
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::empty_database;

    #[tokio::test]
    async fn test_ensure_schema_creates_all_tables() {
        let (db, _dir) = empty_database().await;

        let result = ensure_schema(db.pool()).await;
        assert!(result.errors.is_empty(), "{:?}", result.errors);
        assert_eq!(result.tables_created.len(), TABLES.len());

        for (table_name, _) in TABLES {
            assert!(table_exists(db.pool(), table_name).await.unwrap());
        }
    }

    #[tokio::test]
    async fn test_missing_tables() {
        let (db, _dir) = empty_database().await;
        let mut conn = db.acquire().await.unwrap();
        assert_eq!(missing_tables(&mut conn).await.unwrap().len(), TABLES.len());

        ensure_schema(db.pool()).await;
        assert!(missing_tables(&mut conn).await.unwrap().is_empty());

        sqlx::query("DROP TABLE spell_prerequisites")
            .execute(&mut *conn)
            .await
            .unwrap();
        assert_eq!(missing_tables(&mut conn).await.unwrap(), vec!["spell_prerequisites"]);
    }

    #[tokio::test]
    async fn test_ensure_schema_is_idempotent() {
        let (db, _dir) = empty_database().await;

        ensure_schema(db.pool()).await;
        let second = ensure_schema(db.pool()).await;
        assert!(second.errors.is_empty(), "{:?}", second.errors);
        assert!(second.tables_created.is_empty());
    }
}
