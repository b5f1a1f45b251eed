//! Spell database repository
//!
//! Runs compiled [SpellQuery] listings and eagerly loads the relations of a
//! page of spells. Loading a page costs a fixed four queries (spells with
//! their type, schools, prerequisite links, translations) no matter how many
//! spells it holds.

use std::collections::{BTreeSet, HashMap};

use sqlx::SqliteConnection;
use sqlx::sqlite::SqliteRow;
use tracing::debug;

use super::entities::{
    PrerequisiteAggregate, PrerequisiteLink, SpellAggregate, SpellRecord, SpellSchoolLink,
    SpellTranslationRecord,
};
use crate::query::SpellQuery;

const SPELLS_BY_ID_SQL: &str = r#"
    SELECT s.id, s.name_unique, s.type_id, ty.name AS type_name, s.cost_numeric,
           s.resistance, s.is_very_hard, s.magery_level, s.casting_time, s.duration,
           s.reference
    FROM spells s
    INNER JOIN spell_types ty ON ty.id = s.type_id
    WHERE s.id IN ({ids})
"#;

const SCHOOLS_BY_SPELL_SQL: &str = r#"
    SELECT ss.spell_id, sc.name AS school_name
    FROM spell_schools ss
    INNER JOIN schools sc ON sc.id = ss.school_id
    WHERE ss.spell_id IN ({ids})
    ORDER BY sc.name
"#;

const PREREQUISITES_BY_SPELL_SQL: &str = r#"
    SELECT p.spell_id, p.prerequisite_id, r.name_unique AS prerequisite_name_unique
    FROM spell_prerequisites p
    INNER JOIN spells r ON r.id = p.prerequisite_id
    WHERE p.spell_id IN ({ids})
    ORDER BY p.spell_id, p.prerequisite_id
"#;

const TRANSLATIONS_BY_SPELL_SQL: &str = r#"
    SELECT id, spell_id, language_code, name, description, cost_text,
           maintenance_cost_text, item_description, prerequisites_text
    FROM spell_translations
    WHERE spell_id IN ({ids})
    ORDER BY spell_id, language_code
"#;

/// Repository over one request-scoped connection.
pub struct SpellRepository<'c> {
    conn: &'c mut SqliteConnection,
}

impl<'c> SpellRepository<'c> {
    pub fn new(conn: &'c mut SqliteConnection) -> Self {
        Self { conn }
    }

    /// Count distinct spells matching the query's filters.
    pub async fn count(&mut self, query: &SpellQuery) -> Result<i64, sqlx::Error> {
        let (sql, values) = query.build_count_sql();
        debug!(sql = %sql, "Executing spell count query");

        let mut scalar = sqlx::query_scalar::<_, i64>(&sql);
        for value in &values {
            scalar = value.bind_to_scalar(scalar);
        }
        scalar.fetch_one(&mut *self.conn).await
    }

    /// Fetch the ordered, de-duplicated spell ids selected by the query.
    pub async fn fetch_ids(&mut self, query: &SpellQuery) -> Result<Vec<i64>, sqlx::Error> {
        let (sql, values) = query.build_sql();
        debug!(sql = %sql, "Executing spell id query");

        let mut scalar = sqlx::query_scalar::<_, i64>(&sql);
        for value in &values {
            scalar = value.bind_to_scalar(scalar);
        }
        scalar.fetch_all(&mut *self.conn).await
    }

    /// Load full aggregates for the given spells, preserving the order of `ids`.
    ///
    /// Prerequisites are resolved one level deep with their own translations;
    /// their prerequisites are never followed, so cycles are harmless.
    pub async fn load_aggregates(&mut self, ids: &[i64]) -> Result<Vec<SpellAggregate>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let spells: Vec<SpellRecord> = fetch_by_ids(&mut *self.conn, SPELLS_BY_ID_SQL, ids).await?;
        let school_links: Vec<SpellSchoolLink> =
            fetch_by_ids(&mut *self.conn, SCHOOLS_BY_SPELL_SQL, ids).await?;
        let prerequisite_links: Vec<PrerequisiteLink> =
            fetch_by_ids(&mut *self.conn, PREREQUISITES_BY_SPELL_SQL, ids).await?;

        // One translation query covers the page and every prerequisite it references
        let translation_ids: Vec<i64> = ids
            .iter()
            .copied()
            .chain(prerequisite_links.iter().map(|p| p.prerequisite_id))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let translations: Vec<SpellTranslationRecord> =
            fetch_by_ids(&mut *self.conn, TRANSLATIONS_BY_SPELL_SQL, &translation_ids).await?;

        debug!(
            spells = spells.len(),
            schools = school_links.len(),
            prerequisites = prerequisite_links.len(),
            translations = translations.len(),
            "Batch loaded spell aggregates"
        );

        let mut translations_by_spell: HashMap<i64, Vec<SpellTranslationRecord>> = HashMap::new();
        for translation in translations {
            translations_by_spell
                .entry(translation.spell_id)
                .or_default()
                .push(translation);
        }

        let mut schools_by_spell: HashMap<i64, Vec<String>> = HashMap::new();
        for link in school_links {
            schools_by_spell
                .entry(link.spell_id)
                .or_default()
                .push(link.school_name);
        }

        let mut prerequisites_by_spell: HashMap<i64, Vec<PrerequisiteAggregate>> = HashMap::new();
        for link in prerequisite_links {
            let translations = translations_by_spell
                .get(&link.prerequisite_id)
                .cloned()
                .unwrap_or_default();
            prerequisites_by_spell
                .entry(link.spell_id)
                .or_default()
                .push(PrerequisiteAggregate {
                    id: link.prerequisite_id,
                    name_unique: link.prerequisite_name_unique,
                    translations,
                });
        }

        let mut spells_by_id: HashMap<i64, SpellRecord> =
            spells.into_iter().map(|s| (s.id, s)).collect();

        let aggregates = ids
            .iter()
            .filter_map(|id| {
                let spell = spells_by_id.remove(id)?;
                Some(SpellAggregate {
                    schools: schools_by_spell.remove(id).unwrap_or_default(),
                    translations: translations_by_spell.remove(id).unwrap_or_default(),
                    prerequisites: prerequisites_by_spell.remove(id).unwrap_or_default(),
                    spell,
                })
            })
            .collect();

        Ok(aggregates)
    }
}

/// Run a `{ids}` templated query with one bound parameter per id.
async fn fetch_by_ids<T>(
    conn: &mut SqliteConnection,
    sql_template: &str,
    ids: &[i64],
) -> Result<Vec<T>, sqlx::Error>
where
    T: for<'r> sqlx::FromRow<'r, SqliteRow> + Send + Unpin,
{
    let placeholders = vec!["?"; ids.len()].join(", ");
    let sql = sql_template.replace("{ids}", &placeholders);

    let mut query = sqlx::query_as::<_, T>(&sql);
    for id in ids {
        query = query.bind(*id);
    }
    query.fetch_all(&mut *conn).await
}
