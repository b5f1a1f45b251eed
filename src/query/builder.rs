//! SQL query builder for spell listings
//!
//! Compiles a [SpellListRequest] into parameterized SQL over the normalized
//! catalog tables. Every client-supplied value is a bound parameter; the SQL
//! text itself is assembled only from static fragments.

use sqlx::sqlite::SqliteArguments;
use sqlx::query::QueryScalar;
use sqlx::Sqlite;

use super::request::{Language, SpellListRequest};
use super::sort::SortKey;
use crate::pagination::PageRequest;

/// A related table the listing query can join to `spells s`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    /// `spell_translations t`, restricted to the request language in the ON clause
    Translation,
    /// `spell_schools ss` + `schools sc`
    Schools,
    /// `spell_types ty`
    SpellType,
}

impl Relation {
    fn join_sql(&self) -> &'static str {
        match self {
            Relation::Translation => {
                "LEFT JOIN spell_translations t ON t.spell_id = s.id AND t.language_code = ?"
            }
            Relation::Schools => {
                "INNER JOIN spell_schools ss ON ss.spell_id = s.id \
                 INNER JOIN schools sc ON sc.id = ss.school_id"
            }
            Relation::SpellType => "INNER JOIN spell_types ty ON ty.id = s.type_id",
        }
    }

    /// Whether joining this relation can change which spells match.
    /// The translation join is a LEFT join on a unique key, so it can't.
    fn restricts_rows(&self) -> bool {
        !matches!(self, Relation::Translation)
    }
}

/// A value bound to a `?` placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlValue {
    Text(String),
    Int(i64),
}

impl SqlValue {
    /// Bind this value to a scalar query
    pub fn bind_to_scalar<'q, O>(
        &'q self,
        query: QueryScalar<'q, Sqlite, O, SqliteArguments<'q>>,
    ) -> QueryScalar<'q, Sqlite, O, SqliteArguments<'q>> {
        match self {
            SqlValue::Text(s) => query.bind(s.as_str()),
            SqlValue::Int(i) => query.bind(*i),
        }
    }
}

/// A query over spell ids with filters, ordering and an optional page window.
///
/// Relations are joined at most once no matter how many filters or sort keys
/// need them, and results are grouped by spell id so a spell matching through
/// several join rows is returned once.
#[derive(Debug, Clone)]
pub struct SpellQuery {
    language: Language,
    joins: Vec<Relation>,
    conditions: Vec<(&'static str, SqlValue)>,
    sort: SortKey,
    limit: Option<i64>,
    offset: Option<i64>,
}

impl SpellQuery {
    pub fn new(language: Language) -> Self {
        Self {
            language,
            joins: Vec::new(),
            conditions: Vec::new(),
            sort: SortKey::default(),
            limit: None,
            offset: None,
        }
    }

    /// Build the unpaginated query for a listing request.
    pub fn from_request(request: &SpellListRequest) -> Self {
        Self::new(request.language)
            .sort(request.sort)
            .school(request.school.as_deref())
            .spell_type(request.spell_type.as_deref())
    }

    /// Join a relation unless it is already joined.
    pub fn require(mut self, relation: Relation) -> Self {
        if !self.joins.contains(&relation) {
            self.joins.push(relation);
        }
        self
    }

    pub fn sort(mut self, sort: SortKey) -> Self {
        self.sort = sort;
        match sort.required_relation() {
            Some(relation) => self.require(relation),
            None => self,
        }
    }

    /// Restrict to spells belonging to the school with this exact name.
    pub fn school(self, name: Option<&str>) -> Self {
        match name {
            Some(name) => self
                .require(Relation::Schools)
                .condition("sc.name = ?", SqlValue::Text(name.to_string())),
            None => self,
        }
    }

    /// Restrict to spells of the type with this exact name.
    pub fn spell_type(self, name: Option<&str>) -> Self {
        match name {
            Some(name) => self
                .require(Relation::SpellType)
                .condition("ty.name = ?", SqlValue::Text(name.to_string())),
            None => self,
        }
    }

    fn condition(mut self, sql: &'static str, value: SqlValue) -> Self {
        self.conditions.push((sql, value));
        self
    }

    /// Apply a page window.
    pub fn paginate(mut self, page: &PageRequest) -> Self {
        self.limit = Some(page.limit());
        self.offset = Some(page.offset());
        self
    }

    #[cfg(test)]
    pub fn joins(&self) -> &[Relation] {
        &self.joins
    }

    /// Shared FROM/JOIN/WHERE part. The count query skips joins that can't
    /// change the matching set, together with their bound values.
    fn push_from_where(&self, sql: &mut String, values: &mut Vec<SqlValue>, for_count: bool) {
        sql.push_str(" FROM spells s");

        for relation in &self.joins {
            if for_count && !relation.restricts_rows() {
                continue;
            }
            sql.push(' ');
            sql.push_str(relation.join_sql());
            if *relation == Relation::Translation {
                values.push(SqlValue::Text(self.language.code().to_string()));
            }
        }

        if !self.conditions.is_empty() {
            let clauses: Vec<&str> = self.conditions.iter().map(|(c, _)| *c).collect();
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
            values.extend(self.conditions.iter().map(|(_, v)| v.clone()));
        }
    }

    /// SQL selecting the ordered, de-duplicated spell ids and its bind values.
    pub fn build_sql(&self) -> (String, Vec<SqlValue>) {
        let mut sql = String::from("SELECT s.id");
        let mut values = Vec::new();
        self.push_from_where(&mut sql, &mut values, false);

        sql.push_str(" GROUP BY s.id ORDER BY ");
        sql.push_str(self.sort.order_sql());

        if let Some(limit) = self.limit {
            sql.push_str(&format!(" LIMIT {}", limit));
            if let Some(offset) = self.offset {
                if offset > 0 {
                    sql.push_str(&format!(" OFFSET {}", offset));
                }
            }
        }

        (sql, values)
    }

    /// SQL counting distinct matching spells, ignoring ordering and paging.
    pub fn build_count_sql(&self) -> (String, Vec<SqlValue>) {
        let mut sql = String::from("SELECT COUNT(DISTINCT s.id)");
        let mut values = Vec::new();
        self.push_from_where(&mut sql, &mut values, true);
        (sql, values)
    }
}
