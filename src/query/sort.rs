//! Allow-listed sort keys for spell listings.

use super::builder::Relation;

/// Sort key accepted from clients.
///
/// Each variant maps to a fixed ORDER BY fragment. Client text is only ever
/// matched against this closed set and never copied into SQL.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    /// Book order
    #[default]
    Id,
    /// Localized name in the requested language
    Name,
    /// Numeric energy cost
    Cost,
    /// Required magery level
    Magery,
}

impl SortKey {
    /// Resolve a client-supplied sort value. Unknown values fall back to [SortKey::Id].
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "id" => SortKey::Id,
            "name" | "nome" => SortKey::Name,
            "cost" | "custo" => SortKey::Cost,
            "magery" => SortKey::Magery,
            _ => SortKey::Id,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Id => "id",
            SortKey::Name => "name",
            SortKey::Cost => "cost",
            SortKey::Magery => "magery",
        }
    }

    /// ORDER BY fragment. Always ends on `s.id` so equal keys keep book order.
    pub fn order_sql(&self) -> &'static str {
        match self {
            SortKey::Id => "s.id ASC",
            SortKey::Name => "t.name IS NULL, t.name COLLATE NOCASE ASC, s.id ASC",
            SortKey::Cost => "s.cost_numeric IS NULL, s.cost_numeric ASC, s.id ASC",
            SortKey::Magery => "s.magery_level ASC, s.id ASC",
        }
    }

    /// Relation that must be joined before this ordering can be applied.
    pub fn required_relation(&self) -> Option<Relation> {
        match self {
            SortKey::Name => Some(Relation::Translation),
            SortKey::Id | SortKey::Cost | SortKey::Magery => None,
        }
    }
}
