//! Catalog row records
//!
//! One record per table, decoded with `sqlx::FromRow`. Self-referential
//! relations (school hierarchy, spell prerequisites) are plain foreign-key
//! rows; nothing here holds a back-reference to another record.

/// School record from database
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct SchoolRecord {
    pub id: i64,
    pub name: String,
    /// Parent school, if this school is a sub-school. Not guaranteed acyclic.
    pub parent_id: Option<i64>,
}

/// Spell type record from database
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct SpellTypeRecord {
    pub id: i64,
    pub name: String,
}

/// Spell record joined with its type name
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct SpellRecord {
    pub id: i64,
    /// Language-independent identity, stable across translations
    pub name_unique: String,
    pub type_id: i64,
    pub type_name: String,
    pub cost_numeric: Option<i64>,
    pub resistance: Option<String>,
    pub is_very_hard: bool,
    pub magery_level: i64,
    pub casting_time: Option<String>,
    pub duration: Option<String>,
    pub reference: Option<String>,
}

/// Localized text bundle for one spell in one language
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct SpellTranslationRecord {
    pub id: i64,
    pub spell_id: i64,
    pub language_code: String,
    pub name: String,
    pub description: Option<String>,
    pub cost_text: Option<String>,
    pub maintenance_cost_text: Option<String>,
    pub item_description: Option<String>,
    /// Free-text override used when the structured prerequisites fall short
    pub prerequisites_text: Option<String>,
}

/// Row of the spell <-> school join entity, with the school name resolved
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SpellSchoolLink {
    pub spell_id: i64,
    pub school_name: String,
}

/// Row of the directed spell -> prerequisite join entity
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PrerequisiteLink {
    pub spell_id: i64,
    pub prerequisite_id: i64,
    pub prerequisite_name_unique: String,
}

/// A prerequisite spell as seen from the spell that requires it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrerequisiteAggregate {
    pub id: i64,
    pub name_unique: String,
    pub translations: Vec<SpellTranslationRecord>,
}

/// A spell with every relation the projection needs already loaded.
///
/// Prerequisites are loaded one level deep only, so cyclic prerequisite
/// graphs never recurse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpellAggregate {
    pub spell: SpellRecord,
    pub schools: Vec<String>,
    pub translations: Vec<SpellTranslationRecord>,
    pub prerequisites: Vec<PrerequisiteAggregate>,
}

impl SpellAggregate {
    /// Find this spell's translation for a language code.
    pub fn translation(&self, language_code: &str) -> Option<&SpellTranslationRecord> {
        self.translations
            .iter()
            .find(|t| t.language_code == language_code)
    }
}

impl PrerequisiteAggregate {
    /// Find the prerequisite's translation for a language code.
    pub fn translation(&self, language_code: &str) -> Option<&SpellTranslationRecord> {
        self.translations
            .iter()
            .find(|t| t.language_code == language_code)
    }
}
