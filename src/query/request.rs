//! Validated spell listing request

use tracing::debug;

use super::sort::SortKey;
use crate::pagination::PageRequest;

/// Catalog language. URL slugs `pt`/`en` map to the stored codes `pt-BR`/`en-US`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Language {
    #[default]
    Portuguese,
    English,
}

impl Language {
    /// Parse a URL slug or full language code, case-insensitively.
    pub fn from_slug(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pt" | "pt-br" => Some(Language::Portuguese),
            "en" | "en-us" => Some(Language::English),
            _ => None,
        }
    }

    /// Like [from_slug](Self::from_slug), but unknown values resolve to Portuguese.
    pub fn resolve(value: &str) -> Self {
        Self::from_slug(value).unwrap_or_else(|| {
            debug!(requested = %value, "Unrecognized language, using default");
            Language::default()
        })
    }

    /// Language code stored in `spell_translations.language_code`
    pub fn code(&self) -> &'static str {
        match self {
            Language::Portuguese => "pt-BR",
            Language::English => "en-US",
        }
    }
}

/// Everything the catalog needs to produce one page of spells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpellListRequest {
    pub language: Language,
    pub sort: SortKey,
    /// Exact school name
    pub school: Option<String>,
    /// Exact spell type name
    pub spell_type: Option<String>,
    pub page: PageRequest,
}

impl SpellListRequest {
    pub fn new(language: Language) -> Self {
        Self {
            language,
            ..Default::default()
        }
    }

    pub fn sort(mut self, sort: SortKey) -> Self {
        self.sort = sort;
        self
    }

    pub fn school(mut self, school: Option<String>) -> Self {
        self.school = normalize_filter(school);
        self
    }

    pub fn spell_type(mut self, spell_type: Option<String>) -> Self {
        self.spell_type = normalize_filter(spell_type);
        self
    }

    pub fn page(mut self, page: PageRequest) -> Self {
        self.page = page;
        self
    }
}

/// Blank filter values mean "no filter"; the UI sends them for its "all" option.
fn normalize_filter(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
