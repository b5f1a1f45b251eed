//! Language-specific projection of loaded spell aggregates
//!
//! A spell without a translation in the requested language projects to
//! nothing, and a prerequisite without one is left out of the prerequisite
//! list. Neither case is an error.

use serde::Serialize;

use crate::db::SpellAggregate;
use crate::query::Language;

/// A prerequisite as shown to clients
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ProjectedPrerequisite {
    /// Localized name
    pub name: String,
    pub name_unique: String,
}

/// One spell in one language, as returned by the listing endpoint
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ProjectedSpell {
    pub id: i64,
    pub name_unique: String,
    pub name: String,
    pub description: Option<String>,
    pub cost_text: Option<String>,
    pub maintenance_cost_text: Option<String>,
    pub casting_time: Option<String>,
    pub duration: Option<String>,
    pub schools: Vec<String>,
    #[serde(rename = "type")]
    pub spell_type: String,
    pub prerequisites_obj: Vec<ProjectedPrerequisite>,
    pub prerequisites_text: Option<String>,
    pub item_description: Option<String>,
    pub reference: Option<String>,
    pub resistance: Option<String>,
    pub is_very_hard: bool,
    pub magery_level: i64,
}

/// Project one aggregate into `language`, or `None` if it has no translation there.
pub fn project(aggregate: &SpellAggregate, language: Language) -> Option<ProjectedSpell> {
    let code = language.code();
    let translation = aggregate.translation(code)?;
    let spell = &aggregate.spell;

    let prerequisites_obj = aggregate
        .prerequisites
        .iter()
        .filter_map(|prerequisite| {
            prerequisite
                .translation(code)
                .map(|t| ProjectedPrerequisite {
                    name: t.name.clone(),
                    name_unique: prerequisite.name_unique.clone(),
                })
        })
        .collect();

    Some(ProjectedSpell {
        id: spell.id,
        name_unique: spell.name_unique.clone(),
        name: translation.name.clone(),
        description: translation.description.clone(),
        cost_text: translation.cost_text.clone(),
        maintenance_cost_text: translation.maintenance_cost_text.clone(),
        casting_time: spell.casting_time.clone(),
        duration: spell.duration.clone(),
        schools: aggregate.schools.clone(),
        spell_type: spell.type_name.clone(),
        prerequisites_obj,
        prerequisites_text: translation.prerequisites_text.clone(),
        item_description: translation.item_description.clone(),
        reference: spell.reference.clone(),
        resistance: spell.resistance.clone(),
        is_very_hard: spell.is_very_hard,
        magery_level: spell.magery_level,
    })
}

/// Project a page of aggregates, keeping their order and dropping untranslated spells.
pub fn project_all(aggregates: &[SpellAggregate], language: Language) -> Vec<ProjectedSpell> {
    aggregates
        .iter()
        .filter_map(|aggregate| project(aggregate, language))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::entities::{PrerequisiteAggregate, SpellRecord, SpellTranslationRecord};
    use pretty_assertions::assert_eq;

    fn translation(spell_id: i64, code: &str, name: &str) -> SpellTranslationRecord {
        SpellTranslationRecord {
            id: spell_id * 10,
            spell_id,
            language_code: code.to_string(),
            name: name.to_string(),
            description: Some(format!("{name} description")),
            cost_text: Some("3".to_string()),
            maintenance_cost_text: Some("2".to_string()),
            item_description: None,
            prerequisites_text: Some("Magery 1".to_string()),
        }
    }

    fn aggregate(id: i64, name_unique: &str, translations: Vec<SpellTranslationRecord>) -> SpellAggregate {
        SpellAggregate {
            spell: SpellRecord {
                id,
                name_unique: name_unique.to_string(),
                type_id: 1,
                type_name: "Missile".to_string(),
                cost_numeric: Some(3),
                resistance: None,
                is_very_hard: false,
                magery_level: 1,
                casting_time: Some("1 to 3 sec".to_string()),
                duration: Some("Instant".to_string()),
                reference: Some("B247".to_string()),
            },
            schools: vec!["Fire".to_string()],
            translations,
            prerequisites: Vec::new(),
        }
    }

    fn prerequisite(id: i64, name_unique: &str, translations: Vec<SpellTranslationRecord>) -> PrerequisiteAggregate {
        PrerequisiteAggregate {
            id,
            name_unique: name_unique.to_string(),
            translations,
        }
    }

    #[test]
    fn test_projects_requested_language() {
        let fireball = aggregate(
            7,
            "fireball",
            vec![
                translation(7, "pt-BR", "Bola de Fogo"),
                translation(7, "en-US", "Fireball"),
            ],
        );

        let pt = project(&fireball, Language::Portuguese).unwrap();
        assert_eq!(pt.name, "Bola de Fogo");
        assert_eq!(pt.name_unique, "fireball");
        assert_eq!(pt.spell_type, "Missile");
        assert_eq!(pt.schools, vec!["Fire".to_string()]);
        assert_eq!(pt.casting_time.as_deref(), Some("1 to 3 sec"));
        assert_eq!(pt.prerequisites_text.as_deref(), Some("Magery 1"));

        let en = project(&fireball, Language::English).unwrap();
        assert_eq!(en.name, "Fireball");
        assert_eq!(en.id, pt.id);
    }

    #[test]
    fn test_missing_translation_projects_nothing() {
        let only_pt = aggregate(1, "light", vec![translation(1, "pt-BR", "Luz")]);
        assert_eq!(project(&only_pt, Language::English), None);
    }

    #[test]
    fn test_untranslated_prerequisite_is_omitted() {
        let mut fireball = aggregate(7, "fireball", vec![translation(7, "en-US", "Fireball")]);
        fireball.prerequisites = vec![
            prerequisite(2, "create-fire", vec![translation(2, "en-US", "Create Fire")]),
            prerequisite(3, "shape-fire", vec![translation(3, "pt-BR", "Moldar Fogo")]),
        ];

        let projected = project(&fireball, Language::English).unwrap();
        assert_eq!(
            projected.prerequisites_obj,
            vec![ProjectedPrerequisite {
                name: "Create Fire".to_string(),
                name_unique: "create-fire".to_string(),
            }]
        );
    }

    #[test]
    fn test_cyclic_prerequisites_resolve_one_level() {
        // a requires b and itself, b requires a
        let mut a = aggregate(1, "a", vec![translation(1, "en-US", "A")]);
        let mut b = aggregate(2, "b", vec![translation(2, "en-US", "B")]);
        a.prerequisites = vec![
            prerequisite(1, "a", a.translations.clone()),
            prerequisite(2, "b", b.translations.clone()),
        ];
        b.prerequisites = vec![prerequisite(1, "a", a.translations.clone())];

        let projected = project_all(&[a, b], Language::English);
        assert_eq!(projected.len(), 2);
        let names: Vec<&str> = projected[0]
            .prerequisites_obj
            .iter()
            .map(|p| p.name.as_str())
            .collect();
        assert_eq!(names, vec!["A", "B"]);
        assert_eq!(projected[1].prerequisites_obj[0].name_unique, "a");
    }

    #[test]
    fn test_project_all_keeps_order_and_drops_gaps() {
        let aggregates = vec![
            aggregate(3, "c", vec![translation(3, "pt-BR", "C")]),
            aggregate(1, "a", vec![translation(1, "en-US", "A")]),
            aggregate(2, "b", vec![translation(2, "pt-BR", "B")]),
        ];

        let ids: Vec<i64> = project_all(&aggregates, Language::Portuguese)
            .iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(ids, vec![3, 2]);
    }

    #[test]
    fn test_serialized_field_names() {
        let spell = aggregate(7, "fireball", vec![translation(7, "en-US", "Fireball")]);
        let value = serde_json::to_value(project(&spell, Language::English).unwrap()).unwrap();

        for field in [
            "id",
            "name_unique",
            "name",
            "description",
            "cost_text",
            "maintenance_cost_text",
            "casting_time",
            "duration",
            "schools",
            "type",
            "prerequisites_obj",
            "prerequisites_text",
            "item_description",
            "reference",
        ] {
            assert!(value.get(field).is_some(), "missing field {field}");
        }
        assert_eq!(value["type"], "Missile");
    }
}
