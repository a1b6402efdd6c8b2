//! Leaf classifiers: sector assignment and sensitive-category detection.
//!
//! Both classifiers run exactly once per evaluation and their outputs are
//! shared read-only with every rule module. Matching is plain lower-cased
//! substring containment, no tokenization or stemming: high recall is the
//! point, a human reviewer discards false positives downstream.

use crate::catalog::Catalog;
use crate::types::{ProcessingActivity, Sector, SensitiveCategory};

/// Assign exactly one sector to the activity.
///
/// Tests the catalog's ordered sector table and returns the first sector
/// with any keyword match. Table order is a deliberate tie-break: a text
/// mentioning both "hospital" and "banco" classifies as health because
/// health is checked first. Returns [`Sector::General`] when nothing
/// matches.
pub fn classify_sector(activity: &ProcessingActivity, catalog: &Catalog) -> Sector {
    let text = activity.searchable_text();

    for entry in &catalog.sector_keywords {
        if entry.keywords.iter().any(|kw| text.contains(kw.as_str())) {
            tracing::debug!(sector = %entry.sector, "sector classified by keyword match");
            return entry.sector;
        }
    }

    Sector::General
}

/// Detect every sensitive category the activity touches.
///
/// A category is included when either a declared category tag matches one
/// of its known tags (synonyms included) or a keyword matches the activity
/// free text. All nine categories are evaluated independently; the result
/// is the union in fixed category order, not a single best match.
pub fn detect_sensitive(
    activity: &ProcessingActivity,
    catalog: &Catalog,
) -> Vec<SensitiveCategory> {
    let text = activity.searchable_text();
    let declared: Vec<String> = activity
        .declared_data_categories
        .iter()
        .map(|tag| tag.trim().to_lowercase())
        .collect();

    let mut detected = Vec::new();
    for category in SensitiveCategory::ALL {
        let Some(entry) = catalog.category_entry(category) else {
            continue;
        };

        let declared_match = declared
            .iter()
            .any(|tag| entry.declared_tags.iter().any(|t| t == tag));
        let keyword_match = entry.keywords.iter().any(|kw| text.contains(kw.as_str()));

        if declared_match || keyword_match {
            detected.push(category);
        }
    }

    if !detected.is_empty() {
        tracing::debug!(count = detected.len(), "sensitive categories detected");
    }
    detected
}

#[cfg(test)]
mod tests {
    use super::*;

    fn activity_with_text(purpose: &str) -> ProcessingActivity {
        ProcessingActivity {
            purpose: purpose.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_no_match_falls_back_to_general() {
        let activity = activity_with_text("gestión de inventario de bodega");
        assert_eq!(
            classify_sector(&activity, Catalog::builtin()),
            Sector::General
        );
    }

    #[test]
    fn test_sector_priority_health_before_financial() {
        // Text matching both sectors must classify as health: table order wins
        let activity = activity_with_text("hospital scoring crediticio");
        assert_eq!(
            classify_sector(&activity, Catalog::builtin()),
            Sector::Health
        );
    }

    #[test]
    fn test_financial_classification() {
        let activity = activity_with_text("evaluación crediticia y scoring automático");
        assert_eq!(
            classify_sector(&activity, Catalog::builtin()),
            Sector::Financial
        );
    }

    #[test]
    fn test_classification_reads_name_purpose_and_description() {
        let activity = ProcessingActivity {
            name: "Registro anual".to_string(),
            description: "datos de alumnos del colegio".to_string(),
            ..Default::default()
        };
        assert_eq!(
            classify_sector(&activity, Catalog::builtin()),
            Sector::Education
        );
    }

    #[test]
    fn test_detect_sensitive_from_declared_tag() {
        let activity = ProcessingActivity {
            declared_data_categories: vec!["health".to_string()],
            ..Default::default()
        };
        let detected = detect_sensitive(&activity, Catalog::builtin());
        assert_eq!(detected, vec![SensitiveCategory::Health]);
    }

    #[test]
    fn test_detect_sensitive_from_tag_synonym() {
        // "huella" and "fingerprint" are both synonyms for biometric
        for tag in ["huella", "fingerprint", "biometria"] {
            let activity = ProcessingActivity {
                declared_data_categories: vec![tag.to_string()],
                ..Default::default()
            };
            let detected = detect_sensitive(&activity, Catalog::builtin());
            assert_eq!(detected, vec![SensitiveCategory::Biometric], "tag: {tag}");
        }
    }

    #[test]
    fn test_detect_sensitive_from_free_text() {
        let activity = activity_with_text("control de acceso con reconocimiento facial");
        let detected = detect_sensitive(&activity, Catalog::builtin());
        assert!(detected.contains(&SensitiveCategory::Biometric));
    }

    #[test]
    fn test_detect_returns_union_in_fixed_order() {
        let activity = ProcessingActivity {
            purpose: "ficha clínica de pacientes con huella digital".to_string(),
            declared_data_categories: vec!["antecedentes penales".to_string()],
            ..Default::default()
        };
        let detected = detect_sensitive(&activity, Catalog::builtin());
        // Order follows the category declaration order, not match order
        assert_eq!(
            detected,
            vec![
                SensitiveCategory::Health,
                SensitiveCategory::Biometric,
                SensitiveCategory::CriminalRecord,
            ]
        );
    }

    #[test]
    fn test_declared_tags_are_case_insensitive() {
        let activity = ProcessingActivity {
            declared_data_categories: vec!["SALUD".to_string()],
            ..Default::default()
        };
        let detected = detect_sensitive(&activity, Catalog::builtin());
        assert_eq!(detected, vec![SensitiveCategory::Health]);
    }

    #[test]
    fn test_empty_activity_detects_nothing() {
        let detected = detect_sensitive(&ProcessingActivity::default(), Catalog::builtin());
        assert!(detected.is_empty());
    }

    #[test]
    fn test_fixture_catalog_substitution() {
        let catalog = Catalog::from_yaml(
            r#"
version: "fixture"
sector_keywords:
  - sector: transport
    keywords: ["zeppelin"]
sensitive_keywords:
  - category: sex_life
    declared_tags: ["x"]
    keywords: ["zeppelin"]
international_providers: []
profiling_keywords: []
"#,
        )
        .unwrap();
        let activity = activity_with_text("flota de zeppelin");
        assert_eq!(classify_sector(&activity, &catalog), Sector::Transport);
        assert_eq!(
            detect_sensitive(&activity, &catalog),
            vec![SensitiveCategory::SexLife]
        );
    }
}
