//! # tutela-core
//!
//! Deterministic compliance evaluation engine for Chile's Law 21.719.
//!
//! Given a structured description of a data-processing activity (a RAT
//! record), the engine classifies its industry sector, detects sensitive
//! data categories, runs seven independent rule modules, aggregates risk
//! signals into an overall level, and derives the compliance artifacts the
//! activity legally requires: alerts, required documents, and DPO
//! notifications with deadlines.
//!
//! ## Key Guarantees
//!
//! 1. **Deterministic**: same input and instant always produce the same output
//! 2. **Fail-open**: missing or malformed fields default to empty, never abort
//! 3. **Independent modules**: no rule module sees another's output
//! 4. **Pure**: no I/O, no shared mutable state, safe to call concurrently
//!
//! ## Example
//!
//! ```rust,ignore
//! use tutela_core::{evaluate, ProcessingActivity, RiskLevel};
//!
//! let activity = ProcessingActivity {
//!     purpose: "evaluación crediticia y scoring automático".to_string(),
//!     subject_count: 500_000,
//!     ..Default::default()
//! };
//! let result = evaluate(&activity);
//! if result.risk_level >= RiskLevel::High {
//!     println!("consulta previa: {}", result.requires_prior_consultation);
//! }
//! ```

pub mod catalog;
pub mod classifier;
pub mod notify;
pub mod risk;
pub mod rules;
pub mod types;

// Re-export main types at crate root
pub use catalog::{Catalog, CatalogError, CategoryKeywords, SectorKeywords};
pub use classifier::{classify_sector, detect_sensitive};
pub use notify::{DefaultIdGenerator, IdGenerator, NotificationBuilder};
pub use risk::{RiskAggregator, RiskAssessment};
pub use rules::{RuleContext, RuleModule, RuleOutcome};
pub use types::{
    Alert, DocumentType, EvaluationResult, Notification, Priority, ProcessingActivity,
    Recipient, RequiredDocument, RiskFactor, RiskLevel, Sector, SensitiveCategory, Severity,
    Urgency,
};

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors that can occur at the evaluation boundary.
///
/// The engine itself never fails: once a typed activity exists, evaluation
/// is total. Errors only arise normalizing untyped input or loading a
/// catalog.
#[derive(Error, Debug)]
pub enum EvaluationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),
}

/// Evaluate an activity with the built-in catalog and the current time.
///
/// For fully deterministic results (golden tests, audits), use
/// [`evaluate_at`] instead.
pub fn evaluate(activity: &ProcessingActivity) -> EvaluationResult {
    evaluate_at(activity, Utc::now())
}

/// Evaluate with an explicit timestamp for deterministic results.
///
/// Same inputs and instant always produce the same output, including
/// notification identifiers.
pub fn evaluate_at(activity: &ProcessingActivity, evaluated_at: DateTime<Utc>) -> EvaluationResult {
    evaluate_with_catalog_at(activity, Catalog::builtin(), evaluated_at)
}

/// Evaluate against a specific catalog with an explicit timestamp.
///
/// This is the full entry point: the two leaf classifiers run once, every
/// rule module runs against their shared outputs, and the aggregator and
/// notification builder assemble the result.
pub fn evaluate_with_catalog_at(
    activity: &ProcessingActivity,
    catalog: &Catalog,
    evaluated_at: DateTime<Utc>,
) -> EvaluationResult {
    let sector = classifier::classify_sector(activity, catalog);
    let sensitive_categories = classifier::detect_sensitive(activity, catalog);

    let ctx = RuleContext {
        activity,
        sector,
        sensitive_categories: &sensitive_categories,
        catalog,
    };
    let (alerts, required_documents) = rules::run_all(&ctx);

    let assessment =
        RiskAggregator::new().aggregate(activity, &sensitive_categories, sector, &alerts, catalog);

    let notifications = NotificationBuilder::new().build(
        &alerts,
        &required_documents,
        activity.source_id(),
        sector,
        evaluated_at,
    );

    tracing::debug!(
        sector = %sector,
        alerts = alerts.len(),
        level = ?assessment.risk_level,
        "activity evaluated"
    );

    EvaluationResult {
        sector,
        alerts,
        required_documents,
        risk_level: assessment.risk_level,
        risk_factors: assessment.risk_factors,
        sensitive_categories,
        requires_prior_consultation: assessment.requires_prior_consultation,
        notifications,
        evaluated_at,
    }
}

/// Evaluate a dynamic JSON value.
///
/// Normalizes the value at the boundary (missing fields become defaults)
/// and rejects only `null` or non-object input, before any module runs.
pub fn evaluate_value(value: &serde_json::Value) -> Result<EvaluationResult, EvaluationError> {
    let activity = ProcessingActivity::from_value(value)?;
    Ok(evaluate(&activity))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn instant() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_determinism_same_input_same_output() {
        let activity = ProcessingActivity {
            id: Some("rat-9".to_string()),
            purpose: "evaluación crediticia y scoring automático".to_string(),
            declared_data_categories: vec!["socioeconomic".to_string()],
            automated_decision: true,
            subject_count: 500_000,
            external_recipients: vec![Recipient::new("Equifax", "USA")],
            ..Default::default()
        };

        let first = evaluate_at(&activity, instant());
        let second = evaluate_at(&activity, instant());

        assert_eq!(first.alerts, second.alerts);
        assert_eq!(first.required_documents, second.required_documents);
        assert_eq!(first.risk_factors, second.risk_factors);
        assert_eq!(first.risk_level, second.risk_level);
        assert_eq!(first.sensitive_categories, second.sensitive_categories);
        assert_eq!(first.notifications, second.notifications);
    }

    #[test]
    fn test_sensitivity_alone_yields_urgent_alert_and_medium_risk() {
        // Only signal is the declared sensitive category; the empty record
        // still lacks legal basis and retention, like a fresh registry entry
        let activity = ProcessingActivity {
            declared_data_categories: vec!["health".to_string()],
            ..Default::default()
        };
        let result = evaluate_at(&activity, instant());

        let urgent: Vec<_> = result
            .alerts
            .iter()
            .filter(|a| a.severity == Severity::Urgent)
            .collect();
        assert_eq!(urgent.len(), 1);
        assert_eq!(urgent[0].required_document, DocumentType::ImpactAssessment);
        let doc = result
            .required_documents
            .iter()
            .find(|d| d.document_type == DocumentType::ImpactAssessment)
            .unwrap();
        assert_eq!(doc.due_in_days, 15);
        assert!(result.risk_level >= RiskLevel::Medium);
    }

    #[test]
    fn test_fail_open_on_empty_input() {
        let result = evaluate_value(&json!({})).unwrap();

        assert_eq!(result.sector, Sector::General);
        assert!(result.sensitive_categories.is_empty());
        // A fully empty record always lacks legal basis and retention period
        assert_eq!(result.alerts.len(), 2);
        assert_eq!(result.alerts[0].severity, Severity::Critical);
        assert_eq!(
            result.alerts[0].required_document,
            DocumentType::LegalBasisAnalysis
        );
        assert_eq!(result.alerts[1].severity, Severity::Warning);
        assert_eq!(
            result.alerts[1].required_document,
            DocumentType::RetentionPolicy
        );
        // Two alerts, zero factors: medium
        assert_eq!(result.risk_level, RiskLevel::Medium);
        assert!(!result.requires_prior_consultation);
    }

    #[test]
    fn test_null_input_is_rejected_before_evaluation() {
        let err = evaluate_value(&serde_json::Value::Null).unwrap_err();
        assert!(matches!(err, EvaluationError::InvalidInput(_)));
    }

    #[test]
    fn test_prior_consultation_tracks_factor_count_not_level() {
        // Two alerts, zero factors: medium level but no prior consultation
        let medium = evaluate_at(&ProcessingActivity::default(), instant());
        assert_eq!(medium.risk_level, RiskLevel::Medium);
        assert!(!medium.requires_prior_consultation);

        // Two factors: prior consultation regardless of anything else
        let activity = ProcessingActivity {
            automated_decision: true,
            declared_data_categories: vec!["health".to_string(), "huella".to_string()],
            legal_basis: "consentimiento".to_string(),
            retention_period: "2 años".to_string(),
            ..Default::default()
        };
        let high = evaluate_at(&activity, instant());
        assert_eq!(high.risk_factors.len(), 2);
        assert!(high.requires_prior_consultation);
    }

    #[test]
    fn test_risk_band_boundaries() {
        // Exactly 3 factors: multiple sensitive + automated over sensitive +
        // international transfer of sensitive. Sector stays general, count
        // stays at threshold, purpose has no profiling keywords.
        let critical_activity = ProcessingActivity {
            declared_data_categories: vec!["health".to_string(), "huella".to_string()],
            automated_decision: true,
            external_recipients: vec![Recipient::new("Acme Corp", "USA")],
            legal_basis: "consentimiento".to_string(),
            retention_period: "2 años".to_string(),
            ..Default::default()
        };
        let result = evaluate_at(&critical_activity, instant());
        assert_eq!(result.risk_factors.len(), 3);
        assert_eq!(result.risk_level, RiskLevel::Critical);

        // Remove the transfer: 2 factors, high
        let mut high_activity = critical_activity.clone();
        high_activity.external_recipients.clear();
        let result = evaluate_at(&high_activity, instant());
        assert_eq!(result.risk_factors.len(), 2);
        assert_eq!(result.risk_level, RiskLevel::High);

        // Zero factors but two alerts: medium
        let result = evaluate_at(&ProcessingActivity::default(), instant());
        assert!(result.risk_factors.is_empty());
        assert_eq!(result.risk_level, RiskLevel::Medium);

        // Zero factors, at most one alert: low
        let low_activity = ProcessingActivity {
            legal_basis: "consentimiento".to_string(),
            retention_period: "2 años".to_string(),
            ..Default::default()
        };
        let result = evaluate_at(&low_activity, instant());
        assert!(result.risk_factors.is_empty());
        assert!(result.alerts.is_empty());
        assert_eq!(result.risk_level, RiskLevel::Low);
    }

    #[test]
    fn test_end_to_end_financial_scoring_scenario() {
        let result = evaluate_value(&json!({
            "id": "rat-scoring",
            "purpose": "evaluación crediticia y scoring automático",
            "declared_data_categories": ["socioeconomic"],
            "automated_decision": true,
            "subject_count": 500_000,
            "external_recipients": [{"name": "Equifax", "country": "USA"}],
            "legal_basis": "",
            "retention_period": "",
        }))
        .unwrap();

        assert_eq!(result.sector, Sector::Financial);
        assert!(result
            .sensitive_categories
            .contains(&SensitiveCategory::Socioeconomic));
        // sensitivity, automated decision, transfer, scoring policy,
        // volume critical, missing legal basis, missing retention
        assert!(result.alerts.len() >= 5);
        assert_eq!(result.alerts.len(), result.required_documents.len());
        assert_eq!(result.risk_level, RiskLevel::Critical);
        assert!(result.requires_prior_consultation);

        // The volume band is the critical one
        let volume_doc = result
            .required_documents
            .iter()
            .find(|d| d.document_type == DocumentType::MassProcessingMeasures)
            .unwrap();
        assert_eq!(volume_doc.due_in_days, 7);

        // Notifications mirror alerts one to one, in order
        assert_eq!(result.notifications.len(), result.alerts.len());
        for (notification, alert) in result.notifications.iter().zip(&result.alerts) {
            assert_eq!(notification.severity, alert.severity);
            assert_eq!(notification.source_activity_id, "rat-scoring");
        }
    }

    #[test]
    fn test_each_emission_keeps_its_own_justification() {
        // Health sector with sensitive data: sensitivity rule and sector rule
        // both fire; each emission keeps its own legal justification
        let activity = ProcessingActivity {
            purpose: "gestión de fichas de pacientes del hospital".to_string(),
            legal_basis: "ley".to_string(),
            retention_period: "2 años".to_string(),
            ..Default::default()
        };
        let result = evaluate_at(&activity, instant());
        assert_eq!(result.alerts.len(), 2);
        assert_eq!(result.required_documents.len(), 2);
        let reasons: Vec<&str> = result
            .required_documents
            .iter()
            .map(|d| d.reason.as_str())
            .collect();
        assert_ne!(reasons[0], reasons[1]);
    }

    #[test]
    fn test_batch_calls_are_independent() {
        // Two activities evaluated back to back share no state
        let first = ProcessingActivity {
            purpose: "scoring crediticio".to_string(),
            ..Default::default()
        };
        let second = ProcessingActivity::default();

        let isolated = evaluate_at(&second, instant());
        let _ = evaluate_at(&first, instant());
        let after = evaluate_at(&second, instant());
        assert_eq!(isolated.alerts, after.alerts);
        assert_eq!(isolated.risk_level, after.risk_level);
    }
}
