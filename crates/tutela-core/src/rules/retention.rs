//! Retention rule: treatments need a bounded, declared retention period.

use super::{RuleContext, RuleModule, RuleOutcome};
use crate::types::{Alert, DocumentType, RequiredDocument, Severity, Urgency};

const DUE_IN_DAYS: u32 = 20;
const LEGAL_BASIS: &str = "Art. 11, Ley 21.719 (principio de proporcionalidad)";

/// Fires when the retention period is undeclared or declared indefinite.
///
/// The indefinite check is an exact trimmed token match, never substring:
/// "indefinido hasta revisión" describes a bounded review process and must
/// not fire.
pub struct RetentionRule;

fn is_indefinite(period: &str) -> bool {
    let token = period.trim().to_lowercase();
    token == "indefinite" || token == "indefinido"
}

impl RuleModule for RetentionRule {
    fn name(&self) -> &'static str {
        "retention"
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> RuleOutcome {
        let period = &ctx.activity.retention_period;
        if !period.trim().is_empty() && !is_indefinite(period) {
            return RuleOutcome::empty();
        }

        let reason = if period.trim().is_empty() {
            "Plazo de conservación no declarado"
        } else {
            "Plazo de conservación declarado indefinido"
        };

        RuleOutcome {
            alerts: vec![Alert {
                severity: Severity::Warning,
                title: "Plazo de conservación sin definir".to_string(),
                description: format!(
                    "{reason}; debe establecerse una política de conservación con \
                     plazos determinados o determinables."
                ),
                required_document: DocumentType::RetentionPolicy,
                legal_basis: LEGAL_BASIS.to_string(),
                sector: ctx.sector,
            }],
            documents: vec![RequiredDocument {
                document_type: DocumentType::RetentionPolicy,
                reason: reason.to_string(),
                urgency: Urgency::Medium,
                due_in_days: DUE_IN_DAYS,
            }],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::testutil::evaluate_module;
    use crate::types::ProcessingActivity;

    fn with_retention(period: &str) -> ProcessingActivity {
        ProcessingActivity {
            retention_period: period.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_bounded_period_no_alert() {
        let outcome = evaluate_module(&RetentionRule, &with_retention("5 años"));
        assert!(outcome.alerts.is_empty());
    }

    #[test]
    fn test_empty_period_fires_warning() {
        let outcome = evaluate_module(&RetentionRule, &with_retention(""));
        assert_eq!(outcome.alerts.len(), 1);
        assert_eq!(outcome.alerts[0].severity, Severity::Warning);
        assert_eq!(outcome.documents[0].due_in_days, 20);
    }

    #[test]
    fn test_indefinite_token_fires_case_insensitive() {
        for period in ["indefinite", "Indefinite", "INDEFINIDO", " indefinido "] {
            let outcome = evaluate_module(&RetentionRule, &with_retention(period));
            assert_eq!(outcome.alerts.len(), 1, "period: {period:?}");
        }
    }

    #[test]
    fn test_indefinite_as_substring_does_not_fire() {
        // Exact token match only
        let outcome = evaluate_module(
            &RetentionRule,
            &with_retention("indefinido hasta revisión anual"),
        );
        assert!(outcome.alerts.is_empty());
    }
}
