//! Legitimation rule: every treatment needs a declared legal basis.

use super::{RuleContext, RuleModule, RuleOutcome};
use crate::types::{Alert, DocumentType, RequiredDocument, Severity, Urgency};

const DUE_IN_DAYS: u32 = 3;
const LEGAL_BASIS: &str = "Arts. 12 y 13, Ley 21.719 (licitud del tratamiento)";

/// Fires when the activity declares no legal basis at all. This is the
/// most urgent gap the engine can surface: without a base of licitud the
/// treatment itself is unlawful.
pub struct LegitimationRule;

impl RuleModule for LegitimationRule {
    fn name(&self) -> &'static str {
        "legitimation"
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> RuleOutcome {
        if !ctx.activity.legal_basis.trim().is_empty() {
            return RuleOutcome::empty();
        }

        RuleOutcome {
            alerts: vec![Alert {
                severity: Severity::Critical,
                title: "Tratamiento sin base de licitud declarada".to_string(),
                description: "La actividad no declara ninguna base legal; debe \
                              identificarse y documentarse la base de licitud antes \
                              de continuar el tratamiento."
                    .to_string(),
                required_document: DocumentType::LegalBasisAnalysis,
                legal_basis: LEGAL_BASIS.to_string(),
                sector: ctx.sector,
            }],
            documents: vec![RequiredDocument {
                document_type: DocumentType::LegalBasisAnalysis,
                reason: "Base legal no declarada".to_string(),
                urgency: Urgency::Critical,
                due_in_days: DUE_IN_DAYS,
            }],
        }
    }
}
