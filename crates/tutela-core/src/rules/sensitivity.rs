//! Sensitivity rule: sensitive data requires an impact assessment.

use super::{RuleContext, RuleModule, RuleOutcome};
use crate::types::{Alert, DocumentType, RequiredDocument, Severity, Urgency};

const DUE_IN_DAYS: u32 = 15;
const LEGAL_BASIS: &str = "Art. 16 quáter, Ley 21.719 (datos personales sensibles)";

/// Fires when the detector found any sensitive category: the activity
/// requires an EIPD within 15 days.
pub struct SensitivityRule;

impl RuleModule for SensitivityRule {
    fn name(&self) -> &'static str {
        "sensitivity"
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> RuleOutcome {
        if ctx.sensitive_categories.is_empty() {
            return RuleOutcome::empty();
        }

        let listed = ctx
            .sensitive_categories
            .iter()
            .map(|c| c.label())
            .collect::<Vec<_>>()
            .join(", ");

        RuleOutcome {
            alerts: vec![Alert {
                severity: Severity::Urgent,
                title: "Tratamiento de datos sensibles".to_string(),
                description: format!(
                    "La actividad trata categorías sensibles ({listed}) y requiere una \
                     Evaluación de Impacto en Protección de Datos."
                ),
                required_document: DocumentType::ImpactAssessment,
                legal_basis: LEGAL_BASIS.to_string(),
                sector: ctx.sector,
            }],
            documents: vec![RequiredDocument {
                document_type: DocumentType::ImpactAssessment,
                reason: format!("Categorías sensibles detectadas: {listed}"),
                urgency: Urgency::High,
                due_in_days: DUE_IN_DAYS,
            }],
        }
    }
}
