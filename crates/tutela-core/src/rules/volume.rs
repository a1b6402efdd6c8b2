//! Volume rule: banded thresholds on the number of data subjects.

use super::{RuleContext, RuleModule, RuleOutcome};
use crate::types::{Alert, DocumentType, RequiredDocument, Severity, Urgency};

/// Above this count the activity is massive-scale processing.
pub const MASSIVE_THRESHOLD: u64 = 100_000;

/// Above this count (and at or below [`MASSIVE_THRESHOLD`]) the activity
/// needs a volume assessment.
pub const LARGE_THRESHOLD: u64 = 10_000;

const LEGAL_BASIS: &str = "Art. 15 bis, Ley 21.719 (deberes de seguridad proporcionales)";

/// Strict, non-overlapping bands: exactly one band applies, or none.
pub struct VolumeRule;

impl RuleModule for VolumeRule {
    fn name(&self) -> &'static str {
        "volume"
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> RuleOutcome {
        let count = ctx.activity.subject_count;

        if count > MASSIVE_THRESHOLD {
            return RuleOutcome {
                alerts: vec![Alert {
                    severity: Severity::Critical,
                    title: "Tratamiento masivo de datos".to_string(),
                    description: format!(
                        "La actividad afecta a {count} titulares; se requieren medidas \
                         especiales de seguridad y gobernanza para tratamiento masivo."
                    ),
                    required_document: DocumentType::MassProcessingMeasures,
                    legal_basis: LEGAL_BASIS.to_string(),
                    sector: ctx.sector,
                }],
                documents: vec![RequiredDocument {
                    document_type: DocumentType::MassProcessingMeasures,
                    reason: format!("Más de {MASSIVE_THRESHOLD} titulares afectados"),
                    urgency: Urgency::Critical,
                    due_in_days: 7,
                }],
            };
        }

        if count > LARGE_THRESHOLD {
            return RuleOutcome {
                alerts: vec![Alert {
                    severity: Severity::Warning,
                    title: "Tratamiento de gran volumen".to_string(),
                    description: format!(
                        "La actividad afecta a {count} titulares; se requiere una \
                         evaluación del volumen de tratamiento."
                    ),
                    required_document: DocumentType::VolumeAssessment,
                    legal_basis: LEGAL_BASIS.to_string(),
                    sector: ctx.sector,
                }],
                documents: vec![RequiredDocument {
                    document_type: DocumentType::VolumeAssessment,
                    reason: format!("Más de {LARGE_THRESHOLD} titulares afectados"),
                    urgency: Urgency::Medium,
                    due_in_days: 15,
                }],
            };
        }

        RuleOutcome::empty()
    }
}
