//! Automated-decision rule: algorithmic decisions with effect on people
//! require their own impact assessment.

use super::{RuleContext, RuleModule, RuleOutcome};
use crate::types::{Alert, DocumentType, RequiredDocument, Severity, Urgency};

const DUE_IN_DAYS: u32 = 10;
const LEGAL_BASIS: &str = "Art. 8 ter, Ley 21.719 (decisiones automatizadas)";

pub struct AutomatedDecisionRule;

impl RuleModule for AutomatedDecisionRule {
    fn name(&self) -> &'static str {
        "automated_decision"
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> RuleOutcome {
        if !ctx.activity.automated_decision {
            return RuleOutcome::empty();
        }

        RuleOutcome {
            alerts: vec![Alert {
                severity: Severity::Urgent,
                title: "Decisiones automatizadas con efectos sobre personas".to_string(),
                description: "La actividad incluye decisiones algorítmicas que producen \
                              efectos respecto de los titulares; se requiere evaluar su \
                              impacto y garantizar el derecho de oposición."
                    .to_string(),
                required_document: DocumentType::DecisionImpactAssessment,
                legal_basis: LEGAL_BASIS.to_string(),
                sector: ctx.sector,
            }],
            documents: vec![RequiredDocument {
                document_type: DocumentType::DecisionImpactAssessment,
                reason: "La actividad declara decisiones automatizadas".to_string(),
                urgency: Urgency::High,
                due_in_days: DUE_IN_DAYS,
            }],
        }
    }
}
