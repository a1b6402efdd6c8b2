//! International-transfer rule: cross-border recipients need a transfer
//! agreement.

use super::{RuleContext, RuleModule, RuleOutcome};
use crate::catalog::Catalog;
use crate::types::{
    Alert, DocumentType, ProcessingActivity, Recipient, RequiredDocument, Severity, Urgency,
};

const DUE_IN_DAYS: u32 = 30;
const LEGAL_BASIS: &str = "Arts. 27 a 29, Ley 21.719 (transferencia internacional de datos)";

/// Recipients treated as international.
///
/// A recipient counts when its country is declared and is not Chile, or
/// when its name matches the known international provider list. The latter
/// catches registry records that name a foreign cloud vendor but leave the
/// country field empty.
pub fn international_recipients<'a>(
    activity: &'a ProcessingActivity,
    catalog: &Catalog,
) -> Vec<&'a Recipient> {
    activity
        .external_recipients
        .iter()
        .filter(|r| !r.is_domestic_country() || catalog.is_known_international_provider(&r.name))
        .collect()
}

pub struct InternationalTransferRule;

impl RuleModule for InternationalTransferRule {
    fn name(&self) -> &'static str {
        "international_transfer"
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> RuleOutcome {
        let recipients = international_recipients(ctx.activity, ctx.catalog);
        if recipients.is_empty() {
            return RuleOutcome::empty();
        }

        let listed = recipients
            .iter()
            .map(|r| {
                if r.country.trim().is_empty() {
                    r.name.clone()
                } else {
                    format!("{} ({})", r.name, r.country)
                }
            })
            .collect::<Vec<_>>()
            .join(", ");

        RuleOutcome {
            alerts: vec![Alert {
                severity: Severity::Warning,
                title: "Transferencia internacional de datos".to_string(),
                description: format!(
                    "La actividad transfiere datos a destinatarios fuera de Chile \
                     ({listed}); se requiere un contrato de transferencia con \
                     garantías adecuadas."
                ),
                required_document: DocumentType::TransferAgreement,
                legal_basis: LEGAL_BASIS.to_string(),
                sector: ctx.sector,
            }],
            documents: vec![RequiredDocument {
                document_type: DocumentType::TransferAgreement,
                reason: format!("Destinatarios internacionales: {listed}"),
                urgency: Urgency::Medium,
                due_in_days: DUE_IN_DAYS,
            }],
        }
    }
}
