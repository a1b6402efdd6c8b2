//! Sector-specific rule: per-sector compliance checks dispatched on the
//! classified sector.

use super::{RuleContext, RuleModule, RuleOutcome};
use crate::types::{Alert, DocumentType, RequiredDocument, Sector, Severity, Urgency};

/// Purpose/description fragments that imply the activity handles patient
/// data. Checked only for the health sector.
const PATIENT_DATA_KEYWORDS: &[&str] = &[
    "paciente",
    "ficha clínica",
    "ficha clinica",
    "historial",
    "diagnóstic",
    "diagnostic",
    "salud",
];

/// Purpose fragments that imply credit evaluation. Checked only for the
/// financial sector.
const CREDIT_EVALUATION_KEYWORDS: &[&str] = &[
    "scoring",
    "crediticia",
    "crediticio",
    "riesgo financiero",
    "evaluación comercial",
    "evaluacion comercial",
];

pub struct SectorSpecificRule;

impl RuleModule for SectorSpecificRule {
    fn name(&self) -> &'static str {
        "sector_specific"
    }

    fn evaluate(&self, ctx: &RuleContext<'_>) -> RuleOutcome {
        match ctx.sector {
            Sector::Health => health_check(ctx),
            Sector::Education => education_check(ctx),
            Sector::Financial => financial_check(ctx),
            Sector::Government => government_check(ctx),
            _ => RuleOutcome::empty(),
        }
    }
}

/// Health: patient data without explicit consent needs a medical consent
/// document within 10 days.
fn health_check(ctx: &RuleContext<'_>) -> RuleOutcome {
    let text = ctx.activity.searchable_text();
    let implies_patient_data = PATIENT_DATA_KEYWORDS.iter().any(|kw| text.contains(kw));
    if !implies_patient_data || ctx.activity.explicit_consent {
        return RuleOutcome::empty();
    }

    outcome(
        ctx,
        Severity::Urgent,
        "Datos de pacientes sin consentimiento explícito",
        "La actividad trata datos de pacientes y no registra consentimiento \
         explícito; se requiere consentimiento informado.",
        DocumentType::MedicalConsent,
        "Falta consentimiento explícito para datos de pacientes",
        Urgency::High,
        10,
        "Art. 16 quáter, Ley 21.719 (datos relativos a la salud)",
    )
}

/// Education: every education activity is assumed to involve minors, so
/// parental authorization is always required, at the shortest deadline.
fn education_check(ctx: &RuleContext<'_>) -> RuleOutcome {
    outcome(
        ctx,
        Severity::Urgent,
        "Actividad educacional con datos de menores",
        "Las actividades del sector educación se presumen con datos de \
         menores de edad; se requiere autorización de padres o apoderados.",
        DocumentType::ParentalAuthorization,
        "Sector educación: tratamiento de datos de menores presumido",
        Urgency::High,
        5,
        "Art. 16 quinquies, Ley 21.719 (datos de niños, niñas y adolescentes)",
    )
}

/// Financial: credit evaluation requires documented scoring policy.
fn financial_check(ctx: &RuleContext<'_>) -> RuleOutcome {
    let purpose = ctx.activity.purpose.to_lowercase();
    let implies_credit = CREDIT_EVALUATION_KEYWORDS.iter().any(|kw| purpose.contains(kw));
    if !implies_credit {
        return RuleOutcome::empty();
    }

    outcome(
        ctx,
        Severity::Warning,
        "Evaluación crediticia sin política documentada",
        "La finalidad implica evaluación crediticia o scoring; se requiere \
         documentar la política y los criterios de evaluación.",
        DocumentType::ScoringPolicy,
        "Finalidad de evaluación crediticia detectada",
        Urgency::Medium,
        20,
        "Art. 8, Ley 21.719 y Ley 20.575 (evaluación de riesgo comercial)",
    )
}

/// Government: public bodies always require an active transparency policy.
fn government_check(ctx: &RuleContext<'_>) -> RuleOutcome {
    outcome(
        ctx,
        Severity::Warning,
        "Organismo público sin política de transparencia",
        "Los órganos del Estado deben mantener una política de transparencia \
         activa sobre sus tratamientos de datos.",
        DocumentType::TransparencyPolicy,
        "Sector gobierno: transparencia activa obligatoria",
        Urgency::Medium,
        30,
        "Art. 14, Ley 21.719 y Ley 20.285 (transparencia de la función pública)",
    )
}

#[allow(clippy::too_many_arguments)]
fn outcome(
    ctx: &RuleContext<'_>,
    severity: Severity,
    title: &str,
    description: &str,
    document_type: DocumentType,
    reason: &str,
    urgency: Urgency,
    due_in_days: u32,
    legal_basis: &str,
) -> RuleOutcome {
    RuleOutcome {
        alerts: vec![Alert {
            severity,
            title: title.to_string(),
            description: description.to_string(),
            required_document: document_type,
            legal_basis: legal_basis.to_string(),
            sector: ctx.sector,
        }],
        documents: vec![RequiredDocument {
            document_type,
            reason: reason.to_string(),
            urgency,
            due_in_days,
        }],
    }
}
