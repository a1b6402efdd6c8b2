//! Core types for compliance evaluation.
//!
//! These types are the data structures used throughout Tutela for
//! processing activities, alerts, required documents, and evaluation results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::EvaluationError;

/// A third party that receives personal data from the activity.
///
/// An empty `country` or `"Chile"` marks a domestic recipient. Recipients
/// with a foreign country, or whose name matches the known international
/// provider list, are treated as international transfers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Recipient {
    /// Name of the receiving organization
    #[serde(default, alias = "nombre")]
    pub name: String,

    /// Country of the recipient; empty means undeclared
    #[serde(default, alias = "pais")]
    pub country: String,
}

impl Recipient {
    pub fn new(name: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            country: country.into(),
        }
    }

    /// Whether the declared country marks this recipient as domestic.
    ///
    /// Name-based detection of international providers lives in the
    /// transfer rule, which also consults the provider catalog.
    pub fn is_domestic_country(&self) -> bool {
        let country = self.country.trim();
        country.is_empty() || country.eq_ignore_ascii_case("chile")
    }
}

/// A data-processing activity (RAT record) to be evaluated.
///
/// All fields are optional at the boundary: missing or malformed fields are
/// normalized to defaults before any rule module runs. The engine never
/// refuses to evaluate an incomplete record; its job is to surface the
/// obligations the record already implies.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ProcessingActivity {
    /// Record identifier from the registry, used to correlate notifications
    #[serde(alias = "rat_id")]
    pub id: Option<String>,

    /// Activity name
    #[serde(alias = "nombre")]
    pub name: String,

    /// Declared purpose of the treatment
    #[serde(alias = "finalidad")]
    pub purpose: String,

    /// Free-text description
    #[serde(alias = "descripcion")]
    pub description: String,

    /// Data category tags as declared by the user (e.g. `salud`, `biometria`)
    #[serde(alias = "categorias_datos")]
    pub declared_data_categories: Vec<String>,

    /// Activity includes algorithmic decisions with effect on individuals
    #[serde(alias = "decision_automatizada")]
    pub automated_decision: bool,

    /// Whether explicit consent was collected for the treatment
    #[serde(alias = "consentimiento_explicito")]
    pub explicit_consent: bool,

    /// Number of data subjects affected; 0 means unknown
    #[serde(alias = "cantidad_titulares")]
    pub subject_count: u64,

    /// Declared volume tag from the registry form (e.g. `masivo`)
    #[serde(alias = "volumen_datos")]
    pub declared_volume: Option<String>,

    /// Third parties receiving data, in declaration order
    #[serde(alias = "destinatarios_externos")]
    pub external_recipients: Vec<Recipient>,

    /// Declared legal basis for the treatment; empty means undeclared
    #[serde(alias = "base_legal")]
    pub legal_basis: String,

    /// Declared retention period; empty or "indefinido" triggers the retention rule
    #[serde(alias = "plazo_conservacion")]
    pub retention_period: String,
}

impl ProcessingActivity {
    /// Lower-cased concatenation of name, purpose, and description.
    ///
    /// This is the text both leaf classifiers match keywords against.
    pub fn searchable_text(&self) -> String {
        format!("{} {} {}", self.name, self.purpose, self.description).to_lowercase()
    }

    /// Record id for notification correlation, with a fixed fallback.
    pub fn source_id(&self) -> &str {
        self.id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
            .unwrap_or("rat-sin-id")
    }

    /// Whether the registry form declared a massive data volume.
    pub fn declares_massive_volume(&self) -> bool {
        self.declared_volume
            .as_deref()
            .map(|v| v.trim().eq_ignore_ascii_case("masivo"))
            .unwrap_or(false)
    }

    /// Normalize a dynamic JSON value into a typed activity.
    ///
    /// This is the single normalization step at the boundary: absent or
    /// wrongly-typed fields become defaults (empty string, `false`, 0,
    /// empty list). The only rejected inputs are `null` and non-object
    /// values, which surface as [`EvaluationError::InvalidInput`] before
    /// any rule module runs.
    pub fn from_value(value: &Value) -> Result<Self, EvaluationError> {
        let obj = value.as_object().ok_or_else(|| {
            EvaluationError::InvalidInput(format!(
                "expected a JSON object describing the activity, got {}",
                json_type_name(value)
            ))
        })?;

        let field = |names: &[&str]| -> Option<&Value> {
            names.iter().find_map(|n| obj.get(*n))
        };
        let text = |names: &[&str]| -> String {
            field(names)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };

        let declared_data_categories = field(&["declared_data_categories", "categorias_datos"])
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let external_recipients = field(&["external_recipients", "destinatarios_externos"])
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(Value::as_object)
                    .map(|r| Recipient {
                        name: r
                            .get("name")
                            .or_else(|| r.get("nombre"))
                            .and_then(Value::as_str)
                            .unwrap_or_default()
                            .to_string(),
                        country: r
                            .get("country")
                            .or_else(|| r.get("pais"))
                            .and_then(Value::as_str)
                            .unwrap_or_default()
                            .to_string(),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            id: field(&["id", "rat_id"])
                .and_then(Value::as_str)
                .map(str::to_string),
            name: text(&["name", "nombre"]),
            purpose: text(&["purpose", "finalidad"]),
            description: text(&["description", "descripcion"]),
            declared_data_categories,
            automated_decision: field(&["automated_decision", "decision_automatizada"])
                .and_then(Value::as_bool)
                .unwrap_or(false),
            explicit_consent: field(&["explicit_consent", "consentimiento_explicito"])
                .and_then(Value::as_bool)
                .unwrap_or(false),
            subject_count: field(&["subject_count", "cantidad_titulares"])
                .and_then(Value::as_u64)
                .unwrap_or(0),
            declared_volume: field(&["declared_volume", "volumen_datos"])
                .and_then(Value::as_str)
                .map(str::to_string),
            external_recipients,
            legal_basis: text(&["legal_basis", "base_legal"]),
            retention_period: text(&["retention_period", "plazo_conservacion"]),
        })
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Industry sector assigned to an activity.
///
/// Declaration order is the classification priority order: the classifier
/// tests most domain-specific sectors first and `General` is the fallback.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Sector {
    Health,
    Financial,
    Education,
    Government,
    Retail,
    Technology,
    Hr,
    Insurance,
    RealEstate,
    Transport,
    General,
}

impl Sector {
    /// Stable slug used in identifiers and serialized output.
    pub fn slug(&self) -> &'static str {
        match self {
            Sector::Health => "salud",
            Sector::Financial => "financiero",
            Sector::Education => "educacion",
            Sector::Government => "gobierno",
            Sector::Retail => "retail",
            Sector::Technology => "tecnologia",
            Sector::Hr => "rrhh",
            Sector::Insurance => "seguros",
            Sector::RealEstate => "inmobiliario",
            Sector::Transport => "transporte",
            Sector::General => "general",
        }
    }

    /// Sectors under heightened sectoral regulation.
    pub fn is_heavily_regulated(&self) -> bool {
        matches!(
            self,
            Sector::Health | Sector::Financial | Sector::Education | Sector::Government
        )
    }
}

impl std::fmt::Display for Sector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.slug())
    }
}

/// A category of sensitive personal data under Law 21.719.
///
/// Detected, never declared directly: derived from declared category tags
/// and keyword matches on free text. Declaration order is the deterministic
/// output order of the detector.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum SensitiveCategory {
    Health,
    Socioeconomic,
    Biometric,
    Minors,
    CriminalRecord,
    EthnicOrigin,
    PoliticalOpinion,
    ReligiousBelief,
    SexLife,
}

impl SensitiveCategory {
    /// All categories in deterministic detection order.
    pub const ALL: [SensitiveCategory; 9] = [
        SensitiveCategory::Health,
        SensitiveCategory::Socioeconomic,
        SensitiveCategory::Biometric,
        SensitiveCategory::Minors,
        SensitiveCategory::CriminalRecord,
        SensitiveCategory::EthnicOrigin,
        SensitiveCategory::PoliticalOpinion,
        SensitiveCategory::ReligiousBelief,
        SensitiveCategory::SexLife,
    ];

    /// Human-readable label (Spanish, matching the registry UI).
    pub fn label(&self) -> &'static str {
        match self {
            SensitiveCategory::Health => "datos de salud",
            SensitiveCategory::Socioeconomic => "situación socioeconómica",
            SensitiveCategory::Biometric => "datos biométricos",
            SensitiveCategory::Minors => "datos de menores de edad",
            SensitiveCategory::CriminalRecord => "antecedentes penales",
            SensitiveCategory::EthnicOrigin => "origen étnico",
            SensitiveCategory::PoliticalOpinion => "opinión política",
            SensitiveCategory::ReligiousBelief => "creencias religiosas",
            SensitiveCategory::SexLife => "vida sexual u orientación sexual",
        }
    }
}

impl std::fmt::Display for SensitiveCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Alert severity, from informational to critical.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
    Urgent,
    Critical,
}

/// Urgency of producing a required document.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    Low,
    Medium,
    High,
    Critical,
}

/// Compliance documents the engine can require.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    /// EIPD: Evaluación de Impacto en Protección de Datos
    ImpactAssessment,
    /// Impact assessment specific to automated decisions
    DecisionImpactAssessment,
    /// DPA / international transfer agreement
    TransferAgreement,
    MedicalConsent,
    ParentalAuthorization,
    ScoringPolicy,
    TransparencyPolicy,
    MassProcessingMeasures,
    VolumeAssessment,
    LegalBasisAnalysis,
    RetentionPolicy,
}

impl DocumentType {
    pub fn slug(&self) -> &'static str {
        match self {
            DocumentType::ImpactAssessment => "eipd",
            DocumentType::DecisionImpactAssessment => "eipd-decisiones",
            DocumentType::TransferAgreement => "contrato-transferencia",
            DocumentType::MedicalConsent => "consentimiento-medico",
            DocumentType::ParentalAuthorization => "autorizacion-parental",
            DocumentType::ScoringPolicy => "politica-scoring",
            DocumentType::TransparencyPolicy => "politica-transparencia",
            DocumentType::MassProcessingMeasures => "medidas-tratamiento-masivo",
            DocumentType::VolumeAssessment => "evaluacion-volumen",
            DocumentType::LegalBasisAnalysis => "analisis-base-legal",
            DocumentType::RetentionPolicy => "politica-retencion",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DocumentType::ImpactAssessment => {
                "Evaluación de Impacto en Protección de Datos (EIPD)"
            }
            DocumentType::DecisionImpactAssessment => {
                "Evaluación de impacto de decisiones automatizadas"
            }
            DocumentType::TransferAgreement => {
                "Contrato de transferencia internacional de datos"
            }
            DocumentType::MedicalConsent => "Consentimiento informado para datos de salud",
            DocumentType::ParentalAuthorization => "Autorización de padres o apoderados",
            DocumentType::ScoringPolicy => "Política de evaluación crediticia y scoring",
            DocumentType::TransparencyPolicy => "Política de transparencia activa",
            DocumentType::MassProcessingMeasures => {
                "Medidas especiales para tratamiento masivo"
            }
            DocumentType::VolumeAssessment => "Evaluación de volumen de tratamiento",
            DocumentType::LegalBasisAnalysis => "Análisis de base de licitud",
            DocumentType::RetentionPolicy => "Política de plazos de conservación",
        }
    }
}

impl std::fmt::Display for DocumentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A compliance alert produced by one rule module.
///
/// Immutable once created: later stages collect alerts, never mutate them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Alert {
    pub severity: Severity,
    pub title: String,
    pub description: String,

    /// The document this alert requires; correlates with `RequiredDocument`
    pub required_document: DocumentType,

    /// Citation of the legal article grounding the obligation
    pub legal_basis: String,

    /// Sector assigned to the activity when the alert was produced
    pub sector: Sector,
}

/// A document the activity legally requires.
///
/// The engine keeps one emission per legal justification; it never
/// deduplicates by type, so audit completeness is preserved even when two
/// rules require the same document for different reasons.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RequiredDocument {
    #[serde(rename = "type")]
    pub document_type: DocumentType,
    pub reason: String,
    pub urgency: Urgency,
    pub due_in_days: u32,
}

/// Overall risk level of the activity.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

/// An independent risk signal, drawn from a fixed catalogue.
///
/// Declaration order matches the aggregator's fixed evaluation order, so
/// the factor list of a result is deterministic.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", tag = "factor")]
pub enum RiskFactor {
    MultipleSensitiveCategories,
    MassScaleProcessing,
    AutomatedDecisionsOverSensitiveData,
    InternationalTransferOfSensitiveData,
    HeavilyRegulatedSector { sector: Sector },
    ExtensiveProfiling,
    ProlongedRetention,
}

impl std::fmt::Display for RiskFactor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskFactor::MultipleSensitiveCategories => {
                f.write_str("múltiples categorías de datos sensibles")
            }
            RiskFactor::MassScaleProcessing => f.write_str("tratamiento a gran escala"),
            RiskFactor::AutomatedDecisionsOverSensitiveData => {
                f.write_str("decisiones automatizadas sobre datos sensibles")
            }
            RiskFactor::InternationalTransferOfSensitiveData => {
                f.write_str("transferencia internacional de datos sensibles")
            }
            RiskFactor::HeavilyRegulatedSector { sector } => {
                write!(f, "sector altamente regulado: {sector}")
            }
            RiskFactor::ExtensiveProfiling => f.write_str("elaboración de perfiles extensiva"),
            RiskFactor::ProlongedRetention => f.write_str("conservación prolongada"),
        }
    }
}

/// Priority of a DPO notification.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
}

/// A DPO notification derived from one alert.
///
/// A pure data record: delivery belongs to collaborators. The `id` is
/// deterministic given the evaluation inputs and instant, and unique within
/// one evaluation call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Notification {
    pub id: String,
    pub severity: Severity,
    pub title: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub due_in_days: u32,

    /// Correlates this notification to one required document
    pub document_id: String,

    /// The activity that produced the notification
    pub source_activity_id: String,

    pub priority: Priority,
}

/// Result of evaluating one processing activity.
///
/// Created fresh inside one call to `evaluate`; never persisted or mutated
/// by the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub sector: Sector,
    pub alerts: Vec<Alert>,
    pub required_documents: Vec<RequiredDocument>,
    pub risk_level: RiskLevel,
    pub risk_factors: Vec<RiskFactor>,
    pub sensitive_categories: Vec<SensitiveCategory>,
    pub requires_prior_consultation: bool,
    pub notifications: Vec<Notification>,
    pub evaluated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_value_rejects_null() {
        let err = ProcessingActivity::from_value(&Value::Null).unwrap_err();
        assert!(err.to_string().contains("null"));
    }

    #[test]
    fn test_from_value_rejects_non_object() {
        assert!(ProcessingActivity::from_value(&json!("texto")).is_err());
        assert!(ProcessingActivity::from_value(&json!([1, 2])).is_err());
    }

    #[test]
    fn test_from_value_empty_object_defaults() {
        let activity = ProcessingActivity::from_value(&json!({})).unwrap();
        assert!(activity.name.is_empty());
        assert!(activity.legal_basis.is_empty());
        assert_eq!(activity.subject_count, 0);
        assert!(!activity.automated_decision);
        assert!(activity.external_recipients.is_empty());
    }

    #[test]
    fn test_from_value_ignores_malformed_fields() {
        // Wrong types degrade to defaults rather than failing the evaluation
        let activity = ProcessingActivity::from_value(&json!({
            "subject_count": "muchos",
            "automated_decision": "si",
            "external_recipients": "equifax",
        }))
        .unwrap();
        assert_eq!(activity.subject_count, 0);
        assert!(!activity.automated_decision);
        assert!(activity.external_recipients.is_empty());
    }

    #[test]
    fn test_from_value_accepts_spanish_field_names() {
        let activity = ProcessingActivity::from_value(&json!({
            "nombre": "Ficha de pacientes",
            "finalidad": "gestión clínica",
            "cantidad_titulares": 1200,
            "decision_automatizada": true,
            "destinatarios_externos": [{"nombre": "Lab Externo", "pais": "Perú"}],
        }))
        .unwrap();
        assert_eq!(activity.name, "Ficha de pacientes");
        assert_eq!(activity.subject_count, 1200);
        assert!(activity.automated_decision);
        assert_eq!(activity.external_recipients[0].country, "Perú");
    }

    #[test]
    fn test_searchable_text_is_lowercase() {
        let activity = ProcessingActivity {
            name: "Scoring CREDITICIO".to_string(),
            purpose: "Evaluación".to_string(),
            ..Default::default()
        };
        let text = activity.searchable_text();
        assert!(text.contains("scoring crediticio"));
        assert!(text.contains("evaluación"));
    }

    #[test]
    fn test_domestic_recipient_detection() {
        assert!(Recipient::new("Correos", "Chile").is_domestic_country());
        assert!(Recipient::new("Correos", "chile").is_domestic_country());
        assert!(Recipient::new("Correos", "").is_domestic_country());
        assert!(!Recipient::new("Equifax", "USA").is_domestic_country());
    }

    #[test]
    fn test_source_id_fallback() {
        let mut activity = ProcessingActivity::default();
        assert_eq!(activity.source_id(), "rat-sin-id");
        activity.id = Some("  ".to_string());
        assert_eq!(activity.source_id(), "rat-sin-id");
        activity.id = Some("rat-042".to_string());
        assert_eq!(activity.source_id(), "rat-042");
    }

    #[test]
    fn test_massive_volume_flag() {
        let mut activity = ProcessingActivity::default();
        assert!(!activity.declares_massive_volume());
        activity.declared_volume = Some("Masivo".to_string());
        assert!(activity.declares_massive_volume());
        activity.declared_volume = Some("bajo".to_string());
        assert!(!activity.declares_massive_volume());
    }
}
