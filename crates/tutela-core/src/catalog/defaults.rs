//! Built-in catalog tables for Chilean processing-activity records.
//!
//! Keywords are lowercase substrings; accented and unaccented variants are
//! both listed because registry free text is typed inconsistently. Matching
//! is deliberately high-recall: a false positive only surfaces a document
//! requirement a reviewer can discard, a false negative hides a legal
//! obligation.

use lazy_static::lazy_static;

use super::{Catalog, CategoryKeywords, SectorKeywords};
use crate::types::{Sector, SensitiveCategory};

/// Catalog revision. Bump when legal keyword tables change.
const BUILTIN_VERSION: &str = "2026-02-ley21719";

/// Sector table in classification priority order, most domain-specific
/// first. The fallback `general` is not an entry; the classifier returns it
/// when nothing matches.
const SECTOR_TABLE: &[(Sector, &[&str])] = &[
    (
        Sector::Health,
        &[
            "salud", "hospital", "clínic", "clinic", "paciente", "médic", "medic",
            "farmac", "isapre", "fonasa", "ficha clínica", "ficha clinica",
        ],
    ),
    (
        Sector::Financial,
        &[
            "banco", "bancari", "crédito", "credito", "crediticia", "crediticio",
            "financier", "scoring", "cobranza", "factoring",
        ],
    ),
    (
        Sector::Education,
        &[
            "educación", "educacion", "colegio", "escuela", "universidad", "alumno",
            "estudiante", "docente", "apoderado", "matrícula", "matricula",
        ],
    ),
    (
        Sector::Government,
        &[
            "municipalidad", "gobierno", "ministerio", "servicio público",
            "servicio publico", "fiscalización", "fiscalizacion", "sector público",
            "sector publico", "estatal",
        ],
    ),
    (
        Sector::Retail,
        &[
            "retail", "tienda", "comercio", "ecommerce", "e-commerce",
            "supermercado", "fidelización", "fidelizacion", "venta minorista",
        ],
    ),
    (
        Sector::Technology,
        &[
            "software", "tecnología", "tecnologia", "saas", "plataforma digital",
            "aplicación móvil", "aplicacion movil", "desarrollo de software",
        ],
    ),
    (
        Sector::Hr,
        &[
            "recursos humanos", "trabajador", "empleado", "remuneración",
            "remuneracion", "nómina", "nomina", "reclutamiento", "postulante",
            "selección de personal", "seleccion de personal",
        ],
    ),
    (
        Sector::Insurance,
        &[
            "aseguradora", "seguro", "póliza", "poliza", "siniestro",
            "corredora de seguros",
        ],
    ),
    (
        Sector::RealEstate,
        &[
            "inmobiliaria", "inmueble", "arriendo", "corretaje", "bienes raíces",
            "bienes raices", "propiedad",
        ],
    ),
    (
        Sector::Transport,
        &[
            "transporte", "logística", "logistica", "flota", "despacho", "courier",
            "encomienda",
        ],
    ),
];

/// Sensitive-category table: declared tags (with synonyms) plus free-text
/// keywords, per category.
const SENSITIVE_TABLE: &[(SensitiveCategory, &[&str], &[&str])] = &[
    (
        SensitiveCategory::Health,
        &["health", "salud", "datos de salud"],
        &[
            "salud", "médic", "medic", "clínic", "clinic", "paciente", "enfermedad",
            "diagnóstic", "diagnostic", "historial médico", "historial medico",
            "ficha clínica", "ficha clinica",
        ],
    ),
    (
        SensitiveCategory::Socioeconomic,
        &[
            "socioeconomic", "socioeconómico", "socioeconomico",
            "situación socioeconómica", "situacion socioeconomica",
        ],
        &[
            "socioeconómic", "socioeconomic", "crediticia", "crediticio", "scoring",
            "morosidad", "deuda", "ingresos", "remuneración", "remuneracion",
            "patrimonio",
        ],
    ),
    (
        SensitiveCategory::Biometric,
        &[
            "biometric", "biometrics", "fingerprint", "biometría", "biometria",
            "huella",
        ],
        &[
            "biométric", "biometric", "huella", "reconocimiento facial",
            "geometría facial", "geometria facial", "iris",
        ],
    ),
    (
        SensitiveCategory::Minors,
        &["minors", "menores", "niños", "ninos", "nna"],
        &[
            "menor de edad", "menores de edad", "niñ", "adolescente", "apoderado",
            "escolar", "parvul",
        ],
    ),
    (
        SensitiveCategory::CriminalRecord,
        &["criminal_record", "antecedentes penales"],
        &["penal", "antecedente", "delito", "condena"],
    ),
    (
        SensitiveCategory::EthnicOrigin,
        &["ethnic_origin", "origen étnico", "origen etnico"],
        &[
            "étnic", "etnic", "indígena", "indigena", "pueblo originario",
            "mapuche",
        ],
    ),
    (
        SensitiveCategory::PoliticalOpinion,
        &["political_opinion", "opinión política", "opinion politica"],
        &[
            // "política" alone means "policy"; only explicit phrasings count
            "opinión política", "opinion politica", "afiliación política",
            "afiliacion politica", "partido político", "partido politico",
            "sindical", "sindicato", "militancia",
        ],
    ),
    (
        SensitiveCategory::ReligiousBelief,
        &["religious_belief", "creencias religiosas"],
        &[
            "religios", "iglesia", "culto", "creencia", "confesión religiosa",
            "confesion religiosa",
        ],
    ),
    (
        SensitiveCategory::SexLife,
        &[
            "sex_life", "vida sexual", "orientación sexual", "orientacion sexual",
        ],
        &[
            "vida sexual", "orientación sexual", "orientacion sexual",
            "identidad de género", "identidad de genero", "transgénero",
            "transgenero",
        ],
    ),
];

/// Name fragments of well-known cloud/SaaS vendors. A recipient whose name
/// contains any fragment is treated as international even when its country
/// field is empty.
const INTERNATIONAL_PROVIDERS: &[&str] = &[
    "amazon", "aws", "google", "microsoft", "azure", "meta", "facebook",
    "salesforce", "oracle", "sap", "dropbox", "mailchimp", "hubspot", "zoom",
    "slack", "openai", "cloudflare", "equifax", "experian",
];

/// Purpose keywords indicating extensive profiling.
const PROFILING_KEYWORDS: &[&str] = &[
    "perfil", "perfilamiento", "profiling", "segmentación", "segmentacion",
    "scoring", "comportamiento", "hábitos", "habitos", "predicción",
    "prediccion",
];

lazy_static! {
    static ref BUILTIN: Catalog = Catalog {
        version: BUILTIN_VERSION.to_string(),
        sector_keywords: SECTOR_TABLE
            .iter()
            .map(|(sector, keywords)| SectorKeywords {
                sector: *sector,
                keywords: keywords.iter().map(|k| k.to_string()).collect(),
            })
            .collect(),
        sensitive_keywords: SENSITIVE_TABLE
            .iter()
            .map(|(category, declared_tags, keywords)| CategoryKeywords {
                category: *category,
                declared_tags: declared_tags.iter().map(|t| t.to_string()).collect(),
                keywords: keywords.iter().map(|k| k.to_string()).collect(),
            })
            .collect(),
        international_providers: INTERNATIONAL_PROVIDERS
            .iter()
            .map(|p| p.to_string())
            .collect(),
        profiling_keywords: PROFILING_KEYWORDS.iter().map(|k| k.to_string()).collect(),
    };
}

/// The built-in Chilean catalog.
pub fn builtin() -> &'static Catalog {
    &BUILTIN
}
