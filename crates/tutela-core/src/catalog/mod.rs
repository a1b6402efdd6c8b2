//! Keyword catalog: the engine's configuration data.
//!
//! The catalog holds the legal-text tables the classifiers and rule modules
//! match against: sector keywords (in classification priority order),
//! sensitive-category tags and keywords, the known international provider
//! list, and profiling keywords. Keeping them as named, versioned data means
//! legal updates ship as catalog edits, not code changes, and tests can
//! substitute fixture tables.

mod defaults;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::types::{Sector, SensitiveCategory};

pub use defaults::builtin;

/// Errors that can occur when loading a catalog.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Catalog validation failed: {0}")]
    Validation(String),
}

/// Keywords that classify an activity into one sector.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SectorKeywords {
    pub sector: Sector,
    pub keywords: Vec<String>,
}

/// Declared tags and free-text keywords that detect one sensitive category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryKeywords {
    pub category: SensitiveCategory,

    /// Tags matched against `declared_data_categories`, including synonyms
    pub declared_tags: Vec<String>,

    /// Substrings matched against the activity's free text
    pub keywords: Vec<String>,
}

/// The complete keyword catalog.
///
/// Entry order in `sector_keywords` is the classification priority order:
/// the classifier returns the first sector with any keyword match. The
/// built-in tables order most domain-specific sectors first (health before
/// financial before education, and so on).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    /// Catalog revision, bumped on legal-text updates
    pub version: String,

    /// Ordered sector table; first match wins
    pub sector_keywords: Vec<SectorKeywords>,

    /// Sensitive-category table; all entries are evaluated independently
    pub sensitive_keywords: Vec<CategoryKeywords>,

    /// Name fragments of well-known cloud/SaaS vendors whose presence marks
    /// a recipient as international even without a declared country
    pub international_providers: Vec<String>,

    /// Purpose keywords that indicate extensive profiling
    pub profiling_keywords: Vec<String>,
}

impl Catalog {
    /// The built-in Chilean catalog.
    pub fn builtin() -> &'static Catalog {
        defaults::builtin()
    }

    /// Parse a catalog from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, CatalogError> {
        let catalog: Catalog = serde_yaml::from_str(yaml)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Parse a catalog from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let catalog: Catalog = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Load a catalog from a file, dispatching on extension.
    ///
    /// `.json` files are parsed as JSON; anything else as YAML.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json(&content),
            _ => Self::from_yaml(&content),
        }
    }

    /// Validate catalog invariants.
    ///
    /// All keywords and tags must be lowercase and non-empty because
    /// matching lower-cases the activity text only, never the catalog.
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.version.trim().is_empty() {
            return Err(CatalogError::Validation("version must not be empty".into()));
        }
        if self.sector_keywords.is_empty() {
            return Err(CatalogError::Validation(
                "sector_keywords must not be empty".into(),
            ));
        }
        if self.sensitive_keywords.is_empty() {
            return Err(CatalogError::Validation(
                "sensitive_keywords must not be empty".into(),
            ));
        }

        let all_terms = self
            .sector_keywords
            .iter()
            .flat_map(|s| s.keywords.iter())
            .chain(self.sensitive_keywords.iter().flat_map(|c| {
                c.declared_tags.iter().chain(c.keywords.iter())
            }))
            .chain(self.international_providers.iter())
            .chain(self.profiling_keywords.iter());

        for term in all_terms {
            if term.trim().is_empty() {
                return Err(CatalogError::Validation(
                    "keywords must not be empty strings".into(),
                ));
            }
            if term.chars().any(|c| c.is_uppercase()) {
                return Err(CatalogError::Validation(format!(
                    "keyword '{term}' must be lowercase"
                )));
            }
        }

        Ok(())
    }

    /// Entry for one sensitive category, if present in the table.
    pub fn category_entry(&self, category: SensitiveCategory) -> Option<&CategoryKeywords> {
        self.sensitive_keywords
            .iter()
            .find(|e| e.category == category)
    }

    /// Whether a recipient name matches the known international provider list.
    ///
    /// Case-insensitive substring match over name fragments.
    pub fn is_known_international_provider(&self, recipient_name: &str) -> bool {
        let name = recipient_name.to_lowercase();
        self.international_providers
            .iter()
            .any(|fragment| name.contains(fragment.as_str()))
    }
}

impl Default for Catalog {
    fn default() -> Self {
        builtin().clone()
    }
}
