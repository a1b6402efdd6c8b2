//! Risk aggregation: independent signals into one overall risk level.
//!
//! The aggregator applies strict, non-configurable policy rules. Seven
//! factor checks run in a fixed order so the factor list is deterministic,
//! then the threshold ladder decides the level:
//!
//! 1. 3 or more factors → CRITICAL
//! 2. exactly 2 factors → HIGH
//! 3. fewer than 2 factors but 2 or more alerts → MEDIUM
//! 4. otherwise → LOW
//!
//! Prior consultation is triggered by 2 or more factors, independent of the
//! level wording. These thresholds are governance machinery, not a tuning
//! toy.

use lazy_static::lazy_static;
use regex::Regex;

use crate::catalog::Catalog;
use crate::rules::international_recipients;
use crate::types::{Alert, ProcessingActivity, RiskFactor, RiskLevel, Sector, SensitiveCategory};

/// Factor count at or above which the level is CRITICAL.
pub const CRITICAL_FACTOR_COUNT: usize = 3;

/// Factor count at or above which prior consultation is required.
pub const PRIOR_CONSULTATION_FACTOR_COUNT: usize = 2;

/// Subject count above which processing counts as mass-scale. Matches the
/// volume rule's lower band on purpose: the two signals are deliberately
/// not de-duplicated.
const MASS_SCALE_SUBJECTS: u64 = 10_000;

/// Declared retention of this many years or more counts as prolonged.
const PROLONGED_RETENTION_YEARS: u32 = 5;

lazy_static! {
    /// Captures "N años" / "N anos" / "N years" declarations.
    static ref RETENTION_YEARS: Regex =
        Regex::new(r"(\d+)\s*(?:años|anos|years)").expect("static regex");
}

/// Markers of an unbounded retention declaration.
const UNBOUNDED_RETENTION_MARKERS: &[&str] = &["indefinid", "permanente", "perpetu"];

/// Aggregated risk assessment for one activity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RiskAssessment {
    pub risk_factors: Vec<RiskFactor>,
    pub risk_level: RiskLevel,
    pub requires_prior_consultation: bool,
}

/// The risk aggregator combines signals from every rule stage.
pub struct RiskAggregator;

impl RiskAggregator {
    pub fn new() -> Self {
        Self
    }

    /// Compute the ordered factor list, the risk level, and the prior
    /// consultation flag.
    pub fn aggregate(
        &self,
        activity: &ProcessingActivity,
        sensitive_categories: &[SensitiveCategory],
        sector: Sector,
        alerts: &[Alert],
        catalog: &Catalog,
    ) -> RiskAssessment {
        let mut factors = Vec::new();

        if sensitive_categories.len() >= 2 {
            factors.push(RiskFactor::MultipleSensitiveCategories);
        }

        if activity.subject_count > MASS_SCALE_SUBJECTS || activity.declares_massive_volume() {
            factors.push(RiskFactor::MassScaleProcessing);
        }

        if activity.automated_decision && !sensitive_categories.is_empty() {
            factors.push(RiskFactor::AutomatedDecisionsOverSensitiveData);
        }

        if !sensitive_categories.is_empty()
            && !international_recipients(activity, catalog).is_empty()
        {
            factors.push(RiskFactor::InternationalTransferOfSensitiveData);
        }

        if sector.is_heavily_regulated() {
            factors.push(RiskFactor::HeavilyRegulatedSector { sector });
        }

        let purpose = activity.purpose.to_lowercase();
        if catalog
            .profiling_keywords
            .iter()
            .any(|kw| purpose.contains(kw.as_str()))
        {
            factors.push(RiskFactor::ExtensiveProfiling);
        }

        if implies_prolonged_retention(&activity.retention_period) {
            factors.push(RiskFactor::ProlongedRetention);
        }

        let risk_level = if factors.len() >= CRITICAL_FACTOR_COUNT {
            RiskLevel::Critical
        } else if factors.len() == 2 {
            RiskLevel::High
        } else if alerts.len() >= 2 {
            RiskLevel::Medium
        } else {
            RiskLevel::Low
        };

        let requires_prior_consultation = factors.len() >= PRIOR_CONSULTATION_FACTOR_COUNT;

        tracing::debug!(
            factors = factors.len(),
            level = ?risk_level,
            prior_consultation = requires_prior_consultation,
            "risk aggregated"
        );

        RiskAssessment {
            risk_factors: factors,
            risk_level,
            requires_prior_consultation,
        }
    }
}

impl Default for RiskAggregator {
    fn default() -> Self {
        Self::new()
    }
}

/// Whether the retention text implies a multi-year or unbounded period.
fn implies_prolonged_retention(retention_period: &str) -> bool {
    let text = retention_period.to_lowercase();
    if UNBOUNDED_RETENTION_MARKERS.iter().any(|m| text.contains(m)) {
        return true;
    }
    RETENTION_YEARS
        .captures(&text)
        .and_then(|c| c[1].parse::<u32>().ok())
        .map(|years| years >= PROLONGED_RETENTION_YEARS)
        .unwrap_or(false)
}
