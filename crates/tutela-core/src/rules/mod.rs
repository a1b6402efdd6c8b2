//! The seven compliance rule modules.
//!
//! Each module reads the activity plus the shared classifier outputs and
//! returns its own immutable [`RuleOutcome`]. Modules cannot see each
//! other's outcomes and share no mutable state; [`run_all`] concatenates
//! their alerts and documents in a fixed order so results are reproducible.

mod automated_decision;
mod international_transfer;
mod legitimation;
mod retention;
mod sector_specific;
mod sensitivity;
mod volume;

pub use automated_decision::AutomatedDecisionRule;
pub use international_transfer::{international_recipients, InternationalTransferRule};
pub use legitimation::LegitimationRule;
pub use retention::RetentionRule;
pub use sector_specific::SectorSpecificRule;
pub use sensitivity::SensitivityRule;
pub use volume::VolumeRule;

use crate::catalog::Catalog;
use crate::types::{Alert, ProcessingActivity, RequiredDocument, Sector, SensitiveCategory};

/// Read-only input shared by every rule module.
pub struct RuleContext<'a> {
    pub activity: &'a ProcessingActivity,
    pub sector: Sector,
    pub sensitive_categories: &'a [SensitiveCategory],
    pub catalog: &'a Catalog,
}

/// Output of one rule module: zero or more alert/document pairs.
#[derive(Debug, Default)]
pub struct RuleOutcome {
    pub alerts: Vec<Alert>,
    pub documents: Vec<RequiredDocument>,
}

impl RuleOutcome {
    /// Outcome with nothing to report.
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Trait implemented by all rule modules.
pub trait RuleModule {
    /// Stable module name, used in logs.
    fn name(&self) -> &'static str;

    /// Evaluate the activity against this module's rule.
    fn evaluate(&self, ctx: &RuleContext<'_>) -> RuleOutcome;
}

/// Run every rule module in the fixed evaluation order and concatenate
/// their outputs.
///
/// The order (sensitivity, automated decision, international transfer,
/// sector specific, volume, legitimation, retention) does not affect which
/// rules fire, only the ordering of the final lists, which must be
/// deterministic for reproducible fixtures.
pub fn run_all(ctx: &RuleContext<'_>) -> (Vec<Alert>, Vec<RequiredDocument>) {
    let modules: [&dyn RuleModule; 7] = [
        &SensitivityRule,
        &AutomatedDecisionRule,
        &InternationalTransferRule,
        &SectorSpecificRule,
        &VolumeRule,
        &LegitimationRule,
        &RetentionRule,
    ];

    let mut alerts = Vec::new();
    let mut documents = Vec::new();
    for module in modules {
        let outcome = module.evaluate(ctx);
        if !outcome.alerts.is_empty() {
            tracing::debug!(
                module = module.name(),
                alerts = outcome.alerts.len(),
                "rule module fired"
            );
        }
        alerts.extend(outcome.alerts);
        documents.extend(outcome.documents);
    }
    (alerts, documents)
}

#[cfg(test)]
pub(crate) mod testutil {
    use super::*;

    /// Evaluate one module with classifiers run on the built-in catalog.
    pub fn evaluate_module(module: &dyn RuleModule, activity: &ProcessingActivity) -> RuleOutcome {
        let catalog = Catalog::builtin();
        let sector = crate::classifier::classify_sector(activity, catalog);
        let sensitive = crate::classifier::detect_sensitive(activity, catalog);
        module.evaluate(&RuleContext {
            activity,
            sector,
            sensitive_categories: &sensitive,
            catalog,
        })
    }
}
