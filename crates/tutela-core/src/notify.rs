//! DPO notification building.
//!
//! Converts the final alert list into notification records with
//! deterministic identifiers and deadlines. Notifications are pure data:
//! delivery (inbox, email, dashboard) belongs to collaborators, who can
//! safely retry without re-invoking the engine.

use chrono::{DateTime, Utc};

use crate::types::{Alert, Notification, Priority, RequiredDocument, Sector, Severity};

/// Fallback deadline when no required document matches the alert's type.
const DEFAULT_DUE_IN_DAYS: u32 = 15;

/// Generates notification identifiers.
///
/// Injectable so determinism is testable without monkey-patching time or
/// randomness. Implementations must be pure: the same inputs must always
/// produce the same id, and ids within one evaluation call must be unique
/// (the alert index guarantees that for the default generator).
pub trait IdGenerator {
    fn notification_id(
        &self,
        sector: Sector,
        source_activity_id: &str,
        alert_index: usize,
        created_at: DateTime<Utc>,
    ) -> String;
}

/// Default generator: `dpo-<sector>-<activity>-<index>-<millis>`.
///
/// Collision-resistant within a call because the index differs per alert,
/// and stable for identical input plus instant.
pub struct DefaultIdGenerator;

impl IdGenerator for DefaultIdGenerator {
    fn notification_id(
        &self,
        sector: Sector,
        source_activity_id: &str,
        alert_index: usize,
        created_at: DateTime<Utc>,
    ) -> String {
        format!(
            "dpo-{}-{}-{}-{}",
            sector.slug(),
            source_activity_id,
            alert_index,
            created_at.timestamp_millis()
        )
    }
}

/// Builds DPO notifications from the evaluation's alerts and documents.
pub struct NotificationBuilder {
    id_generator: Box<dyn IdGenerator>,
}

impl NotificationBuilder {
    pub fn new() -> Self {
        Self {
            id_generator: Box::new(DefaultIdGenerator),
        }
    }

    /// Use a custom id generator (fixture ids in tests).
    pub fn with_generator(id_generator: Box<dyn IdGenerator>) -> Self {
        Self { id_generator }
    }

    /// Build one notification per alert, in alert order.
    ///
    /// `due_in_days` is copied from the first required document matching
    /// the alert's document type; when no document matches, the default of
    /// 15 days applies.
    pub fn build(
        &self,
        alerts: &[Alert],
        documents: &[RequiredDocument],
        source_activity_id: &str,
        sector: Sector,
        created_at: DateTime<Utc>,
    ) -> Vec<Notification> {
        alerts
            .iter()
            .enumerate()
            .map(|(index, alert)| {
                let due_in_days = documents
                    .iter()
                    .find(|d| d.document_type == alert.required_document)
                    .map(|d| d.due_in_days)
                    .unwrap_or(DEFAULT_DUE_IN_DAYS);

                Notification {
                    id: self.id_generator.notification_id(
                        sector,
                        source_activity_id,
                        index,
                        created_at,
                    ),
                    severity: alert.severity,
                    title: alert.title.clone(),
                    description: alert.description.clone(),
                    created_at,
                    due_in_days,
                    document_id: format!(
                        "doc-{}-{}",
                        source_activity_id,
                        alert.required_document.slug()
                    ),
                    source_activity_id: source_activity_id.to_string(),
                    priority: priority_for(alert.severity),
                }
            })
            .collect()
    }
}

impl Default for NotificationBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn priority_for(severity: Severity) -> Priority {
    match severity {
        Severity::Critical => Priority::High,
        Severity::Urgent => Priority::Medium,
        Severity::Warning | Severity::Info => Priority::Low,
    }
}
