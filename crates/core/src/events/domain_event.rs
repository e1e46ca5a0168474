//! Domain event types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Domain events emitted by core services after successful mutations.
///
/// These events represent facts about domain data changes. Runtime adapters
/// translate them into platform-specific actions (notifications, push
/// messages, audit logs).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DomainEvent {
    /// Cases were created, updated, or deleted.
    CasesChanged { case_ids: Vec<String> },

    /// A case was imported from an external court source.
    CaseImported {
        case_id: String,
        case_number: String,
        source: Option<String>,
    },

    /// Fees, expenses, or payments of these cases changed.
    LedgersChanged { case_ids: Vec<String> },

    /// A monitored case has new movements or a newer last activity.
    MonitoredCaseChanged {
        case_number: String,
        new_movements: Vec<String>,
        /// Set when the last activity date moved forward
        last_activity_date: Option<DateTime<Utc>>,
    },

    /// A monitored case could not be looked up.
    MonitoringFailed { case_number: String, message: String },
}

impl DomainEvent {
    /// Creates a CasesChanged event.
    pub fn cases_changed(case_ids: Vec<String>) -> Self {
        Self::CasesChanged { case_ids }
    }

    /// Creates a CaseImported event.
    pub fn case_imported(case_id: String, case_number: String, source: Option<String>) -> Self {
        Self::CaseImported {
            case_id,
            case_number,
            source,
        }
    }

    /// Creates a LedgersChanged event.
    pub fn ledgers_changed(case_ids: Vec<String>) -> Self {
        Self::LedgersChanged { case_ids }
    }

    /// Creates a MonitoredCaseChanged event.
    pub fn monitored_case_changed(
        case_number: String,
        new_movements: Vec<String>,
        last_activity_date: Option<DateTime<Utc>>,
    ) -> Self {
        Self::MonitoredCaseChanged {
            case_number,
            new_movements,
            last_activity_date,
        }
    }

    /// Creates a MonitoringFailed event.
    pub fn monitoring_failed(case_number: String, message: String) -> Self {
        Self::MonitoringFailed {
            case_number,
            message,
        }
    }
}
