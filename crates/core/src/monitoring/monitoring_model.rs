//! Monitoring domain models.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use jurisdesk_court_data::{Case, Client, Movement};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WatchStatus {
    #[default]
    Watching,
    Paused,
    /// The last check could not reach any source.
    Error,
}

/// A case number checked periodically for new movements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchedCase {
    pub id: String,
    pub case_number: String,
    #[serde(default)]
    pub court: String,
    pub status: WatchStatus,
    pub interval_minutes: u32,
    pub last_checked_at: DateTime<Utc>,
    pub next_check_at: DateTime<Utc>,
    #[serde(default)]
    pub last_activity_date: Option<DateTime<Utc>>,
    /// Identity keys of every movement seen so far.
    #[serde(default)]
    pub known_movements: Vec<String>,
    #[serde(default)]
    pub client: Client,
    #[serde(default)]
    pub responsible_attorney: String,
    #[serde(default)]
    pub last_error: Option<String>,
}

impl WatchedCase {
    pub fn monitor_id(digits: &str) -> String {
        format!("monitor-{}", digits)
    }

    /// Registry entry for a freshly resolved case.
    pub fn from_case(digits: &str, case: &Case, request: &NewWatch, now: DateTime<Utc>) -> Self {
        let mut watched = Self {
            id: Self::monitor_id(digits),
            case_number: case.case_number.clone(),
            court: case.court.clone(),
            status: WatchStatus::Watching,
            interval_minutes: request.interval_minutes,
            last_checked_at: now,
            next_check_at: now,
            last_activity_date: case.last_activity_date,
            known_movements: identity_keys(&case.activity_log),
            client: request.client.clone(),
            responsible_attorney: request.responsible_attorney.clone(),
            last_error: None,
        };
        watched.schedule_after(now);
        watched
    }

    pub fn schedule_after(&mut self, now: DateTime<Utc>) {
        self.last_checked_at = now;
        self.next_check_at = now + Duration::minutes(i64::from(self.interval_minutes));
    }

    /// Paused cases are never due.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.status != WatchStatus::Paused && self.next_check_at <= now
    }
}

pub fn identity_keys(movements: &[Movement]) -> Vec<String> {
    movements.iter().map(Movement::identity_key).collect()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewWatch {
    pub case_number: String,
    #[serde(default)]
    pub client: Client,
    #[serde(default)]
    pub responsible_attorney: String,
    #[serde(default = "default_interval")]
    pub interval_minutes: u32,
}

fn default_interval() -> u32 {
    crate::constants::DEFAULT_MONITOR_INTERVAL_MINUTES
}

/// Result of checking one watched case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CheckOutcome {
    Unchanged {
        case_number: String,
    },
    #[serde(rename_all = "camelCase")]
    Changed {
        case_number: String,
        new_movements: Vec<Movement>,
        last_activity_date: Option<DateTime<Utc>>,
    },
    Failed {
        case_number: String,
        message: String,
    },
}

impl CheckOutcome {
    pub fn case_number(&self) -> &str {
        match self {
            Self::Unchanged { case_number }
            | Self::Changed { case_number, .. }
            | Self::Failed { case_number, .. } => case_number,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonitoringStats {
    pub total: usize,
    pub watching: usize,
    pub paused: usize,
    pub with_error: usize,
}

impl MonitoringStats {
    pub fn from_watched(watched: &[WatchedCase]) -> Self {
        let count = |status| watched.iter().filter(|w| w.status == status).count();
        Self {
            total: watched.len(),
            watching: count(WatchStatus::Watching),
            paused: count(WatchStatus::Paused),
            with_error: count(WatchStatus::Error),
        }
    }
}
