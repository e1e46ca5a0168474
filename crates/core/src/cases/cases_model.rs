//! Case domain models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use jurisdesk_court_data::{strip_separators, Case, CaseCategory, CaseStatus, Client, Movement, Party};

/// Input model for registering a case by hand
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCase {
    pub case_number: String,
    #[serde(default)]
    pub category: CaseCategory,
    #[serde(default)]
    pub status: CaseStatus,
    pub subject: Option<String>,
    pub court_class: Option<String>,
    pub claim_value: Option<Decimal>,
    pub client: Client,
    #[serde(default)]
    pub responsible_attorney: String,
    #[serde(default)]
    pub court: String,
    #[serde(default)]
    pub division: String,
    #[serde(default)]
    pub parties: Vec<Party>,
    pub notes: Option<String>,
}

/// Partial update of a case; `None` leaves the field untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseUpdate {
    pub category: Option<CaseCategory>,
    pub status: Option<CaseStatus>,
    pub subject: Option<String>,
    pub court_class: Option<String>,
    pub claim_value: Option<Decimal>,
    pub client: Option<Client>,
    pub responsible_attorney: Option<String>,
    pub court: Option<String>,
    pub division: Option<String>,
    pub parties: Option<Vec<Party>>,
    pub notes: Option<String>,
}

impl CaseUpdate {
    pub fn apply_to(self, case: &mut Case) {
        if let Some(category) = self.category {
            case.category = category;
        }
        if let Some(status) = self.status {
            case.status = status;
        }
        if self.subject.is_some() {
            case.subject = self.subject;
        }
        if self.court_class.is_some() {
            case.court_class = self.court_class;
        }
        if self.claim_value.is_some() {
            case.claim_value = self.claim_value;
        }
        if let Some(client) = self.client {
            case.client = client;
        }
        if let Some(attorney) = self.responsible_attorney {
            case.responsible_attorney = attorney;
        }
        if let Some(court) = self.court {
            case.court = court;
        }
        if let Some(division) = self.division {
            case.division = division;
        }
        if let Some(parties) = self.parties {
            case.parties = parties;
        }
        if self.notes.is_some() {
            case.notes = self.notes;
        }
    }
}

/// Input model for appending a movement to a case
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMovement {
    /// Defaults to now
    pub timestamp: Option<DateTime<Utc>>,
    pub kind: String,
    pub description: String,
    #[serde(default)]
    pub actor: String,
}

/// Case list filter. Every criterion that is set must match.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseFilter {
    /// Case-insensitive text matched against number, subject, client name
    /// and client tax id
    pub search: Option<String>,
    pub category: Option<CaseCategory>,
    pub status: Option<CaseStatus>,
}

impl CaseFilter {
    pub fn matches(&self, case: &Case) -> bool {
        if let Some(category) = self.category {
            if case.category != category {
                return false;
            }
        }
        if let Some(status) = self.status {
            if case.status != status {
                return false;
            }
        }

        match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(search) => {
                let needle = search.to_lowercase();
                let digits = strip_separators(search);
                let number_hit = case.case_number.to_lowercase().contains(&needle)
                    || (!digits.is_empty()
                        && digits.chars().all(|c| c.is_ascii_digit())
                        && strip_separators(&case.case_number).contains(&digits));

                number_hit
                    || case
                        .subject
                        .as_deref()
                        .is_some_and(|s| s.to_lowercase().contains(&needle))
                    || case.client.name.to_lowercase().contains(&needle)
                    || case.client.tax_id.to_lowercase().contains(&needle)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCount {
    pub status: CaseStatus,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCount {
    pub category: CaseCategory,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentMovement {
    pub case_id: String,
    pub case_number: String,
    pub movement: Movement,
}

/// Dashboard figures over the whole case collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseSummary {
    pub total_cases: usize,
    pub by_status: Vec<StatusCount>,
    pub by_category: Vec<CategoryCount>,
    pub total_claim_value: Decimal,
    /// Newest first
    pub recent_movements: Vec<RecentMovement>,
}

impl CaseSummary {
    pub fn from_cases(cases: &[Case], recent_limit: usize) -> Self {
        let by_status = CaseStatus::ALL
            .iter()
            .map(|&status| StatusCount {
                status,
                count: cases.iter().filter(|c| c.status == status).count(),
            })
            .collect();
        let by_category = CaseCategory::ALL
            .iter()
            .map(|&category| CategoryCount {
                category,
                count: cases.iter().filter(|c| c.category == category).count(),
            })
            .collect();

        let mut recent_movements: Vec<RecentMovement> = cases
            .iter()
            .flat_map(|case| {
                case.activity_log.iter().map(move |m| RecentMovement {
                    case_id: case.id.clone(),
                    case_number: case.case_number.clone(),
                    movement: m.clone(),
                })
            })
            .collect();
        recent_movements.sort_by(|a, b| b.movement.timestamp.cmp(&a.movement.timestamp));
        recent_movements.truncate(recent_limit);

        Self {
            total_cases: cases.len(),
            by_status,
            by_category,
            total_claim_value: cases.iter().filter_map(|c| c.claim_value).sum(),
            recent_movements,
        }
    }
}
