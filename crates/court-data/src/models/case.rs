//! Canonical case record shared by every source and by the domain layer.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Area of law a case belongs to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseCategory {
    #[default]
    Civil,
    Criminal,
    Labor,
    Tax,
    Administrative,
}

impl CaseCategory {
    pub const ALL: [CaseCategory; 5] = [
        CaseCategory::Civil,
        CaseCategory::Criminal,
        CaseCategory::Labor,
        CaseCategory::Tax,
        CaseCategory::Administrative,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CaseCategory::Civil => "civil",
            CaseCategory::Criminal => "criminal",
            CaseCategory::Labor => "labor",
            CaseCategory::Tax => "tax",
            CaseCategory::Administrative => "administrative",
        }
    }
}

/// Procedural status of a case.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseStatus {
    #[default]
    Active,
    Archived,
    Suspended,
    Concluded,
}

impl CaseStatus {
    pub const ALL: [CaseStatus; 4] = [
        CaseStatus::Active,
        CaseStatus::Archived,
        CaseStatus::Suspended,
        CaseStatus::Concluded,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CaseStatus::Active => "active",
            CaseStatus::Archived => "archived",
            CaseStatus::Suspended => "suspended",
            CaseStatus::Concluded => "concluded",
        }
    }
}

/// The firm's client on a case.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub name: String,
    pub tax_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartyRole {
    Plaintiff,
    Defendant,
    Other,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Party {
    pub name: String,
    pub role: PartyRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attorney: Option<String>,
}

/// One entry of a case's activity log.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movement {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub kind: String,
    pub description: String,
    pub actor: String,
}

impl Movement {
    pub fn new(
        timestamp: DateTime<Utc>,
        kind: impl Into<String>,
        description: impl Into<String>,
        actor: impl Into<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            timestamp,
            kind: kind.into(),
            description: description.into(),
            actor: actor.into(),
        }
    }

    /// Source-independent identity of a movement.
    ///
    /// Ids are regenerated on every lookup, so change detection compares
    /// movements by timestamp, kind and description instead.
    pub fn identity_key(&self) -> String {
        format!(
            "{}-{}-{}",
            self.timestamp.timestamp_millis(),
            self.kind,
            self.description
        )
    }
}

/// Metadata of a document attached to a case.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attachment {
    pub id: String,
    pub name: String,
    pub kind: String,
    pub size: u64,
    pub uploaded_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Canonical lawsuit record.
///
/// Every source payload is normalized into this shape. Optional fields stay
/// `None` when the source did not report them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Case {
    pub id: String,
    pub case_number: String,
    pub category: CaseCategory,
    pub status: CaseStatus,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub court_class: Option<String>,
    #[serde(default)]
    pub situation: Option<String>,
    #[serde(default)]
    pub claim_value: Option<Decimal>,
    #[serde(default)]
    pub filing_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_activity_date: Option<DateTime<Utc>>,
    pub client: Client,
    #[serde(default)]
    pub responsible_attorney: String,
    #[serde(default)]
    pub court: String,
    #[serde(default)]
    pub division: String,
    #[serde(default)]
    pub parties: Vec<Party>,
    #[serde(default)]
    pub activity_log: Vec<Movement>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    #[serde(default)]
    pub notes: Option<String>,
    /// Id of the source that produced the record, `None` for manual entries.
    #[serde(default)]
    pub source: Option<String>,
}

impl Case {
    /// Empty record for `case_number` with a fresh id.
    pub fn new(case_number: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            case_number: case_number.into(),
            category: CaseCategory::default(),
            status: CaseStatus::default(),
            subject: None,
            court_class: None,
            situation: None,
            claim_value: None,
            filing_date: None,
            last_activity_date: None,
            client: Client::default(),
            responsible_attorney: String::new(),
            court: String::new(),
            division: String::new(),
            parties: Vec::new(),
            activity_log: Vec::new(),
            attachments: Vec::new(),
            notes: None,
            source: None,
        }
    }

    pub fn plaintiffs(&self) -> impl Iterator<Item = &Party> {
        self.parties
            .iter()
            .filter(|p| p.role == PartyRole::Plaintiff)
    }

    pub fn defendants(&self) -> impl Iterator<Item = &Party> {
        self.parties
            .iter()
            .filter(|p| p.role == PartyRole::Defendant)
    }

    /// Timestamp of the newest movement in the log, if any.
    pub fn latest_movement_at(&self) -> Option<DateTime<Utc>> {
        self.activity_log.iter().map(|m| m.timestamp).max()
    }
}
