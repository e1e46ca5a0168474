//! Source payloads as handed from an adapter to the normalizer.

use chrono::{DateTime, Utc};

use super::{Case, SourceId};

/// What a source found for a case number, before normalization.
#[derive(Clone, Debug)]
pub struct RawRecord {
    pub source: SourceId,
    pub retrieved_at: DateTime<Utc>,
    pub payload: RawPayload,
}

impl RawRecord {
    pub fn new(source: impl Into<SourceId>, payload: RawPayload) -> Self {
        Self {
            source: source.into(),
            retrieved_at: Utc::now(),
            payload,
        }
    }
}

/// Payload families. Each family has its own normalizer.
#[derive(Clone, Debug)]
pub enum RawPayload {
    /// `_source` document of a public registry search hit.
    Registry(serde_json::Value),
    /// Record from a secondary REST registry.
    Portal(serde_json::Value),
    /// Court web page returned by a consultation form.
    Html {
        court: String,
        url: String,
        body: String,
    },
    /// Record that is already canonical (fixtures, number-derived stubs).
    Canonical(Box<Case>),
}

impl RawPayload {
    pub fn family(&self) -> &'static str {
        match self {
            RawPayload::Registry(_) => "registry",
            RawPayload::Portal(_) => "portal",
            RawPayload::Html { .. } => "html",
            RawPayload::Canonical(_) => "canonical",
        }
    }
}
