//! Error types for the court data crate.
//!
//! - [`SourceError`]: one source failed; the resolver logs it and moves on
//! - [`NormalizeError`]: a payload could not be read into a [`Case`](crate::models::Case)
//! - [`LookupError`]: the outcome of a failed lookup, surfaced to callers

use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Errors raised by a single case source.
#[derive(Error, Debug)]
pub enum SourceError {
    /// The request to the source timed out.
    #[error("Timeout: {source_id}")]
    Timeout { source_id: String },

    /// The source answered with a non-success HTTP status.
    #[error("HTTP {status} from {source_id}")]
    Status { source_id: String, status: u16 },

    /// The source refused our credentials.
    #[error("Unauthorized: {source_id}")]
    Unauthorized { source_id: String },

    /// The source rate limited the request (HTTP 429).
    #[error("Rate limited: {source_id}")]
    RateLimited { source_id: String },

    /// Transport level failure (DNS, TLS, connection reset).
    #[error("Request to {source_id} failed: {message}")]
    Transport { source_id: String, message: String },

    /// The response body could not be read.
    #[error("Unreadable response from {source_id}: {message}")]
    Parse { source_id: String, message: String },
}

impl SourceError {
    pub fn source_id(&self) -> &str {
        match self {
            Self::Timeout { source_id }
            | Self::Status { source_id, .. }
            | Self::Unauthorized { source_id }
            | Self::RateLimited { source_id }
            | Self::Transport { source_id, .. }
            | Self::Parse { source_id, .. } => source_id,
        }
    }

    /// Whether retrying the same source later could succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Timeout { .. } | Self::RateLimited { .. } | Self::Transport { .. } => true,
            Self::Status { status, .. } => *status >= 500,
            Self::Unauthorized { .. } | Self::Parse { .. } => false,
        }
    }

    pub(crate) fn from_reqwest(source_id: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout {
                source_id: source_id.to_string(),
            }
        } else if err.is_decode() {
            Self::Parse {
                source_id: source_id.to_string(),
                message: err.to_string(),
            }
        } else {
            Self::Transport {
                source_id: source_id.to_string(),
                message: err.to_string(),
            }
        }
    }
}

/// A payload that a normalizer could not turn into a case.
#[derive(Error, Debug)]
pub enum NormalizeError {
    /// The payload is not the document shape its family promises.
    #[error("Malformed {family} payload: {message}")]
    Malformed {
        family: &'static str,
        message: String,
    },

    /// A scraped page did not contain any recognised field.
    #[error("Scraped page from {court} matched no known field")]
    UnrecognisedPage { court: String },
}

/// One source that failed during a lookup.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceFailure {
    pub source_id: String,
    pub message: String,
}

impl fmt::Display for SourceFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.source_id, self.message)
    }
}

/// Why a lookup produced no case.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// The input is not a case number. No source was called.
    #[error("Invalid case number '{input}': {reason}")]
    InvalidFormat { input: String, reason: String },

    /// Every source answered that it does not know the number.
    #[error("Case {case_number} not found")]
    NotFound { case_number: String },

    /// No source matched and at least one of them failed.
    #[error("All sources failed for {case_number}: {}", join_failures(.failures))]
    AllSourcesFailed {
        case_number: String,
        failures: Vec<SourceFailure>,
    },
}

fn join_failures(failures: &[SourceFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transient_classification() {
        let timeout = SourceError::Timeout {
            source_id: "DATAJUD".to_string(),
        };
        assert!(timeout.is_transient());

        let server = SourceError::Status {
            source_id: "PORTAL".to_string(),
            status: 503,
        };
        assert!(server.is_transient());

        let client = SourceError::Status {
            source_id: "PORTAL".to_string(),
            status: 400,
        };
        assert!(!client.is_transient());
        assert_eq!(client.source_id(), "PORTAL");
    }

    #[test]
    fn test_all_sources_failed_message_lists_failures() {
        let err = LookupError::AllSourcesFailed {
            case_number: "1017593-56.2022.8.26.0001".to_string(),
            failures: vec![
                SourceFailure {
                    source_id: "DATAJUD".to_string(),
                    message: "Timeout: DATAJUD".to_string(),
                },
                SourceFailure {
                    source_id: "SCRAPE_TJSP".to_string(),
                    message: "HTTP 500 from SCRAPE_TJSP".to_string(),
                },
            ],
        };
        let message = err.to_string();
        assert!(message.contains("DATAJUD: Timeout"));
        assert!(message.contains("SCRAPE_TJSP: HTTP 500"));
    }
}
