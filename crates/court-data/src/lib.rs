//! JurisDesk Court Data Crate
//!
//! Looks up a court case by its number across several sources and turns
//! whatever the source returned into one canonical [`Case`].
//!
//! # Overview
//!
//! - Case number validation and court identification
//! - Sources: the public registry, a secondary portal, court consultation
//!   pages, local fixtures, and a number-only fallback
//! - Normalizers per payload family (structured JSON, labeled HTML)
//! - An ordered resolver where the first match wins
//!
//! # Architecture
//!
//! ```text
//! +------------------+
//! |   "0001234-..."  |  (user input)
//! +------------------+
//!          |
//!          v
//! +------------------+
//! |   CaseNumber     |  (validated digits)
//! +------------------+
//!          |
//!          v
//! +------------------+     +------------------+
//! |  CaseResolver    | --> |   CaseSource     |  (DataJud, portal, scrapers, ...)
//! +------------------+     +------------------+
//!          |                        |
//!          |                        v
//!          |               +------------------+
//!          |               |    RawRecord     |  (registry / portal / html)
//!          |               +------------------+
//!          |                        |
//!          v                        v
//! +------------------+     +------------------+
//! |      Case        | <-- |   Normalizer     |
//! +------------------+     +------------------+
//! ```
//!
//! # Core Types
//!
//! - [`CaseNumber`] - Validated case number
//! - [`Case`] - Canonical case record
//! - [`RawRecord`] - Source payload before normalization
//! - [`LookupError`] - Why a lookup produced no case
//!
//! # Type Aliases
//!
//! - [`SourceId`] - Source identifier (e.g., "DATAJUD", "SCRAPE_TJSP")

pub mod config;
pub mod errors;
pub mod models;
pub mod normalizer;
pub mod resolver;
pub mod source;

pub use models::{
    court_acronym, registry_index, strip_separators, Attachment, Case, CaseCategory, CaseNumber,
    CaseStatus, Client, Movement, Party, PartyRole, RawPayload, RawRecord, SourceId,
};

pub use config::SourceConfig;
pub use errors::{LookupError, NormalizeError, SourceError, SourceFailure};
pub use normalizer::{normalize, parse_money};
pub use resolver::{CaseLookup, CaseResolver, LookupDiagnostics};
pub use source::{default_sources, CaseSource, FixtureSource};
