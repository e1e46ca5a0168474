//! Court data models
//!
//! - `types` - Type aliases for common identifiers (SourceId)
//! - `case` - Canonical case record (Case, Party, Movement, ...)
//! - `case_number` - Validated case number (CaseNumber)
//! - `court` - Court identification from a case number
//! - `raw` - Source payloads before normalization (RawRecord)

mod case;
mod case_number;
mod court;
mod raw;
mod types;

pub use case::{
    Attachment, Case, CaseCategory, CaseStatus, Client, Movement, Party, PartyRole,
};
pub use case_number::{strip_separators, CaseNumber, MIN_DIGITS};
pub use court::{court_acronym, registry_index};
pub use raw::{RawPayload, RawRecord};
pub use types::SourceId;
