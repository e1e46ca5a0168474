//! Case resolution.
//!
//! [`CaseResolver`] walks the configured sources in priority order and
//! normalizes the first match. [`LookupDiagnostics`] records what every
//! source answered along the way.

mod chain;
mod diagnostics;

pub use chain::{CaseLookup, CaseResolver};
pub use diagnostics::{AttemptOutcome, LookupDiagnostics, SkipReason, SourceAttempt};
