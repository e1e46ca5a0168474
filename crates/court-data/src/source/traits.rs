//! Case source trait definition.

use async_trait::async_trait;

use crate::errors::SourceError;
use crate::models::{CaseNumber, RawRecord};

/// A place where a case can be looked up by its number.
///
/// Implement this trait to add a new registry, portal or court site. The
/// resolver calls sources one at a time in the order they were registered
/// and stops at the first one that returns a record.
///
/// # Contract
///
/// - `Ok(Some(record))` - the source knows the case
/// - `Ok(None)` - the source answered and does not know the case
/// - `Err(_)` - the source could not answer (transport, status, parse)
#[async_trait]
pub trait CaseSource: Send + Sync {
    /// Unique identifier for this source, e.g. "DATAJUD" or "SCRAPE_TJSP".
    ///
    /// Used for logging, diagnostics and as the `source` of produced cases.
    fn id(&self) -> &'static str;

    /// Whether this source can serve `number` at all.
    ///
    /// Sources that only cover some courts return `false` for the others and
    /// are skipped without being called. Defaults to `true`.
    fn supports(&self, number: &CaseNumber) -> bool {
        let _ = number;
        true
    }

    /// Look up a case by number.
    async fn lookup(&self, number: &CaseNumber) -> Result<Option<RawRecord>, SourceError>;
}
