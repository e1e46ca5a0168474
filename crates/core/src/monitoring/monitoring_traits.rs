use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::monitoring_model::{CheckOutcome, MonitoringStats, NewWatch, WatchedCase};
use crate::errors::Result;

/// Trait for case monitoring operations.
///
/// Every operation taking a case number accepts it with or without
/// separators.
#[async_trait]
pub trait MonitoringServiceTrait: Send + Sync {
    fn list(&self) -> Result<Vec<WatchedCase>>;
    fn get(&self, case_number: &str) -> Result<WatchedCase>;
    fn stats(&self) -> Result<MonitoringStats>;

    /// Starts watching a case. The case must resolve first.
    async fn watch(&self, request: NewWatch) -> Result<WatchedCase>;
    async fn pause(&self, case_number: &str) -> Result<WatchedCase>;
    async fn resume(&self, case_number: &str) -> Result<WatchedCase>;
    async fn stop(&self, case_number: &str) -> Result<()>;

    /// Re-resolves one watched case and records what changed.
    async fn check(&self, case_number: &str) -> Result<CheckOutcome>;
    /// Checks every case whose next check is due at `now`.
    async fn check_due(&self, now: DateTime<Utc>) -> Result<Vec<CheckOutcome>>;
}
