//! Monitoring module - periodic re-resolution of watched cases.
//!
//! A check compares the movements returned by the lookup chain with the
//! ones seen before. Movements are compared by identity key (timestamp,
//! kind and description) since source ids change between lookups.

mod monitoring_model;
mod monitoring_service;
mod monitoring_traits;

#[cfg(test)]
mod monitoring_service_tests;

pub use monitoring_model::{
    identity_keys, CheckOutcome, MonitoringStats, NewWatch, WatchStatus, WatchedCase,
};
pub use monitoring_service::MonitoringService;
pub use monitoring_traits::MonitoringServiceTrait;
