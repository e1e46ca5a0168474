//! Cases module - domain models, services, and traits.

mod cases_model;
mod cases_repository;
mod cases_service;
mod cases_traits;

#[cfg(test)]
mod cases_service_tests;

pub use cases_model::{
    CaseFilter, CaseSummary, CaseUpdate, CategoryCount, NewCase, NewMovement, RecentMovement,
    StatusCount,
};
pub use cases_repository::BlobCaseRepository;
pub use cases_service::CaseService;
pub use cases_traits::{CaseRepositoryTrait, CaseServiceTrait};

pub use jurisdesk_court_data::{
    Attachment, Case, CaseCategory, CaseStatus, Client, Movement, Party, PartyRole,
};
