//! Last-resort source that builds a skeleton case from the number itself.
//!
//! The unified number encodes the court and the filing year, which is enough
//! to register the case and let the monitoring job fill in the rest later.
//! Nothing beyond what the number encodes is filled in.

use async_trait::async_trait;

use crate::errors::SourceError;
use crate::models::{court_acronym, Case, CaseCategory, CaseNumber, RawPayload, RawRecord};
use crate::source::CaseSource;

pub const SOURCE_ID: &str = "NUMBER_ONLY";

#[derive(Default)]
pub struct NumberOnlySource;

impl NumberOnlySource {
    pub fn new() -> Self {
        Self
    }
}

pub(crate) fn skeleton_case(number: &CaseNumber) -> Option<Case> {
    let court = court_acronym(number)?;

    let mut case = Case::new(number.formatted());
    case.category = match number.justice_segment() {
        Some('5') => CaseCategory::Labor,
        _ => CaseCategory::Civil,
    };
    case.court = court;
    case.notes = number
        .filing_year()
        .map(|year| format!("Filed in {}; details pending from the court.", year));
    Some(case)
}

#[async_trait]
impl CaseSource for NumberOnlySource {
    fn id(&self) -> &'static str {
        SOURCE_ID
    }

    fn supports(&self, number: &CaseNumber) -> bool {
        court_acronym(number).is_some()
    }

    async fn lookup(&self, number: &CaseNumber) -> Result<Option<RawRecord>, SourceError> {
        Ok(skeleton_case(number)
            .map(|case| RawRecord::new(SOURCE_ID, RawPayload::Canonical(Box::new(case)))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CaseStatus;

    #[test]
    fn test_skeleton_from_labor_number() {
        let number = CaseNumber::parse("1000123-45.2023.5.02.0001").unwrap();
        let case = skeleton_case(&number).unwrap();

        assert_eq!(case.case_number, "1000123-45.2023.5.02.0001");
        assert_eq!(case.category, CaseCategory::Labor);
        assert_eq!(case.status, CaseStatus::Active);
        assert_eq!(case.court, "TRT2");
        assert!(case.filing_date.is_none());
        assert!(case.activity_log.is_empty());
        assert!(case.notes.unwrap().contains("2023"));
    }

    #[test]
    fn test_unknown_court_yields_nothing() {
        let number = CaseNumber::parse("1000123-45.2023.9.02.0001").unwrap();
        assert!(skeleton_case(&number).is_none());
    }
}
