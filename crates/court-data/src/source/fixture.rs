//! In-memory source backed by a fixed set of canonical cases.
//!
//! Used for demos, offline installs and tests. Records are injected at
//! construction and never change afterwards.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;

use crate::errors::SourceError;
use crate::models::{Case, CaseNumber, RawPayload, RawRecord};
use crate::source::CaseSource;

pub const SOURCE_ID: &str = "FIXTURES";

pub struct FixtureSource {
    cases: HashMap<String, Case>,
}

impl FixtureSource {
    /// Indexes `cases` by the digits of their number. Records whose number
    /// does not parse are dropped.
    pub fn new(cases: Vec<Case>) -> Self {
        let cases = cases
            .into_iter()
            .filter_map(|case| match CaseNumber::parse(&case.case_number) {
                Ok(number) => Some((number.digits().to_string(), case)),
                Err(e) => {
                    log::warn!("Skipping fixture with invalid number: {}", e);
                    None
                }
            })
            .collect();
        Self { cases }
    }

    /// Reads a JSON array of cases.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let cases: Vec<Case> = serde_json::from_str(json)?;
        Ok(Self::new(cases))
    }

    pub fn from_file(path: &Path) -> std::io::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }
}

#[async_trait]
impl CaseSource for FixtureSource {
    fn id(&self) -> &'static str {
        SOURCE_ID
    }

    async fn lookup(&self, number: &CaseNumber) -> Result<Option<RawRecord>, SourceError> {
        Ok(self.cases.get(number.digits()).map(|case| {
            RawRecord::new(SOURCE_ID, RawPayload::Canonical(Box::new(case.clone())))
        }))
    }
}
