//! Unified case number (NNNNNNN-DD.AAAA.J.TR.OOOO).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::LookupError;

/// Minimum number of digits a case number must carry.
pub const MIN_DIGITS: usize = 20;

/// Characters accepted as visual separators inside a case number.
const SEPARATORS: &[char] = &['.', '-', '/', ' ', '\t'];

/// A validated case number, stored as its bare digits.
///
/// Construction strips separators and rejects anything that is not at least
/// [`MIN_DIGITS`] ASCII digits, so two spellings of the same number compare
/// equal.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CaseNumber {
    digits: String,
}

impl CaseNumber {
    pub fn parse(input: &str) -> Result<Self, LookupError> {
        let digits = strip_separators(input);

        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(LookupError::InvalidFormat {
                input: input.to_string(),
                reason: "case number must contain only digits and separators".to_string(),
            });
        }
        if digits.len() < MIN_DIGITS {
            return Err(LookupError::InvalidFormat {
                input: input.to_string(),
                reason: format!(
                    "expected at least {} digits, got {}",
                    MIN_DIGITS,
                    digits.len()
                ),
            });
        }

        Ok(Self { digits })
    }

    pub fn digits(&self) -> &str {
        &self.digits
    }

    /// Canonical display form. Numbers longer than the unified layout are
    /// shown as bare digits.
    pub fn formatted(&self) -> String {
        if self.digits.len() != MIN_DIGITS {
            return self.digits.clone();
        }
        let d = &self.digits;
        format!(
            "{}-{}.{}.{}.{}.{}",
            &d[0..7],
            &d[7..9],
            &d[9..13],
            &d[13..14],
            &d[14..16],
            &d[16..20]
        )
    }

    /// Filing year encoded in the number.
    pub fn filing_year(&self) -> Option<i32> {
        self.digits.get(9..13)?.parse().ok()
    }

    /// Justice segment digit (`8` state, `5` labor, `4` federal, ...).
    pub fn justice_segment(&self) -> Option<char> {
        self.digits.chars().nth(13)
    }

    /// Two-digit court code within the justice segment.
    pub fn court_code(&self) -> Option<&str> {
        self.digits.get(14..16)
    }

    /// Four-digit originating unit code.
    pub fn origin_code(&self) -> Option<&str> {
        self.digits.get(16..20)
    }
}

/// Removes visual separators without touching any other character.
pub fn strip_separators(input: &str) -> String {
    input
        .trim()
        .chars()
        .filter(|c| !SEPARATORS.contains(c))
        .collect()
}

impl fmt::Display for CaseNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.formatted())
    }
}

impl TryFrom<String> for CaseNumber {
    type Error = LookupError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        CaseNumber::parse(&value)
    }
}

impl From<CaseNumber> for String {
    fn from(value: CaseNumber) -> Self {
        value.formatted()
    }
}
