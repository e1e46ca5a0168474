//! Payload normalization into the canonical [`Case`].
//!
//! One normalizer per payload family:
//! - [`structured`] - public registry documents (class codes, poles)
//! - [`portal`] - secondary registry records (class names)
//! - [`scraped`] - court consultation pages (labeled fields)
//!
//! Normalizers are total over optional fields. They fail only when the
//! payload is not the document its family promises.

pub mod classification;
pub mod dates;
pub mod money;
pub mod portal;
pub mod scraped;
pub mod structured;

use serde::{Deserialize, Deserializer};

use crate::errors::NormalizeError;
use crate::models::{Case, CaseNumber, RawPayload, RawRecord};

pub use money::parse_money;
pub use portal::normalize_portal_record;
pub use scraped::{normalize_scraped_page, ScrapedPage};
pub use structured::normalize_registry_hit;

/// Normalizes `record`, found for `number`, with the normalizer of its family.
pub fn normalize(number: &CaseNumber, record: &RawRecord) -> Result<Case, NormalizeError> {
    let mut case = match &record.payload {
        RawPayload::Registry(document) => normalize_registry_hit(number, document)?,
        RawPayload::Portal(document) => normalize_portal_record(number, document)?,
        RawPayload::Html { court, body, .. } => normalize_scraped_page(number, court, body)?,
        RawPayload::Canonical(case) => {
            let mut case = case.as_ref().clone();
            case.id = uuid::Uuid::new_v4().to_string();
            case.case_number = number.formatted();
            case
        }
    };
    case.source = Some(record.source.to_string());
    Ok(case)
}

/// Deserializes `null` as the type's default.
pub(crate) fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CaseCategory;

    #[test]
    fn test_canonical_payload_gets_fresh_id_and_source() {
        let number = CaseNumber::parse("0001234-56.2024.8.26.0001").unwrap();
        let mut fixture = Case::new("00012345620248260001");
        fixture.id = "ext-1".to_string();
        fixture.category = CaseCategory::Labor;

        let record = RawRecord::new("FIXTURES", RawPayload::Canonical(Box::new(fixture)));
        let case = normalize(&number, &record).unwrap();

        assert_ne!(case.id, "ext-1");
        assert_eq!(case.case_number, "0001234-56.2024.8.26.0001");
        assert_eq!(case.category, CaseCategory::Labor);
        assert_eq!(case.source.as_deref(), Some("FIXTURES"));
    }

    #[test]
    fn test_dispatch_by_family() {
        let number = CaseNumber::parse("1017593-56.2022.8.26.0001").unwrap();
        let record = RawRecord::new(
            "SCRAPE_TJSP",
            RawPayload::Html {
                court: "TJSP".to_string(),
                url: "https://example.test".to_string(),
                body: "<p>Nothing here</p>".to_string(),
            },
        );

        assert!(matches!(
            normalize(&number, &record),
            Err(NormalizeError::UnrecognisedPage { .. })
        ));
    }
}
