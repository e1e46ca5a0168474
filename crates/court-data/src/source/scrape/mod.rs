//! HTML scraping fallbacks, one source per court site.
//!
//! These sources only fetch the page and detect the "not found" answer.
//! Field extraction and page validation happen in
//! [`normalizer::scraped`](crate::normalizer::scraped), so a layout change
//! on the court side surfaces as a normalization failure.

mod courts;

pub use courts::{CourtSite, COURT_SITES, TJMG, TJRJ, TJSP, TRT2};

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::config::SourceConfig;
use crate::errors::SourceError;
use crate::models::{court_acronym, CaseNumber, RawPayload, RawRecord};
use crate::normalizer::ScrapedPage;
use crate::source::http::{build_client, check_status};
use crate::source::CaseSource;

use courts::NOT_FOUND_MARKERS;

pub struct ScrapeSource {
    client: Client,
    site: CourtSite,
}

impl ScrapeSource {
    pub fn new(site: CourtSite, config: &SourceConfig) -> Self {
        Self {
            client: build_client(config.timeout),
            site,
        }
    }

    /// One source per known court site, in fixed order.
    pub fn all(config: &SourceConfig) -> Vec<Self> {
        COURT_SITES
            .iter()
            .map(|site| Self::new(*site, config))
            .collect()
    }
}

/// A marker only counts when the page carries no case field: case pages
/// may say "não foram encontrados" about documents or hearings.
pub(crate) fn is_not_found_page(body: &str) -> bool {
    let lower = body.to_lowercase();
    if !NOT_FOUND_MARKERS.iter().any(|m| lower.contains(m)) {
        return false;
    }
    !ScrapedPage::extract(body).has_content()
}

#[async_trait]
impl CaseSource for ScrapeSource {
    fn id(&self) -> &'static str {
        self.site.source_id
    }

    fn supports(&self, number: &CaseNumber) -> bool {
        court_acronym(number).as_deref() == Some(self.site.court)
    }

    async fn lookup(&self, number: &CaseNumber) -> Result<Option<RawRecord>, SourceError> {
        let url = self.site.url(number);
        debug!("Scraping {} for {}", url, number);

        let response = self
            .client
            .get(&url)
            .header(
                "Accept",
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            )
            .header("Accept-Language", "pt-BR,pt;q=0.9,en;q=0.8")
            .send()
            .await
            .map_err(|e| SourceError::from_reqwest(self.site.source_id, e))?;
        let Some(response) = check_status(self.site.source_id, response)? else {
            return Ok(None);
        };

        let body = response
            .text()
            .await
            .map_err(|e| SourceError::from_reqwest(self.site.source_id, e))?;

        if body.trim().is_empty() || is_not_found_page(&body) {
            return Ok(None);
        }

        Ok(Some(RawRecord::new(
            self.site.source_id,
            RawPayload::Html {
                court: self.site.court.to_string(),
                url,
                body,
            },
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supports_only_own_court() {
        let config = SourceConfig::default();
        let tjsp = ScrapeSource::new(TJSP, &config);
        let trt2 = ScrapeSource::new(TRT2, &config);
        let number = CaseNumber::parse("1017593-56.2022.8.26.0001").unwrap();

        assert!(tjsp.supports(&number));
        assert!(!trt2.supports(&number));
    }

    #[test]
    fn test_all_keeps_site_order() {
        let ids: Vec<_> = ScrapeSource::all(&SourceConfig::default())
            .iter()
            .map(|s| s.id())
            .collect();
        assert_eq!(ids, vec!["SCRAPE_TJSP", "SCRAPE_TRT2", "SCRAPE_TJRJ", "SCRAPE_TJMG"]);
    }

    #[test]
    fn test_not_found_markers() {
        assert!(is_not_found_page("<p>Nenhum processo encontrado</p>"));
        assert!(is_not_found_page("<div>PROCESSO NÃO ENCONTRADO</div>"));
        assert!(!is_not_found_page("<td>Classe</td><td>Procedimento Comum</td>"));
    }

    #[test]
    fn test_case_page_mentioning_missing_documents_is_found() {
        let html = "<div><p>Classe: Procedimento Comum Cível</p>\
                    <p>Vara: 1ª Vara Cível</p>\
                    <p>Documentos não foram encontrados</p></div>";

        assert!(!is_not_found_page(html));
    }
}
