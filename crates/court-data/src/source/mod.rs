//! Case source abstractions and implementations.
//!
//! - The [`CaseSource`] trait every source implements
//! - Network sources: public registry, secondary portal, court sites
//! - Local sources: fixtures and the number-only fallback
//!
//! The lookup order is declared once, in [`default_sources`].

mod http;
mod traits;

pub mod datajud;
pub mod fixture;
pub mod number_only;
pub mod portal;
pub mod scrape;

use std::sync::Arc;

pub use datajud::DataJudSource;
pub use fixture::FixtureSource;
pub use number_only::NumberOnlySource;
pub use portal::PortalApiSource;
pub use scrape::{CourtSite, ScrapeSource};
pub use traits::CaseSource;

use crate::config::SourceConfig;

/// The lookup chain, highest priority first.
///
/// Official registry, then fixtures (when provided), the secondary portal
/// (when configured), one scraper per court site, and the number-only
/// fallback.
pub fn default_sources(
    config: &SourceConfig,
    fixtures: Option<FixtureSource>,
) -> Vec<Arc<dyn CaseSource>> {
    let mut sources: Vec<Arc<dyn CaseSource>> = vec![Arc::new(DataJudSource::new(config))];

    if let Some(fixtures) = fixtures {
        sources.push(Arc::new(fixtures));
    }
    if let Some(base_url) = &config.portal_base_url {
        sources.push(Arc::new(PortalApiSource::new(
            base_url.clone(),
            config.portal_token.clone(),
            config,
        )));
    }
    if config.scrape_enabled {
        for scraper in ScrapeSource::all(config) {
            sources.push(Arc::new(scraper));
        }
    }
    if config.number_fallback {
        sources.push(Arc::new(NumberOnlySource::new()));
    }

    sources
}
