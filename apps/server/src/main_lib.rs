use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::Config;
use jurisdesk_core::{
    cases::{BlobCaseRepository, CaseRepositoryTrait, CaseService, CaseServiceTrait},
    events::{DomainEventSink, LogDomainEventSink},
    ledger::{LedgerService, LedgerServiceTrait},
    monitoring::{MonitoringService, MonitoringServiceTrait},
    storage::BlobStore,
};
use jurisdesk_court_data::{default_sources, CaseLookup, CaseResolver, CaseSource, FixtureSource};
use jurisdesk_storage_sqlite::{db, SqliteBlobStore};

pub struct AppState {
    pub resolver: Arc<CaseResolver>,
    pub case_repository: Arc<dyn CaseRepositoryTrait>,
    pub case_service: Arc<dyn CaseServiceTrait>,
    pub ledger_service: Arc<dyn LedgerServiceTrait>,
    pub monitoring_service: Arc<dyn MonitoringServiceTrait>,
    pub db_path: String,
}

pub fn init_tracing(log_format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

/// Builds the state with the configured source chain.
pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let fixtures = match &config.fixtures_path {
        Some(path) => {
            let source = FixtureSource::from_file(path)
                .with_context(|| format!("Failed to read fixtures from {}", path.display()))?;
            tracing::info!("Loaded {} fixture case(s) from {}", source.len(), path.display());
            Some(source)
        }
        None => None,
    };
    build_state_with_sources(config, default_sources(&config.sources, fixtures)).await
}

/// Builds the state around an explicit source chain.
pub async fn build_state_with_sources(
    config: &Config,
    sources: Vec<Arc<dyn CaseSource>>,
) -> anyhow::Result<Arc<AppState>> {
    let db_path = db::init(&config.db_path)?;
    tracing::info!("Database path in use: {}", db_path);

    let pool = db::create_pool(&db_path)?;
    db::run_migrations(&pool)?;
    let writer = db::spawn_writer(&pool)?;
    let blobs: Arc<dyn BlobStore> = Arc::new(SqliteBlobStore::new(pool.clone(), writer));

    let source_ids: Vec<&str> = sources.iter().map(|s| s.id()).collect();
    tracing::info!("Lookup chain: {}", source_ids.join(" -> "));
    let resolver = Arc::new(CaseResolver::new(sources));
    let lookup: Arc<dyn CaseLookup> = resolver.clone();

    let domain_event_sink: Arc<dyn DomainEventSink> = Arc::new(LogDomainEventSink);

    let case_repository: Arc<dyn CaseRepositoryTrait> =
        Arc::new(BlobCaseRepository::load(blobs.clone())?);
    let case_service = Arc::new(CaseService::new(
        case_repository.clone(),
        lookup.clone(),
        domain_event_sink.clone(),
    ));
    let ledger_service = Arc::new(LedgerService::load(
        blobs.clone(),
        case_repository.clone(),
        domain_event_sink.clone(),
    )?);
    let monitoring_service = Arc::new(MonitoringService::load(
        blobs,
        lookup,
        domain_event_sink,
    )?);

    Ok(Arc::new(AppState {
        resolver,
        case_repository,
        case_service,
        ledger_service,
        monitoring_service,
        db_path,
    }))
}
