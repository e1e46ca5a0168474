//! Public judicial registry (DataJud) source.
//!
//! The registry exposes one search index per court, named
//! `api_publica_<court>`. A case is fetched with a `match` query on its bare
//! digits and the newest document wins.

mod models;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use tracing::debug;

use crate::config::SourceConfig;
use crate::errors::SourceError;
use crate::models::{court_acronym, registry_index, CaseNumber, RawPayload, RawRecord};
use crate::source::http::{build_client, check_status};
use crate::source::CaseSource;

use models::SearchResponse;

pub const SOURCE_ID: &str = "DATAJUD";

pub struct DataJudSource {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl DataJudSource {
    pub fn new(config: &SourceConfig) -> Self {
        Self {
            client: build_client(config.timeout),
            base_url: config.datajud_base_url.trim_end_matches('/').to_string(),
            api_key: config.datajud_api_key.clone(),
        }
    }

    fn endpoint(&self, number: &CaseNumber) -> Option<String> {
        let court = court_acronym(number)?;
        Some(format!("{}/{}/_search", self.base_url, registry_index(&court)))
    }
}

fn search_body(number: &CaseNumber) -> serde_json::Value {
    json!({
        "query": { "match": { "numeroProcesso": number.digits() } },
        "size": 1,
        "sort": [ { "@timestamp": { "order": "desc" } } ]
    })
}

#[async_trait]
impl CaseSource for DataJudSource {
    fn id(&self) -> &'static str {
        SOURCE_ID
    }

    fn supports(&self, number: &CaseNumber) -> bool {
        court_acronym(number).is_some()
    }

    async fn lookup(&self, number: &CaseNumber) -> Result<Option<RawRecord>, SourceError> {
        let Some(url) = self.endpoint(number) else {
            return Ok(None);
        };
        debug!("DataJud search: {} for {}", url, number);

        let mut request = self.client.post(&url).json(&search_body(number));
        if let Some(key) = &self.api_key {
            request = request.header("Authorization", format!("APIKey {}", key));
        }

        let response = request
            .send()
            .await
            .map_err(|e| SourceError::from_reqwest(SOURCE_ID, e))?;
        let Some(response) = check_status(SOURCE_ID, response)? else {
            return Ok(None);
        };

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| SourceError::from_reqwest(SOURCE_ID, e))?;

        Ok(body
            .into_first_document()
            .map(|doc| RawRecord::new(SOURCE_ID, RawPayload::Registry(doc))))
    }
}
