//! Secondary registry reached through a JSON REST API.
//!
//! `GET {base}/v1/processes/{number}` answers with one process record, or
//! `404` when the number is unknown.

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::config::SourceConfig;
use crate::errors::SourceError;
use crate::models::{CaseNumber, RawPayload, RawRecord};
use crate::source::http::{build_client, check_status};
use crate::source::CaseSource;

pub const SOURCE_ID: &str = "PORTAL";

pub struct PortalApiSource {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl PortalApiSource {
    pub fn new(base_url: impl Into<String>, token: Option<String>, config: &SourceConfig) -> Self {
        Self {
            client: build_client(config.timeout),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
        }
    }

    fn url(&self, number: &CaseNumber) -> String {
        format!(
            "{}/v1/processes/{}",
            self.base_url,
            urlencoding::encode(&number.formatted())
        )
    }
}

#[async_trait]
impl CaseSource for PortalApiSource {
    fn id(&self) -> &'static str {
        SOURCE_ID
    }

    async fn lookup(&self, number: &CaseNumber) -> Result<Option<RawRecord>, SourceError> {
        let url = self.url(number);
        debug!("Portal request: {}", url);

        let mut request = self.client.get(&url).header("Accept", "application/json");
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| SourceError::from_reqwest(SOURCE_ID, e))?;
        let Some(response) = check_status(SOURCE_ID, response)? else {
            return Ok(None);
        };

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| SourceError::from_reqwest(SOURCE_ID, e))?;

        // Some deployments answer 200 with an empty body instead of 404.
        if body.is_null() || body.as_object().is_some_and(|o| o.is_empty()) {
            return Ok(None);
        }

        Ok(Some(RawRecord::new(SOURCE_ID, RawPayload::Portal(body))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_encodes_formatted_number() {
        let source = PortalApiSource::new("https://portal.example/", None, &SourceConfig::default());
        let number = CaseNumber::parse("10175935620228260001").unwrap();

        assert_eq!(
            source.url(&number),
            "https://portal.example/v1/processes/1017593-56.2022.8.26.0001"
        );
    }
}
