//! Search envelope returned by the registry's `_search` endpoint.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(super) struct SearchResponse {
    #[serde(default)]
    pub hits: Option<Hits>,
}

#[derive(Debug, Deserialize)]
pub(super) struct Hits {
    #[serde(default)]
    pub hits: Vec<Hit>,
}

#[derive(Debug, Deserialize)]
pub(super) struct Hit {
    #[serde(rename = "_source")]
    pub source: serde_json::Value,
}

impl SearchResponse {
    /// The newest hit; the query sorts by `@timestamp` descending.
    pub fn into_first_document(self) -> Option<serde_json::Value> {
        self.hits?.hits.into_iter().next().map(|hit| hit.source)
    }
}
