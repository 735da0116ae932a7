//! Elasticsearch-backed search store.
//!
//! Speaks the cluster's HTTP API directly via reqwest. Queries are
//! multi-field match requests over the searchable record fields.

use super::{SearchError, SearchHit, SearchStore, SEARCH_FIELDS};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};

/// Search store backed by an Elasticsearch cluster.
pub struct ElasticsearchStore {
    client: Client,
    base_url: String,
    index: String,
}

impl ElasticsearchStore {
    pub fn new(base_url: &str, index: &str) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            index: index.to_string(),
        }
    }

    fn index_url(&self, path: &str) -> String {
        format!("{}/{}/{}", self.base_url, self.index, path)
    }

    /// Build the multi-field match request body for a query string.
    fn search_body(query: &str) -> Value {
        json!({
            "query": {
                "multi_match": {
                    "query": query,
                    "fields": SEARCH_FIELDS,
                }
            }
        })
    }
}

#[async_trait]
impl SearchStore for ElasticsearchStore {
    fn name(&self) -> &'static str {
        "elasticsearch"
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, SearchError> {
        let url = self.index_url("_search");

        tracing::debug!(
            index = %self.index,
            query_len = query.len(),
            "Sending search request to Elasticsearch"
        );

        let response = self
            .client
            .post(&url)
            .json(&Self::search_body(query))
            .send()
            .await
            .map_err(|e| SearchError::Unreachable(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(SearchError::Backend(format!(
                "Elasticsearch error {}: {}",
                status, error_text
            )));
        }

        let api_response: EsSearchResponse = response
            .json()
            .await
            .map_err(|e| SearchError::MalformedResponse(e.to_string()))?;

        Ok(api_response.hits.hits)
    }

    async fn index(&self, record: Value) -> Result<(), SearchError> {
        let url = self.index_url("_doc");

        let response = self
            .client
            .post(&url)
            .json(&record)
            .send()
            .await
            .map_err(|e| SearchError::Unreachable(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(SearchError::Backend(format!(
                "Elasticsearch index error {}: {}",
                status, error_text
            )));
        }

        Ok(())
    }

    async fn refresh(&self) -> Result<(), SearchError> {
        let url = self.index_url("_refresh");

        let response = self
            .client
            .post(&url)
            .send()
            .await
            .map_err(|e| SearchError::Unreachable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(SearchError::Backend(format!(
                "Elasticsearch refresh error {}",
                response.status()
            )));
        }

        Ok(())
    }

    async fn ping(&self) -> Result<(), SearchError> {
        let response = self
            .client
            .get(&self.base_url)
            .send()
            .await
            .map_err(|e| SearchError::Unreachable(e.to_string()))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(SearchError::Backend(format!(
                "Elasticsearch ping failed: {}",
                response.status()
            )))
        }
    }
}

// ============================================================================
// Elasticsearch response types
// ============================================================================

#[derive(Debug, Deserialize)]
struct EsSearchResponse {
    hits: EsHits,
}

#[derive(Debug, Deserialize)]
struct EsHits {
    hits: Vec<SearchHit>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_body_matches_all_record_fields() {
        let body = ElasticsearchStore::search_body("flu");

        assert_eq!(body["query"]["multi_match"]["query"], "flu");
        let fields = body["query"]["multi_match"]["fields"]
            .as_array()
            .expect("fields should be an array");
        assert_eq!(fields.len(), 3);
        assert!(fields.contains(&json!("name")));
        assert!(fields.contains(&json!("conditions")));
        assert!(fields.contains(&json!("diagnostics")));
    }

    #[test]
    fn store_reports_its_backend_name() {
        let store = ElasticsearchStore::new("http://localhost:9200", "patients");
        assert_eq!(store.name(), "elasticsearch");
    }

    #[test]
    fn index_url_strips_trailing_slash() {
        let store = ElasticsearchStore::new("http://localhost:9200/", "patients");
        assert_eq!(
            store.index_url("_search"),
            "http://localhost:9200/patients/_search"
        );
    }

    #[test]
    fn hit_deserializes_from_wire_shape() {
        let raw = json!({
            "_index": "patients",
            "_id": "abc123",
            "_score": 1.3862,
            "_source": {"name": "Jane Doe", "conditions": "flu"}
        });

        let hit: SearchHit = serde_json::from_value(raw).expect("hit should deserialize");
        assert_eq!(hit.index, "patients");
        assert_eq!(hit.source["name"], "Jane Doe");
    }
}
