//! Search store abstractions and implementations.
//!
//! The store is a trait-based seam so the service can run against a real
//! Elasticsearch cluster in production and an in-memory store in tests.

pub mod elastic;
pub mod memory;

pub use elastic::ElasticsearchStore;
pub use memory::InMemoryStore;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Record fields covered by a multi-field match query.
pub const SEARCH_FIELDS: [&str; 3] = ["name", "conditions", "diagnostics"];

/// Error type for search store operations.
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Search backend unreachable: {0}")]
    Unreachable(String),

    #[error("Search backend error: {0}")]
    Backend(String),

    #[error("Malformed search response: {0}")]
    MalformedResponse(String),
}

/// A single search hit, in the search engine's wire shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    #[serde(rename = "_index")]
    pub index: String,

    #[serde(rename = "_id")]
    pub id: String,

    #[serde(rename = "_score")]
    pub score: Option<f64>,

    #[serde(rename = "_source")]
    pub source: Value,
}

/// Full-text store holding patient records.
#[async_trait]
pub trait SearchStore: Send + Sync {
    /// Backend name, used as a metric label.
    fn name(&self) -> &'static str;

    /// Multi-field match over the searchable record fields.
    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, SearchError>;

    /// Index a single record.
    async fn index(&self, record: Value) -> Result<(), SearchError>;

    /// Make previously indexed records visible to search.
    async fn refresh(&self) -> Result<(), SearchError>;

    /// Connectivity check.
    async fn ping(&self) -> Result<(), SearchError>;
}
