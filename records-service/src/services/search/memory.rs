//! In-memory search store for testing.

use super::{SearchError, SearchHit, SearchStore};
use crate::models::PatientRecord;
use async_trait::async_trait;
use serde_json::Value;
use std::sync::RwLock;

/// In-memory store matching query terms against the searchable fields.
///
/// Matching is a case-insensitive substring check per field, which is close
/// enough to an analyzed multi-field match for test purposes.
pub struct InMemoryStore {
    index: String,
    enabled: bool,
    records: RwLock<Vec<Value>>,
}

impl InMemoryStore {
    pub fn new(index: &str) -> Self {
        Self {
            index: index.to_string(),
            enabled: true,
            records: RwLock::new(Vec::new()),
        }
    }

    /// A store that fails every operation, for error-path tests.
    pub fn failing() -> Self {
        Self {
            index: String::new(),
            enabled: false,
            records: RwLock::new(Vec::new()),
        }
    }

    fn check_enabled(&self) -> Result<(), SearchError> {
        if self.enabled {
            Ok(())
        } else {
            Err(SearchError::Backend(
                "Mock search store not enabled".to_string(),
            ))
        }
    }

    fn matches(record: &Value, terms: &[String]) -> bool {
        let Ok(record) = serde_json::from_value::<PatientRecord>(record.clone()) else {
            return false;
        };

        record.searchable_values().iter().any(|field| {
            field.is_some_and(|text| {
                let text = text.to_lowercase();
                terms.iter().any(|term| text.contains(term))
            })
        })
    }
}

#[async_trait]
impl SearchStore for InMemoryStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn search(&self, query: &str) -> Result<Vec<SearchHit>, SearchError> {
        self.check_enabled()?;

        let terms: Vec<String> = query
            .split_whitespace()
            .map(|t| t.to_lowercase())
            .collect();

        let records = self
            .records
            .read()
            .map_err(|_| SearchError::Backend("store lock poisoned".to_string()))?;

        let hits = records
            .iter()
            .enumerate()
            .filter(|(_, record)| Self::matches(record, &terms))
            .map(|(position, record)| SearchHit {
                index: self.index.clone(),
                id: (position + 1).to_string(),
                score: Some(1.0),
                source: record.clone(),
            })
            .collect();

        Ok(hits)
    }

    async fn index(&self, record: Value) -> Result<(), SearchError> {
        self.check_enabled()?;

        let mut records = self
            .records
            .write()
            .map_err(|_| SearchError::Backend("store lock poisoned".to_string()))?;
        records.push(record);
        Ok(())
    }

    async fn refresh(&self) -> Result<(), SearchError> {
        self.check_enabled()
    }

    async fn ping(&self) -> Result<(), SearchError> {
        self.check_enabled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn matches_on_conditions_field() {
        let store = InMemoryStore::new("patients");
        store
            .index(json!({"name": "Jane Doe", "conditions": "flu"}))
            .await
            .unwrap();

        let hits = store.search("flu").await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].source["name"], "Jane Doe");
    }

    #[tokio::test]
    async fn match_is_case_insensitive() {
        let store = InMemoryStore::new("patients");
        store
            .index(json!({"name": "Jane Doe", "diagnostics": "Elevated Glucose"}))
            .await
            .unwrap();

        let hits = store.search("glucose").await.unwrap();
        assert_eq!(hits.len(), 1);
    }

    #[tokio::test]
    async fn unmatched_query_returns_no_hits() {
        let store = InMemoryStore::new("patients");
        store
            .index(json!({"name": "Jane Doe", "conditions": "flu"}))
            .await
            .unwrap();

        let hits = store.search("fracture").await.unwrap();
        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn failing_store_errors_on_every_operation() {
        let store = InMemoryStore::failing();

        assert!(store.search("flu").await.is_err());
        assert!(store.index(json!({"name": "Jane Doe"})).await.is_err());
        assert!(store.refresh().await.is_err());
        assert!(store.ping().await.is_err());
    }

    #[test]
    fn store_reports_its_backend_name() {
        let store = InMemoryStore::new("patients");
        assert_eq!(store.name(), "memory");
    }

    #[tokio::test]
    async fn records_without_searchable_fields_are_skipped() {
        let store = InMemoryStore::new("patients");
        store.index(json!({"note": "no fields here"})).await.unwrap();

        let hits = store.search("fields").await.unwrap();
        assert!(hits.is_empty());
    }
}
