use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A patient record as stored in the search index.
///
/// Records are arbitrary JSON objects; only the three searchable fields are
/// modeled, everything else is carried through untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatientRecord {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub conditions: Option<String>,
    #[serde(default)]
    pub diagnostics: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PatientRecord {
    /// Values of the searchable fields, in match order.
    pub fn searchable_values(&self) -> [Option<&str>; 3] {
        [
            self.name.as_deref(),
            self.conditions.as_deref(),
            self.diagnostics.as_deref(),
        ]
    }
}

#[derive(Debug, Deserialize)]
pub struct RetrieveRequest {
    #[serde(default)]
    pub query: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SummaryRequest {
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SummaryResponse {
    pub summary: String,
}
