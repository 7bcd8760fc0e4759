//! Query parameters and response DTOs for the data API.
//!
//! # Design
//! `Params` is an opaque, ordered list of string pairs. The client never
//! validates it; repeated names are kept so list parameters such as
//! `data_types` serialize as `data_types=a&data_types=b`.
//!
//! The DTOs mirror the backend's JSON shapes but are defined independently
//! of the mock-server crate. Integration tests catch schema drift.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

/// Query parameters forwarded verbatim to the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params(Vec<(String, String)>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.push(name, value);
        self
    }

    pub fn push(&mut self, name: impl Into<String>, value: impl ToString) {
        self.0.push((name.into(), value.to_string()));
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: ToString> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Params::new();
        for (k, v) in iter {
            params.push(k, v);
        }
        params
    }
}

impl<K: Into<String>, V: ToString, const N: usize> From<[(K, V); N]> for Params {
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

impl<K: Into<String>, V: ToString> From<Vec<(K, V)>> for Params {
    fn from(pairs: Vec<(K, V)>) -> Self {
        pairs.into_iter().collect()
    }
}

impl<K: Into<String>, V: ToString> From<BTreeMap<K, V>> for Params {
    fn from(map: BTreeMap<K, V>) -> Self {
        map.into_iter().collect()
    }
}

/// Iteration order follows the map, so the query string order is unspecified.
impl<K: Into<String>, V: ToString> From<HashMap<K, V>> for Params {
    fn from(map: HashMap<K, V>) -> Self {
        map.into_iter().collect()
    }
}

/// Shape information attached to generated and sample tables.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TableMetadata {
    pub rows: usize,
    pub columns: usize,
    pub headers: Vec<String>,
}

/// JSON body of `/api/data/generate` and `/api/data/sample/{type}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeneratedTable {
    pub metadata: TableMetadata,
    pub data: Vec<serde_json::Map<String, serde_json::Value>>,
}

/// JSON body of `/api/data/sample`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SampleCatalog {
    pub message: String,
    pub available_samples: Vec<String>,
    pub formats: Vec<String>,
    pub usage: String,
}

/// JSON body of a successful `/api/data/upload`.
///
/// Which optional fields are present depends on the uploaded file's shape.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UploadSummary {
    pub filename: String,
    pub file_type: String,
    pub api_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<Vec<String>>,
    /// CSV uploads only: inferred dtype per column.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_types: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub sample_rows: Vec<serde_json::Value>,
}

/// JSON body of `/health`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    pub service: String,
}
