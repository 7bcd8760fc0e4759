//! Client configuration.
//!
//! `ClientConfig` is built once and handed to `DataClient::new`. The default
//! targets a backend on `http://localhost:8000` and sends JSON content-type
//! headers. `from_env` layers the `DATAGEN_BASE_URL` variable over those
//! defaults.

use std::collections::BTreeMap;

use figment::providers::{Env, Serialized};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Base URL used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Prefix of the environment variables read by `ClientConfig::from_env`.
pub const ENV_PREFIX: &str = "DATAGEN_";

pub const CONTENT_TYPE: &str = "content-type";
pub const APPLICATION_JSON: &str = "application/json";

/// Base URL and default headers shared by every request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    pub base_url: String,
    /// Header names are stored lower-case.
    #[serde(default = "default_headers")]
    pub default_headers: BTreeMap<String, String>,
}

fn default_headers() -> BTreeMap<String, String> {
    BTreeMap::from([(CONTENT_TYPE.to_string(), APPLICATION_JSON.to_string())])
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            default_headers: default_headers(),
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Defaults overridden by `DATAGEN_BASE_URL` when it is set and
    /// non-blank. A blank value counts as unset.
    pub fn from_env() -> Result<Self, ApiError> {
        let mut config: Self = Figment::new()
            .merge(Serialized::defaults(Self::default()))
            .merge(Env::prefixed(ENV_PREFIX).only(&["base_url"]))
            .extract()
            .map_err(Box::new)?;
        if config.base_url.trim().is_empty() {
            config.base_url = DEFAULT_BASE_URL.to_string();
        }
        tracing::debug!(base_url = %config.base_url, "client configuration loaded");
        Ok(config)
    }

    /// Add or replace a default header. The name is lower-cased.
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.default_headers
            .insert(name.to_ascii_lowercase(), value.into());
        self
    }
}
