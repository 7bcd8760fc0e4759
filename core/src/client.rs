//! Stateless HTTP request builder for the data API.
//!
//! # Design
//! `DataClient` holds only the validated base URL and the default headers.
//! Each operation is a `build_*` method producing an `HttpRequest`; nothing
//! here touches the network. `DataService` pairs a client with a transport
//! to actually issue the requests.

use std::collections::BTreeMap;

use url::Url;

use crate::config::{ClientConfig, CONTENT_TYPE};
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest};
use crate::multipart::MultipartForm;
use crate::types::Params;

pub const GENERATE_PATH: &[&str] = &["api", "data", "generate"];
pub const SAMPLE_PATH: &[&str] = &["api", "data", "sample"];
pub const UPLOAD_PATH: &[&str] = &["api", "data", "upload"];
pub const HEALTH_PATH: &[&str] = &["health"];

/// Synchronous, stateless request builder for the data API.
#[derive(Debug, Clone)]
pub struct DataClient {
    base_url: Url,
    default_headers: BTreeMap<String, String>,
}

impl DataClient {
    pub fn new(config: ClientConfig) -> Result<Self, ApiError> {
        let base_url = Url::parse(&config.base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::CannotBeABase(config.base_url));
        }
        Ok(Self {
            base_url,
            default_headers: config.default_headers,
        })
    }

    /// Client for `base_url` with the default JSON headers.
    pub fn with_base_url(base_url: &str) -> Result<Self, ApiError> {
        Self::new(ClientConfig::new(base_url))
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    pub fn default_headers(&self) -> &BTreeMap<String, String> {
        &self.default_headers
    }

    pub fn build_generate_data(&self, params: &Params) -> HttpRequest {
        self.request(HttpMethod::Get, GENERATE_PATH, params, BTreeMap::new(), None)
    }

    /// `sample_type` is percent-encoded as one path segment, nothing more.
    ///
    /// URL normalization removes `.` and `..` segments (encoded or not), so
    /// those two values resolve to the catalog path `/api/data/sample`.
    pub fn build_get_sample(&self, sample_type: &str, params: &Params) -> HttpRequest {
        let mut segments: Vec<&str> = SAMPLE_PATH.iter().copied().collect();
        segments.push(sample_type);
        self.request(HttpMethod::Get, &segments, params, BTreeMap::new(), None)
    }

    /// The form's content type replaces the default JSON header for this
    /// request only.
    pub fn build_upload_file(&self, form: &MultipartForm) -> HttpRequest {
        let overrides = BTreeMap::from([(CONTENT_TYPE.to_string(), form.content_type())]);
        self.request(
            HttpMethod::Post,
            UPLOAD_PATH,
            &Params::new(),
            overrides,
            Some(form.encode()),
        )
    }

    pub fn build_sample_catalog(&self) -> HttpRequest {
        self.request(HttpMethod::Get, SAMPLE_PATH, &Params::new(), BTreeMap::new(), None)
    }

    pub fn build_health(&self) -> HttpRequest {
        self.request(HttpMethod::Get, HEALTH_PATH, &Params::new(), BTreeMap::new(), None)
    }

    /// Assemble a request from path segments, query params and per-request
    /// header overrides. Override names are matched case-insensitively
    /// against the defaults.
    pub fn request(
        &self,
        method: HttpMethod,
        segments: &[&str],
        params: &Params,
        overrides: BTreeMap<String, String>,
        body: Option<Vec<u8>>,
    ) -> HttpRequest {
        let mut headers = self.default_headers.clone();
        for (name, value) in overrides {
            headers.insert(name.to_ascii_lowercase(), value);
        }
        HttpRequest {
            method,
            url: self.url_for(segments, params),
            headers,
            body,
        }
    }

    fn url_for(&self, segments: &[&str], params: &Params) -> String {
        let mut url = self.base_url.clone();
        // `new` rejected cannot-be-a-base URLs, so this always succeeds.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params.iter());
        }
        url.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> DataClient {
        DataClient::with_base_url("http://localhost:8000").unwrap()
    }

    #[test]
    fn build_generate_data_produces_correct_request() {
        let params = Params::from([("rows", "5"), ("columns", "3")]);
        let req = client().build_generate_data(&params);
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "http://localhost:8000/api/data/generate?rows=5&columns=3");
        assert_eq!(req.header("Content-Type"), Some("application/json"));
        assert!(req.body.is_none());
    }

    #[test]
    fn build_generate_data_without_params_has_no_query() {
        let req = client().build_generate_data(&Params::new());
        assert_eq!(req.url, "http://localhost:8000/api/data/generate");
    }

    #[test]
    fn build_generate_data_repeats_list_params() {
        let params = Params::new()
            .with("data_types", "integer")
            .with("data_types", "email");
        let req = client().build_generate_data(&params);
        assert_eq!(
            req.url,
            "http://localhost:8000/api/data/generate?data_types=integer&data_types=email"
        );
    }

    #[test]
    fn build_get_sample_templates_the_path() {
        let req = client().build_get_sample("gaussian", &Params::from([("n", 100)]));
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "http://localhost:8000/api/data/sample/gaussian?n=100");
    }

    #[test]
    fn build_get_sample_encodes_the_segment() {
        let req = client().build_get_sample("a b/c", &Params::new());
        assert_eq!(req.url, "http://localhost:8000/api/data/sample/a%20b%2Fc");
    }

    #[test]
    fn build_get_sample_dot_segments_collapse_to_the_catalog() {
        let c = client();
        for sample_type in [".", ".."] {
            let req = c.build_get_sample(sample_type, &Params::new());
            assert_eq!(req.url, "http://localhost:8000/api/data/sample", "{sample_type}");
        }
        // Dots inside a longer name are ordinary characters.
        let req = c.build_get_sample("..users", &Params::new());
        assert_eq!(req.url, "http://localhost:8000/api/data/sample/..users");
    }

    #[test]
    fn query_values_are_form_encoded() {
        let req = client().build_generate_data(&Params::from([("q", "a&b c")]));
        assert_eq!(req.url, "http://localhost:8000/api/data/generate?q=a%26b+c");
    }

    #[test]
    fn build_upload_file_overrides_content_type() {
        let form = MultipartForm::with_boundary("B").file("file", "d.csv", "text/csv", b"x\n1\n".to_vec());
        let c = client();
        let req = c.build_upload_file(&form);
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, "http://localhost:8000/api/data/upload");
        assert_eq!(req.header("content-type"), Some("multipart/form-data; boundary=B"));
        assert_eq!(req.headers.len(), 1);
        assert_eq!(req.body.as_deref(), Some(form.encode().as_slice()));

        // The defaults are untouched for later requests.
        let next = c.build_generate_data(&Params::new());
        assert_eq!(next.header("content-type"), Some("application/json"));
    }

    #[test]
    fn build_sample_catalog_and_health() {
        assert_eq!(client().build_sample_catalog().url, "http://localhost:8000/api/data/sample");
        assert_eq!(client().build_health().url, "http://localhost:8000/health");
    }

    #[test]
    fn trailing_slash_is_tolerated() {
        let client = DataClient::with_base_url("http://localhost:8000/").unwrap();
        let req = client.build_health();
        assert_eq!(req.url, "http://localhost:8000/health");
    }

    #[test]
    fn base_path_prefix_is_kept() {
        let client = DataClient::with_base_url("https://example.com/backend/").unwrap();
        let req = client.build_generate_data(&Params::new());
        assert_eq!(req.url, "https://example.com/backend/api/data/generate");
    }

    #[test]
    fn custom_default_headers_are_sent() {
        let config = ClientConfig::default().with_header("X-Request-Source", "cli");
        let client = DataClient::new(config).unwrap();
        let req = client.build_health();
        assert_eq!(req.header("x-request-source"), Some("cli"));
        assert_eq!(req.header("content-type"), Some("application/json"));
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let err = DataClient::with_base_url("not a url").unwrap_err();
        assert!(matches!(err, ApiError::InvalidBaseUrl(_)));
    }

    #[test]
    fn non_hierarchical_base_url_is_rejected() {
        let err = DataClient::with_base_url("mailto:someone@example.com").unwrap_err();
        assert!(matches!(err, ApiError::CannotBeABase(_)));
    }
}
