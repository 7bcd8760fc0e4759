//! Client facade for the data-generation API.
//!
//! # Overview
//! Three operations map one-to-one onto backend routes: data generation,
//! sample retrieval and file upload. Parameters are forwarded verbatim and
//! responses come back untouched.
//!
//! # Design
//! - `DataClient` is stateless: it holds the validated base URL and default
//!   headers and turns each operation into an `HttpRequest` value.
//! - `DataService` pairs a client with an injectable `Transport`. Tests
//!   substitute their own transport instead of patching globals.
//! - Transport errors are returned exactly as the transport produced them.
//! - `ClientConfig` is explicit; `ClientConfig::from_env` reads
//!   `DATAGEN_BASE_URL` and otherwise defaults to `http://localhost:8000`.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod multipart;
pub mod service;
pub mod transport;
pub mod types;

pub use client::DataClient;
pub use config::{ClientConfig, DEFAULT_BASE_URL};
pub use error::{ApiError, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use multipart::MultipartForm;
pub use service::DataService;
pub use transport::{Transport, UreqTransport};
pub use types::{GeneratedTable, HealthStatus, Params, SampleCatalog, TableMetadata, UploadSummary};
