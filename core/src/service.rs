//! The data API facade.
//!
//! `DataService` owns a `DataClient` and a `Transport`. Each operation builds
//! exactly one request and returns whatever the transport returns: no
//! retries, no timeouts, no parsing, no error translation.

use tracing::debug;

use crate::client::DataClient;
use crate::http::{HttpRequest, HttpResponse};
use crate::multipart::MultipartForm;
use crate::transport::Transport;
use crate::types::Params;

#[derive(Debug, Clone)]
pub struct DataService<T> {
    client: DataClient,
    transport: T,
}

impl<T: Transport> DataService<T> {
    pub fn new(client: DataClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn client(&self) -> &DataClient {
        &self.client
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// GET `/api/data/generate` with `params` as the query string.
    pub fn generate_data(&self, params: &Params) -> Result<HttpResponse, T::Error> {
        self.send(self.client.build_generate_data(params))
    }

    /// GET `/api/data/sample/{sample_type}` with `params` as the query string.
    pub fn get_sample(&self, sample_type: &str, params: &Params) -> Result<HttpResponse, T::Error> {
        self.send(self.client.build_get_sample(sample_type, params))
    }

    /// POST `/api/data/upload` with the encoded form as body.
    pub fn upload_file(&self, form: &MultipartForm) -> Result<HttpResponse, T::Error> {
        self.send(self.client.build_upload_file(form))
    }

    /// GET `/api/data/sample`.
    pub fn sample_catalog(&self) -> Result<HttpResponse, T::Error> {
        self.send(self.client.build_sample_catalog())
    }

    /// GET `/health`.
    pub fn health(&self) -> Result<HttpResponse, T::Error> {
        self.send(self.client.build_health())
    }

    fn send(&self, request: HttpRequest) -> Result<HttpResponse, T::Error> {
        debug!(method = request.method.as_str(), url = %request.url, "sending request");
        self.transport.execute(request)
    }
}
