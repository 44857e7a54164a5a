//! HTTP transport seam for the OpenRouter gateway.
//!
//! The gateway only needs "POST these bytes, give me a status and a body
//! stream". Keeping that behind [`HttpTransport`] lets tests script the
//! stream chunk by chunk without a server.

use super::error::OpenRouterError;
use async_trait::async_trait;
use futures::StreamExt;
use futures::stream::BoxStream;
use std::time::Duration;
use thiserror::Error;

/// Response body as a stream of raw chunks.
pub type BodyStream = BoxStream<'static, Result<Vec<u8>, TransportError>>;

/// Errors surfaced by a transport.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("{0}")]
    Connect(String),

    #[error("stream interrupted: {0}")]
    Body(String),
}

/// An outbound POST request.
///
/// Deliberately not `Debug`: the headers carry the bearer token.
pub struct HttpRequest {
    pub url: String,
    pub headers: Vec<(&'static str, String)>,
    pub body: Vec<u8>,
}

/// Status plus streaming body of a response.
pub struct HttpResponse {
    pub status: u16,
    pub body: BodyStream,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Send the request and return once the response head has arrived.
    async fn post(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// [`HttpTransport`] backed by a shared `reqwest` client.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(connect_timeout: Duration) -> Result<Self, OpenRouterError> {
        let client = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn post(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut builder = self.client.post(&request.url).body(request.body);
        for (name, value) in request.headers {
            builder = builder.header(name, value);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| TransportError::Connect(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .bytes_stream()
            .map(|chunk| {
                chunk
                    .map(|bytes| bytes.to_vec())
                    .map_err(|e| TransportError::Body(e.to_string()))
            })
            .boxed();

        Ok(HttpResponse { status, body })
    }
}
