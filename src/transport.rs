//! The single outbound HTTP GET, behind a trait so the cycle can be driven
//! without a network.

use std::time::Duration;

use reqwest::Client;
use tracing::{debug, instrument};

use crate::error::{CycleError, CycleResult};
use crate::request::RequestDescriptor;

/// Transport-level timeout; the only bound on a hung request.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Status and body of a completed exchange, before any interpretation.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Issues the provider request.
///
/// Implementations report only transport failures, as [`CycleError::Network`];
/// status codes and bodies are judged by the caller.
pub trait HeadlineTransport {
    async fn get(&self, request: &RequestDescriptor) -> CycleResult<RawResponse>;
}

/// `reqwest`-backed transport used by the binary.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self {
            client: Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
                .build()
                .unwrap_or_else(|_| Client::new()),
        }
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlineTransport for ReqwestTransport {
    #[instrument(level = "debug", skip_all, fields(endpoint = %request.endpoint))]
    async fn get(&self, request: &RequestDescriptor) -> CycleResult<RawResponse> {
        let response = self
            .client
            .get(&request.endpoint)
            .query(&request.wire_query())
            .send()
            .await
            .map_err(|e| CycleError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| CycleError::Network(e.to_string()))?;

        debug!(status, bytes = body.len(), "Received provider response");
        Ok(RawResponse { status, body })
    }
}
