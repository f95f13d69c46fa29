//! HTTP seam between the mailer and the network.

use crate::error::PostmarkResult;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Header carrying the server token.
pub const SERVER_TOKEN_HEADER: &str = "X-Postmark-Server-Token";

/// A serialized request for the Postmark API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    pub url: String,
    pub server_token: String,
    /// JSON body
    pub body: String,
}

/// Raw HTTP response, interpreted by [`crate::response::parse_response`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

/// Sends one request and returns the raw response.
///
/// Implementations must not interpret the status code; any HTTP response,
/// including 4xx and 5xx, is `Ok`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post(&self, request: ApiRequest) -> PostmarkResult<ApiResponse>;
}

/// Production transport over `reqwest`.
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> PostmarkResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn post(&self, request: ApiRequest) -> PostmarkResult<ApiResponse> {
        let response = self
            .client
            .post(&request.url)
            .header("Accept", "application/json")
            .header("Content-Type", "application/json")
            .header(SERVER_TOKEN_HEADER, &request.server_token)
            .body(request.body)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;

        Ok(ApiResponse { status, body })
    }
}
