//! Synergy Wholesale API client.
//!
//! One `listDomains` call is one HTTP POST: encode the envelope, send it,
//! read the body, decode it. There is no retry; the cache decides what a
//! failed call means for the scrape.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;

use crate::config::{Credentials, API_URL, SOAP_CONTENT_TYPE};
use crate::domain::DomainListResponse;
use crate::error_handling::ApiError;
use crate::soap::{decode_list_domains, encode_request, Request};

/// Anything that can produce the account's current domain list.
///
/// The cache holds a `dyn DomainSource` so tests can substitute the
/// upstream API.
#[async_trait]
pub trait DomainSource: Send + Sync {
    /// Fetches the current domain list.
    async fn list_domains(&self) -> Result<DomainListResponse, ApiError>;
}

/// HTTP client for the upstream SOAP endpoint.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    endpoint: String,
    credentials: Credentials,
}

impl ApiClient {
    /// Creates a client for the production endpoint.
    pub fn new(client: reqwest::Client, credentials: Credentials) -> Self {
        Self::with_endpoint(client, credentials, API_URL)
    }

    /// Creates a client for a different endpoint (mock servers in tests).
    pub fn with_endpoint(
        client: reqwest::Client,
        credentials: Credentials,
        endpoint: impl Into<String>,
    ) -> Self {
        ApiClient {
            client,
            endpoint: endpoint.into(),
            credentials,
        }
    }

    /// The account this client authenticates as.
    pub fn reseller_id(&self) -> &str {
        &self.credentials.reseller_id
    }

    /// Performs one POST exchange and returns the raw response body.
    ///
    /// # Errors
    ///
    /// - `ApiError::Transport` on connection failure, timeout, or unreadable body
    /// - `ApiError::HttpStatus` on a non-2xx response
    pub async fn send(&self, envelope: Vec<u8>) -> Result<Vec<u8>, ApiError> {
        let response = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, SOAP_CONTENT_TYPE)
            .body(envelope)
            .send()
            .await?;

        let status = response.status();
        log::debug!("Upstream responded with HTTP {}", status.as_u16());
        if !status.is_success() {
            return Err(ApiError::HttpStatus(status.as_u16()));
        }

        let body = response.bytes().await?;
        Ok(body.to_vec())
    }
}

#[async_trait]
impl DomainSource for ApiClient {
    async fn list_domains(&self) -> Result<DomainListResponse, ApiError> {
        log::info!(
            "Sending listDomains request to Synergy Wholesale API (reseller_id={})",
            self.reseller_id()
        );
        let envelope = encode_request(&Request::ListDomains(&self.credentials))?;
        let body = self.send(envelope).await?;
        decode_list_domains(&body)
    }
}
