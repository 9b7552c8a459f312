//! HTTP fetcher implementation
//!
//! This module handles every network request the crawler makes:
//! - The [`HttpClient`] transport interface the crawler is written against
//! - A reqwest-backed transport built from [`HttpConfig`]
//! - The [`Fetcher`], which turns a link into a body or a typed failure
//!
//! The fetcher performs a single GET per call. There are no retries, and
//! redirects and timeouts are whatever the transport does.

use crate::config::HttpConfig;
use async_trait::async_trait;
use reqwest::{Client, Method};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Error produced by a transport when a request cannot be completed
pub type TransportError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur while fetching a page
#[derive(Debug, Error)]
pub enum FetchError {
    /// The link could not be turned into a request
    #[error("Failed to create request for {url}: {reason}")]
    InvalidRequest { url: String, reason: String },

    /// The transport failed (connection, DNS, TLS, body read)
    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        source: TransportError,
    },

    /// The server answered with something other than 200
    #[error("Got status {status} on {url}")]
    UnexpectedStatus { status: u16, url: String },
}

/// A request handed to an [`HttpClient`]
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: Url,
}

impl HttpRequest {
    pub fn get(url: Url) -> Self {
        Self {
            method: Method::GET,
            url,
        }
    }
}

/// A fully read response returned by an [`HttpClient`]
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

/// Anything that can execute an HTTP request
///
/// TLS policy, headers, pooling, redirects and timeouts all belong to the
/// implementation.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// [`HttpClient`] backed by a `reqwest::Client`
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    client: Client,
}

impl ReqwestClient {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds the transport from HTTP configuration
    pub fn from_config(config: &HttpConfig) -> Result<Self, reqwest::Error> {
        build_http_client(config).map(Self::new)
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let response = self
            .client
            .request(request.method, request.url)
            .send()
            .await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?.to_vec();

        Ok(HttpResponse { status, body })
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The HTTP configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use hostcrawl::config::HttpConfig;
/// use hostcrawl::crawler::build_http_client;
///
/// let client = build_http_client(&HttpConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .danger_accept_invalid_certs(config.accept_invalid_certs)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches page bodies through an injected [`HttpClient`]
#[derive(Clone)]
pub struct Fetcher {
    client: Arc<dyn HttpClient>,
}

impl Fetcher {
    pub fn new(client: impl HttpClient + 'static) -> Self {
        Self {
            client: Arc::new(client),
        }
    }

    pub fn from_arc(client: Arc<dyn HttpClient>) -> Self {
        Self { client }
    }

    /// Performs one GET for `url` and returns the body of a 200 response
    ///
    /// # Errors
    ///
    /// | Condition | Error |
    /// |-----------|-------|
    /// | Unparseable URL or non-HTTP(S) scheme | `InvalidRequest` |
    /// | Network, DNS or TLS failure | `Transport` |
    /// | Status other than 200 | `UnexpectedStatus` |
    pub async fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let request = build_request(url)?;

        let response = self
            .client
            .execute(request)
            .await
            .map_err(|source| FetchError::Transport {
                url: url.to_string(),
                source,
            })?;

        if response.status != 200 {
            return Err(FetchError::UnexpectedStatus {
                status: response.status,
                url: url.to_string(),
            });
        }

        Ok(response.body)
    }
}

fn build_request(url: &str) -> Result<HttpRequest, FetchError> {
    let parsed = Url::parse(url).map_err(|e| FetchError::InvalidRequest {
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(FetchError::InvalidRequest {
            url: url.to_string(),
            reason: format!("unsupported scheme {}", parsed.scheme()),
        });
    }

    Ok(HttpRequest::get(parsed))
}
