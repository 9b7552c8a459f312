//! In-memory HTTP transport for tests and benchmarks

use crate::crawler::fetcher::{HttpClient, HttpRequest, HttpResponse, TransportError};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use url::Url;

#[derive(Debug, Default)]
struct Routes {
    responses: HashMap<Url, (u16, String)>,
    hits: HashMap<Url, usize>,
}

/// [`HttpClient`] that serves canned responses and counts requests
///
/// Routes are matched on the parsed URL, so `http://a.com` and
/// `http://a.com/` are the same route. Requests for unregistered URLs fail
/// like an unreachable host would.
///
/// # Example
///
/// ```
/// use hostcrawl::crawler::MockHttpClient;
///
/// let client = MockHttpClient::new();
/// client.mock_request("http://localhost.com", 200, "<a href=\"/about\">About</a>");
/// assert_eq!(client.hits("http://localhost.com/"), 0);
/// ```
#[derive(Debug, Default)]
pub struct MockHttpClient {
    routes: Mutex<Routes>,
}

impl MockHttpClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the response served for `url`, replacing any earlier one
    ///
    /// Panics if `url` is not an absolute URL.
    pub fn mock_request(&self, url: &str, status: u16, body: impl Into<String>) {
        let url = Url::parse(url).unwrap_or_else(|e| panic!("invalid mock url {url}: {e}"));
        self.lock().responses.insert(url, (status, body.into()));
    }

    /// Number of requests received for `url`
    pub fn hits(&self, url: &str) -> usize {
        match Url::parse(url) {
            Ok(url) => self.lock().hits.get(&url).copied().unwrap_or(0),
            Err(_) => 0,
        }
    }

    /// Number of requests received across all URLs
    pub fn total_hits(&self) -> usize {
        self.lock().hits.values().sum()
    }

    fn lock(&self) -> MutexGuard<'_, Routes> {
        self.routes.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl HttpClient for MockHttpClient {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let mut routes = self.lock();
        *routes.hits.entry(request.url.clone()).or_insert(0) += 1;

        match routes.responses.get(&request.url) {
            Some((status, body)) => Ok(HttpResponse {
                status: *status,
                body: body.clone().into_bytes(),
            }),
            None => Err(format!("no route to {}", request.url).into()),
        }
    }
}
