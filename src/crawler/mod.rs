//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching through a pluggable transport
//! - Streaming HTML link extraction
//! - Visited-link bookkeeping shared between branches
//! - Sequential and concurrent crawl coordination

mod coordinator;
mod fetcher;
mod mock;
mod parser;
mod visited;

pub use coordinator::Crawler;
pub use fetcher::{
    build_http_client, FetchError, Fetcher, HttpClient, HttpRequest, HttpResponse,
    ReqwestClient, TransportError,
};
pub use mock::MockHttpClient;
pub use parser::extract_links;
pub use visited::{RetrievedFiles, VisitedSet};
