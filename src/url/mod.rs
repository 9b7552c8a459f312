//! URL handling helpers
//!
//! Links are compared as plain strings after trimming slashes, and hosts are
//! compared including any explicit port.

mod domain;
mod normalize;

use crate::CrawlError;
use url::Url;

pub use domain::{host_with_port, origin_prefix};
pub use normalize::trim_slashes;

/// Parses a link into a [`Url`], tagging failures with the offending text
///
/// # Examples
///
/// ```
/// use hostcrawl::url::parse_link;
///
/// assert!(parse_link("http://localhost.com").is_ok());
/// assert!(parse_link("not a url").is_err());
/// ```
pub fn parse_link(link: &str) -> Result<Url, CrawlError> {
    Url::parse(link).map_err(|source| CrawlError::UrlParse {
        url: link.to_string(),
        source,
    })
}
