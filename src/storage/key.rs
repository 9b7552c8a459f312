use crate::url::host_with_port;
use std::fmt;
use url::Url;

/// Deterministic file name for a crawled page
///
/// Built as `host + path-with-slashes-replaced-by-underscores + ".html"`.
/// The query string and fragment do not take part, and two paths whose
/// transformed forms coincide (`/a/b` and `/a_b`) share a key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PageKey(String);

impl PageKey {
    /// Derives the key for `url`
    ///
    /// # Examples
    ///
    /// ```
    /// use hostcrawl::storage::PageKey;
    /// use url::Url;
    ///
    /// let url = Url::parse("http://localhost.com/advanced-features").unwrap();
    /// assert_eq!(PageKey::from_url(&url).as_str(), "localhost.com_advanced-features.html");
    /// ```
    pub fn from_url(url: &Url) -> Self {
        Self(format!(
            "{}{}.html",
            host_with_port(url),
            url.path().replace('/', "_")
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PageKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
