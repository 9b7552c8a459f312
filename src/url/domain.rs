use url::Url;

/// Returns the host of a URL together with its explicit port, if any
///
/// This is the "host" used everywhere a link is compared or turned into a
/// file name: `localhost.com` and `localhost.com:8080` are different hosts.
/// Default ports are dropped by the URL parser, so `http://a.com:80` and
/// `http://a.com` compare equal.
///
/// Returns an empty string for URLs without a host.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use hostcrawl::url::host_with_port;
///
/// let url = Url::parse("http://127.0.0.1:8080/page").unwrap();
/// assert_eq!(host_with_port(&url), "127.0.0.1:8080");
///
/// let url = Url::parse("https://example.com/").unwrap();
/// assert_eq!(host_with_port(&url), "example.com");
/// ```
pub fn host_with_port(url: &Url) -> String {
    match (url.host_str(), url.port()) {
        (Some(host), Some(port)) => format!("{}:{}", host, port),
        (Some(host), None) => host.to_string(),
        (None, _) => String::new(),
    }
}

/// Returns `scheme://host[:port]` for a URL, with no trailing slash
///
/// Relative hrefs are resolved by appending them verbatim to this prefix.
pub fn origin_prefix(url: &Url) -> String {
    format!("{}://{}", url.scheme(), host_with_port(url))
}
