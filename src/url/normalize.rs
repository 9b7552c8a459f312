/// Trims every leading and trailing `/` from a link
///
/// This is the only canonicalization links receive: `http://a.com/x/` and
/// `http://a.com/x` are the same link, while query strings, case and dot
/// segments are left untouched.
///
/// # Examples
///
/// ```
/// use hostcrawl::url::trim_slashes;
///
/// assert_eq!(trim_slashes("http://localhost.com/"), "http://localhost.com");
/// assert_eq!(trim_slashes("/docs/"), "docs");
/// ```
pub fn trim_slashes(link: &str) -> &str {
    link.trim_matches('/')
}
