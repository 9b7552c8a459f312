//! Streaming link extraction
//!
//! Pages are fed through `lol_html` chunk by chunk in non-strict mode, so
//! broken or ambiguous markup never stops extraction. Only the `href` of
//! anchor start tags is read, with character references decoded.
//!
//! # Link Rules
//!
//! For every `<a href="...">`, in order:
//! 1. hrefs containing `mailto` are skipped
//! 2. hrefs containing `#` are skipped
//! 3. an href that is not a valid URL aborts the whole page: no links at all
//! 4. an href without a host is appended to the page's `scheme://host`
//! 5. an href on the page's own host is kept verbatim
//! 6. an href on any other host is dropped
//!
//! Kept links have leading and trailing `/` trimmed, and the page's own URL is
//! never returned.

use crate::url::{host_with_port, origin_prefix, trim_slashes};
use html_escape::decode_html_entities;
use lol_html::errors::RewritingError;
use lol_html::{element, HtmlRewriter, OutputSink, Settings};
use std::cell::RefCell;
use std::collections::HashSet;
use std::io::{ErrorKind, Read};
use thiserror::Error;
use url::{ParseError, Url};

const CHUNK_SIZE: usize = 8 * 1024;

/// An href that could not be parsed; aborts extraction for the page
#[derive(Debug, Error)]
#[error("malformed href {href:?}: {source}")]
struct MalformedHref {
    href: String,
    source: ParseError,
}

#[derive(Debug, Error)]
enum ExtractError {
    #[error("failed to read page: {0}")]
    Read(#[from] std::io::Error),

    #[error(transparent)]
    Rewrite(#[from] RewritingError),
}

/// Extracts the crawlable same-host links of an HTML page
///
/// `base` is the URL the page was served from. The document is read from
/// `html` incrementally.
///
/// Returns an empty set if any anchor carries an unparseable href. A read
/// error part way through keeps the links found before it.
///
/// # Example
///
/// ```
/// use hostcrawl::crawler::extract_links;
/// use url::Url;
///
/// let base = Url::parse("http://localhost.com").unwrap();
/// let html = r#"<a href="/">Home</a><a href="/about">About</a><a href="https://google.com">Out</a>"#;
///
/// let links = extract_links(&base, html.as_bytes());
/// assert_eq!(links.len(), 1);
/// assert!(links.contains("http://localhost.com/about"));
/// ```
pub fn extract_links<R: Read>(base: &Url, html: R) -> HashSet<String> {
    let origin = origin_prefix(base);
    let base_host = host_with_port(base);
    let links = RefCell::new(HashSet::new());

    let outcome = {
        let rewriter = HtmlRewriter::new(
            Settings {
                element_content_handlers: vec![element!("a[href]", |el| {
                    if let Some(raw) = el.get_attribute("href") {
                        let href = decode_html_entities(&raw);
                        if let Some(link) = resolve_href(&href, base, &origin, &base_host)? {
                            links.borrow_mut().insert(link);
                        }
                    }
                    Ok(())
                })],
                strict: false,
                ..Settings::default()
            },
            NoopSink,
        );
        stream(rewriter, html)
    };

    let mut links = links.into_inner();
    match outcome {
        Ok(()) => {}
        Err(ExtractError::Read(e)) => {
            tracing::warn!("Stopped reading {} early: {}", base, e);
        }
        Err(ExtractError::Rewrite(e)) => {
            tracing::debug!("Discarding links of {}: {}", base, e);
            return HashSet::new();
        }
    }

    links.remove(base.as_str());
    links.remove(trim_slashes(base.as_str()));
    links
}

fn stream<O: OutputSink, R: Read>(
    mut rewriter: HtmlRewriter<'_, O>,
    mut html: R,
) -> Result<(), ExtractError> {
    let mut buf = [0u8; CHUNK_SIZE];
    loop {
        let read = match html.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        rewriter.write(&buf[..read])?;
    }
    rewriter.end()?;
    Ok(())
}

/// Applies the link rules to a single href
fn resolve_href(
    href: &str,
    base: &Url,
    origin: &str,
    base_host: &str,
) -> Result<Option<String>, MalformedHref> {
    if href.contains("mailto") || href.contains('#') {
        return Ok(None);
    }

    let host = href_host(href, base).map_err(|source| MalformedHref {
        href: href.to_string(),
        source,
    })?;

    if host.is_empty() {
        let link = format!("{}{}", origin, href);
        return Ok(Some(trim_slashes(&link).to_string()));
    }

    if host == base_host {
        return Ok(Some(trim_slashes(href).to_string()));
    }

    Ok(None)
}

/// Returns the host an href names, or an empty string when it names none
///
/// Scheme-relative hrefs (`//host/path`) carry a host even though they need a
/// base to parse.
fn href_host(href: &str, base: &Url) -> Result<String, ParseError> {
    match Url::parse(href) {
        Ok(url) => Ok(host_with_port(&url)),
        Err(ParseError::RelativeUrlWithoutBase) => {
            let joined = base.join(href)?;
            if href.starts_with("//") {
                Ok(host_with_port(&joined))
            } else {
                Ok(String::new())
            }
        }
        Err(e) => Err(e),
    }
}

struct NoopSink;

impl OutputSink for NoopSink {
    fn handle_chunk(&mut self, _chunk: &[u8]) {}
}
