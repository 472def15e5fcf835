use crate::{UrlError, UrlResult};
use url::Url;

/// Extracts the host portion of a URL
///
/// # Examples
///
/// ```
/// use url::Url;
/// use sitegrab::url::extract_domain;
///
/// let url = Url::parse("https://example.com/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_string())
}

/// Checks whether a URL's host exactly matches the crawl's domain scope
///
/// The comparison is an exact string match on the parsed host: no subdomain
/// matching, no scheme consideration. A URL with no host is never in scope.
pub fn in_scope(url: &Url, domain_scope: &str) -> bool {
    url.host_str() == Some(domain_scope)
}

/// Validates a raw seed URL string supplied at startup
///
/// The seed must parse as a URL with an `http` or `https` scheme and a host.
/// This is the only fatal input check in the program: everything downstream
/// works with already-validated `Url` values.
///
/// # Arguments
///
/// * `input` - The raw string from the CLI argument or interactive prompt
///
/// # Returns
///
/// * `Ok(Url)` - The parsed seed URL
/// * `Err(UrlError)` - The input is malformed, has a non-HTTP scheme, or no host
pub fn validate_seed(input: &str) -> UrlResult<Url> {
    let url = Url::parse(input.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "expected http or https, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingHost);
    }

    Ok(url)
}
