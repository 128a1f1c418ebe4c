//! Base URL normalization
//!
//! Provider URLs come from hand-edited configuration and often lack a scheme
//! (`portal.example:8080/c/`). Everything that talks to a provider goes
//! through [`normalize`] first.

use lazy_static::lazy_static;
use regex::Regex;
use url::Url;

use crate::error::{ProviderError, Result};

lazy_static! {
    /// Leading `scheme://`; a `://` later in the query does not count
    static ref SCHEME_REGEX: Regex = Regex::new(r"^[A-Za-z][A-Za-z0-9+.-]*://").unwrap();
}

/// Parsed provider URL with a guaranteed scheme and host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedUrl {
    url: Url,
}

/// Parse a provider URL, defaulting to `http://` when no scheme is given
pub fn normalize(raw: &str) -> Result<NormalizedUrl> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ProviderError::InvalidUrl("empty URL".to_string()));
    }

    // `host:port` parses as a scheme, so look for the separator instead
    let url = if SCHEME_REGEX.is_match(raw) {
        Url::parse(raw)?
    } else {
        Url::parse(&format!("http://{}", raw))?
    };

    if url.host_str().map_or(true, str::is_empty) {
        return Err(ProviderError::InvalidUrl(format!("missing host in {}", raw)));
    }

    Ok(NormalizedUrl { url })
}

/// `scheme://host[:port]` of a raw provider URL
pub fn origin(raw: &str) -> Result<String> {
    Ok(normalize(raw)?.origin())
}

impl NormalizedUrl {
    pub fn scheme(&self) -> &str {
        self.url.scheme()
    }

    /// Host with explicit port, as sent in the `Host` header
    pub fn host(&self) -> String {
        let host = self.url.host_str().unwrap_or_default();
        match self.url.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        }
    }

    pub fn path(&self) -> &str {
        self.url.path()
    }

    /// True when the URL carries more than the root path
    pub fn has_path(&self) -> bool {
        !matches!(self.url.path(), "" | "/")
    }

    /// `scheme://host[:port]`, without path or query
    pub fn origin(&self) -> String {
        format!("{}://{}", self.scheme(), self.host())
    }

    pub fn as_url(&self) -> &Url {
        &self.url
    }
}

impl std::fmt::Display for NormalizedUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_adds_http_scheme() {
        let url = normalize("example.com/path").unwrap();
        assert_eq!(url.scheme(), "http");
        assert_eq!(url.host(), "example.com");
        assert_eq!(url.path(), "/path");
        assert!(url.has_path());
    }

    #[test]
    fn test_normalize_preserves_https() {
        let url = normalize("https://example.com").unwrap();
        assert_eq!(url.scheme(), "https");
        assert!(!url.has_path());
        assert_eq!(url.origin(), "https://example.com");
    }

    #[test]
    fn test_host_port_without_scheme() {
        let url = normalize("portal.example:8080/c/").unwrap();
        assert_eq!(url.scheme(), "http");
        assert_eq!(url.host(), "portal.example:8080");
        assert_eq!(url.origin(), "http://portal.example:8080");
    }

    #[test]
    fn test_scheme_only_detected_at_start() {
        let url = normalize("portal.example/c/?ref=http://x").unwrap();
        assert_eq!(url.scheme(), "http");
        assert_eq!(url.host(), "portal.example");
        assert_eq!(url.path(), "/c/");

        let url = normalize("HTTPS://portal.example").unwrap();
        assert_eq!(url.scheme(), "https");
    }

    #[test]
    fn test_origin_strips_path_and_query() {
        assert_eq!(
            origin("http://host.com:25461/stalker_portal/c/index.html?x=1").unwrap(),
            "http://host.com:25461"
        );
    }

    #[test]
    fn test_invalid_urls() {
        assert!(matches!(normalize(""), Err(ProviderError::InvalidUrl(_))));
        assert!(matches!(
            normalize("http://"),
            Err(ProviderError::InvalidUrl(_))
        ));
        assert!(matches!(
            normalize("http://exa mple.com"),
            Err(ProviderError::InvalidUrl(_))
        ));
    }
}
