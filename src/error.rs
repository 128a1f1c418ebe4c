//! Provider client error types
//!
//! Every component boundary returns `ProviderError`; callers decide whether a
//! failure means "no channels" or something to show the user.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("{0}")]
    Network(String),

    #[error("HTTP error: {0}")]
    Http(u16),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Invalid header value: {0}")]
    InvalidHeader(String),

    #[error("Provider descriptor is missing `{0}`")]
    MissingField(&'static str),

    #[error("Handshake with {portal} failed: {source}")]
    Handshake {
        portal: String,
        #[source]
        source: Box<ProviderError>,
    },

    #[error("Portal request '{action}' failed: {source}")]
    Fetch {
        action: &'static str,
        #[source]
        source: Box<ProviderError>,
    },

    #[error("No authenticated session for this portal")]
    NotAuthenticated,
}

/// Result type alias for the provider client
pub type Result<T> = std::result::Result<T, ProviderError>;

impl ProviderError {
    pub fn is_handshake(&self) -> bool {
        matches!(self, ProviderError::Handshake { .. })
    }

    pub(crate) fn fetch(action: &'static str, source: ProviderError) -> Self {
        ProviderError::Fetch {
            action,
            source: Box::new(source),
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(e: reqwest::Error) -> Self {
        ProviderError::Network(friendly_network_error(&e))
    }
}

impl From<serde_json::Error> for ProviderError {
    fn from(e: serde_json::Error) -> Self {
        ProviderError::MalformedResponse(e.to_string())
    }
}

impl From<url::ParseError> for ProviderError {
    fn from(e: url::ParseError) -> Self {
        ProviderError::InvalidUrl(e.to_string())
    }
}

impl From<reqwest::header::InvalidHeaderValue> for ProviderError {
    fn from(e: reqwest::header::InvalidHeaderValue) -> Self {
        ProviderError::InvalidHeader(e.to_string())
    }
}

impl From<reqwest::header::InvalidHeaderName> for ProviderError {
    fn from(e: reqwest::header::InvalidHeaderName) -> Self {
        ProviderError::InvalidHeader(e.to_string())
    }
}

fn friendly_network_error(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        return "Connection timeout - server did not respond".to_string();
    }
    if e.is_connect() {
        if let Some(url) = e.url() {
            return format!(
                "Connection failed - {} unreachable",
                url.host_str().unwrap_or("server")
            );
        }
        return "Connection failed - server unreachable".to_string();
    }
    if e.is_decode() || e.is_body() {
        return format!("Failed to read response: {}", e);
    }
    format!("Request failed: {}", e)
}
