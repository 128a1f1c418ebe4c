use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::Result;

/// Provider acquisition strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProviderKind {
    #[serde(rename = "M3UPLAYLIST")]
    M3uPlaylist,
    #[serde(rename = "XTREAM")]
    Xtream,
    #[serde(rename = "STB")]
    Stb,
    #[serde(rename = "M3USTREAM")]
    M3uStream,
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderKind::M3uPlaylist => write!(f, "M3UPLAYLIST"),
            ProviderKind::Xtream => write!(f, "XTREAM"),
            ProviderKind::Stb => write!(f, "STB"),
            ProviderKind::M3uStream => write!(f, "M3USTREAM"),
        }
    }
}

/// Headers needed to replay authenticated requests against an STB portal
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestOptions {
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

impl RequestOptions {
    pub const AUTHORIZATION: &'static str = "Authorization";

    /// Token carried by the `Authorization: Bearer ...` header
    pub fn bearer_token(&self) -> Option<&str> {
        self.headers
            .get(Self::AUTHORIZATION)
            .and_then(|v| v.strip_prefix("Bearer "))
            .filter(|t| !t.is_empty())
    }

    pub fn set_bearer_token(&mut self, token: &str) {
        self.headers
            .insert(Self::AUTHORIZATION.to_string(), format!("Bearer {}", token));
    }

    /// Convert to a reqwest header map, rejecting values that cannot be sent
    pub fn to_header_map(&self) -> Result<HeaderMap> {
        let mut map = HeaderMap::with_capacity(self.headers.len());
        for (name, value) in &self.headers {
            let name = HeaderName::from_bytes(name.as_bytes())?;
            map.insert(name, HeaderValue::from_str(value)?);
        }
        Ok(map)
    }
}

/// Provider configuration as persisted by the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderDescriptor {
    #[serde(rename = "type")]
    pub kind: ProviderKind,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mac: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<RequestOptions>,
}

impl ProviderDescriptor {
    pub fn new(kind: ProviderKind, url: impl Into<String>) -> Self {
        Self {
            kind,
            url: url.into(),
            username: None,
            password: None,
            mac: None,
            token: None,
            options: None,
        }
    }

    pub fn m3u_playlist(url: impl Into<String>) -> Self {
        Self::new(ProviderKind::M3uPlaylist, url)
    }

    pub fn m3u_stream(url: impl Into<String>) -> Self {
        Self::new(ProviderKind::M3uStream, url)
    }

    pub fn xtream(
        url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            username: Some(username.into()),
            password: Some(password.into()),
            ..Self::new(ProviderKind::Xtream, url)
        }
    }

    pub fn stb(url: impl Into<String>, mac: impl Into<String>) -> Self {
        Self {
            mac: Some(mac.into()),
            ..Self::new(ProviderKind::Stb, url)
        }
    }

    /// Copy of this descriptor carrying a fresh portal session
    pub fn with_session(&self, options: RequestOptions) -> Self {
        let token = options
            .bearer_token()
            .map(str::to_string)
            .or_else(|| self.token.clone());

        Self {
            token,
            options: Some(options),
            ..self.clone()
        }
    }

    /// Existing token, ignoring blank values left behind by option editors
    pub fn existing_token(&self) -> Option<&str> {
        self.token.as_deref().filter(|t| !t.trim().is_empty())
    }
}
