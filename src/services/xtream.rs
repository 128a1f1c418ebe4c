//! Xtream Codes playlist URLs
//!
//! Xtream panels expose the whole catalog as an M3U playlist at a fixed
//! endpoint:
//! ```text
//! http://server:port/get.php?username=X&password=Y&type=m3u
//! ```
//! so an Xtream provider is an M3U provider with a synthesized URL.

use crate::error::{ProviderError, Result};
use crate::models::ProviderDescriptor;
use crate::services::url_builder;

/// Xtream server and account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XtreamCredentials {
    /// Server origin (e.g., "http://example.com:8080")
    pub server: String,
    pub username: String,
    pub password: String,
}

impl XtreamCredentials {
    /// Credentials from a XTREAM descriptor; the URL is reduced to its origin
    pub fn from_descriptor(descriptor: &ProviderDescriptor) -> Result<Self> {
        let username = descriptor
            .username
            .clone()
            .ok_or(ProviderError::MissingField("username"))?;
        let password = descriptor
            .password
            .clone()
            .ok_or(ProviderError::MissingField("password"))?;

        Ok(Self {
            server: url_builder::origin(&descriptor.url)?,
            username,
            password,
        })
    }

    /// Build the get.php M3U playlist URL
    pub fn m3u_url(&self) -> String {
        format!(
            "{}/get.php?username={}&password={}&type=m3u",
            self.server,
            urlencoding::encode(&self.username),
            urlencoding::encode(&self.password)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_m3u_url_from_descriptor() {
        let descriptor = ProviderDescriptor::xtream("host.com", "u", "p");
        let creds = XtreamCredentials::from_descriptor(&descriptor).unwrap();

        assert_eq!(
            creds.m3u_url(),
            "http://host.com/get.php?username=u&password=p&type=m3u"
        );
    }

    #[test]
    fn test_m3u_url_drops_path_and_encodes() {
        let descriptor =
            ProviderDescriptor::xtream("https://host.com:8443/player_api.php", "a b", "p&q");
        let creds = XtreamCredentials::from_descriptor(&descriptor).unwrap();

        assert_eq!(
            creds.m3u_url(),
            "https://host.com:8443/get.php?username=a%20b&password=p%26q&type=m3u"
        );
    }

    #[test]
    fn test_from_descriptor_missing_fields() {
        let mut descriptor = ProviderDescriptor::xtream("host.com", "u", "p");
        descriptor.password = None;

        assert!(matches!(
            XtreamCredentials::from_descriptor(&descriptor),
            Err(ProviderError::MissingField("password"))
        ));
    }
}
