//! STB portal handshake

use rand::distributions::Alphanumeric;
use rand::Rng;
use reqwest::Client;
use tracing::{info, warn};

use super::get_js;
use super::types::HandshakeData;
use crate::error::{ProviderError, Result};
use crate::models::RequestOptions;
use crate::services::url_builder::{self, NormalizedUrl};

/// Handshake endpoints, tried in order, each exactly once
pub const HANDSHAKE_ENDPOINTS: [&str; 2] = ["/server/load.php", "/portal.php"];

const TOKEN_LEN: usize = 32;

const MAG200_USER_AGENT: &str = "Mozilla/5.0 (QtEmbedded; U; Linux; C) AppleWebKit/533.3 (KHTML, like Gecko) MAG200 stbapp ver: 2 rev: 250 Safari/533.3";
const MAG200_X_USER_AGENT: &str = "Model: MAG200; Link: Ethernet";

pub struct StbAuthenticator {
    http: Client,
}

impl StbAuthenticator {
    pub fn new(http: Client) -> Self {
        Self { http }
    }

    /// Fresh 32-character alphanumeric token
    pub fn random_token() -> String {
        rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(TOKEN_LEN)
            .map(char::from)
            .collect()
    }

    /// Headers emulating a MAG200 box, authorized with `token`
    pub fn create_options(base: &NormalizedUrl, mac: &str, token: &str) -> RequestOptions {
        let origin = base.origin();
        let referer = if base.has_path() {
            format!("{}/", origin)
        } else {
            format!("{}/c/", origin)
        };

        let mut options = RequestOptions::default();
        let headers = &mut options.headers;
        headers.insert("User-Agent".to_string(), MAG200_USER_AGENT.to_string());
        headers.insert("Accept-Charset".to_string(), "UTF-8,*;q=0.8".to_string());
        headers.insert("X-User-Agent".to_string(), MAG200_X_USER_AGENT.to_string());
        headers.insert("Host".to_string(), base.host());
        headers.insert("Range".to_string(), "bytes=0-".to_string());
        headers.insert("Accept".to_string(), "*/*".to_string());
        headers.insert("Referer".to_string(), referer);
        headers.insert(
            "Cookie".to_string(),
            format!(
                "mac={}; stb_lang=en; timezone=Europe/Kiev; PHPSESSID=null;",
                mac
            ),
        );
        options.set_bearer_token(token);
        options
    }

    /// Authenticate against a portal and return the session headers
    ///
    /// Reuses `existing_token` when given. Tries each of
    /// [`HANDSHAKE_ENDPOINTS`] once; if none answers with a token the last
    /// error is returned inside `ProviderError::Handshake`.
    pub async fn handshake(
        &self,
        base_url: &str,
        mac: &str,
        existing_token: Option<&str>,
    ) -> Result<RequestOptions> {
        let base = url_builder::normalize(base_url)?;
        let origin = base.origin();
        let token = existing_token
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .unwrap_or_else(Self::random_token);

        let mut last_err = ProviderError::NotAuthenticated;

        for endpoint in HANDSHAKE_ENDPOINTS {
            let options = Self::create_options(&base, mac, &token);
            match self.try_endpoint(&origin, endpoint, &token, options).await {
                Ok(options) => {
                    info!("STB handshake succeeded via {}", endpoint);
                    return Ok(options);
                }
                Err(e) => {
                    warn!("STB handshake via {} failed: {}", endpoint, e);
                    last_err = e;
                }
            }
        }

        Err(ProviderError::Handshake {
            portal: origin,
            source: Box::new(last_err),
        })
    }

    async fn try_endpoint(
        &self,
        origin: &str,
        endpoint: &str,
        token: &str,
        mut options: RequestOptions,
    ) -> Result<RequestOptions> {
        let url = format!(
            "{}{}?type=stb&action=handshake&prehash=0&token={}&JsHttpRequest=1-xml",
            origin,
            endpoint,
            urlencoding::encode(token)
        );

        let data: HandshakeData = get_js(&self.http, &url, &options, "handshake").await?;
        if data.token.is_empty() {
            return Err(ProviderError::MalformedResponse(
                "handshake returned an empty token".to_string(),
            ));
        }

        options.set_bearer_token(&data.token);
        Ok(options)
    }
}
