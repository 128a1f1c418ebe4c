//! STB (Stalker/MAG) portal client
//!
//! STB portals speak an undocumented JSON protocol over plain GET requests.
//! Every response is wrapped in a `{"js": ...}` envelope, and every request
//! must look like it came from a MAG200 set-top box.
//!
//! - **Authentication**: token handshake with `/server/load.php`, falling back
//!   to `/portal.php` once
//! - **Catalog**: full live channel list in a single request
//! - **Links**: turns an opaque channel `cmd` into a playable URL

pub mod auth;
pub mod catalog;
pub mod types;

pub use auth::{StbAuthenticator, HANDSHAKE_ENDPOINTS};
pub use catalog::StbCatalog;

use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, error};

use crate::error::{ProviderError, Result};
use crate::models::RequestOptions;
use types::JsEnvelope;

/// Path of the main portal API, used by catalog and link requests
pub const LOAD_PHP: &str = "/server/load.php";

/// GET a portal URL with the session headers and unwrap the `js` payload
pub(crate) async fn get_js<T: DeserializeOwned>(
    http: &Client,
    url: &str,
    options: &RequestOptions,
    action: &str,
) -> Result<T> {
    let headers = options.to_header_map()?;

    debug!("STB portal request: {}", action);

    let response = http.get(url).headers(headers).send().await?;

    let status = response.status();
    if !status.is_success() {
        return Err(ProviderError::Http(status.as_u16()));
    }

    let text = response.text().await?;

    let envelope: JsEnvelope<T> = serde_json::from_str(&text).map_err(|e| {
        error!(
            "Failed to parse STB response for action '{}': {}",
            action, e
        );
        debug!("Response text: {}", text.chars().take(500).collect::<String>());
        ProviderError::from(e)
    })?;

    Ok(envelope.js)
}
