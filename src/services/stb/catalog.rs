//! STB channel catalog and link resolution

use reqwest::Client;
use tracing::{debug, info};

use super::types::{ChannelPage, LinkData};
use super::{get_js, LOAD_PHP};
use crate::error::{ProviderError, Result};
use crate::models::{Channel, RequestOptions};
use crate::services::url_builder;

pub struct StbCatalog {
    http: Client,
}

impl StbCatalog {
    pub fn new(http: Client) -> Self {
        Self { http }
    }

    /// Fetch every live channel; portal ids and order are kept as-is
    pub async fn fetch_catalog(
        &self,
        base_url: &str,
        options: &RequestOptions,
    ) -> Result<Vec<Channel>> {
        let action = "get_all_channels";
        let result: Result<ChannelPage> = async {
            let origin = url_builder::origin(base_url)?;
            let url = format!("{}{}?type=itv&action={}", origin, LOAD_PHP, action);
            get_js::<ChannelPage>(&self.http, &url, options, action).await
        }
        .await;

        let page = result.map_err(|e| ProviderError::fetch(action, e))?;
        info!("STB catalog loaded: {} channels", page.data.len());
        Ok(page.data)
    }

    /// Resolve a channel `cmd` into the URL a player can open
    pub async fn create_link(
        &self,
        base_url: &str,
        cmd: &str,
        options: &RequestOptions,
    ) -> Result<String> {
        let action = "create_link";
        let result: Result<String> = async {
            let origin = url_builder::origin(base_url)?;
            let url = format!(
                "{}{}?type=itv&action={}&type=itv&cmd={}&JsHttpRequest=1-xml",
                origin,
                LOAD_PHP,
                action,
                urlencoding::encode(cmd)
            );
            let link: LinkData = get_js(&self.http, &url, options, action).await?;
            link.playable_url().map(str::to_string).ok_or_else(|| {
                ProviderError::MalformedResponse("create_link returned an empty cmd".to_string())
            })
        }
        .await;

        let link = result.map_err(|e| ProviderError::fetch(action, e))?;
        debug!("STB link resolved");
        Ok(link)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn session() -> RequestOptions {
        let mut options = RequestOptions::default();
        options.set_bearer_token("SESSION");
        options
            .headers
            .insert("X-User-Agent".to_string(), "Model: MAG200; Link: Ethernet".to_string());
        options
    }

    #[tokio::test]
    async fn test_fetch_catalog_passes_entries_through() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/server/load.php"))
            .and(query_param("type", "itv"))
            .and(query_param("action", "get_all_channels"))
            .and(header("Authorization", "Bearer SESSION"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "js": {
                    "total_items": 2,
                    "data": [
                        { "id": "17", "name": "News", "cmd": "ffrt http://localhost/ch/17", "logo": "n.png" },
                        { "id": 3, "name": "Music", "cmd": "ffrt http://localhost/ch/3" }
                    ]
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let catalog = StbCatalog::new(Client::new());
        let channels = catalog
            .fetch_catalog(&format!("{}/c/", server.uri()), &session())
            .await
            .unwrap();

        assert_eq!(channels.len(), 2);
        assert_eq!(channels[0].id, 17);
        assert_eq!(channels[0].cmd, "ffrt http://localhost/ch/17");
        assert_eq!(channels[0].logo.as_deref(), Some("n.png"));
        assert_eq!(channels[1].id, 3);
        assert_eq!(channels[1].name.as_deref(), Some("Music"));
    }

    #[tokio::test]
    async fn test_fetch_catalog_keeps_entries_with_null_cmd() {
        let server = MockServer::start().await;
        Mock::given(query_param("action", "get_all_channels"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "js": { "data": [
                    { "id": 1, "name": "Live", "cmd": "ffrt http://l/1" },
                    { "id": 2, "name": "Dead", "cmd": null }
                ] }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let catalog = StbCatalog::new(Client::new());
        let channels = catalog
            .fetch_catalog(&server.uri(), &session())
            .await
            .unwrap();

        assert_eq!(channels.len(), 2);
        assert_eq!(channels[0].cmd, "ffrt http://l/1");
        assert_eq!(channels[1].cmd, "");
    }

    #[tokio::test]
    async fn test_fetch_catalog_bad_shape_is_fetch_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "js": [] })),
            )
            .mount(&server)
            .await;

        let catalog = StbCatalog::new(Client::new());
        let err = catalog
            .fetch_catalog(&server.uri(), &session())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ProviderError::Fetch { action: "get_all_channels", .. }
        ));
    }

    #[tokio::test]
    async fn test_create_link_returns_last_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/server/load.php"))
            .and(query_param("action", "create_link"))
            .and(query_param("cmd", "ffrt http://localhost/ch/17"))
            .and(query_param("JsHttpRequest", "1-xml"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "js": { "id": 17, "cmd": "ffmpeg http://stream/x.ts" }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let catalog = StbCatalog::new(Client::new());
        let link = catalog
            .create_link(&server.uri(), "ffrt http://localhost/ch/17", &session())
            .await
            .unwrap();

        assert_eq!(link, "http://stream/x.ts");
    }

    #[tokio::test]
    async fn test_create_link_empty_cmd_is_fetch_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "js": { "cmd": "" } })),
            )
            .mount(&server)
            .await;

        let catalog = StbCatalog::new(Client::new());
        let err = catalog
            .create_link(&server.uri(), "ffrt x", &session())
            .await
            .unwrap_err();

        match err {
            ProviderError::Fetch { action, source } => {
                assert_eq!(action, "create_link");
                assert!(matches!(*source, ProviderError::MalformedResponse(_)));
            }
            other => panic!("expected fetch error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_create_link_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let catalog = StbCatalog::new(Client::new());
        let err = catalog
            .create_link(&server.uri(), "ffrt x", &session())
            .await
            .unwrap_err();

        assert!(err.to_string().contains("403"));
    }
}
