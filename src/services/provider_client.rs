//! Provider orchestration
//!
//! One entry point for every provider type:
//!
//! | Type          | Catalog source                                   |
//! |---------------|--------------------------------------------------|
//! | `M3UPLAYLIST` | playlist at `url`                                |
//! | `XTREAM`      | playlist at `{origin}/get.php?username=..`       |
//! | `STB`         | handshake, then `get_all_channels`               |
//! | `M3USTREAM`   | a single synthetic channel pointing at `url`     |
//!
//! Playlist and catalog failures degrade to an empty list. A failed STB
//! handshake is returned as an error so the caller can tell "portal refused
//! us" apart from "portal has no channels".

use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{ProviderError, Result};
use crate::models::{Channel, ProviderDescriptor, ProviderKind, RequestOptions};
use crate::services::m3u_parser::M3UParser;
use crate::services::stb::{StbAuthenticator, StbCatalog};
use crate::services::url_builder;
use crate::services::xtream::XtreamCredentials;

/// Channels of a provider plus the descriptor to persist afterwards
///
/// For STB providers `descriptor` carries the token and headers of the new
/// session; for everything else it is an unchanged copy.
#[derive(Debug, Clone)]
pub struct ChannelListing {
    pub channels: Vec<Channel>,
    pub descriptor: ProviderDescriptor,
}

pub struct ProviderClient {
    http: Client,
    parser: M3UParser,
    auth: StbAuthenticator,
    catalog: StbCatalog,
    strict_verify: bool,
}

impl ProviderClient {
    pub fn new(config: &Config) -> Result<Self> {
        let http = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_millis(config.fetch_timeout_ms))
            .gzip(true)
            // Many portals have self-signed certs
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .build()?;

        Ok(Self {
            parser: M3UParser::new(http.clone(), config.max_m3u_size_mb),
            auth: StbAuthenticator::new(http.clone()),
            catalog: StbCatalog::new(http.clone()),
            http,
            strict_verify: config.strict_verify,
        })
    }

    /// URL of the M3U playlist behind a M3UPLAYLIST or XTREAM descriptor
    pub fn playlist_url(descriptor: &ProviderDescriptor) -> Result<String> {
        match descriptor.kind {
            ProviderKind::M3uPlaylist => Ok(url_builder::normalize(&descriptor.url)?.to_string()),
            ProviderKind::Xtream => Ok(XtreamCredentials::from_descriptor(descriptor)?.m3u_url()),
            kind => Err(ProviderError::InvalidUrl(format!(
                "{} providers have no playlist URL",
                kind
            ))),
        }
    }

    /// Build the channel list for a provider
    ///
    /// Errors are limited to configuration problems (bad URL, missing
    /// credentials) and STB handshake failure.
    pub async fn load_channels(&self, descriptor: &ProviderDescriptor) -> Result<ChannelListing> {
        let listing = match descriptor.kind {
            ProviderKind::M3uPlaylist | ProviderKind::Xtream => {
                let url = Self::playlist_url(descriptor)?;
                let channels = match self.parser.load(&url).await {
                    Ok(channels) => channels,
                    Err(e) => {
                        warn!("Error loading {} playlist: {}", descriptor.kind, e);
                        Vec::new()
                    }
                };
                ChannelListing {
                    channels,
                    descriptor: descriptor.clone(),
                }
            }
            ProviderKind::Stb => {
                let updated = self.authenticate(descriptor).await?;
                let channels = match self.fetch_stb_catalog(&updated).await {
                    Ok(channels) => channels,
                    Err(e) => {
                        warn!("Error loading STB channels: {}", e);
                        Vec::new()
                    }
                };
                ChannelListing {
                    channels,
                    descriptor: updated,
                }
            }
            ProviderKind::M3uStream => {
                // Handed to the player as-is, so no URL validation here
                ChannelListing {
                    channels: vec![Channel::new(1, "Stream", descriptor.url.trim())],
                    descriptor: descriptor.clone(),
                }
            }
        };

        info!(
            "Loaded {} channels from {} provider",
            listing.channels.len(),
            descriptor.kind
        );
        Ok(listing)
    }

    /// Channel list only; every failure is logged and yields an empty list
    pub async fn list_channels(&self, descriptor: &ProviderDescriptor) -> Vec<Channel> {
        match self.load_channels(descriptor).await {
            Ok(listing) => listing.channels,
            Err(e) => {
                warn!("Could not list channels: {}", e);
                Vec::new()
            }
        }
    }

    /// Playable URL for a channel
    ///
    /// Only STB channels need a network round trip; every other provider
    /// already stores a direct URL in `cmd`.
    pub async fn resolve_for_playback(
        &self,
        descriptor: &ProviderDescriptor,
        channel: &Channel,
    ) -> Result<String> {
        if descriptor.kind != ProviderKind::Stb {
            return Ok(channel.cmd.clone());
        }

        let options = descriptor
            .options
            .as_ref()
            .ok_or(ProviderError::NotAuthenticated)?;
        self.catalog
            .create_link(&descriptor.url, &channel.cmd, options)
            .await
    }

    /// Like [`resolve_for_playback`](Self::resolve_for_playback), but renews
    /// the STB session once when it is missing or rejected
    ///
    /// Returns the URL and the descriptor to persist.
    pub async fn resolve_with_refresh(
        &self,
        descriptor: &ProviderDescriptor,
        channel: &Channel,
    ) -> Result<(String, ProviderDescriptor)> {
        if descriptor.kind != ProviderKind::Stb {
            return Ok((channel.cmd.clone(), descriptor.clone()));
        }

        if descriptor.options.is_some() {
            match self.resolve_for_playback(descriptor, channel).await {
                Ok(url) => return Ok((url, descriptor.clone())),
                Err(e) => warn!("Link creation failed, renewing STB session: {}", e),
            }
        }

        let updated = self.authenticate(descriptor).await?;
        let url = self.resolve_for_playback(&updated, channel).await?;
        Ok((url, updated))
    }

    /// Whether a URL answers at all
    ///
    /// In strict mode only 2xx responses count; otherwise any HTTP response
    /// does.
    pub async fn verify_url(&self, url: &str) -> bool {
        let url = match url_builder::normalize(url) {
            Ok(url) => url,
            Err(e) => {
                debug!("Error verifying URL: {}", e);
                return false;
            }
        };

        match self.http.get(url.as_url().clone()).send().await {
            Ok(response) => {
                let status = response.status();
                debug!("URL verification status: {}", status);
                !self.strict_verify || status.is_success()
            }
            Err(e) => {
                debug!("Error verifying URL: {}", e);
                false
            }
        }
    }

    /// Handshake and return a copy of the descriptor holding the new session
    async fn authenticate(&self, descriptor: &ProviderDescriptor) -> Result<ProviderDescriptor> {
        let mac = descriptor
            .mac
            .as_deref()
            .filter(|m| !m.trim().is_empty())
            .ok_or(ProviderError::MissingField("mac"))?;

        let options = self
            .auth
            .handshake(&descriptor.url, mac, descriptor.existing_token())
            .await?;
        Ok(descriptor.with_session(options))
    }

    async fn fetch_stb_catalog(&self, descriptor: &ProviderDescriptor) -> Result<Vec<Channel>> {
        let options: &RequestOptions = descriptor
            .options
            .as_ref()
            .ok_or(ProviderError::NotAuthenticated)?;
        self.catalog.fetch_catalog(&descriptor.url, options).await
    }
}
