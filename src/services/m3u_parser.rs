use lazy_static::lazy_static;
use regex::Regex;
use reqwest::Client;
use std::collections::HashMap;
use tracing::{debug, info};

use crate::error::{ProviderError, Result};
use crate::models::Channel;

lazy_static! {
    /// Regex to parse EXTINF attributes (tvg-id="...", group-title="...", etc)
    static ref ATTR_REGEX: Regex = Regex::new(r#"(\w+(?:-\w+)*)="([^"]*)""#).unwrap();
}

/// Parsed EXTINF line data
#[derive(Debug, Default)]
struct ExtinfData {
    attributes: HashMap<String, String>,
    title: Option<String>,
}

impl ExtinfData {
    fn attribute(&self, key: &str) -> Option<String> {
        self.attributes
            .get(key)
            .filter(|v| !v.is_empty())
            .cloned()
    }
}

/// Parse an EXTINF line
/// Format: #EXTINF:duration tvg-id="..." tvg-logo="..." group-title="...",Title
///
/// The title is whatever follows the last comma, so commas inside quoted
/// attribute values never leak into it.
fn parse_extinf(line: &str) -> ExtinfData {
    let (header, title) = match line.rsplit_once(',') {
        Some((header, title)) => {
            let title = title.trim();
            (header, (!title.is_empty()).then(|| title.to_string()))
        }
        None => (line, None),
    };

    let mut attributes = HashMap::new();
    for caps in ATTR_REGEX.captures_iter(header) {
        let key = caps.get(1).map(|m| m.as_str().to_string()).unwrap_or_default();
        let value = caps.get(2).map(|m| m.as_str().to_string()).unwrap_or_default();
        attributes.insert(key, value);
    }

    ExtinfData { attributes, title }
}

/// M3U playlist fetcher and parser
pub struct M3UParser {
    client: Client,
    max_m3u_size_mb: usize,
}

impl M3UParser {
    /// Create a parser sharing the provider client's HTTP connection pool
    pub fn new(client: Client, max_m3u_size_mb: usize) -> Self {
        Self {
            client,
            max_m3u_size_mb,
        }
    }

    /// Parse playlist text into channels, in source order
    ///
    /// Ids are 1-based and counted per `#EXTINF` line. An `#EXTINF` that is not
    /// followed by an `http` line before the next `#EXTINF` is dropped, and its
    /// id is not reused. Malformed lines are skipped.
    pub fn parse(text: &str) -> Vec<Channel> {
        let mut result = Vec::new();
        let mut pending: Option<Channel> = None;
        let mut id: i64 = 0;

        for line in text.lines() {
            let line = line.trim_end_matches('\r');

            if line.starts_with("#EXTINF") {
                let extinf = parse_extinf(line);
                id += 1;
                pending = Some(Channel {
                    id,
                    name: extinf.title.clone(),
                    cmd: String::new(),
                    logo: extinf.attribute("tvg-logo"),
                    group: extinf.attribute("group-title"),
                    epg_id: extinf.attribute("tvg-id"),
                });
            } else if line.starts_with("http") {
                if let Some(mut channel) = pending.take() {
                    channel.cmd = line.trim().to_string();
                    result.push(channel);
                }
            }
        }

        result
    }

    /// Download playlist text; non-2xx and oversized playlists are errors
    pub async fn fetch(&self, url: &str) -> Result<String> {
        debug!("Fetching M3U playlist");

        let mut response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Http(status.as_u16()));
        }

        let max_bytes = (self.max_m3u_size_mb as u64) * 1024 * 1024;
        if let Some(len) = response.content_length() {
            if len > max_bytes {
                return Err(self.too_large(len));
            }
        }

        // Chunked responses carry no length, so enforce the cap while reading
        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            body.extend_from_slice(&chunk);
            if body.len() as u64 > max_bytes {
                return Err(self.too_large(body.len() as u64));
            }
        }

        Ok(String::from_utf8_lossy(&body).into_owned())
    }

    fn too_large(&self, len: u64) -> ProviderError {
        ProviderError::MalformedResponse(format!(
            "Playlist too large: {:.1}MB (limit {}MB)",
            len as f64 / 1024f64 / 1024f64,
            self.max_m3u_size_mb
        ))
    }

    /// Fetch and parse a playlist URL
    pub async fn load(&self, url: &str) -> Result<Vec<Channel>> {
        let text = self.fetch(url).await?;
        let channels = Self::parse(&text);
        info!("M3U playlist parsed: {} channels", channels.len());
        Ok(channels)
    }
}
