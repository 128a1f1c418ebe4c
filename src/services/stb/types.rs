//! STB portal response types

use serde::Deserialize;

use crate::models::Channel;

/// Every portal response wraps its payload in `{"js": ...}`
#[derive(Debug, Deserialize)]
pub struct JsEnvelope<T> {
    pub js: T,
}

/// `action=handshake`
#[derive(Debug, Deserialize)]
pub struct HandshakeData {
    pub token: String,
}

/// `action=get_all_channels`
#[derive(Debug, Deserialize)]
pub struct ChannelPage {
    pub data: Vec<Channel>,
}

/// `action=create_link`
#[derive(Debug, Deserialize)]
pub struct LinkData {
    pub cmd: String,
}

impl LinkData {
    /// The portal echoes a shell-style command (`ffmpeg http://...`); only the
    /// trailing token is a URL
    pub fn playable_url(&self) -> Option<&str> {
        self.cmd.split_whitespace().last()
    }
}
