//! IPTV provider client
//!
//! Discovers the channel catalog of an IPTV provider (M3U playlist, Xtream
//! Codes panel, STB portal or a single raw stream) and resolves a channel into
//! a playable media URL.
//!
//! ```rust,ignore
//! use ativeplay_provider::{Config, ProviderClient, ProviderDescriptor};
//!
//! let client = ProviderClient::new(&Config::from_env())?;
//! let descriptor = ProviderDescriptor::stb("http://portal.example:8080/c/", "00:1A:79:00:00:01");
//!
//! let listing = client.load_channels(&descriptor).await?;
//! // persist listing.descriptor: it carries the new portal session
//! let url = client
//!     .resolve_for_playback(&listing.descriptor, &listing.channels[0])
//!     .await?;
//! ```

pub mod config;
pub mod error;
pub mod models;
pub mod services;

pub use config::Config;
pub use error::{ProviderError, Result};
pub use models::{Channel, Favorites, ProviderDescriptor, ProviderKind, RequestOptions};
pub use services::m3u_parser::M3UParser;
pub use services::provider_client::{ChannelListing, ProviderClient};
pub use services::stb::{StbAuthenticator, StbCatalog};
pub use services::xtream::XtreamCredentials;
