mod channel;
mod favorites;
mod provider;

pub use channel::Channel;
pub use favorites::Favorites;
pub use provider::{ProviderDescriptor, ProviderKind, RequestOptions};
