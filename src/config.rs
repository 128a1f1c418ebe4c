use std::env;

/// Provider client configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    // Network
    pub fetch_timeout_ms: u64,
    pub accept_invalid_certs: bool,

    // Playlists
    pub max_m3u_size_mb: usize,

    // URL verification
    pub strict_verify: bool,

    // Misc
    pub user_agent: String,
}

impl Config {
    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        let defaults = Self::new_default();

        Self {
            fetch_timeout_ms: env::var("FETCH_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.fetch_timeout_ms),

            accept_invalid_certs: env::var("ACCEPT_INVALID_CERTS")
                .ok()
                .and_then(|v| parse_bool(&v))
                .unwrap_or(defaults.accept_invalid_certs),

            max_m3u_size_mb: env::var("MAX_M3U_SIZE_MB")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_m3u_size_mb),

            strict_verify: env::var("STRICT_VERIFY")
                .ok()
                .and_then(|v| parse_bool(&v))
                .unwrap_or(defaults.strict_verify),

            // Use VLC user agent to avoid IPTV server blocks
            user_agent: env::var("USER_AGENT").unwrap_or(defaults.user_agent),
        }
    }

    /// Built-in defaults, ignoring the environment
    pub fn new_default() -> Self {
        Self {
            fetch_timeout_ms: 30_000, // 30 seconds
            accept_invalid_certs: true,
            max_m3u_size_mb: 500,
            strict_verify: true,
            user_agent: "VLC/3.0.20 LibVLC/3.0.20".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
