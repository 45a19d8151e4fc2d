use std::env;

pub const SERVER_URL_VAR: &str = "TIC_TAC_TOE_SERVER_URL";
pub const LOG_FILTER_VAR: &str = "RUST_LOG";

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:3001";
pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub server_url: String,
    pub log_filter: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str, default: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        Self {
            server_url: read(SERVER_URL_VAR, DEFAULT_SERVER_URL),
            log_filter: read(LOG_FILTER_VAR, DEFAULT_LOG_FILTER),
        }
    }
}
