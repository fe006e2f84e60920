use std::env;
use std::time::Duration;

use tera::Tera;
use tracing::warn;

use crate::fetcher::{WebcamFetcher, DEFAULT_API_URL, DEFAULT_REQUEST_TIMEOUT};

/// Application configuration from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address to bind the HTTP server to.
    pub bind_address: String,
    /// Webcam endpoint of the tourism API, including its query string.
    pub api_url: String,
    /// How long a fetched webcam list is served before it is fetched again.
    pub cache_ttl: Duration,
    /// Timeout for a single request to the API.
    pub request_timeout: Duration,
    /// Glob used to load the Tera templates.
    pub templates_glob: String,
}

impl Config {
    /// Creates Config from environment variables with defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let seconds = |key: &str, default: u64| match lookup(key) {
            Some(raw) => raw.parse::<u64>().unwrap_or_else(|e| {
                warn!("Ignoring invalid {} {:?}: {}", key, raw, e);
                default
            }),
            None => default,
        };

        Self {
            bind_address: lookup("BIND_ADDRESS").unwrap_or_else(|| "0.0.0.0:8201".into()),
            api_url: lookup("WEBCAM_API_URL").unwrap_or_else(|| DEFAULT_API_URL.into()),
            cache_ttl: Duration::from_secs(seconds("CACHE_TTL_SECS", 3600)),
            request_timeout: Duration::from_secs(seconds(
                "HTTP_TIMEOUT_SECS",
                DEFAULT_REQUEST_TIMEOUT.as_secs(),
            )),
            templates_glob: lookup("TEMPLATES_GLOB")
                .unwrap_or_else(|| "templates/**/*.html".into()),
        }
    }
}

/// Shared application state passed to all request handlers.
#[derive(Debug)]
pub struct AppState {
    /// Template engine for rendering HTML pages.
    pub tera: Tera,
    /// Memoized source of raw webcam entries.
    pub fetcher: WebcamFetcher,
}

impl AppState {
    pub fn new(tera: Tera, fetcher: WebcamFetcher) -> Self {
        Self { tera, fetcher }
    }
}
