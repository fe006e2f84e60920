use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, error, info};

use crate::error::TransportError;
use crate::models::{RawWebcamEntry, TourismResponse};

/// Upper bound on one request to the API, connect through body.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub const DEFAULT_API_URL: &str = "https://tourism.api.opendatahub.com/v1/WebcamInfo?pagesize=2000&removenullvalues=false&getasidarray=false";

/// Memoizes one value for a fixed window.
///
/// The lock is held while a refresh runs, so callers arriving during a fetch
/// wait for it and then share its result. Failed refreshes are not stored.
#[derive(Debug)]
pub struct TtlCache<T> {
    window: Duration,
    slot: Mutex<Option<(T, Instant)>>,
}

impl<T: Clone> TtlCache<T> {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            slot: Mutex::new(None),
        }
    }

    pub async fn get_or_refresh<F, Fut, E>(&self, refresh: F) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let mut slot = self.slot.lock().await;

        if let Some((value, fetched_at)) = slot.as_ref() {
            if fetched_at.elapsed() <= self.window {
                debug!(age_secs = fetched_at.elapsed().as_secs(), "Cache hit");
                return Ok(value.clone());
            }
        }

        let value = refresh().await?;
        *slot = Some((value.clone(), Instant::now()));
        Ok(value)
    }
}

/// Fetches webcams from the tourism API, memoized by a [`TtlCache`].
#[derive(Debug)]
pub struct WebcamFetcher {
    client: reqwest::Client,
    url: String,
    cache: TtlCache<Arc<Vec<RawWebcamEntry>>>,
}

impl WebcamFetcher {
    pub fn new(
        url: impl Into<String>,
        ttl: Duration,
        request_timeout: Duration,
    ) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("WebcamViz/", env!("CARGO_PKG_VERSION")))
            .timeout(request_timeout)
            .build()?;

        Ok(Self {
            client,
            url: url.into(),
            cache: TtlCache::new(ttl),
        })
    }

    /// Returns the cached entries, or performs one GET when the cache is stale.
    pub async fn fetch(&self) -> Result<Arc<Vec<RawWebcamEntry>>, TransportError> {
        self.cache
            .get_or_refresh(|| async {
                info!("Fetching webcams from {}", self.url);
                match fetch_entries(&self.client, &self.url).await {
                    Ok(entries) => {
                        info!(count = entries.len(), "Fetched webcam entries");
                        Ok(Arc::new(entries))
                    }
                    Err(e) => {
                        error!("Error fetching webcams from {}: {}", self.url, e);
                        Err(e)
                    }
                }
            })
            .await
    }
}

async fn fetch_entries(
    client: &reqwest::Client,
    url: &str,
) -> Result<Vec<RawWebcamEntry>, TransportError> {
    let response = client.get(url).send().await?;

    let status = response.status();
    if !status.is_success() {
        return Err(TransportError::Status {
            status,
            url: url.to_string(),
        });
    }

    let body = response.bytes().await?;
    parse_entries(&body)
}

/// Decodes the `{"Items": [...]}` envelope, skipping items that do not fit
/// [`RawWebcamEntry`]. Only a broken envelope is an error.
fn parse_entries(body: &[u8]) -> Result<Vec<RawWebcamEntry>, TransportError> {
    let parsed: TourismResponse<Value> = serde_json::from_slice(body)?;
    let total = parsed.items.len();

    let entries: Vec<RawWebcamEntry> = parsed
        .items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect();

    if entries.len() < total {
        debug!(skipped = total - entries.len(), "Skipped malformed webcam entries");
    }
    Ok(entries)
}
