//! Data loading module - feeds both views from the memoized fetch.

use tracing::debug;

use crate::error::TransportError;
use crate::fetcher::WebcamFetcher;
use crate::models::WebcamRecord;
use crate::normalize::normalize;

/// Loads the current webcam list and normalizes it.
///
/// # Errors
///
/// Returns the fetcher's `TransportError` unchanged; incomplete entries are
/// dropped silently and never turn into an error.
pub async fn load_webcams(fetcher: &WebcamFetcher) -> Result<Vec<WebcamRecord>, TransportError> {
    let entries = fetcher.fetch().await?;
    let records = normalize(&entries);
    debug!(
        fetched = entries.len(),
        kept = records.len(),
        "Normalized webcam entries"
    );
    Ok(records)
}
