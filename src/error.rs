//! Error types for WebcamViz.
//!
//! `TransportError` is the only failure the webcam pages know how to show
//! to a user; everything else is an internal server fault.

use axum::http::StatusCode;
use thiserror::Error;

/// Failure talking to the remote tourism API.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The request could not be sent or the body could not be read.
    #[error("HTTP request error: {0}")]
    Request(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("API returned status {status} for {url}")]
    Status { status: StatusCode, url: String },

    /// The body was not the expected `{"Items": [...]}` document.
    #[error("Invalid API response: {0}")]
    InvalidResponse(#[from] serde_json::Error),
}

/// Error type for everything the web layer can hit.
#[derive(Debug, Error)]
pub enum WebcamVizError {
    #[error("Error fetching data: {0}")]
    Transport(#[from] TransportError),

    #[error("Template error: {0}")]
    Template(#[from] tera::Error),

    /// CSV serialization through polars failed.
    #[error("CSV export error: {0}")]
    Csv(#[from] polars::error::PolarsError),
}

impl WebcamVizError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            WebcamVizError::Transport(_) => StatusCode::BAD_GATEWAY,
            WebcamVizError::Template(_) | WebcamVizError::Csv(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}
