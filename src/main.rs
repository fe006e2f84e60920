mod data;
mod error;
mod fetcher;
mod handlers;
mod map;
mod models;
mod normalize;
mod state;
mod table;

use anyhow::Context as _;
use axum::{routing::get, Router};
use std::sync::Arc;
use tera::Tera;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::fetcher::WebcamFetcher;
use crate::handlers::{api_map, api_webcams, export_webcams, webcam_map, webcam_table};
use crate::state::{AppState, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("webcamviz=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env();
    info!(
        api_url = %config.api_url,
        cache_ttl_secs = config.cache_ttl.as_secs(),
        "Starting WebcamViz"
    );

    let tera = Tera::new(&config.templates_glob)
        .with_context(|| format!("Failed to parse templates from {}", config.templates_glob))?;
    let fetcher = WebcamFetcher::new(
        config.api_url.clone(),
        config.cache_ttl,
        config.request_timeout,
    )
    .context("Failed to build HTTP client")?;

    let state = Arc::new(AppState::new(tera, fetcher));

    let app = Router::new()
        .route("/", get(webcam_table))
        .route("/map", get(webcam_map))
        .route("/export.csv", get(export_webcams))
        .route("/api/webcams", get(api_webcams))
        .route("/api/map", get(api_map))
        .nest_service("/static", ServeDir::new("static"))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_address))?;
    info!("Listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
