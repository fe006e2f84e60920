use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tera::Context;
use tracing::{error, warn};

use crate::data::load_webcams;
use crate::error::WebcamVizError;
use crate::map::{build_map, MapView};
use crate::models::WebcamRecord;
use crate::state::AppState;
use crate::table::{
    export_csv, filter, paginate, select_preview, showing_summary, Direction, PaginationState,
    CSV_FILE_NAME,
};

/// Warning shown when no webcam survives normalization or the search.
pub const NO_WEBCAMS_WARNING: &str = "No webcams with coordinates and images found.";

/// Query parameters carrying the table's per-session state.
#[derive(Debug, Default, Deserialize)]
pub struct WebcamQuery {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub page: Option<usize>,
    #[serde(default, deserialize_with = "empty_string_as_none_str")]
    pub q: Option<String>,
    /// Pagination button pressed on the previous render.
    #[serde(default)]
    pub nav: Option<Direction>,
    /// Title picked in the preview selector.
    #[serde(default, deserialize_with = "empty_string_as_none_str")]
    pub selected: Option<String>,
}

impl WebcamQuery {
    fn search_term(&self) -> &str {
        self.q.as_deref().unwrap_or_default()
    }
}

fn empty_string_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    match opt {
        None => Ok(None),
        Some(s) if s.is_empty() => Ok(None),
        Some(s) => s.parse::<T>().map(Some).map_err(serde::de::Error::custom),
    }
}

fn empty_string_as_none_str<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    match opt {
        None => Ok(None),
        Some(s) if s.is_empty() => Ok(None),
        Some(s) => Ok(Some(s)),
    }
}

fn render_template(
    tera: &tera::Tera,
    template: &str,
    context: &Context,
) -> Result<Html<String>, (StatusCode, &'static str)> {
    tera.render(template, context).map(Html).map_err(|e| {
        error!("Template render error for '{}': {}", template, e);
        (StatusCode::INTERNAL_SERVER_ERROR, "Render error")
    })
}

/// Renders `error.html` in place of the whole page.
fn render_error(tera: &tera::Tera, err: &WebcamVizError) -> Response {
    error!("Request failed: {}", err);
    let mut context = Context::new();
    context.insert("message", &err.to_string());
    match render_template(tera, "error.html", &context) {
        Ok(html) => (err.status_code(), html).into_response(),
        Err(e) => e.into_response(),
    }
}

impl IntoResponse for WebcamVizError {
    fn into_response(self) -> Response {
        (
            self.status_code(),
            Json(serde_json::json!({ "error": self.to_string() })),
        )
            .into_response()
    }
}

/// Everything `webcams.html` needs for one render of the table page.
#[derive(Debug, Serialize)]
pub struct TablePage {
    pub q: String,
    pub total: usize,
    pub rows: Vec<WebcamRecord>,
    pub pagination: PaginationState,
    pub summary: String,
    pub titles: Vec<String>,
    /// Title of `preview`, empty when nothing is selected.
    pub selected: String,
    pub preview: Option<WebcamRecord>,
    pub warning: Option<&'static str>,
}

/// Applies search, pagination and preview selection to `records`.
///
/// The requested page is clamped to the filtered set before the pressed
/// pagination button is applied, so the returned state is always in range.
pub fn table_page(records: &[WebcamRecord], query: &WebcamQuery) -> TablePage {
    let filtered = filter(records, query.search_term());

    let mut pagination = PaginationState::new(query.page.unwrap_or(1), filtered.len());
    if let Some(direction) = query.nav {
        pagination = pagination.navigate(direction);
    }

    // An unknown or missing selection shows the first webcam, like the selector does.
    let preview = query
        .selected
        .as_deref()
        .and_then(|title| select_preview(&filtered, title))
        .or_else(|| filtered.first().copied());

    TablePage {
        q: query.search_term().to_string(),
        total: filtered.len(),
        rows: paginate(&filtered, &pagination)
            .iter()
            .map(|r| (*r).clone())
            .collect(),
        summary: showing_summary(&pagination, filtered.len()),
        pagination,
        titles: filtered.iter().map(|r| r.title.clone()).collect(),
        selected: preview.map(|r| r.title.clone()).unwrap_or_default(),
        preview: preview.cloned(),
        warning: filtered.is_empty().then_some(NO_WEBCAMS_WARNING),
    }
}

/// GET / - Searchable, paginated webcam table with preview.
pub async fn webcam_table(
    State(state): State<Arc<AppState>>,
    Query(query): Query<WebcamQuery>,
) -> Response {
    let records = match load_webcams(&state.fetcher).await {
        Ok(records) => records,
        Err(e) => return render_error(&state.tera, &WebcamVizError::from(e)),
    };

    let page = table_page(&records, &query);
    let context = match Context::from_serialize(&page) {
        Ok(context) => context,
        Err(e) => return render_error(&state.tera, &WebcamVizError::from(e)),
    };

    render_template(&state.tera, "webcams.html", &context).into_response()
}

/// GET /map - Webcam locations on a deck.gl map.
pub async fn webcam_map(State(state): State<Arc<AppState>>) -> Response {
    let records = match load_webcams(&state.fetcher).await {
        Ok(records) => records,
        Err(e) => return render_error(&state.tera, &WebcamVizError::from(e)),
    };

    let mut context = Context::new();
    match build_map(&records) {
        MapView::NoData => {
            warn!("No webcams to place on the map");
            context.insert("warning", NO_WEBCAMS_WARNING);
        }
        MapView::Map(spec) => match serde_json::to_string(&spec) {
            Ok(json) => context.insert("map_json", &script_safe(&json)),
            Err(e) => {
                error!("Failed to serialize map spec: {}", e);
                return (StatusCode::INTERNAL_SERVER_ERROR, "Render error").into_response();
            }
        },
    }

    render_template(&state.tera, "map.html", &context).into_response()
}

/// Keeps JSON embedded in a `<script>` block from closing it early.
fn script_safe(json: &str) -> String {
    json.replace("</", "<\\/")
}

/// GET /export.csv - Filtered (not paginated) webcams as CSV.
pub async fn export_webcams(
    State(state): State<Arc<AppState>>,
    Query(query): Query<WebcamQuery>,
) -> Result<Response, WebcamVizError> {
    let records = load_webcams(&state.fetcher).await?;
    let filtered = filter(&records, query.search_term());
    let body = export_csv(&filtered)?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", CSV_FILE_NAME),
            ),
        ],
        body,
    )
        .into_response())
}

/// GET /api/webcams - JSON page of normalized webcams.
pub async fn api_webcams(
    State(state): State<Arc<AppState>>,
    Query(query): Query<WebcamQuery>,
) -> Result<Json<serde_json::Value>, WebcamVizError> {
    let records = load_webcams(&state.fetcher).await?;
    let page = table_page(&records, &query);

    Ok(Json(serde_json::json!({
        "items": page.rows,
        "page": page.pagination.current_page(),
        "page_size": page.pagination.page_size(),
        "total_pages": page.pagination.total_pages(),
        "total": page.total,
    })))
}

/// GET /api/map - The map description as JSON.
pub async fn api_map(State(state): State<Arc<AppState>>) -> Result<Json<MapView>, WebcamVizError> {
    let records = load_webcams(&state.fetcher).await?;
    Ok(Json(build_map(&records)))
}
