//! Search, pagination and export for the webcam table.

use polars::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::WebcamVizError;
use crate::models::WebcamRecord;

/// Rows shown per table page.
pub const PAGE_SIZE: usize = 9;

/// Download name offered for [`export_csv`] output.
pub const CSV_FILE_NAME: &str = "webcams.csv";

/// Returns the records whose title contains `term`, ignoring case.
///
/// An empty term keeps every record in its original order.
pub fn filter<'a>(records: &'a [WebcamRecord], term: &str) -> Vec<&'a WebcamRecord> {
    if term.is_empty() {
        return records.iter().collect();
    }

    let term_lower = term.to_lowercase();
    records
        .iter()
        .filter(|r| r.title.to_lowercase().contains(&term_lower))
        .collect()
}

/// Direction of a pagination step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Previous,
    Next,
}

/// Current table page, always clamped against the filtered set it was last
/// applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaginationState {
    current_page: usize,
    page_size: usize,
    total_pages: usize,
}

impl Default for PaginationState {
    fn default() -> Self {
        Self {
            current_page: 1,
            page_size: PAGE_SIZE,
            total_pages: 1,
        }
    }
}

impl PaginationState {
    /// Restores a requested page (e.g. from a query string) for a filtered set
    /// of `filtered_count` records.
    pub fn new(requested_page: usize, filtered_count: usize) -> Self {
        Self::default()
            .with_page(requested_page)
            .clamp(filtered_count)
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total_pages(&self) -> usize {
        self.total_pages
    }

    fn with_page(self, page: usize) -> Self {
        Self {
            current_page: page.max(1),
            ..self
        }
    }

    /// Recomputes `total_pages` for a new filtered set and pulls the current
    /// page back into `[1, total_pages]`.
    pub fn clamp(self, filtered_count: usize) -> Self {
        let total_pages = filtered_count.div_ceil(self.page_size).max(1);
        Self {
            current_page: self.current_page.clamp(1, total_pages),
            total_pages,
            ..self
        }
    }

    /// Moves one page in `direction`; a step past either end is a no-op.
    pub fn navigate(self, direction: Direction) -> Self {
        let current_page = match direction {
            Direction::Previous if self.current_page > 1 => self.current_page - 1,
            Direction::Next if self.current_page < self.total_pages => self.current_page + 1,
            _ => self.current_page,
        };
        Self {
            current_page,
            ..self
        }
    }

    /// Half-open index range of the current page within `len` records.
    pub fn bounds(&self, len: usize) -> (usize, usize) {
        let start = (self.current_page - 1).saturating_mul(self.page_size).min(len);
        let end = start.saturating_add(self.page_size).min(len);
        (start, end)
    }
}

/// Returns the slice of `filtered` shown on the current page.
pub fn paginate<'a, T>(filtered: &'a [T], state: &PaginationState) -> &'a [T] {
    let (start, end) = state.bounds(filtered.len());
    &filtered[start..end]
}

/// "Showing X-Y of N webcams" line under the table.
pub fn showing_summary(state: &PaginationState, filtered_count: usize) -> String {
    let (start, end) = state.bounds(filtered_count);
    if filtered_count == 0 {
        return "Showing 0 of 0 webcams".to_string();
    }
    format!("Showing {}-{} of {} webcams", start + 1, end, filtered_count)
}

/// Serializes the filtered (not paginated) set as UTF-8 CSV with a
/// `title,language,lat,lon` header row.
pub fn export_csv(filtered: &[&WebcamRecord]) -> Result<Vec<u8>, WebcamVizError> {
    let titles: Vec<&str> = filtered.iter().map(|r| r.title.as_str()).collect();
    let languages: Vec<&str> = filtered.iter().map(|r| r.language.as_str()).collect();
    let lats: Vec<f64> = filtered.iter().map(|r| r.latitude).collect();
    let lons: Vec<f64> = filtered.iter().map(|r| r.longitude).collect();

    let mut df = df!(
        "title" => titles,
        "language" => languages,
        "lat" => lats,
        "lon" => lons
    )?;

    let mut buf = Vec::new();
    CsvWriter::new(&mut buf)
        .include_header(true)
        .finish(&mut df)?;
    Ok(buf)
}

/// First record in `filtered` whose title is exactly `title`.
pub fn select_preview<'a>(filtered: &[&'a WebcamRecord], title: &str) -> Option<&'a WebcamRecord> {
    filtered.iter().copied().find(|r| r.title == title)
}
