//! Data models for webcam data structures.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Top-level wrapper for Open Data Hub list responses.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct TourismResponse<T> {
    #[serde(rename = "Items", default)]
    pub items: Vec<T>,
}

/// A single webcam as returned by the tourism API.
///
/// Nothing here is guaranteed: every field may be missing, `null` or empty,
/// and any other fields in the payload are ignored.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct RawWebcamEntry {
    #[serde(rename = "Shortname", default)]
    pub shortname: Option<String>,
    #[serde(rename = "GpsInfo", default)]
    pub gps_info: Option<Vec<GpsPosition>>,
    #[serde(rename = "ImageGallery", default)]
    pub image_gallery: Option<Vec<GalleryImage>>,
    /// Per-language details keyed by language code, in the order the API sent them.
    #[serde(rename = "Detail", default)]
    pub detail: Option<Map<String, Value>>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct GpsPosition {
    #[serde(rename = "Latitude", default)]
    pub latitude: Option<f64>,
    #[serde(rename = "Longitude", default)]
    pub longitude: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct GalleryImage {
    #[serde(rename = "ImageUrl", default)]
    pub image_url: Option<String>,
}

/// A validated, flattened webcam shared by the table and the map.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WebcamRecord {
    pub title: String,
    pub language: String,
    pub latitude: f64,
    pub longitude: f64,
    pub image_url: String,
}
