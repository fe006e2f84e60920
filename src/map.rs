//! Map view: turns normalized webcams into a deck.gl scatterplot description.
//!
//! `templates/map.html` builds its `deck.DeckGL` instance from the serialized
//! [`MapSpec`], so field names follow deck.gl's camelCase props.

use serde::Serialize;

use crate::models::WebcamRecord;

pub const MAP_STYLE: &str = "mapbox://styles/mapbox/light-v9";
pub const DEFAULT_ZOOM: f64 = 8.0;
pub const FILL_COLOR: [u8; 4] = [200, 30, 0, 160];

const TOOLTIP_HTML: &str = "<b>{title}</b><br><img src='{image}' width='200'>";

/// Either a renderable map or the "no data" warning state.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MapView {
    NoData,
    Map(MapSpec),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapSpec {
    pub map_style: &'static str,
    pub layer: ScatterLayer,
    pub initial_view_state: ViewState,
    pub tooltip: Tooltip,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapPoint {
    pub title: String,
    pub image: String,
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScatterLayer {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub id: &'static str,
    pub data: Vec<MapPoint>,
    pub pickable: bool,
    pub opacity: f64,
    pub filled: bool,
    pub radius_scale: f64,
    pub radius_min_pixels: f64,
    pub radius_max_pixels: f64,
    pub line_width_min_pixels: f64,
    pub get_position: &'static str,
    pub get_fill_color: [u8; 4],
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewState {
    pub latitude: f64,
    pub longitude: f64,
    pub zoom: f64,
    pub pitch: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tooltip {
    pub html: &'static str,
    pub style: TooltipStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TooltipStyle {
    pub background_color: &'static str,
    pub color: &'static str,
}

impl ScatterLayer {
    fn webcams(records: &[WebcamRecord]) -> Self {
        Self {
            kind: "ScatterplotLayer",
            id: "webcams",
            data: records
                .iter()
                .map(|r| MapPoint {
                    title: r.title.clone(),
                    image: r.image_url.clone(),
                    lat: r.latitude,
                    lon: r.longitude,
                })
                .collect(),
            pickable: true,
            opacity: 0.8,
            filled: true,
            radius_scale: 50.0,
            radius_min_pixels: 5.0,
            radius_max_pixels: 100.0,
            line_width_min_pixels: 1.0,
            get_position: "[lon, lat]",
            get_fill_color: FILL_COLOR,
        }
    }
}

/// Builds the map for `records`, centered on their mean coordinate.
///
/// An empty set yields [`MapView::NoData`] without computing a mean.
pub fn build_map(records: &[WebcamRecord]) -> MapView {
    if records.is_empty() {
        return MapView::NoData;
    }

    let n = records.len() as f64;
    let latitude = records.iter().map(|r| r.latitude).sum::<f64>() / n;
    let longitude = records.iter().map(|r| r.longitude).sum::<f64>() / n;

    MapView::Map(MapSpec {
        map_style: MAP_STYLE,
        layer: ScatterLayer::webcams(records),
        initial_view_state: ViewState {
            latitude,
            longitude,
            zoom: DEFAULT_ZOOM,
            pitch: 0.0,
        },
        tooltip: Tooltip {
            html: TOOLTIP_HTML,
            style: TooltipStyle {
                background_color: "steelblue",
                color: "white",
            },
        },
    })
}
