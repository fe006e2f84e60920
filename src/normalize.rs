//! Flattens raw API entries into [`WebcamRecord`]s.

use serde_json::Value;

use crate::models::{RawWebcamEntry, WebcamRecord};

/// Title used when an entry carries no `Shortname`.
pub const UNNAMED_TITLE: &str = "Unnamed Webcam";
/// Language used when an entry carries no usable `Detail`.
pub const UNKNOWN_LANGUAGE: &str = "unknown";

/// Normalizes raw entries, keeping input order and dropping every entry that
/// lacks a coordinate pair or an image URL.
pub fn normalize(entries: &[RawWebcamEntry]) -> Vec<WebcamRecord> {
    entries.iter().filter_map(normalize_entry).collect()
}

/// Returns `None` for partial entries; they are excluded, not defaulted.
pub fn normalize_entry(entry: &RawWebcamEntry) -> Option<WebcamRecord> {
    let position = entry.gps_info.as_deref()?.first()?;
    let latitude = position.latitude.filter(|v| v.is_finite())?;
    let longitude = position.longitude.filter(|v| v.is_finite())?;

    let image_url = entry
        .image_gallery
        .as_deref()?
        .first()?
        .image_url
        .as_deref()
        .map(str::trim)
        .filter(|url| !url.is_empty())?;

    Some(WebcamRecord {
        title: entry
            .shortname
            .clone()
            .unwrap_or_else(|| UNNAMED_TITLE.to_string()),
        language: first_language(entry).unwrap_or(UNKNOWN_LANGUAGE).to_string(),
        latitude,
        longitude,
        image_url: image_url.to_string(),
    })
}

/// Language of the first `Detail` value in the order the API sent them.
fn first_language(entry: &RawWebcamEntry) -> Option<&str> {
    entry
        .detail
        .as_ref()?
        .values()
        .next()?
        .get("Language")
        .and_then(Value::as_str)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GalleryImage, GpsPosition};
    use serde_json::json;

    fn entry(title: &str, lat: Option<f64>, lon: Option<f64>, url: Option<&str>) -> RawWebcamEntry {
        RawWebcamEntry {
            shortname: Some(title.to_string()),
            gps_info: Some(vec![GpsPosition {
                latitude: lat,
                longitude: lon,
            }]),
            image_gallery: Some(vec![GalleryImage {
                image_url: url.map(str::to_string),
            }]),
            detail: json!({"de": {"Language": "de"}}).as_object().cloned(),
        }
    }

    #[test]
    fn test_valid_entry_is_flattened() {
        let records = normalize(&[entry("Alpe A", Some(46.5), Some(11.3), Some("http://x/a.jpg"))]);

        assert_eq!(
            records,
            vec![WebcamRecord {
                title: "Alpe A".into(),
                language: "de".into(),
                latitude: 46.5,
                longitude: 11.3,
                image_url: "http://x/a.jpg".into(),
            }]
        );
    }

    #[test]
    fn test_missing_gps_is_dropped() {
        let mut e = entry("Alpe B", Some(46.5), Some(11.3), Some("http://x/b.jpg"));
        e.gps_info = None;
        assert!(normalize(&[e.clone()]).is_empty());

        e.gps_info = Some(vec![]);
        assert!(normalize(&[e]).is_empty());
    }

    #[test]
    fn test_gps_with_empty_gallery_is_dropped() {
        let mut e = entry("Alpe C", Some(46.5), Some(11.3), Some("http://x/c.jpg"));
        e.image_gallery = Some(vec![]);
        assert!(normalize(&[e]).is_empty());
    }

    #[test]
    fn test_missing_coordinate_or_url_is_dropped() {
        let entries = vec![
            entry("no lat", None, Some(11.3), Some("http://x/1.jpg")),
            entry("no lon", Some(46.5), None, Some("http://x/2.jpg")),
            entry("no url", Some(46.5), Some(11.3), None),
            entry("blank url", Some(46.5), Some(11.3), Some("  ")),
        ];
        assert!(normalize(&entries).is_empty());
    }

    #[test]
    fn test_zero_coordinate_is_kept() {
        let records = normalize(&[entry("Null Island", Some(0.0), Some(0.0), Some("http://x/0.jpg"))]);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].latitude, 0.0);
    }

    #[test]
    fn test_placeholders_for_title_and_language() {
        let mut e = entry("ignored", Some(46.5), Some(11.3), Some("http://x/a.jpg"));
        e.shortname = None;
        e.detail = None;

        let record = normalize_entry(&e).unwrap();
        assert_eq!(record.title, UNNAMED_TITLE);
        assert_eq!(record.language, UNKNOWN_LANGUAGE);
    }

    #[test]
    fn test_language_is_first_detail_in_source_order() {
        let mut e = entry("Multi", Some(46.5), Some(11.3), Some("http://x/m.jpg"));
        e.detail = json!({"it": {"Language": "it"}, "de": {"Language": "de"}})
            .as_object()
            .cloned();
        assert_eq!(normalize_entry(&e).unwrap().language, "it");

        e.detail = json!({"en": {}, "de": {"Language": "de"}}).as_object().cloned();
        assert_eq!(normalize_entry(&e).unwrap().language, UNKNOWN_LANGUAGE);
    }

    #[test]
    fn test_preserves_order_and_never_grows() {
        let entries = vec![
            entry("first", Some(1.0), Some(1.0), Some("http://x/1.jpg")),
            entry("dropped", None, None, None),
            entry("second", Some(2.0), Some(2.0), Some("http://x/2.jpg")),
        ];
        let records = normalize(&entries);
        let titles: Vec<_> = records.iter().map(|r| r.title.as_str()).collect();

        assert_eq!(titles, ["first", "second"]);
        assert!(records.len() <= entries.len());
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let entries = vec![
            entry("a", Some(1.0), Some(2.0), Some("http://x/a.jpg")),
            entry("b", None, Some(2.0), Some("http://x/b.jpg")),
        ];
        assert_eq!(normalize(&entries), normalize(&entries));
    }
}
