use serde::{Deserialize, Serialize};

/// Marker sub-object of a location result, as it appears in the bundled JSON.
/// Every field is optional on the wire; eligibility is decided afterwards.
/// Only `lat`/`lng` can make an entry unreadable, the text fields accept any
/// JSON type.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MarkerData {
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub pin: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LocationResult {
    #[serde(default)]
    pub marker: Option<MarkerData>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub name: Option<String>,
}

/// A location that can be placed on the map.
#[derive(Debug, Clone, PartialEq)]
pub struct PointRecord {
    pub id: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub annotation: Option<String>,
}

#[derive(Deserialize)]
struct ResultsFile {
    #[serde(default)]
    results: Vec<serde_json::Value>,
}

/// A coordinate counts only if present, non-zero and not NaN.
pub fn is_truthy_coord(value: Option<f64>) -> bool {
    matches!(value, Some(v) if v != 0.0 && !v.is_nan())
}

impl MarkerData {
    /// Shared eligibility predicate for marker construction and counting.
    pub fn is_eligible(&self) -> bool {
        is_truthy_coord(self.lat) && is_truthy_coord(self.lng)
    }

    /// Convert into a `PointRecord` if eligible.
    pub fn to_point(&self) -> Option<PointRecord> {
        if !self.is_eligible() {
            return None;
        }
        Some(PointRecord {
            id: self.id.clone(),
            name: self.name.clone(),
            latitude: self.lat?,
            longitude: self.lng?,
            annotation: self.pin.clone(),
        })
    }
}

impl LocationResult {
    pub fn eligible_marker(&self) -> Option<&MarkerData> {
        self.marker.as_ref().filter(|m| m.is_eligible())
    }
}

/// Parse the `{"results": [...]}` document.
///
/// The envelope must be a JSON object; entries that don't deserialize as a
/// `LocationResult` are dropped without error.
pub fn parse_results(json: &str) -> Result<Vec<LocationResult>, String> {
    let file: ResultsFile =
        serde_json::from_str(json).map_err(|e| format!("Failed to parse locations: {}", e))?;
    let total = file.results.len();
    let results: Vec<LocationResult> = file
        .results
        .into_iter()
        .filter_map(|v| serde_json::from_value(v).ok())
        .collect();
    if results.len() < total {
        tracing::debug!(
            dropped = total - results.len(),
            "Skipped malformed location entries"
        );
    }
    Ok(results)
}

/// Eligible points in source order.
pub fn eligible_points(results: &[LocationResult]) -> Vec<PointRecord> {
    results
        .iter()
        .filter_map(|r| r.eligible_marker())
        .filter_map(MarkerData::to_point)
        .collect()
}

/// Number of eligible points, for display.
pub fn eligible_count(results: &[LocationResult]) -> usize {
    results.iter().filter(|r| r.eligible_marker().is_some()).count()
}

/// Strings pass through, numbers and booleans are stringified, anything
/// else reads as absent.
fn lenient_opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    })
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    lenient_opt_string(deserializer).map(Option::unwrap_or_default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn result(lat: Option<f64>, lng: Option<f64>, name: &str) -> LocationResult {
        LocationResult {
            marker: Some(MarkerData {
                lat,
                lng,
                name: name.to_string(),
                id: name.to_string(),
                pin: None,
            }),
            name: Some(name.to_string()),
        }
    }

    #[test]
    fn test_truthy_coord() {
        assert!(is_truthy_coord(Some(33.8)));
        assert!(is_truthy_coord(Some(-117.9)));
        assert!(!is_truthy_coord(Some(0.0)));
        assert!(!is_truthy_coord(Some(-0.0)));
        assert!(!is_truthy_coord(Some(f64::NAN)));
        assert!(!is_truthy_coord(None));
    }

    #[test]
    fn test_parse_results_scenario() {
        let json = r#"{"results": [
            {"marker": {"lat": 10, "lng": 20, "name": "A", "id": "1"}},
            {"marker": {"lat": 30, "lng": 40, "name": "B", "id": "2"}}
        ]}"#;
        let results = parse_results(json).unwrap();
        let points = eligible_points(&results);
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].name, "A");
        assert_eq!(points[0].id, "1");
        assert!((points[1].latitude - 30.0).abs() < 1e-9);
        assert!((points[1].longitude - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_parse_results_filters_ineligible() {
        let json = r#"{"results": [
            {"name": "No marker"},
            {"marker": null},
            {"marker": {"lat": 0, "lng": 20, "name": "Zero lat", "id": "z"}},
            {"marker": {"lat": 10, "lng": null, "name": "Null lng", "id": "n"}},
            {"marker": {"lng": 5, "name": "Missing lat", "id": "m"}},
            {"marker": {"lat": 33.81, "lng": -117.92, "name": "Good", "id": "g", "pin": "Entrance"}}
        ]}"#;
        let results = parse_results(json).unwrap();
        assert_eq!(results.len(), 6);
        let points = eligible_points(&results);
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].name, "Good");
        assert_eq!(points[0].annotation.as_deref(), Some("Entrance"));
        assert_eq!(eligible_count(&results), 1);
    }

    #[test]
    fn test_parse_results_drops_malformed_entries() {
        let json = r#"{"results": [
            {"marker": {"lat": "north", "lng": 20, "name": "Bad", "id": "b"}},
            42,
            {"marker": {"lat": 1.5, "lng": 2.5, "name": "Ok", "id": 7}}
        ]}"#;
        let results = parse_results(json).unwrap();
        assert_eq!(results.len(), 1);
        let points = eligible_points(&results);
        assert_eq!(points[0].id, "7");
    }

    #[test]
    fn test_parse_results_keeps_entries_with_odd_text_fields() {
        let json = r#"{"results": [
            {"marker": {"lat": 10, "lng": 20, "name": null, "id": "1"}},
            {"name": 5, "marker": {"lat": 30, "lng": 40, "name": "B", "id": "2"}},
            {"marker": {"lat": 50, "lng": 60, "name": "C", "id": "3", "pin": 7}}
        ]}"#;
        let results = parse_results(json).unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(results[1].name.as_deref(), Some("5"));
        let points = eligible_points(&results);
        assert_eq!(points.len(), 3);
        assert_eq!(eligible_count(&results), 3);
        assert_eq!(points[0].name, "");
        assert_eq!(points[2].annotation.as_deref(), Some("7"));
    }

    #[test]
    fn test_parse_results_missing_key_is_empty() {
        let results = parse_results("{}").unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_parse_results_rejects_non_object() {
        assert!(parse_results("[1, 2, 3]").is_err());
        assert!(parse_results("not json").is_err());
    }

    #[test]
    fn test_empty_results() {
        let results = parse_results(r#"{"results": []}"#).unwrap();
        assert!(eligible_points(&results).is_empty());
        assert_eq!(eligible_count(&results), 0);
    }

    proptest! {
        #[test]
        fn prop_points_are_exactly_the_eligible_subset(
            entries in prop::collection::vec(
                (
                    prop::option::of(prop_oneof![Just(0.0f64), -90.0f64..90.0]),
                    prop::option::of(prop_oneof![Just(0.0f64), -180.0f64..180.0]),
                ),
                0..48,
            )
        ) {
            let results: Vec<_> = entries
                .iter()
                .enumerate()
                .map(|(i, &(lat, lng))| result(lat, lng, &i.to_string()))
                .collect();
            let points = eligible_points(&results);
            let expected: Vec<String> = entries
                .iter()
                .enumerate()
                .filter(|(_, e)| is_truthy_coord(e.0) && is_truthy_coord(e.1))
                .map(|(i, _)| i.to_string())
                .collect();
            let got: Vec<String> = points.iter().map(|p| p.id.clone()).collect();
            prop_assert_eq!(&got, &expected);
            prop_assert_eq!(eligible_count(&results), expected.len());
        }
    }
}
