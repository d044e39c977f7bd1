//! GeoJSON route loader.
//!
//! Reads a FeatureCollection whose Point features describe the route, in
//! feature order. Coordinates follow GeoJSON convention: `[lon, lat]`.
//! Per-point navigation metadata comes from the properties map (`speed`,
//! `elevation`, `duration`, `transition`, `description`); unknown properties
//! and non-Point features are ignored.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::position::{Position, Transition};

use super::{validate, GeneratorError};

#[derive(Deserialize)]
struct RouteFile {
    features: Vec<Feature>,
}

#[derive(Deserialize)]
struct Feature {
    geometry: Geometry,
    #[serde(default)]
    properties: Map<String, Value>,
}

#[derive(Deserialize)]
struct Geometry {
    #[serde(rename = "type")]
    kind: String,
    // Shape depends on the geometry type - only Point's [lon, lat] is read
    #[serde(default)]
    coordinates: Value,
}

pub(crate) fn load(path: &Path) -> Result<Vec<Position>, GeneratorError> {
    let file = File::open(path).map_err(|source| GeneratorError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let invalid = |reason: String| GeneratorError::InvalidRoute {
        path: path.to_path_buf(),
        reason,
    };

    let route: RouteFile =
        serde_json::from_reader(BufReader::new(file)).map_err(|e| invalid(e.to_string()))?;

    let mut positions = Vec::new();
    for feature in &route.features {
        if feature.geometry.kind != "Point" {
            continue;
        }

        let index = positions.len() as u32 + 1;
        let position = parse_feature(feature, index)
            .map_err(|reason| invalid(format!("feature {index}: {reason}")))?;
        validate(&position)
            .map_err(|reason| invalid(format!("feature {index}: {reason}")))?;
        positions.push(position);
    }

    if positions.is_empty() {
        return Err(GeneratorError::EmptyRoute {
            path: path.to_path_buf(),
        });
    }
    Ok(positions)
}

fn parse_feature(feature: &Feature, index: u32) -> Result<Position, String> {
    let coords = feature
        .geometry
        .coordinates
        .as_array()
        .ok_or("point coordinates must be an array")?;
    if coords.len() < 2 {
        return Err(format!("point has {} coordinates, need 2", coords.len()));
    }
    let lon = coords[0].as_f64().ok_or("bad longitude coordinate")?;
    let lat = coords[1].as_f64().ok_or("bad latitude coordinate")?;

    let props = &feature.properties;
    let speed = numeric_property(props, "speed")?.unwrap_or(0.0);
    let elevation = numeric_property(props, "elevation")?.unwrap_or(0.0);
    let duration = numeric_property(props, "duration")?.unwrap_or(0.0);

    let transition = match props.get("transition") {
        None | Some(Value::Null) => Transition::default(),
        Some(Value::String(s)) => s.parse().map_err(|_| format!("bad transition {s:?}"))?,
        Some(other) => return Err(format!("bad transition {other}")),
    };
    let description = match props.get("description") {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => return Err(format!("bad description {other}")),
    };

    Ok(
        Position::new(index, lat, lon, speed, elevation, DateTime::<Utc>::UNIX_EPOCH)
            .with_duration(duration)
            .with_transition(transition)
            .with_description(description),
    )
}

/// Read an optional numeric property, accepting JSON numbers and numeric
/// strings.
fn numeric_property(props: &Map<String, Value>, name: &str) -> Result<Option<f64>, String> {
    match props.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_f64()
            .map(Some)
            .ok_or_else(|| format!("bad {name} {n}")),
        Some(Value::String(s)) => s
            .parse()
            .map(Some)
            .map_err(|_| format!("bad {name} {s:?}")),
        Some(other) => Err(format!("bad {name} {other}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn route_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    const ROUTE: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "geometry": {"type": "Point", "coordinates": [30.3351, 59.9343]},
                "properties": {
                    "speed": 10.0,
                    "elevation": 5.5,
                    "duration": 2.0,
                    "transition": "manual",
                    "description": "Start"
                }
            },
            {
                "type": "Feature",
                "geometry": {"type": "LineString", "coordinates": [[0, 0], [1, 1]]},
                "properties": {}
            },
            {
                "type": "Feature",
                "geometry": {"type": "Point", "coordinates": [30.34, 59.94]},
                "properties": {}
            }
        ]
    }"#;

    #[test]
    fn test_load_points_skipping_other_geometries() {
        let file = route_file(ROUTE);
        let positions = load(file.path()).unwrap();

        assert_eq!(positions.len(), 2, "LineString feature is skipped");

        let first = &positions[0];
        assert_eq!(first.index, 1);
        assert_eq!(first.lat, 59.9343, "lat comes second in GeoJSON");
        assert_eq!(first.lon, 30.3351);
        assert_eq!(first.speed, 10.0);
        assert_eq!(first.duration, 2.0);
        assert_eq!(first.transition, Transition::Manual);
        assert_eq!(first.description, "Start");

        let second = &positions[1];
        assert_eq!(second.index, 2);
        assert_eq!(second.speed, 0.0);
        assert_eq!(second.transition, Transition::Auto);
    }

    #[test]
    fn test_numeric_properties_accept_strings() {
        let file = route_file(
            r#"{"features": [{
                "geometry": {"type": "Point", "coordinates": [1.0, 2.0]},
                "properties": {"speed": "12.5", "duration": "1"}
            }]}"#,
        );
        let positions = load(file.path()).unwrap();
        assert_eq!(positions[0].speed, 12.5);
        assert_eq!(positions[0].duration, 1.0);
    }

    #[test]
    fn test_rejects_missing_features_key() {
        let file = route_file(r#"{"type": "FeatureCollection"}"#);
        assert!(matches!(
            load(file.path()),
            Err(GeneratorError::InvalidRoute { .. })
        ));
    }

    #[test]
    fn test_rejects_non_object_document() {
        let file = route_file("[1, 2, 3]");
        assert!(matches!(
            load(file.path()),
            Err(GeneratorError::InvalidRoute { .. })
        ));
    }

    #[test]
    fn test_rejects_short_coordinates() {
        let file = route_file(
            r#"{"features": [{
                "geometry": {"type": "Point", "coordinates": [1.0]},
                "properties": {}
            }]}"#,
        );
        assert!(load(file.path()).is_err());
    }

    #[test]
    fn test_rejects_route_with_no_points() {
        let file = route_file(r#"{"features": []}"#);
        assert!(matches!(
            load(file.path()),
            Err(GeneratorError::EmptyRoute { .. })
        ));
    }

    #[test]
    fn test_rejects_out_of_range_coordinates() {
        let file = route_file(
            r#"{"features": [{
                "geometry": {"type": "Point", "coordinates": [200.0, 10.0]},
                "properties": {}
            }]}"#,
        );
        let err = load(file.path()).unwrap_err();
        assert!(err.to_string().contains("longitude"));
    }
}
