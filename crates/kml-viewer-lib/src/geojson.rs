//! GeoJSON decoding into the closed geometry model
//!
//! Decoding only fails on document structure (bad JSON, a top-level value that is not a
//! GeoJSON object, a feature entry that is not an object). Geometry payloads never fail: an
//! unknown tag becomes [`Geometry::Unknown`], a known tag with a wrongly shaped payload becomes
//! [`Geometry::Malformed`], and a `null` or untyped geometry leaves the feature without one.
//! Coordinate arity and finiteness are left for the analysis to judge.
//!
//! Geometries with a known tag go through the `geojson` crate first. It rejects a whole
//! geometry on the first problem (an unknown member tag, a short position), so anything it
//! refuses is walked as a raw JSON value instead and kept as data.

use crate::{Coordinate, DataError, Feature, FeatureCollection, Geometry, GeometryType, Result};
use ::geojson::Geometry as GeoJsonGeometry;
use ::geojson::Value as GeoJsonValue;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::io::Read;

type DecodeResult<T> = std::result::Result<T, String>;

/// Decode a GeoJSON document from text
pub fn from_geojson_str(text: &str) -> Result<FeatureCollection> {
    from_geojson_value(serde_json::from_str(text)?)
}

/// Decode a GeoJSON document from a reader
pub fn from_geojson_reader<R: Read>(reader: R) -> Result<FeatureCollection> {
    from_geojson_value(serde_json::from_reader(reader)?)
}

/// Decode an already parsed GeoJSON value
///
/// Accepts a `FeatureCollection`, a single `Feature`, or a bare geometry object; the latter
/// two become a collection of one feature.
pub fn from_geojson_value(value: Value) -> Result<FeatureCollection> {
    #[cfg(feature = "profiling")]
    profiling::scope!("geojson::from_geojson_value");

    let object = match &value {
        Value::Object(object) => object,
        other => {
            return Err(DataError::NotGeoJson(format!(
                "expected an object, found {}",
                json_kind(other)
            )));
        }
    };

    match object.get("type").and_then(Value::as_str) {
        Some("FeatureCollection") => {
            let features = object
                .get("features")
                .and_then(Value::as_array)
                .ok_or_else(|| {
                    DataError::NotGeoJson("FeatureCollection without a features array".into())
                })?;
            let collection = features
                .iter()
                .enumerate()
                .map(|(index, value)| {
                    value.as_object().map(decode_feature).ok_or_else(|| {
                        DataError::NotGeoJson(format!("feature {index} is not an object"))
                    })
                })
                .collect::<Result<FeatureCollection>>()?;
            tracing::debug!("Decoded {} features", collection.len());
            Ok(collection)
        }
        Some("Feature") => Ok(FeatureCollection::new(vec![decode_feature(object)])),
        Some(_) => Ok(FeatureCollection::new(vec![Feature {
            geometry: decode_geometry(&value),
            name: None,
        }])),
        None => Err(DataError::NotGeoJson("missing \"type\" member".into())),
    }
}

fn decode_feature(object: &Map<String, Value>) -> Feature {
    let geometry = match object.get("geometry") {
        Some(geometry @ Value::Object(_)) => decode_geometry(geometry),
        Some(Value::Null) | None => None,
        Some(other) => {
            tracing::debug!("Ignoring non-object geometry ({})", json_kind(other));
            None
        }
    };
    let name = object
        .get("properties")
        .and_then(|p| p.get("name"))
        .and_then(Value::as_str)
        .map(str::to_string);

    Feature { geometry, name }
}

/// `None` when the value is not an object with a string `type` member
fn decode_geometry(value: &Value) -> Option<Geometry> {
    let object = value.as_object()?;
    let type_tag = object.get("type").and_then(Value::as_str)?;
    let Some(kind) = GeometryType::from_tag(type_tag) else {
        return Some(Geometry::Unknown {
            type_tag: type_tag.to_string(),
        });
    };

    match GeoJsonGeometry::deserialize(value) {
        Ok(geometry) => return Some(from_geojson(geometry.value)),
        Err(err) => tracing::trace!("Walking raw {} geometry: {}", type_tag, err),
    }

    let decoded = if kind == GeometryType::GeometryCollection {
        object
            .get("geometries")
            .ok_or_else(|| "missing geometries".to_string())
            .and_then(|v| decode_list(v, decode_child))
            .map(Geometry::GeometryCollection)
    } else {
        object
            .get("coordinates")
            .ok_or_else(|| "missing coordinates".to_string())
            .and_then(|coordinates| decode_coordinates(kind, coordinates))
    };

    Some(decoded.unwrap_or_else(|reason| {
        tracing::debug!("Malformed {} geometry: {}", type_tag, reason);
        Geometry::Malformed {
            type_tag: type_tag.to_string(),
            reason,
        }
    }))
}

/// Convert a geometry the `geojson` crate accepted
fn from_geojson(value: GeoJsonValue) -> Geometry {
    match value {
        GeoJsonValue::Point(position) => Geometry::Point(Coordinate::new(position)),
        GeoJsonValue::MultiPoint(positions) => Geometry::MultiPoint(to_path(positions)),
        GeoJsonValue::LineString(positions) => Geometry::LineString(to_path(positions)),
        GeoJsonValue::MultiLineString(lines) => {
            Geometry::MultiLineString(lines.into_iter().map(to_path).collect())
        }
        GeoJsonValue::Polygon(rings) => Geometry::Polygon(rings.into_iter().map(to_path).collect()),
        GeoJsonValue::MultiPolygon(polygons) => Geometry::MultiPolygon(
            polygons
                .into_iter()
                .map(|rings| rings.into_iter().map(to_path).collect())
                .collect(),
        ),
        GeoJsonValue::GeometryCollection(children) => Geometry::GeometryCollection(
            children
                .into_iter()
                .map(|child| from_geojson(child.value))
                .collect(),
        ),
    }
}

fn to_path<P: IntoIterator<Item = f64>>(positions: Vec<P>) -> Vec<Coordinate> {
    positions.into_iter().map(Coordinate::new).collect()
}

fn decode_child(value: &Value) -> DecodeResult<Geometry> {
    decode_geometry(value).ok_or_else(|| "collection member is not a typed geometry".to_string())
}

/// Coordinate payload of every type except `GeometryCollection`
fn decode_coordinates(kind: GeometryType, value: &Value) -> DecodeResult<Geometry> {
    Ok(match kind {
        GeometryType::Point => Geometry::Point(decode_coordinate(value)?),
        GeometryType::MultiPoint => Geometry::MultiPoint(decode_path(value)?),
        GeometryType::LineString => Geometry::LineString(decode_path(value)?),
        GeometryType::MultiLineString => Geometry::MultiLineString(decode_list(value, decode_path)?),
        GeometryType::Polygon => Geometry::Polygon(decode_list(value, decode_path)?),
        GeometryType::MultiPolygon => {
            Geometry::MultiPolygon(decode_list(value, |v| decode_list(v, decode_path))?)
        }
        GeometryType::GeometryCollection => {
            return Err("geometry collections carry no coordinates".to_string());
        }
    })
}

fn decode_path(value: &Value) -> DecodeResult<Vec<Coordinate>> {
    decode_list(value, decode_coordinate)
}

fn decode_coordinate(value: &Value) -> DecodeResult<Coordinate> {
    let members = value
        .as_array()
        .ok_or_else(|| format!("expected a position array, found {}", json_kind(value)))?;
    members
        .iter()
        .map(|m| {
            m.as_f64()
                .ok_or_else(|| format!("expected a number in position, found {}", json_kind(m)))
        })
        .collect::<DecodeResult<Vec<f64>>>()
        .map(Coordinate::new)
}

fn decode_list<T>(value: &Value, item: impl Fn(&Value) -> DecodeResult<T>) -> DecodeResult<Vec<T>> {
    value
        .as_array()
        .ok_or_else(|| format!("expected an array, found {}", json_kind(value)))?
        .iter()
        .map(item)
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Config, NULL_TYPE_TAG, measure_lengths, summarize};

    const TRAILS: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": { "name": "Ridge walk" },
                "geometry": {
                    "type": "LineString",
                    "coordinates": [[0.0, 0.0, 120.0], [0.0, 1.0, 130.0]]
                }
            },
            {
                "type": "Feature",
                "properties": {},
                "geometry": { "type": "Point", "coordinates": [78.0, 20.0] }
            },
            {
                "type": "Feature",
                "properties": null,
                "geometry": {
                    "type": "GeometryCollection",
                    "geometries": [
                        { "type": "Point", "coordinates": [1.0, 2.0] },
                        { "type": "LineString", "coordinates": [[1.0, 2.0], [3.0, 4.0]] }
                    ]
                }
            },
            { "type": "Feature", "properties": {}, "geometry": null }
        ]
    }"#;

    #[test]
    fn test_decode_feature_collection() {
        let collection = from_geojson_str(TRAILS).unwrap();
        assert_eq!(collection.len(), 4);

        let first = &collection.features()[0];
        assert_eq!(first.name.as_deref(), Some("Ridge walk"));
        assert_eq!(
            first.geometry,
            Some(Geometry::LineString(vec![
                Coordinate::xyz(0.0, 0.0, 120.0),
                Coordinate::xyz(0.0, 1.0, 130.0),
            ]))
        );
        assert!(matches!(
            collection.features()[2].geometry,
            Some(Geometry::GeometryCollection(ref children)) if children.len() == 2
        ));
        assert_eq!(collection.features()[3].geometry, None);
    }

    #[test]
    fn test_decoded_collection_analysis() {
        let collection = from_geojson_str(TRAILS).unwrap();

        let summary = summarize(&collection);
        assert_eq!(summary.get("LineString"), Some(1));
        assert_eq!(summary.get("GeometryCollection"), Some(1));
        assert_eq!(summary.get(NULL_TYPE_TAG), Some(1));
        assert_eq!(summary.total(), 4);

        let report = measure_lengths(&collection, &Config::default()).unwrap();
        assert_eq!(report.records.len(), 1);
        assert!((report.records[0].length - 111_195.08).abs() < 1.0);
        // The null geometry cannot be classified and is reported, not measured
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].index, 3);
    }

    #[test]
    fn test_unknown_and_malformed_geometries() {
        let text = r#"{
            "type": "FeatureCollection",
            "features": [
                { "type": "Feature", "geometry": { "type": "Circle", "radius": 3 } },
                { "type": "Feature", "geometry": { "type": "LineString", "coordinates": 7 } },
                { "type": "Feature", "geometry": { "type": "LineString", "coordinates": [[0, "a"]] } },
                { "type": "Feature", "geometry": { "coordinates": [0, 0] } },
                { "type": "Feature", "geometry": { "type": "Polygon" } }
            ]
        }"#;
        let collection = from_geojson_str(text).unwrap();
        let geometries: Vec<_> = collection.iter().map(|f| f.geometry.clone()).collect();

        assert_eq!(
            geometries[0],
            Some(Geometry::Unknown {
                type_tag: "Circle".to_string()
            })
        );
        assert!(matches!(
            &geometries[1],
            Some(Geometry::Malformed { type_tag, .. }) if type_tag == "LineString"
        ));
        assert!(matches!(&geometries[2], Some(Geometry::Malformed { .. })));
        assert_eq!(geometries[3], None);
        assert!(matches!(
            &geometries[4],
            Some(Geometry::Malformed { reason, .. }) if reason == "missing coordinates"
        ));
    }

    #[test]
    fn test_unknown_tags_are_kept_where_geojson_crate_refuses() {
        let circle = serde_json::json!({ "type": "Circle", "coordinates": [0.0, 0.0] });
        assert!(GeoJsonGeometry::deserialize(&circle).is_err());
        assert_eq!(
            decode_geometry(&circle),
            Some(Geometry::Unknown {
                type_tag: "Circle".to_string()
            })
        );

        // One unknown member makes the crate reject the whole collection
        let mixed = serde_json::json!({
            "type": "GeometryCollection",
            "geometries": [
                { "type": "Circle", "radius": 3 },
                { "type": "LineString", "coordinates": [[0.0, 0.0], [0.0, 1.0]] }
            ]
        });
        assert!(GeoJsonGeometry::deserialize(&mixed).is_err());
        assert_eq!(
            decode_geometry(&mixed),
            Some(Geometry::GeometryCollection(vec![
                Geometry::Unknown {
                    type_tag: "Circle".to_string()
                },
                Geometry::LineString(vec![Coordinate::xy(0.0, 0.0), Coordinate::xy(0.0, 1.0)]),
            ]))
        );
    }

    #[test]
    fn test_well_formed_geometries_match_crate_decoding() {
        let polygon = serde_json::json!({
            "type": "MultiPolygon",
            "coordinates": [[[[0, 0], [1, 0], [1, 1], [0, 0]]]]
        });
        assert!(GeoJsonGeometry::deserialize(&polygon).is_ok());
        assert_eq!(
            decode_geometry(&polygon),
            Some(Geometry::MultiPolygon(vec![vec![vec![
                Coordinate::xy(0.0, 0.0),
                Coordinate::xy(1.0, 0.0),
                Coordinate::xy(1.0, 1.0),
                Coordinate::xy(0.0, 0.0),
            ]]]))
        );
    }

    #[test]
    fn test_wrong_arity_is_kept_for_analysis() {
        let text = r#"{ "type": "LineString", "coordinates": [[0.0], [1.0, 1.0]] }"#;
        let collection = from_geojson_str(text).unwrap();
        assert_eq!(
            collection.features()[0].geometry,
            Some(Geometry::LineString(vec![
                Coordinate::new([0.0]),
                Coordinate::xy(1.0, 1.0),
            ]))
        );
    }

    #[test]
    fn test_single_feature_and_bare_geometry() {
        let feature = r#"{ "type": "Feature", "properties": { "name": "Hut" },
                           "geometry": { "type": "Point", "coordinates": [7.0, 46.0] } }"#;
        let collection = from_geojson_str(feature).unwrap();
        assert_eq!(collection.len(), 1);
        assert_eq!(collection.features()[0].name.as_deref(), Some("Hut"));

        let bare = r#"{ "type": "MultiLineString", "coordinates": [] }"#;
        let collection = from_geojson_reader(bare.as_bytes()).unwrap();
        assert_eq!(
            collection.features()[0].geometry,
            Some(Geometry::MultiLineString(vec![]))
        );
    }

    #[test]
    fn test_structural_errors() {
        assert!(matches!(
            from_geojson_str("not json"),
            Err(DataError::Json(_))
        ));
        assert!(matches!(
            from_geojson_str("[1, 2]"),
            Err(DataError::NotGeoJson(_))
        ));
        assert!(matches!(
            from_geojson_str(r#"{ "features": [] }"#),
            Err(DataError::NotGeoJson(_))
        ));
        assert!(matches!(
            from_geojson_str(r#"{ "type": "FeatureCollection" }"#),
            Err(DataError::NotGeoJson(_))
        ));
        assert!(matches!(
            from_geojson_str(r#"{ "type": "FeatureCollection", "features": [3] }"#),
            Err(DataError::NotGeoJson(msg)) if msg == "feature 0 is not an object"
        ));
    }

    #[test]
    fn test_empty_collection_is_not_an_error() {
        let collection = from_geojson_str(r#"{ "type": "FeatureCollection", "features": [] }"#)
            .unwrap();
        assert!(collection.is_empty());
    }
}
