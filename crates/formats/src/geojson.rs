use serde_json::Value;

/// A parsed feature: a display name plus polygon geometry.
///
/// Geometry is kept as (lon, lat) degree pairs, polygons → rings → points,
/// exactly as they appeared in the source document.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoFeature {
    pub name: String,
    pub polygons: Vec<Vec<Vec<(f64, f64)>>>,
}

/// An ordered feature document parsed from GeoJSON.
///
/// Only named `Polygon`/`MultiPolygon` features survive parsing; other
/// geometry types and nameless features are skipped silently rather than
/// aborting their siblings. Document order is preserved because the
/// resolver's overlap priority is first-match-by-order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureDocument {
    pub features: Vec<GeoFeature>,
}

#[derive(Debug)]
pub enum FeatureDocumentError {
    NotAFeatureCollection,
    InvalidFeature { index: usize, reason: String },
}

impl std::fmt::Display for FeatureDocumentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeatureDocumentError::NotAFeatureCollection => {
                write!(f, "expected GeoJSON FeatureCollection")
            }
            FeatureDocumentError::InvalidFeature { index, reason } => {
                write!(f, "invalid feature at index {index}: {reason}")
            }
        }
    }
}

impl std::error::Error for FeatureDocumentError {}

impl FeatureDocument {
    /// Parse a GeoJSON FeatureCollection, taking each feature's name from
    /// `name_property` (e.g. `"ADMIN"` for the country set, `"name"` for
    /// the region set).
    pub fn from_geojson_str(
        payload: &str,
        name_property: &str,
    ) -> Result<Self, FeatureDocumentError> {
        let value: Value =
            serde_json::from_str(payload).map_err(|e| FeatureDocumentError::InvalidFeature {
                index: 0,
                reason: format!("JSON parse error: {e}"),
            })?;
        Self::from_geojson_value(&value, name_property)
    }

    pub fn from_geojson_value(
        value: &Value,
        name_property: &str,
    ) -> Result<Self, FeatureDocumentError> {
        let obj = value
            .as_object()
            .ok_or(FeatureDocumentError::NotAFeatureCollection)?;
        let ty = obj
            .get("type")
            .and_then(|v| v.as_str())
            .ok_or(FeatureDocumentError::NotAFeatureCollection)?;
        if ty != "FeatureCollection" {
            return Err(FeatureDocumentError::NotAFeatureCollection);
        }

        let features_val = obj
            .get("features")
            .and_then(|v| v.as_array())
            .ok_or(FeatureDocumentError::NotAFeatureCollection)?;

        let mut features = Vec::with_capacity(features_val.len());
        for (index, feat_val) in features_val.iter().enumerate() {
            let feat_obj = feat_val
                .as_object()
                .ok_or_else(|| FeatureDocumentError::InvalidFeature {
                    index,
                    reason: "feature must be an object".to_string(),
                })?;

            let Some(name) = feat_obj
                .get("properties")
                .and_then(|p| p.as_object())
                .and_then(|p| p.get(name_property))
                .and_then(|n| n.as_str())
            else {
                // Nameless features cannot be hovered; skip.
                continue;
            };

            let Some(geometry_val) = feat_obj.get("geometry") else {
                continue;
            };

            let polygons = match parse_polygon_geometry(geometry_val) {
                Ok(Some(polygons)) => polygons,
                // Unsupported geometry type: skip, keep siblings.
                Ok(None) => continue,
                Err(reason) => {
                    return Err(FeatureDocumentError::InvalidFeature { index, reason });
                }
            };

            features.push(GeoFeature {
                name: name.to_string(),
                polygons,
            });
        }

        Ok(Self { features })
    }
}

/// Returns `Ok(None)` for geometry types this pipeline does not render.
fn parse_polygon_geometry(value: &Value) -> Result<Option<Vec<Vec<Vec<(f64, f64)>>>>, String> {
    let obj = value
        .as_object()
        .ok_or_else(|| "geometry must be an object".to_string())?;
    let ty = obj
        .get("type")
        .and_then(|v| v.as_str())
        .ok_or_else(|| "geometry missing type".to_string())?;

    let coords = obj
        .get("coordinates")
        .ok_or_else(|| "geometry missing coordinates".to_string())?;

    match ty {
        "Polygon" => Ok(Some(vec![parse_polygon(coords)?])),
        "MultiPolygon" => Ok(Some(parse_multi_polygon(coords)?)),
        _ => Ok(None),
    }
}

fn parse_point(coords: &Value) -> Result<(f64, f64), String> {
    let arr = coords
        .as_array()
        .ok_or_else(|| "position must be an array".to_string())?;
    if arr.len() < 2 {
        return Err("position must have [lon, lat]".to_string());
    }
    let lon = arr[0]
        .as_f64()
        .ok_or_else(|| "lon must be a number".to_string())?;
    let lat = arr[1]
        .as_f64()
        .ok_or_else(|| "lat must be a number".to_string())?;
    Ok((lon, lat))
}

fn parse_ring(coords: &Value) -> Result<Vec<(f64, f64)>, String> {
    let arr = coords
        .as_array()
        .ok_or_else(|| "ring must be an array".to_string())?;
    let mut out = Vec::with_capacity(arr.len());
    for item in arr {
        out.push(parse_point(item)?);
    }
    Ok(out)
}

fn parse_polygon(coords: &Value) -> Result<Vec<Vec<(f64, f64)>>, String> {
    let rings = coords
        .as_array()
        .ok_or_else(|| "Polygon coordinates must be an array of rings".to_string())?;
    let mut out = Vec::with_capacity(rings.len());
    for ring in rings {
        out.push(parse_ring(ring)?);
    }
    Ok(out)
}

fn parse_multi_polygon(coords: &Value) -> Result<Vec<Vec<Vec<(f64, f64)>>>, String> {
    let polys = coords
        .as_array()
        .ok_or_else(|| "MultiPolygon coordinates must be an array of polygons".to_string())?;
    let mut out = Vec::with_capacity(polys.len());
    for poly in polys {
        out.push(parse_polygon(poly)?);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::{FeatureDocument, FeatureDocumentError};
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": { "ADMIN": "Korea" },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[126.0, 34.0], [130.0, 34.0], [130.0, 39.0], [126.0, 39.0]]]
                }
            },
            {
                "type": "Feature",
                "properties": { "ADMIN": "Archipelago" },
                "geometry": {
                    "type": "MultiPolygon",
                    "coordinates": [
                        [[[0.0, 0.0], [2.0, 0.0], [2.0, 2.0], [0.0, 2.0]]],
                        [[[10.0, 0.0], [12.0, 0.0], [12.0, 2.0], [10.0, 2.0], [11.0, 1.0]]]
                    ]
                }
            }
        ]
    }"#;

    #[test]
    fn parses_named_polygon_features_in_order() {
        let doc = FeatureDocument::from_geojson_str(SAMPLE, "ADMIN").expect("parse");
        assert_eq!(doc.features.len(), 2);
        assert_eq!(doc.features[0].name, "Korea");
        assert_eq!(doc.features[1].name, "Archipelago");
        assert_eq!(doc.features[1].polygons.len(), 2);
        assert_eq!(doc.features[1].polygons[1][0].len(), 5);
    }

    #[test]
    fn skips_unsupported_geometry_and_nameless_features() {
        let payload = r#"{
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "properties": { "ADMIN": "City" },
                    "geometry": { "type": "Point", "coordinates": [127.0, 37.5] }
                },
                {
                    "type": "Feature",
                    "properties": { "other": "no name here" },
                    "geometry": {
                        "type": "Polygon",
                        "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0]]]
                    }
                },
                {
                    "type": "Feature",
                    "properties": { "ADMIN": "Kept" },
                    "geometry": {
                        "type": "Polygon",
                        "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0]]]
                    }
                }
            ]
        }"#;
        let doc = FeatureDocument::from_geojson_str(payload, "ADMIN").expect("parse");
        assert_eq!(doc.features.len(), 1);
        assert_eq!(doc.features[0].name, "Kept");
    }

    #[test]
    fn rejects_non_feature_collections() {
        let err = FeatureDocument::from_geojson_str(r#"{"type": "Feature"}"#, "ADMIN")
            .expect_err("should fail");
        assert!(matches!(err, FeatureDocumentError::NotAFeatureCollection));
    }

    #[test]
    fn reports_malformed_coordinates_with_the_feature_index() {
        let payload = r#"{
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "properties": { "ADMIN": "Broken" },
                    "geometry": { "type": "Polygon", "coordinates": [[["x", 0.0]]] }
                }
            ]
        }"#;
        let err = FeatureDocument::from_geojson_str(payload, "ADMIN").expect_err("should fail");
        match err {
            FeatureDocumentError::InvalidFeature { index, .. } => assert_eq!(index, 0),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn name_property_is_configurable() {
        let payload = r#"{
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "properties": { "name": "South Jeolla" },
                    "geometry": {
                        "type": "Polygon",
                        "coordinates": [[[126.0, 34.0], [128.0, 34.0], [128.0, 36.0], [126.0, 36.0]]]
                    }
                }
            ]
        }"#;
        let doc = FeatureDocument::from_geojson_str(payload, "name").expect("parse");
        assert_eq!(doc.features[0].name, "South Jeolla");
    }
}
