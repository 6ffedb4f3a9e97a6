use scene::atlas::{AtlasFeature, FeatureAtlas};

use crate::geojson::FeatureDocument;

/// Build the resolver's atlas from a parsed feature document.
///
/// Document order is preserved verbatim; it defines the resolver's
/// first-match priority.
pub fn atlas_from_document(doc: &FeatureDocument) -> FeatureAtlas {
    let features = doc
        .features
        .iter()
        .map(|f| AtlasFeature::new(f.name.clone(), f.polygons.clone()))
        .collect();
    FeatureAtlas::new(features)
}

/// Parse and ingest in one step.
pub fn atlas_from_geojson_str(
    payload: &str,
    name_property: &str,
) -> Result<FeatureAtlas, crate::geojson::FeatureDocumentError> {
    let doc = FeatureDocument::from_geojson_str(payload, name_property)?;
    Ok(atlas_from_document(&doc))
}

#[cfg(test)]
mod tests {
    use super::atlas_from_geojson_str;

    #[test]
    fn ingested_atlas_resolves_in_document_order() {
        let payload = r#"{
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "properties": { "ADMIN": "First" },
                    "geometry": {
                        "type": "Polygon",
                        "coordinates": [[[0.0, 0.0], [10.0, 0.0], [10.0, 10.0], [0.0, 10.0]]]
                    }
                },
                {
                    "type": "Feature",
                    "properties": { "ADMIN": "Second" },
                    "geometry": {
                        "type": "Polygon",
                        "coordinates": [[[5.0, 5.0], [15.0, 5.0], [15.0, 15.0], [5.0, 15.0]]]
                    }
                }
            ]
        }"#;

        let atlas = atlas_from_geojson_str(payload, "ADMIN").expect("atlas");
        assert_eq!(atlas.len(), 2);
        // Overlap region: first document feature wins.
        let hit = atlas.resolve(7.0, 7.0).expect("match");
        assert_eq!(hit.feature.name, "First");
        let hit = atlas.resolve(12.0, 12.0).expect("match");
        assert_eq!(hit.feature.name, "Second");
    }
}
