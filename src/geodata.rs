//! Overlay input data and GeoJSON border documents
//!
//! The host feeds beam markers as `{ "value": [lon, lat, weight] }`, flight
//! lines as `{ "coords": [[lon, lat], [lon, lat]] }`, and border layers as
//! GeoJSON FeatureCollections of Polygon/MultiPolygon features. Parsing is
//! strict: a malformed document fails the load with an error for the caller
//! to log and the layer is omitted, never patched up.

use anyhow::Context;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// One beam marker: `[lon, lat, weight]`.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct BeamPoint {
    pub value: [f32; 3],
}

impl BeamPoint {
    pub fn lon(&self) -> f32 {
        self.value[0]
    }

    pub fn lat(&self) -> f32 {
        self.value[1]
    }

    pub fn weight(&self) -> f32 {
        self.value[2]
    }
}

/// One flight line between two geographic endpoints.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct FlightLine {
    pub coords: [[f32; 2]; 2],
}

impl FlightLine {
    pub fn start(&self) -> (f32, f32) {
        (self.coords[0][0], self.coords[0][1])
    }

    pub fn end(&self) -> (f32, f32) {
        (self.coords[1][0], self.coords[1][1])
    }
}

/// GeoJSON FeatureCollection, reduced to the geometry kinds the dashboard
/// draws.
#[derive(Debug, Clone, Deserialize)]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Feature {
    #[serde(default)]
    pub properties: FeatureProperties,
    pub geometry: Geometry,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FeatureProperties {
    pub name: String,
    pub center: Option<Vec<f32>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Polygon { coordinates: Vec<Vec<[f32; 2]>> },
    MultiPolygon { coordinates: Vec<Vec<Vec<[f32; 2]>>> },
}

impl FeatureCollection {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading geojson {}", path.display()))?;
        let collection: Self = serde_json::from_str(&text)
            .with_context(|| format!("parsing geojson {}", path.display()))?;
        Ok(collection)
    }
}

impl Feature {
    /// All linear rings of the feature, outer and inner alike; every ring is
    /// stroked and (on the flat map) extruded.
    pub fn rings(&self) -> Vec<&[[f32; 2]]> {
        match &self.geometry {
            Geometry::Polygon { coordinates } => {
                coordinates.iter().map(|ring| ring.as_slice()).collect()
            }
            Geometry::MultiPolygon { coordinates } => coordinates
                .iter()
                .flat_map(|polygon| polygon.iter().map(|ring| ring.as_slice()))
                .collect(),
        }
    }

    /// Validated label anchor. `None` when the property is absent,
    /// malformed, or non-finite; the label sub-feature is then omitted.
    pub fn center(&self) -> Option<(f32, f32)> {
        let center = self.properties.center.as_ref()?;
        if center.len() < 2 {
            return None;
        }
        let (lon, lat) = (center[0], center[1]);
        if !lon.is_finite() || !lat.is_finite() {
            return None;
        }
        Some((lon, lat))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r##"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": { "name": "Alpha", "center": [3.0, 1.0] },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[0.0, 0.0], [6.0, 0.0], [6.0, 3.0], [0.0, 3.0], [0.0, 0.0]]]
                }
            },
            {
                "type": "Feature",
                "properties": { "name": "Beta" },
                "geometry": {
                    "type": "MultiPolygon",
                    "coordinates": [
                        [[[10.0, 0.0], [12.0, 0.0], [11.0, 2.0], [10.0, 0.0]]],
                        [[[20.0, 0.0], [22.0, 0.0], [21.0, 2.0], [20.0, 0.0]]]
                    ]
                }
            }
        ]
    }"##;

    #[test]
    fn test_parse_feature_collection() {
        let fc: FeatureCollection = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(fc.features.len(), 2);
        assert_eq!(fc.features[0].properties.name, "Alpha");
    }

    #[test]
    fn test_rings_flatten_multipolygons() {
        let fc: FeatureCollection = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(fc.features[0].rings().len(), 1);
        assert_eq!(fc.features[1].rings().len(), 2);
    }

    #[test]
    fn test_center_validation() {
        let fc: FeatureCollection = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(fc.features[0].center(), Some((3.0, 1.0)));
        assert_eq!(fc.features[1].center(), None);

        let short: Feature = serde_json::from_str(
            r##"{
                "properties": { "name": "X", "center": [1.0] },
                "geometry": { "type": "Polygon", "coordinates": [] }
            }"##,
        )
        .unwrap();
        assert_eq!(short.center(), None);
    }

    #[test]
    fn test_unnamed_feature_gets_empty_name() {
        // `name` is a plain defaulted String, not an Option; consumers skip
        // the label when it is empty.
        let feature: Feature = serde_json::from_str(
            r##"{
                "properties": {},
                "geometry": { "type": "Polygon", "coordinates": [] }
            }"##,
        )
        .unwrap();
        assert!(feature.properties.name.is_empty());
    }

    #[test]
    fn test_malformed_geometry_is_an_error() {
        let bad = r##"{
            "features": [
                { "properties": {}, "geometry": { "type": "Point", "coordinates": [0, 0] } }
            ]
        }"##;
        assert!(serde_json::from_str::<FeatureCollection>(bad).is_err());
    }

    #[test]
    fn test_beam_and_flight_inputs() {
        let beam: BeamPoint = serde_json::from_str(r#"{ "value": [116.4, 39.9, 2.5] }"#).unwrap();
        assert!((beam.weight() - 2.5).abs() < 1e-6);

        let line: FlightLine =
            serde_json::from_str(r#"{ "coords": [[116.4, 39.9], [-74.0, 40.7]] }"#).unwrap();
        assert!((line.start().0 - 116.4).abs() < 1e-4);
        assert!((line.end().1 - 40.7).abs() < 1e-4);
    }
}
