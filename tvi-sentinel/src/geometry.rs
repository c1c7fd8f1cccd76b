use serde::{Deserialize, Serialize};

/// A GeoJSON FeatureCollection holding polygon features.
///
/// Only the subset of GeoJSON the monitoring fixtures use is modeled:
/// polygon geometries with an optional properties object per feature.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(rename = "type")]
    pub kind: String,
    pub features: Vec<Feature>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feature {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub properties: serde_json::Map<String, serde_json::Value>,
    pub geometry: PolygonGeometry,
}

/// A GeoJSON Polygon: a list of linear rings, each ring a list of
/// [longitude, latitude] positions with the first position repeated last.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolygonGeometry {
    #[serde(rename = "type")]
    pub kind: String,
    pub coordinates: Vec<Vec<[f64; 2]>>,
}

impl Feature {
    /// String property by key, if present.
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).and_then(|v| v.as_str())
    }
}

impl PolygonGeometry {
    /// The outer boundary ring of the polygon.
    pub fn outer_ring(&self) -> Option<&[[f64; 2]]> {
        self.coordinates.first().map(|ring| ring.as_slice())
    }
}

/// Parse a GeoJSON FeatureCollection document.
pub fn parse_feature_collection(geojson: &str) -> anyhow::Result<FeatureCollection> {
    let collection: FeatureCollection = serde_json::from_str(geojson)?;
    anyhow::ensure!(
        collection.kind == "FeatureCollection",
        "expected a FeatureCollection, got '{}'",
        collection.kind
    );
    Ok(collection)
}
