use crate::geometry::parse_feature_collection;

/// Embedded GeoJSON data for the monitored green spaces.
pub static GEOJSON_OBJECT: &str = include_str!("../fixtures/green_spaces.geojson");

/// A monitored green space: a named polygon area of interest.
#[derive(Debug, Clone, PartialEq)]
pub struct GreenSpace {
    pub name: String,
    /// Identifier used on the command line and in output filenames.
    pub slug: String,
    /// Outer polygon ring as [longitude, latitude] pairs (WGS84),
    /// first position repeated last.
    pub ring: Vec<[f64; 2]>,
}

impl GreenSpace {
    /// Get the green space vector from the embedded GeoJSON fixture.
    pub fn get_green_space_vector() -> Vec<GreenSpace> {
        if let Ok(v) = GreenSpace::parse_green_space_geojson(GEOJSON_OBJECT) {
            v
        } else {
            panic!("failed to parse green spaces geojson fixture")
        }
    }

    /// Look up a green space by slug in the embedded fixture.
    pub fn find_by_slug(slug: &str) -> Option<GreenSpace> {
        GreenSpace::get_green_space_vector()
            .into_iter()
            .find(|gs| gs.slug == slug)
    }

    /// Parse a GeoJSON FeatureCollection string into green spaces.
    ///
    /// Each feature must carry `name` and `slug` properties and a polygon
    /// geometry with a non-empty outer ring.
    pub fn parse_green_space_geojson(geojson: &str) -> anyhow::Result<Vec<GreenSpace>> {
        let collection = parse_feature_collection(geojson)?;
        let mut green_spaces = Vec::with_capacity(collection.features.len());
        for feature in &collection.features {
            let name = feature
                .property("name")
                .ok_or_else(|| anyhow::anyhow!("green space feature missing 'name' property"))?;
            let slug = feature
                .property("slug")
                .ok_or_else(|| anyhow::anyhow!("green space feature missing 'slug' property"))?;
            let ring = feature
                .geometry
                .outer_ring()
                .filter(|ring| ring.len() >= 4)
                .ok_or_else(|| {
                    anyhow::anyhow!("green space '{name}' has no usable polygon ring")
                })?;
            green_spaces.push(GreenSpace {
                name: name.to_string(),
                slug: slug.to_string(),
                ring: ring.to_vec(),
            });
        }
        Ok(green_spaces)
    }
}
