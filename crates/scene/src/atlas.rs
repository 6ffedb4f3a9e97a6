use foundation::bounds::Aabb2;
use foundation::math::{Vec3, lon_lat_deg_from_unit, point_in_polygon, unit_from_lon_lat_deg};

/// One closed boundary loop: (lon, lat) degree pairs.
pub type Ring = Vec<(f64, f64)>;
/// Outer ring followed by optional hole rings.
pub type Polygon = Vec<Ring>;

/// A named geographic region: one or more polygons sharing a name.
#[derive(Debug, Clone, PartialEq)]
pub struct AtlasFeature {
    pub name: String,
    pub polygons: Vec<Polygon>,
    bbox: Option<Aabb2>,
    bbox_reliable: bool,
}

impl AtlasFeature {
    pub fn new(name: impl Into<String>, polygons: Vec<Polygon>) -> Self {
        let bbox = Aabb2::from_points(
            polygons
                .iter()
                .flat_map(|poly| poly.iter())
                .flat_map(|ring| ring.iter().copied()),
        );
        // A rectangle spanning more than half the globe in longitude is
        // almost certainly an antimeridian artifact; skip the reject test
        // for such features rather than risk false negatives.
        let bbox_reliable = bbox.map(|b| b.lon_span_deg() <= 180.0).unwrap_or(false);
        Self {
            name: name.into(),
            polygons,
            bbox,
            bbox_reliable,
        }
    }

    pub fn bbox(&self) -> Option<&Aabb2> {
        self.bbox.as_ref()
    }

    /// Every ring of every polygon, in input order.
    pub fn rings(&self) -> impl Iterator<Item = &Ring> {
        self.polygons.iter().flat_map(|poly| poly.iter())
    }

    pub fn contains(&self, lon_deg: f64, lat_deg: f64) -> bool {
        if self.bbox_reliable
            && let Some(bbox) = self.bbox
            && !bbox.contains(lon_deg, lat_deg)
        {
            return false;
        }
        self.polygons
            .iter()
            .any(|rings| point_in_polygon(lon_deg, lat_deg, rings))
    }

    /// Centroid of the feature's geometry on the unit sphere.
    ///
    /// Normalized mean of the ring-vertex unit vectors: robust across the
    /// antimeridian, and `None` only for empty or perfectly antipodal
    /// degenerate geometry.
    pub fn centroid_unit(&self) -> Option<Vec3> {
        let mut sum = Vec3::zero();
        let mut count = 0usize;
        for ring in self.rings() {
            for &(lon, lat) in ring {
                sum = sum + unit_from_lon_lat_deg(lon, lat);
                count += 1;
            }
        }
        if count == 0 {
            return None;
        }
        sum.scale(1.0 / count as f64).normalized()
    }

    pub fn centroid_lon_lat(&self) -> Option<(f64, f64)> {
        self.centroid_unit().map(lon_lat_deg_from_unit)
    }
}

/// A resolved hit: the matched feature and its load-order index.
#[derive(Debug, Copy, Clone)]
pub struct Resolved<'a> {
    pub index: usize,
    pub feature: &'a AtlasFeature,
}

/// The ordered feature set the resolver runs against.
///
/// Loaded once per session and immutable afterwards. Iteration order is
/// the load order of the source document; `resolve` returns the first
/// containing feature, which makes overlap priority deterministic even
/// though country data is expected to be disjoint (never validated).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureAtlas {
    features: Vec<AtlasFeature>,
}

impl FeatureAtlas {
    pub fn new(features: Vec<AtlasFeature>) -> Self {
        Self { features }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&AtlasFeature> {
        self.features.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AtlasFeature> {
        self.features.iter()
    }

    /// Find the feature containing the coordinate, if any.
    ///
    /// O(total ring vertices); fine for a curated set of tens of features,
    /// a spatial index is the known boundary for anything larger.
    pub fn resolve(&self, lon_deg: f64, lat_deg: f64) -> Option<Resolved<'_>> {
        self.features
            .iter()
            .enumerate()
            .find(|(_, f)| f.contains(lon_deg, lat_deg))
            .map(|(index, feature)| Resolved { index, feature })
    }
}
