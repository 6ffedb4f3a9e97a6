/// Axis-aligned rectangle in geographic degrees: x is longitude, y latitude.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Aabb2 {
    pub min: [f64; 2],
    pub max: [f64; 2],
}

impl Aabb2 {
    pub fn new(min: [f64; 2], max: [f64; 2]) -> Self {
        Aabb2 { min, max }
    }

    /// Smallest rectangle covering `points` ((lon, lat) pairs).
    ///
    /// Returns `None` for an empty slice.
    pub fn from_points(points: impl IntoIterator<Item = (f64, f64)>) -> Option<Self> {
        let mut iter = points.into_iter();
        let (lon0, lat0) = iter.next()?;
        let mut out = Aabb2::new([lon0, lat0], [lon0, lat0]);
        for (lon, lat) in iter {
            out.min[0] = out.min[0].min(lon);
            out.min[1] = out.min[1].min(lat);
            out.max[0] = out.max[0].max(lon);
            out.max[1] = out.max[1].max(lat);
        }
        Some(out)
    }

    pub fn contains(&self, lon_deg: f64, lat_deg: f64) -> bool {
        lon_deg >= self.min[0]
            && lon_deg <= self.max[0]
            && lat_deg >= self.min[1]
            && lat_deg <= self.max[1]
    }

    /// Longitudinal extent in degrees.
    ///
    /// A span wider than 180° usually means the geometry crosses the
    /// antimeridian and the rectangle is not a usable reject test.
    pub fn lon_span_deg(&self) -> f64 {
        self.max[0] - self.min[0]
    }
}
