use foundation::math::{Vec2, inverse_mercator_lat_deg, inverse_mercator_lon_deg, mercator_x, mercator_y};
use scene::atlas::FeatureAtlas;

use crate::layer::{Layer, LayerId};

/// CSS colors for the region fills and strokes.
pub const REGION_FILL: &str = "#90b78a";
pub const REGION_FILL_HOVER: &str = "#7cc28a";
pub const REGION_STROKE: &str = "#2f3d2f";
pub const REGION_STROKE_WIDTH: f64 = 1.3;

/// Fixed Mercator framing for the region map.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct MercatorView {
    pub center_lon_deg: f64,
    pub center_lat_deg: f64,
    /// Pixels per projected radian.
    pub scale_px: f64,
    pub translate: Vec2,
}

impl Default for MercatorView {
    fn default() -> Self {
        // The shipped framing: an 800×700 canvas centered on (128°E, 36°N)
        // with the map shifted right and down to leave room for panels.
        Self {
            center_lon_deg: 128.0,
            center_lat_deg: 36.0,
            scale_px: 6000.0,
            translate: Vec2::new(600.0, 400.0),
        }
    }
}

impl MercatorView {
    pub fn project(&self, lon_deg: f64, lat_deg: f64) -> Vec2 {
        let dx = mercator_x(lon_deg) - mercator_x(self.center_lon_deg);
        let dy = mercator_y(lat_deg) - mercator_y(self.center_lat_deg);
        Vec2::new(
            self.translate.x + self.scale_px * dx,
            self.translate.y - self.scale_px * dy,
        )
    }

    pub fn unproject(&self, x_px: f64, y_px: f64) -> (f64, f64) {
        let mx = mercator_x(self.center_lon_deg) + (x_px - self.translate.x) / self.scale_px;
        let my = mercator_y(self.center_lat_deg) + (self.translate.y - y_px) / self.scale_px;
        (inverse_mercator_lon_deg(mx), inverse_mercator_lat_deg(my))
    }
}

/// One screen-space region outline with its hover flag.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionPath {
    pub name: String,
    pub rings: Vec<Vec<Vec2>>,
    pub hovered: bool,
}

/// Projects named region polygons into screen-space paths and binds each
/// path's fill to the current hover target.
///
/// Stateless per render: every hover change re-derives all paths from
/// scratch rather than patching the previous set.
#[derive(Debug, Clone)]
pub struct RegionMapLayer {
    id: LayerId,
    view: MercatorView,
    /// Hovering this region name raises the secondary detail flag.
    detail_region: Option<String>,
}

impl RegionMapLayer {
    pub fn new(id: u64, view: MercatorView, detail_region: Option<String>) -> Self {
        Self {
            id: LayerId(id),
            view,
            detail_region,
        }
    }

    pub fn view(&self) -> MercatorView {
        self.view
    }

    /// Derive all region paths for the current hover target.
    pub fn extract(&self, regions: &FeatureAtlas, hovered: Option<&str>) -> Vec<RegionPath> {
        let mut out = Vec::with_capacity(regions.len());
        for feature in regions.iter() {
            let rings: Vec<Vec<Vec2>> = feature
                .rings()
                .filter(|ring| ring.len() >= 2)
                .map(|ring| {
                    ring.iter()
                        .map(|&(lon, lat)| self.view.project(lon, lat))
                        .collect()
                })
                .collect();
            if rings.is_empty() {
                continue;
            }
            out.push(RegionPath {
                name: feature.name.clone(),
                rings,
                hovered: hovered == Some(feature.name.as_str()),
            });
        }
        out
    }

    /// Resolve a pointer position against the region polygons.
    pub fn hit_test<'a>(&self, regions: &'a FeatureAtlas, x_px: f64, y_px: f64) -> Option<&'a str> {
        let (lon, lat) = self.view.unproject(x_px, y_px);
        regions
            .resolve(lon, lat)
            .map(|hit| hit.feature.name.as_str())
    }

    /// Whether hovering `name` should raise the detail panel.
    pub fn is_detail_region(&self, name: &str) -> bool {
        self.detail_region.as_deref() == Some(name)
    }
}

impl Layer for RegionMapLayer {
    fn id(&self) -> LayerId {
        self.id
    }
}
