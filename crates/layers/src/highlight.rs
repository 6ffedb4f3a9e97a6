use foundation::math::{Vec3, unit_from_lon_lat_deg};
use scene::atlas::AtlasFeature;

use crate::layer::{Layer, LayerId};
use crate::symbology::LayerStyle;

/// Outline lift above the globe surface, as a radial scale factor.
pub const HIGHLIGHT_LIFT: f64 = 1.002;
/// Gold, fully opaque.
pub const HIGHLIGHT_COLOR: [f32; 4] = [1.0, 0.843, 0.0, 1.0];

/// The current set of outline line strips, one per polygon ring, plus the
/// matched feature's centroid position for anchoring UI.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HighlightSnapshot {
    pub rings: Vec<Vec<Vec3>>,
    /// Centroid on the unit sphere (radius 1.0, not lifted). Advisory
    /// position data, never used for hit-testing.
    pub anchor: Option<Vec3>,
}

impl HighlightSnapshot {
    pub fn is_empty(&self) -> bool {
        self.rings.is_empty()
    }
}

/// Builds the hover outline for the currently matched feature.
///
/// Replacement policy: every rebuild discards the previous snapshot
/// completely before projecting the new rings; there is no incremental
/// diffing and no cross-fade.
#[derive(Debug, Clone)]
pub struct HighlightLayer {
    id: LayerId,
    style: LayerStyle,
    snapshot: HighlightSnapshot,
}

impl Default for HighlightLayer {
    fn default() -> Self {
        Self::new(1)
    }
}

impl HighlightLayer {
    pub fn new(id: u64) -> Self {
        Self {
            id: LayerId(id),
            style: LayerStyle::new(true, HIGHLIGHT_COLOR, HIGHLIGHT_LIFT),
            snapshot: HighlightSnapshot::default(),
        }
    }

    pub fn style(&self) -> LayerStyle {
        self.style
    }

    pub fn snapshot(&self) -> &HighlightSnapshot {
        &self.snapshot
    }

    /// Rebuild the outline for `feature`.
    ///
    /// Multi-polygon features flatten to a single ring list; one line strip
    /// per ring. Rings with fewer than 2 points are not renderable and are
    /// skipped silently.
    pub fn rebuild(&mut self, feature: &AtlasFeature) -> &HighlightSnapshot {
        self.snapshot.rings.clear();
        self.snapshot.anchor = None;

        for ring in feature.rings() {
            if ring.len() < 2 {
                continue;
            }
            let points: Vec<Vec3> = ring
                .iter()
                .map(|&(lon, lat)| unit_from_lon_lat_deg(lon, lat).scale(self.style.lift))
                .collect();
            self.snapshot.rings.push(points);
        }

        self.snapshot.anchor = feature.centroid_unit();
        &self.snapshot
    }

    /// Drop the current outline entirely ("no country").
    pub fn clear(&mut self) {
        self.snapshot.rings.clear();
        self.snapshot.anchor = None;
    }
}

impl Layer for HighlightLayer {
    fn id(&self) -> LayerId {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::{HIGHLIGHT_LIFT, HighlightLayer};
    use scene::atlas::AtlasFeature;

    fn two_part_feature() -> AtlasFeature {
        AtlasFeature::new(
            "Archipelago",
            vec![
                vec![vec![(0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (0.0, 2.0)]],
                vec![vec![
                    (10.0, 0.0),
                    (12.0, 0.0),
                    (12.0, 2.0),
                    (10.0, 2.0),
                    (11.0, 1.0),
                ]],
            ],
        )
    }

    #[test]
    fn multi_polygon_flattens_to_one_path_per_ring() {
        let mut layer = HighlightLayer::default();
        let snapshot = layer.rebuild(&two_part_feature());
        assert_eq!(snapshot.rings.len(), 2);
        assert_eq!(snapshot.rings[0].len(), 4);
        assert_eq!(snapshot.rings[1].len(), 5);
    }

    #[test]
    fn rebuild_is_idempotent() {
        let feature = two_part_feature();
        let mut layer = HighlightLayer::default();
        let first = layer.rebuild(&feature).clone();
        let second = layer.rebuild(&feature).clone();
        assert_eq!(first, second);
        assert_eq!(second.rings.len(), 2);
    }

    #[test]
    fn rebuild_replaces_the_previous_feature() {
        let mut layer = HighlightLayer::default();
        layer.rebuild(&two_part_feature());

        let single = AtlasFeature::new(
            "Square",
            vec![vec![vec![(0.0, 0.0), (5.0, 0.0), (5.0, 5.0), (0.0, 5.0)]]],
        );
        let snapshot = layer.rebuild(&single);
        assert_eq!(snapshot.rings.len(), 1);
    }

    #[test]
    fn degenerate_rings_are_skipped_silently() {
        let feature = AtlasFeature::new(
            "Degenerate",
            vec![vec![
                vec![(0.0, 0.0)],
                vec![(0.0, 0.0), (3.0, 0.0), (3.0, 3.0)],
            ]],
        );
        let mut layer = HighlightLayer::default();
        let snapshot = layer.rebuild(&feature);
        assert_eq!(snapshot.rings.len(), 1);
        assert_eq!(snapshot.rings[0].len(), 3);
    }

    #[test]
    fn rings_are_lifted_off_the_surface() {
        let feature = AtlasFeature::new(
            "Square",
            vec![vec![vec![(0.0, 0.0), (5.0, 0.0), (5.0, 5.0), (0.0, 5.0)]]],
        );
        let mut layer = HighlightLayer::default();
        let snapshot = layer.rebuild(&feature);
        for point in &snapshot.rings[0] {
            assert!((point.length() - HIGHLIGHT_LIFT).abs() < 1e-12);
        }
        // The anchor stays on the unit sphere.
        let anchor = snapshot.anchor.expect("anchor");
        assert!((anchor.length() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn clear_empties_the_snapshot() {
        let mut layer = HighlightLayer::default();
        layer.rebuild(&two_part_feature());
        layer.clear();
        assert!(layer.snapshot().is_empty());
        assert!(layer.snapshot().anchor.is_none());
    }
}
