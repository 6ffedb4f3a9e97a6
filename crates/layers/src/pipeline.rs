use foundation::math::lon_lat_deg_from_unit;
use runtime::{HoverChannel, HoverUpdate};
use scene::atlas::FeatureAtlas;
use scene::camera::OrbitCamera;
use scene::picking::{intersect_sphere, screen_ray, surface_point};

use crate::highlight::HighlightLayer;

/// One pointer-move resolution, end to end.
///
/// Pixel → ray → globe hit → local surface point → (lon, lat) → feature →
/// highlight rebuild → hover message, all synchronously within the caller's
/// event turn. Every failure along the way (no dataset yet, ray misses the
/// globe, no containing feature) collapses to the same "no country"
/// outcome: highlight cleared, `feature: None` emitted.
#[allow(clippy::too_many_arguments)]
pub fn resolve_pointer_move(
    camera: &OrbitCamera,
    canvas_w: f64,
    canvas_h: f64,
    x_px: f64,
    y_px: f64,
    globe_radius: f64,
    spin_angle_rad: f64,
    atlas: Option<&FeatureAtlas>,
    highlight: &mut HighlightLayer,
    channel: &mut HoverChannel,
    frame_index: u64,
) -> HoverUpdate {
    let resolved = atlas.and_then(|atlas| {
        let ray = screen_ray(camera, canvas_w, canvas_h, x_px, y_px)?;
        let hit = intersect_sphere(&ray, globe_radius)?;
        let unit = surface_point(hit, spin_angle_rad)?;
        let (lon, lat) = lon_lat_deg_from_unit(unit);
        atlas.resolve(lon, lat)
    });

    let update = match resolved {
        Some(hit) => {
            let snapshot = highlight.rebuild(hit.feature);
            HoverUpdate {
                frame_index,
                feature: Some(hit.feature.name.clone()),
                anchor: snapshot.anchor.map(|a| a.as_array()),
            }
        }
        None => {
            highlight.clear();
            HoverUpdate::none(frame_index)
        }
    };

    channel.emit(update.clone());
    update
}

#[cfg(test)]
mod tests {
    use super::resolve_pointer_move;
    use crate::highlight::HighlightLayer;
    use foundation::math::{Vec3, unit_from_lon_lat_deg};
    use runtime::HoverChannel;
    use scene::camera::OrbitCamera;
    use scene::picking::world_from_surface;
    use scene::prefabs::GLOBE_RADIUS;

    const CANVAS_W: f64 = 800.0;
    const CANVAS_H: f64 = 600.0;

    const KOREA_DOC: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": { "ADMIN": "Korea" },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[125.0, 33.5], [130.5, 33.5], [130.5, 39.0], [125.0, 39.0]]]
                }
            }
        ]
    }"#;

    /// Invert `screen_ray`: the pixel whose ray passes through `p`.
    fn pixel_for_world_point(camera: &OrbitCamera, p: Vec3) -> (f64, f64) {
        let eye = camera.eye_position();
        let forward = (camera.target - eye).normalized().expect("forward");
        let right = forward
            .cross(Vec3::new(0.0, 1.0, 0.0))
            .normalized()
            .expect("right");
        let up = right.cross(forward);

        let d = p - eye;
        let z = d.dot(forward);
        let tan = (0.5 * camera.fov_y_rad).tan();
        let aspect = CANVAS_W / CANVAS_H;

        let ndc_x = d.dot(right) / (z * tan);
        let ndc_y = d.dot(up) / (z * tan);
        let x_px = CANVAS_W * 0.5 * (ndc_x / aspect + 1.0);
        let y_px = CANVAS_H * 0.5 * (1.0 - ndc_y);
        (x_px, y_px)
    }

    /// Spin angle that brings the given surface point to the camera-facing
    /// side (+Z) of the globe.
    fn front_facing_spin(local: Vec3) -> f64 {
        (-local.x).atan2(local.z)
    }

    #[test]
    fn end_to_end_pointer_resolution_reports_korea() {
        let atlas = formats::atlas_from_geojson_str(KOREA_DOC, "ADMIN").expect("atlas");
        let camera = OrbitCamera::default();
        let mut highlight = HighlightLayer::default();
        let mut channel = HoverChannel::new();

        // A pointer position whose resolved coordinate is (36.5°N, 127.8°E),
        // with the globe mid-spin.
        let local = unit_from_lon_lat_deg(127.8, 36.5);
        let spin = front_facing_spin(local);
        let world = world_from_surface(local, spin).scale(GLOBE_RADIUS);
        let (x_px, y_px) = pixel_for_world_point(&camera, world);

        let update = resolve_pointer_move(
            &camera,
            CANVAS_W,
            CANVAS_H,
            x_px,
            y_px,
            GLOBE_RADIUS,
            spin,
            Some(&atlas),
            &mut highlight,
            &mut channel,
            7,
        );

        assert_eq!(update.feature.as_deref(), Some("Korea"));
        assert_eq!(highlight.snapshot().rings.len(), 1);
        assert_eq!(highlight.snapshot().rings[0].len(), 4);

        // The callback payload matches the feature centroid.
        let anchor = update.anchor.expect("anchor");
        let centroid = atlas.get(0).unwrap().centroid_unit().expect("centroid");
        assert!((anchor[0] - centroid.x).abs() < 1e-12);
        assert!((anchor[1] - centroid.y).abs() < 1e-12);
        assert!((anchor[2] - centroid.z).abs() < 1e-12);

        let drained = channel.drain();
        assert_eq!(drained.len(), 1);
        assert_eq!(drained[0].feature.as_deref(), Some("Korea"));
    }

    #[test]
    fn hovering_the_same_feature_twice_does_not_duplicate_outlines() {
        let atlas = formats::atlas_from_geojson_str(KOREA_DOC, "ADMIN").expect("atlas");
        let camera = OrbitCamera::default();
        let mut highlight = HighlightLayer::default();
        let mut channel = HoverChannel::new();

        let local = unit_from_lon_lat_deg(127.8, 36.5);
        let spin = front_facing_spin(local);
        let world = world_from_surface(local, spin).scale(GLOBE_RADIUS);
        let (x_px, y_px) = pixel_for_world_point(&camera, world);

        for frame in 0..2 {
            resolve_pointer_move(
                &camera,
                CANVAS_W,
                CANVAS_H,
                x_px,
                y_px,
                GLOBE_RADIUS,
                spin,
                Some(&atlas),
                &mut highlight,
                &mut channel,
                frame,
            );
        }
        assert_eq!(highlight.snapshot().rings.len(), 1);
    }

    #[test]
    fn missing_dataset_resolves_to_no_country() {
        let camera = OrbitCamera::default();
        let mut highlight = HighlightLayer::default();
        let mut channel = HoverChannel::new();

        // Center pixel definitely hits the globe, but no data has loaded.
        let update = resolve_pointer_move(
            &camera,
            CANVAS_W,
            CANVAS_H,
            CANVAS_W / 2.0,
            CANVAS_H / 2.0,
            GLOBE_RADIUS,
            0.0,
            None,
            &mut highlight,
            &mut channel,
            0,
        );
        assert_eq!(update.feature, None);
        assert!(highlight.snapshot().is_empty());
    }

    #[test]
    fn missing_the_globe_clears_a_previous_highlight() {
        let atlas = formats::atlas_from_geojson_str(KOREA_DOC, "ADMIN").expect("atlas");
        let camera = OrbitCamera::default();
        let mut highlight = HighlightLayer::default();
        let mut channel = HoverChannel::new();

        let local = unit_from_lon_lat_deg(127.8, 36.5);
        let spin = front_facing_spin(local);
        let world = world_from_surface(local, spin).scale(GLOBE_RADIUS);
        let (x_px, y_px) = pixel_for_world_point(&camera, world);
        resolve_pointer_move(
            &camera,
            CANVAS_W,
            CANVAS_H,
            x_px,
            y_px,
            GLOBE_RADIUS,
            spin,
            Some(&atlas),
            &mut highlight,
            &mut channel,
            0,
        );
        assert!(!highlight.snapshot().is_empty());

        // Top-left corner misses the globe entirely.
        let update = resolve_pointer_move(
            &camera,
            CANVAS_W,
            CANVAS_H,
            0.0,
            0.0,
            GLOBE_RADIUS,
            spin,
            Some(&atlas),
            &mut highlight,
            &mut channel,
            1,
        );
        assert_eq!(update.feature, None);
        assert!(highlight.snapshot().is_empty());
        assert_eq!(channel.hovered_feature(), None);
    }

    #[test]
    fn ocean_hit_resolves_to_no_country() {
        let atlas = formats::atlas_from_geojson_str(KOREA_DOC, "ADMIN").expect("atlas");
        let camera = OrbitCamera::default();
        let mut highlight = HighlightLayer::default();
        let mut channel = HoverChannel::new();

        // Mid-Pacific point, far from the only feature.
        let local = unit_from_lon_lat_deg(-150.0, -30.0);
        let spin = front_facing_spin(local);
        let world = world_from_surface(local, spin).scale(GLOBE_RADIUS);
        let (x_px, y_px) = pixel_for_world_point(&camera, world);

        let update = resolve_pointer_move(
            &camera,
            CANVAS_W,
            CANVAS_H,
            x_px,
            y_px,
            GLOBE_RADIUS,
            spin,
            Some(&atlas),
            &mut highlight,
            &mut channel,
            0,
        );
        assert_eq!(update.feature, None);
    }
}
