//! Point-in-polygon tests over geographic coordinates.
//!
//! Even-odd crossing test in (lon, lat) degrees. Edge longitudes are
//! unwrapped relative to the query point before the crossing test, so
//! edges that cross the antimeridian count correctly as long as no single
//! edge spans 180° or more of longitude (true for any real boundary data).

/// Map a longitude difference into (-180°, 180°].
fn wrap_delta_deg(delta_deg: f64) -> f64 {
    let mut d = delta_deg % 360.0;
    if d > 180.0 {
        d -= 360.0;
    }
    if d <= -180.0 {
        d += 360.0;
    }
    d
}

/// Whether (lon, lat) lies inside one boundary ring.
///
/// The ring is treated as closed; a repeated closing vertex is harmless.
/// Ring longitudes are unwrapped cumulatively (first vertex relative to
/// the query point, each subsequent vertex relative to its predecessor) so
/// the ring stays contiguous in the query point's frame. Rings that
/// enclose a pole do not close under this unwrapping and are out of scope.
///
/// Edge rule is half-open (`lat_a > lat` vs `lat_b > lat`), which gives a
/// deterministic answer for points exactly on a vertex: a point on the
/// ring's minimum-latitude corner tests inside, one on the maximum-latitude
/// corner tests outside.
pub fn point_in_ring(lon_deg: f64, lat_deg: f64, ring: &[(f64, f64)]) -> bool {
    if ring.len() < 3 {
        return false;
    }

    let mut inside = false;
    let mut ax = wrap_delta_deg(ring[0].0 - lon_deg);
    let mut lat_a = ring[0].1;
    let mut lon_a = ring[0].0;
    for i in 1..=ring.len() {
        let (lon_b, lat_b) = ring[i % ring.len()];
        let bx = ax + wrap_delta_deg(lon_b - lon_a);
        if (lat_a > lat_deg) != (lat_b > lat_deg) {
            let t = (lat_deg - lat_a) / (lat_b - lat_a);
            if ax + t * (bx - ax) > 0.0 {
                inside = !inside;
            }
        }
        ax = bx;
        lat_a = lat_b;
        lon_a = lon_b;
    }
    inside
}

/// Whether (lon, lat) lies inside a polygon: within the outer ring and
/// outside every hole ring.
pub fn point_in_polygon(lon_deg: f64, lat_deg: f64, rings: &[Vec<(f64, f64)>]) -> bool {
    let Some(outer) = rings.first() else {
        return false;
    };
    if !point_in_ring(lon_deg, lat_deg, outer) {
        return false;
    }
    rings[1..]
        .iter()
        .all(|hole| !point_in_ring(lon_deg, lat_deg, hole))
}

#[cfg(test)]
mod tests {
    use super::{point_in_polygon, point_in_ring};

    fn square() -> Vec<(f64, f64)> {
        vec![(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]
    }

    #[test]
    fn square_contains_interior_point() {
        assert!(point_in_ring(5.0, 5.0, &square()));
    }

    #[test]
    fn square_rejects_exterior_point() {
        assert!(!point_in_ring(-5.0, 5.0, &square()));
        assert!(!point_in_ring(5.0, 15.0, &square()));
    }

    #[test]
    fn vertex_convention_is_deterministic() {
        // Half-open edge rule: min-latitude corner in, max-latitude corner out.
        assert!(point_in_ring(0.0, 0.0, &square()));
        assert!(!point_in_ring(10.0, 10.0, &square()));
    }

    #[test]
    fn closing_duplicate_vertex_is_harmless() {
        let mut ring = square();
        ring.push(ring[0]);
        assert!(point_in_ring(5.0, 5.0, &ring));
        assert!(!point_in_ring(-5.0, 5.0, &ring));
    }

    #[test]
    fn degenerate_ring_contains_nothing() {
        assert!(!point_in_ring(0.0, 0.0, &[(0.0, 0.0), (1.0, 1.0)]));
        assert!(!point_in_ring(0.0, 0.0, &[]));
    }

    #[test]
    fn antimeridian_spanning_ring() {
        // A box from 170°E to 170°W across the date line.
        let ring = vec![(170.0, -10.0), (-170.0, -10.0), (-170.0, 10.0), (170.0, 10.0)];
        assert!(point_in_ring(180.0, 0.0, &ring));
        assert!(point_in_ring(-175.0, 0.0, &ring));
        assert!(point_in_ring(175.0, 0.0, &ring));
        assert!(!point_in_ring(0.0, 0.0, &ring));
        assert!(!point_in_ring(160.0, 0.0, &ring));
    }

    #[test]
    fn far_side_ring_does_not_capture_origin() {
        // Same box; a point on the opposite side of the globe must stay out
        // even though naive planar coordinates would put an edge nearby.
        let ring = vec![(170.0, -10.0), (-170.0, -10.0), (-170.0, 10.0), (170.0, 10.0)];
        assert!(!point_in_ring(0.0, 0.0, &ring));
        assert!(!point_in_ring(-90.0, 0.0, &ring));
    }

    #[test]
    fn polygon_holes_subtract() {
        let outer = square();
        let hole = vec![(4.0, 4.0), (6.0, 4.0), (6.0, 6.0), (4.0, 6.0)];
        let rings = vec![outer, hole];
        assert!(point_in_polygon(2.0, 2.0, &rings));
        assert!(!point_in_polygon(5.0, 5.0, &rings));
        assert!(!point_in_polygon(-1.0, 5.0, &rings));
    }

    #[test]
    fn empty_polygon_contains_nothing() {
        assert!(!point_in_polygon(0.0, 0.0, &[]));
    }
}
