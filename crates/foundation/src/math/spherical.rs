//! Unit-sphere ↔ geographic conversion.
//!
//! Scene space puts the polar axis on +Y and wraps the globe texture so
//! that `theta = -lon`. The forward and inverse conversions below must
//! stay exact inverses of one another; the whole picking pipeline leans
//! on that round trip.

use super::Vec3;

/// Normalize a longitude into [-180°, 180°].
///
/// Only a single ±360° correction is applied, which matches how the
/// conversion below can overshoot the bounds.
pub fn wrap_lon_deg(lon_deg: f64) -> f64 {
    let mut lon = lon_deg;
    if lon > 180.0 {
        lon -= 360.0;
    }
    if lon < -180.0 {
        lon += 360.0;
    }
    lon
}

/// Geographic degrees → point on the unit sphere.
pub fn unit_from_lon_lat_deg(lon_deg: f64, lat_deg: f64) -> Vec3 {
    let phi = (90.0 - lat_deg).to_radians();
    let theta = (-lon_deg).to_radians();
    Vec3::new(
        phi.sin() * theta.cos(),
        phi.cos(),
        phi.sin() * theta.sin(),
    )
}

/// Point on the unit sphere → geographic degrees.
///
/// The input is assumed to be unit length; callers normalize first.
/// At the poles the longitude is indeterminate and reported as 0°.
pub fn lon_lat_deg_from_unit(v: Vec3) -> (f64, f64) {
    let lat = v.y.clamp(-1.0, 1.0).asin().to_degrees();
    let lon = wrap_lon_deg((-v.z).atan2(v.x).to_degrees());
    (lon, lat)
}

#[cfg(test)]
mod tests {
    use super::{lon_lat_deg_from_unit, unit_from_lon_lat_deg, wrap_lon_deg};

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn wraps_longitude_overshoot() {
        assert_eq!(wrap_lon_deg(181.0), -179.0);
        assert_eq!(wrap_lon_deg(-181.0), 179.0);
        assert_eq!(wrap_lon_deg(180.0), 180.0);
        assert_eq!(wrap_lon_deg(-180.0), -180.0);
    }

    #[test]
    fn prime_meridian_equator_maps_to_plus_x() {
        let v = unit_from_lon_lat_deg(0.0, 0.0);
        assert_close(v.x, 1.0, 1e-12);
        assert_close(v.y, 0.0, 1e-12);
        assert_close(v.z, 0.0, 1e-12);
    }

    #[test]
    fn north_pole_maps_to_plus_y() {
        let v = unit_from_lon_lat_deg(37.0, 90.0);
        assert_close(v.y, 1.0, 1e-12);
    }

    #[test]
    fn east_longitude_maps_to_minus_z() {
        // lon 90°E → theta = -90°, so z = sin(phi) * sin(-90°) = -1.
        let v = unit_from_lon_lat_deg(90.0, 0.0);
        assert_close(v.z, -1.0, 1e-12);
    }

    #[test]
    fn round_trips_across_the_domain() {
        // Sweep the full domain away from the poles, where longitude is
        // indeterminate by construction.
        let mut lat = -89.0;
        while lat <= 89.0 {
            let mut lon = -179.0;
            while lon <= 180.0 {
                let v = unit_from_lon_lat_deg(lon, lat);
                let (lon_rt, lat_rt) = lon_lat_deg_from_unit(v);
                assert_close(lat_rt, lat, 1e-9);
                assert_close(lon_rt, lon, 1e-9);
                lon += 7.0;
            }
            lat += 7.0;
        }
    }

    #[test]
    fn poles_report_zero_longitude() {
        let (lon, lat) = lon_lat_deg_from_unit(unit_from_lon_lat_deg(123.0, 90.0));
        assert_close(lat, 90.0, 1e-9);
        assert_close(lon, 0.0, 1e-9);
    }
}
