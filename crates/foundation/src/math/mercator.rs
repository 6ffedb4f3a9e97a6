//! Spherical Mercator on the unit sphere.
//!
//! Projected units are radians: x = lon, y = ln(tan(pi/4 + lat/2)).
//! The 2D region map multiplies by its pixel scale afterwards.

/// Latitude where the Mercator y coordinate reaches ±π.
pub const MERCATOR_MAX_LAT_DEG: f64 = 85.051_128_779_806_59;

pub fn mercator_x(lon_deg: f64) -> f64 {
    lon_deg.to_radians()
}

pub fn mercator_y(lat_deg: f64) -> f64 {
    let lat = lat_deg
        .clamp(-MERCATOR_MAX_LAT_DEG, MERCATOR_MAX_LAT_DEG)
        .to_radians();
    (std::f64::consts::FRAC_PI_4 + 0.5 * lat).tan().ln()
}

pub fn inverse_mercator_lon_deg(x: f64) -> f64 {
    x.to_degrees()
}

pub fn inverse_mercator_lat_deg(y: f64) -> f64 {
    (2.0 * y.exp().atan() - std::f64::consts::FRAC_PI_2).to_degrees()
}
