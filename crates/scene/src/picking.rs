use foundation::math::{Vec3, stable_total_cmp_f64};

use crate::camera::OrbitCamera;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, dir: Vec3) -> Self {
        Self { origin, dir }
    }
}

/// Build a world-space ray through a pixel on the render surface.
///
/// Pixel coordinates are relative to the surface's top-left corner and
/// converted to normalized device coordinates in [-1, 1] with the vertical
/// axis inverted. Degenerate canvas sizes (≤ 1 px) yield no ray.
pub fn screen_ray(
    camera: &OrbitCamera,
    canvas_w: f64,
    canvas_h: f64,
    x_px: f64,
    y_px: f64,
) -> Option<Ray> {
    if canvas_w <= 1.0 || canvas_h <= 1.0 {
        return None;
    }
    let aspect = canvas_w / canvas_h;
    let tan = (0.5 * camera.fov_y_rad).tan();

    let eye = camera.eye_position();
    let forward = (camera.target - eye).normalized()?;
    let world_up = Vec3::new(0.0, 1.0, 0.0);
    let right = forward.cross(world_up).normalized()?;
    let up = right.cross(forward);

    let ndc_x = (2.0 * (x_px / canvas_w) - 1.0) * aspect;
    let ndc_y = 1.0 - 2.0 * (y_px / canvas_h);

    let dir = (forward + right.scale(ndc_x * tan) + up.scale(ndc_y * tan)).normalized()?;
    Some(Ray::new(eye, dir))
}

/// Nearest intersection of `ray` with the origin-centered sphere.
///
/// Only the globe is ever hit-tested; cloud shell and starfield are not
/// part of the picking surface. Returns the nearest strictly-positive hit.
pub fn intersect_sphere(ray: &Ray, radius: f64) -> Option<Vec3> {
    let b = 2.0 * ray.origin.dot(ray.dir);
    let c = ray.origin.dot(ray.origin) - radius * radius;
    let disc = b * b - 4.0 * c;
    if disc < 0.0 {
        return None;
    }
    let sqrt_disc = disc.sqrt();

    let t = [(-b - sqrt_disc) * 0.5, (-b + sqrt_disc) * 0.5]
        .into_iter()
        .filter(|t| *t > 1e-9)
        .min_by(|a, b| stable_total_cmp_f64(*a, *b))?;
    Some(ray.origin + ray.dir.scale(t))
}

/// Transform a world-space hit on the spinning globe into its local frame
/// and normalize onto the unit sphere.
///
/// The globe spins about +Y by `spin_angle_rad`, so the local point is the
/// world point rotated by the inverse angle. Normalization removes the
/// radius so the result can feed the trigonometric inverse directly.
pub fn surface_point(world_hit: Vec3, spin_angle_rad: f64) -> Option<Vec3> {
    let (sin_a, cos_a) = spin_angle_rad.sin_cos();
    let local = Vec3::new(
        cos_a * world_hit.x - sin_a * world_hit.z,
        world_hit.y,
        sin_a * world_hit.x + cos_a * world_hit.z,
    );
    local.normalized()
}

/// Rotate a local globe point into world space by the current spin angle.
///
/// Exact inverse of the transform applied by [`surface_point`]; the
/// highlight renderer uses it to keep outlines glued to the surface.
pub fn world_from_surface(local: Vec3, spin_angle_rad: f64) -> Vec3 {
    let (sin_a, cos_a) = spin_angle_rad.sin_cos();
    Vec3::new(
        cos_a * local.x + sin_a * local.z,
        local.y,
        -sin_a * local.x + cos_a * local.z,
    )
}

#[cfg(test)]
mod tests {
    use super::{Ray, intersect_sphere, screen_ray, surface_point, world_from_surface};
    use crate::camera::OrbitCamera;
    use foundation::math::{Vec3, unit_from_lon_lat_deg};

    fn assert_vec_close(a: Vec3, b: Vec3, eps: f64) {
        assert!(
            (a - b).length() <= eps,
            "expected {a:?} ~= {b:?} within {eps}"
        );
    }

    #[test]
    fn center_pixel_ray_hits_the_globe_front() {
        let camera = OrbitCamera::default();
        let ray = screen_ray(&camera, 800.0, 600.0, 400.0, 300.0).expect("ray");
        let hit = intersect_sphere(&ray, 1.0).expect("hit");
        // Camera sits on +Z looking at the origin; the nearest hit is the
        // front of the sphere.
        assert_vec_close(hit, Vec3::new(0.0, 0.0, 1.0), 1e-9);
    }

    #[test]
    fn corner_pixel_ray_misses_the_globe() {
        let camera = OrbitCamera::default();
        let ray = screen_ray(&camera, 800.0, 600.0, 0.0, 0.0).expect("ray");
        assert!(intersect_sphere(&ray, 1.0).is_none());
    }

    #[test]
    fn degenerate_canvas_yields_no_ray() {
        let camera = OrbitCamera::default();
        assert!(screen_ray(&camera, 0.0, 600.0, 0.0, 0.0).is_none());
        assert!(screen_ray(&camera, 800.0, 1.0, 0.0, 0.0).is_none());
    }

    #[test]
    fn ray_from_inside_still_finds_a_positive_hit() {
        let ray = Ray::new(Vec3::zero(), Vec3::new(1.0, 0.0, 0.0));
        let hit = intersect_sphere(&ray, 1.0).expect("hit");
        assert_vec_close(hit, Vec3::new(1.0, 0.0, 0.0), 1e-12);
    }

    #[test]
    fn ray_pointing_away_misses() {
        let ray = Ray::new(Vec3::new(0.0, 0.0, 3.0), Vec3::new(0.0, 0.0, 1.0));
        assert!(intersect_sphere(&ray, 1.0).is_none());
    }

    #[test]
    fn surface_point_undoes_the_spin() {
        let local = unit_from_lon_lat_deg(127.8, 36.5);
        for angle in [0.0, 0.4, 2.0, 5.5] {
            let world = world_from_surface(local, angle);
            let back = surface_point(world, angle).expect("unit point");
            assert_vec_close(back, local, 1e-12);
        }
    }

    #[test]
    fn surface_point_strips_the_radius() {
        let local = unit_from_lon_lat_deg(-43.2, 12.0);
        let world = world_from_surface(local, 1.2).scale(2.5);
        let back = surface_point(world, 1.2).expect("unit point");
        assert!((back.length() - 1.0).abs() < 1e-12);
        assert_vec_close(back, local, 1e-12);
    }
}
