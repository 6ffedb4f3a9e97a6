use foundation::math::Vec3;

/// Closest the camera may orbit to the globe surface.
const MIN_DISTANCE: f64 = 1.5;
/// Farthest the camera may orbit from the globe center.
const MAX_DISTANCE: f64 = 5.0;
/// Pointer-drag rotation sensitivity.
const ROTATE_SPEED: f64 = 0.4;
/// Per-update velocity decay for damped orbiting.
const DAMPING: f64 = 0.05;
/// Keep pitch away from the poles so the view basis stays well defined.
const PITCH_CLAMP_RAD: f64 = 1.55;
/// Zoom interpolation rate (higher = snappier).
const ZOOM_SMOOTHING: f64 = 8.0;

/// Perspective orbit camera around the globe with damped controls.
///
/// Yaw/pitch orbit about the origin; drags apply an immediate delta and
/// leave a decaying residual velocity so motion eases out after release.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct OrbitCamera {
    pub yaw_rad: f64,
    pub pitch_rad: f64,
    pub distance: f64,
    pub target: Vec3,
    pub fov_y_rad: f64,
    target_distance: f64,
    yaw_vel_rad: f64,
    pitch_vel_rad: f64,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        // Start on the +Z axis at distance 3, matching the scene's
        // initial front-facing view.
        Self {
            yaw_rad: -std::f64::consts::FRAC_PI_2,
            pitch_rad: 0.0,
            distance: 3.0,
            target: Vec3::zero(),
            fov_y_rad: 60f64.to_radians(),
            target_distance: 3.0,
            yaw_vel_rad: 0.0,
            pitch_vel_rad: 0.0,
        }
    }
}

impl OrbitCamera {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a pointer drag in pixels.
    ///
    /// Sensitivity is scaled so a full shorter-axis drag sweeps about
    /// half a turn at `ROTATE_SPEED` 1.0.
    pub fn orbit(&mut self, delta_x_px: f64, delta_y_px: f64, canvas_w: f64, canvas_h: f64) {
        let min_dim = canvas_w.min(canvas_h).max(1.0);
        let speed = std::f64::consts::PI / min_dim * ROTATE_SPEED;

        let dyaw = delta_x_px * speed;
        let dpitch = delta_y_px * speed;
        self.yaw_rad = wrap_angle(self.yaw_rad + dyaw);
        self.pitch_rad = (self.pitch_rad + dpitch).clamp(-PITCH_CLAMP_RAD, PITCH_CLAMP_RAD);

        // Residual velocity feeds the damped ease-out in `update`.
        self.yaw_vel_rad = dyaw;
        self.pitch_vel_rad = dpitch;
    }

    /// Wheel zoom; positive delta zooms out.
    pub fn zoom(&mut self, wheel_delta: f64) {
        let factor = (wheel_delta * 0.002).exp();
        self.target_distance = (self.target_distance * factor).clamp(MIN_DISTANCE, MAX_DISTANCE);
    }

    /// Per-frame damping and zoom interpolation.
    pub fn update(&mut self, dt_s: f64) {
        let dt = dt_s.clamp(0.0, 0.1);

        if self.yaw_vel_rad.abs() > 1e-6 || self.pitch_vel_rad.abs() > 1e-6 {
            self.yaw_rad = wrap_angle(self.yaw_rad + self.yaw_vel_rad);
            self.pitch_rad =
                (self.pitch_rad + self.pitch_vel_rad).clamp(-PITCH_CLAMP_RAD, PITCH_CLAMP_RAD);
            self.yaw_vel_rad *= 1.0 - DAMPING;
            self.pitch_vel_rad *= 1.0 - DAMPING;
        } else {
            self.yaw_vel_rad = 0.0;
            self.pitch_vel_rad = 0.0;
        }

        let alpha = 1.0 - (-ZOOM_SMOOTHING * dt).exp();
        self.distance += (self.target_distance - self.distance) * alpha;
        self.distance = self.distance.clamp(MIN_DISTANCE, MAX_DISTANCE);
    }

    pub fn eye_position(&self) -> Vec3 {
        let dir = Vec3::new(
            self.pitch_rad.cos() * self.yaw_rad.cos(),
            self.pitch_rad.sin(),
            -self.pitch_rad.cos() * self.yaw_rad.sin(),
        );
        self.target + dir.scale(self.distance)
    }
}

fn wrap_angle(rad: f64) -> f64 {
    (rad + std::f64::consts::PI).rem_euclid(std::f64::consts::TAU) - std::f64::consts::PI
}

#[cfg(test)]
mod tests {
    use super::{MAX_DISTANCE, MIN_DISTANCE, OrbitCamera};

    #[test]
    fn default_eye_sits_on_plus_z() {
        let eye = OrbitCamera::default().eye_position();
        assert!(eye.x.abs() < 1e-12);
        assert!(eye.y.abs() < 1e-12);
        assert!((eye.z - 3.0).abs() < 1e-12);
    }

    #[test]
    fn zoom_respects_distance_clamp() {
        let mut cam = OrbitCamera::new();
        for _ in 0..200 {
            cam.zoom(-500.0);
            cam.update(1.0 / 60.0);
        }
        assert!(cam.distance >= MIN_DISTANCE - 1e-9);

        for _ in 0..200 {
            cam.zoom(500.0);
            cam.update(1.0 / 60.0);
        }
        assert!(cam.distance <= MAX_DISTANCE + 1e-9);
    }

    #[test]
    fn orbit_velocity_damps_out() {
        let mut cam = OrbitCamera::new();
        cam.orbit(40.0, 0.0, 800.0, 600.0);
        let yaw_after_drag = cam.yaw_rad;
        for _ in 0..600 {
            cam.update(1.0 / 60.0);
        }
        let drift = (cam.yaw_rad - yaw_after_drag).abs();
        // Eases out instead of continuing forever; the glide is bounded by
        // the geometric series of the damping factor.
        assert!(drift < 2.0);
        let settled = cam.yaw_rad;
        cam.update(1.0 / 60.0);
        assert!((cam.yaw_rad - settled).abs() < 1e-6);
    }

    #[test]
    fn pitch_is_clamped_near_the_poles() {
        let mut cam = OrbitCamera::new();
        cam.orbit(0.0, 1e6, 800.0, 600.0);
        assert!(cam.pitch_rad <= 1.55);
    }
}
