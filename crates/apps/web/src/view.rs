//! Camera matrix math for the 3D view.
//!
//! Column-major `[[f32; 4]; 4]` matrices, right-handed, depth in [0, 1].

use foundation::math::Vec3;
use scene::camera::OrbitCamera;

pub const NEAR_PLANE: f64 = 0.1;
pub const FAR_PLANE: f64 = 1000.0;

/// View-projection matrix for the current orbit camera state.
pub fn view_proj_matrix(camera: &OrbitCamera, aspect: f64) -> [[f32; 4]; 4] {
    let eye = camera.eye_position();
    let view = mat4_look_at_rh(eye, camera.target, Vec3::new(0.0, 1.0, 0.0));
    let proj = mat4_perspective_rh_z0(camera.fov_y_rad, aspect, NEAR_PLANE, FAR_PLANE);
    mat4_mul(proj, view)
}

pub fn mat4_mul(a: [[f32; 4]; 4], b: [[f32; 4]; 4]) -> [[f32; 4]; 4] {
    let mut c = [[0.0f32; 4]; 4];
    for col in 0..4 {
        for row in 0..4 {
            c[col][row] = a[0][row] * b[col][0]
                + a[1][row] * b[col][1]
                + a[2][row] * b[col][2]
                + a[3][row] * b[col][3];
        }
    }
    c
}

pub fn mat4_mul_vec4(m: [[f32; 4]; 4], v: [f32; 4]) -> [f32; 4] {
    [
        m[0][0] * v[0] + m[1][0] * v[1] + m[2][0] * v[2] + m[3][0] * v[3],
        m[0][1] * v[0] + m[1][1] * v[1] + m[2][1] * v[2] + m[3][1] * v[3],
        m[0][2] * v[0] + m[1][2] * v[1] + m[2][2] * v[2] + m[3][2] * v[3],
        m[0][3] * v[0] + m[1][3] * v[1] + m[2][3] * v[2] + m[3][3] * v[3],
    ]
}

fn mat4_perspective_rh_z0(fov_y_rad: f64, aspect: f64, near: f64, far: f64) -> [[f32; 4]; 4] {
    let f = 1.0 / (0.5 * fov_y_rad).tan();
    let m00 = (f / aspect) as f32;
    let m11 = f as f32;
    let m22 = (far / (near - far)) as f32;
    let m23 = ((near * far) / (near - far)) as f32;

    [
        [m00, 0.0, 0.0, 0.0],
        [0.0, m11, 0.0, 0.0],
        [0.0, 0.0, m22, -1.0],
        [0.0, 0.0, m23, 0.0],
    ]
}

fn mat4_look_at_rh(eye: Vec3, target: Vec3, up: Vec3) -> [[f32; 4]; 4] {
    let f = (target - eye).normalized().unwrap_or(Vec3::new(0.0, 0.0, -1.0));
    let s = f.cross(up).normalized().unwrap_or(Vec3::new(1.0, 0.0, 0.0));
    let u = s.cross(f);

    let ex = -s.dot(eye);
    let ey = -u.dot(eye);
    let ez = f.dot(eye);

    [
        [s.x as f32, u.x as f32, (-f.x) as f32, 0.0],
        [s.y as f32, u.y as f32, (-f.y) as f32, 0.0],
        [s.z as f32, u.z as f32, (-f.z) as f32, 0.0],
        [ex as f32, ey as f32, ez as f32, 1.0],
    ]
}

#[cfg(test)]
mod tests {
    use super::{mat4_mul_vec4, view_proj_matrix};
    use scene::camera::OrbitCamera;

    #[test]
    fn globe_center_projects_to_screen_center() {
        let camera = OrbitCamera::default();
        let vp = view_proj_matrix(&camera, 4.0 / 3.0);
        let clip = mat4_mul_vec4(vp, [0.0, 0.0, 0.0, 1.0]);
        assert!(clip[3] > 0.0);
        assert!((clip[0] / clip[3]).abs() < 1e-6);
        assert!((clip[1] / clip[3]).abs() < 1e-6);
    }

    #[test]
    fn front_of_globe_is_inside_the_depth_range() {
        let camera = OrbitCamera::default();
        let vp = view_proj_matrix(&camera, 1.0);
        // Camera sits on +Z at distance 3; the near face of the unit globe
        // is at z = 1, i.e. 2 units in front of the eye.
        let clip = mat4_mul_vec4(vp, [0.0, 0.0, 1.0, 1.0]);
        let depth = clip[2] / clip[3];
        assert!(depth > 0.0 && depth < 1.0, "depth {depth}");
    }

    #[test]
    fn points_above_center_land_in_the_upper_half() {
        let camera = OrbitCamera::default();
        let vp = view_proj_matrix(&camera, 1.0);
        let clip = mat4_mul_vec4(vp, [0.0, 0.5, 1.0, 1.0]);
        assert!(clip[1] / clip[3] > 0.0);
    }
}
