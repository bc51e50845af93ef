//! World/screen projection and plane intersection

use crate::camera::Camera;
use stagehand_core::Vec3;

/// Project a world-space point to screen pixels.
/// Returns None if the point is behind the camera.
pub fn world_to_screen(camera: &Camera, screen_size: [f32; 2], pos: Vec3) -> Option<[f32; 2]> {
    let vp = camera.view_projection_matrix();
    let clip_x = vp[0][0] * pos.x + vp[1][0] * pos.y + vp[2][0] * pos.z + vp[3][0];
    let clip_y = vp[0][1] * pos.x + vp[1][1] * pos.y + vp[2][1] * pos.z + vp[3][1];
    let clip_w = vp[0][3] * pos.x + vp[1][3] * pos.y + vp[2][3] * pos.z + vp[3][3];

    if clip_w <= 0.001 {
        return None;
    }

    let ndc_x = clip_x / clip_w;
    let ndc_y = clip_y / clip_w;

    Some([
        (ndc_x + 1.0) * 0.5 * screen_size[0],
        (1.0 - ndc_y) * 0.5 * screen_size[1],
    ])
}

/// Intersect a ray with the plane `dot(n, p) = d`.
/// Returns the distance along the ray, or None if the ray is parallel to
/// the plane or the plane is behind the origin.
pub fn ray_plane_intersect(origin: Vec3, dir: Vec3, normal: Vec3, d: f32) -> Option<f32> {
    let denom = normal.dot(&dir);
    if denom.abs() < 1e-6 {
        return None;
    }
    let t = (d - normal.dot(&origin)) / denom;
    (t >= 0.0).then_some(t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CameraSettings;

    #[test]
    fn test_target_projects_to_center() {
        let mut camera = Camera::free(Vec3::new(0.0, 10.0, 10.0), Vec3::ZERO, &CameraSettings::default());
        camera.aspect = 2.0;
        let p = world_to_screen(&camera, [800.0, 400.0], Vec3::ZERO).unwrap();
        assert!((p[0] - 400.0).abs() < 1e-2);
        assert!((p[1] - 200.0).abs() < 1e-2);
    }

    #[test]
    fn test_point_behind_camera() {
        let camera = Camera::free(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO, &CameraSettings::default());
        assert!(world_to_screen(&camera, [100.0, 100.0], Vec3::new(0.0, 0.0, 20.0)).is_none());
    }

    #[test]
    fn test_ray_plane() {
        let t = ray_plane_intersect(Vec3::new(0.0, 5.0, 0.0), Vec3::DOWN, Vec3::UP, 0.0).unwrap();
        assert!((t - 5.0).abs() < 1e-6);
        assert!(ray_plane_intersect(Vec3::new(0.0, 5.0, 0.0), Vec3::UP, Vec3::UP, 0.0).is_none());
        assert!(ray_plane_intersect(Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0), Vec3::UP, 0.0).is_none());
    }
}
