// Host-side tests for orbit limits, picking rays and the idle shake.

use glam::{Mat4, Vec3};
use tree_core::*;

#[test]
fn orbit_starts_at_configured_eye() {
    let orbit = OrbitCamera::default();
    assert!((orbit.eye() - CAMERA_START_EYE).length() < 1e-4);
    assert_eq!(orbit.target, Vec3::ZERO);
}

#[test]
fn zoom_is_clamped_to_distance_bounds() {
    let mut orbit = OrbitCamera::default();
    for _ in 0..100 {
        orbit.zoom(0.5);
    }
    assert_eq!(orbit.distance, ORBIT_MIN_DISTANCE);
    for _ in 0..100 {
        orbit.zoom(2.0);
    }
    assert_eq!(orbit.distance, ORBIT_MAX_DISTANCE);

    // nonsense factors leave the distance alone
    orbit.zoom(f32::NAN);
    orbit.zoom(-1.0);
    orbit.zoom(0.0);
    assert_eq!(orbit.distance, ORBIT_MAX_DISTANCE);
}

#[test]
fn polar_angle_is_clamped() {
    let mut orbit = OrbitCamera::default();
    orbit.rotate(0.0, 10.0);
    assert_eq!(orbit.polar, ORBIT_MAX_POLAR);
    orbit.rotate(0.0, -10.0);
    assert_eq!(orbit.polar, POLAR_EPSILON);
    // azimuth is free
    orbit.rotate(7.0, 0.0);
    assert!(orbit.eye().is_finite());
}

#[test]
fn pan_is_disabled() {
    assert!(!OrbitBounds::default().enable_pan);
}

#[test]
fn center_ray_points_at_target() {
    let camera = OrbitCamera::default().camera(1.5);
    let (origin, dir) = camera.ray_from_ndc(0.0, 0.0);
    assert!((origin - camera.eye).length() < 1e-4);
    let want = (camera.target - camera.eye).normalize();
    assert!((dir - want).length() < 1e-4);
    assert!((dir.length() - 1.0).abs() < 1e-5);
}

#[test]
fn shake_stays_within_max_angle() {
    let shake = CameraShake::default();
    let limit = shake.max_angle * shake.intensity + 1e-6;
    for i in 0..500 {
        let (y, p, r) = shake.angles(i as f32 * 0.13);
        assert!(y.abs() <= limit && p.abs() <= limit && r.abs() <= limit);
    }
    let still = CameraShake {
        intensity: 0.0,
        ..CameraShake::default()
    };
    let view = Mat4::look_at_rh(CAMERA_START_EYE, Vec3::ZERO, Vec3::Y);
    assert!(still.apply(view, 3.0).abs_diff_eq(view, 1e-6));
}

#[test]
fn config_values_are_clamped_on_entry() {
    let mut config = TreeConfig::default();
    assert!(config.is_within_bounds());
    for p in ConfigParam::ALL {
        let r = p.range();
        assert_eq!(config.set(p, r.max + 100.0), r.max);
        assert_eq!(config.set(p, r.min - 100.0), r.min);
        assert_eq!(config.set(p, f32::NAN), r.min);
        assert_eq!(ConfigParam::from_element_id(p.element_id()), Some(p));
    }
    assert!(config.is_within_bounds());
}

#[test]
fn ray_sphere_intersection_basic() {
    // Ray from origin pointing in +Z direction, sphere at z=5 radius 2
    let result = ray_sphere(Vec3::ZERO, Vec3::Z, Vec3::new(0.0, 0.0, 5.0), 2.0);
    let t = result.expect("hit");
    assert!((t - 3.0).abs() < 1e-5);
}

#[test]
fn ray_sphere_intersection_miss() {
    let result = ray_sphere(Vec3::ZERO, Vec3::X, Vec3::new(0.0, 0.0, 5.0), 2.0);
    assert!(result.is_none());
}

#[test]
fn ray_sphere_intersection_tangent() {
    // Ray grazes the sphere edge
    let result = ray_sphere(Vec3::ZERO, Vec3::Z, Vec3::new(2.0, 0.0, 5.0), 2.0);
    let t = result.expect("tangent hit");
    assert!((t - 5.0).abs() < 1e-4);
}

#[test]
fn ray_sphere_behind_origin_is_ignored() {
    let result = ray_sphere(Vec3::ZERO, Vec3::Z, Vec3::new(0.0, 0.0, -5.0), 2.0);
    assert!(result.is_none());
}

#[test]
fn picking_ray_follows_shaken_view() {
    let camera = OrbitCamera::default().camera(1.5);
    let shake = CameraShake::default();
    let t = 1.7;
    let view = shake.apply(camera.view_matrix(), t);

    let (origin, dir) = camera.ray_from_ndc_with_view(view, 0.0, 0.0);
    // shake rotates about the eye, so the ray still starts there
    assert!((origin - camera.eye).length() < 1e-3);
    let shaken_forward = view.inverse().transform_vector3(-Vec3::Z).normalize();
    assert!((dir - shaken_forward).length() < 1e-4);

    let (_, plain) = camera.ray_from_ndc(0.0, 0.0);
    assert!((dir - plain).length() > 1e-5);

    // an unshaken view gives the plain ray
    let (o2, d2) = camera.ray_from_ndc_with_view(camera.view_matrix(), 0.3, -0.2);
    let (o3, d3) = camera.ray_from_ndc(0.3, -0.2);
    assert!((o2 - o3).length() < 1e-5 && (d2 - d3).length() < 1e-5);
}
