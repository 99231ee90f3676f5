//! Camera description, bounded orbit controls and a gentle idle shake.
//!
//! These types avoid platform APIs and are used by both the web and native
//! front-ends to build view/projection matrices and picking rays.

use crate::constants::*;
use glam::{EulerRot, Mat4, Quat, Vec3, Vec4};

/// Simple right-handed camera description with perspective projection.
#[derive(Clone, Debug)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub aspect: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Camera {
    /// Compute the clip-space projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fovy_radians, self.aspect, self.znear, self.zfar)
    }
    /// Compute the view matrix that transforms world to view space.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// World-space ray through a point in normalized device coordinates.
    ///
    /// Returns `(ray_origin, ray_direction)`.
    pub fn ray_from_ndc(&self, ndc_x: f32, ndc_y: f32) -> (Vec3, Vec3) {
        self.ray_from_ndc_with_view(self.view_matrix(), ndc_x, ndc_y)
    }

    /// Same as [`Camera::ray_from_ndc`] but through an adjusted view matrix,
    /// e.g. one with [`CameraShake`] applied, so picks match what is drawn.
    pub fn ray_from_ndc_with_view(&self, view: Mat4, ndc_x: f32, ndc_y: f32) -> (Vec3, Vec3) {
        let inv = (self.projection_matrix() * view).inverse();
        let p_far = inv * Vec4::new(ndc_x, ndc_y, 1.0, 1.0);
        let p1: Vec3 = p_far.truncate() / p_far.w;
        let origin = view.inverse().transform_point3(Vec3::ZERO);
        (origin, (p1 - origin).normalize())
    }
}

/// Distance along a unit ray to the first hit on a sphere in front of the origin.
#[inline]
pub fn ray_sphere(ray_origin: Vec3, ray_dir: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    let oc = ray_origin - center;
    let b = oc.dot(ray_dir);
    let c = oc.dot(oc) - radius * radius;
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let t = -b - disc.sqrt();
    (t >= 0.0).then_some(t)
}

/// Limits applied to [`OrbitCamera`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrbitBounds {
    pub min_distance: f32,
    pub max_distance: f32,
    /// Largest angle from the +Y axis; keeps the camera from looking up from below.
    pub max_polar: f32,
    pub enable_pan: bool,
}

impl Default for OrbitBounds {
    fn default() -> Self {
        Self {
            min_distance: ORBIT_MIN_DISTANCE,
            max_distance: ORBIT_MAX_DISTANCE,
            max_polar: ORBIT_MAX_POLAR,
            enable_pan: false,
        }
    }
}

/// Spherical orbit around a fixed target.
#[derive(Clone, Debug, PartialEq)]
pub struct OrbitCamera {
    pub target: Vec3,
    pub distance: f32,
    /// Angle around +Y, measured from +Z toward +X.
    pub azimuth: f32,
    /// Angle from +Y.
    pub polar: f32,
    pub bounds: OrbitBounds,
}

impl OrbitCamera {
    pub fn from_eye(eye: Vec3, target: Vec3, bounds: OrbitBounds) -> Self {
        let offset = eye - target;
        let distance = offset.length().max(1e-4);
        let polar = (offset.y / distance).clamp(-1.0, 1.0).acos();
        let azimuth = offset.x.atan2(offset.z);
        let mut cam = Self {
            target,
            distance,
            azimuth,
            polar,
            bounds,
        };
        cam.clamp();
        cam
    }

    pub fn eye(&self) -> Vec3 {
        let s = self.polar.sin();
        self.target
            + Vec3::new(
                s * self.azimuth.sin(),
                self.polar.cos(),
                s * self.azimuth.cos(),
            ) * self.distance
    }

    /// Orbit by angle deltas in radians.
    pub fn rotate(&mut self, d_azimuth: f32, d_polar: f32) {
        self.azimuth += d_azimuth;
        self.polar += d_polar;
        self.clamp();
    }

    /// Multiply the distance by `factor` (< 1 zooms in).
    pub fn zoom(&mut self, factor: f32) {
        if factor.is_finite() && factor > 0.0 {
            self.distance *= factor;
        }
        self.clamp();
    }

    fn clamp(&mut self) {
        self.distance = self
            .distance
            .clamp(self.bounds.min_distance, self.bounds.max_distance);
        self.polar = self.polar.clamp(POLAR_EPSILON, self.bounds.max_polar);
    }

    pub fn camera(&self, aspect: f32) -> Camera {
        Camera {
            eye: self.eye(),
            target: self.target,
            up: Vec3::Y,
            aspect,
            fovy_radians: CAMERA_FOV_DEGREES.to_radians(),
            znear: CAMERA_ZNEAR,
            zfar: CAMERA_ZFAR,
        }
    }
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::from_eye(CAMERA_START_EYE, Vec3::ZERO, OrbitBounds::default())
    }
}

/// Small deterministic yaw/pitch/roll sway applied on top of the orbit view.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraShake {
    pub max_angle: f32,
    pub frequency: f32,
    pub intensity: f32,
}

impl Default for CameraShake {
    fn default() -> Self {
        Self {
            max_angle: SHAKE_MAX_ANGLE,
            frequency: SHAKE_FREQUENCY,
            intensity: SHAKE_INTENSITY,
        }
    }
}

impl CameraShake {
    /// `(yaw, pitch, roll)` at `time`, each within `max_angle * intensity`.
    pub fn angles(&self, time: f32) -> (f32, f32, f32) {
        let w = std::f32::consts::TAU * self.frequency * time;
        // incommensurate partials so the motion does not visibly loop
        let n = |a: f32, b: f32| ((w * a).sin() * 0.6 + (w * b + 1.3).sin() * 0.4);
        let amp = self.max_angle * self.intensity;
        (n(1.0, 2.31) * amp, n(0.87, 1.93) * amp, n(1.13, 2.71) * amp)
    }

    /// View matrix with the shake applied in view space.
    pub fn apply(&self, view: Mat4, time: f32) -> Mat4 {
        let (yaw, pitch, roll) = self.angles(time);
        Mat4::from_quat(Quat::from_euler(EulerRot::YXZ, yaw, pitch, roll)) * view
    }
}
