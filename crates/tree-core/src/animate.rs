//! Per-frame transforms for every decoration.
//!
//! This runs once per rendered frame for every item, so it stays allocation
//! free: callers hand in reusable output vectors. All transforms produced here
//! are in the rotating group's local space.

use crate::config::{MotionOptions, TreeConfig};
use crate::constants::*;
use crate::item::{DecorationItem, DecorationKind, DecorationSet};
use glam::{EulerRot, Mat3, Mat4, Quat, Vec3};
use instant::Instant;

/// Largest frame step fed to the integrators (tab switches, breakpoints).
pub const MAX_FRAME_DT: f32 = 0.1;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameClock {
    /// Seconds since the scene mounted.
    pub elapsed: f32,
    /// Seconds since the previous frame.
    pub dt: f32,
}

/// Wall-clock source for [`FrameClock`].
pub struct FrameTimer {
    start: Instant,
    last: Instant,
}

impl FrameTimer {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            start: now,
            last: now,
        }
    }

    pub fn tick(&mut self) -> FrameClock {
        let now = Instant::now();
        let dt = (now - self.last).as_secs_f32().min(MAX_FRAME_DT);
        self.last = now;
        FrameClock {
            elapsed: (now - self.start).as_secs_f32(),
            dt,
        }
    }
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: f32,
}

impl Transform {
    #[inline]
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(Vec3::splat(self.scale), self.rotation, self.position)
    }

    /// Local +Z after rotation.
    #[inline]
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }
}

/// Rotation whose local +Z axis points from `position` at `target`.
///
/// Returns identity when the two points coincide.
pub fn billboard(position: Vec3, target: Vec3) -> Quat {
    let to_target = target - position;
    if to_target.length_squared() < 1e-12 {
        return Quat::IDENTITY;
    }
    let z = to_target.normalize();
    let up = if z.y.abs() > 0.999 { Vec3::Z } else { Vec3::Y };
    let x = up.cross(z).normalize();
    let y = z.cross(x);
    Quat::from_mat3(&Mat3::from_cols(x, y, z))
}

/// Frame-rate independent exponential approach of `current` toward `target`.
#[inline]
pub fn damp(current: f32, target: f32, rate: f32, dt: f32) -> f32 {
    let alpha = 1.0 - (-rate * dt.max(0.0)).exp();
    current + (target - current) * alpha
}

/// Yaw of the whole decoration group. Grows without wrapping.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GroupRotation {
    pub yaw: f32,
}

impl GroupRotation {
    #[inline]
    pub fn advance(&mut self, speed: f32, dt: f32) {
        self.yaw += speed * dt;
    }

    #[inline]
    pub fn rotation(&self) -> Quat {
        Quat::from_rotation_y(self.yaw)
    }

    #[inline]
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_rotation_y(self.yaw)
    }

    /// World-space point expressed in group-local space.
    #[inline]
    pub fn to_local(&self, world: Vec3) -> Vec3 {
        self.rotation().inverse() * world
    }

    #[inline]
    pub fn to_world(&self, local: Vec3) -> Vec3 {
        self.rotation() * local
    }
}

#[inline]
pub fn pulse_factor(time: f32, speed: f32, phase: f32) -> f32 {
    1.0 + (time * speed + phase).sin() * PULSE_AMPLITUDE
}

#[inline]
pub fn particle_drift(time: f32, phase: f32, scatter: f32) -> Vec3 {
    let sx = (time * DRIFT_FREQ_XZ + phase).sin() * scatter;
    let sy = (time * DRIFT_FREQ_Y + phase).cos() * scatter;
    Vec3::new(sx, sy, sx)
}

pub fn particle_transform(
    item: &DecorationItem,
    time: f32,
    config: &TreeConfig,
    options: MotionOptions,
    camera_local: Vec3,
) -> Transform {
    let (speed, is_center) = match item.kind {
        DecorationKind::Particle { speed, is_center } => (speed, is_center),
        DecorationKind::Photo => (0.0, false),
    };
    let mut position = item.base_position;
    if options.particle_drift {
        position += particle_drift(time, item.phase, config.scatter);
    }
    let mut scale = item.scale * config.deco_size;
    if is_center {
        scale *= CENTER_SCALE_MULTIPLIER;
    }
    if options.particle_pulse {
        scale *= pulse_factor(time, speed, item.phase);
    }
    Transform {
        position,
        rotation: billboard(position, camera_local),
        scale,
    }
}

/// Live state of one photo card between frames.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhotoMotion {
    pub scale: f32,
    pub drift_y: f32,
}

impl PhotoMotion {
    pub fn new(base_scale: f32) -> Self {
        Self {
            scale: base_scale,
            drift_y: 0.0,
        }
    }
}

#[inline]
fn float_phase(time: f32, id: u32) -> f32 {
    (time + id as f32) * FLOAT_SPEED / 4.0
}

/// Card-local float sway, applied inside the billboarded photo transform.
pub fn photo_wobble(time: f32, id: u32) -> Quat {
    let ft = float_phase(time, id);
    Quat::from_euler(
        EulerRot::XYZ,
        ft.cos() / 8.0 * FLOAT_ROTATION_INTENSITY,
        ft.sin() / 8.0 * FLOAT_ROTATION_INTENSITY,
        ft.sin() / 20.0 * FLOAT_ROTATION_INTENSITY,
    )
}

pub fn step_photo(
    motion: &mut PhotoMotion,
    item: &DecorationItem,
    hovered: bool,
    clock: FrameClock,
    config: &TreeConfig,
    camera_local: Vec3,
) -> Transform {
    let target = if hovered {
        item.scale * HOVER_SCALE_MULTIPLIER
    } else {
        item.scale
    };
    motion.scale = damp(motion.scale, target, SCALE_DAMPING_RATE, clock.dt);

    if config.scatter > 0.0 {
        motion.drift_y +=
            (clock.elapsed + item.id as f32).sin() * PHOTO_DRIFT_PER_FRAME * config.scatter;
    }

    let ft = float_phase(clock.elapsed, item.id);
    let bob = ft.sin() / 10.0 * FLOAT_INTENSITY;
    let position = item.base_position + Vec3::Y * (motion.drift_y + bob);
    Transform {
        position,
        rotation: billboard(position, camera_local),
        scale: motion.scale,
    }
}

pub struct Animator {
    pub options: MotionOptions,
    group: GroupRotation,
    photo_motion: Vec<PhotoMotion>,
    generation: Option<u64>,
}

impl Animator {
    pub fn new(options: MotionOptions) -> Self {
        Self {
            options,
            group: GroupRotation::default(),
            photo_motion: Vec::new(),
            generation: None,
        }
    }

    #[inline]
    pub fn group(&self) -> GroupRotation {
        self.group
    }

    pub fn photo_motion(&self) -> &[PhotoMotion] {
        &self.photo_motion
    }

    /// Reset per-photo state when a different set has been swapped in.
    pub fn sync(&mut self, set: &DecorationSet) {
        if self.generation == Some(set.generation) && self.photo_motion.len() == set.photos.len()
        {
            return;
        }
        self.photo_motion.clear();
        self.photo_motion
            .extend(set.photos.iter().map(|p| PhotoMotion::new(p.scale)));
        self.generation = Some(set.generation);
    }

    /// Advance one frame and write group-local transforms.
    pub fn frame(
        &mut self,
        set: &DecorationSet,
        clock: FrameClock,
        config: &TreeConfig,
        camera_world: Vec3,
        hovered: Option<u32>,
        particles_out: &mut Vec<Transform>,
        photos_out: &mut Vec<Transform>,
    ) {
        self.sync(set);
        self.group.advance(config.rotation_speed, clock.dt);
        let camera_local = self.group.to_local(camera_world);

        particles_out.clear();
        particles_out.extend(set.particles.iter().map(|p| {
            particle_transform(p, clock.elapsed, config, self.options, camera_local)
        }));

        photos_out.clear();
        for (item, motion) in set.photos.iter().zip(self.photo_motion.iter_mut()) {
            let is_hovered = hovered == Some(item.id);
            photos_out.push(step_photo(
                motion,
                item,
                is_hovered,
                clock,
                config,
                camera_local,
            ));
        }
    }
}

impl Default for Animator {
    fn default() -> Self {
        Self::new(MotionOptions::default())
    }
}
