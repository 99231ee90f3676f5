//! Static placement of particles, photos and backdrop stars.
//!
//! Everything here is computed once per photo-list or tier change; the
//! animator only ever reads these base positions. Randomness is injected so
//! callers choose between an entropy-seeded generator and a fixed seed.

use crate::constants::*;
use crate::quality::QualityTier;
use glam::Vec3;
use rand::prelude::*;
use std::f32::consts::{PI, TAU};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParticleLayout {
    pub position: Vec3,
    pub scale: f32,
    pub speed: f32,
    pub phase: f32,
    pub is_center: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PhotoLayout {
    pub position: Vec3,
    pub scale: f32,
}

/// Layout random source: reproducible when seeded, entropy-seeded otherwise.
pub fn layout_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    }
}

#[inline]
fn on_circle(angle: f32, radius: f32, y: f32) -> Vec3 {
    Vec3::new(angle.cos() * radius, y, angle.sin() * radius)
}

/// Outer cone spiral followed by the dense center column.
///
/// The count is fixed by the tier profile (`outer_particles +
/// center_particles`), so `_requested` never changes the result; sizes are
/// pre-multiplied by the tier's particle size.
pub fn compute_particle_layout<R: Rng>(
    _requested: usize,
    tier: QualityTier,
    rng: &mut R,
) -> Vec<ParticleLayout> {
    let profile = tier.profile();
    let outer = profile.outer_particles;
    let mut out = Vec::with_capacity(profile.particle_count());

    for i in 0..outer {
        let t = i as f32 / outer as f32;
        let angle = t * PARTICLE_SPIRAL_TURNS_PI * PI + rng.gen::<f32>() * TAU;
        let radius = t * PARTICLE_SPIRAL_RADIUS + rng.gen::<f32>() * PARTICLE_RADIUS_JITTER;
        let y = PARTICLE_TOP_Y - t * PARTICLE_HEIGHT_SPAN
            + (rng.gen::<f32>() - 0.5) * PARTICLE_HEIGHT_JITTER;
        out.push(ParticleLayout {
            position: on_circle(angle, radius, y),
            scale: random_particle_scale(rng) * profile.particle_size,
            speed: PARTICLE_SPEED_MIN + rng.gen::<f32>() * PARTICLE_SPEED_SPAN,
            phase: rng.gen::<f32>() * TAU,
            is_center: false,
        });
    }

    for _ in 0..profile.center_particles {
        let angle = rng.gen::<f32>() * TAU;
        // uniform over the disc
        let radius = rng.gen::<f32>().sqrt() * CENTER_RADIUS;
        let y = rng.gen_range(CENTER_Y_MIN..CENTER_Y_MAX);
        out.push(ParticleLayout {
            position: on_circle(angle, radius, y),
            scale: random_particle_scale(rng) * profile.particle_size,
            speed: PARTICLE_SPEED_MIN + rng.gen::<f32>() * PARTICLE_SPEED_SPAN,
            phase: rng.gen::<f32>() * TAU,
            is_center: true,
        });
    }
    out
}

#[inline]
fn random_particle_scale<R: Rng>(rng: &mut R) -> f32 {
    rng.gen::<f32>() * PARTICLE_SCALE_SPAN + PARTICLE_SCALE_MIN
}

/// Photo placement for spiral parameter `t` in `[0, 1)`.
#[inline]
pub fn photo_spiral_point(t: f32) -> Vec3 {
    let angle = t * TAU * PHOTO_SPIRAL_TURNS;
    let y = PHOTO_TOP_Y - t * PHOTO_HEIGHT_SPAN;
    let radius = PHOTO_INNER_RADIUS + t * PHOTO_RADIUS_SPAN;
    on_circle(angle, radius, y)
}

/// One entry per URL, in input order, on an 8-turn descending cone.
pub fn compute_photo_layout<S: AsRef<str>>(urls: &[S], tier: QualityTier) -> Vec<PhotoLayout> {
    if urls.is_empty() {
        return Vec::new();
    }
    let m = urls.len() as f32;
    let scale = tier.profile().photo_scale;
    (0..urls.len())
        .map(|i| PhotoLayout {
            position: photo_spiral_point(i as f32 / m),
            scale,
        })
        .collect()
}

/// Backdrop stars on a thick spherical shell around the tree.
pub fn compute_star_field<R: Rng>(count: usize, rng: &mut R) -> Vec<Vec3> {
    (0..count)
        .map(|_| {
            let r = STAR_RADIUS + rng.gen::<f32>() * STAR_DEPTH;
            // uniform direction on the sphere
            let z: f32 = rng.gen_range(-1.0..1.0);
            let theta = rng.gen::<f32>() * TAU;
            let s = (1.0 - z * z).max(0.0).sqrt();
            Vec3::new(s * theta.cos(), z, s * theta.sin()) * r
        })
        .collect()
}
