//! Scene assembly: lights, backdrop, the rotating decoration group and the
//! per-frame instance batches handed to the renderer.

use crate::animate::{billboard, photo_wobble, Animator, FrameClock, Transform};
use crate::camera::{ray_sphere, Camera, OrbitBounds};
use crate::config::{MotionOptions, TreeConfig};
use crate::constants::*;
use crate::item::{DecorationItem, DecorationSet};
use crate::layout::{compute_star_field, layout_rng};
use crate::quality::QualityTier;
use glam::{Mat4, Vec3};
use rand::rngs::StdRng;
use smallvec::SmallVec;
use std::sync::Arc;

/// Quad shading mode, read by the decoration shader from `params.x`.
pub const SHAPE_SOFT_DISC: f32 = 0.0;
pub const SHAPE_CARD: f32 = 1.0;
pub const SHAPE_GLOW: f32 = 2.0;

/// One instanced quad: model matrix, tint, and shading params.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct InstanceData {
    pub model: [[f32; 4]; 4],
    pub color: [f32; 4],
    /// x: shape, y: how strongly scene lights apply.
    pub params: [f32; 4],
}

impl InstanceData {
    #[inline]
    pub fn new(model: Mat4, color: [f32; 4], shape: f32, lit: f32) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            color,
            params: [shape, lit, 0.0, 0.0],
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointLight {
    pub position: Vec3,
    pub color: [f32; 3],
    pub intensity: f32,
    /// Cut-off distance; 0 means unbounded.
    pub distance: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Lighting {
    pub ambient: f32,
    pub points: SmallVec<[PointLight; 4]>,
}

pub const MAX_POINT_LIGHTS: usize = 3;

impl Lighting {
    pub fn for_tier(tier: QualityTier) -> Self {
        let p = tier.profile();
        let mut points = SmallVec::new();
        points.push(PointLight {
            position: KEY_LIGHT_POSITION,
            color: KEY_LIGHT_COLOR,
            intensity: p.point_intensity,
            distance: 0.0,
        });
        points.push(PointLight {
            position: FILL_LIGHT_POSITION,
            color: FILL_LIGHT_COLOR,
            intensity: p.point_intensity,
            distance: 0.0,
        });
        points.push(PointLight {
            position: Vec3::ZERO,
            color: GLOW_LIGHT_COLOR,
            intensity: p.glow_intensity,
            distance: GLOW_LIGHT_DISTANCE,
        });
        Self {
            ambient: p.ambient_intensity,
            points,
        }
    }
}

/// Uniform block shared by the decoration shader (`decor.wgsl`).
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SceneUniforms {
    pub view_proj: [[f32; 4]; 4],
    /// xyz: camera eye, w: elapsed time.
    pub camera_time: [f32; 4],
    /// x: ambient intensity, y: glow strength, z: light count.
    pub ambient: [f32; 4],
    /// xyz: position, w: intensity.
    pub light_pos: [[f32; 4]; MAX_POINT_LIGHTS],
    /// rgb: color, w: distance (0 = unbounded).
    pub light_color: [[f32; 4]; MAX_POINT_LIGHTS],
}

#[derive(Default, Debug)]
pub struct FrameBatches {
    pub particles: Vec<InstanceData>,
    pub glows: Vec<InstanceData>,
    pub photos: Vec<InstanceData>,
}

impl FrameBatches {
    pub fn total(&self) -> usize {
        self.particles.len() + self.glows.len() + self.photos.len()
    }
}

#[derive(Debug)]
pub struct Backdrop {
    pub clear_color: [f64; 4],
    pub stars: Vec<InstanceData>,
}

impl Backdrop {
    fn build(count: usize, rng: &mut StdRng) -> Self {
        let stars = compute_star_field(count, rng)
            .into_iter()
            .map(|p| {
                let m = Mat4::from_scale_rotation_translation(
                    Vec3::splat(STAR_SCALE),
                    billboard(p, Vec3::ZERO),
                    p,
                );
                InstanceData::new(m, [1.0, 1.0, 1.0, 0.9], SHAPE_SOFT_DISC, 0.0)
            })
            .collect();
        Self {
            clear_color: [0.0, 0.0, 0.0, 1.0],
            stars,
        }
    }
}

pub struct SceneComposer {
    tier: QualityTier,
    lighting: Lighting,
    backdrop: Backdrop,
    orbit_bounds: OrbitBounds,
    photo_urls: Vec<String>,
    set: Arc<DecorationSet>,
    generation: u64,
    animator: Animator,
    rng: StdRng,
    particle_tf: Vec<Transform>,
    photo_tf: Vec<Transform>,
    /// Generation of the set `photo_tf` was computed from.
    photo_tf_generation: Option<u64>,
    photo_order: Vec<(f32, usize)>,
    batches: FrameBatches,
}

impl SceneComposer {
    pub fn new<S: AsRef<str>>(
        urls: &[S],
        tier: QualityTier,
        options: MotionOptions,
        seed: Option<u64>,
    ) -> Self {
        let mut rng = layout_rng(seed);
        let photo_urls: Vec<String> = urls.iter().map(|u| u.as_ref().to_owned()).collect();
        let set = Arc::new(DecorationSet::build(&photo_urls, tier, &mut rng, 1));
        let backdrop = Backdrop::build(tier.profile().star_count, &mut rng);
        log::info!(
            "[scene] composed tier={} particles={} photos={} stars={}",
            tier.name(),
            set.particles.len(),
            set.photos.len(),
            backdrop.stars.len()
        );
        Self {
            tier,
            lighting: Lighting::for_tier(tier),
            backdrop,
            orbit_bounds: OrbitBounds::default(),
            photo_urls,
            set,
            generation: 1,
            animator: Animator::new(options),
            rng,
            particle_tf: Vec::new(),
            photo_tf: Vec::new(),
            photo_tf_generation: None,
            photo_order: Vec::new(),
            batches: FrameBatches::default(),
        }
    }

    #[inline]
    pub fn tier(&self) -> QualityTier {
        self.tier
    }

    pub fn lighting(&self) -> &Lighting {
        &self.lighting
    }

    pub fn backdrop(&self) -> &Backdrop {
        &self.backdrop
    }

    pub fn orbit_bounds(&self) -> OrbitBounds {
        self.orbit_bounds
    }

    pub fn decorations(&self) -> &Arc<DecorationSet> {
        &self.set
    }

    pub fn photo_urls(&self) -> &[String] {
        &self.photo_urls
    }

    pub fn motion_options(&self) -> MotionOptions {
        self.animator.options
    }

    pub fn set_motion_options(&mut self, options: MotionOptions) {
        self.animator.options = options;
    }

    /// Replace the photo list. Particles are kept; the set is swapped whole.
    pub fn set_photos<S: AsRef<str>>(&mut self, urls: &[S]) {
        self.photo_urls = urls.iter().map(|u| u.as_ref().to_owned()).collect();
        self.generation += 1;
        self.set = Arc::new(self.set.with_photos(&self.photo_urls, self.generation));
        log::info!("[scene] photo list replaced: {} photos", self.set.photos.len());
    }

    /// Rebuild every layout (particles, photos, stars, lights) for `tier`.
    pub fn set_tier(&mut self, tier: QualityTier) {
        if tier == self.tier {
            return;
        }
        self.tier = tier;
        self.generation += 1;
        self.set = Arc::new(DecorationSet::build(
            &self.photo_urls,
            tier,
            &mut self.rng,
            self.generation,
        ));
        self.backdrop = Backdrop::build(tier.profile().star_count, &mut self.rng);
        self.lighting = Lighting::for_tier(tier);
        log::info!(
            "[scene] re-laid out for tier={} particles={} stars={}",
            tier.name(),
            self.set.particles.len(),
            self.backdrop.stars.len()
        );
    }

    #[inline]
    pub fn group_yaw(&self) -> f32 {
        self.animator.group().yaw
    }

    /// Animate one frame and pack the instance batches.
    pub fn frame(
        &mut self,
        clock: FrameClock,
        config: &TreeConfig,
        camera_eye: Vec3,
        hovered: Option<u32>,
    ) -> &FrameBatches {
        // snapshot; a swap lands on the next frame
        let set = Arc::clone(&self.set);
        self.animator.frame(
            &set,
            clock,
            config,
            camera_eye,
            hovered,
            &mut self.particle_tf,
            &mut self.photo_tf,
        );
        self.photo_tf_generation = Some(set.generation);
        let group = self.animator.group().matrix();

        let outer_alpha = (PARTICLE_BASE_ALPHA * config.deco_brightness).min(2.0);
        self.batches.particles.clear();
        for (item, tf) in set.particles.iter().zip(&self.particle_tf) {
            let alpha = if item.is_center() { 1.0 } else { outer_alpha };
            let quad = Mat4::from_scale(Vec3::splat(PARTICLE_QUAD_SIZE));
            self.batches.particles.push(InstanceData::new(
                group * tf.matrix() * quad,
                [1.0, 1.0, 1.0, alpha],
                SHAPE_SOFT_DISC,
                0.0,
            ));
        }

        let glow_alpha = (GLOW_BASE_ALPHA * config.glow_strength).min(1.0);
        let glow_local = Mat4::from_translation(Vec3::new(0.0, 0.0, -GLOW_BACK_OFFSET))
            * Mat4::from_scale(Vec3::splat(GLOW_CARD_RATIO));
        // far to near so translucent card edges blend over what is behind them
        self.photo_order.clear();
        self.photo_order.extend(self.photo_tf.iter().enumerate().map(|(i, tf)| {
            let world = group.transform_point3(tf.position);
            (world.distance_squared(camera_eye), i)
        }));
        self.photo_order
            .sort_unstable_by(|a, b| b.0.total_cmp(&a.0));

        self.batches.glows.clear();
        self.batches.photos.clear();
        for &(_, i) in &self.photo_order {
            let (item, tf) = (&set.photos[i], &self.photo_tf[i]);
            let wobble = Mat4::from_quat(photo_wobble(clock.elapsed, item.id));
            let model = group * tf.matrix() * wobble;
            self.batches.glows.push(InstanceData::new(
                model * glow_local,
                [GLOW_COLOR[0], GLOW_COLOR[1], GLOW_COLOR[2], glow_alpha],
                SHAPE_GLOW,
                0.0,
            ));
            let tint = if hovered == Some(item.id) {
                [1.0, 1.0, 1.0]
            } else {
                let rgb = hsv_to_rgb(item.tint_hue(), PHOTO_TINT_SATURATION, 1.0);
                rgb.map(|c| c * config.photo_brightness)
            };
            self.batches.photos.push(InstanceData::new(
                model,
                [tint[0], tint[1], tint[2], 1.0],
                SHAPE_CARD,
                1.0,
            ));
        }
        &self.batches
    }

    pub fn batches(&self) -> &FrameBatches {
        &self.batches
    }

    /// World-space pick spheres `(photo id, center, radius)` for the last frame.
    ///
    /// Empty when the set was swapped after that frame, since the stored
    /// transforms belong to the previous set.
    pub fn photo_pick_spheres(&self) -> impl Iterator<Item = (u32, Vec3, f32)> + '_ {
        let group = self.animator.group();
        let fresh = self.photo_tf_generation == Some(self.set.generation);
        let photos: &[DecorationItem] = if fresh { &self.set.photos } else { &[] };
        photos
            .iter()
            .zip(&self.photo_tf)
            .map(move |(item, tf)| {
                (
                    item.id,
                    group.to_world(tf.position),
                    tf.scale * PICK_RADIUS_FACTOR,
                )
            })
    }

    /// Nearest photo whose pick sphere the world-space ray hits.
    pub fn pick_photo(&self, ray_origin: Vec3, ray_dir: Vec3) -> Option<u32> {
        self.photo_pick_spheres()
            .filter_map(|(id, center, radius)| {
                ray_sphere(ray_origin, ray_dir, center, radius).map(|t| (id, t))
            })
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(id, _)| id)
    }

    pub fn uniforms(
        &self,
        camera: &Camera,
        view: Mat4,
        clock: FrameClock,
        config: &TreeConfig,
    ) -> SceneUniforms {
        let mut light_pos = [[0.0; 4]; MAX_POINT_LIGHTS];
        let mut light_color = [[0.0; 4]; MAX_POINT_LIGHTS];
        for (i, l) in self.lighting.points.iter().take(MAX_POINT_LIGHTS).enumerate() {
            light_pos[i] = [l.position.x, l.position.y, l.position.z, l.intensity];
            light_color[i] = [l.color[0], l.color[1], l.color[2], l.distance];
        }
        SceneUniforms {
            view_proj: (camera.projection_matrix() * view).to_cols_array_2d(),
            camera_time: [camera.eye.x, camera.eye.y, camera.eye.z, clock.elapsed],
            ambient: [
                self.lighting.ambient,
                config.glow_strength,
                self.lighting.points.len().min(MAX_POINT_LIGHTS) as f32,
                0.0,
            ],
            light_pos,
            light_color,
        }
    }
}

#[inline]
pub fn bloom_strength(config: &TreeConfig) -> f32 {
    config.glow_strength * BLOOM_PER_GLOW
}

pub fn hsv_to_rgb(h: f32, s: f32, v: f32) -> [f32; 3] {
    let h6 = (h.rem_euclid(1.0)) * 6.0;
    let c = v * s;
    let x = c * (1.0 - ((h6 % 2.0) - 1.0).abs());
    let (r, g, b) = match h6 as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    let m = v - c;
    [r + m, g + m, b + m]
}
