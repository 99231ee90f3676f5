use glam::Vec3;

// Shared layout/animation tuning constants used by both web and native frontends.

// Outer particle spiral
pub const PARTICLE_SPIRAL_TURNS_PI: f32 = 30.0; // angle = t * 30π
pub const PARTICLE_SPIRAL_RADIUS: f32 = 6.0;
pub const PARTICLE_RADIUS_JITTER: f32 = 2.0;
pub const PARTICLE_TOP_Y: f32 = 8.0;
pub const PARTICLE_HEIGHT_SPAN: f32 = 14.0;
pub const PARTICLE_HEIGHT_JITTER: f32 = 2.0;
pub const PARTICLE_SCALE_MIN: f32 = 0.2;
pub const PARTICLE_SCALE_SPAN: f32 = 0.5;
pub const PARTICLE_SPEED_MIN: f32 = 0.5;
pub const PARTICLE_SPEED_SPAN: f32 = 0.5;

// Dense center column
pub const CENTER_RADIUS: f32 = 1.6;
pub const CENTER_Y_MIN: f32 = -5.0;
pub const CENTER_Y_MAX: f32 = 7.0;
pub const CENTER_SCALE_MULTIPLIER: f32 = 1.8; // centers render larger and undimmed

// Photo spiral (cone)
pub const PHOTO_SPIRAL_TURNS: f32 = 8.0;
pub const PHOTO_TOP_Y: f32 = 7.0;
pub const PHOTO_HEIGHT_SPAN: f32 = 12.0;
pub const PHOTO_INNER_RADIUS: f32 = 1.0;
pub const PHOTO_RADIUS_SPAN: f32 = 5.0;

// Star backdrop
pub const STAR_RADIUS: f32 = 100.0;
pub const STAR_DEPTH: f32 = 50.0;
pub const STAR_SCALE: f32 = 0.35;

// Particle motion
pub const DRIFT_FREQ_XZ: f32 = 0.5;
pub const DRIFT_FREQ_Y: f32 = 0.3;
pub const PULSE_AMPLITUDE: f32 = 0.3;

// Photo motion
pub const HOVER_SCALE_MULTIPLIER: f32 = 1.5;
pub const SCALE_DAMPING_RATE: f32 = 8.0; // 1/s
pub const PHOTO_DRIFT_PER_FRAME: f32 = 0.002; // scaled by scatter
pub const FLOAT_SPEED: f32 = 2.0;
pub const FLOAT_INTENSITY: f32 = 0.5;
pub const FLOAT_ROTATION_INTENSITY: f32 = 0.1;
pub const PICK_RADIUS_FACTOR: f32 = 0.7; // pick sphere radius per unit of card scale

// Photo card geometry (unit quad scaled per instance)
pub const GLOW_CARD_RATIO: f32 = 1.1;
pub const GLOW_BACK_OFFSET: f32 = 0.05;
pub const PARTICLE_QUAD_SIZE: f32 = 0.2;

// Material tuning
pub const PARTICLE_BASE_ALPHA: f32 = 0.8;
pub const GLOW_BASE_ALPHA: f32 = 0.3;
pub const GLOW_COLOR: [f32; 3] = [0.753, 0.149, 0.827]; // #c026d3
pub const PHOTO_TINT_SATURATION: f32 = 0.18;

// Lights
pub const KEY_LIGHT_POSITION: Vec3 = Vec3::new(10.0, 10.0, 10.0);
pub const KEY_LIGHT_COLOR: [f32; 3] = [0.847, 0.706, 0.996]; // #d8b4fe
pub const FILL_LIGHT_POSITION: Vec3 = Vec3::new(-10.0, -10.0, -5.0);
pub const FILL_LIGHT_COLOR: [f32; 3] = [0.298, 0.114, 0.584]; // #4c1d95
pub const GLOW_LIGHT_COLOR: [f32; 3] = [0.941, 0.671, 0.988]; // #f0abfc
pub const GLOW_LIGHT_DISTANCE: f32 = 10.0;

// Camera
pub const CAMERA_START_EYE: Vec3 = Vec3::new(0.0, 2.0, 18.0);
pub const CAMERA_FOV_DEGREES: f32 = 50.0;
pub const CAMERA_ZNEAR: f32 = 0.1;
pub const CAMERA_ZFAR: f32 = 400.0;
pub const ORBIT_MIN_DISTANCE: f32 = 5.0;
pub const ORBIT_MAX_DISTANCE: f32 = 30.0;
pub const ORBIT_MAX_POLAR: f32 = std::f32::consts::PI / 1.5;
pub const POLAR_EPSILON: f32 = 1e-3;

// Camera shake
pub const SHAKE_MAX_ANGLE: f32 = 0.05;
pub const SHAKE_FREQUENCY: f32 = 0.1;
pub const SHAKE_INTENSITY: f32 = 0.5;

// Post-processing
pub const BLOOM_THRESHOLD: f32 = 0.6;
pub const BLOOM_PER_GLOW: f32 = 0.6; // bloom strength = glow * this
pub const TONE_EXPOSURE: f32 = 1.5;

// Renderer health
pub const INIT_TIMEOUT_MS: u32 = 2000;
pub const HEALTH_POLL_MS: u32 = 1000;
