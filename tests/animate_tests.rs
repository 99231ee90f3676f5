// Host-side tests for per-frame motion: damping, billboarding, hover scale.

use glam::Vec3;
use tree_core::*;

fn clock(elapsed: f32, dt: f32) -> FrameClock {
    FrameClock { elapsed, dt }
}

#[test]
fn damp_converges_without_overshoot() {
    let target: f32 = 1.8;
    let mut v: f32 = 1.2;
    let mut prev_gap = (target - v).abs();
    for _ in 0..240 {
        v = damp(v, target, SCALE_DAMPING_RATE, 1.0 / 60.0);
        assert!(v <= target);
        let gap = (target - v).abs();
        assert!(gap <= prev_gap);
        prev_gap = gap;
    }
    assert!((v - target).abs() < 1e-3);

    // a huge step lands on the target, never past it
    assert!(damp(0.0, 1.0, SCALE_DAMPING_RATE, 10.0) <= 1.0);
    // negative dt is treated as no time passing
    assert_eq!(damp(0.5, 1.0, SCALE_DAMPING_RATE, -1.0), 0.5);
}

#[test]
fn billboard_forward_points_at_target() {
    let cases = [
        (Vec3::new(3.0, 1.0, -2.0), Vec3::new(0.0, 2.0, 18.0)),
        (Vec3::new(-4.0, 5.0, 0.5), Vec3::new(10.0, -3.0, 2.0)),
        (Vec3::ZERO, Vec3::new(0.0, 20.0, 0.0)),
    ];
    for (pos, target) in cases {
        let q = billboard(pos, target);
        let fwd = q * Vec3::Z;
        let want = (target - pos).normalize();
        assert!((fwd - want).length() < 1e-4, "{fwd:?} vs {want:?}");
    }
    assert_eq!(billboard(Vec3::ONE, Vec3::ONE), glam::Quat::IDENTITY);
}

#[test]
fn group_rotation_round_trips_points() {
    let mut g = GroupRotation::default();
    g.advance(0.2, 3.0);
    assert!((g.yaw - 0.6).abs() < 1e-6);
    let p = Vec3::new(1.0, 2.0, 3.0);
    assert!((g.to_world(g.to_local(p)) - p).length() < 1e-5);
}

#[test]
fn pulse_stays_within_amplitude() {
    for i in 0..100 {
        let f = pulse_factor(i as f32 * 0.37, 0.8, 1.1);
        assert!(f >= 1.0 - PULSE_AMPLITUDE - 1e-6 && f <= 1.0 + PULSE_AMPLITUDE + 1e-6);
    }
}

#[test]
fn still_particles_hold_position_and_scale() {
    let set = DecorationSet::build(
        &Vec::<String>::new(),
        QualityTier::Low,
        &mut layout_rng(Some(11)),
        1,
    );
    let config = TreeConfig {
        scatter: 2.0,
        ..TreeConfig::default()
    };
    let item = &set.particles[0];
    let a = particle_transform(item, 0.0, &config, MotionOptions::STILL, Vec3::Z * 18.0);
    let b = particle_transform(item, 5.0, &config, MotionOptions::STILL, Vec3::Z * 18.0);
    assert_eq!(a.position, b.position);
    assert_eq!(a.scale, b.scale);
    assert_eq!(a.position, item.base_position);
}

#[test]
fn hovered_photo_grows_toward_hover_scale() {
    let urls = vec!["a".to_string(), "b".to_string()];
    let set = DecorationSet::build(&urls, QualityTier::High, &mut layout_rng(Some(1)), 1);
    let mut animator = Animator::new(MotionOptions::STILL);
    let config = TreeConfig::default();
    let (mut parts, mut photos) = (Vec::new(), Vec::new());
    let eye = Vec3::new(0.0, 2.0, 18.0);

    let mut t = 0.0;
    for _ in 0..120 {
        t += 1.0 / 60.0;
        animator.frame(&set, clock(t, 1.0 / 60.0), &config, eye, Some(0), &mut parts, &mut photos);
    }
    let base = set.photos[0].scale;
    let hover_target = base * HOVER_SCALE_MULTIPLIER;
    assert!((photos[0].scale - hover_target).abs() < 0.05);
    assert!(photos[0].scale <= hover_target + 1e-5);
    assert!((photos[1].scale - set.photos[1].scale).abs() < 1e-5);
    assert_eq!(parts.len(), set.particles.len());
}

#[test]
fn swapped_set_resets_photo_state() {
    let urls = vec!["a".to_string()];
    let set = DecorationSet::build(&urls, QualityTier::High, &mut layout_rng(Some(1)), 1);
    let mut animator = Animator::default();
    let config = TreeConfig::default();
    let (mut parts, mut photos) = (Vec::new(), Vec::new());
    for i in 0..30 {
        let t = i as f32 / 60.0;
        animator.frame(&set, clock(t, 1.0 / 60.0), &config, Vec3::Z * 18.0, Some(0), &mut parts, &mut photos);
    }
    assert!(animator.photo_motion()[0].scale > set.photos[0].scale);

    let swapped = set.with_photos(&["x".to_string(), "y".to_string()], 2);
    animator.sync(&swapped);
    assert_eq!(animator.photo_motion().len(), 2);
    for (m, p) in animator.photo_motion().iter().zip(&swapped.photos) {
        assert_eq!(m.scale, p.scale);
        assert_eq!(m.drift_y, 0.0);
    }
}

#[test]
fn frame_timer_clamps_dt() {
    let mut timer = FrameTimer::new();
    let c = timer.tick();
    assert!(c.dt >= 0.0 && c.dt <= MAX_FRAME_DT);
    assert!(c.elapsed >= 0.0);
}

fn particle(is_center: bool, speed: f32, phase: f32) -> DecorationItem {
    DecorationItem {
        id: 0,
        kind: DecorationKind::Particle { speed, is_center },
        source_url: None,
        base_position: Vec3::new(1.0, 2.0, 3.0),
        scale: 0.4,
        phase,
    }
}

fn photo(id: u32) -> DecorationItem {
    DecorationItem {
        id,
        kind: DecorationKind::Photo,
        source_url: Some(format!("photo-{id}")),
        base_position: Vec3::new(2.0, 1.0, -1.0),
        scale: 1.5,
        phase: id as f32,
    }
}

#[test]
fn particle_drift_matches_sine_offsets() {
    let (t, phase, s) = (2.0_f32, 0.7_f32, 1.5_f32);
    let d = particle_drift(t, phase, s);
    let sx = (0.5 * t + phase).sin() * s;
    let sy = (0.3 * t + phase).cos() * s;
    assert!((d - Vec3::new(sx, sy, sx)).length() < 1e-6);
    assert_eq!(particle_drift(t, phase, 0.0), Vec3::ZERO);

    let config = TreeConfig {
        scatter: s,
        ..TreeConfig::default()
    };
    let item = particle(false, 0.8, phase);
    let drift_only = MotionOptions {
        particle_drift: true,
        particle_pulse: false,
    };
    let tf = particle_transform(&item, t, &config, drift_only, Vec3::Z * 18.0);
    assert!((tf.position - (item.base_position + Vec3::new(sx, sy, sx))).length() < 1e-6);
    assert!((tf.scale - item.scale * config.deco_size).abs() < 1e-6);
}

#[test]
fn pulse_composes_with_center_multiplier() {
    let config = TreeConfig {
        deco_size: 1.5,
        ..TreeConfig::default()
    };
    let (t, speed, phase) = (1.3_f32, 0.9_f32, 0.25_f32);
    let pulse = 1.0 + (t * speed + phase).sin() * 0.3;

    let center = particle(true, speed, phase);
    let tf = particle_transform(&center, t, &config, MotionOptions::default(), Vec3::Z * 18.0);
    let want = 0.4 * 1.5 * CENTER_SCALE_MULTIPLIER * pulse;
    assert!((tf.scale - want).abs() < 1e-5, "{} vs {}", tf.scale, want);

    let outer = particle(false, speed, phase);
    let tf = particle_transform(&outer, t, &config, MotionOptions::default(), Vec3::Z * 18.0);
    assert!((tf.scale - 0.4 * 1.5 * pulse).abs() < 1e-5);

    // without pulse a center keeps only the multiplier
    let tf = particle_transform(&center, t, &config, MotionOptions::STILL, Vec3::Z * 18.0);
    assert!((tf.scale - 0.4 * 1.5 * CENTER_SCALE_MULTIPLIER).abs() < 1e-5);
}

#[test]
fn photo_drift_accumulates_only_with_scatter() {
    let item = photo(3);
    let camera = Vec3::new(0.0, 2.0, 18.0);
    let c = clock(0.5, 1.0 / 60.0);

    let mut still = PhotoMotion::new(item.scale);
    step_photo(&mut still, &item, false, c, &TreeConfig::default(), camera);
    assert_eq!(still.drift_y, 0.0);

    let scattered = TreeConfig {
        scatter: 2.0,
        ..TreeConfig::default()
    };
    let mut motion = PhotoMotion::new(item.scale);
    step_photo(&mut motion, &item, false, c, &scattered, camera);
    let per_frame = (0.5_f32 + 3.0).sin() * 0.002 * 2.0;
    assert!((motion.drift_y - per_frame).abs() < 1e-7);
    step_photo(&mut motion, &item, false, c, &scattered, camera);
    assert!((motion.drift_y - 2.0 * per_frame).abs() < 1e-7);
}

#[test]
fn photo_transform_faces_camera_exactly() {
    let camera = Vec3::new(0.0, 2.0, 18.0);
    for i in 0..40 {
        let item = photo(i);
        let mut motion = PhotoMotion::new(item.scale);
        let tf = step_photo(&mut motion, &item, false, clock(1.3, 1.0 / 60.0), &TreeConfig::default(), camera);
        let want = (camera - tf.position).normalize();
        assert!((tf.forward() - want).length() < 1e-4, "photo {i}");
    }
    // the float sway is a separate card-local rotation
    assert_ne!(photo_wobble(1.3, 0), glam::Quat::IDENTITY);
}

#[test]
fn animated_photos_face_camera_in_group_space() {
    let urls: Vec<String> = (0..35).map(|i| format!("photo-{i}")).collect();
    let set = DecorationSet::build(&urls, QualityTier::High, &mut layout_rng(Some(5)), 1);
    let mut animator = Animator::default();
    let config = TreeConfig::default();
    let eye = Vec3::new(0.0, 2.0, 18.0);
    let (mut parts, mut photos) = (Vec::new(), Vec::new());
    animator.frame(&set, clock(1.3, 1.0 / 60.0), &config, eye, None, &mut parts, &mut photos);

    let camera_local = animator.group().to_local(eye);
    for tf in &photos {
        let want = (camera_local - tf.position).normalize();
        let deg = tf.forward().dot(want).clamp(-1.0, 1.0).acos().to_degrees();
        assert!(deg < 0.01, "deviation {deg} deg");
    }
}
