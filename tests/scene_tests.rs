// Host-side tests for the scene composer and the shared photo feed.

use glam::Vec3;
use tree_core::*;

fn urls(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("photo-{i}")).collect()
}

fn step(composer: &mut SceneComposer, frames: usize, hovered: Option<u32>) {
    let config = TreeConfig::default();
    let eye = Vec3::new(0.0, 2.0, 18.0);
    for i in 0..frames {
        let clock = FrameClock {
            elapsed: i as f32 / 60.0,
            dt: 1.0 / 60.0,
        };
        composer.frame(clock, &config, eye, hovered);
    }
}

#[test]
fn batch_sizes_match_decorations() {
    let mut composer = SceneComposer::new(&urls(35), QualityTier::High, MotionOptions::default(), Some(1));
    step(&mut composer, 1, None);
    let b = composer.batches();
    assert_eq!(b.particles.len(), QualityTier::High.profile().particle_count());
    assert_eq!(b.photos.len(), 35);
    assert_eq!(b.glows.len(), 35);
    assert_eq!(b.total(), b.particles.len() + 70);
    assert_eq!(composer.backdrop().stars.len(), QualityTier::High.profile().star_count);
}

#[test]
fn tier_change_relays_out_everything() {
    let mut composer = SceneComposer::new(&urls(5), QualityTier::High, MotionOptions::default(), Some(2));
    let gen = composer.decorations().generation;
    composer.set_tier(QualityTier::Low);
    assert_eq!(composer.tier(), QualityTier::Low);
    assert!(composer.decorations().generation > gen);
    assert_eq!(
        composer.decorations().particles.len(),
        QualityTier::Low.profile().particle_count()
    );
    assert_eq!(composer.backdrop().stars.len(), QualityTier::Low.profile().star_count);
    assert_eq!(composer.lighting().ambient, QualityTier::Low.profile().ambient_intensity);

    // same tier again is a no-op
    let gen = composer.decorations().generation;
    composer.set_tier(QualityTier::Low);
    assert_eq!(composer.decorations().generation, gen);
}

#[test]
fn photo_swap_keeps_particles() {
    let mut composer = SceneComposer::new(&urls(3), QualityTier::Medium, MotionOptions::default(), Some(3));
    let before = composer.decorations().clone();
    composer.set_photos(&urls(8));
    let after = composer.decorations();
    assert_eq!(after.particles, before.particles);
    assert_eq!(after.photos.len(), 8);
    assert_eq!(composer.photo_urls().len(), 8);
    step(&mut composer, 1, None);
    assert_eq!(composer.batches().photos.len(), 8);
}

#[test]
fn empty_photo_list_still_draws_particles() {
    let mut composer = SceneComposer::new(&Vec::<String>::new(), QualityTier::Low, MotionOptions::default(), Some(4));
    step(&mut composer, 2, None);
    assert!(composer.batches().photos.is_empty());
    assert!(composer.batches().glows.is_empty());
    assert!(!composer.batches().particles.is_empty());
    assert_eq!(composer.photo_pick_spheres().count(), 0);
}

#[test]
fn cards_are_sorted_far_to_near() {
    let mut composer = SceneComposer::new(&urls(20), QualityTier::High, MotionOptions::default(), Some(5));
    step(&mut composer, 1, None);
    let eye = Vec3::new(0.0, 2.0, 18.0);
    let dists: Vec<f32> = composer
        .batches()
        .photos
        .iter()
        .map(|inst| Vec3::from_slice(&inst.model[3][..3]).distance_squared(eye))
        .collect();
    for pair in dists.windows(2) {
        assert!(pair[0] >= pair[1] - 1e-3);
    }
}

#[test]
fn pick_spheres_cover_every_photo() {
    let mut composer = SceneComposer::new(&urls(6), QualityTier::High, MotionOptions::default(), Some(6));
    step(&mut composer, 1, None);
    let spheres: Vec<_> = composer.photo_pick_spheres().collect();
    assert_eq!(spheres.len(), 6);
    for (i, (id, center, radius)) in spheres.into_iter().enumerate() {
        assert_eq!(id, i as u32);
        assert!(center.is_finite());
        assert!(radius > 0.0);
    }
}

#[test]
fn uniforms_carry_lights_and_time() {
    let composer = SceneComposer::new(&urls(1), QualityTier::High, MotionOptions::default(), Some(7));
    let camera = OrbitCamera::default().camera(16.0 / 9.0);
    let clock = FrameClock {
        elapsed: 2.5,
        dt: 0.016,
    };
    let u = composer.uniforms(&camera, camera.view_matrix(), clock, &TreeConfig::default());
    assert_eq!(u.camera_time[3], 2.5);
    assert_eq!(u.ambient[2], composer.lighting().points.len() as f32);
    assert_eq!(u.ambient[0], QualityTier::High.profile().ambient_intensity);
}

#[test]
fn motion_options_round_trip_through_composer() {
    let mut composer = SceneComposer::new(&urls(1), QualityTier::Low, MotionOptions::default(), None);
    composer.set_motion_options(MotionOptions::STILL);
    assert_eq!(composer.motion_options(), MotionOptions::STILL);
}

#[test]
fn feed_prepend_puts_uploads_first() {
    let mut feed = PhotoFeed::new(urls(3));
    assert_eq!(feed.revision(), 0);
    assert!(feed.prepend(vec!["up-a".into(), "up-b".into()]));
    assert_eq!(feed.revision(), 1);
    assert_eq!(feed.urls()[..3], ["up-a", "up-b", "photo-0"]);
    assert_eq!(feed.urls().len(), 5);

    assert!(!feed.prepend(Vec::new()));
    assert_eq!(feed.revision(), 1);

    feed.replace(urls(1));
    assert_eq!(feed.revision(), 2);
    assert_eq!(feed.urls(), ["photo-0"]);
}

#[test]
fn hsv_to_rgb_primaries() {
    let close = |a: [f32; 3], b: [f32; 3]| a.iter().zip(b).all(|(x, y)| (x - y).abs() < 1e-5);
    assert!(close(hsv_to_rgb(0.0, 1.0, 1.0), [1.0, 0.0, 0.0]));
    assert!(close(hsv_to_rgb(1.0 / 3.0, 1.0, 1.0), [0.0, 1.0, 0.0]));
    assert!(close(hsv_to_rgb(0.5, 0.0, 0.7), [0.7, 0.7, 0.7]));
}

#[test]
fn bloom_follows_glow_strength() {
    let mut config = TreeConfig::default();
    config.set(ConfigParam::GlowStrength, 2.0);
    assert!((bloom_strength(&config) - 2.0 * BLOOM_PER_GLOW).abs() < 1e-6);
}

#[test]
fn pick_photo_prefers_closest_card() {
    let mut composer = SceneComposer::new(&urls(35), QualityTier::High, MotionOptions::STILL, Some(8));
    step(&mut composer, 1, None);
    let spheres: Vec<_> = composer.photo_pick_spheres().collect();
    let (id, center, _) = spheres[10];
    // a ray from outside straight through the card center hits it or one in front of it
    let eye = center + Vec3::new(0.0, 0.0, 40.0);
    let dir = (center - eye).normalize();
    let hit = composer.pick_photo(eye, dir).expect("hit");
    let hit_center = spheres[hit as usize].1;
    assert!(hit == id || hit_center.distance(eye) <= center.distance(eye));

    // straight up from far above the tree misses every card
    assert_eq!(composer.pick_photo(Vec3::new(0.0, 50.0, 0.0), Vec3::Y), None);
}

#[test]
fn centre_particles_stay_undimmed() {
    let mut composer = SceneComposer::new(&urls(0), QualityTier::Low, MotionOptions::default(), Some(9));
    let config = TreeConfig {
        deco_brightness: 1.5,
        ..TreeConfig::default()
    };
    composer.frame(FrameClock { elapsed: 0.4, dt: 1.0 / 60.0 }, &config, Vec3::new(0.0, 2.0, 18.0), None);
    let set = composer.decorations().clone();
    let batch = &composer.batches().particles;
    assert_eq!(batch.len(), set.particles.len());
    let mut seen = (0, 0);
    for (item, inst) in set.particles.iter().zip(batch) {
        if item.is_center() {
            assert_eq!(inst.color[3], 1.0);
            seen.0 += 1;
        } else {
            assert!((inst.color[3] - 0.8 * 1.5).abs() < 1e-6);
            seen.1 += 1;
        }
    }
    assert!(seen.0 > 0 && seen.1 > 0);
}

#[test]
fn group_yaw_integrates_rotation_speed() {
    let mut composer = SceneComposer::new(&urls(2), QualityTier::Low, MotionOptions::default(), Some(10));
    let eye = Vec3::new(0.0, 2.0, 18.0);
    let mut expected = 0.0;
    let mut elapsed = 0.0;
    let steps = [(0.3, 0.016), (0.3, 0.033), (1.0, 0.05), (0.0, 0.02), (0.7, 0.1)];
    for (speed, dt) in steps {
        let config = TreeConfig {
            rotation_speed: speed,
            ..TreeConfig::default()
        };
        elapsed += dt;
        composer.frame(FrameClock { elapsed, dt }, &config, eye, None);
        expected += speed * dt;
    }
    assert!((composer.group_yaw() - expected).abs() < 1e-6);
}

#[test]
fn picking_waits_for_a_frame_after_a_swap() {
    let mut composer = SceneComposer::new(&urls(4), QualityTier::High, MotionOptions::STILL, Some(11));
    assert_eq!(composer.photo_pick_spheres().count(), 0);
    step(&mut composer, 1, None);
    assert_eq!(composer.photo_pick_spheres().count(), 4);

    // same count, different layout: stale transforms must not be reused
    composer.set_tier(QualityTier::Low);
    assert_eq!(composer.photo_pick_spheres().count(), 0);
    let (_, center, _) = {
        step(&mut composer, 1, None);
        composer.photo_pick_spheres().next().expect("sphere")
    };
    let eye = center + Vec3::Z * 30.0;
    assert!(composer.pick_photo(eye, (center - eye).normalize()).is_some());

    composer.set_photos(&urls(9));
    assert_eq!(composer.pick_photo(eye, (center - eye).normalize()), None);
    step(&mut composer, 1, None);
    assert_eq!(composer.photo_pick_spheres().count(), 9);
}

#[test]
fn upload_status_reports_outcome() {
    let reading = UploadStatus::Reading { files: 25 };
    assert_eq!(reading.message(), "Uploading 25 photos...");
    assert!(!reading.is_final());

    let all = UploadStatus::finished(25, 25);
    assert_eq!(all, UploadStatus::Added { added: 25, unreadable: 0 });
    assert_eq!(all.message(), "Added 25 photos");
    assert!(all.is_final());

    let some = UploadStatus::finished(3, 1);
    assert_eq!(some.message(), "Added 1 photo, 2 could not be read");

    let none = UploadStatus::finished(2, 0);
    assert_eq!(none, UploadStatus::Failed { files: 2 });
    assert!(none.is_final());
}
