// Host-side tests for particle, photo and star placement.

use glam::Vec3;
use rand::{rngs::StdRng, SeedableRng};
use tree_core::*;

const TIERS: [QualityTier; 3] = [QualityTier::High, QualityTier::Medium, QualityTier::Low];

fn photo_urls(n: usize) -> Vec<String> {
    (0..n)
        .map(|i| format!("https://picsum.photos/400/500?random={}", i + 100))
        .collect()
}

#[test]
fn particle_count_matches_tier_profile() {
    for tier in TIERS {
        let mut rng = StdRng::seed_from_u64(7);
        let layout = compute_particle_layout(0, tier, &mut rng);
        let profile = tier.profile();
        assert_eq!(layout.len(), profile.outer_particles + profile.center_particles);

        let centers = layout.iter().filter(|p| p.is_center).count();
        assert_eq!(centers, profile.center_particles);
        // outer spiral first, center column after
        assert!(layout[..profile.outer_particles].iter().all(|p| !p.is_center));
    }
}

#[test]
fn requested_particle_count_does_not_change_layout() {
    for tier in TIERS {
        let few = compute_particle_layout(3, tier, &mut layout_rng(Some(9)));
        let many = compute_particle_layout(10_000, tier, &mut layout_rng(Some(9)));
        assert_eq!(few.len(), tier.profile().particle_count());
        assert_eq!(few, many);
    }
}

#[test]
fn particle_coordinates_are_finite_and_bounded() {
    let mut rng = StdRng::seed_from_u64(42);
    for p in compute_particle_layout(500, QualityTier::High, &mut rng) {
        assert!(p.position.is_finite());
        assert!(p.scale > 0.0 && p.scale.is_finite());
        assert!(p.speed >= PARTICLE_SPEED_MIN);
        assert!(p.speed <= PARTICLE_SPEED_MIN + PARTICLE_SPEED_SPAN);
        if p.is_center {
            let r = Vec3::new(p.position.x, 0.0, p.position.z).length();
            assert!(r <= CENTER_RADIUS + 1e-4);
            assert!(p.position.y >= CENTER_Y_MIN && p.position.y < CENTER_Y_MAX);
        }
    }
}

#[test]
fn seeded_layouts_are_reproducible() {
    let a = compute_particle_layout(100, QualityTier::Medium, &mut layout_rng(Some(1234)));
    let b = compute_particle_layout(100, QualityTier::Medium, &mut layout_rng(Some(1234)));
    assert_eq!(a, b);

    let c = compute_particle_layout(100, QualityTier::Medium, &mut layout_rng(Some(1235)));
    assert_ne!(a, c);
}

#[test]
fn photo_layout_follows_input_order() {
    let urls = photo_urls(10);
    let layout = compute_photo_layout(&urls, QualityTier::High);
    assert_eq!(layout.len(), urls.len());
    for (i, p) in layout.iter().enumerate() {
        let expected = photo_spiral_point(i as f32 / urls.len() as f32);
        assert!((p.position - expected).length() < 1e-5);
        assert_eq!(p.scale, QualityTier::High.profile().photo_scale);
    }
    // descending cone: each photo sits lower than the one before
    for pair in layout.windows(2) {
        assert!(pair[1].position.y < pair[0].position.y);
    }
}

#[test]
fn empty_photo_list_gives_empty_layout() {
    let urls: Vec<String> = Vec::new();
    assert!(compute_photo_layout(&urls, QualityTier::Low).is_empty());

    let set = DecorationSet::build(&urls, QualityTier::Low, &mut layout_rng(Some(3)), 1);
    assert!(set.photos.is_empty());
    assert_eq!(set.particles.len(), QualityTier::Low.profile().particle_count());
}

#[test]
fn default_feed_endpoints() {
    let urls = photo_urls(35);
    let layout = compute_photo_layout(&urls, QualityTier::High);

    let first = layout[0].position;
    assert!((first - Vec3::new(1.0, 7.0, 0.0)).length() < 1e-5);

    let t = 34.0 / 35.0;
    let last = layout[34].position;
    assert!((last.y - (7.0 - 12.0 * t)).abs() < 1e-4);
    let radius = Vec3::new(last.x, 0.0, last.z).length();
    assert!((radius - (1.0 + 5.0 * t)).abs() < 1e-4);
}

#[test]
fn star_field_lies_on_shell() {
    let mut rng = StdRng::seed_from_u64(9);
    let stars = compute_star_field(500, &mut rng);
    assert_eq!(stars.len(), 500);
    for s in stars {
        let r = s.length();
        assert!(r >= STAR_RADIUS - 1e-3 && r <= STAR_RADIUS + STAR_DEPTH + 1e-3);
    }
}

#[test]
fn photo_items_keep_ids_and_urls() {
    let urls = photo_urls(4);
    let set = DecorationSet::build(&urls, QualityTier::High, &mut layout_rng(Some(5)), 2);
    for (i, item) in set.photos.iter().enumerate() {
        assert!(item.is_photo());
        assert_eq!(item.source_url.as_deref(), Some(urls[i].as_str()));
    }
    let ids: std::collections::HashSet<u32> = set.photos.iter().map(|p| p.id).collect();
    assert_eq!(ids.len(), set.photos.len());
}

#[test]
fn url_hue_is_stable_and_in_range() {
    let h = url_hue("https://example.com/a.jpg");
    assert_eq!(h, url_hue("https://example.com/a.jpg"));
    assert!((0.0..1.0).contains(&h));
}
