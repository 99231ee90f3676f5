//! Decoration records and the list that owns them.

use crate::layout::{compute_particle_layout, compute_photo_layout};
use crate::quality::QualityTier;
use fnv::FnvHasher;
use glam::Vec3;
use rand::Rng;
use std::hash::Hasher;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DecorationKind {
    Photo,
    Particle { speed: f32, is_center: bool },
}

#[derive(Clone, Debug, PartialEq)]
pub struct DecorationItem {
    pub id: u32,
    pub kind: DecorationKind,
    pub source_url: Option<String>,
    pub base_position: Vec3,
    pub scale: f32,
    pub phase: f32,
}

impl DecorationItem {
    #[inline]
    pub fn is_photo(&self) -> bool {
        matches!(self.kind, DecorationKind::Photo)
    }

    #[inline]
    pub fn is_center(&self) -> bool {
        matches!(self.kind, DecorationKind::Particle { is_center: true, .. })
    }

    /// Stable hue in `[0, 1)` derived from the photo URL.
    pub fn tint_hue(&self) -> f32 {
        match &self.source_url {
            Some(url) => url_hue(url),
            None => 0.0,
        }
    }
}

pub fn url_hue(url: &str) -> f32 {
    let mut h = FnvHasher::default();
    h.write(url.as_bytes());
    (h.finish() % 3600) as f32 / 3600.0
}

/// Immutable snapshot of everything on the tree.
///
/// A new set is built whenever the photo list or tier changes and replaces
/// the old one wholesale; nothing mutates a set that a frame may be reading.
#[derive(Clone, Debug)]
pub struct DecorationSet {
    pub tier: QualityTier,
    pub generation: u64,
    pub particles: Vec<DecorationItem>,
    pub photos: Vec<DecorationItem>,
}

impl DecorationSet {
    pub fn build<S: AsRef<str>, R: Rng>(
        urls: &[S],
        tier: QualityTier,
        rng: &mut R,
        generation: u64,
    ) -> Self {
        let particles = compute_particle_layout(tier.profile().particle_count(), tier, rng)
            .into_iter()
            .enumerate()
            .map(|(i, p)| DecorationItem {
                id: i as u32,
                kind: DecorationKind::Particle {
                    speed: p.speed,
                    is_center: p.is_center,
                },
                source_url: None,
                base_position: p.position,
                scale: p.scale,
                phase: p.phase,
            })
            .collect();
        Self {
            tier,
            generation,
            particles,
            photos: photo_items(urls, tier),
        }
    }

    /// Same particles, new photo list.
    pub fn with_photos<S: AsRef<str>>(&self, urls: &[S], generation: u64) -> Self {
        Self {
            tier: self.tier,
            generation,
            particles: self.particles.clone(),
            photos: photo_items(urls, self.tier),
        }
    }

    pub fn empty(tier: QualityTier) -> Self {
        Self {
            tier,
            generation: 0,
            particles: Vec::new(),
            photos: Vec::new(),
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.particles.len() + self.photos.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn items(&self) -> impl Iterator<Item = &DecorationItem> {
        self.particles.iter().chain(self.photos.iter())
    }
}

/// Photo URL list shared between the upload handler and the frame loop.
///
/// Every change bumps `revision`; consumers compare revisions and swap in the
/// whole list rather than patching a set in place.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PhotoFeed {
    urls: Vec<String>,
    revision: u64,
}

impl PhotoFeed {
    pub fn new(urls: Vec<String>) -> Self {
        Self { urls, revision: 0 }
    }

    #[inline]
    pub fn urls(&self) -> &[String] {
        &self.urls
    }

    #[inline]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Put `new_urls` in front of the current list, keeping their order.
    /// Returns false (and leaves the revision alone) when nothing was added.
    pub fn prepend(&mut self, new_urls: Vec<String>) -> bool {
        if new_urls.is_empty() {
            return false;
        }
        let mut urls = new_urls;
        urls.append(&mut self.urls);
        self.urls = urls;
        self.revision += 1;
        true
    }

    pub fn replace(&mut self, urls: Vec<String>) {
        self.urls = urls;
        self.revision += 1;
    }
}

/// Outcome of one upload selection, shown to the user.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UploadStatus {
    Reading { files: usize },
    Added { added: usize, unreadable: usize },
    Failed { files: usize },
}

impl UploadStatus {
    /// Status after every file of a selection of `files` has been read.
    pub fn finished(files: usize, added: usize) -> Self {
        if added == 0 {
            Self::Failed { files }
        } else {
            Self::Added {
                added,
                unreadable: files.saturating_sub(added),
            }
        }
    }

    pub fn message(&self) -> String {
        match *self {
            Self::Reading { files } => format!("Uploading {} photo{}...", files, plural(files)),
            Self::Added { added, unreadable: 0 } => {
                format!("Added {} photo{}", added, plural(added))
            }
            Self::Added { added, unreadable } => format!(
                "Added {} photo{}, {} could not be read",
                added,
                plural(added),
                unreadable
            ),
            Self::Failed { .. } => "Upload failed: no readable images".to_owned(),
        }
    }

    /// Final outcomes clear themselves after a delay; progress stays up.
    #[inline]
    pub fn is_final(&self) -> bool {
        !matches!(self, Self::Reading { .. })
    }
}

#[inline]
fn plural(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

fn photo_items<S: AsRef<str>>(urls: &[S], tier: QualityTier) -> Vec<DecorationItem> {
    compute_photo_layout(urls, tier)
        .into_iter()
        .zip(urls)
        .enumerate()
        .map(|(i, (layout, url))| DecorationItem {
            id: i as u32,
            kind: DecorationKind::Photo,
            source_url: Some(url.as_ref().to_owned()),
            base_position: layout.position,
            scale: layout.scale,
            phase: i as f32,
        })
        .collect()
}
