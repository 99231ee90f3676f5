//! Adaptive quality: tier table and the renderer-health state machine.
//!
//! A [`QualitySelector`] is created when the scene mounts and dropped when it
//! unmounts. It consumes [`HealthSignal`]s from the renderer adapter and the
//! user's retry action, and decides which [`QualityTier`] the next healthy
//! renderer runs at. Quality never climbs back up within one mount.

use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum QualityTier {
    Low,
    Medium,
    High,
}

/// Fixed budgets for one tier.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TierProfile {
    pub outer_particles: usize,
    pub center_particles: usize,
    pub particle_size: f32,
    pub photo_scale: f32,
    pub ambient_intensity: f32,
    pub point_intensity: f32,
    pub glow_intensity: f32,
    pub star_count: usize,
}

impl TierProfile {
    #[inline]
    pub fn particle_count(&self) -> usize {
        self.outer_particles + self.center_particles
    }
}

const HIGH: TierProfile = TierProfile {
    outer_particles: 600,
    center_particles: 160,
    particle_size: 1.0,
    photo_scale: 1.2,
    ambient_intensity: 0.5,
    point_intensity: 1.0,
    glow_intensity: 2.0,
    star_count: 5000,
};

const MEDIUM: TierProfile = TierProfile {
    outer_particles: 320,
    center_particles: 80,
    particle_size: 0.9,
    photo_scale: 1.1,
    ambient_intensity: 0.45,
    point_intensity: 0.8,
    glow_intensity: 1.5,
    star_count: 2000,
};

const LOW: TierProfile = TierProfile {
    outer_particles: 140,
    center_particles: 30,
    particle_size: 0.8,
    photo_scale: 1.0,
    ambient_intensity: 0.4,
    point_intensity: 0.6,
    glow_intensity: 1.0,
    star_count: 500,
};

impl QualityTier {
    /// Tier for a given retry count: 0 → High, 1 → Medium, ≥2 → Low.
    #[inline]
    pub fn for_attempt(attempt: u32) -> Self {
        match attempt {
            0 => QualityTier::High,
            1 => QualityTier::Medium,
            _ => QualityTier::Low,
        }
    }

    #[inline]
    pub fn profile(self) -> TierProfile {
        match self {
            QualityTier::High => HIGH,
            QualityTier::Medium => MEDIUM,
            QualityTier::Low => LOW,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            QualityTier::High => "high",
            QualityTier::Medium => "medium",
            QualityTier::Low => "low",
        }
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderError {
    /// No capable graphics context at all. Fatal for this session.
    #[error("WebGPU is not available in this browser or on this hardware")]
    Unsupported,
    #[error("the graphics context was lost")]
    ContextLost,
    #[error("the renderer did not start within {0} ms")]
    InitTimeout(u32),
}

impl RenderError {
    #[inline]
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, RenderError::Unsupported)
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryRejected {
    #[error("renderer is unsupported; retrying cannot help")]
    Unsupported,
    #[error("nothing to retry in state {0:?}")]
    NotInError(QualityState),
}

/// Lifecycle events reported by the renderer adapter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HealthSignal {
    ContextCreated,
    ContextLost,
    ContextRestored,
    /// The init deadline for `attempt` elapsed.
    InitTimeout { attempt: u32 },
    Unsupported,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QualityState {
    Initializing { attempt: u32 },
    Healthy(QualityTier),
    Error(RenderError),
}

/// What the status overlay shows for a state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusMessage {
    pub title: &'static str,
    pub detail: String,
    /// False while the scene is drawing.
    pub visible: bool,
    pub can_retry: bool,
}

impl QualityState {
    pub fn status_message(&self, attempt_count: u32, tier: QualityTier) -> StatusMessage {
        match *self {
            QualityState::Initializing { attempt } => StatusMessage {
                title: "Starting renderer",
                detail: format!("attempt {} at {} quality", attempt + 1, tier.name()),
                visible: true,
                can_retry: false,
            },
            QualityState::Healthy(_) => StatusMessage {
                title: "",
                detail: String::new(),
                visible: false,
                can_retry: false,
            },
            QualityState::Error(RenderError::Unsupported) => StatusMessage {
                title: "3D view unavailable",
                detail: RenderError::Unsupported.to_string(),
                visible: true,
                can_retry: false,
            },
            QualityState::Error(e) => StatusMessage {
                title: "Rendering paused",
                detail: format!(
                    "{}. {} attempt(s) so far; retry continues at {} quality.",
                    e,
                    attempt_count + 1,
                    QualityTier::for_attempt(attempt_count + 1).name()
                ),
                visible: true,
                can_retry: true,
            },
        }
    }
}

#[derive(Debug)]
pub struct QualitySelector {
    state: QualityState,
    attempt_count: u32,
    init_timeout_ms: u32,
}

impl QualitySelector {
    pub fn new(init_timeout_ms: u32) -> Self {
        Self {
            state: QualityState::Initializing { attempt: 0 },
            attempt_count: 0,
            init_timeout_ms,
        }
    }

    #[inline]
    pub fn state(&self) -> QualityState {
        self.state
    }

    #[inline]
    pub fn attempt_count(&self) -> u32 {
        self.attempt_count
    }

    /// Tier for the current attempt (what a healthy renderer runs at).
    #[inline]
    pub fn tier(&self) -> QualityTier {
        QualityTier::for_attempt(self.attempt_count)
    }

    #[inline]
    pub fn init_timeout_ms(&self) -> u32 {
        self.init_timeout_ms
    }

    /// Whether the per-frame update loop should draw.
    #[inline]
    pub fn is_rendering(&self) -> bool {
        matches!(self.state, QualityState::Healthy(_))
    }

    pub fn error(&self) -> Option<RenderError> {
        match self.state {
            QualityState::Error(e) => Some(e),
            _ => None,
        }
    }

    /// Apply a renderer signal. Returns the new state when it changed.
    pub fn handle(&mut self, signal: HealthSignal) -> Option<QualityState> {
        use HealthSignal as S;
        use QualityState as Q;
        let next = match (self.state, signal) {
            (Q::Initializing { .. }, S::ContextCreated) => Q::Healthy(self.tier()),
            (Q::Initializing { .. }, S::Unsupported) => Q::Error(RenderError::Unsupported),
            (Q::Initializing { .. }, S::ContextLost) => Q::Error(RenderError::ContextLost),
            (Q::Initializing { attempt }, S::InitTimeout { attempt: fired }) if attempt == fired => {
                Q::Error(RenderError::InitTimeout(self.init_timeout_ms))
            }
            (Q::Healthy(_), S::ContextLost) => Q::Error(RenderError::ContextLost),
            (Q::Healthy(_), S::Unsupported) => Q::Error(RenderError::Unsupported),
            (Q::Error(e), S::ContextRestored) if e.is_recoverable() => Q::Healthy(self.tier()),
            (state, signal) => {
                log::debug!("[quality] ignored {:?} in {:?}", signal, state);
                return None;
            }
        };
        self.transition(next);
        Some(next)
    }

    /// User-initiated retry from a recoverable error.
    pub fn retry(&mut self) -> Result<QualityTier, RetryRejected> {
        match self.state {
            QualityState::Error(e) if e.is_recoverable() => {
                self.attempt_count += 1;
                let attempt = self.attempt_count;
                self.transition(QualityState::Initializing { attempt });
                Ok(self.tier())
            }
            QualityState::Error(_) => Err(RetryRejected::Unsupported),
            other => Err(RetryRejected::NotInError(other)),
        }
    }

    fn transition(&mut self, next: QualityState) {
        match next {
            QualityState::Error(e) => {
                log::warn!(
                    "[quality] {:?} -> error: {} (attempt {})",
                    self.state,
                    e,
                    self.attempt_count
                )
            }
            _ => log::info!(
                "[quality] {:?} -> {:?} (attempt {}, tier {})",
                self.state,
                next,
                self.attempt_count,
                self.tier().name()
            ),
        }
        self.state = next;
    }
}

impl Default for QualitySelector {
    fn default() -> Self {
        Self::new(crate::constants::INIT_TIMEOUT_MS)
    }
}
