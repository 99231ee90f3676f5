//! Visual parameters produced by the control panel.
//!
//! The panel owns a [`TreeConfig`] and hands a copy to the scene every frame.
//! Every field is bounded; values arriving from the DOM are clamped on entry so
//! the layout and animation code never sees an out-of-range number.

/// Inclusive range for one slider.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParamRange {
    pub min: f32,
    pub max: f32,
    pub step: f32,
}

impl ParamRange {
    pub const fn new(min: f32, max: f32, step: f32) -> Self {
        Self { min, max, step }
    }

    /// Clamp `v` into the range; NaN falls back to the lower bound.
    #[inline]
    pub fn clamp(&self, v: f32) -> f32 {
        if v.is_nan() {
            return self.min;
        }
        v.clamp(self.min, self.max)
    }

    #[inline]
    pub fn contains(&self, v: f32) -> bool {
        v >= self.min && v <= self.max
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TreeConfig {
    pub scatter: f32,
    pub glow_strength: f32,
    pub rotation_speed: f32,
    pub photo_brightness: f32,
    pub deco_brightness: f32,
    pub deco_size: f32,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            scatter: 0.0,
            glow_strength: 1.5,
            rotation_speed: 0.2,
            photo_brightness: 0.8,
            deco_brightness: 1.0,
            deco_size: 1.0,
        }
    }
}

/// Addressable handle for each [`TreeConfig`] field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ConfigParam {
    Scatter,
    GlowStrength,
    RotationSpeed,
    PhotoBrightness,
    DecoBrightness,
    DecoSize,
}

impl ConfigParam {
    pub const ALL: [ConfigParam; 6] = [
        ConfigParam::Scatter,
        ConfigParam::GlowStrength,
        ConfigParam::RotationSpeed,
        ConfigParam::PhotoBrightness,
        ConfigParam::DecoBrightness,
        ConfigParam::DecoSize,
    ];

    pub const fn range(self) -> ParamRange {
        match self {
            ConfigParam::Scatter => ParamRange::new(0.0, 2.0, 0.1),
            ConfigParam::GlowStrength => ParamRange::new(0.5, 3.0, 0.1),
            ConfigParam::RotationSpeed => ParamRange::new(0.0, 1.0, 0.05),
            ConfigParam::PhotoBrightness => ParamRange::new(0.2, 1.5, 0.05),
            ConfigParam::DecoBrightness => ParamRange::new(0.2, 2.0, 0.1),
            ConfigParam::DecoSize => ParamRange::new(0.1, 2.0, 0.1),
        }
    }

    /// DOM id of the slider bound to this parameter.
    pub const fn element_id(self) -> &'static str {
        match self {
            ConfigParam::Scatter => "cfg-scatter",
            ConfigParam::GlowStrength => "cfg-glow",
            ConfigParam::RotationSpeed => "cfg-rotation",
            ConfigParam::PhotoBrightness => "cfg-photo-brightness",
            ConfigParam::DecoBrightness => "cfg-deco-brightness",
            ConfigParam::DecoSize => "cfg-deco-size",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            ConfigParam::Scatter => "Scatter",
            ConfigParam::GlowStrength => "Glow",
            ConfigParam::RotationSpeed => "Rotation",
            ConfigParam::PhotoBrightness => "Photo brightness",
            ConfigParam::DecoBrightness => "Particle brightness",
            ConfigParam::DecoSize => "Particle size",
        }
    }

    pub fn from_element_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.element_id() == id)
    }
}

impl TreeConfig {
    pub fn get(&self, param: ConfigParam) -> f32 {
        match param {
            ConfigParam::Scatter => self.scatter,
            ConfigParam::GlowStrength => self.glow_strength,
            ConfigParam::RotationSpeed => self.rotation_speed,
            ConfigParam::PhotoBrightness => self.photo_brightness,
            ConfigParam::DecoBrightness => self.deco_brightness,
            ConfigParam::DecoSize => self.deco_size,
        }
    }

    /// Set one field, clamping into its range. Returns the stored value.
    pub fn set(&mut self, param: ConfigParam, value: f32) -> f32 {
        let v = param.range().clamp(value);
        match param {
            ConfigParam::Scatter => self.scatter = v,
            ConfigParam::GlowStrength => self.glow_strength = v,
            ConfigParam::RotationSpeed => self.rotation_speed = v,
            ConfigParam::PhotoBrightness => self.photo_brightness = v,
            ConfigParam::DecoBrightness => self.deco_brightness = v,
            ConfigParam::DecoSize => self.deco_size = v,
        }
        v
    }

    pub fn clamped(mut self) -> Self {
        for p in ConfigParam::ALL {
            let v = self.get(p);
            self.set(p, v);
        }
        self
    }

    pub fn is_within_bounds(&self) -> bool {
        ConfigParam::ALL
            .iter()
            .all(|p| p.range().contains(self.get(*p)))
    }
}

/// Per-frame particle behaviour switches.
///
/// Two particle variants exist: one drifts with `scatter` and pulses its
/// scale, the other holds both still. Both are exposed here instead of
/// hard-wiring either.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MotionOptions {
    pub particle_drift: bool,
    pub particle_pulse: bool,
}

impl Default for MotionOptions {
    fn default() -> Self {
        Self {
            particle_drift: true,
            particle_pulse: true,
        }
    }
}

impl MotionOptions {
    /// Fixed positions and fixed scale.
    pub const STILL: MotionOptions = MotionOptions {
        particle_drift: false,
        particle_pulse: false,
    };
}
