use crate::effects::effect_id::DistortionKind;
use crate::foundation::core::{Vec2, Vec3};

/// Amplitude used while the dream effect carries on into the next key.
pub const DREAM_NOMINAL_AMPLITUDE: f64 = 15.0;

const PHASE_PER_FRAME: f64 = 0.1;
const SPATIAL_FREQ: f64 = 0.05;

/// Per-vertex displacement field for the dream draw effect.
///
/// Recomputed once per frame for the primary layer's mesh; the phase advances with track frames so
/// playback speed changes the wave speed too.
#[derive(Clone, Debug, Default)]
pub struct DreamField {
    phase: f64,
    offsets: Vec<Vec2>,
}

impl DreamField {
    /// Empty field at phase 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the phase by `frames` track frames.
    pub fn advance(&mut self, frames: f64) {
        if frames.is_finite() && frames > 0.0 {
            self.phase = (self.phase + frames * PHASE_PER_FRAME) % std::f64::consts::TAU;
        }
    }

    /// Current phase in radians.
    pub fn phase(&self) -> f64 {
        self.phase
    }

    /// Recompute offsets for `vertices` with `amplitude` in mesh units.
    pub fn precalc(&mut self, kind: DistortionKind, vertices: &[Vec3], amplitude: f64) {
        let phase = self.phase;
        self.offsets.clear();
        self.offsets.extend(vertices.iter().map(|v| match kind {
            DistortionKind::Dream => Vec2::new(
                amplitude * (phase + v.y * SPATIAL_FREQ).sin(),
                amplitude * (phase + v.x * SPATIAL_FREQ).cos(),
            ),
            DistortionKind::Ripple => {
                let radial = Vec2::new(v.x, v.y);
                let d = radial.hypot();
                if d <= f64::EPSILON {
                    Vec2::ZERO
                } else {
                    radial * (amplitude * (d * SPATIAL_FREQ - phase).sin() / d)
                }
            }
        }));
    }

    /// Offset for vertex `index`, zero when the field was not computed for it.
    pub fn offset(&self, index: usize) -> Vec2 {
        self.offsets.get(index).copied().unwrap_or(Vec2::ZERO)
    }

    /// Number of precalculated offsets.
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    /// Return `true` when nothing was precalculated.
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Drop offsets and phase.
    pub fn reset(&mut self) {
        self.phase = 0.0;
        self.offsets.clear();
    }
}

/// Amplitude for the current key: nominal while the next key keeps dreaming, otherwise decaying
/// with the fade progress `a`.
pub fn dream_amplitude(nominal: f64, next_also_dream: bool, a: f64) -> f64 {
    if next_also_dream {
        nominal
    } else {
        nominal * a.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/dream.rs"]
mod tests;
