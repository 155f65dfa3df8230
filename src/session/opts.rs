use crate::foundation::core::Canvas;
use crate::foundation::error::{CinematicError, CinematicResult};
use crate::track::keyframe::Language;

/// Sequencer configuration.
///
/// Every field has a default so partial JSON documents load.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SequencerOpts {
    /// Canvas keyframe coordinates are authored against.
    pub logical: Canvas,
    /// Fixed reference screen the mapped coordinates end up in.
    pub reference: Canvas,
    /// Actual output resolution.
    pub output: Canvas,
    /// Language used to pick a key's sound.
    pub language: Language,
    /// Also submit every material group as a wireframe.
    pub wireframe: bool,
    /// Vertex scratch buffer capacity.
    pub vertex_capacity: usize,
    /// Distortion amplitude while the dream effect carries on into the next key.
    pub dream_amplitude: f64,
    /// Gain of the smoothed light flicker, per second.
    pub flicker_gain: f64,
    /// Number of past poses the blur pre-effect redraws.
    pub blur_trail: usize,
    /// Seed of the light flicker generator.
    pub seed: u64,
}

impl Default for SequencerOpts {
    fn default() -> Self {
        Self {
            logical: Canvas::new(512, 384),
            reference: Canvas::new(640, 480),
            output: Canvas::new(640, 480),
            language: Language::default(),
            wireframe: false,
            vertex_capacity: 40_000,
            dream_amplitude: crate::effects::dream::DREAM_NOMINAL_AMPLITUDE,
            flicker_gain: 10.0,
            blur_trail: 8,
            seed: 0,
        }
    }
}

impl SequencerOpts {
    /// Reject configurations the sequencer cannot render with.
    pub fn validate(&self) -> CinematicResult<()> {
        for (name, canvas) in [
            ("logical", self.logical),
            ("reference", self.reference),
            ("output", self.output),
        ] {
            if canvas.is_empty() {
                return Err(CinematicError::validation(format!(
                    "{name} canvas must be non-empty"
                )));
            }
        }
        if self.vertex_capacity == 0 {
            return Err(CinematicError::validation("vertex_capacity must be > 0"));
        }
        if !self.dream_amplitude.is_finite() || self.dream_amplitude < 0.0 {
            return Err(CinematicError::validation(
                "dream_amplitude must be finite and >= 0",
            ));
        }
        if !self.flicker_gain.is_finite() || self.flicker_gain < 0.0 {
            return Err(CinematicError::validation(
                "flicker_gain must be finite and >= 0",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/opts.rs"]
mod tests;
