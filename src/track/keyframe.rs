use std::collections::BTreeMap;

use crate::assets::store::{BitmapId, SoundId};
use crate::effects::effect_id::EffectId;
use crate::foundation::core::{FrameIndex, Rgba8, Vec3};
use crate::foundation::error::{CinematicError, CinematicResult};
use crate::track::light::Light;

/// Interpolation mode applied between a keyframe and the one after it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum InterpMode {
    /// Hold the current keyframe until the next one is reached.
    None,
    /// Straight-line interpolation.
    Linear,
    /// Cubic curve through the neighbouring keyframes.
    #[default]
    Bezier,
}

/// Keyframe force flags.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct ForceFlags(pub u8);

impl ForceFlags {
    /// Bit 0: render the "next" layer and cross-dissolve the two.
    pub const CROSS_DISSOLVE: u8 = 1;

    /// Return `true` when the two-layer cross-dissolve is requested.
    pub fn cross_dissolve(self) -> bool {
        self.0 & Self::CROSS_DISSOLVE != 0
    }
}

impl Default for ForceFlags {
    fn default() -> Self {
        Self(Self::CROSS_DISSOLVE)
    }
}

/// Voice-over language variant used to pick a keyframe sound.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    /// English.
    #[default]
    English,
    /// French.
    French,
    /// German.
    German,
    /// Spanish.
    Spanish,
    /// Italian.
    Italian,
    /// Russian.
    Russian,
}

/// Sound handle per language.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct SoundTable(pub BTreeMap<Language, SoundId>);

impl SoundTable {
    /// Table holding a single sound for `lang`.
    pub fn single(lang: Language, id: SoundId) -> Self {
        Self(BTreeMap::from([(lang, id)]))
    }

    /// Sound for `lang`, if any.
    pub fn get(&self, lang: Language) -> Option<SoundId> {
        self.0.get(&lang).copied()
    }
}

fn default_color() -> Rgba8 {
    Rgba8::from_argb(0x00FF_FFFF)
}

fn default_speed() -> f64 {
    1.0
}

/// One authored point on the timeline.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Keyframe {
    /// Frame this key sits on.
    pub frame: FrameIndex,
    /// Image shown while this key is current, if any.
    #[serde(default)]
    pub bitmap: Option<BitmapId>,
    /// Packed effect sub-fields (pre, draw, post, distortion).
    #[serde(default)]
    pub effect: EffectId,
    /// Interpolation toward the next key.
    #[serde(default)]
    pub interp: InterpMode,
    /// Force flags; bit 0 enables the second layer.
    #[serde(default)]
    pub force: ForceFlags,
    /// Camera position.
    #[serde(default)]
    pub pos: Vec3,
    /// Camera roll in degrees.
    #[serde(default)]
    pub angz: f64,
    /// Base color.
    #[serde(default = "default_color")]
    pub color: Rgba8,
    /// Destination color used by the fade pre-effects.
    #[serde(default = "default_color")]
    pub color_dest: Rgba8,
    /// Flash post-effect color.
    #[serde(default = "default_color")]
    pub color_flash: Rgba8,
    /// Effect speed multiplier.
    #[serde(default = "default_speed")]
    pub speed: f64,
    /// Playback speed multiplier applied while this key is current.
    #[serde(default = "default_speed")]
    pub track_speed: f64,
    /// Sound fired when playback enters this key.
    #[serde(default)]
    pub sounds: SoundTable,
    /// Translation applied to the image mesh grid.
    #[serde(default)]
    pub grid_pos: Vec3,
    /// Rotation of the image mesh grid in degrees.
    #[serde(default)]
    pub grid_angz: f64,
    /// Point light, absent when the key is unlit.
    #[serde(default)]
    pub light: Option<Light>,
}

impl Keyframe {
    /// Key at `frame` with the authoring-tool defaults: white colors, Bezier interpolation,
    /// cross-dissolve on, unit speeds, no image, sound or light.
    pub fn new(frame: FrameIndex) -> Self {
        Self {
            frame,
            bitmap: None,
            effect: EffectId::NONE,
            interp: InterpMode::Bezier,
            force: ForceFlags::default(),
            pos: Vec3::ZERO,
            angz: 0.0,
            color: default_color(),
            color_dest: default_color(),
            color_flash: default_color(),
            speed: 1.0,
            track_speed: 1.0,
            sounds: SoundTable::default(),
            grid_pos: Vec3::ZERO,
            grid_angz: 0.0,
            light: None,
        }
    }

    /// Validate numeric fields.
    pub fn validate(&self) -> CinematicResult<()> {
        if !self.pos.is_finite() || !self.grid_pos.is_finite() {
            return Err(CinematicError::validation(
                "keyframe positions must be finite",
            ));
        }
        if !self.angz.is_finite() || !self.grid_angz.is_finite() {
            return Err(CinematicError::validation("keyframe angles must be finite"));
        }
        if !self.speed.is_finite() || self.speed < 0.0 {
            return Err(CinematicError::validation(
                "keyframe speed must be finite and >= 0",
            ));
        }
        if !self.track_speed.is_finite() || self.track_speed <= 0.0 {
            return Err(CinematicError::validation(
                "keyframe track_speed must be finite and > 0",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/track/keyframe.rs"]
mod tests;
