use crate::foundation::core::Point;
use crate::foundation::error::{CinematicError, CinematicResult};

/// Authoring form of a [`Light`], validated by `Light::try_from`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LightDef {
    /// Light position relative to the output centre, in render pixels.
    pub pos: Point,
    /// RGB color, each channel in `[0, 255]`.
    pub color: [f64; 3],
    /// Base intensity in `[0, 1]`.
    pub intensity: f64,
    /// Amplitude of the random flicker added on top of `intensity`, in `[0, 1]`.
    #[serde(default)]
    pub intensity_rnd: f64,
    /// Radius inside which the light is at full strength.
    pub fall_in: f64,
    /// Radius beyond which the light contributes nothing.
    pub fall_out: f64,
}

/// Single point light attached to a keyframe.
///
/// Constructed only through [`Light::try_from`], which enforces `0 <= fall_in <= fall_out`,
/// intensities in `[0, 1]` and color channels in `[0, 255]`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "LightDef", into = "LightDef")]
pub struct Light {
    def: LightDef,
}

impl TryFrom<LightDef> for Light {
    type Error = CinematicError;

    fn try_from(def: LightDef) -> CinematicResult<Self> {
        let finite = def.pos.x.is_finite()
            && def.pos.y.is_finite()
            && def.color.iter().all(|c| c.is_finite())
            && def.intensity.is_finite()
            && def.intensity_rnd.is_finite()
            && def.fall_in.is_finite()
            && def.fall_out.is_finite();
        if !finite {
            return Err(CinematicError::validation("light values must be finite"));
        }
        if !(0.0..=1.0).contains(&def.intensity) {
            return Err(CinematicError::validation(
                "light intensity must be in [0, 1]",
            ));
        }
        if !(0.0..=1.0).contains(&def.intensity_rnd) {
            return Err(CinematicError::validation(
                "light intensity_rnd must be in [0, 1]",
            ));
        }
        if def.color.iter().any(|c| !(0.0..=255.0).contains(c)) {
            return Err(CinematicError::validation(
                "light color channels must be in [0, 255]",
            ));
        }
        if def.fall_in < 0.0 {
            return Err(CinematicError::validation("light fall_in must be >= 0"));
        }
        if def.fall_in > def.fall_out {
            return Err(CinematicError::validation(
                "light fall_in must be <= fall_out",
            ));
        }
        Ok(Self { def })
    }
}

impl From<Light> for LightDef {
    fn from(light: Light) -> Self {
        light.def
    }
}

impl Light {
    /// Position relative to the output centre.
    pub fn pos(&self) -> Point {
        self.def.pos
    }

    /// RGB color.
    pub fn color(&self) -> [f64; 3] {
        self.def.color
    }

    /// Base intensity.
    pub fn intensity(&self) -> f64 {
        self.def.intensity
    }

    /// Flicker amplitude.
    pub fn intensity_rnd(&self) -> f64 {
        self.def.intensity_rnd
    }

    /// Inner (full strength) radius.
    pub fn fall_in(&self) -> f64 {
        self.def.fall_in
    }

    /// Outer (no contribution) radius.
    pub fn fall_out(&self) -> f64 {
        self.def.fall_out
    }

    /// Copy of this light moved by `offset`.
    pub fn translated(&self, offset: crate::foundation::core::Vec2) -> Self {
        Self {
            def: LightDef {
                pos: self.def.pos + offset,
                ..self.def
            },
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/track/light.rs"]
mod tests;
