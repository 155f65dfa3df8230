use crate::foundation::error::{CinematicError, CinematicResult};

/// Packed per-keyframe effect selection.
///
/// Four independent sub-fields live in disjoint bytes:
///
/// | byte | field                    | codes                                   |
/// |------|--------------------------|-----------------------------------------|
/// | 0    | [`PreEffect`]            | 0 none, 1 fade-in, 2 fade-out, 3 blur   |
/// | 1    | [`DrawEffect`]           | 0 none, 1 dream                         |
/// | 2    | [`PostEffect`]           | 0 none, 1 flash, 2 appear, 3 appear-rev |
/// | 3    | [`DistortionKind`]       | 0 dream swirl, 1 ripple                 |
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct EffectId(pub u32);

/// Effect applied to the layer color before drawing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PreEffect {
    /// No pre-effect.
    #[default]
    None,
    /// Color ramps from the destination color to the base color.
    FadeIn,
    /// Color ramps from the base color to the destination color.
    FadeOut,
    /// Motion trail of past camera poses.
    Blur,
}

/// Effect applied while the grid is drawn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DrawEffect {
    /// Plain grid.
    #[default]
    None,
    /// Grid vertices displaced by the distortion field.
    Dream,
}

/// Full-screen effect drawn after both layers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PostEffect {
    /// No post-effect.
    #[default]
    None,
    /// Flash to `color_flash` that decays away.
    Flash,
    /// Wipe that reveals the picture left to right.
    Appear,
    /// Wipe that reveals the picture right to left.
    AppearReverse,
}

impl PostEffect {
    /// Return `true` for the flash family.
    pub fn is_flash(self) -> bool {
        matches!(self, Self::Flash)
    }

    /// Wipe direction when this is a wipe-family effect.
    pub fn wipe_kind(self) -> Option<WipeKind> {
        match self {
            Self::Appear => Some(WipeKind::Appear),
            Self::AppearReverse => Some(WipeKind::AppearReverse),
            Self::None | Self::Flash => None,
        }
    }
}

/// Direction of a wipe post-effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
pub enum WipeKind {
    /// Reveal left to right.
    Appear,
    /// Reveal right to left.
    AppearReverse,
}

/// Waveform used to precalculate the distortion field.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DistortionKind {
    /// Sinusoidal swirl.
    #[default]
    Dream,
    /// Radial ripple from the mesh centre.
    Ripple,
}

/// Decoded form of an [`EffectId`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct EffectSet {
    /// Byte 0.
    pub pre: PreEffect,
    /// Byte 1.
    pub draw: DrawEffect,
    /// Byte 2.
    pub post: PostEffect,
    /// Byte 3.
    pub distortion: DistortionKind,
}

fn decode_pre(code: u8) -> Option<PreEffect> {
    Some(match code {
        0 => PreEffect::None,
        1 => PreEffect::FadeIn,
        2 => PreEffect::FadeOut,
        3 => PreEffect::Blur,
        _ => return None,
    })
}

fn decode_draw(code: u8) -> Option<DrawEffect> {
    Some(match code {
        0 => DrawEffect::None,
        1 => DrawEffect::Dream,
        _ => return None,
    })
}

fn decode_post(code: u8) -> Option<PostEffect> {
    Some(match code {
        0 => PostEffect::None,
        1 => PostEffect::Flash,
        2 => PostEffect::Appear,
        3 => PostEffect::AppearReverse,
        _ => return None,
    })
}

fn decode_distortion(code: u8) -> Option<DistortionKind> {
    Some(match code {
        0 => DistortionKind::Dream,
        1 => DistortionKind::Ripple,
        _ => return None,
    })
}

impl EffectId {
    /// No effect in any sub-field.
    pub const NONE: Self = Self(0);

    fn bytes(self) -> [u8; 4] {
        self.0.to_le_bytes()
    }

    /// Decode every sub-field, failing on the first unknown code.
    pub fn decode(self) -> CinematicResult<EffectSet> {
        let [pre, draw, post, dist] = self.bytes();
        let unknown = |field: &str, code: u8| {
            CinematicError::effect(format!(
                "unknown {field} code {code} in effect id {:#010x}",
                self.0
            ))
        };
        Ok(EffectSet {
            pre: decode_pre(pre).ok_or_else(|| unknown("pre-effect", pre))?,
            draw: decode_draw(draw).ok_or_else(|| unknown("draw effect", draw))?,
            post: decode_post(post).ok_or_else(|| unknown("post effect", post))?,
            distortion: decode_distortion(dist).ok_or_else(|| unknown("distortion", dist))?,
        })
    }

    /// Decode every sub-field, mapping unknown codes to the field default.
    ///
    /// The flag is `true` when at least one sub-field was unknown.
    pub fn decode_lossy(self) -> (EffectSet, bool) {
        let [pre, draw, post, dist] = self.bytes();
        let set = EffectSet {
            pre: decode_pre(pre).unwrap_or_default(),
            draw: decode_draw(draw).unwrap_or_default(),
            post: decode_post(post).unwrap_or_default(),
            distortion: decode_distortion(dist).unwrap_or_default(),
        };
        let unknown = decode_pre(pre).is_none()
            || decode_draw(draw).is_none()
            || decode_post(post).is_none()
            || decode_distortion(dist).is_none();
        (set, unknown)
    }
}

impl EffectSet {
    /// Pack back into an [`EffectId`].
    pub fn encode(self) -> EffectId {
        let pre = match self.pre {
            PreEffect::None => 0u8,
            PreEffect::FadeIn => 1,
            PreEffect::FadeOut => 2,
            PreEffect::Blur => 3,
        };
        let draw = match self.draw {
            DrawEffect::None => 0u8,
            DrawEffect::Dream => 1,
        };
        let post = match self.post {
            PostEffect::None => 0u8,
            PostEffect::Flash => 1,
            PostEffect::Appear => 2,
            PostEffect::AppearReverse => 3,
        };
        let dist = match self.distortion {
            DistortionKind::Dream => 0u8,
            DistortionKind::Ripple => 1,
        };
        EffectId(u32::from_le_bytes([pre, draw, post, dist]))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/effect_id.rs"]
mod tests;
