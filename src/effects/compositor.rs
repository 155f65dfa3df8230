use crate::effects::blur::BlurTrail;
use crate::effects::dream::DreamField;
use crate::effects::effect_id::{PostEffect, PreEffect, WipeKind};
use crate::effects::post::{FLASH_START_ALPHA, flash_step, wipe_step};
use crate::foundation::core::Rgba8;
use crate::render::adapter::{FlashQuad, WipeQuad};
use crate::track::keyframe::ForceFlags;

/// Lifecycle of a persistent post-effect.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub enum FxPhase {
    /// Not running.
    #[default]
    Idle,
    /// Running; continues across key changes until its driver reports completion.
    InProgress,
}

/// Flash family state. `alpha` is the accumulator.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlashState {
    /// Lifecycle.
    pub phase: FxPhase,
    /// Current overlay opacity.
    pub alpha: f64,
    /// Speed captured from the key that armed (or last refreshed) the effect.
    pub speed: f64,
    /// Color captured alongside `speed`.
    pub color: Rgba8,
}

/// Wipe family state. `dx` is the accumulator.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WipeState {
    /// Lifecycle.
    pub phase: FxPhase,
    /// Revealed fraction of the screen width.
    pub dx: f64,
    /// Speed captured from the key that armed (or last refreshed) the effect.
    pub speed: f64,
    /// Direction captured alongside `speed`.
    pub kind: WipeKind,
}

impl Default for FlashState {
    fn default() -> Self {
        Self {
            phase: FxPhase::Idle,
            alpha: 0.0,
            speed: 1.0,
            color: Rgba8::WHITE,
        }
    }
}

impl Default for WipeState {
    fn default() -> Self {
        Self {
            phase: FxPhase::Idle,
            dx: 0.0,
            speed: 1.0,
            kind: WipeKind::Appear,
        }
    }
}

/// Post-effect request of the current key for one frame.
#[derive(Clone, Copy, Debug)]
pub struct PostRequest {
    /// Decoded post-effect of the current key.
    pub post: PostEffect,
    /// Effect speed of the current key.
    pub speed: f64,
    /// Flash color of the current key.
    pub color_flash: Rgba8,
}

/// Overlays to draw after both layers.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PostFrame {
    /// Flash overlay, when the flash is running.
    pub flash: Option<FlashQuad>,
    /// Wipe mask, when the wipe is running.
    pub wipe: Option<WipeQuad>,
}

/// Per-layer opacity for one frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct LayerAlphas {
    /// Primary layer alpha.
    pub primary: u8,
    /// Secondary layer alpha, present only while cross-dissolving.
    pub secondary: Option<u8>,
}

/// Layer opacities for fade progress `a`.
///
/// Without the cross-dissolve flag the primary layer is opaque and no second layer is drawn.
/// Otherwise the primary layer gets `floor(a * 255)` and the second layer the complement, so the
/// two always sum to 255.
pub fn layer_alphas(force: ForceFlags, a: f64) -> LayerAlphas {
    if !force.cross_dissolve() {
        return LayerAlphas {
            primary: 255,
            secondary: None,
        };
    }
    let a = if a.is_nan() { 0.0 } else { a.clamp(0.0, 1.0) };
    let primary = (a * 255.0).floor() as u8;
    LayerAlphas {
        primary,
        secondary: Some(255 - primary),
    }
}

/// Layer tint after the pre-effect, alpha left at 0 for the caller to fill in.
pub fn layer_tint(pre: PreEffect, a: f64, base: Rgba8, dest: Rgba8) -> Rgba8 {
    let a = if a.is_nan() { 0.0 } else { a.clamp(0.0, 1.0) };
    let mix = |from: Rgba8, to: Rgba8| {
        let ch = |x: u8, y: u8| {
            (f64::from(x) + (f64::from(y) - f64::from(x)) * a)
                .round()
                .clamp(0.0, 255.0) as u8
        };
        Rgba8::new(ch(from.r, to.r), ch(from.g, to.g), ch(from.b, to.b), 0)
    };
    match pre {
        PreEffect::FadeIn => mix(dest, base),
        PreEffect::FadeOut => mix(base, dest),
        PreEffect::None | PreEffect::Blur => Rgba8::WHITE.with_alpha(0),
    }
}

/// Owner of all effect state that outlives a single frame.
#[derive(Clone, Debug)]
pub struct EffectCompositor {
    flash: FlashState,
    wipe: WipeState,
    dream: DreamField,
    blur: BlurTrail,
}

impl EffectCompositor {
    /// Compositor keeping `blur_trail` past poses for the blur pre-effect.
    pub fn new(blur_trail: usize) -> Self {
        Self {
            flash: FlashState::default(),
            wipe: WipeState::default(),
            dream: DreamField::new(),
            blur: BlurTrail::new(blur_trail),
        }
    }

    /// Flash family state.
    pub fn flash(&self) -> &FlashState {
        &self.flash
    }

    /// Wipe family state.
    pub fn wipe(&self) -> &WipeState {
        &self.wipe
    }

    /// Dream distortion field.
    pub fn dream(&self) -> &DreamField {
        &self.dream
    }

    /// Dream distortion field, mutably.
    pub fn dream_mut(&mut self) -> &mut DreamField {
        &mut self.dream
    }

    /// Blur trail.
    pub fn blur_mut(&mut self) -> &mut BlurTrail {
        &mut self.blur
    }

    /// Drop every in-flight effect.
    pub fn reset(&mut self) {
        self.flash = FlashState::default();
        self.wipe = WipeState::default();
        self.dream.reset();
        self.blur.clear();
    }

    /// Update both persistent families for this frame and return the overlays to draw.
    ///
    /// `key_changed` is the playback edge; `frames` is how far the clock moved this frame.
    pub fn step_post(&mut self, key_changed: bool, req: PostRequest, frames: f64) -> PostFrame {
        PostFrame {
            flash: self.step_flash(key_changed, req, frames),
            wipe: self.step_wipe(key_changed, req, frames),
        }
    }

    fn step_flash(&mut self, key_changed: bool, req: PostRequest, frames: f64) -> Option<FlashQuad> {
        let f = &mut self.flash;
        let requested = req.post.is_flash();
        if f.phase == FxPhase::Idle || requested {
            if key_changed {
                f.alpha = 0.0;
            }
            f.speed = req.speed;
            f.color = req.color_flash;
            if key_changed && requested {
                f.phase = FxPhase::InProgress;
                f.alpha = FLASH_START_ALPHA;
                tracing::debug!(speed = f.speed, "flash armed");
            }
        }
        if f.phase == FxPhase::Idle {
            return None;
        }

        let quad = FlashQuad {
            color: f.color,
            alpha: f.alpha.clamp(0.0, 1.0),
        };
        if !flash_step(&mut f.alpha, f.speed, frames) {
            f.phase = FxPhase::Idle;
            f.alpha = 0.0;
            tracing::debug!("flash finished");
        }
        Some(quad)
    }

    fn step_wipe(&mut self, key_changed: bool, req: PostRequest, frames: f64) -> Option<WipeQuad> {
        let w = &mut self.wipe;
        let requested = req.post.wipe_kind();
        if w.phase == FxPhase::Idle || requested.is_some() {
            if key_changed {
                w.dx = 0.0;
            }
            w.speed = req.speed;
            if let Some(kind) = requested {
                w.kind = kind;
                if key_changed {
                    w.phase = FxPhase::InProgress;
                    tracing::debug!(speed = w.speed, ?kind, "wipe armed");
                }
            }
        }
        if w.phase == FxPhase::Idle {
            return None;
        }

        let quad = WipeQuad {
            kind: w.kind,
            progress: w.dx.clamp(0.0, 1.0),
        };
        if !wipe_step(&mut w.dx, w.speed, frames) {
            w.phase = FxPhase::Idle;
            w.dx = 0.0;
            tracing::debug!("wipe finished");
        }
        Some(quad)
    }
}

impl Default for EffectCompositor {
    fn default() -> Self {
        Self::new(8)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/compositor.rs"]
mod tests;
