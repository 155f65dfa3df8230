use crate::animation::interp::{InterpolatedState, LayerPose, interpolate};
use crate::assets::store::{BitmapId, BitmapRepository, SoundId, SoundTrigger};
use crate::effects::compositor::{
    EffectCompositor, LayerAlphas, PostRequest, layer_alphas, layer_tint,
};
use crate::effects::dream::{DreamField, dream_amplitude};
use crate::effects::effect_id::{DrawEffect, EffectId, PreEffect};
use crate::foundation::core::{Point, Rgba8};
use crate::foundation::error::{CinematicError, CinematicResult};
use crate::foundation::math::Rng64;
use crate::lighting::model::{LightFlicker, shade};
use crate::playback::clock::PlaybackClock;
use crate::render::adapter::{FlashQuad, RenderAdapter, ScreenVertex, WipeQuad};
use crate::render::camera::{CameraPose, grid_transform, to_world};
use crate::render::screen::ScreenMapping;
use crate::render::vertex::VertexBuffer;
use crate::session::opts::SequencerOpts;
use crate::track::keyframe::Keyframe;
use crate::track::light::Light;
use crate::track::store::{InsertOpts, Track};

/// Authoring or data problem absorbed while rendering a frame.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FrameWarning {
    /// A key referenced a bitmap the repository does not hold; the layer was skipped.
    MissingBitmap {
        /// Requested bitmap.
        bitmap: BitmapId,
    },
    /// A mesh did not fit the vertex scratch buffer; the layer was skipped.
    VertexCapacity {
        /// Vertices the mesh needs.
        needed: usize,
        /// Scratch buffer capacity.
        capacity: usize,
    },
    /// The effect id carried unknown sub-field codes; they were treated as "none".
    UnknownEffect {
        /// Raw effect id.
        effect: EffectId,
    },
    /// The sound trigger failed.
    SoundFailed {
        /// Sound that was requested.
        sound: SoundId,
        /// Failure message.
        message: String,
    },
}

/// What one call to [`CinematicSequencer::render_frame`] did.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct FrameReport {
    /// Track position after advancing.
    pub frame: f64,
    /// Index of the current key.
    pub current: usize,
    /// Index of the next key.
    pub next: usize,
    /// Fraction between the two keys.
    pub t: f64,
    /// Whether playback entered a new key pair this frame.
    pub changed_key: bool,
    /// Sound fired this frame.
    pub sound: Option<SoundId>,
    /// Layer opacities.
    pub alphas: LayerAlphas,
    /// Flash overlay drawn this frame.
    pub flash: Option<FlashQuad>,
    /// Wipe mask drawn this frame.
    pub wipe: Option<WipeQuad>,
    /// Absorbed problems.
    pub warnings: Vec<FrameWarning>,
}

/// Inputs for drawing one image layer.
struct Layer<'a> {
    bitmap: Option<BitmapId>,
    pose: LayerPose,
    color: Rgba8,
    light: Option<(Light, f64)>,
    dream: Option<&'a DreamField>,
}

/// Per-frame state shared by the draw helpers.
struct DrawCtx<'a> {
    mapping: ScreenMapping,
    wireframe: bool,
    bitmaps: &'a dyn BitmapRepository,
}

/// Keyframe-driven cinematic player.
///
/// Owns the track, the playback clock and every piece of effect state, and renders through a
/// caller-supplied [`RenderAdapter`]. One instance must not be driven from several threads at once.
pub struct CinematicSequencer {
    opts: SequencerOpts,
    track: Track,
    clock: PlaybackClock,
    compositor: EffectCompositor,
    flicker: LightFlicker,
    rng: Rng64,
    vertices: VertexBuffer,
    fade_override: Option<f64>,
}

impl CinematicSequencer {
    /// Sequencer on the default two-key track.
    pub fn new(opts: SequencerOpts) -> CinematicResult<Self> {
        opts.validate()?;
        Ok(Self {
            track: Track::new_default(),
            clock: PlaybackClock::new(),
            compositor: EffectCompositor::new(opts.blur_trail),
            flicker: LightFlicker::new(opts.flicker_gain),
            rng: Rng64::new(opts.seed),
            vertices: VertexBuffer::new(opts.vertex_capacity),
            fade_override: None,
            opts,
        })
    }

    /// Configuration.
    pub fn opts(&self) -> &SequencerOpts {
        &self.opts
    }

    /// The timeline being played.
    pub fn track(&self) -> &Track {
        &self.track
    }

    /// Playback position and key pair.
    pub fn clock(&self) -> &PlaybackClock {
        &self.clock
    }

    /// Persistent effect state.
    pub fn compositor(&self) -> &EffectCompositor {
        &self.compositor
    }

    /// Return to the default track and drop all playback and effect state.
    pub fn reset(&mut self) {
        self.track = Track::new_default();
        self.restart();
        tracing::debug!("sequencer reset");
    }

    /// Replace the timeline and restart playback from its first key.
    pub fn load_track(&mut self, track: Track) -> CinematicResult<()> {
        track.validate()?;
        self.track = track;
        self.restart();
        Ok(())
    }

    fn restart(&mut self) {
        self.clock = PlaybackClock::new();
        self.compositor.reset();
        self.flicker.reset();
        self.rng = Rng64::new(self.opts.seed);
        self.fade_override = None;
    }

    /// Insert a key while playing; the clock re-brackets around the edit.
    pub fn insert_key(&mut self, key: Keyframe, opts: InsertOpts) -> CinematicResult<usize> {
        let index = self.track.insert(key, opts)?;
        self.clock.refresh(&self.track);
        Ok(index)
    }

    /// Remove a key while playing; the clock re-brackets around the edit.
    pub fn remove_key(&mut self, index: usize) -> CinematicResult<Keyframe> {
        let key = self.track.remove(index)?;
        self.clock.refresh(&self.track);
        Ok(key)
    }

    /// Jump to `frame`, dropping in-flight persistent effects.
    pub fn seek(&mut self, frame: f64) {
        self.clock.seek(&self.track, frame);
        self.compositor.reset();
    }

    /// The keys bracketing the current position.
    pub fn current_pair(&self) -> Option<(&Keyframe, &Keyframe)> {
        self.track.frame_at(self.clock.current_frame())
    }

    /// Drive the fade progress `a` from the host instead of the default `1 - t`.
    pub fn set_fade_override(&mut self, a: Option<f64>) {
        self.fade_override = a;
    }

    /// Advance by `dt_secs` and render one frame.
    ///
    /// Data problems are skipped and reported in [`FrameReport::warnings`]; adapter failures abort
    /// the frame and are returned as [`CinematicError::Render`].
    #[tracing::instrument(
        level = "debug",
        skip(self, bitmaps, sound, adapter),
        fields(frame = self.clock.current_frame())
    )]
    pub fn render_frame(
        &mut self,
        dt_secs: f64,
        bitmaps: &dyn BitmapRepository,
        sound: &mut dyn SoundTrigger,
        adapter: &mut dyn RenderAdapter,
    ) -> CinematicResult<FrameReport> {
        let frames = self.clock.advance(&self.track, dt_secs);
        // Consumed before any adapter call so a failed frame cannot replay the key entry.
        let changed_key = self.clock.take_changed_key();
        let pair = self
            .clock
            .pair()
            .ok_or_else(|| CinematicError::track("track has no keyframes"))?;
        let t = self.clock.fraction(&self.track);
        let state = interpolate(&self.track, &pair, t)
            .ok_or_else(|| CinematicError::track("key pair out of range"))?;
        let mut warnings = Vec::new();

        let (effects, unknown) = state.effect.decode_lossy();
        if unknown {
            tracing::warn!(effect = state.effect.0, "unknown effect sub-field");
            warnings.push(FrameWarning::UnknownEffect {
                effect: state.effect,
            });
        }
        let (next_effects, _) = state.effect_next.decode_lossy();
        let a = self.fade_override.unwrap_or(1.0 - state.t);

        let fired = if changed_key {
            self.fire_sound(&state, sound, &mut warnings)
        } else {
            None
        };

        adapter.begin_frame()?;

        let alphas = layer_alphas(state.force, a);
        let tint = layer_tint(effects.pre, a, state.color, state.color_dest);

        let dreaming = effects.draw == DrawEffect::Dream;
        if dreaming {
            let amplitude = dream_amplitude(
                self.opts.dream_amplitude,
                next_effects.draw == DrawEffect::Dream,
                a,
            );
            let dream = self.compositor.dream_mut();
            dream.advance(frames);
            match state.bitmap.and_then(|id| bitmaps.bitmap(id)) {
                Some(bmp) => dream.precalc(effects.distortion, &bmp.grid.vertices, amplitude),
                None => dream.precalc(effects.distortion, &[], amplitude),
            }
        }

        let (light_a, light_b) = match state.lights {
            Some((la, lb)) => {
                let center = self.opts.logical.center().to_vec2();
                let la = la.translated(center);
                let lb = lb.translated(center);
                let smoothed = self.flicker.smooth(&la, &mut self.rng, dt_secs);
                let rnd_a = if dreaming {
                    (la.intensity() + smoothed).clamp(0.0, 1.0)
                } else {
                    LightFlicker::sample(&la, &mut self.rng)
                };
                let rnd_b = LightFlicker::sample(&lb, &mut self.rng);
                (Some((la, rnd_a)), Some((lb, rnd_b)))
            }
            None => (None, None),
        };

        let ctx = DrawCtx {
            mapping: ScreenMapping::new(self.opts.logical, self.opts.output, self.opts.reference),
            wireframe: self.opts.wireframe,
            bitmaps,
        };

        if effects.pre == PreEffect::Blur {
            let ghosts: Vec<_> = self.compositor.blur_mut().ghosts(alphas.primary).collect();
            for (pose, alpha) in ghosts {
                let ghost = Layer {
                    bitmap: state.bitmap,
                    pose,
                    color: tint.with_alpha(alpha),
                    light: light_a,
                    dream: None,
                };
                draw_layer(&mut self.vertices, &ctx, &ghost, adapter, &mut warnings)?;
            }
            self.compositor.blur_mut().push(state.primary);
        } else {
            self.compositor.blur_mut().clear();
        }

        let dream = dreaming.then(|| self.compositor.dream());
        let primary = Layer {
            bitmap: state.bitmap,
            pose: state.primary,
            color: tint.with_alpha(alphas.primary),
            light: light_a,
            dream,
        };
        draw_layer(&mut self.vertices, &ctx, &primary, adapter, &mut warnings)?;

        if let Some(alpha) = alphas.secondary {
            let secondary = Layer {
                bitmap: state.bitmap_next,
                pose: state.secondary,
                color: tint.with_alpha(alpha),
                light: light_b,
                dream,
            };
            draw_layer(&mut self.vertices, &ctx, &secondary, adapter, &mut warnings)?;
        }

        let post = self.compositor.step_post(
            changed_key,
            PostRequest {
                post: effects.post,
                speed: state.speed,
                color_flash: state.color_flash,
            },
            frames,
        );
        if let Some(wipe) = &post.wipe {
            adapter.draw_wipe(wipe)?;
        }
        if let Some(flash) = &post.flash {
            adapter.draw_flash(flash)?;
        }

        Ok(FrameReport {
            frame: self.clock.current_frame(),
            current: state.current,
            next: state.next,
            t: state.t,
            changed_key,
            sound: fired,
            alphas,
            flash: post.flash,
            wipe: post.wipe,
            warnings,
        })
    }

    fn fire_sound(
        &self,
        state: &InterpolatedState,
        sound: &mut dyn SoundTrigger,
        warnings: &mut Vec<FrameWarning>,
    ) -> Option<SoundId> {
        let id = self
            .track
            .key(state.current)?
            .sounds
            .get(self.opts.language)?;
        match sound.play(id) {
            Ok(()) => {
                tracing::debug!(sound = id.0, key = state.current, "sound fired");
                Some(id)
            }
            Err(e) => {
                tracing::warn!(sound = id.0, error = %e, "sound trigger failed");
                warnings.push(FrameWarning::SoundFailed {
                    sound: id,
                    message: e.to_string(),
                });
                None
            }
        }
    }
}

fn draw_layer(
    vertices: &mut VertexBuffer,
    ctx: &DrawCtx<'_>,
    layer: &Layer<'_>,
    adapter: &mut dyn RenderAdapter,
    warnings: &mut Vec<FrameWarning>,
) -> CinematicResult<()> {
    let Some(id) = layer.bitmap else {
        return Ok(());
    };
    let Some(bitmap) = ctx.bitmaps.bitmap(id) else {
        tracing::warn!(bitmap = id.0, "missing bitmap, layer skipped");
        warnings.push(FrameWarning::MissingBitmap { bitmap: id });
        return Ok(());
    };
    let mesh = &bitmap.grid;

    let camera = CameraPose::new(layer.pose.pos, layer.pose.angz, ctx.mapping.logical().center());
    let local = grid_transform(layer.pose.grid_pos, layer.pose.grid_angz);
    let projected = mesh.vertices.iter().enumerate().map(|(i, v)| {
        let mut v = *v;
        if let Some(dream) = layer.dream {
            let o = dream.offset(i);
            v.x += o.x;
            v.y += o.y;
        }
        let world = to_world(local, layer.pose.grid_pos.z, v);
        match adapter.project(&camera, world) {
            Some(p) => ScreenVertex {
                pos: ctx.mapping.map(p.pos),
                z: p.z,
                rhw: p.rhw,
                color: match layer.light {
                    Some((light, rnd)) => shade(&light, rnd, p.pos.x, p.pos.y, layer.color),
                    None => layer.color,
                },
                uv: Point::ORIGIN,
            },
            None => ScreenVertex {
                pos: Point::ORIGIN,
                z: 0.0,
                rhw: 0.0,
                color: layer.color,
                uv: Point::ORIGIN,
            },
        }
    });

    match vertices.fill(projected) {
        Ok(()) => {}
        Err(CinematicError::VertexCapacity { needed, capacity }) => {
            tracing::warn!(needed, capacity, "mesh exceeds vertex buffer, layer skipped");
            warnings.push(FrameWarning::VertexCapacity { needed, capacity });
            return Ok(());
        }
        Err(e) => return Err(e),
    }

    for material in &mesh.materials {
        let stream = vertices.as_mut_slice();
        for uv in &material.uvs {
            if let Some(v) = stream.get_mut(uv.vertex) {
                v.uv = uv.uv;
            }
        }
        let end = material.start_index + material.index_count;
        let Some(indices) = mesh.indices.get(material.start_index..end) else {
            continue;
        };
        adapter.bind_texture(material.texture)?;
        adapter.draw_triangles(vertices.as_slice(), indices)?;
        if ctx.wireframe {
            adapter.draw_wireframe(vertices.as_slice(), indices)?;
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/session/sequencer.rs"]
mod tests;
