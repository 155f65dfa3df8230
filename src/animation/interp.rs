use crate::{
    assets::store::BitmapId,
    effects::effect_id::EffectId,
    foundation::core::{Rgba8, Vec3},
    track::keyframe::{ForceFlags, InterpMode},
    track::light::Light,
    track::store::{KeyPair, Track},
};

/// Interpolation contract for keyframe channel types.
pub trait Lerp: Sized {
    /// Interpolate from `a` to `b` with normalized factor `t` in `[0, 1]`.
    fn lerp(a: &Self, b: &Self, t: f64) -> Self;
}

/// Channels that can also follow a cubic curve through four control values.
pub trait Curve: Lerp + Copy {
    /// Catmull-Rom segment between `p1` (`t = 0`) and `p2` (`t = 1`).
    fn cubic(p0: Self, p1: Self, p2: Self, p3: Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        a + (b - a) * t
    }
}

impl Curve for f64 {
    fn cubic(p0: Self, p1: Self, p2: Self, p3: Self, t: f64) -> Self {
        let t2 = t * t;
        let t3 = t2 * t;
        0.5 * ((2.0 * p1)
            + (p2 - p0) * t
            + (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * t2
            + (3.0 * p1 - p0 - 3.0 * p2 + p3) * t3)
    }
}

impl Lerp for Vec3 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Vec3::new(
            f64::lerp(&a.x, &b.x, t),
            f64::lerp(&a.y, &b.y, t),
            f64::lerp(&a.z, &b.z, t),
        )
    }
}

impl Curve for Vec3 {
    fn cubic(p0: Self, p1: Self, p2: Self, p3: Self, t: f64) -> Self {
        Vec3::new(
            f64::cubic(p0.x, p1.x, p2.x, p3.x, t),
            f64::cubic(p0.y, p1.y, p2.y, p3.y, t),
            f64::cubic(p0.z, p1.z, p2.z, p3.z, t),
        )
    }
}

impl Lerp for Rgba8 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        fn lerp_u8(a: u8, b: u8, t: f64) -> u8 {
            let a = f64::from(a);
            let b = f64::from(b);
            (a + (b - a) * t).round().clamp(0.0, 255.0) as u8
        }

        Self {
            r: lerp_u8(a.r, b.r, t),
            g: lerp_u8(a.g, b.g, t),
            b: lerp_u8(a.b, b.b, t),
            a: lerp_u8(a.a, b.a, t),
        }
    }
}

/// Blend one channel according to `mode`. `t <= 0` and `t >= 1` return the endpoints exactly.
pub fn blend<T: Curve>(mode: InterpMode, prev: Option<T>, a: T, b: T, next: Option<T>, t: f64) -> T {
    if t.is_nan() || t <= 0.0 {
        return a;
    }
    if t >= 1.0 {
        return b;
    }
    match mode {
        InterpMode::None => a,
        InterpMode::Linear => T::lerp(&a, &b, t),
        InterpMode::Bezier => match (prev, next) {
            (Some(p0), Some(p3)) => T::cubic(p0, a, b, p3, t),
            _ => T::lerp(&a, &b, t),
        },
    }
}

fn blend_color(a: Rgba8, b: Rgba8, t: f64) -> Rgba8 {
    if t.is_nan() || t <= 0.0 {
        return a;
    }
    if t >= 1.0 {
        return b;
    }
    Rgba8::lerp(&a, &b, t)
}

/// Camera and mesh-grid transform of one layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayerPose {
    /// Camera position.
    pub pos: Vec3,
    /// Camera roll in degrees.
    pub angz: f64,
    /// Grid translation.
    pub grid_pos: Vec3,
    /// Grid rotation in degrees.
    pub grid_angz: f64,
}

/// Visual state resolved between two keyframes.
#[derive(Clone, Debug, PartialEq)]
pub struct InterpolatedState {
    /// Index of the current key.
    pub current: usize,
    /// Index of the next key.
    pub next: usize,
    /// Normalized position between the keys.
    pub t: f64,
    /// Interpolation mode taken from the current key.
    pub interp: InterpMode,
    /// Pose of the primary layer.
    pub primary: LayerPose,
    /// Pose of the secondary ("next") layer.
    pub secondary: LayerPose,
    /// Base color.
    pub color: Rgba8,
    /// Destination color.
    pub color_dest: Rgba8,
    /// Flash color.
    pub color_flash: Rgba8,
    /// Primary layer image.
    pub bitmap: Option<BitmapId>,
    /// Secondary layer image.
    pub bitmap_next: Option<BitmapId>,
    /// Effects of the current key.
    pub effect: EffectId,
    /// Effects of the next key.
    pub effect_next: EffectId,
    /// Effect speed of the current key.
    pub speed: f64,
    /// Force flags of the current key.
    pub force: ForceFlags,
    /// `(current, next)` lights; `None` when either key is unlit.
    pub lights: Option<(Light, Light)>,
}

/// Resolve the visual state at fraction `t` between the keys of `pair`.
///
/// Returns `None` when `pair` does not index into `track`.
pub fn interpolate(track: &Track, pair: &KeyPair, t: f64) -> Option<InterpolatedState> {
    let a = track.key(pair.current)?;
    let b = track.key(pair.next)?;
    let (prev, after) = if pair.is_degenerate() {
        (None, None)
    } else {
        (
            pair.current.checked_sub(1).and_then(|i| track.key(i)),
            track.key(pair.next + 1),
        )
    };
    let mode = a.interp;

    let pos = blend(mode, prev.map(|k| k.pos), a.pos, b.pos, after.map(|k| k.pos), t);
    let angz = blend(mode, prev.map(|k| k.angz), a.angz, b.angz, after.map(|k| k.angz), t);
    let grid_pos = blend(
        mode,
        prev.map(|k| k.grid_pos),
        a.grid_pos,
        b.grid_pos,
        after.map(|k| k.grid_pos),
        t,
    );
    let grid_angz = blend(
        mode,
        prev.map(|k| k.grid_angz),
        a.grid_angz,
        b.grid_angz,
        after.map(|k| k.grid_angz),
        t,
    );
    let primary = LayerPose {
        pos,
        angz,
        grid_pos,
        grid_angz,
    };

    // A held camera jumps to the next key for the second layer; moving cameras share the pose.
    let (sec_pos, sec_angz) = match mode {
        InterpMode::None => (b.pos, b.angz),
        InterpMode::Linear | InterpMode::Bezier => (pos, angz),
    };
    let secondary = LayerPose {
        pos: sec_pos,
        angz: sec_angz,
        grid_pos: b.grid_pos,
        grid_angz: b.grid_angz,
    };

    let lights = match (a.light, b.light) {
        (Some(la), Some(lb)) => Some((la, lb)),
        _ => None,
    };

    Some(InterpolatedState {
        current: pair.current,
        next: pair.next,
        t: if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) },
        interp: mode,
        primary,
        secondary,
        color: blend_color(a.color, b.color, t),
        color_dest: blend_color(a.color_dest, b.color_dest, t),
        color_flash: blend_color(a.color_flash, b.color_flash, t),
        bitmap: a.bitmap,
        bitmap_next: b.bitmap,
        effect: a.effect,
        effect_next: b.effect,
        speed: a.speed,
        force: a.force,
        lights,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/animation/interp.rs"]
mod tests;
