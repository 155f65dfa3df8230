use crate::foundation::core::{Point, Rgba8};
use crate::foundation::math::{Rng64, clamp_channel};
use crate::track::light::Light;

/// Shade `base` at screen position `(x, y)` under `light`.
///
/// `light_rnd` is the per-frame randomized intensity factor from [`LightFlicker::sample`]. Past
/// the outer radius the base color is darkened by `light_rnd`; inside it the light color is added
/// with a linear falloff between the two radii. Alpha passes through unchanged.
pub fn shade(light: &Light, light_rnd: f64, x: f64, y: f64, base: Rgba8) -> Rgba8 {
    let rnd = if light_rnd.is_nan() {
        0.0
    } else {
        light_rnd.clamp(0.0, 1.0)
    };
    let r = light.pos().distance(Point::new(x, y));
    let [lr, lg, lb] = light.color();

    if r > light.fall_out() {
        return Rgba8 {
            r: clamp_channel(f64::from(base.r) * rnd),
            g: clamp_channel(f64::from(base.g) * rnd),
            b: clamp_channel(f64::from(base.b) * rnd),
            a: base.a,
        };
    }

    let f = if r < light.fall_in() {
        1.0
    } else {
        falloff(light, r)
    };
    let add = |c: u8, l: f64| clamp_channel(f64::from(c) + (l * rnd * f).trunc());
    Rgba8 {
        r: add(base.r, lr),
        g: add(base.g, lg),
        b: add(base.b, lb),
        a: base.a,
    }
}

fn falloff(light: &Light, r: f64) -> f64 {
    let span = light.fall_out() - light.fall_in();
    if span <= 0.0 {
        return 1.0;
    }
    ((light.fall_out() - r) / span).clamp(0.0, 1.0)
}

/// Randomized light intensity.
///
/// The instantaneous factor is resampled for every layer draw; the smoothed factor approaches a
/// fresh random target at `gain` per second and drives slower flicker.
#[derive(Clone, Copy, Debug)]
pub struct LightFlicker {
    smoothed: f64,
    gain: f64,
}

impl LightFlicker {
    /// Flicker state with the given smoothing gain.
    pub fn new(gain: f64) -> Self {
        Self {
            smoothed: 0.0,
            gain,
        }
    }

    /// `clamp(intensity + intensity_rnd * uniform, 0, 1)`.
    pub fn sample(light: &Light, rng: &mut Rng64) -> f64 {
        (light.intensity() + light.intensity_rnd() * rng.next_f64_01()).clamp(0.0, 1.0)
    }

    /// Move the smoothed factor toward a new random target over `dt_secs`.
    pub fn smooth(&mut self, light: &Light, rng: &mut Rng64, dt_secs: f64) -> f64 {
        let target = light.intensity_rnd() * rng.next_f64_01();
        let dt = if dt_secs.is_finite() { dt_secs.max(0.0) } else { 0.0 };
        self.smoothed += (target - self.smoothed) * dt * self.gain;
        self.smoothed = if self.smoothed.is_nan() {
            0.0
        } else {
            self.smoothed.clamp(0.0, 1.0)
        };
        self.smoothed
    }

    /// Last smoothed factor.
    pub fn smoothed(&self) -> f64 {
        self.smoothed
    }

    /// Drop the smoothed state.
    pub fn reset(&mut self) {
        self.smoothed = 0.0;
    }
}

impl Default for LightFlicker {
    fn default() -> Self {
        Self::new(10.0)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/lighting/model.rs"]
mod tests;
