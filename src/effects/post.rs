//! Per-step drivers for the persistent post-effects.
//!
//! Both drivers advance an accumulator owned by the compositor and return `false` once the effect
//! has run to completion.

/// Flash alpha right after arming.
pub const FLASH_START_ALPHA: f64 = 1.0;

/// Decay the flash alpha by `speed` per track frame.
pub fn flash_step(alpha: &mut f64, speed: f64, frames: f64) -> bool {
    *alpha -= step_amount(speed, frames);
    *alpha > 0.0
}

/// Grow the wipe displacement by `speed / 100` of the screen width per track frame.
pub fn wipe_step(dx: &mut f64, speed: f64, frames: f64) -> bool {
    *dx += step_amount(speed, frames) / 100.0;
    *dx < 1.0
}

fn step_amount(speed: f64, frames: f64) -> f64 {
    let v = speed * frames;
    if v.is_finite() { v.max(0.0) } else { 0.0 }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/post.rs"]
mod tests;
