use crate::track::store::{KeyPair, Track};

/// Maps caller-supplied delta time to a track position and tracks the bracketing key pair.
///
/// The "changed key" edge is raised whenever the bracketing keyframes differ from the previous
/// call (and on every [`PlaybackClock::seek`]). It stays raised until consumed with
/// [`PlaybackClock::take_changed_key`]; several raises before consumption coalesce into one.
#[derive(Clone, Debug, Default)]
pub struct PlaybackClock {
    frame: f64,
    pair: Option<KeyPair>,
    changed_key: bool,
}

impl PlaybackClock {
    /// Clock at frame 0 with no pair resolved yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance by `dt_secs` of wall-clock time and return the number of frames actually moved.
    ///
    /// The step is scaled by the track fps and the current key's `track_speed`, and the position
    /// is clamped to the authored key range. Negative or non-finite deltas do not move the clock.
    pub fn advance(&mut self, track: &Track, dt_secs: f64) -> f64 {
        let dt = if dt_secs.is_finite() { dt_secs.max(0.0) } else { 0.0 };
        let speed = track
            .bracket(self.frame)
            .and_then(|p| track.key(p.current))
            .map_or(1.0, |k| k.track_speed);

        let before = self.frame;
        let target = self.frame + track.fps().secs_to_frames(dt) * speed;
        self.frame = clamp_to_track(track, target);
        self.rebracket(track);
        self.frame - before
    }

    /// Jump to `frame` (clamped to the key range). Always raises the edge.
    pub fn seek(&mut self, track: &Track, frame: f64) {
        self.frame = clamp_to_track(track, frame);
        self.pair = track.bracket(self.frame);
        self.changed_key = true;
        tracing::debug!(frame = self.frame, "seek");
    }

    /// Re-resolve the pair after the track was edited.
    ///
    /// The edge is raised only when the bracketing keyframes changed identity.
    pub fn refresh(&mut self, track: &Track) {
        self.frame = clamp_to_track(track, self.frame);
        self.rebracket(track);
    }

    fn rebracket(&mut self, track: &Track) {
        let pair = track.bracket(self.frame);
        let same = match (&self.pair, &pair) {
            (Some(old), Some(new)) => old.same_keys(new),
            (None, None) => true,
            _ => false,
        };
        if !same {
            self.changed_key = true;
            if let Some(p) = &pair {
                tracing::debug!(
                    frame = self.frame,
                    current = p.current,
                    next = p.next,
                    "entered key pair"
                );
            }
        }
        self.pair = pair;
    }

    /// Consume the "changed key" edge.
    pub fn take_changed_key(&mut self) -> bool {
        std::mem::take(&mut self.changed_key)
    }

    /// Peek at the "changed key" edge without consuming it.
    pub fn changed_key(&self) -> bool {
        self.changed_key
    }

    /// Current bracketing pair.
    pub fn pair(&self) -> Option<KeyPair> {
        self.pair
    }

    /// Current position in frames.
    pub fn current_frame(&self) -> f64 {
        self.frame
    }

    /// First playable frame of `track`.
    pub fn start_frame(&self, track: &Track) -> f64 {
        track.start_frame()
    }

    /// Last playable frame of `track`.
    pub fn end_frame(&self, track: &Track) -> f64 {
        track.end_frame()
    }

    /// Normalized position between the bracketing keys.
    pub fn fraction(&self, track: &Track) -> f64 {
        self.pair.map_or(0.0, |p| track.fraction(&p, self.frame))
    }

    /// Return `true` once the last key has been reached.
    pub fn is_finished(&self, track: &Track) -> bool {
        self.frame >= track.end_frame()
    }
}

fn clamp_to_track(track: &Track, frame: f64) -> f64 {
    let (lo, hi) = (track.start_frame(), track.end_frame());
    if frame.is_nan() {
        return lo;
    }
    frame.clamp(lo, hi.max(lo))
}

#[cfg(test)]
#[path = "../../tests/unit/playback/clock.rs"]
mod tests;
