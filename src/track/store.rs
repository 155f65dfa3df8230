use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{CinematicError, CinematicResult};
use crate::track::keyframe::Keyframe;

/// Stable identity of a keyframe inside one [`Track`].
///
/// Ids survive insertions and removals around the key, so playback can tell whether the
/// bracketing keys really changed after an edit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct KeyId(u64);

#[derive(Clone, Debug)]
struct StoredKey {
    id: KeyId,
    key: Keyframe,
}

/// Insertion behaviour for [`Track::insert`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InsertOpts {
    /// Replace a key already sitting on the same frame. When `false` the new key is stacked
    /// after it; the later key still wins lookups at that frame.
    pub replace_current: bool,
    /// Rewrite the following key's base color to the inserted key's destination color.
    pub replace_next: bool,
    /// Copy the mesh-grid transform from the key currently bracketing the frame.
    pub snap_to_grid: bool,
}

impl Default for InsertOpts {
    fn default() -> Self {
        Self {
            replace_current: true,
            replace_next: false,
            snap_to_grid: false,
        }
    }
}

/// Indices of the keyframes bracketing a timeline position.
#[derive(Clone, Copy, Debug)]
pub struct KeyPair {
    /// Index of the current (at or before) key.
    pub current: usize,
    /// Index of the next key; equal to `current` past the end.
    pub next: usize,
    current_id: KeyId,
    next_id: KeyId,
}

impl KeyPair {
    /// Return `true` when both pairs reference the same keyframes, regardless of index shifts.
    pub fn same_keys(&self, other: &KeyPair) -> bool {
        self.current_id == other.current_id && self.next_id == other.next_id
    }

    /// Return `true` past the end (or before the start) of the track.
    pub fn is_degenerate(&self) -> bool {
        self.current == self.next
    }
}

/// Serde form of a [`Track`].
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct TrackDef {
    /// Track length in frames.
    pub duration: u64,
    /// Playback rate.
    pub fps: Fps,
    /// Maximum number of keyframes.
    #[serde(default = "default_capacity")]
    pub capacity: usize,
    /// Keyframes sorted by frame.
    pub keys: Vec<Keyframe>,
}

fn default_capacity() -> usize {
    Track::DEFAULT_CAPACITY
}

/// Ordered keyframe timeline.
///
/// Keys are kept sorted by frame. Equal frames are allowed; among them insertion order is kept
/// and the last one wins [`Track::bracket`] lookups.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "TrackDef", into = "TrackDef")]
pub struct Track {
    duration: FrameIndex,
    fps: Fps,
    capacity: usize,
    keys: Vec<StoredKey>,
    next_id: u64,
}

impl Track {
    /// Capacity used by [`Track::new_default`].
    pub const DEFAULT_CAPACITY: usize = 256;
    /// Duration used by [`Track::new_default`].
    pub const DEFAULT_DURATION: u64 = 100;

    /// Create an empty track with room for `capacity` keys.
    pub fn allocate(capacity: usize, duration_frames: u64, fps: Fps) -> CinematicResult<Self> {
        if capacity < 2 {
            return Err(CinematicError::validation(
                "track capacity must hold at least two keyframes",
            ));
        }
        if duration_frames == 0 {
            return Err(CinematicError::validation("track duration must be > 0"));
        }
        Fps::new(fps.num, fps.den)?;
        Ok(Self {
            duration: FrameIndex(duration_frames),
            fps,
            capacity,
            keys: Vec::with_capacity(capacity.min(1024)),
            next_id: 0,
        })
    }

    /// The track a fresh session starts with: 100 frames at 30 fps, keys at 0 and 100.
    pub fn new_default() -> Self {
        let mut keys = Vec::with_capacity(2);
        keys.push(StoredKey {
            id: KeyId(0),
            key: Keyframe::new(FrameIndex(0)),
        });
        keys.push(StoredKey {
            id: KeyId(1),
            key: Keyframe::new(FrameIndex(Self::DEFAULT_DURATION)),
        });
        Self {
            duration: FrameIndex(Self::DEFAULT_DURATION),
            fps: Fps { num: 30, den: 1 },
            capacity: Self::DEFAULT_CAPACITY,
            keys,
            next_id: 2,
        }
    }

    /// Track length in frames.
    pub fn duration(&self) -> FrameIndex {
        self.duration
    }

    /// Playback rate.
    pub fn fps(&self) -> Fps {
        self.fps
    }

    /// Maximum number of keys.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Return `true` when the track holds no keys.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Key at `index`.
    pub fn key(&self, index: usize) -> Option<&Keyframe> {
        self.keys.get(index).map(|s| &s.key)
    }

    /// Stable id of the key at `index`.
    pub fn key_id(&self, index: usize) -> Option<KeyId> {
        self.keys.get(index).map(|s| s.id)
    }

    /// Keys in timeline order.
    pub fn keys(&self) -> impl Iterator<Item = &Keyframe> {
        self.keys.iter().map(|s| &s.key)
    }

    /// Frame of the first key (0 for an empty track).
    pub fn start_frame(&self) -> f64 {
        self.keys.first().map_or(0.0, |s| s.key.frame.as_f64())
    }

    /// Frame of the last key (0 for an empty track).
    pub fn end_frame(&self) -> f64 {
        self.keys.last().map_or(0.0, |s| s.key.frame.as_f64())
    }

    /// Check the structural invariants a playable track must hold.
    pub fn validate(&self) -> CinematicResult<()> {
        if self.keys.len() < 2 {
            return Err(CinematicError::track(
                "track must hold at least two keyframes",
            ));
        }
        if self.keys.len() > self.capacity {
            return Err(CinematicError::TrackFull {
                capacity: self.capacity,
            });
        }
        if !self.keys.windows(2).all(|w| w[0].key.frame <= w[1].key.frame) {
            return Err(CinematicError::track("keyframes must be sorted by frame"));
        }
        for s in &self.keys {
            if s.key.frame > self.duration {
                return Err(CinematicError::track(format!(
                    "keyframe at frame {} is beyond track duration {}",
                    s.key.frame.0, self.duration.0
                )));
            }
            s.key.validate()?;
        }
        Ok(())
    }

    /// Insert `key` keeping frame order. Returns the index the key ended up at.
    pub fn insert(&mut self, mut key: Keyframe, opts: InsertOpts) -> CinematicResult<usize> {
        key.validate()?;
        if key.frame > self.duration {
            return Err(CinematicError::track(format!(
                "keyframe at frame {} is beyond track duration {}",
                key.frame.0, self.duration.0
            )));
        }

        let pos = self.keys.partition_point(|s| s.key.frame <= key.frame);
        let same_frame = pos > 0 && self.keys[pos - 1].key.frame == key.frame;

        if opts.snap_to_grid
            && let Some(bracketing) = pos.checked_sub(1).map(|i| &self.keys[i].key)
        {
            key.grid_pos = bracketing.grid_pos;
            key.grid_angz = bracketing.grid_angz;
        }

        let index = if same_frame && opts.replace_current {
            self.keys[pos - 1].key = key;
            pos - 1
        } else {
            if self.keys.len() >= self.capacity {
                return Err(CinematicError::TrackFull {
                    capacity: self.capacity,
                });
            }
            let id = KeyId(self.next_id);
            self.next_id += 1;
            self.keys.insert(pos, StoredKey { id, key });
            pos
        };

        if opts.replace_next {
            let dest = self.keys[index].key.color_dest;
            if let Some(next) = self.keys.get_mut(index + 1) {
                next.key.color = dest;
            }
        }

        Ok(index)
    }

    /// Remove the key at `index`. A track never drops below two keys.
    pub fn remove(&mut self, index: usize) -> CinematicResult<Keyframe> {
        if index >= self.keys.len() {
            return Err(CinematicError::track(format!(
                "no keyframe at index {index}"
            )));
        }
        if self.keys.len() <= 2 {
            return Err(CinematicError::track(
                "track must keep at least two keyframes",
            ));
        }
        Ok(self.keys.remove(index).key)
    }

    /// Locate the keys bracketing `frame`.
    ///
    /// Past the last key both indices point at the last key; before the first key both point at
    /// the first. Returns `None` only for an empty track.
    pub fn bracket(&self, frame: f64) -> Option<KeyPair> {
        if self.keys.is_empty() {
            return None;
        }
        let p = self.keys.partition_point(|s| s.key.frame.as_f64() <= frame);
        let current = p.saturating_sub(1);
        let next = if p == 0 {
            0
        } else {
            (current + 1).min(self.keys.len() - 1)
        };
        Some(KeyPair {
            current,
            next,
            current_id: self.keys[current].id,
            next_id: self.keys[next].id,
        })
    }

    /// The `(current, next)` keyframes bracketing `frame`.
    pub fn frame_at(&self, frame: f64) -> Option<(&Keyframe, &Keyframe)> {
        let pair = self.bracket(frame)?;
        Some((&self.keys[pair.current].key, &self.keys[pair.next].key))
    }

    /// Normalized position of `frame` between the keys of `pair`, in `[0, 1]`.
    pub fn fraction(&self, pair: &KeyPair, frame: f64) -> f64 {
        let (Some(a), Some(b)) = (self.key(pair.current), self.key(pair.next)) else {
            return 0.0;
        };
        let span = b.frame.as_f64() - a.frame.as_f64();
        if span <= 0.0 {
            return 0.0;
        }
        ((frame - a.frame.as_f64()) / span).clamp(0.0, 1.0)
    }
}

impl Default for Track {
    fn default() -> Self {
        Self::new_default()
    }
}

impl TryFrom<TrackDef> for Track {
    type Error = CinematicError;

    fn try_from(def: TrackDef) -> CinematicResult<Self> {
        if !def.keys.windows(2).all(|w| w[0].frame <= w[1].frame) {
            return Err(CinematicError::track("keyframes must be sorted by frame"));
        }
        let mut track = Track::allocate(def.capacity, def.duration, def.fps)?;
        let stack = InsertOpts {
            replace_current: false,
            ..InsertOpts::default()
        };
        for key in def.keys {
            track.insert(key, stack)?;
        }
        track.validate()?;
        Ok(track)
    }
}

impl From<Track> for TrackDef {
    fn from(track: Track) -> Self {
        TrackDef {
            duration: track.duration.0,
            fps: track.fps,
            capacity: track.capacity,
            keys: track.keys.into_iter().map(|s| s.key).collect(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/track/store.rs"]
mod tests;
