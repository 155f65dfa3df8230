use std::collections::VecDeque;

use crate::animation::interp::LayerPose;

/// Ring of recent primary-layer poses redrawn behind the current one by the blur pre-effect.
#[derive(Clone, Debug)]
pub struct BlurTrail {
    poses: VecDeque<LayerPose>,
    capacity: usize,
}

impl BlurTrail {
    /// Trail remembering at most `capacity` poses.
    pub fn new(capacity: usize) -> Self {
        Self {
            poses: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Remember `pose`, evicting the oldest one when full.
    pub fn push(&mut self, pose: LayerPose) {
        if self.capacity == 0 {
            return;
        }
        if self.poses.len() == self.capacity {
            self.poses.pop_front();
        }
        self.poses.push_back(pose);
    }

    /// Past poses oldest first, each with its alpha scaled from `base_alpha`.
    ///
    /// Alpha falls off linearly with age; the newest remembered pose gets
    /// `base_alpha * n / (n + 1)` and the oldest `base_alpha / (n + 1)`.
    pub fn ghosts(&self, base_alpha: u8) -> impl Iterator<Item = (LayerPose, u8)> + '_ {
        let n = self.poses.len() as u32;
        self.poses.iter().enumerate().map(move |(i, pose)| {
            let rank = i as u32 + 1;
            let alpha = u32::from(base_alpha) * rank / (n + 1);
            (*pose, alpha as u8)
        })
    }

    /// Number of remembered poses.
    pub fn len(&self) -> usize {
        self.poses.len()
    }

    /// Return `true` when no pose is remembered.
    pub fn is_empty(&self) -> bool {
        self.poses.is_empty()
    }

    /// Forget all poses.
    pub fn clear(&mut self) {
        self.poses.clear();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/blur.rs"]
mod tests;
