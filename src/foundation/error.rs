use crate::render::adapter::RenderError;

/// Result alias used across the crate.
pub type CinematicResult<T> = Result<T, CinematicError>;

/// Errors produced by the sequencer core.
///
/// Authoring problems hit during a frame are absorbed into [`crate::FrameWarning`]s; the variants
/// here are returned from editing, loading and configuration calls, and [`CinematicError::Render`]
/// is escalated from the per-frame entry point.
#[derive(thiserror::Error, Debug)]
pub enum CinematicError {
    /// Invalid input value or configuration.
    #[error("validation error: {0}")]
    Validation(String),

    /// Keyframe insertion into a track that has no free capacity.
    #[error("track is full ({capacity} keyframes)")]
    TrackFull {
        /// Keyframe capacity of the track.
        capacity: usize,
    },

    /// Track structure error (ordering, removal below the minimum key count, bad index).
    #[error("track error: {0}")]
    Track(String),

    /// Effect id could not be decoded.
    #[error("effect error: {0}")]
    Effect(String),

    /// Asset lookup failure.
    #[error("asset error: {0}")]
    Asset(String),

    /// A mesh needs more vertices than the scratch buffer holds.
    #[error("vertex buffer capacity exceeded: need {needed}, capacity {capacity}")]
    VertexCapacity {
        /// Vertices requested.
        needed: usize,
        /// Scratch buffer capacity.
        capacity: usize,
    },

    /// Device/draw failure reported by the render adapter.
    #[error(transparent)]
    Render(#[from] RenderError),

    /// (De)serialization failure.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Anything else.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl CinematicError {
    /// Build a [`CinematicError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`CinematicError::Track`].
    pub fn track(msg: impl Into<String>) -> Self {
        Self::Track(msg.into())
    }

    /// Build a [`CinematicError::Effect`].
    pub fn effect(msg: impl Into<String>) -> Self {
        Self::Effect(msg.into())
    }

    /// Build a [`CinematicError::Asset`].
    pub fn asset(msg: impl Into<String>) -> Self {
        Self::Asset(msg.into())
    }

    /// Build a [`CinematicError::Serde`].
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

impl From<serde_json::Error> for CinematicError {
    fn from(e: serde_json::Error) -> Self {
        Self::serde(e.to_string())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
