use crate::assets::store::TextureId;
use crate::effects::effect_id::WipeKind;
use crate::foundation::core::{Point, Rgba8, Vec3};
use crate::render::camera::{CameraPose, Projected};

/// Device or draw failure reported by a [`RenderAdapter`].
///
/// The sequencer never retries; the error is returned from the frame entry point and the host
/// decides whether to skip the frame or stop.
#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    /// A draw call failed on the device.
    #[error("draw failed: {0}")]
    Draw(String),

    /// A material referenced a texture the device does not know.
    #[error("unknown texture {0:?}")]
    UnknownTexture(TextureId),
}

impl RenderError {
    /// Build a [`RenderError::Draw`].
    pub fn draw(msg: impl Into<String>) -> Self {
        Self::Draw(msg.into())
    }
}

/// Transformed, lit vertex in reference screen space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScreenVertex {
    /// Screen position.
    pub pos: Point,
    /// View depth.
    pub z: f64,
    /// Reciprocal homogeneous w.
    pub rhw: f64,
    /// Diffuse color (straight alpha).
    pub color: Rgba8,
    /// Texture coordinate.
    pub uv: Point,
}

/// Full-screen flash overlay.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct FlashQuad {
    /// Overlay color; its own alpha is ignored.
    pub color: Rgba8,
    /// Overlay opacity in `[0, 1]`.
    pub alpha: f64,
}

/// Full-screen wipe mask.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct WipeQuad {
    /// Reveal direction.
    pub kind: WipeKind,
    /// Revealed fraction of the screen width in `[0, 1]`.
    pub progress: f64,
}

/// Drawing capability the sequencer renders through.
///
/// Calls are blocking and never reentrant. Any error aborts the current frame.
pub trait RenderAdapter {
    /// Called once before anything is drawn for a frame.
    fn begin_frame(&mut self) -> Result<(), RenderError> {
        Ok(())
    }

    /// Project a world point with `camera`. `None` culls the point.
    fn project(&self, camera: &CameraPose, p: Vec3) -> Option<Projected> {
        camera.project(p)
    }

    /// Bind the texture used by the following triangle draws (`None` draws untextured).
    fn bind_texture(&mut self, texture: Option<TextureId>) -> Result<(), RenderError>;

    /// Draw an indexed triangle list.
    fn draw_triangles(
        &mut self,
        vertices: &[ScreenVertex],
        indices: &[u16],
    ) -> Result<(), RenderError>;

    /// Draw the edges of an indexed triangle list.
    fn draw_wireframe(
        &mut self,
        _vertices: &[ScreenVertex],
        _indices: &[u16],
    ) -> Result<(), RenderError> {
        Ok(())
    }

    /// Draw the flash overlay.
    fn draw_flash(&mut self, quad: &FlashQuad) -> Result<(), RenderError>;

    /// Draw the wipe mask.
    fn draw_wipe(&mut self, quad: &WipeQuad) -> Result<(), RenderError>;
}
