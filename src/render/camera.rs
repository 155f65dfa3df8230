use crate::foundation::core::{Affine, Point, Vec3};

/// Focal length of the cinematic camera, in pixels.
pub const DEFAULT_FOCAL: f64 = 350.0;

const NEAR: f64 = 1.0;

/// Screen-space result of a projection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projected {
    /// Screen position in output pixels.
    pub pos: Point,
    /// View depth.
    pub z: f64,
    /// `1 / z`.
    pub rhw: f64,
}

/// Pinhole camera looking down +z at the image plane.
///
/// With `pos.z == 0` the camera sits `focal` units in front of the `z = 0` plane, so a grid drawn
/// there maps one mesh unit to one pixel. Negative `pos.z` pulls the camera back.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraPose {
    /// Camera position.
    pub pos: Vec3,
    /// Roll around the view axis, in degrees.
    pub angz: f64,
    /// Screen point the view axis passes through.
    pub center: Point,
    /// Focal length in pixels.
    pub focal: f64,
}

impl CameraPose {
    /// Camera with the default focal length.
    pub fn new(pos: Vec3, angz: f64, center: Point) -> Self {
        Self {
            pos,
            angz,
            center,
            focal: DEFAULT_FOCAL,
        }
    }

    /// Project `p`; points at or behind the near plane are culled.
    pub fn project(&self, p: Vec3) -> Option<Projected> {
        let depth = self.focal + p.z - self.pos.z;
        if depth.is_nan() || depth < NEAR {
            return None;
        }
        let (s, c) = (-self.angz).to_radians().sin_cos();
        let vx = p.x - self.pos.x;
        let vy = p.y - self.pos.y;
        let rx = vx * c - vy * s;
        let ry = vx * s + vy * c;
        let k = self.focal / depth;
        Some(Projected {
            pos: Point::new(self.center.x + rx * k, self.center.y + ry * k),
            z: depth,
            rhw: 1.0 / depth,
        })
    }
}

/// Mesh-local transform of an image grid: rotate by `angz_deg`, then translate by `offset.xy`.
pub fn grid_transform(offset: Vec3, angz_deg: f64) -> Affine {
    let (s, c) = angz_deg.to_radians().sin_cos();
    Affine::new([c, -s, s, c, offset.x, offset.y])
}

/// Apply [`grid_transform`] to `v`, carrying `offset.z` on the depth axis.
pub fn to_world(transform: Affine, offset_z: f64, v: Vec3) -> Vec3 {
    let p = transform * Point::new(v.x, v.y);
    Vec3::new(p.x, p.y, v.z + offset_z)
}

#[cfg(test)]
#[path = "../../tests/unit/render/camera.rs"]
mod tests;
