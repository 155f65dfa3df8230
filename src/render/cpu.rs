use std::collections::HashMap;

use image::{Rgba, RgbaImage};

use crate::assets::store::TextureId;
use crate::effects::effect_id::WipeKind;
use crate::foundation::core::{Canvas, Point, Rgba8};
use crate::foundation::math::mul_div255_u8;
use crate::render::adapter::{FlashQuad, RenderAdapter, RenderError, ScreenVertex, WipeQuad};

/// Reference software rasterizer.
///
/// Vertices arrive in reference screen space and are scaled onto the target image. Triangles are
/// Gouraud shaded, textures are sampled nearest-neighbour with perspective-correct UVs and modulated
/// by the vertex color, and everything blends straight-alpha source-over.
pub struct CpuAdapter {
    target: RgbaImage,
    reference: Canvas,
    clear: Rgba8,
    textures: HashMap<TextureId, RgbaImage>,
    bound: Option<TextureId>,
}

impl CpuAdapter {
    /// Adapter drawing into an `output`-sized image from `reference` screen space.
    pub fn new(output: Canvas, reference: Canvas) -> Self {
        Self {
            target: RgbaImage::new(output.width, output.height),
            reference,
            clear: Rgba8::new(0, 0, 0, 255),
            textures: HashMap::new(),
            bound: None,
        }
    }

    /// Color the target is cleared to at the start of each frame.
    pub fn with_clear(mut self, clear: Rgba8) -> Self {
        self.clear = clear;
        self
    }

    /// Register a texture.
    pub fn insert_texture(&mut self, id: TextureId, texture: RgbaImage) {
        self.textures.insert(id, texture);
    }

    /// The rendered frame.
    pub fn image(&self) -> &RgbaImage {
        &self.target
    }

    /// Pixel at `(x, y)` of the rendered frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba8> {
        if x >= self.target.width() || y >= self.target.height() {
            return None;
        }
        let [r, g, b, a] = self.target.get_pixel(x, y).0;
        Some(Rgba8::new(r, g, b, a))
    }

    fn to_target(&self, p: Point) -> Point {
        let sx = f64::from(self.target.width()) / f64::from(self.reference.width.max(1));
        let sy = f64::from(self.target.height()) / f64::from(self.reference.height.max(1));
        Point::new(p.x * sx, p.y * sy)
    }

    fn blend_pixel(&mut self, x: u32, y: u32, src: Rgba8) {
        let dst = self.target.get_pixel_mut(x, y);
        dst.0 = over(dst.0, src);
    }

    fn fill_triangle(&mut self, tri: [&ScreenVertex; 3]) {
        let p = tri.map(|v| self.to_target(v.pos));
        let area = edge(p[0], p[1], p[2]);
        if area.abs() < 1e-12 || !area.is_finite() {
            return;
        }
        let (w, h) = (self.target.width(), self.target.height());
        let Some((x0, x1)) = span(p.iter().map(|q| q.x), w) else {
            return;
        };
        let Some((y0, y1)) = span(p.iter().map(|q| q.y), h) else {
            return;
        };

        let texture = self.bound.and_then(|id| self.textures.get(&id));

        for y in y0..=y1 {
            for x in x0..=x1 {
                let c = Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
                let b = [
                    edge(p[1], p[2], c) / area,
                    edge(p[2], p[0], c) / area,
                    edge(p[0], p[1], c) / area,
                ];
                if b.iter().any(|&k| k < 0.0) {
                    continue;
                }

                let mut color = gouraud(tri, b);
                if let Some(tex) = texture {
                    let texel = sample(tex, perspective_uv(tri, b));
                    color = modulate(color, texel);
                }
                let dst = self.target.get_pixel_mut(x, y);
                dst.0 = over(dst.0, color);
            }
        }
    }

    fn draw_line(&mut self, a: Point, b: Point, color: Rgba8) {
        let (w, h) = (f64::from(self.target.width()), f64::from(self.target.height()));
        let Some((a, b)) = clip_segment(self.to_target(a), self.to_target(b), w, h) else {
            return;
        };
        let steps = (b.x - a.x).abs().max((b.y - a.y).abs()).ceil();
        if !steps.is_finite() {
            return;
        }
        let n = steps.max(1.0) as u32;
        for i in 0..=n {
            let t = f64::from(i) / f64::from(n);
            let x = a.x + (b.x - a.x) * t;
            let y = a.y + (b.y - a.y) * t;
            if x >= 0.0
                && y >= 0.0
                && x < f64::from(self.target.width())
                && y < f64::from(self.target.height())
            {
                self.blend_pixel(x as u32, y as u32, color);
            }
        }
    }
}

impl RenderAdapter for CpuAdapter {
    fn begin_frame(&mut self) -> Result<(), RenderError> {
        let clear = Rgba(self.clear.to_array());
        for px in self.target.pixels_mut() {
            *px = clear;
        }
        Ok(())
    }

    fn bind_texture(&mut self, texture: Option<TextureId>) -> Result<(), RenderError> {
        if let Some(id) = texture
            && !self.textures.contains_key(&id)
        {
            return Err(RenderError::UnknownTexture(id));
        }
        self.bound = texture;
        Ok(())
    }

    fn draw_triangles(
        &mut self,
        vertices: &[ScreenVertex],
        indices: &[u16],
    ) -> Result<(), RenderError> {
        for tri in indices.chunks_exact(3) {
            let tri = fetch(vertices, tri)?;
            if tri.iter().any(|v| v.rhw <= 0.0) {
                continue;
            }
            self.fill_triangle(tri);
        }
        Ok(())
    }

    fn draw_wireframe(
        &mut self,
        vertices: &[ScreenVertex],
        indices: &[u16],
    ) -> Result<(), RenderError> {
        for tri in indices.chunks_exact(3) {
            let [a, b, c] = fetch(vertices, tri)?;
            if [a, b, c].iter().any(|v| v.rhw <= 0.0) {
                continue;
            }
            let color = a.color.with_alpha(255);
            self.draw_line(a.pos, b.pos, color);
            self.draw_line(b.pos, c.pos, color);
            self.draw_line(c.pos, a.pos, color);
        }
        Ok(())
    }

    fn draw_flash(&mut self, quad: &FlashQuad) -> Result<(), RenderError> {
        let alpha = unit_to_u8(quad.alpha);
        if alpha == 0 {
            return Ok(());
        }
        let src = quad.color.with_alpha(alpha);
        for px in self.target.pixels_mut() {
            px.0 = over(px.0, src);
        }
        Ok(())
    }

    fn draw_wipe(&mut self, quad: &WipeQuad) -> Result<(), RenderError> {
        let w = self.target.width();
        let revealed = (quad.progress.clamp(0.0, 1.0) * f64::from(w)).floor() as u32;
        let clear = Rgba(self.clear.to_array());
        for (x, _, px) in self.target.enumerate_pixels_mut() {
            let hidden = match quad.kind {
                WipeKind::Appear => x >= revealed,
                WipeKind::AppearReverse => x < w - revealed.min(w),
            };
            if hidden {
                *px = clear;
            }
        }
        Ok(())
    }
}

fn fetch<'a>(
    vertices: &'a [ScreenVertex],
    tri: &[u16],
) -> Result<[&'a ScreenVertex; 3], RenderError> {
    let get = |i: u16| {
        vertices.get(usize::from(i)).ok_or_else(|| {
            RenderError::draw(format!(
                "index {i} out of range for {} vertices",
                vertices.len()
            ))
        })
    };
    Ok([get(tri[0])?, get(tri[1])?, get(tri[2])?])
}

fn edge(a: Point, b: Point, p: Point) -> f64 {
    (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x)
}

/// Liang-Barsky clip of segment `a`-`b` to the rectangle `[0, w] x [0, h]`.
fn clip_segment(a: Point, b: Point, w: f64, h: f64) -> Option<(Point, Point)> {
    let d = b - a;
    let (mut t0, mut t1) = (0.0f64, 1.0f64);
    for (p, q) in [(-d.x, a.x), (d.x, w - a.x), (-d.y, a.y), (d.y, h - a.y)] {
        if !p.is_finite() || !q.is_finite() {
            return None;
        }
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            t0 = t0.max(r);
        } else {
            t1 = t1.min(r);
        }
        if t0 > t1 {
            return None;
        }
    }
    Some((a + d * t0, a + d * t1))
}

fn span(values: impl Iterator<Item = f64>, limit: u32) -> Option<(u32, u32)> {
    let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if limit == 0 || hi < 0.0 || lo >= f64::from(limit) || !lo.is_finite() || !hi.is_finite() {
        return None;
    }
    let lo = lo.floor().max(0.0) as u32;
    let hi = (hi.ceil() as u32).min(limit - 1);
    Some((lo, hi))
}

fn gouraud(tri: [&ScreenVertex; 3], b: [f64; 3]) -> Rgba8 {
    let ch = |f: fn(&Rgba8) -> u8| {
        let v = tri
            .iter()
            .zip(b)
            .map(|(v, k)| f64::from(f(&v.color)) * k)
            .sum::<f64>();
        v.round().clamp(0.0, 255.0) as u8
    };
    Rgba8::new(ch(|c| c.r), ch(|c| c.g), ch(|c| c.b), ch(|c| c.a))
}

fn perspective_uv(tri: [&ScreenVertex; 3], b: [f64; 3]) -> Point {
    let wsum: f64 = tri.iter().zip(b).map(|(v, k)| v.rhw * k).sum();
    if wsum <= 0.0 {
        return tri[0].uv;
    }
    let (u, v) = tri.iter().zip(b).fold((0.0, 0.0), |(u, v), (vx, k)| {
        (u + vx.uv.x * vx.rhw * k, v + vx.uv.y * vx.rhw * k)
    });
    Point::new(u / wsum, v / wsum)
}

fn sample(tex: &RgbaImage, uv: Point) -> Rgba8 {
    let (w, h) = (tex.width(), tex.height());
    if w == 0 || h == 0 {
        return Rgba8::WHITE;
    }
    let x = ((uv.x * f64::from(w)).floor().max(0.0) as u32).min(w - 1);
    let y = ((uv.y * f64::from(h)).floor().max(0.0) as u32).min(h - 1);
    let [r, g, b, a] = tex.get_pixel(x, y).0;
    Rgba8::new(r, g, b, a)
}

fn modulate(a: Rgba8, b: Rgba8) -> Rgba8 {
    let m = |x: u8, y: u8| mul_div255_u8(u16::from(x), u16::from(y));
    Rgba8::new(m(a.r, b.r), m(a.g, b.g), m(a.b, b.b), m(a.a, b.a))
}

fn unit_to_u8(v: f64) -> u8 {
    if v.is_nan() {
        return 0;
    }
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Straight-alpha source-over.
fn over(dst: [u8; 4], src: Rgba8) -> [u8; 4] {
    let sa = u16::from(src.a);
    if sa == 0 {
        return dst;
    }
    let inv = 255 - sa;
    let mix = |s: u8, d: u8| {
        mul_div255_u8(u16::from(s), sa).saturating_add(mul_div255_u8(u16::from(d), inv))
    };
    [
        mix(src.r, dst[0]),
        mix(src.g, dst[1]),
        mix(src.b, dst[2]),
        src.a.saturating_add(mul_div255_u8(u16::from(dst[3]), inv)),
    ]
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
