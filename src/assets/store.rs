use std::collections::HashMap;

use crate::foundation::core::{Point, Vec3};
use crate::foundation::error::{CinematicError, CinematicResult};

/// Index into a [`BitmapRepository`].
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct BitmapId(pub u32);

/// Handle understood by the [`SoundTrigger`].
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct SoundId(pub u32);

/// Texture handle understood by the render adapter.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(transparent)]
pub struct TextureId(pub u32);

/// UV assignment for one vertex within a material group.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridUv {
    /// Vertex index in [`GridMesh::vertices`].
    pub vertex: usize,
    /// Texture coordinate.
    pub uv: Point,
}

/// Range of the index buffer drawn with one texture.
#[derive(Clone, Debug, PartialEq)]
pub struct MaterialGroup {
    /// Texture bound for this group (`None` draws untextured).
    pub texture: Option<TextureId>,
    /// First index in [`GridMesh::indices`].
    pub start_index: usize,
    /// Number of indices (multiple of 3).
    pub index_count: usize,
    /// UVs written into the shared vertex stream before this group is drawn.
    pub uvs: Vec<GridUv>,
}

/// Subdivided image mesh.
///
/// Vertices are laid out row-major on a `cols × rows` lattice centred on the origin.
#[derive(Clone, Debug, PartialEq)]
pub struct GridMesh {
    /// Mesh-space vertex positions.
    pub vertices: Vec<Vec3>,
    /// Triangle-list indices.
    pub indices: Vec<u16>,
    /// Per-texture index ranges.
    pub materials: Vec<MaterialGroup>,
    /// Vertex columns.
    pub cols: u32,
    /// Vertex rows.
    pub rows: u32,
}

impl GridMesh {
    /// Subdivide a `width × height` image into square-ish cells of `cell` pixels.
    pub fn subdivide(
        width: u32,
        height: u32,
        cell: u32,
        texture: Option<TextureId>,
    ) -> CinematicResult<Self> {
        if width == 0 || height == 0 {
            return Err(CinematicError::asset("grid image must be non-empty"));
        }
        if cell == 0 {
            return Err(CinematicError::asset("grid cell size must be > 0"));
        }
        let nx = width.div_ceil(cell);
        let ny = height.div_ceil(cell);
        let cols = nx + 1;
        let rows = ny + 1;
        let vertex_count = (cols as usize) * (rows as usize);
        if vertex_count > usize::from(u16::MAX) {
            return Err(CinematicError::asset(format!(
                "grid of {vertex_count} vertices exceeds 16-bit indices"
            )));
        }

        let (w, h) = (f64::from(width), f64::from(height));
        let mut vertices = Vec::with_capacity(vertex_count);
        let mut uvs = Vec::with_capacity(vertex_count);
        for j in 0..rows {
            let ly = f64::from((j * cell).min(height));
            for i in 0..cols {
                let lx = f64::from((i * cell).min(width));
                uvs.push(GridUv {
                    vertex: vertices.len(),
                    uv: Point::new(lx / w, ly / h),
                });
                vertices.push(Vec3::new(lx - w * 0.5, ly - h * 0.5, 0.0));
            }
        }

        let mut indices = Vec::with_capacity((nx * ny * 6) as usize);
        for j in 0..ny {
            for i in 0..nx {
                let a = (j * cols + i) as u16;
                let b = a + 1;
                let c = a + cols as u16;
                let d = c + 1;
                indices.extend_from_slice(&[a, b, c, b, d, c]);
            }
        }

        let index_count = indices.len();
        Ok(Self {
            vertices,
            indices,
            materials: vec![MaterialGroup {
                texture,
                start_index: 0,
                index_count,
                uvs,
            }],
            cols,
            rows,
        })
    }

    /// Check that every index and UV refers to an existing vertex.
    pub fn validate(&self) -> CinematicResult<()> {
        let n = self.vertices.len();
        if self.indices.iter().any(|&i| usize::from(i) >= n) {
            return Err(CinematicError::asset("grid index out of range"));
        }
        for m in &self.materials {
            if m.index_count % 3 != 0 {
                return Err(CinematicError::asset(
                    "material index count must be a multiple of 3",
                ));
            }
            let end = m.start_index.checked_add(m.index_count);
            if end.is_none_or(|e| e > self.indices.len()) {
                return Err(CinematicError::asset("material index range out of bounds"));
            }
            if m.uvs.iter().any(|uv| uv.vertex >= n) {
                return Err(CinematicError::asset("material uv vertex out of range"));
            }
        }
        Ok(())
    }
}

/// Image resolved from a [`BitmapId`].
#[derive(Clone, Debug, PartialEq)]
pub struct CinematicBitmap {
    /// Source width in pixels.
    pub width: u32,
    /// Source height in pixels.
    pub height: u32,
    /// Mesh the image is drawn with.
    pub grid: GridMesh,
}

impl CinematicBitmap {
    /// Bitmap whose mesh is a regular subdivision of the image.
    pub fn subdivided(
        width: u32,
        height: u32,
        cell: u32,
        texture: Option<TextureId>,
    ) -> CinematicResult<Self> {
        Ok(Self {
            width,
            height,
            grid: GridMesh::subdivide(width, height, cell, texture)?,
        })
    }
}

/// Lookup of bitmaps by id.
pub trait BitmapRepository {
    /// Bitmap for `id`, or `None` when the id does not resolve.
    fn bitmap(&self, id: BitmapId) -> Option<&CinematicBitmap>;
}

/// Id-keyed [`BitmapRepository`]. Ids need not be dense.
#[derive(Clone, Debug, Default)]
pub struct BitmapStore {
    bitmaps: HashMap<BitmapId, CinematicBitmap>,
    next_id: u32,
}

impl BitmapStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a bitmap under the next free id, validating its mesh.
    pub fn insert(&mut self, bitmap: CinematicBitmap) -> CinematicResult<BitmapId> {
        let id = BitmapId(self.next_id);
        if self.bitmaps.contains_key(&id) {
            return Err(CinematicError::asset("bitmap store is full"));
        }
        self.insert_at(id, bitmap)?;
        Ok(id)
    }

    /// Add or replace the bitmap under `id`, validating its mesh.
    ///
    /// Returns the bitmap previously stored under `id`.
    pub fn insert_at(
        &mut self,
        id: BitmapId,
        bitmap: CinematicBitmap,
    ) -> CinematicResult<Option<CinematicBitmap>> {
        bitmap.grid.validate()?;
        self.next_id = self.next_id.max(id.0.saturating_add(1));
        Ok(self.bitmaps.insert(id, bitmap))
    }

    /// Drop a bitmap; its id stops resolving.
    pub fn remove(&mut self, id: BitmapId) -> Option<CinematicBitmap> {
        self.bitmaps.remove(&id)
    }

    /// Number of live bitmaps.
    pub fn len(&self) -> usize {
        self.bitmaps.len()
    }

    /// Return `true` when no bitmap is live.
    pub fn is_empty(&self) -> bool {
        self.bitmaps.is_empty()
    }
}

impl BitmapRepository for BitmapStore {
    fn bitmap(&self, id: BitmapId) -> Option<&CinematicBitmap> {
        self.bitmaps.get(&id)
    }
}

/// Fire-and-forget sound playback.
pub trait SoundTrigger {
    /// Start playing `id`.
    fn play(&mut self, id: SoundId) -> CinematicResult<()>;
}

/// [`SoundTrigger`] that plays nothing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoSound;

impl SoundTrigger for NoSound {
    fn play(&mut self, _id: SoundId) -> CinematicResult<()> {
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/store.rs"]
mod tests;
