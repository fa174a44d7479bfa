use fieldscape_kernel::FieldKernel;
use glam::Vec3;

use crate::error::SceneError;

/// A square grid in the XZ plane displaced vertically by the height field.
///
/// Vertex `(ix, iz)` lives at index `iz * (segments + 1) + ix`. The grid
/// layout never changes after construction; only heights and normals are
/// rewritten each frame.
#[derive(Debug, Clone)]
pub struct TerrainMesh {
    size: f32,
    segments: u32,
    base_y: f32,
    positions: Vec<Vec3>,
    normals: Vec<Vec3>,
}

impl TerrainMesh {
    /// Flat plane of `size × size` world units split into `segments` cells per side,
    /// centred on the origin at height `base_y`.
    pub fn plane(size: f32, segments: u32, base_y: f32) -> Result<Self, SceneError> {
        if segments == 0 {
            return Err(SceneError::EmptyGrid);
        }
        if !(size.is_finite() && size > 0.0) {
            return Err(SceneError::InvalidSize(size));
        }
        let side = segments as usize + 1;
        let step = size / segments as f32;
        let half = size * 0.5;
        let mut positions = Vec::with_capacity(side * side);
        for iz in 0..side {
            for ix in 0..side {
                positions.push(Vec3::new(
                    -half + ix as f32 * step,
                    base_y,
                    -half + iz as f32 * step,
                ));
            }
        }
        let normals = vec![Vec3::Y; positions.len()];
        Ok(Self {
            size,
            segments,
            base_y,
            positions,
            normals,
        })
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn segments(&self) -> u32 {
        self.segments
    }

    pub fn base_y(&self) -> f32 {
        self.base_y
    }

    /// Vertices per side.
    pub fn side(&self) -> usize {
        self.segments as usize + 1
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn normals(&self) -> &[Vec3] {
        &self.normals
    }

    /// Rewrite every vertex height from the kernel, then rebuild normals.
    pub fn update(&mut self, kernel: &FieldKernel, t: f32) {
        for p in &mut self.positions {
            p.y = self.base_y + kernel.height(p.x, p.z, t);
        }
        self.recompute_normals();
    }

    /// Lowest and highest vertex height, relative to `base_y`.
    pub fn height_range(&self) -> (f32, f32) {
        self.positions
            .iter()
            .map(|p| p.y - self.base_y)
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), h| {
                (lo.min(h), hi.max(h))
            })
    }

    /// Two counter-clockwise (seen from +Y) triangles per cell.
    pub fn triangle_indices(&self) -> Vec<u32> {
        let mut indices = Vec::with_capacity(self.segments as usize * self.segments as usize * 6);
        for [a, b, c, d] in cells(self.segments) {
            indices.extend_from_slice(&[a, c, b, b, c, d]);
        }
        indices
    }

    /// Edge list for a wireframe: every grid edge plus the cell diagonal,
    /// each edge emitted once.
    pub fn line_indices(&self) -> Vec<u32> {
        let side = self.side() as u32;
        let last = side - 1;
        let mut indices = Vec::new();
        for [a, b, c, d] in cells(self.segments) {
            indices.extend_from_slice(&[a, b, a, c, b, c]);
            let (ix, iz) = (a % side, a / side);
            if ix + 1 == last {
                indices.extend_from_slice(&[b, d]);
            }
            if iz + 1 == last {
                indices.extend_from_slice(&[c, d]);
            }
        }
        indices
    }

    /// Area-weighted vertex normals from the triangle fan around each vertex.
    fn recompute_normals(&mut self) {
        self.normals.iter_mut().for_each(|n| *n = Vec3::ZERO);
        for [a, b, c, d] in cells(self.segments) {
            for [i0, i1, i2] in [[a, c, b], [b, c, d]] {
                let (i0, i1, i2) = (i0 as usize, i1 as usize, i2 as usize);
                let p0 = self.positions[i0];
                let face = (self.positions[i1] - p0).cross(self.positions[i2] - p0);
                self.normals[i0] += face;
                self.normals[i1] += face;
                self.normals[i2] += face;
            }
        }
        for n in &mut self.normals {
            *n = n.try_normalize().unwrap_or(Vec3::Y);
        }
    }
}

/// Corner indices `[a, b, c, d]` of every cell, where `b` is +x of `a`,
/// `c` is +z of `a`, and `d` is diagonal.
fn cells(segments: u32) -> impl Iterator<Item = [u32; 4]> {
    let side = segments + 1;
    (0..segments).flat_map(move |iz| {
        (0..segments).map(move |ix| {
            let a = iz * side + ix;
            [a, a + 1, a + side, a + side + 1]
        })
    })
}
