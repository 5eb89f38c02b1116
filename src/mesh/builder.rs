//! Triangulated surface meshes.
//!
//! Every grid cell becomes one vertex (row-major, index `i·C + j`) and every
//! quad between four neighbouring vertices becomes two triangles:
//!
//! ```text
//!   TL ── TR        (TL, BL, TR)
//!   │  ╲  │         (TR, BL, BR)
//!   BL ── BR
//! ```
//!
//! The winding is counter-clockwise seen from +y, so front faces point up on
//! the main surface and on a diff surface alike.

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

use crate::error::{GreekSurfError, Result};
use crate::mesh::geometry::{Footprint, GridGeometry};
use crate::mesh::normalize::HeightMap;
use crate::surface::GridShape;

/// Vertex positions, normals and a triangle index buffer.
///
/// There is one position and one normal per grid cell and every index
/// refers to an existing vertex; deserialization re-checks this.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "MeshRaw", into = "MeshRaw")]
pub struct Mesh {
    shape: GridShape,
    positions: Vec<Point3<f32>>,
    normals: Vec<Vector3<f32>>,
    indices: Vec<u32>,
}

#[derive(Serialize, Deserialize)]
struct MeshRaw {
    shape: GridShape,
    positions: Vec<Point3<f32>>,
    normals: Vec<Vector3<f32>>,
    indices: Vec<u32>,
}

impl TryFrom<MeshRaw> for Mesh {
    type Error = GreekSurfError;
    fn try_from(raw: MeshRaw) -> Result<Self> {
        let vertices = raw.positions.len();
        if vertices != raw.shape.len() || raw.normals.len() != vertices {
            return Err(GreekSurfError::invalid_input(format!(
                "mesh of shape {} has {vertices} positions and {} normals",
                raw.shape,
                raw.normals.len()
            )));
        }
        if raw.indices.len() % 3 != 0 {
            return Err(GreekSurfError::invalid_input(format!(
                "index count {} is not a multiple of 3",
                raw.indices.len()
            )));
        }
        if let Some(&k) = raw.indices.iter().find(|&&k| k as usize >= vertices) {
            return Err(GreekSurfError::invalid_input(format!(
                "index {k} is out of range for {vertices} vertices"
            )));
        }
        let finite = raw.positions.iter().all(|p| p.coords.iter().all(|c| c.is_finite()))
            && raw.normals.iter().all(|n| n.iter().all(|c| c.is_finite()));
        if !finite {
            return Err(GreekSurfError::invalid_input(
                "mesh positions and normals must be finite",
            ));
        }
        Ok(Self {
            shape: raw.shape,
            positions: raw.positions,
            normals: raw.normals,
            indices: raw.indices,
        })
    }
}

impl From<Mesh> for MeshRaw {
    fn from(m: Mesh) -> Self {
        Self {
            shape: m.shape,
            positions: m.positions,
            normals: m.normals,
            indices: m.indices,
        }
    }
}

impl Mesh {
    pub fn shape(&self) -> GridShape {
        self.shape
    }

    /// One position per grid cell, row-major.
    pub fn positions(&self) -> &[Point3<f32>] {
        &self.positions
    }

    /// Unit normal per vertex.
    pub fn normals(&self) -> &[Vector3<f32>] {
        &self.normals
    }

    /// Triangle vertex indices, three per triangle.
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Triangles as index triples.
    pub fn triangles(&self) -> impl Iterator<Item = [u32; 3]> + '_ {
        self.indices.chunks_exact(3).map(|t| [t[0], t[1], t[2]])
    }

    /// Positions as `[x0, y0, z0, x1, ...]` for GPU upload.
    pub fn positions_flat(&self) -> Vec<f32> {
        self.positions.iter().flat_map(|p| [p.x, p.y, p.z]).collect()
    }

    /// Normals as `[x0, y0, z0, x1, ...]` for GPU upload.
    pub fn normals_flat(&self) -> Vec<f32> {
        self.normals.iter().flat_map(|n| [n.x, n.y, n.z]).collect()
    }

    /// True if there are no triangles (a single row or column).
    pub fn is_degenerate(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Builds meshes for a fixed footprint.
///
/// # Examples
/// ```
/// use greeksurf::mesh::{Footprint, HeightMap, MeshBuilder};
/// use greeksurf::surface::GridShape;
///
/// let heights = HeightMap::new(GridShape::new(3, 4), vec![0.0; 12]).unwrap();
/// let mesh = MeshBuilder::new(Footprint::default()).build(&heights);
/// assert_eq!(mesh.vertex_count(), 12);
/// assert_eq!(mesh.indices().len(), 6 * 2 * 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MeshBuilder {
    footprint: Footprint,
}

impl MeshBuilder {
    pub fn new(footprint: Footprint) -> Self {
        Self { footprint }
    }

    pub fn footprint(&self) -> Footprint {
        self.footprint
    }

    /// Triangulate a height map. A map with a single row or column yields
    /// vertices but no triangles.
    pub fn build(&self, heights: &HeightMap) -> Mesh {
        let shape = heights.shape();
        let cols = shape.cols;
        let geometry = GridGeometry::new(shape, self.footprint);

        let positions: Vec<Point3<f32>> = heights
            .heights()
            .iter()
            .enumerate()
            .map(|(k, &y)| {
                let (x, z) = geometry.cell_position(k / cols, k % cols);
                Point3::new(x as f32, y, z as f32)
            })
            .collect();

        let normals = vertex_normals(&positions, shape);
        let indices = triangulate(shape);

        #[cfg(feature = "logging")]
        tracing::debug!(
            vertices = positions.len(),
            triangles = indices.len() / 3,
            rows = shape.rows,
            cols,
            "mesh built"
        );

        Mesh {
            shape,
            positions,
            normals,
            indices,
        }
    }
}

fn triangulate(shape: GridShape) -> Vec<u32> {
    let GridShape { rows, cols } = shape;
    if rows < 2 || cols < 2 {
        return Vec::new();
    }
    debug_assert!(rows * cols <= u32::MAX as usize);

    let mut indices = Vec::with_capacity(6 * (rows - 1) * (cols - 1));
    for i in 0..rows - 1 {
        for j in 0..cols - 1 {
            let tl = (i * cols + j) as u32;
            let tr = tl + 1;
            let bl = ((i + 1) * cols + j) as u32;
            let br = bl + 1;
            indices.extend_from_slice(&[tl, bl, tr, tr, bl, br]);
        }
    }
    indices
}

/// Central-difference normals; one-sided at the edges. Falls back to +y where
/// the neighbourhood is degenerate.
fn vertex_normals(positions: &[Point3<f32>], shape: GridShape) -> Vec<Vector3<f32>> {
    let GridShape { rows, cols } = shape;
    let at = |i: usize, j: usize| positions[i * cols + j];

    (0..rows * cols)
        .map(|k| {
            let (i, j) = (k / cols, k % cols);
            let (j0, j1) = (j.saturating_sub(1), (j + 1).min(cols - 1));
            let (i0, i1) = (i.saturating_sub(1), (i + 1).min(rows - 1));
            let along_x = at(i, j1) - at(i, j0);
            let along_z = at(i1, j) - at(i0, j);
            along_z
                .cross(&along_x)
                .try_normalize(f32::EPSILON)
                .unwrap_or_else(Vector3::y)
        })
        .collect()
}
