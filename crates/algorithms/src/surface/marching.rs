//! Isosurface extraction by marching tetrahedra
//!
//! Each cube of 8 neighboring voxels is split into six tetrahedra that
//! share the cube diagonal from corner 0 to corner 7. Every tetrahedron
//! has exactly one triangulation per sign pattern, so the surface has no
//! ambiguous cases and is closed wherever it does not reach the volume
//! border.
//!
//! Vertices lie on grid edges where the level is crossed, found by linear
//! interpolation, and are shared between all faces that use the same edge.
//! A voxel is "inside" when its value is strictly above the level. Face
//! winding makes normals point toward lower values.
//!
//! Coordinates are in voxel index space; map them through the volume's
//! affine for world coordinates.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use medvis_core::{Algorithm, Error, Result, Volume};

use crate::maybe_rayon::*;
use crate::preprocess::{normalize, NormalizationMethod};

use super::mesh::{Point3, SurfaceMesh};

/// Cube corner `i` sits at offset `(i & 1, (i >> 1) & 1, (i >> 2) & 1)`
const CORNERS: [(usize, usize, usize); 8] = [
    (0, 0, 0),
    (1, 0, 0),
    (0, 1, 0),
    (1, 1, 0),
    (0, 0, 1),
    (1, 0, 1),
    (0, 1, 1),
    (1, 1, 1),
];

/// Kuhn decomposition of the cube around the 0-7 diagonal
const TETRAHEDRA: [[usize; 4]; 6] = [
    [0, 1, 3, 7],
    [0, 3, 2, 7],
    [0, 2, 6, 7],
    [0, 6, 4, 7],
    [0, 4, 5, 7],
    [0, 5, 1, 7],
];

/// Grid edge between two voxels, as their linear indices (smaller first)
type EdgeKey = (usize, usize);

/// Parameters for isosurface extraction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceParams {
    /// Level to extract. In [0, 1] when `normalize_first` is set.
    pub isovalue: f64,
    /// Min-max normalize the field before extracting
    pub normalize_first: bool,
}

impl Default for SurfaceParams {
    fn default() -> Self {
        Self {
            isovalue: 0.5,
            normalize_first: true,
        }
    }
}

/// Isosurface extraction algorithm
#[derive(Debug, Clone, Default)]
pub struct ExtractSurface;

impl Algorithm for ExtractSurface {
    type Input = Volume<f64>;
    type Output = SurfaceMesh;
    type Params = SurfaceParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "ExtractSurface"
    }

    fn description(&self) -> &'static str {
        "Triangulated isosurface of a scalar field (marching tetrahedra)"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        extract_surface(&input, &params)
    }
}

/// Extract the isosurface of `field` at `params.isovalue`.
///
/// A field entirely above or below the level yields an empty mesh.
///
/// # Errors
/// - `DegenerateRange` if the field holds NaN or infinite values, or if it
///   is constant and `normalize_first` is set
/// - `InvalidParameter` if the isovalue is not finite, or lies outside
///   [0, 1] with `normalize_first` set
pub fn extract_surface(field: &Volume<f64>, params: &SurfaceParams) -> Result<SurfaceMesh> {
    let iso = params.isovalue;
    if !iso.is_finite() {
        return Err(Error::invalid_parameter("isovalue", iso, "must be finite"));
    }
    if field.has_non_finite() {
        return Err(Error::degenerate(
            "extract_surface",
            "field contains NaN or infinite values",
        ));
    }

    if params.normalize_first {
        if !(0.0..=1.0).contains(&iso) {
            return Err(Error::invalid_parameter(
                "isovalue",
                iso,
                "must be in [0, 1] for a normalized field",
            ));
        }
        let normalized = normalize(field, NormalizationMethod::MinMax)?;
        Ok(march(&normalized, iso))
    } else {
        Ok(march(field, iso))
    }
}

/// Triangles of every cell, as edge triples, in cell scan order
fn march_cells(field: &Volume<f64>, iso: f64) -> Vec<[EdgeKey; 3]> {
    let (nx, ny, nz) = field.shape();
    if nx < 2 || ny < 2 || nz < 2 {
        return Vec::new();
    }
    let data = field.data();
    let linear = |(x, y, z): (usize, usize, usize)| (x * ny + y) * nz + z;

    (0..nx - 1)
        .into_par_iter()
        .flat_map(|x| {
            let mut out = Vec::new();
            for y in 0..ny - 1 {
                for z in 0..nz - 1 {
                    let mut pos = [(0, 0, 0); 8];
                    let mut values = [0.0; 8];
                    for (i, &(dx, dy, dz)) in CORNERS.iter().enumerate() {
                        pos[i] = (x + dx, y + dy, z + dz);
                        values[i] = data[pos[i]];
                    }
                    if values.iter().all(|&v| v > iso) || values.iter().all(|&v| v <= iso) {
                        continue;
                    }
                    for tet in &TETRAHEDRA {
                        let index = tet.map(|c| linear(pos[c]));
                        let corner = tet.map(|c| cube_point(pos[c]));
                        let value = tet.map(|c| values[c]);
                        triangulate(index, corner, value, iso, &mut out);
                    }
                }
            }
            out
        })
        .collect()
}

fn cube_point((x, y, z): (usize, usize, usize)) -> Point3 {
    [x as f64, y as f64, z as f64]
}

fn edge(a: usize, b: usize) -> EdgeKey {
    (a.min(b), a.max(b))
}

/// Emit the 0, 1 or 2 triangles cutting one tetrahedron
fn triangulate(index: [usize; 4], corner: [Point3; 4], value: [f64; 4], iso: f64, out: &mut Vec<[EdgeKey; 3]>) {
    let (above, below): (Vec<usize>, Vec<usize>) = (0..4).partition(|&i| value[i] > iso);

    let faces: Vec<[(usize, usize); 3]> = match (above.as_slice(), below.as_slice()) {
        ([a], [b, c, d]) | ([b, c, d], [a]) => vec![[(*a, *b), (*a, *c), (*a, *d)]],
        ([a, b], [c, d]) => vec![[(*a, *c), (*a, *d), (*b, *d)], [(*a, *c), (*b, *d), (*b, *c)]],
        _ => return,
    };

    // direction of increasing value inside this tetrahedron
    let centroid = |set: &[usize]| {
        let mut p = [0.0; 3];
        for &i in set {
            for k in 0..3 {
                p[k] += corner[i][k] / set.len() as f64;
            }
        }
        p
    };
    let (hi, lo) = (centroid(&above), centroid(&below));
    let uphill = [hi[0] - lo[0], hi[1] - lo[1], hi[2] - lo[2]];

    for face in faces {
        let p = face.map(|(i, j)| crossing(corner[i], corner[j], value[i], value[j], iso));
        let u = [p[1][0] - p[0][0], p[1][1] - p[0][1], p[1][2] - p[0][2]];
        let v = [p[2][0] - p[0][0], p[2][1] - p[0][1], p[2][2] - p[0][2]];
        let normal = [
            u[1] * v[2] - u[2] * v[1],
            u[2] * v[0] - u[0] * v[2],
            u[0] * v[1] - u[1] * v[0],
        ];
        let facing = normal[0] * uphill[0] + normal[1] * uphill[1] + normal[2] * uphill[2];

        let mut keys = face.map(|(i, j)| edge(index[i], index[j]));
        if facing > 0.0 {
            keys.swap(1, 2);
        }
        out.push(keys);
    }
}

/// Point on segment `a`-`b` where the linear interpolant equals `iso`
fn crossing(a: Point3, b: Point3, va: f64, vb: f64, iso: f64) -> Point3 {
    let t = (iso - va) / (vb - va);
    [
        a[0] + t * (b[0] - a[0]),
        a[1] + t * (b[1] - a[1]),
        a[2] + t * (b[2] - a[2]),
    ]
}

/// Run the marching step and weld shared edge vertices
fn march(field: &Volume<f64>, iso: f64) -> SurfaceMesh {
    let triangles = march_cells(field, iso);
    if triangles.is_empty() {
        tracing::debug!(iso, "isosurface is empty");
        return SurfaceMesh::empty();
    }

    let (_, ny, nz) = field.shape();
    let data = field.data();
    let unravel = |i: usize| (i / (ny * nz), (i / nz) % ny, i % nz);

    let mut lookup: HashMap<EdgeKey, usize> = HashMap::new();
    let mut vertices: Vec<Point3> = Vec::new();
    let mut faces = Vec::with_capacity(triangles.len());

    for tri in &triangles {
        let face = tri.map(|key| {
            *lookup.entry(key).or_insert_with(|| {
                let (a, b) = (unravel(key.0), unravel(key.1));
                vertices.push(crossing(cube_point(a), cube_point(b), data[a], data[b], iso));
                vertices.len() - 1
            })
        });
        faces.push(face);
    }

    tracing::debug!(
        iso,
        vertices = vertices.len(),
        triangles = faces.len(),
        "isosurface extracted"
    );
    SurfaceMesh::from_parts(vertices, faces)
}
