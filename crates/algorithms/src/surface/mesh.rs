//! Triangle mesh produced by isosurface extraction

use serde::{Deserialize, Serialize};

use medvis_core::{Error, Result};

/// A point in voxel index space, as `[x, y, z]`
pub type Point3 = [f64; 3];

/// Indexed triangle mesh.
///
/// Faces index into `vertices`. An empty mesh (no vertices, no faces) is a
/// valid result meaning "no surface at this level".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SurfaceMesh {
    vertices: Vec<Point3>,
    faces: Vec<[usize; 3]>,
}

impl SurfaceMesh {
    /// Build a mesh, checking that every face index refers to a vertex
    pub fn new(vertices: Vec<Point3>, faces: Vec<[usize; 3]>) -> Result<Self> {
        if let Some(face) = faces.iter().find(|f| f.iter().any(|&i| i >= vertices.len())) {
            return Err(Error::InvalidInput(format!(
                "face {:?} references a vertex beyond {}",
                face,
                vertices.len()
            )));
        }
        Ok(Self { vertices, faces })
    }

    /// Trusted constructor for meshes whose faces were built against `vertices`
    pub(crate) fn from_parts(vertices: Vec<Point3>, faces: Vec<[usize; 3]>) -> Self {
        debug_assert!(faces.iter().flatten().all(|&i| i < vertices.len()));
        Self { vertices, faces }
    }

    /// A mesh with no vertices and no faces
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn vertices(&self) -> &[Point3] {
        &self.vertices
    }

    pub fn faces(&self) -> &[[usize; 3]] {
        &self.faces
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Corner coordinates of each face, in face order
    pub fn triangles(&self) -> impl Iterator<Item = [Point3; 3]> + '_ {
        self.faces
            .iter()
            .map(|&[a, b, c]| [self.vertices[a], self.vertices[b], self.vertices[c]])
    }

    /// Axis-aligned bounding box `(min, max)`, `None` for an empty mesh
    pub fn bounds(&self) -> Option<(Point3, Point3)> {
        let first = *self.vertices.first()?;
        Some(self.vertices.iter().fold((first, first), |(mut lo, mut hi), v| {
            for k in 0..3 {
                lo[k] = lo[k].min(v[k]);
                hi[k] = hi[k].max(v[k]);
            }
            (lo, hi)
        }))
    }

    /// Total area of all faces
    pub fn area(&self) -> f64 {
        surface_area(self)
    }
}

/// Area of one triangle: half the norm of the cross product of two edges
pub fn triangle_area(a: Point3, b: Point3, c: Point3) -> f64 {
    let u = [b[0] - a[0], b[1] - a[1], b[2] - a[2]];
    let v = [c[0] - a[0], c[1] - a[1], c[2] - a[2]];
    let cross = [
        u[1] * v[2] - u[2] * v[1],
        u[2] * v[0] - u[0] * v[2],
        u[0] * v[1] - u[1] * v[0],
    ];
    0.5 * (cross[0] * cross[0] + cross[1] * cross[1] + cross[2] * cross[2]).sqrt()
}

/// Sum of the areas of every triangle in `mesh`. 0.0 for an empty mesh.
pub fn surface_area(mesh: &SurfaceMesh) -> f64 {
    mesh.triangles().map(|[a, b, c]| triangle_area(a, b, c)).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_triangle_area() {
        assert_relative_eq!(triangle_area([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]), 0.5);
        assert_relative_eq!(triangle_area([0.0, 0.0, 0.0], [2.0, 0.0, 0.0], [0.0, 0.0, 3.0]), 3.0);
        // collinear
        assert_relative_eq!(triangle_area([0.0, 0.0, 0.0], [1.0, 1.0, 1.0], [2.0, 2.0, 2.0]), 0.0);
    }

    #[test]
    fn test_unit_square() {
        let mesh = SurfaceMesh::new(
            vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]],
            vec![[0, 1, 2], [0, 2, 3]],
        )
        .unwrap();
        assert_relative_eq!(surface_area(&mesh), 1.0);
        assert_eq!(mesh.bounds(), Some(([0.0, 0.0, 0.0], [1.0, 1.0, 0.0])));
    }

    #[test]
    fn test_empty_mesh() {
        let mesh = SurfaceMesh::empty();
        assert!(mesh.is_empty());
        assert_eq!(mesh.area(), 0.0);
        assert!(mesh.bounds().is_none());
    }

    #[test]
    fn test_bad_face_index() {
        assert!(SurfaceMesh::new(vec![[0.0; 3]; 2], vec![[0, 1, 2]]).is_err());
    }
}
