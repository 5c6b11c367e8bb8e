//! Isosurface extraction and surface area
//!
//! [`extract_surface`] triangulates the level set of a scalar field;
//! [`surface_area`] sums the areas of the resulting triangles.

mod marching;
mod mesh;

pub use marching::{extract_surface, ExtractSurface, SurfaceParams};
pub use mesh::{surface_area, triangle_area, Point3, SurfaceMesh};
