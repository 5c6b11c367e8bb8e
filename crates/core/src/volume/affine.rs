//! Voxel-to-world affine carried alongside a volume

use serde::{Deserialize, Serialize};

/// Homogeneous 4x4 voxel-to-world transform, as stored in scanner headers.
///
/// The analysis engines never read it; it is forwarded unchanged from an
/// input volume to every volume derived from it so callers can map results
/// back to scanner space:
/// ```text
/// [x_world]   [m00 m01 m02 m03] [i]
/// [y_world] = [m10 m11 m12 m13] [j]
/// [z_world]   [m20 m21 m22 m23] [k]
/// [   1   ]   [ 0   0   0   1 ] [1]
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Affine {
    matrix: [[f64; 4]; 4],
}

impl Affine {
    /// Wrap a header matrix as-is
    pub fn from_matrix(matrix: [[f64; 4]; 4]) -> Self {
        Self { matrix }
    }

    /// Axis-aligned transform with the given voxel spacing and origin
    pub fn from_spacing(spacing: [f64; 3], origin: [f64; 3]) -> Self {
        let mut matrix = Self::identity().matrix;
        for axis in 0..3 {
            matrix[axis][axis] = spacing[axis];
            matrix[axis][3] = origin[axis];
        }
        Self { matrix }
    }

    pub fn identity() -> Self {
        let mut matrix = [[0.0; 4]; 4];
        for (i, row) in matrix.iter_mut().enumerate() {
            row[i] = 1.0;
        }
        Self { matrix }
    }

    /// The raw matrix
    pub fn matrix(&self) -> &[[f64; 4]; 4] {
        &self.matrix
    }

    /// Map a (possibly fractional) voxel index to world coordinates
    pub fn voxel_to_world(&self, voxel: [f64; 3]) -> [f64; 3] {
        let m = &self.matrix;
        let mut out = [0.0; 3];
        for (axis, o) in out.iter_mut().enumerate() {
            *o = m[axis][0] * voxel[0] + m[axis][1] * voxel[1] + m[axis][2] * voxel[2] + m[axis][3];
        }
        out
    }
}

impl Default for Affine {
    fn default() -> Self {
        Self::identity()
    }
}
