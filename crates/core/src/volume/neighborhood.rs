//! Neighborhood operations for volume analysis

use serde::{Deserialize, Serialize};

/// Offset of a neighbor relative to a center voxel, as (dx, dy, dz)
pub type Offset = (isize, isize, isize);

/// The 6 face-adjacent neighbors
pub const FACE_OFFSETS: [Offset; 6] = [
    (-1, 0, 0),
    (1, 0, 0),
    (0, -1, 0),
    (0, 1, 0),
    (0, 0, -1),
    (0, 0, 1),
];

/// Defines a neighborhood pattern around a voxel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Neighborhood {
    /// 6 face neighbors + center
    Face,
    /// 26 neighbors of the 3x3x3 cube + center
    Full,
    /// Voxels within Euclidean distance `radius` of the center
    Ball(usize),
    /// Three axis-aligned arms of given length
    Cross(usize),
}

impl Neighborhood {
    /// Get the radius of the neighborhood
    pub fn radius(&self) -> usize {
        match self {
            Neighborhood::Face | Neighborhood::Full => 1,
            Neighborhood::Ball(r) | Neighborhood::Cross(r) => *r,
        }
    }

    /// Check if a relative position is within this neighborhood
    pub fn contains(&self, dx: isize, dy: isize, dz: isize) -> bool {
        let r = self.radius() as isize;
        if dx.abs() > r || dy.abs() > r || dz.abs() > r {
            return false;
        }
        match self {
            Neighborhood::Full => true,
            Neighborhood::Face => dx.abs() + dy.abs() + dz.abs() <= 1,
            Neighborhood::Ball(_) => dx * dx + dy * dy + dz * dz <= r * r,
            Neighborhood::Cross(_) => {
                let nonzero = [dx, dy, dz].iter().filter(|d| **d != 0).count();
                nonzero <= 1
            }
        }
    }

    /// Relative positions in this neighborhood, center included, in (dx, dy, dz) scan order
    pub fn offsets(&self) -> Vec<Offset> {
        let r = self.radius() as isize;
        let mut offsets = Vec::new();
        for dx in -r..=r {
            for dy in -r..=r {
                for dz in -r..=r {
                    if self.contains(dx, dy, dz) {
                        offsets.push((dx, dy, dz));
                    }
                }
            }
        }
        offsets
    }

    /// Get offsets excluding the center voxel
    pub fn offsets_no_center(&self) -> Vec<Offset> {
        self.offsets()
            .into_iter()
            .filter(|&o| o != (0, 0, 0))
            .collect()
    }
}

/// Step from `(x, y, z)` by `offset`, returning `None` outside `dims`
#[inline]
pub fn step(pos: (usize, usize, usize), offset: Offset, dims: [usize; 3]) -> Option<(usize, usize, usize)> {
    let nx = pos.0 as isize + offset.0;
    let ny = pos.1 as isize + offset.1;
    let nz = pos.2 as isize + offset.2;
    if nx < 0
        || ny < 0
        || nz < 0
        || nx as usize >= dims[0]
        || ny as usize >= dims[1]
        || nz as usize >= dims[2]
    {
        return None;
    }
    Some((nx as usize, ny as usize, nz as usize))
}
