//! Main Volume type

use crate::error::{Error, Result};
use crate::volume::{Affine, Orientation, VoxelElement};
use ndarray::{s, Array2, Array3, ArrayView3, Axis};

/// Shape of a volume as `(x, y, z)` voxel counts
pub type Shape = (usize, usize, usize);

/// A 3-D voxel grid.
///
/// `Volume<T>` stores values of type `T` in an `(x, y, z)` grid together
/// with an optional [`Affine`] that is forwarded, never interpreted. A
/// volume is immutable once built: every operation in `medvis-algorithms`
/// returns a new volume and leaves its input untouched.
///
/// # Type Parameters
///
/// - `T`: The voxel value type, must implement [`VoxelElement`]
///
/// # Example
///
/// ```
/// use medvis_core::Volume;
///
/// let field = Volume::from_fn((4, 4, 4), |x, y, z| (x + y + z) as f64)?;
/// assert_eq!(field.get(1, 2, 3)?, 6.0);
/// # Ok::<(), medvis_core::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Volume<T: VoxelElement> {
    /// Voxel data indexed `[x, y, z]`
    data: Array3<T>,
    /// Opaque voxel-to-world transform
    affine: Option<Affine>,
}

fn check_shape(shape: Shape) -> Result<()> {
    if shape.0 == 0 || shape.1 == 0 || shape.2 == 0 {
        return Err(Error::InvalidInput(format!(
            "volume dimensions must all be > 0, got {:?}",
            shape
        )));
    }
    Ok(())
}

impl<T: VoxelElement> Volume<T> {
    /// Create a new volume filled with `T::default()`
    pub fn new(shape: Shape) -> Result<Self> {
        Self::filled(shape, T::default())
    }

    /// Create a new volume filled with a specific value
    pub fn filled(shape: Shape, value: T) -> Result<Self> {
        check_shape(shape)?;
        Ok(Self {
            data: Array3::from_elem(shape, value),
            affine: None,
        })
    }

    /// Create a volume from data laid out in `[x][y][z]` (z fastest) order
    pub fn from_vec(data: Vec<T>, shape: Shape) -> Result<Self> {
        check_shape(shape)?;
        if data.len() != shape.0 * shape.1 * shape.2 {
            return Err(Error::InvalidInput(format!(
                "{} values cannot fill a volume of shape {:?}",
                data.len(),
                shape
            )));
        }
        Ok(Self {
            data: Array3::from_shape_vec(shape, data)?,
            affine: None,
        })
    }

    /// Create a volume from an ndarray
    pub fn from_array(data: Array3<T>) -> Result<Self> {
        check_shape(data.dim())?;
        Ok(Self { data, affine: None })
    }

    /// Create a volume by evaluating `f(x, y, z)` at every voxel
    pub fn from_fn<F>(shape: Shape, f: F) -> Result<Self>
    where
        F: Fn(usize, usize, usize) -> T,
    {
        check_shape(shape)?;
        Ok(Self {
            data: Array3::from_shape_fn(shape, |(x, y, z)| f(x, y, z)),
            affine: None,
        })
    }

    /// Attach (or replace) the opaque affine
    pub fn with_affine(mut self, affine: Affine) -> Self {
        self.affine = Some(affine);
        self
    }

    /// Build a volume of the same shape and metadata from new data
    pub fn derive<U: VoxelElement>(&self, data: Array3<U>) -> Result<Volume<U>> {
        if data.dim() != self.shape() {
            return Err(Error::ShapeMismatch {
                expected: self.shape(),
                actual: data.dim(),
            });
        }
        Ok(Volume {
            data,
            affine: self.affine,
        })
    }

    /// Apply `f` to every voxel, keeping shape and metadata
    pub fn map<U, F>(&self, f: F) -> Volume<U>
    where
        U: VoxelElement,
        F: Fn(T) -> U,
    {
        Volume {
            data: self.data.mapv(f),
            affine: self.affine,
        }
    }

    // Dimensions

    /// Dimensions as (x, y, z)
    pub fn shape(&self) -> Shape {
        self.data.dim()
    }

    /// Dimensions as an array, convenient for per-axis loops
    pub fn dims(&self) -> [usize; 3] {
        let (x, y, z) = self.shape();
        [x, y, z]
    }

    /// Total number of voxels
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Always false: a volume has at least one voxel
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// In-memory size of the voxel data in bytes
    pub fn byte_size(&self) -> usize {
        self.len() * std::mem::size_of::<T>()
    }

    // Data access

    /// Get value at (x, y, z)
    pub fn get(&self, x: usize, y: usize, z: usize) -> Result<T> {
        self.data
            .get((x, y, z))
            .copied()
            .ok_or(Error::IndexOutOfBounds {
                index: (x, y, z),
                shape: self.shape(),
            })
    }

    /// Get a view of the underlying data
    pub fn view(&self) -> ArrayView3<'_, T> {
        self.data.view()
    }

    /// Get a reference to the underlying array
    pub fn data(&self) -> &Array3<T> {
        &self.data
    }

    /// Consume the volume and return the underlying array
    pub fn into_array(self) -> Array3<T> {
        self.data
    }

    /// Iterate voxel values in logical `[x][y][z]` order
    pub fn values(&self) -> impl Iterator<Item = T> + '_ {
        self.data.iter().copied()
    }

    // Metadata

    /// Get the affine, if the source provided one
    pub fn affine(&self) -> Option<&Affine> {
        self.affine.as_ref()
    }

    // Value checks

    /// Whether any voxel is NaN or infinite
    pub fn has_non_finite(&self) -> bool {
        self.data.iter().any(|v| !v.to_f64().is_finite())
    }

    /// Smallest and largest value, ignoring NaN
    pub fn value_range(&self) -> (f64, f64) {
        self.data.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            let v = v.to_f64();
            (lo.min(v), hi.max(v))
        })
    }

    /// Count of voxels that are not zero
    pub fn count_nonzero(&self) -> usize {
        self.data.iter().filter(|v| v.is_nonzero()).count()
    }

    // Slicing

    /// Extract the 2-D plane at `index` along the axis fixed by `orientation`
    pub fn slice(&self, orientation: Orientation, index: usize) -> Result<Array2<T>> {
        let axis = orientation.axis();
        let dims = self.dims();
        if index >= dims[axis] {
            let mut bad = [0usize; 3];
            bad[axis] = index;
            return Err(Error::IndexOutOfBounds {
                index: (bad[0], bad[1], bad[2]),
                shape: self.shape(),
            });
        }
        Ok(self.data.index_axis(Axis(axis), index).to_owned())
    }

    /// The three planes through the volume center, ordered axial, coronal, sagittal
    pub fn mid_slices(&self) -> [Array2<T>; 3] {
        let dims = self.dims();
        Orientation::ALL.map(|o| {
            let axis = o.axis();
            self.data.index_axis(Axis(axis), dims[axis] / 2).to_owned()
        })
    }

    /// Copy the half-open box `[start, end)` into a new volume.
    ///
    /// The sub-volume does not carry the parent affine; its voxel `(0, 0, 0)`
    /// is parent voxel `start`.
    pub fn sub_volume(&self, start: [usize; 3], end: [usize; 3]) -> Result<Volume<T>> {
        let dims = self.dims();
        for axis in 0..3 {
            if start[axis] >= end[axis] || end[axis] > dims[axis] {
                return Err(Error::InvalidInput(format!(
                    "sub-volume [{:?}, {:?}) does not fit inside shape {:?}",
                    start, end, dims
                )));
            }
        }
        let data = self
            .data
            .slice(s![start[0]..end[0], start[1]..end[1], start[2]..end[2]])
            .to_owned();
        Ok(Volume { data, affine: None })
    }
}

impl Volume<i32> {
    /// Binary mask of every labeled (non-background) voxel
    pub fn foreground(&self) -> Volume<bool> {
        self.map(|label| label > 0)
    }
}
