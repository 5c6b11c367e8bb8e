//! Per-voxel evaluation shared by the neighborhood filters

use ndarray::Array3;
use crate::maybe_rayon::*;
use medvis_core::{Result, Shape};

/// Clamp a possibly out-of-range index to the nearest valid one
#[inline]
pub(crate) fn replicate(i: isize, n: usize) -> usize {
    i.clamp(0, n as isize - 1) as usize
}

/// Evaluate `f(x, y, z)` for every voxel of `shape`, parallel over
/// x-slabs, and collect the results in storage order.
pub(crate) fn collect_voxels<T, F>(shape: Shape, f: F) -> Result<Array3<T>>
where
    T: Send,
    F: Fn(usize, usize, usize) -> T + Sync + Send,
{
    let (nx, ny, nz) = shape;
    let data: Vec<T> = (0..nx)
        .into_par_iter()
        .flat_map(|x| {
            let mut slab = Vec::with_capacity(ny * nz);
            for y in 0..ny {
                for z in 0..nz {
                    slab.push(f(x, y, z));
                }
            }
            slab
        })
        .collect();
    Ok(Array3::from_shape_vec(shape, data)?)
}

/// One 1-D pass along `axis`: each output voxel folds the input voxels at
/// axial offsets `lo..=hi` that fall inside the volume.
pub(crate) fn axis_pass<T, A, F>(
    data: &Array3<T>,
    axis: usize,
    (lo, hi): (isize, isize),
    init: A,
    fold: F,
) -> Result<Array3<A>>
where
    T: Copy + Sync,
    A: Copy + Send + Sync,
    F: Fn(A, T) -> A + Sync + Send,
{
    let (nx, ny, nz) = data.dim();
    let n = [nx, ny, nz][axis] as isize;
    collect_voxels((nx, ny, nz), |x, y, z| {
        let mut pos = [x, y, z];
        let center = pos[axis] as isize;
        let mut acc = init;
        for i in (center + lo).max(0)..=(center + hi).min(n - 1) {
            pos[axis] = i as usize;
            acc = fold(acc, data[(pos[0], pos[1], pos[2])]);
        }
        acc
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_storage_order() {
        let arr = collect_voxels((2, 3, 4), |x, y, z| x * 100 + y * 10 + z).unwrap();
        assert_eq!(arr[(1, 2, 3)], 123);
        assert_eq!(arr.as_slice().unwrap()[1], 1);
    }

    #[test]
    fn test_axis_pass_clips_window() {
        let data = Array3::from_shape_fn((5, 1, 1), |(x, _, _)| x as f64);
        let sums = axis_pass(&data, 0, (-1, 1), 0.0, |a, v| a + v).unwrap();
        assert_eq!(sums[(0, 0, 0)], 1.0);
        assert_eq!(sums[(2, 0, 0)], 6.0);
        assert_eq!(sums[(4, 0, 0)], 7.0);
    }

    #[test]
    fn test_replicate() {
        assert_eq!(replicate(-3, 4), 0);
        assert_eq!(replicate(2, 4), 2);
        assert_eq!(replicate(9, 4), 3);
    }
}
