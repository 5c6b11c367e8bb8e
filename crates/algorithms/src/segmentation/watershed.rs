//! Seeded watershed segmentation
//!
//! Intensity is treated as height. Bright local maxima become seeds and
//! every voxel is assigned to the seed whose basin (of the negated field)
//! it is flooded from.
//!
//! # Algorithm
//! 1. Seeds: voxels equal to the maximum over the cube of radius
//!    `min_distance` around them and strictly above `threshold_abs`.
//!    Candidates are taken in order of decreasing intensity (ties by
//!    linear index) and accepted only if farther than `min_distance`
//!    (Chebyshev distance) from every accepted seed.
//! 2. Flooding: Priority-Flood over face neighbors, brightest first. A
//!    voxel takes the label of the voxel that first reaches it; equal
//!    intensities are served in insertion order.
//!
//! Reference:
//! Beucher, S., & Meyer, F. (1993). The morphological approach to
//! segmentation: the watershed transformation.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use ndarray::Array3;
use serde::{Deserialize, Serialize};

use medvis_core::volume::{step, FACE_OFFSETS};
use medvis_core::{Algorithm, Error, LabelVolume, Result, Volume};

use crate::statistics::quantile::percentile;
use crate::voxelwise::axis_pass;

/// Percentile used for `threshold_abs` when none is supplied
pub const DEFAULT_SEED_PERCENTILE: f64 = 80.0;

/// Parameters for watershed segmentation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatershedParams {
    /// Minimum Chebyshev distance between two seeds, in voxels
    pub min_distance: usize,
    /// Seeds must be strictly brighter than this; `None` uses the 80th percentile
    pub threshold_abs: Option<f64>,
}

impl Default for WatershedParams {
    fn default() -> Self {
        Self {
            min_distance: 20,
            threshold_abs: None,
        }
    }
}

/// Watershed segmentation algorithm
#[derive(Debug, Clone, Default)]
pub struct Watershed;

impl Algorithm for Watershed {
    type Input = Volume<f64>;
    type Output = LabelVolume;
    type Params = WatershedParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "Watershed"
    }

    fn description(&self) -> &'static str {
        "Seeded watershed segmentation from bright local maxima"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        watershed(&input, &params)
    }
}

/// A voxel waiting in the flood queue
#[derive(Debug, Clone, Copy)]
struct FloodVoxel {
    value: f64,
    order: u64,
    pos: (usize, usize, usize),
}

impl PartialEq for FloodVoxel {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FloodVoxel {}

impl PartialOrd for FloodVoxel {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FloodVoxel {
    fn cmp(&self, other: &Self) -> Ordering {
        // Brighter first, then earlier insertion first
        self.value
            .total_cmp(&other.value)
            .then_with(|| other.order.cmp(&self.order))
    }
}

/// Seed positions in acceptance order. Seed `i` gets label `i + 1`.
pub fn find_seeds(field: &Volume<f64>, min_distance: usize, threshold_abs: f64) -> Result<Vec<(usize, usize, usize)>> {
    let r = min_distance as isize;
    let mut local_max = field.data().clone();
    for axis in 0..3 {
        local_max = axis_pass(&local_max, axis, (-r, r), f64::NEG_INFINITY, f64::max)?;
    }

    let mut candidates: Vec<(f64, usize, (usize, usize, usize))> = field
        .data()
        .indexed_iter()
        .zip(local_max.iter())
        .enumerate()
        .filter(|&(_, ((_, &v), &m))| v == m && v > threshold_abs)
        .map(|(i, ((pos, &v), _))| (v, i, pos))
        .collect();
    candidates.sort_by(|a, b| b.0.total_cmp(&a.0).then(a.1.cmp(&b.1)));

    let mut seeds: Vec<(usize, usize, usize)> = Vec::new();
    for (_, _, pos) in candidates {
        let far_enough = seeds.iter().all(|s| chebyshev(*s, pos) > min_distance);
        if far_enough {
            seeds.push(pos);
        }
    }
    Ok(seeds)
}

fn chebyshev(a: (usize, usize, usize), b: (usize, usize, usize)) -> usize {
    a.0.abs_diff(b.0).max(a.1.abs_diff(b.1)).max(a.2.abs_diff(b.2))
}

/// Partition `field` into basins grown from its bright local maxima.
///
/// Every voxel receives a label >= 1.
///
/// # Errors
/// - `InvalidInput` for NaN or infinite voxels
/// - `InvalidParameter` if `min_distance` is 0
/// - `NoSeedsFound` if no voxel qualifies as a seed
pub fn watershed(field: &Volume<f64>, params: &WatershedParams) -> Result<LabelVolume> {
    if field.has_non_finite() {
        return Err(Error::InvalidInput(
            "cannot segment a field containing NaN or infinite values".into(),
        ));
    }
    if params.min_distance == 0 {
        return Err(Error::invalid_parameter("min_distance", 0, "must be at least 1"));
    }
    let threshold = match params.threshold_abs {
        Some(t) => t,
        None => percentile(field, DEFAULT_SEED_PERCENTILE)?,
    };

    let seeds = find_seeds(field, params.min_distance, threshold)?;
    tracing::debug!(
        seeds = seeds.len(),
        threshold,
        min_distance = params.min_distance,
        "watershed seeds"
    );
    if seeds.is_empty() {
        return Err(Error::NoSeedsFound {
            threshold,
            min_distance: params.min_distance,
        });
    }

    let data = field.data();
    let dims = field.dims();
    let mut labels = Array3::<i32>::zeros(field.shape());
    let mut heap = BinaryHeap::new();
    let mut order = 0u64;

    for (i, &pos) in seeds.iter().enumerate() {
        labels[pos] = i as i32 + 1;
        heap.push(FloodVoxel {
            value: data[pos],
            order,
            pos,
        });
        order += 1;
    }

    while let Some(FloodVoxel { pos, .. }) = heap.pop() {
        let label = labels[pos];
        for &offset in &FACE_OFFSETS {
            if let Some(n) = step(pos, offset, dims) {
                if labels[n] == 0 {
                    labels[n] = label;
                    heap.push(FloodVoxel {
                        value: data[n],
                        order,
                        pos: n,
                    });
                    order += 1;
                }
            }
        }
    }

    field.derive(labels)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Two Gaussian blobs along x with a dip between them
    fn two_blobs() -> Volume<f64> {
        Volume::from_fn((30, 9, 9), |x, y, z| {
            let g = |cx: f64| {
                let d2 = (x as f64 - cx).powi(2) + (y as f64 - 4.0).powi(2) + (z as f64 - 4.0).powi(2);
                (-d2 / 8.0).exp()
            };
            100.0 * g(7.0) + 80.0 * g(22.0)
        })
        .unwrap()
    }

    #[test]
    fn test_seeds_ordered_by_intensity() {
        let seeds = find_seeds(&two_blobs(), 5, 10.0).unwrap();
        assert_eq!(seeds, vec![(7, 4, 4), (22, 4, 4)]);
    }

    #[test]
    fn test_min_distance_suppresses_close_peaks() {
        // blobs are 15 apart: a min_distance of 15 keeps only the brighter
        let seeds = find_seeds(&two_blobs(), 15, 10.0).unwrap();
        assert_eq!(seeds, vec![(7, 4, 4)]);
    }

    #[test]
    fn test_two_basins() {
        let params = WatershedParams {
            min_distance: 5,
            threshold_abs: Some(10.0),
        };
        let labels = watershed(&two_blobs(), &params).unwrap();
        assert_eq!(labels.shape(), (30, 9, 9));
        assert_eq!(labels.get(7, 4, 4).unwrap(), 1);
        assert_eq!(labels.get(22, 4, 4).unwrap(), 2);
        assert_eq!(labels.get(0, 0, 0).unwrap(), 1);
        assert_eq!(labels.get(29, 8, 8).unwrap(), 2);
        // every voxel labeled
        assert!(labels.values().all(|l| l == 1 || l == 2));
        // the boundary lies in the dip between the blobs
        let first_two = (0..30).find(|&x| labels.get(x, 4, 4).unwrap() == 2).unwrap();
        assert!((12..=18).contains(&first_two), "boundary at x = {}", first_two);
    }

    #[test]
    fn test_deterministic() {
        let params = WatershedParams {
            min_distance: 3,
            threshold_abs: Some(1.0),
        };
        let a = watershed(&two_blobs(), &params).unwrap();
        let b = watershed(&two_blobs(), &params).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_no_seeds() {
        let field = Volume::filled((5, 5, 5), 1.0).unwrap();
        let result = watershed(&field, &WatershedParams::default());
        assert!(matches!(result, Err(Error::NoSeedsFound { .. })));
    }

    #[test]
    fn test_zero_min_distance_rejected() {
        let params = WatershedParams {
            min_distance: 0,
            threshold_abs: None,
        };
        assert!(watershed(&two_blobs(), &params).is_err());
    }

    #[test]
    fn test_flood_order() {
        let mut heap = BinaryHeap::new();
        heap.push(FloodVoxel { value: 1.0, order: 0, pos: (0, 0, 0) });
        heap.push(FloodVoxel { value: 3.0, order: 1, pos: (1, 0, 0) });
        heap.push(FloodVoxel { value: 3.0, order: 2, pos: (2, 0, 0) });
        assert_eq!(heap.pop().unwrap().pos, (1, 0, 0));
        assert_eq!(heap.pop().unwrap().pos, (2, 0, 0));
        assert_eq!(heap.pop().unwrap().pos, (0, 0, 0));
    }
}
