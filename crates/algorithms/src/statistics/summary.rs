//! Global descriptive and spatial statistics of a volume

use serde::{Deserialize, Serialize};

use medvis_core::{Algorithm, Error, Result, Volume, VoxelElement};

use crate::statistics::quantile::{percentile_of_sorted, sorted_values};
use crate::surface::{extract_surface, surface_area, SurfaceParams};

/// Count, mean, population standard deviation and range of a set of values
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DescriptiveStats {
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
}

impl DescriptiveStats {
    /// Single-pass (Welford) statistics over `values`. `None` when there
    /// are no values.
    pub fn from_values<I: IntoIterator<Item = f64>>(values: I) -> Option<Self> {
        let mut count = 0usize;
        let mut mean = 0.0;
        let mut m2 = 0.0;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for v in values {
            count += 1;
            let delta = v - mean;
            mean += delta / count as f64;
            m2 += delta * (v - mean);
            min = min.min(v);
            max = max.max(v);
        }
        if count == 0 {
            return None;
        }
        Some(Self {
            count,
            mean,
            std: (m2 / count as f64).sqrt(),
            min,
            max,
        })
    }
}

/// Summary of a whole volume
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolumeStatistics {
    pub shape: [usize; 3],
    /// Element type tag such as `"float64"` or `"int16"`
    pub dtype: String,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std: f64,
    pub median: f64,
    pub p25: f64,
    pub p75: f64,
    pub p90: f64,
    pub p95: f64,
    pub p99: f64,
    pub nonzero_count: usize,
    pub total_count: usize,
    pub byte_size: usize,
    /// Intensity-weighted centroid in voxel coordinates; `None` when the
    /// intensities sum to zero
    pub center_of_mass: Option<[f64; 3]>,
    /// Intensity-weighted central second moments (3x3 covariance) about
    /// `center_of_mass`
    pub second_moment: Option<[[f64; 3]; 3]>,
    /// Area of the boundary of the voxels above `surface_percentile`
    pub thresholded_surface_area: f64,
}

/// Parameters for volume statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsParams {
    /// Percentile cut for the mask whose surface area is reported
    pub surface_percentile: f64,
}

impl Default for StatsParams {
    fn default() -> Self {
        Self {
            surface_percentile: 90.0,
        }
    }
}

/// Volume statistics algorithm
#[derive(Debug, Clone, Default)]
pub struct ComputeStats;

impl Algorithm for ComputeStats {
    type Input = Volume<f64>;
    type Output = VolumeStatistics;
    type Params = StatsParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "ComputeStats"
    }

    fn description(&self) -> &'static str {
        "Descriptive statistics, moments and thresholded surface area of a volume"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        compute_stats_with(&input, &params)
    }
}

/// [`compute_stats_with`] using the 90th percentile surface mask
pub fn compute_stats<T: VoxelElement>(field: &Volume<T>) -> Result<VolumeStatistics> {
    compute_stats_with(field, &StatsParams::default())
}

/// Compute the global statistics of `field`.
///
/// Fails with `InvalidInput` if any voxel is NaN or infinite.
pub fn compute_stats_with<T: VoxelElement>(field: &Volume<T>, params: &StatsParams) -> Result<VolumeStatistics> {
    if !(0.0..=100.0).contains(&params.surface_percentile) {
        return Err(Error::invalid_parameter(
            "surface_percentile",
            params.surface_percentile,
            "must be between 0 and 100",
        ));
    }
    let sorted = sorted_values(field)?;
    let pct = |p: f64| percentile_of_sorted(&sorted, p);

    let desc = DescriptiveStats::from_values(sorted.iter().copied())
        .ok_or_else(|| Error::InvalidInput("volume has no voxels".into()))?;

    let (center_of_mass, second_moment) = moments(field);
    let thresholded_surface_area = thresholded_surface_area(field, pct(params.surface_percentile))?;

    Ok(VolumeStatistics {
        shape: field.dims(),
        dtype: T::DTYPE.to_string(),
        min: desc.min,
        max: desc.max,
        mean: desc.mean,
        std: desc.std,
        median: pct(50.0),
        p25: pct(25.0),
        p75: pct(75.0),
        p90: pct(90.0),
        p95: pct(95.0),
        p99: pct(99.0),
        nonzero_count: field.count_nonzero(),
        total_count: field.len(),
        byte_size: field.byte_size(),
        center_of_mass,
        second_moment,
        thresholded_surface_area,
    })
}

/// Intensity-weighted centroid and central second moments
pub fn moments<T: VoxelElement>(field: &Volume<T>) -> (Option<[f64; 3]>, Option<[[f64; 3]; 3]>) {
    let mut mass = 0.0;
    let mut first = [0.0; 3];
    for ((x, y, z), v) in field.data().indexed_iter() {
        let w = v.to_f64();
        mass += w;
        first[0] += w * x as f64;
        first[1] += w * y as f64;
        first[2] += w * z as f64;
    }
    if mass == 0.0 {
        return (None, None);
    }
    let center = first.map(|m| m / mass);

    let mut second = [[0.0; 3]; 3];
    for ((x, y, z), v) in field.data().indexed_iter() {
        let w = v.to_f64();
        let d = [x as f64 - center[0], y as f64 - center[1], z as f64 - center[2]];
        for i in 0..3 {
            for j in 0..3 {
                second[i][j] += w * d[i] * d[j];
            }
        }
    }
    for row in second.iter_mut() {
        for m in row.iter_mut() {
            *m /= mass;
        }
    }
    (Some(center), Some(second))
}

/// Surface area of the binary mask `field > threshold`, extracted at 0.5
fn thresholded_surface_area<T: VoxelElement>(field: &Volume<T>, threshold: f64) -> Result<f64> {
    let mask = field.map(|v| if v.to_f64() > threshold { 1.0 } else { 0.0 });
    let mesh = extract_surface(
        &mask,
        &SurfaceParams {
            isovalue: 0.5,
            normalize_first: false,
        },
    )?;
    Ok(surface_area(&mesh))
}
