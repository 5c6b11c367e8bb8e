//! Region-of-interest extraction
//!
//! The ROI is the axis-aligned box `[c - r, c + r)` on every axis, clipped
//! to the volume. A center near (or past) the border gives a smaller,
//! asymmetric box rather than an error; only a box that misses the volume
//! entirely is rejected.

use serde::{Deserialize, Serialize};

use medvis_core::{Algorithm, Error, Result, Volume};

use super::summary::DescriptiveStats;

/// Parameters for ROI analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoiParams {
    /// Query center in voxel coordinates
    pub center: (usize, usize, usize),
    /// Half-width of the box in voxels
    pub radius: usize,
}

impl Default for RoiParams {
    fn default() -> Self {
        Self {
            center: (0, 0, 0),
            radius: 10,
        }
    }
}

/// A clipped sub-volume with its statistics
#[derive(Debug, Clone, Serialize)]
pub struct RoiResult {
    pub center: (usize, usize, usize),
    pub radius: usize,
    /// First voxel of the box (inclusive)
    pub start: [usize; 3],
    /// One past the last voxel of the box
    pub end: [usize; 3],
    pub stats: DescriptiveStats,
    #[serde(skip_serializing)]
    pub sub_volume: Volume<f64>,
}

impl RoiResult {
    /// Extent of the box along each axis
    pub fn extent(&self) -> [usize; 3] {
        [
            self.end[0] - self.start[0],
            self.end[1] - self.start[1],
            self.end[2] - self.start[2],
        ]
    }
}

/// ROI analysis algorithm
#[derive(Debug, Clone, Default)]
pub struct AnalyzeRoi;

impl Algorithm for AnalyzeRoi {
    type Input = Volume<f64>;
    type Output = RoiResult;
    type Params = RoiParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "AnalyzeRoi"
    }

    fn description(&self) -> &'static str {
        "Statistics of a box-shaped region around a center voxel"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        analyze_roi(&input, params.center, params.radius)
    }
}

/// Half-open ROI bounds per axis, clipped to `dims`
pub fn roi_bounds(center: (usize, usize, usize), radius: usize, dims: [usize; 3]) -> ([usize; 3], [usize; 3]) {
    let c = [center.0, center.1, center.2];
    let start = [0, 1, 2].map(|k| c[k].saturating_sub(radius));
    let end = [0, 1, 2].map(|k| c[k].saturating_add(radius).min(dims[k]));
    (start, end)
}

/// Extract the box around `center` and describe its values.
///
/// # Errors
/// - `InvalidParameter` if `radius` is 0
/// - `InvalidInput` if the clipped box is empty (the center lies at least
///   `radius` voxels beyond the volume on some axis)
pub fn analyze_roi(field: &Volume<f64>, center: (usize, usize, usize), radius: usize) -> Result<RoiResult> {
    if radius == 0 {
        return Err(Error::invalid_parameter("radius", radius, "must be > 0"));
    }
    let (start, end) = roi_bounds(center, radius, field.dims());
    if (0..3).any(|k| start[k] >= end[k]) {
        return Err(Error::InvalidInput(format!(
            "ROI around {:?} with radius {} lies outside volume {:?}",
            center,
            radius,
            field.dims()
        )));
    }

    let sub_volume = field.sub_volume(start, end)?;
    let stats = DescriptiveStats::from_values(sub_volume.values())
        .ok_or_else(|| Error::InvalidInput("ROI has no voxels".into()))?;

    Ok(RoiResult {
        center,
        radius,
        start,
        end,
        stats,
        sub_volume,
    })
}
