//! Statistical analysis of volumes
//!
//! - **quantile**: Percentiles with linear interpolation
//! - **summary**: Global descriptive statistics, moments and thresholded surface area
//! - **roi**: Box-shaped region-of-interest statistics
//! - **regions**: Per-label intensity statistics
//! - **profile**: Axis mean profiles and histograms

pub mod profile;
pub mod quantile;
pub mod regions;
pub mod roi;
pub mod summary;

pub use profile::{axis_profiles, histogram, AxisProfiles, Histogram};
pub use quantile::{percentile, percentiles};
pub use regions::{region_statistics, RegionStats};
pub use roi::{analyze_roi, roi_bounds, AnalyzeRoi, RoiParams, RoiResult};
pub use summary::{compute_stats, compute_stats_with, moments, ComputeStats, DescriptiveStats, StatsParams, VolumeStatistics};
