//! Global threshold segmentation

use serde::{Deserialize, Serialize};

use medvis_core::{Algorithm, Error, LabelVolume, Result, Volume};

use crate::statistics::quantile::percentile;

/// Percentile used when no explicit threshold is supplied
pub const DEFAULT_THRESHOLD_PERCENTILE: f64 = 90.0;

/// Parameters for threshold segmentation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ThresholdParams {
    /// Intensity cut; `None` uses the 90th percentile of the field
    pub threshold: Option<f64>,
}

/// Threshold segmentation algorithm
#[derive(Debug, Clone, Default)]
pub struct ThresholdSegment;

impl Algorithm for ThresholdSegment {
    type Input = Volume<f64>;
    type Output = LabelVolume;
    type Params = ThresholdParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "ThresholdSegment"
    }

    fn description(&self) -> &'static str {
        "Label voxels above an intensity threshold as region 1"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        threshold_segment(&input, params.threshold)
    }
}

/// Label every voxel strictly above the threshold as 1, the rest as 0.
///
/// With `threshold = None` the cut is the 90th percentile of the field.
pub fn threshold_segment(field: &Volume<f64>, threshold: Option<f64>) -> Result<LabelVolume> {
    if field.has_non_finite() {
        return Err(Error::InvalidInput(
            "cannot segment a field containing NaN or infinite values".into(),
        ));
    }
    let t = match threshold {
        Some(t) if t.is_nan() => {
            return Err(Error::invalid_parameter("threshold", t, "must not be NaN"))
        }
        Some(t) => t,
        None => percentile(field, DEFAULT_THRESHOLD_PERCENTILE)?,
    };
    Ok(field.map(|v| i32::from(v > t)))
}
