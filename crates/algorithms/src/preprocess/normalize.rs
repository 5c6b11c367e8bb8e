//! Intensity normalization
//!
//! Rescales a field by one of three statistical rules:
//! - **minmax**: `(v - min) / (max - min)`, output spans exactly [0, 1]
//! - **zscore**: `(v - mean) / std`, output has mean 0 and std 1
//! - **robust**: `(v - median) / (P75 - P25)`, insensitive to outliers
//!
//! A field with zero range cannot be rescaled by any rule and fails with
//! `DegenerateRange` instead of being passed through.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use medvis_core::{Algorithm, Error, Result, Volume, VoxelElement};

use crate::statistics::quantile::{percentile_of_sorted, sorted_values};

/// Statistical rule used by [`normalize`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NormalizationMethod {
    #[default]
    MinMax,
    ZScore,
    Robust,
}

impl NormalizationMethod {
    pub fn name(&self) -> &'static str {
        match self {
            NormalizationMethod::MinMax => "minmax",
            NormalizationMethod::ZScore => "zscore",
            NormalizationMethod::Robust => "robust",
        }
    }
}

impl fmt::Display for NormalizationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for NormalizationMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "minmax" | "min-max" => Ok(NormalizationMethod::MinMax),
            "zscore" | "z-score" => Ok(NormalizationMethod::ZScore),
            "robust" => Ok(NormalizationMethod::Robust),
            _ => Err(Error::UnsupportedMethod {
                kind: "normalization",
                name: s.to_string(),
            }),
        }
    }
}

/// Parameters for normalization
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NormalizeParams {
    pub method: NormalizationMethod,
}

/// Normalization algorithm
#[derive(Debug, Clone, Default)]
pub struct Normalize;

impl Algorithm for Normalize {
    type Input = Volume<f64>;
    type Output = Volume<f64>;
    type Params = NormalizeParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "Normalize"
    }

    fn description(&self) -> &'static str {
        "Rescale intensities by min-max, z-score or robust (median/IQR) rule"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        normalize(&input, params.method)
    }
}

/// Rescale every voxel of `field` by `method`.
///
/// # Errors
/// - `InvalidInput` if the field holds NaN or infinite values
/// - `DegenerateRange` if the field is constant, or the rule's divisor
///   (range, standard deviation, IQR) is zero
pub fn normalize<T: VoxelElement>(field: &Volume<T>, method: NormalizationMethod) -> Result<Volume<f64>> {
    if field.has_non_finite() {
        return Err(Error::InvalidInput(
            "cannot normalize a field containing NaN or infinite values".into(),
        ));
    }

    let (min, max) = field.value_range();
    if max == min {
        return Err(Error::degenerate(
            "normalize",
            format!("all voxels equal {}", min),
        ));
    }

    let (offset, scale) = match method {
        NormalizationMethod::MinMax => (min, max - min),
        NormalizationMethod::ZScore => {
            let n = field.len() as f64;
            let mean = field.values().map(VoxelElement::to_f64).sum::<f64>() / n;
            let var = field
                .values()
                .map(|v| {
                    let d = v.to_f64() - mean;
                    d * d
                })
                .sum::<f64>()
                / n;
            let std = var.sqrt();
            if std == 0.0 {
                return Err(Error::degenerate("normalize", "standard deviation is zero"));
            }
            (mean, std)
        }
        NormalizationMethod::Robust => {
            let sorted = sorted_values(field)?;
            let median = percentile_of_sorted(&sorted, 50.0);
            let iqr = percentile_of_sorted(&sorted, 75.0) - percentile_of_sorted(&sorted, 25.0);
            if iqr == 0.0 {
                return Err(Error::degenerate("normalize", "interquartile range is zero"));
            }
            (median, iqr)
        }
    };

    Ok(field.map(|v| (v.to_f64() - offset) / scale))
}
