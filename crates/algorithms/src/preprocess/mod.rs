//! Intensity preprocessing
//!
//! Normalization rescales a field by a statistical rule; smoothing filters
//! suppress noise before segmentation or isosurfacing. [`PreprocessPipeline`]
//! chains the two.

mod normalize;
mod smoothing;

pub use normalize::{normalize, NormalizationMethod, Normalize, NormalizeParams};
pub use smoothing::{bilateral_filter, gaussian_smooth, median_filter};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use medvis_core::{Algorithm, Error, Result, Volume};

/// Smoothing filter with its parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind")]
pub enum FilterKind {
    /// Isotropic Gaussian, standard deviation in voxels
    Gaussian { sigma: f64 },
    /// Median over a cube of odd side `size`
    Median { size: usize },
    /// Edge-preserving bilateral filter
    Bilateral { sigma_color: f64, sigma_spatial: f64 },
}

impl Default for FilterKind {
    fn default() -> Self {
        FilterKind::Gaussian { sigma: 1.0 }
    }
}

impl FilterKind {
    pub fn name(&self) -> &'static str {
        match self {
            FilterKind::Gaussian { .. } => "gaussian",
            FilterKind::Median { .. } => "median",
            FilterKind::Bilateral { .. } => "bilateral",
        }
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Parses a filter name into the filter with its default parameters:
/// gaussian sigma 1.0, median size 3, bilateral sigma_color 0.05 and
/// sigma_spatial 1.0.
impl FromStr for FilterKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "gaussian" => Ok(FilterKind::Gaussian { sigma: 1.0 }),
            "median" => Ok(FilterKind::Median { size: 3 }),
            "bilateral" => Ok(FilterKind::Bilateral {
                sigma_color: 0.05,
                sigma_spatial: 1.0,
            }),
            _ => Err(Error::UnsupportedMethod {
                kind: "filter",
                name: s.to_string(),
            }),
        }
    }
}

/// Apply one smoothing filter to `field`
pub fn apply_filter(field: &Volume<f64>, filter: FilterKind) -> Result<Volume<f64>> {
    match filter {
        FilterKind::Gaussian { sigma } => gaussian_smooth(field, sigma),
        FilterKind::Median { size } => median_filter(field, size),
        FilterKind::Bilateral {
            sigma_color,
            sigma_spatial,
        } => bilateral_filter(field, sigma_color, sigma_spatial),
    }
}

/// Parameters for smoothing
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterParams {
    pub filter: FilterKind,
}

/// Smoothing algorithm
#[derive(Debug, Clone, Default)]
pub struct Filter;

impl Algorithm for Filter {
    type Input = Volume<f64>;
    type Output = Volume<f64>;
    type Params = FilterParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "Filter"
    }

    fn description(&self) -> &'static str {
        "Gaussian, median or bilateral smoothing of a scalar field"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        apply_filter(&input, params.filter)
    }
}

/// Optional normalization followed by optional smoothing.
///
/// An empty pipeline returns a copy of the input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PreprocessPipeline {
    pub normalization: Option<NormalizationMethod>,
    pub filter: Option<FilterKind>,
}

impl PreprocessPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn normalize(mut self, method: NormalizationMethod) -> Self {
        self.normalization = Some(method);
        self
    }

    pub fn filter(mut self, filter: FilterKind) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn run(&self, field: &Volume<f64>) -> Result<Volume<f64>> {
        let normalized = match self.normalization {
            Some(method) => normalize(field, method)?,
            None => field.clone(),
        };
        match self.filter {
            Some(filter) => apply_filter(&normalized, filter),
            None => Ok(normalized),
        }
    }
}
