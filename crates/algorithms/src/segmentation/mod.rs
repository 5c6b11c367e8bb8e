//! Region segmentation
//!
//! Partitions a scalar field into a [`LabelVolume`]: label 0 is background,
//! labels >= 1 identify regions.
//!
//! - **Threshold**: one region of voxels above a cut
//! - **Watershed**: one region per bright seed, grown by flooding
//!
//! [`label_components`] splits a binary mask into its connected regions.

mod labels;
mod threshold;
mod watershed;

pub use labels::{label_components, label_statistics, Connectivity, LabelStats};
pub use threshold::{threshold_segment, ThresholdParams, ThresholdSegment, DEFAULT_THRESHOLD_PERCENTILE};
pub use watershed::{find_seeds, watershed, Watershed, WatershedParams, DEFAULT_SEED_PERCENTILE};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use medvis_core::{Algorithm, Error, LabelVolume, Result, Volume};

/// Segmentation strategy with its parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "method")]
pub enum SegmentationMethod {
    Threshold {
        #[serde(default)]
        threshold: Option<f64>,
    },
    Watershed(WatershedParams),
}

impl Default for SegmentationMethod {
    fn default() -> Self {
        SegmentationMethod::Threshold { threshold: None }
    }
}

impl SegmentationMethod {
    pub fn name(&self) -> &'static str {
        match self {
            SegmentationMethod::Threshold { .. } => "threshold",
            SegmentationMethod::Watershed(_) => "watershed",
        }
    }
}

impl fmt::Display for SegmentationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Parses a method name into the method with its default parameters
impl FromStr for SegmentationMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "threshold" => Ok(SegmentationMethod::Threshold { threshold: None }),
            "watershed" => Ok(SegmentationMethod::Watershed(WatershedParams::default())),
            _ => Err(Error::UnsupportedMethod {
                kind: "segmentation",
                name: s.to_string(),
            }),
        }
    }
}

/// Segment `field` with the selected strategy
pub fn segment(field: &Volume<f64>, method: &SegmentationMethod) -> Result<LabelVolume> {
    match method {
        SegmentationMethod::Threshold { threshold } => threshold_segment(field, *threshold),
        SegmentationMethod::Watershed(params) => watershed(field, params),
    }
}

/// Parameters for segmentation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SegmentParams {
    pub method: SegmentationMethod,
}

/// Segmentation algorithm
#[derive(Debug, Clone, Default)]
pub struct Segment;

impl Algorithm for Segment {
    type Input = Volume<f64>;
    type Output = LabelVolume;
    type Params = SegmentParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "Segment"
    }

    fn description(&self) -> &'static str {
        "Partition a scalar field into labeled regions by threshold or watershed"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        segment(&input, &params.method)
    }
}
