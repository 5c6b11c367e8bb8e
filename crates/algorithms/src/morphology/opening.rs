//! Binary opening (erosion followed by dilation)
//!
//! Removes objects and protrusions smaller than the structuring element
//! while keeping larger objects at their original extent.

use medvis_core::{Algorithm, Error, Mask, Result};

use super::dilate::dilate;
use super::element::StructuringElement;
use super::erode::erode;

/// Parameters for binary opening
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct OpeningParams {
    /// Structuring element shape
    pub element: StructuringElement,
}

/// Opening algorithm
#[derive(Debug, Clone, Default)]
pub struct Opening;

impl Algorithm for Opening {
    type Input = Mask;
    type Output = Mask;
    type Params = OpeningParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "Opening"
    }

    fn description(&self) -> &'static str {
        "Binary opening (erosion then dilation) to remove small objects"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        opening(&input, &params.element)
    }
}

/// Perform binary opening on a mask
///
/// Opening = erode then dilate. The result is always a subset of the input.
pub fn opening(mask: &Mask, element: &StructuringElement) -> Result<Mask> {
    let eroded = erode(mask, element)?;
    dilate(&eroded, element)
}
