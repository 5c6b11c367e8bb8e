//! Binary erosion (minimum filter over a mask)
//!
//! A voxel stays set only if every voxel under the structuring element is
//! set. Voxels outside the volume count as set, so erosion never eats into
//! an object from the volume border.

use medvis_core::volume::step;
use medvis_core::{Algorithm, Error, Mask, Result};

use crate::voxelwise::{axis_pass, collect_voxels};

use super::element::StructuringElement;

/// Parameters for binary erosion
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct ErodeParams {
    /// Structuring element shape
    pub element: StructuringElement,
}

/// Erosion algorithm
#[derive(Debug, Clone, Default)]
pub struct Erode;

impl Algorithm for Erode {
    type Input = Mask;
    type Output = Mask;
    type Params = ErodeParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "Erode"
    }

    fn description(&self) -> &'static str {
        "Binary erosion (minimum filter over structuring element)"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        erode(&input, &params.element)
    }
}

/// Perform binary erosion on a mask
///
/// Cube elements run as three 1-D passes; ball and cross elements visit
/// every offset.
///
/// # Arguments
/// * `mask` - Input mask
/// * `element` - Structuring element defining the neighborhood shape
pub fn erode(mask: &Mask, element: &StructuringElement) -> Result<Mask> {
    element.validate()?;

    let data = if element.is_separable() {
        let window = element.extent();
        let mut data = mask.data().clone();
        for axis in 0..3 {
            data = axis_pass(&data, axis, window, true, |acc, v| acc && v)?;
        }
        data
    } else {
        let offsets = element.offsets();
        let dims = mask.dims();
        let src = mask.data();
        collect_voxels(mask.shape(), |x, y, z| {
            offsets
                .iter()
                .all(|&o| step((x, y, z), o, dims).map_or(true, |p| src[p]))
        })?
    };

    mask.derive(data)
}
