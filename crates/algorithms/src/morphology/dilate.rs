//! Binary dilation (maximum filter over a mask)
//!
//! A voxel becomes set if any voxel under the reflected structuring element
//! is set. Voxels outside the volume count as unset.

use medvis_core::volume::step;
use medvis_core::{Algorithm, Error, Mask, Result};

use crate::voxelwise::{axis_pass, collect_voxels};

use super::element::StructuringElement;

/// Parameters for binary dilation
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct DilateParams {
    /// Structuring element shape
    pub element: StructuringElement,
}

/// Dilation algorithm
#[derive(Debug, Clone, Default)]
pub struct Dilate;

impl Algorithm for Dilate {
    type Input = Mask;
    type Output = Mask;
    type Params = DilateParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "Dilate"
    }

    fn description(&self) -> &'static str {
        "Binary dilation (maximum filter over structuring element)"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        dilate(&input, &params.element)
    }
}

/// Perform binary dilation on a mask
///
/// Uses the reflected element, which makes it the adjoint of
/// [`super::erode`] for even cube sides as well.
///
/// # Arguments
/// * `mask` - Input mask
/// * `element` - Structuring element defining the neighborhood shape
pub fn dilate(mask: &Mask, element: &StructuringElement) -> Result<Mask> {
    element.validate()?;

    let data = if element.is_separable() {
        let (lo, hi) = element.extent();
        let mut data = mask.data().clone();
        for axis in 0..3 {
            data = axis_pass(&data, axis, (-hi, -lo), false, |acc, v| acc || v)?;
        }
        data
    } else {
        let offsets = element.reflected_offsets();
        let dims = mask.dims();
        let src = mask.data();
        collect_voxels(mask.shape(), |x, y, z| {
            offsets
                .iter()
                .any(|&o| step((x, y, z), o, dims).is_some_and(|p| src[p]))
        })?
    };

    mask.derive(data)
}
