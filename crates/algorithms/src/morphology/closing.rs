//! Binary closing (dilation followed by erosion)
//!
//! Fills holes and gaps narrower than the structuring element.

use medvis_core::{Algorithm, Error, Mask, Result};

use super::dilate::dilate;
use super::element::StructuringElement;
use super::erode::erode;

/// Parameters for binary closing
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct ClosingParams {
    /// Structuring element shape
    pub element: StructuringElement,
}

/// Closing algorithm
#[derive(Debug, Clone, Default)]
pub struct Closing;

impl Algorithm for Closing {
    type Input = Mask;
    type Output = Mask;
    type Params = ClosingParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "Closing"
    }

    fn description(&self) -> &'static str {
        "Binary closing (dilation then erosion) to fill small holes"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        closing(&input, &params.element)
    }
}

/// Perform binary closing on a mask
///
/// Closing = dilate then erode. The result always contains the input.
pub fn closing(mask: &Mask, element: &StructuringElement) -> Result<Mask> {
    let dilated = dilate(mask, element)?;
    erode(&dilated, element)
}

#[cfg(test)]
mod tests {
    use super::*;
    use medvis_core::Volume;

    #[test]
    fn test_closing_fills_hole() {
        let mask = Volume::from_fn((9, 9, 9), |x, y, z| (x, y, z) != (4, 4, 4)).unwrap();
        let result = closing(&mask, &StructuringElement::Cube(3)).unwrap();
        assert!(result.get(4, 4, 4).unwrap());
        assert_eq!(result.count_nonzero(), 729);
    }

    #[test]
    fn test_closing_is_superset() {
        let mask = Volume::from_fn((10, 9, 8), |x, y, z| (x * 3 + y * 5 + z * 7) % 5 < 2).unwrap();
        for element in [
            StructuringElement::Cube(2),
            StructuringElement::Cube(3),
            StructuringElement::Cross(1),
        ] {
            let result = closing(&mask, &element).unwrap();
            for (out, inp) in result.values().zip(mask.values()) {
                assert!(out || !inp, "closing with {} removed a voxel", element);
            }
        }
    }

    #[test]
    fn test_closing_keeps_object_touching_border() {
        // slab on the x = 0 face must not be eroded away from the border
        let mask = Volume::from_fn((6, 6, 6), |x, _, _| x < 2).unwrap();
        let result = closing(&mask, &StructuringElement::Cube(3)).unwrap();
        assert_eq!(result, mask);
    }
}
