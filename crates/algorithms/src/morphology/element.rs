//! Structuring element definitions for morphological operations
//!
//! A structuring element defines the neighborhood shape used in
//! erosion, dilation, and derived transforms.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use medvis_core::volume::{Neighborhood, Offset};
use medvis_core::{Error, Result};

/// Shape of a structuring element for binary morphology
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "shape", content = "size")]
pub enum StructuringElement {
    /// Cube of the given side length. Even sides are allowed; the extra
    /// voxel sits on the negative side of the center.
    Cube(usize),
    /// Voxels within Euclidean distance `radius` of the center
    Ball(usize),
    /// Three axis-aligned arms of the given length
    Cross(usize),
}

impl Default for StructuringElement {
    fn default() -> Self {
        StructuringElement::Cube(3)
    }
}

impl StructuringElement {
    /// Validate the structuring element, returning an error for invalid configurations
    pub fn validate(&self) -> Result<()> {
        match self {
            StructuringElement::Cube(side) => {
                if *side == 0 {
                    return Err(Error::invalid_parameter(
                        "structure_size",
                        side,
                        "cube side must be at least 1",
                    ));
                }
            }
            StructuringElement::Ball(r) | StructuringElement::Cross(r) => {
                if *r == 0 {
                    return Err(Error::invalid_parameter(
                        "radius",
                        r,
                        "structuring element radius must be at least 1",
                    ));
                }
            }
        }
        Ok(())
    }

    /// Per-axis extent `(lo, hi)` of the element, both inclusive
    pub fn extent(&self) -> (isize, isize) {
        match self {
            StructuringElement::Cube(side) => {
                let side = *side as isize;
                (-(side / 2), side - 1 - side / 2)
            }
            StructuringElement::Ball(r) | StructuringElement::Cross(r) => (-(*r as isize), *r as isize),
        }
    }

    /// Whether the element is a full box, which lets erosion and dilation
    /// run as three 1-D passes
    pub fn is_separable(&self) -> bool {
        matches!(self, StructuringElement::Cube(_))
    }

    /// (dx, dy, dz) offsets of all active voxels relative to the center
    pub fn offsets(&self) -> Vec<Offset> {
        match self {
            StructuringElement::Cube(_) => {
                let (lo, hi) = self.extent();
                let mut offsets = Vec::new();
                for dx in lo..=hi {
                    for dy in lo..=hi {
                        for dz in lo..=hi {
                            offsets.push((dx, dy, dz));
                        }
                    }
                }
                offsets
            }
            StructuringElement::Ball(r) => Neighborhood::Ball(*r).offsets(),
            StructuringElement::Cross(r) => Neighborhood::Cross(*r).offsets(),
        }
    }

    /// Offsets mirrored through the center
    pub fn reflected_offsets(&self) -> Vec<Offset> {
        self.offsets()
            .into_iter()
            .map(|(dx, dy, dz)| (-dx, -dy, -dz))
            .collect()
    }
}

impl fmt::Display for StructuringElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StructuringElement::Cube(side) => write!(f, "cube:{}", side),
            StructuringElement::Ball(r) => write!(f, "ball:{}", r),
            StructuringElement::Cross(r) => write!(f, "cross:{}", r),
        }
    }
}

/// Parses `cube:3`, `ball:2`, `cross:1`, or a bare side length (`3`) as a cube
impl FromStr for StructuringElement {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim().to_ascii_lowercase();
        let (shape, size) = match s.split_once(':') {
            Some((shape, size)) => (shape, size),
            None => ("cube", s.as_str()),
        };
        let size: usize = size.parse().map_err(|_| {
            Error::invalid_parameter("structure_size", size, "expected a positive integer")
        })?;
        let element = match shape {
            "cube" => StructuringElement::Cube(size),
            "ball" => StructuringElement::Ball(size),
            "cross" => StructuringElement::Cross(size),
            other => {
                return Err(Error::UnsupportedMethod {
                    kind: "structuring element",
                    name: other.to_string(),
                })
            }
        };
        element.validate()?;
        Ok(element)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cube_offsets() {
        let offsets = StructuringElement::Cube(3).offsets();
        assert_eq!(offsets.len(), 27);
        assert!(offsets.contains(&(0, 0, 0)));
        assert!(offsets.contains(&(-1, -1, -1)));
        assert!(offsets.contains(&(1, 1, 1)));
    }

    #[test]
    fn test_even_cube_extent() {
        assert_eq!(StructuringElement::Cube(1).extent(), (0, 0));
        assert_eq!(StructuringElement::Cube(2).extent(), (-1, 0));
        assert_eq!(StructuringElement::Cube(4).extent(), (-2, 1));
        assert_eq!(StructuringElement::Cube(4).offsets().len(), 64);
    }

    #[test]
    fn test_cross_offsets() {
        let offsets = StructuringElement::Cross(1).offsets();
        // center + 6 arms
        assert_eq!(offsets.len(), 7);
        assert!(!offsets.contains(&(1, 1, 0)));
    }

    #[test]
    fn test_reflection() {
        let reflected = StructuringElement::Cube(2).reflected_offsets();
        assert!(reflected.contains(&(1, 1, 1)));
        assert!(!reflected.contains(&(-1, 0, 0)));
    }

    #[test]
    fn test_validate_zero() {
        assert!(StructuringElement::Cube(0).validate().is_err());
        assert!(StructuringElement::Ball(0).validate().is_err());
        assert!(StructuringElement::Cross(0).validate().is_err());
        assert!(StructuringElement::Cube(1).validate().is_ok());
    }

    #[test]
    fn test_parse() {
        assert_eq!("5".parse::<StructuringElement>().unwrap(), StructuringElement::Cube(5));
        assert_eq!("ball:2".parse::<StructuringElement>().unwrap(), StructuringElement::Ball(2));
        assert_eq!("Cross:1".parse::<StructuringElement>().unwrap(), StructuringElement::Cross(1));
        assert!(matches!(
            "disk:2".parse::<StructuringElement>(),
            Err(Error::UnsupportedMethod { .. })
        ));
        assert!("cube:0".parse::<StructuringElement>().is_err());
        assert!("cube:x".parse::<StructuringElement>().is_err());
    }

    #[test]
    fn test_default() {
        let se = StructuringElement::default();
        assert_eq!(se, StructuringElement::Cube(3));
        assert_eq!(se.to_string(), "cube:3");
    }
}
