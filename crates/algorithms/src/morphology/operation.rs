//! Named selector over the four binary operations

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use medvis_core::{Error, Mask, Result};

use super::{closing, dilate, erode, opening, StructuringElement};

/// One of the binary morphology operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MorphologyOp {
    Erode,
    Dilate,
    #[default]
    Opening,
    Closing,
}

impl MorphologyOp {
    pub const ALL: [MorphologyOp; 4] = [
        MorphologyOp::Erode,
        MorphologyOp::Dilate,
        MorphologyOp::Opening,
        MorphologyOp::Closing,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            MorphologyOp::Erode => "erode",
            MorphologyOp::Dilate => "dilate",
            MorphologyOp::Opening => "opening",
            MorphologyOp::Closing => "closing",
        }
    }

    /// Apply the operation to `mask` with `element`
    pub fn apply(&self, mask: &Mask, element: &StructuringElement) -> Result<Mask> {
        match self {
            MorphologyOp::Erode => erode(mask, element),
            MorphologyOp::Dilate => dilate(mask, element),
            MorphologyOp::Opening => opening(mask, element),
            MorphologyOp::Closing => closing(mask, element),
        }
    }
}

impl fmt::Display for MorphologyOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Accepts the operation names plus `erosion`, `dilation`, `open`, `close`
impl FromStr for MorphologyOp {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "erode" | "erosion" => Ok(MorphologyOp::Erode),
            "dilate" | "dilation" => Ok(MorphologyOp::Dilate),
            "opening" | "open" => Ok(MorphologyOp::Opening),
            "closing" | "close" => Ok(MorphologyOp::Closing),
            _ => Err(Error::UnsupportedMethod {
                kind: "morphology operation",
                name: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use medvis_core::Volume;

    #[test]
    fn test_parse_names_and_aliases() {
        assert_eq!("erosion".parse::<MorphologyOp>().unwrap(), MorphologyOp::Erode);
        assert_eq!("Dilate".parse::<MorphologyOp>().unwrap(), MorphologyOp::Dilate);
        assert_eq!("open".parse::<MorphologyOp>().unwrap(), MorphologyOp::Opening);
        assert_eq!(" closing ".parse::<MorphologyOp>().unwrap(), MorphologyOp::Closing);
        for op in MorphologyOp::ALL {
            assert_eq!(op.to_string().parse::<MorphologyOp>().unwrap(), op);
        }
    }

    #[test]
    fn test_unknown_operation() {
        assert!(matches!(
            "skeletonize".parse::<MorphologyOp>(),
            Err(Error::UnsupportedMethod { kind: "morphology operation", .. })
        ));
    }

    #[test]
    fn test_apply_dispatches() {
        let mask = Volume::from_fn((7, 7, 7), |x, y, z| (2..5).contains(&x) && (2..5).contains(&y) && (2..5).contains(&z))
            .unwrap();
        let element = StructuringElement::Cube(3);
        let count = |m: &Mask| m.values().filter(|&v| v).count();
        assert_eq!(count(&MorphologyOp::Erode.apply(&mask, &element).unwrap()), 1);
        assert_eq!(count(&MorphologyOp::Dilate.apply(&mask, &element).unwrap()), 125);
        assert_eq!(MorphologyOp::Opening.apply(&mask, &element).unwrap(), mask);
        assert_eq!(MorphologyOp::Closing.apply(&mask, &element).unwrap(), mask);
    }
}
