//! Voxel element trait for generic grid values

use num_traits::NumCast;
use std::fmt::Debug;

/// Trait for types that can be stored in a volume voxel.
///
/// Intensity volumes are usually `f64` or one of the integer scanner types,
/// label volumes are `i32` and binary masks are `bool`. Every element can be
/// widened to `f64` so statistics work on any of them.
pub trait VoxelElement:
    Copy + Clone + Debug + Default + PartialOrd + PartialEq + Send + Sync + 'static
{
    /// Short dtype tag, matching the usual numeric array naming (`"float64"`, `"int16"`, ...)
    const DTYPE: &'static str;

    /// Convert self to f64
    fn to_f64(self) -> f64;

    /// Convert from f64, saturating or truncating as the type requires
    fn from_f64(value: f64) -> Self;

    /// Whether this type is a floating point type
    fn is_float() -> bool;

    /// Whether the value counts as nonzero
    fn is_nonzero(&self) -> bool {
        self.to_f64() != 0.0
    }
}

macro_rules! impl_voxel_element_int {
    ($t:ty, $tag:expr) => {
        impl VoxelElement for $t {
            const DTYPE: &'static str = $tag;

            fn to_f64(self) -> f64 {
                <f64 as NumCast>::from(self).unwrap_or(f64::NAN)
            }

            fn from_f64(value: f64) -> Self {
                if value.is_nan() {
                    return 0;
                }
                <$t as NumCast>::from(value.round()).unwrap_or(if value > 0.0 {
                    <$t>::MAX
                } else {
                    <$t>::MIN
                })
            }

            fn is_float() -> bool {
                false
            }
        }
    };
}

macro_rules! impl_voxel_element_float {
    ($t:ty, $tag:expr) => {
        impl VoxelElement for $t {
            const DTYPE: &'static str = $tag;

            fn to_f64(self) -> f64 {
                self as f64
            }

            fn from_f64(value: f64) -> Self {
                value as $t
            }

            fn is_float() -> bool {
                true
            }
        }
    };
}

impl_voxel_element_int!(u8, "uint8");
impl_voxel_element_int!(u16, "uint16");
impl_voxel_element_int!(i16, "int16");
impl_voxel_element_int!(i32, "int32");
impl_voxel_element_int!(u32, "uint32");
impl_voxel_element_float!(f32, "float32");
impl_voxel_element_float!(f64, "float64");

impl VoxelElement for bool {
    const DTYPE: &'static str = "bool";

    fn to_f64(self) -> f64 {
        if self {
            1.0
        } else {
            0.0
        }
    }

    fn from_f64(value: f64) -> Self {
        value != 0.0 && !value.is_nan()
    }

    fn is_float() -> bool {
        false
    }

    fn is_nonzero(&self) -> bool {
        *self
    }
}
