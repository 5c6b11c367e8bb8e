//! Scalar field to binary mask

use medvis_core::{Error, Mask, Result, Volume, VoxelElement};

/// Mask of voxels strictly greater than `threshold`
pub fn threshold_mask<T: VoxelElement>(field: &Volume<T>, threshold: f64) -> Result<Mask> {
    if threshold.is_nan() {
        return Err(Error::invalid_parameter("threshold", threshold, "must not be NaN"));
    }
    Ok(field.map(|v| v.to_f64() > threshold))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_is_strict() {
        let field = Volume::from_vec(vec![1.0, 2.0, 3.0], (3, 1, 1)).unwrap();
        let mask = threshold_mask(&field, 2.0).unwrap();
        assert_eq!(mask.values().collect::<Vec<_>>(), vec![false, false, true]);
    }

    #[test]
    fn test_threshold_nan_rejected() {
        let field = Volume::filled((2, 2, 2), 1.0).unwrap();
        assert!(threshold_mask(&field, f64::NAN).is_err());
    }
}
