//! Order statistics over voxel values
//!
//! Percentiles interpolate linearly between the two closest order
//! statistics: the p-th percentile of `n` sorted values sits at fractional
//! position `p / 100 * (n - 1)`.

use medvis_core::{Error, Result, Volume, VoxelElement};

/// All voxel values widened to f64 and sorted ascending.
///
/// Fails with `InvalidInput` if any voxel is NaN or infinite.
pub fn sorted_values<T: VoxelElement>(field: &Volume<T>) -> Result<Vec<f64>> {
    let mut values: Vec<f64> = field.values().map(VoxelElement::to_f64).collect();
    if values.iter().any(|v| !v.is_finite()) {
        return Err(Error::InvalidInput(
            "field contains NaN or infinite values".into(),
        ));
    }
    values.sort_unstable_by(f64::total_cmp);
    Ok(values)
}

/// Percentile `p` (0-100) of an ascending, non-empty slice
pub fn percentile_of_sorted(sorted: &[f64], p: f64) -> f64 {
    debug_assert!(!sorted.is_empty());
    let pos = p.clamp(0.0, 100.0) / 100.0 * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

fn check_percentile(p: f64) -> Result<()> {
    if !(0.0..=100.0).contains(&p) {
        return Err(Error::invalid_parameter(
            "percentile",
            p,
            "must be between 0 and 100",
        ));
    }
    Ok(())
}

/// Percentile `p` (0-100) of all voxel values
pub fn percentile<T: VoxelElement>(field: &Volume<T>, p: f64) -> Result<f64> {
    check_percentile(p)?;
    let sorted = sorted_values(field)?;
    Ok(percentile_of_sorted(&sorted, p))
}

/// Several percentiles from a single sort
pub fn percentiles<T: VoxelElement>(field: &Volume<T>, ps: &[f64]) -> Result<Vec<f64>> {
    for &p in ps {
        check_percentile(p)?;
    }
    let sorted = sorted_values(field)?;
    Ok(ps.iter().map(|&p| percentile_of_sorted(&sorted, p)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_percentile_interpolates() {
        // 1..=10
        let field = Volume::from_vec((1..=10).map(f64::from).collect(), (10, 1, 1)).unwrap();
        assert_relative_eq!(percentile(&field, 0.0).unwrap(), 1.0);
        assert_relative_eq!(percentile(&field, 100.0).unwrap(), 10.0);
        assert_relative_eq!(percentile(&field, 50.0).unwrap(), 5.5);
        assert_relative_eq!(percentile(&field, 90.0).unwrap(), 9.1, epsilon = 1e-12);
        assert_relative_eq!(percentile(&field, 25.0).unwrap(), 3.25, epsilon = 1e-12);
    }

    #[test]
    fn test_percentiles_batch_matches_single() {
        let field = Volume::from_fn((4, 5, 6), |x, y, z| ((x * 31 + y * 7 + z * 3) % 17) as f64).unwrap();
        let batch = percentiles(&field, &[25.0, 75.0]).unwrap();
        assert_relative_eq!(batch[0], percentile(&field, 25.0).unwrap());
        assert_relative_eq!(batch[1], percentile(&field, 75.0).unwrap());
    }

    #[test]
    fn test_percentile_rejects_bad_input() {
        let field = Volume::filled((2, 2, 2), 1.0_f64).unwrap();
        assert!(percentile(&field, 101.0).is_err());
        let nan = Volume::filled((2, 2, 2), f64::NAN).unwrap();
        assert!(matches!(percentile(&nan, 50.0), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn test_integer_volume() {
        let field = Volume::from_vec(vec![0u8, 10, 20, 30], (1, 2, 2)).unwrap();
        assert_relative_eq!(percentile(&field, 50.0).unwrap(), 15.0);
    }
}
