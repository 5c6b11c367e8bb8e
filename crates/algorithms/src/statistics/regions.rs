//! Per-region intensity statistics
//!
//! Computes intensity statistics for each region of a label volume.
//! Label 0 is background and is skipped.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use medvis_core::{Error, LabelVolume, Result, Volume};

use super::quantile::percentile_of_sorted;

/// Intensity statistics of one labeled region
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionStats {
    pub label: i32,
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
    pub median: f64,
    /// Unweighted centroid in voxel coordinates
    pub centroid: [f64; 3],
}

/// Statistics of `field` within every region of `labels`, keyed by label.
///
/// # Errors
/// - `ShapeMismatch` if the two volumes differ in shape
/// - `InvalidInput` if a labeled voxel holds NaN or infinity
pub fn region_statistics(field: &Volume<f64>, labels: &LabelVolume) -> Result<BTreeMap<i32, RegionStats>> {
    if field.shape() != labels.shape() {
        return Err(Error::ShapeMismatch {
            expected: field.shape(),
            actual: labels.shape(),
        });
    }

    // Collect values and coordinate sums per region
    let mut regions: BTreeMap<i32, (Vec<f64>, [f64; 3])> = BTreeMap::new();
    for (((x, y, z), &label), &v) in labels.data().indexed_iter().zip(field.data().iter()) {
        if label == 0 {
            continue;
        }
        if !v.is_finite() {
            return Err(Error::InvalidInput(format!(
                "voxel ({}, {}, {}) of region {} is not finite",
                x, y, z, label
            )));
        }
        let entry = regions.entry(label).or_default();
        entry.0.push(v);
        entry.1[0] += x as f64;
        entry.1[1] += y as f64;
        entry.1[2] += z as f64;
    }

    let mut results = BTreeMap::new();
    for (label, (mut vals, coord_sum)) in regions {
        let count = vals.len();
        let n = count as f64;
        let mean = vals.iter().sum::<f64>() / n;
        let var = vals.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;

        vals.sort_unstable_by(f64::total_cmp);

        results.insert(
            label,
            RegionStats {
                label,
                count,
                mean,
                std: var.sqrt(),
                min: vals[0],
                max: vals[count - 1],
                median: percentile_of_sorted(&vals, 50.0),
                centroid: coord_sum.map(|s| s / n),
            },
        );
    }

    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_two_regions() {
        let field = Volume::from_vec(vec![1.0, 2.0, 3.0, 10.0, 20.0, 30.0, 99.0, 99.0], (8, 1, 1)).unwrap();
        let labels = Volume::from_vec(vec![1, 1, 1, 2, 2, 2, 0, 0], (8, 1, 1)).unwrap();
        let stats = region_statistics(&field, &labels).unwrap();
        assert_eq!(stats.len(), 2);

        let r1 = &stats[&1];
        assert_eq!(r1.count, 3);
        assert_relative_eq!(r1.mean, 2.0);
        assert_relative_eq!(r1.median, 2.0);
        assert_relative_eq!(r1.centroid[0], 1.0);

        let r2 = &stats[&2];
        assert_relative_eq!(r2.mean, 20.0);
        assert_relative_eq!(r2.min, 10.0);
        assert_relative_eq!(r2.max, 30.0);
        assert_relative_eq!(r2.centroid[0], 4.0);
    }

    #[test]
    fn test_background_ignored() {
        let field = Volume::filled((2, 2, 2), 5.0).unwrap();
        let labels = Volume::filled((2, 2, 2), 0).unwrap();
        assert!(region_statistics(&field, &labels).unwrap().is_empty());
    }

    #[test]
    fn test_shape_mismatch() {
        let field = Volume::filled((2, 2, 2), 5.0).unwrap();
        let labels = Volume::filled((2, 2, 3), 1).unwrap();
        assert!(matches!(
            region_statistics(&field, &labels),
            Err(Error::ShapeMismatch { .. })
        ));
    }
}
