//! Axis intensity profiles and value histograms

use ndarray::Axis;
use serde::{Deserialize, Serialize};

use medvis_core::{Error, Result, Volume, VoxelElement};

/// Mean intensity along each axis, averaging over the other two
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisProfiles {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub z: Vec<f64>,
}

/// Mean intensity per plane along x, y and z
pub fn axis_profiles<T: VoxelElement>(field: &Volume<T>) -> AxisProfiles {
    let data = field.data().mapv(VoxelElement::to_f64);
    let along = |keep: usize| -> Vec<f64> {
        data.axis_iter(Axis(keep))
            .map(|plane| plane.sum() / plane.len() as f64)
            .collect()
    };
    AxisProfiles {
        x: along(0),
        y: along(1),
        z: along(2),
    }
}

/// Fixed-width histogram
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    /// `bins + 1` ascending bin edges
    pub edges: Vec<f64>,
    /// Voxel count per bin
    pub counts: Vec<usize>,
}

/// Histogram of voxel values over `[min, max]` with `bins` equal bins.
///
/// Every bin is half-open except the last, which includes `max`. A
/// constant field uses the range `[v - 0.5, v + 0.5]`.
pub fn histogram<T: VoxelElement>(field: &Volume<T>, bins: usize) -> Result<Histogram> {
    if bins == 0 {
        return Err(Error::invalid_parameter("bins", bins, "must be at least 1"));
    }
    if field.has_non_finite() {
        return Err(Error::InvalidInput(
            "cannot histogram NaN or infinite values".into(),
        ));
    }
    let (mut lo, mut hi) = field.value_range();
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }
    let width = (hi - lo) / bins as f64;
    let edges: Vec<f64> = (0..=bins).map(|i| lo + width * i as f64).collect();

    let mut counts = vec![0usize; bins];
    for v in field.values() {
        let bin = (((v.to_f64() - lo) / width) as usize).min(bins - 1);
        counts[bin] += 1;
    }
    Ok(Histogram { edges, counts })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_profiles() {
        let field = Volume::from_fn((3, 4, 5), |x, y, _| (x * 10 + y) as f64).unwrap();
        let p = axis_profiles(&field);
        assert_eq!(p.x.len(), 3);
        assert_eq!(p.y.len(), 4);
        assert_eq!(p.z.len(), 5);
        assert_relative_eq!(p.x[2], 21.5);
        assert_relative_eq!(p.y[0], 10.0);
        // constant along z
        for v in &p.z {
            assert_relative_eq!(*v, 11.5);
        }
    }

    #[test]
    fn test_histogram() {
        let field = Volume::from_vec(vec![0.0, 1.0, 2.0, 3.0, 4.0], (5, 1, 1)).unwrap();
        let h = histogram(&field, 4).unwrap();
        assert_eq!(h.edges, vec![0.0, 1.0, 2.0, 3.0, 4.0]);
        // the maximum falls in the last bin
        assert_eq!(h.counts, vec![1, 1, 1, 2]);
        assert_eq!(h.counts.iter().sum::<usize>(), 5);
    }

    #[test]
    fn test_histogram_constant_field() {
        let field = Volume::filled((2, 2, 2), 3.0).unwrap();
        let h = histogram(&field, 2).unwrap();
        assert_eq!(h.edges, vec![2.5, 3.0, 3.5]);
        assert_eq!(h.counts, vec![0, 8]);
    }

    #[test]
    fn test_histogram_zero_bins() {
        let field = Volume::filled((2, 2, 2), 3.0).unwrap();
        assert!(histogram(&field, 0).is_err());
    }
}
