//! Volume smoothing filters
//!
//! - **Gaussian**: separable isotropic convolution, kernel truncated at 4 sigma
//! - **Median**: cubic window of odd side, removes impulse noise
//! - **Bilateral**: edge-preserving; weights combine spatial distance and
//!   intensity difference
//!
//! All three pad with the nearest edge voxel (replicate padding), so a
//! constant field is returned unchanged and no border band is lost.

use ndarray::Array3;
use medvis_core::{Error, Result, Volume};

use crate::voxelwise::{collect_voxels, replicate};

fn check_finite(field: &Volume<f64>, filter: &str) -> Result<()> {
    if field.has_non_finite() {
        return Err(Error::InvalidInput(format!(
            "{} filter requires finite voxel values",
            filter
        )));
    }
    Ok(())
}

/// `2 sigma^2` for a Gaussian weight, rejected when it under- or overflows
fn two_variance(name: &'static str, sigma: f64) -> Result<f64> {
    let two_sigma_sq = 2.0 * sigma * sigma;
    if !two_sigma_sq.is_normal() {
        return Err(Error::invalid_parameter(name, sigma, "too small or too large to weight voxels"));
    }
    Ok(two_sigma_sq)
}

/// Kernel radius `ceil(reach)`, at least `min` and at most `max`
fn clamped_radius(reach: f64, min: usize, max: usize) -> usize {
    (reach.ceil().min(max as f64) as usize).max(min.min(max))
}

/// Normalized 1-D Gaussian kernel of radius `ceil(4 sigma)`, capped at
/// `max_radius`
pub(crate) fn gaussian_kernel(sigma: f64, max_radius: usize) -> Result<Vec<f64>> {
    let two_sigma_sq = two_variance("sigma", sigma)?;
    let radius = clamped_radius(4.0 * sigma, 1, max_radius.max(1));
    let mut kernel: Vec<f64> = (0..=2 * radius)
        .map(|i| {
            let d = i as f64 - radius as f64;
            (-d * d / two_sigma_sq).exp()
        })
        .collect();
    let sum: f64 = kernel.iter().sum();
    for w in kernel.iter_mut() {
        *w /= sum;
    }
    Ok(kernel)
}

fn longest_axis(field: &Volume<f64>) -> usize {
    field.dims().into_iter().max().unwrap_or(1)
}

fn convolve_axis(data: &Array3<f64>, axis: usize, kernel: &[f64]) -> Result<Array3<f64>> {
    let shape = data.dim();
    let n = [shape.0, shape.1, shape.2][axis];
    let r = (kernel.len() / 2) as isize;
    collect_voxels(shape, |x, y, z| {
        let mut pos = [x, y, z];
        let center = pos[axis] as isize;
        let mut acc = 0.0;
        for (k, &w) in kernel.iter().enumerate() {
            pos[axis] = replicate(center + k as isize - r, n);
            acc += w * data[(pos[0], pos[1], pos[2])];
        }
        acc
    })
}

/// Isotropic Gaussian smoothing with standard deviation `sigma` (voxels).
///
/// Implemented as three 1-D passes. Borders use replicate padding. The
/// kernel radius never exceeds the longest axis.
pub fn gaussian_smooth(field: &Volume<f64>, sigma: f64) -> Result<Volume<f64>> {
    if !(sigma.is_finite() && sigma > 0.0) {
        return Err(Error::invalid_parameter("sigma", sigma, "must be > 0"));
    }
    check_finite(field, "gaussian")?;

    let kernel = gaussian_kernel(sigma, longest_axis(field))?;
    let mut data = field.data().clone();
    for axis in 0..3 {
        data = convolve_axis(&data, axis, &kernel)?;
    }
    field.derive(data)
}

/// Median over a cube of side `size` centred on each voxel.
///
/// `size` must be odd and at least 3. Borders use replicate padding.
pub fn median_filter(field: &Volume<f64>, size: usize) -> Result<Volume<f64>> {
    if size < 3 || size % 2 == 0 {
        return Err(Error::invalid_parameter(
            "size",
            size,
            "median window must be odd and >= 3",
        ));
    }
    check_finite(field, "median")?;

    let data = field.data();
    let dims = field.dims();
    let r = (size / 2) as isize;
    let out = collect_voxels(field.shape(), |x, y, z| {
        let mut window = Vec::with_capacity(size * size * size);
        for dx in -r..=r {
            let nx = replicate(x as isize + dx, dims[0]);
            for dy in -r..=r {
                let ny = replicate(y as isize + dy, dims[1]);
                for dz in -r..=r {
                    let nz = replicate(z as isize + dz, dims[2]);
                    window.push(data[(nx, ny, nz)]);
                }
            }
        }
        // odd window: the middle element is the median
        let mid = window.len() / 2;
        let (_, median, _) = window.select_nth_unstable_by(mid, f64::total_cmp);
        *median
    })?;
    field.derive(out)
}

/// Edge-preserving bilateral filter.
///
/// Each output voxel is a weighted mean over a cube of radius
/// `max(2, ceil(3 sigma_spatial))` (capped at the longest axis), with weights
/// `exp(-d^2 / 2 sigma_spatial^2) * exp(-dv^2 / 2 sigma_color^2)` where `d`
/// is the voxel distance and `dv` the intensity difference to the centre.
/// `sigma_color` is in the field's intensity units.
pub fn bilateral_filter(field: &Volume<f64>, sigma_color: f64, sigma_spatial: f64) -> Result<Volume<f64>> {
    if !(sigma_color.is_finite() && sigma_color > 0.0) {
        return Err(Error::invalid_parameter("sigma_color", sigma_color, "must be > 0"));
    }
    if !(sigma_spatial.is_finite() && sigma_spatial > 0.0) {
        return Err(Error::invalid_parameter("sigma_spatial", sigma_spatial, "must be > 0"));
    }
    check_finite(field, "bilateral")?;

    let two_ss = two_variance("sigma_spatial", sigma_spatial)?;
    let two_sc = two_variance("sigma_color", sigma_color)?;
    let radius = clamped_radius(3.0 * sigma_spatial, 2, longest_axis(field)) as isize;

    // Precompute spatial weights
    let mut spatial: Vec<((isize, isize, isize), f64)> = Vec::new();
    for dx in -radius..=radius {
        for dy in -radius..=radius {
            for dz in -radius..=radius {
                let dist_sq = (dx * dx + dy * dy + dz * dz) as f64;
                spatial.push(((dx, dy, dz), (-dist_sq / two_ss).exp()));
            }
        }
    }

    let data = field.data();
    let dims = field.dims();
    let out = collect_voxels(field.shape(), |x, y, z| {
        let v0 = data[(x, y, z)];
        let mut sum = 0.0;
        let mut wsum = 0.0;
        for &((dx, dy, dz), ws) in &spatial {
            let v = data[(
                replicate(x as isize + dx, dims[0]),
                replicate(y as isize + dy, dims[1]),
                replicate(z as isize + dz, dims[2]),
            )];
            let dv = v - v0;
            let w = ws * (-dv * dv / two_sc).exp();
            sum += w * v;
            wsum += w;
        }
        // the centre always contributes weight 1
        sum / wsum
    })?;
    field.derive(out)
}
