//! End-to-end checks of the volume engines on synthetic phantoms.
//!
//! Each test builds its input with `medvis_algorithms::synthetic`, so no
//! fixtures are needed.

use approx::assert_relative_eq;
use medvis_algorithms::morphology::{closing, dilate, erode, opening, threshold_mask, StructuringElement};
use medvis_algorithms::preprocess::{gaussian_smooth, normalize, FilterKind, NormalizationMethod, PreprocessPipeline};
use medvis_algorithms::segmentation::{
    label_components, label_statistics, segment, Connectivity, SegmentationMethod, WatershedParams,
};
use medvis_algorithms::statistics::{analyze_roi, compute_stats, region_statistics};
use medvis_algorithms::surface::{extract_surface, surface_area, SurfaceParams};
use medvis_algorithms::synthetic::{phantom, sphere_volume, PhantomParams, Sphere};
use medvis_core::{Error, Mask, Volume};
use std::f64::consts::PI;

/// 64^3 field of 5.0 with a radius-10 sphere of 100.0 at the center
fn sphere_phantom() -> Volume<f64> {
    sphere_volume((64, 64, 64), [32.0, 32.0, 32.0], 10.0, 100.0, 5.0).unwrap()
}

// ---------------------------------------------------------------------------
// Segmentation
// ---------------------------------------------------------------------------

#[test]
fn threshold_recovers_single_sphere() {
    let field = sphere_phantom();
    let labels = segment(&field, &SegmentationMethod::Threshold { threshold: Some(50.0) }).unwrap();
    assert_eq!(labels.shape(), field.shape());

    let (components, count) = label_components(&labels.foreground(), Connectivity::Face).unwrap();
    assert_eq!(count, 1, "sphere should form one connected region");

    let stats = label_statistics(&components);
    assert_eq!(stats.len(), 1);
    let expected = 4.0 / 3.0 * PI * 1000.0;
    let voxels = stats[0].voxel_count as f64;
    assert!(
        (voxels - expected).abs() / expected < 0.1,
        "sphere has {} voxels, expected about {:.0}",
        voxels,
        expected
    );
}

#[test]
fn watershed_separates_two_spheres() {
    let params = PhantomParams {
        shape: (48, 24, 24),
        background: 0.0,
        spheres: vec![
            Sphere::new([12.0, 12.0, 12.0], 7.0, 100.0),
            Sphere::new([35.0, 12.0, 12.0], 7.0, 100.0),
        ],
        noise_std: 0.0,
        clip: None,
        seed: 0,
    };
    // smoothing turns each plateau into a single peak
    let field = PreprocessPipeline::new()
        .filter(FilterKind::Gaussian { sigma: 2.0 })
        .run(&phantom(&params).unwrap())
        .unwrap();

    let method = SegmentationMethod::Watershed(WatershedParams {
        min_distance: 5,
        threshold_abs: Some(50.0),
    });
    let labels = segment(&field, &method).unwrap();

    let left = labels.get(12, 12, 12).unwrap();
    let right = labels.get(35, 12, 12).unwrap();
    assert!(left >= 1 && right >= 1);
    assert_ne!(left, right, "each sphere should get its own basin");

    let regions = region_statistics(&field, &labels).unwrap();
    assert_eq!(regions.len(), 2);
    assert!(regions[&left].centroid[0] < regions[&right].centroid[0]);
}

#[test]
fn watershed_without_seeds_fails() {
    let field = Volume::filled((8, 8, 8), 1.0).unwrap();
    let method = SegmentationMethod::Watershed(WatershedParams {
        min_distance: 2,
        threshold_abs: Some(10.0),
    });
    assert!(matches!(segment(&field, &method), Err(Error::NoSeedsFound { .. })));
}

// ---------------------------------------------------------------------------
// Morphology
// ---------------------------------------------------------------------------

fn noisy_mask() -> Mask {
    let field = phantom(&PhantomParams {
        shape: (24, 24, 24),
        spheres: vec![Sphere::new([12.0, 12.0, 12.0], 8.0, 100.0)],
        noise_std: 40.0,
        clip: None,
        ..PhantomParams::default()
    })
    .unwrap();
    threshold_mask(&field, 50.0).unwrap()
}

#[test]
fn opening_is_anti_extensive_and_closing_is_extensive() {
    let mask = noisy_mask();
    for element in [StructuringElement::Cube(3), StructuringElement::Ball(1), StructuringElement::Cross(2)] {
        let opened = opening(&mask, &element).unwrap();
        let closed = closing(&mask, &element).unwrap();
        for ((&m, &o), &c) in mask.data().iter().zip(opened.data().iter()).zip(closed.data().iter()) {
            assert!(!o || m, "opening with {} added a voxel", element);
            assert!(!m || c, "closing with {} removed a voxel", element);
        }
    }
}

#[test]
fn erosion_within_dilation() {
    let mask = noisy_mask();
    let element = StructuringElement::Cube(3);
    let eroded = erode(&mask, &element).unwrap();
    let dilated = dilate(&mask, &element).unwrap();
    let eroded_count = eroded.values().filter(|&v| v).count();
    let mask_count = mask.values().filter(|&v| v).count();
    let dilated_count = dilated.values().filter(|&v| v).count();
    assert!(eroded_count <= mask_count && mask_count <= dilated_count);
}

// ---------------------------------------------------------------------------
// Surfaces, statistics, ROI
// ---------------------------------------------------------------------------

#[test]
fn smoothed_sphere_surface_area() {
    // a raw step edge gives a staircase surface; smoothing first brings the
    // isosurface close to the true sphere
    let field = gaussian_smooth(&sphere_phantom(), 1.5).unwrap();
    let mesh = extract_surface(&field, &SurfaceParams::default()).unwrap();
    assert!(!mesh.is_empty());
    let expected = 4.0 * PI * 100.0;
    let area = surface_area(&mesh);
    assert!(
        (area - expected).abs() / expected < 0.1,
        "area {:.1}, expected about {:.1}",
        area,
        expected
    );
}

#[test]
fn level_above_everything_gives_empty_mesh() {
    let field = Volume::from_fn((8, 8, 8), |x, _, _| x as f64).unwrap();
    let raw = SurfaceParams {
        isovalue: 100.0,
        normalize_first: false,
    };
    let mesh = extract_surface(&field, &raw).unwrap();
    assert!(mesh.is_empty());
    assert_eq!(surface_area(&mesh), 0.0);
}

#[test]
fn roi_at_boundary_is_clipped() {
    let field = sphere_phantom();
    let radius = 6;
    let roi = analyze_roi(&field, (63, 0, 32), radius).unwrap();
    let extent = roi.extent();
    assert_eq!(extent, [6, 6, 12]);
    assert!(extent.iter().product::<usize>() < (2 * radius).pow(3));
    assert_eq!(roi.stats.count, 6 * 6 * 12);
    assert_relative_eq!(roi.stats.mean, 5.0);
}

#[test]
fn roi_inside_sphere() {
    let field = sphere_phantom();
    let roi = analyze_roi(&field, (32, 32, 32), 3).unwrap();
    assert_eq!(roi.extent(), [6, 6, 6]);
    assert_relative_eq!(roi.stats.min, 100.0);
    assert_relative_eq!(roi.stats.std, 0.0);
}

#[test]
fn statistics_of_phantom() {
    let field = sphere_phantom();
    let stats = compute_stats(&field).unwrap();
    assert_eq!(stats.total_count, 64 * 64 * 64);
    assert_eq!(stats.nonzero_count, stats.total_count);
    assert_relative_eq!(stats.min, 5.0);
    assert_relative_eq!(stats.max, 100.0);

    let com = stats.center_of_mass.unwrap();
    for c in com {
        assert!((c - 31.5).abs() < 0.5, "center of mass {:?}", com);
    }
    // P90 is the background level, so the surface mask is the sphere
    assert!(stats.thresholded_surface_area > 0.0);
}

#[test]
fn normalization_of_constant_field_fails_for_every_method() {
    let field = Volume::filled((4, 4, 4), 7.0).unwrap();
    for method in [NormalizationMethod::MinMax, NormalizationMethod::ZScore, NormalizationMethod::Robust] {
        assert!(
            matches!(normalize(&field, method), Err(Error::DegenerateRange { .. })),
            "{} accepted a constant field",
            method
        );
    }
}

#[test]
fn pipeline_normalizes_then_filters() {
    let field = sphere_phantom();
    let out = PreprocessPipeline::new()
        .normalize(NormalizationMethod::MinMax)
        .filter(FilterKind::Median { size: 3 })
        .run(&field)
        .unwrap();
    assert_eq!(out.shape(), field.shape());
    let (lo, hi) = out.value_range();
    assert_relative_eq!(lo, 0.0);
    assert_relative_eq!(hi, 1.0);
}
