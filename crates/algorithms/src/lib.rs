//! # medvis Algorithms
//!
//! Analysis engines for volumetric scans and physiological recordings.
//!
//! ## Available Algorithm Categories
//!
//! - **preprocess**: Min-max / z-score / robust normalization, Gaussian, median and bilateral filters
//! - **morphology**: Binary erosion, dilation, opening, closing
//! - **segmentation**: Threshold and seeded watershed segmentation, connected components
//! - **surface**: Isosurface extraction and surface area
//! - **statistics**: Volume statistics, ROI analysis, profiles, histograms, region statistics
//! - **spectral**: Welch PSD, peak detection, EEG rhythm bands
//! - **synthetic**: Sphere phantoms and multi-tone signals

pub mod morphology;
pub mod preprocess;
pub mod segmentation;
pub mod spectral;
pub mod statistics;
pub mod surface;
pub mod synthetic;

mod maybe_rayon;
pub(crate) mod voxelwise;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::morphology::{
        closing, dilate, erode, opening, threshold_mask, Closing, Dilate, Erode, MorphologyOp,
        Opening, StructuringElement,
    };
    pub use crate::preprocess::{
        apply_filter, bilateral_filter, gaussian_smooth, median_filter, normalize, Filter,
        FilterKind, NormalizationMethod, Normalize, PreprocessPipeline,
    };
    pub use crate::segmentation::{
        label_components, segment, threshold_segment, watershed, Connectivity, Segment,
        SegmentationMethod, Watershed, WatershedParams,
    };
    pub use crate::spectral::{
        analyze_channel, analyze_recording, classify, dominant_rhythm, estimate_psd, find_peaks,
        ChannelAnalysis, EstimatePsd, Rhythm, RhythmBand, Spectrum, WelchParams, WindowKind,
    };
    pub use crate::statistics::{
        analyze_roi, compute_stats, AnalyzeRoi, ComputeStats, RoiResult, VolumeStatistics,
    };
    pub use crate::surface::{extract_surface, surface_area, ExtractSurface, SurfaceMesh, SurfaceParams};
    pub use medvis_core::prelude::*;
}
