//! medvis CLI - volume and EEG analysis on synthetic data

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use medvis_algorithms::morphology::{threshold_mask, MorphologyOp, StructuringElement};
use medvis_algorithms::preprocess::{FilterKind, NormalizationMethod, PreprocessPipeline};
use medvis_algorithms::segmentation::{
    label_components, label_statistics, segment, Connectivity, SegmentationMethod, WatershedParams,
};
use medvis_algorithms::spectral::{analyze_recording, WelchParams, WindowKind};
use medvis_algorithms::statistics::{analyze_roi, axis_profiles, compute_stats, histogram, percentile};
use medvis_algorithms::surface::{extract_surface, surface_area, SurfaceParams};
use medvis_algorithms::synthetic::{multi_tone_recording, phantom, PhantomParams, Tone, ToneParams};
use medvis_core::{Mask, Volume};

#[derive(Parser)]
#[command(name = "medvis")]
#[command(author, version, about = "Quantitative analysis of scans and EEG recordings", long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Write the JSON report to this file instead of stdout
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a synthetic brain phantom
    Volume {
        #[command(flatten)]
        phantom: PhantomArgs,
        #[command(subcommand)]
        analysis: VolumeCommands,
    },
    /// Analyze a synthetic multi-channel EEG recording
    Eeg(EegArgs),
}

// ─── Volume ─────────────────────────────────────────────────────────────

#[derive(Args)]
struct PhantomArgs {
    /// Edge length of the cubic phantom in voxels
    #[arg(long, default_value = "64")]
    size: usize,
    /// Standard deviation of the added Gaussian noise
    #[arg(long, default_value = "5.0")]
    noise: f64,
    /// Noise seed
    #[arg(long, default_value = "42")]
    seed: u64,
    /// Normalize first: minmax, zscore, robust
    #[arg(long)]
    normalize: Option<NormalizationMethod>,
    /// Smooth first: gaussian, median, bilateral
    #[arg(long)]
    filter: Option<FilterKind>,
}

#[derive(Subcommand)]
enum VolumeCommands {
    /// Global statistics, profiles and histogram
    Stats {
        /// Histogram bins
        #[arg(long, default_value = "32")]
        bins: usize,
    },
    /// Threshold or watershed segmentation
    Segment {
        /// Method: threshold, watershed
        #[arg(short, long, default_value = "threshold")]
        method: SegmentationMethod,
        /// Threshold (threshold method) or seed floor (watershed); a percentile by default
        #[arg(short, long)]
        threshold: Option<f64>,
        /// Minimum seed separation in voxels (watershed)
        #[arg(long, default_value = "20")]
        min_distance: usize,
        /// Split the segmented foreground into connected components: face, full
        #[arg(long)]
        components: Option<Connectivity>,
    },
    /// Isosurface extraction
    Surface {
        /// Level in [0, 1] of the min-max normalized field
        #[arg(short, long, default_value = "0.5")]
        isovalue: f64,
        /// Use the isovalue on raw intensities
        #[arg(long)]
        raw: bool,
        /// Include vertices and faces in the report
        #[arg(long)]
        mesh: bool,
    },
    /// Region-of-interest statistics
    Roi {
        /// Center as x,y,z
        #[arg(short, long)]
        center: String,
        /// Half-width of the box in voxels
        #[arg(short, long, default_value = "10")]
        radius: usize,
    },
    /// Binary morphology on a thresholded mask
    Morphology {
        /// Operation: erode, dilate, opening, closing
        #[arg(short = 'p', long, default_value = "opening")]
        operation: MorphologyOp,
        /// Structuring element, e.g. cube:3, ball:2, cross:1
        #[arg(short, long, default_value = "cube:3")]
        element: StructuringElement,
        /// Mask threshold; the 90th percentile by default
        #[arg(short, long)]
        threshold: Option<f64>,
    },
}

// ─── EEG ────────────────────────────────────────────────────────────────

#[derive(Args)]
struct EegArgs {
    /// Comma-separated channel names
    #[arg(long, default_value = "Fp1,Fp2,C3,C4,O1,O2")]
    channels: String,
    /// Seconds of signal per channel
    #[arg(long, default_value = "10.0")]
    duration: f64,
    /// Sampling rate in Hz
    #[arg(long, default_value = "256.0")]
    sampling_rate: f64,
    /// Tones as freq:amplitude pairs, comma-separated
    #[arg(long, default_value = "10:10,20:5")]
    tones: String,
    /// Standard deviation of the added Gaussian noise
    #[arg(long, default_value = "2.0")]
    noise: f64,
    /// Noise seed of the first channel
    #[arg(long, default_value = "42")]
    seed: u64,
    /// Welch segment length in samples
    #[arg(long, default_value = "1024")]
    segment: usize,
    /// Welch segment overlap fraction
    #[arg(long, default_value = "0.5")]
    overlap: f64,
    /// Window: hann, hamming, blackman, rectangular
    #[arg(long, default_value = "hann")]
    window: WindowKind,
    /// Peak floor as a fraction of the maximum power
    #[arg(long, default_value = "0.1")]
    peak_fraction: f64,
}

// ─── Helpers ────────────────────────────────────────────────────────────

fn setup_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("warning: a tracing subscriber is already installed");
    }
}

fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

fn build_volume(args: &PhantomArgs) -> Result<Volume<f64>> {
    let pb = spinner("Generating phantom...");
    let scale = args.size as f64 / 64.0;
    let mut params = PhantomParams {
        shape: (args.size, args.size, args.size),
        noise_std: args.noise,
        seed: args.seed,
        ..PhantomParams::default()
    };
    for sphere in &mut params.spheres {
        sphere.center = sphere.center.map(|c| c * scale);
        sphere.radius *= scale;
    }
    let field = phantom(&params).context("Failed to generate phantom")?;

    let pipeline = PreprocessPipeline {
        normalization: args.normalize,
        filter: args.filter,
    };
    pb.set_message("Preprocessing...");
    let field = pipeline.run(&field).context("Preprocessing failed")?;
    pb.finish_and_clear();
    info!("Volume: {} x {} x {}", args.size, args.size, args.size);
    Ok(field)
}

fn parse_center(s: &str) -> Result<(usize, usize, usize)> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    if parts.len() != 3 {
        anyhow::bail!("Center must be 'x,y,z', got: {}", s);
    }
    let x = parts[0].parse().context("Invalid x")?;
    let y = parts[1].parse().context("Invalid y")?;
    let z = parts[2].parse().context("Invalid z")?;
    Ok((x, y, z))
}

fn parse_tones(s: &str) -> Result<Vec<Tone>> {
    s.split(',')
        .map(|pair| {
            let (freq, amp) = pair
                .trim()
                .split_once(':')
                .with_context(|| format!("Tone must be 'freq:amplitude', got: {}", pair))?;
            let frequency: f64 = freq.trim().parse().context("Invalid tone frequency")?;
            let amplitude: f64 = amp.trim().parse().context("Invalid tone amplitude")?;
            Ok(Tone::new(frequency, amplitude))
        })
        .collect()
}

fn emit<T: Serialize>(report: &T, output: Option<&PathBuf>) -> Result<()> {
    let json = serde_json::to_string_pretty(report).context("Failed to serialize report")?;
    match output {
        Some(path) => {
            std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Report saved to: {}", path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

// ─── Reports ────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct StatsReport {
    statistics: medvis_algorithms::statistics::VolumeStatistics,
    profiles: medvis_algorithms::statistics::AxisProfiles,
    histogram: medvis_algorithms::statistics::Histogram,
}

#[derive(Serialize)]
struct SegmentReport {
    method: String,
    labels: Vec<medvis_algorithms::segmentation::LabelStats>,
}

#[derive(Serialize)]
struct SurfaceReport {
    vertices: usize,
    faces: usize,
    area: f64,
    bounds: Option<([f64; 3], [f64; 3])>,
    #[serde(skip_serializing_if = "Option::is_none")]
    mesh: Option<medvis_algorithms::surface::SurfaceMesh>,
}

#[derive(Serialize)]
struct MorphologyReport {
    operation: String,
    element: String,
    threshold: f64,
    input_voxels: usize,
    output_voxels: usize,
}

// ─── Main ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);
    let output = cli.output.as_ref();

    match cli.command {
        Commands::Volume { phantom, analysis } => {
            let field = build_volume(&phantom)?;
            let start = Instant::now();

            match analysis {
                VolumeCommands::Stats { bins } => {
                    let pb = spinner("Computing statistics...");
                    let report = StatsReport {
                        statistics: compute_stats(&field).context("Statistics failed")?,
                        profiles: axis_profiles(&field),
                        histogram: histogram(&field, bins).context("Histogram failed")?,
                    };
                    pb.finish_and_clear();
                    emit(&report, output)?;
                }
                VolumeCommands::Segment {
                    method,
                    threshold,
                    min_distance,
                    components,
                } => {
                    let method = match method {
                        SegmentationMethod::Threshold { .. } => SegmentationMethod::Threshold { threshold },
                        SegmentationMethod::Watershed(_) => SegmentationMethod::Watershed(WatershedParams {
                            min_distance,
                            threshold_abs: threshold,
                        }),
                    };
                    let pb = spinner(&format!("Segmenting ({})...", method));
                    let mut labels = segment(&field, &method).context("Segmentation failed")?;
                    if let Some(connectivity) = components {
                        let (split, count) = label_components(&labels.foreground(), connectivity)?;
                        info!("{} connected components ({} connectivity)", count, connectivity);
                        labels = split;
                    }
                    pb.finish_and_clear();
                    emit(
                        &SegmentReport {
                            method: method.to_string(),
                            labels: label_statistics(&labels),
                        },
                        output,
                    )?;
                }
                VolumeCommands::Surface { isovalue, raw, mesh } => {
                    let pb = spinner("Extracting isosurface...");
                    let params = SurfaceParams {
                        isovalue,
                        normalize_first: !raw,
                    };
                    let surface = extract_surface(&field, &params).context("Surface extraction failed")?;
                    pb.finish_and_clear();
                    let report = SurfaceReport {
                        vertices: surface.vertex_count(),
                        faces: surface.face_count(),
                        area: surface_area(&surface),
                        bounds: surface.bounds(),
                        mesh: mesh.then_some(surface),
                    };
                    emit(&report, output)?;
                }
                VolumeCommands::Roi { center, radius } => {
                    let center = parse_center(&center)?;
                    let roi = analyze_roi(&field, center, radius).context("ROI analysis failed")?;
                    emit(&roi, output)?;
                }
                VolumeCommands::Morphology {
                    operation,
                    element,
                    threshold,
                } => {
                    let threshold = match threshold {
                        Some(t) => t,
                        None => percentile(&field, 90.0)?,
                    };
                    let mask = threshold_mask(&field, threshold)?;
                    let pb = spinner(&format!("Applying {} ({})...", operation, element));
                    let result = operation.apply(&mask, &element)?;
                    pb.finish_and_clear();
                    let count = |m: &Mask| m.values().filter(|&v| v).count();
                    emit(
                        &MorphologyReport {
                            operation: operation.to_string(),
                            element: element.to_string(),
                            threshold,
                            input_voxels: count(&mask),
                            output_voxels: count(&result),
                        },
                        output,
                    )?;
                }
            }
            info!("Processing time: {:.2?}", start.elapsed());
        }

        Commands::Eeg(args) => {
            let names: Vec<&str> = args.channels.split(',').map(str::trim).collect();
            let base = ToneParams {
                sampling_rate: args.sampling_rate,
                duration: args.duration,
                tones: parse_tones(&args.tones)?,
                noise_std: args.noise,
                seed: args.seed,
                ..ToneParams::default()
            };
            let recording = multi_tone_recording(&names, &base).context("Failed to generate recording")?;
            info!(
                "Recording: {} channels, {} s at {} Hz",
                recording.len(),
                args.duration,
                args.sampling_rate
            );

            let params = WelchParams {
                segment_length: args.segment,
                overlap: args.overlap,
                window: args.window,
                peak_fraction: args.peak_fraction,
                ..WelchParams::default()
            };
            let start = Instant::now();
            let pb = spinner("Estimating spectra...");
            let analyses = analyze_recording(&recording, &params).context("Spectral analysis failed")?;
            pb.finish_and_clear();
            for a in &analyses {
                if let Some(band) = a.dominant_rhythm() {
                    info!("{}: dominant {} ({:.1}% of band power)", a.channel(), band.rhythm, band.relative_power * 100.0);
                }
            }
            emit(&analyses, output)?;
            info!("Processing time: {:.2?}", start.elapsed());
        }
    }

    Ok(())
}
