//! Welch PSD: power spectral density via averaged periodograms
//!
//! The signal is cut into overlapping segments of `segment_length`
//! samples. Each segment is mean-detrended, windowed and transformed; the
//! squared magnitudes are averaged over segments and scaled to a one-sided
//! density in units^2/Hz:
//!
//! ```text
//! P[k] = c_k * mean_s |X_s[k]|^2 / (fs * sum(w^2))
//! ```
//!
//! with `c_k = 2` for every bin except DC and (for even lengths) Nyquist,
//! so the total power of a real signal is preserved. Bins are spaced
//! `fs / segment_length` apart, from 0 to `fs / 2`.

use rustfft::num_complex::Complex64;
use rustfft::FftPlanner;
use serde::{Deserialize, Serialize};

use medvis_core::{Algorithm, Error, Result, Signal};

use super::window::WindowKind;

/// Welch estimation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WelchParams {
    /// Samples per segment (DFT length)
    pub segment_length: usize,
    /// Fraction of a segment shared with the next one, in [0, 1)
    pub overlap: f64,
    /// Taper applied to each segment
    pub window: WindowKind,
    /// Remove each segment's mean before windowing
    pub detrend: bool,
    /// Peaks must exceed this fraction of the maximum power
    pub peak_fraction: f64,
}

impl Default for WelchParams {
    fn default() -> Self {
        Self {
            segment_length: 1024,
            overlap: 0.5,
            window: WindowKind::Hann,
            detrend: true,
            peak_fraction: 0.1,
        }
    }
}

/// A local maximum of a spectrum
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Peak {
    pub frequency: f64,
    pub power: f64,
}

/// One-sided power spectrum: ascending frequency bins with their power
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Spectrum {
    frequencies: Vec<f64>,
    power: Vec<f64>,
    peaks: Vec<Peak>,
}

impl Spectrum {
    /// Build a spectrum without peaks.
    ///
    /// Frequencies must be finite and strictly ascending; power must be
    /// finite and non-negative; both must have the same length.
    pub fn new(frequencies: Vec<f64>, power: Vec<f64>) -> Result<Self> {
        if frequencies.len() != power.len() {
            return Err(Error::InvalidInput(format!(
                "{} frequencies but {} power values",
                frequencies.len(),
                power.len()
            )));
        }
        if frequencies.iter().any(|f| !f.is_finite()) || frequencies.windows(2).any(|w| w[1] <= w[0]) {
            return Err(Error::InvalidInput(
                "frequencies must be finite and strictly ascending".into(),
            ));
        }
        if power.iter().any(|p| !(p.is_finite() && *p >= 0.0)) {
            return Err(Error::InvalidInput(
                "power values must be finite and non-negative".into(),
            ));
        }
        Ok(Self {
            frequencies,
            power,
            peaks: Vec::new(),
        })
    }

    /// Attach the peaks above `fraction` of the maximum power
    pub fn with_peaks(mut self, fraction: f64) -> Self {
        self.peaks = find_peaks(&self, fraction);
        self
    }

    pub fn frequencies(&self) -> &[f64] {
        &self.frequencies
    }

    pub fn power(&self) -> &[f64] {
        &self.power
    }

    /// Peaks in ascending frequency order
    pub fn peaks(&self) -> &[Peak] {
        &self.peaks
    }

    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }

    /// Bin spacing in Hz, `None` with fewer than two bins
    pub fn resolution(&self) -> Option<f64> {
        match self.frequencies.as_slice() {
            [a, b, ..] => Some(b - a),
            _ => None,
        }
    }

    /// `(frequency, power)` pairs in ascending frequency
    pub fn bins(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.frequencies.iter().copied().zip(self.power.iter().copied())
    }

    /// The bin of maximum power (lowest frequency on ties)
    pub fn dominant(&self) -> Option<Peak> {
        self.bins()
            .fold(None, |best: Option<Peak>, (frequency, power)| match best {
                Some(b) if b.power >= power => Some(b),
                _ => Some(Peak { frequency, power }),
            })
    }
}

/// Welch PSD algorithm
#[derive(Debug, Clone, Default)]
pub struct EstimatePsd;

impl Algorithm for EstimatePsd {
    type Input = Signal;
    type Output = Spectrum;
    type Params = WelchParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "EstimatePsd"
    }

    fn description(&self) -> &'static str {
        "Power spectral density by Welch's averaged periodogram"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        estimate_psd(&input, &params)
    }
}

/// Estimate the one-sided PSD of `signal` and detect its peaks.
///
/// # Errors
/// - `InvalidParameter` for a segment length below 2, an overlap outside
///   [0, 1) or a peak fraction outside [0, 1]
/// - `InsufficientSamples` if the signal is shorter than one segment
pub fn estimate_psd(signal: &Signal, params: &WelchParams) -> Result<Spectrum> {
    let n = params.segment_length;
    if n < 2 {
        return Err(Error::invalid_parameter("segment_length", n, "must be at least 2"));
    }
    if !(0.0..1.0).contains(&params.overlap) {
        return Err(Error::invalid_parameter("overlap", params.overlap, "must be in [0, 1)"));
    }
    if !(0.0..=1.0).contains(&params.peak_fraction) {
        return Err(Error::invalid_parameter(
            "peak_fraction",
            params.peak_fraction,
            "must be in [0, 1]",
        ));
    }
    let samples = signal.samples();
    if samples.len() < n {
        return Err(Error::InsufficientSamples {
            required: n,
            available: samples.len(),
        });
    }

    let fs = signal.sampling_rate();
    let overlap = (n as f64 * params.overlap).floor() as usize;
    let step = n - overlap;
    let num_segments = (samples.len() - n) / step + 1;

    let window = params.window.coefficients(n);
    let window_power: f64 = window.iter().map(|w| w * w).sum();
    if window_power == 0.0 {
        return Err(Error::degenerate("estimate_psd", "window has zero energy"));
    }

    let fft = FftPlanner::<f64>::new().plan_fft_forward(n);
    let bins = n / 2 + 1;
    let mut accum = vec![0.0f64; bins];
    let mut buffer = vec![Complex64::new(0.0, 0.0); n];

    for seg in 0..num_segments {
        let segment = &samples[seg * step..seg * step + n];
        let mean = if params.detrend {
            segment.iter().sum::<f64>() / n as f64
        } else {
            0.0
        };
        for ((b, &s), &w) in buffer.iter_mut().zip(segment).zip(&window) {
            *b = Complex64::new((s - mean) * w, 0.0);
        }
        fft.process(&mut buffer);
        for (acc, x) in accum.iter_mut().zip(&buffer) {
            *acc += x.norm_sqr();
        }
    }

    let scale = 1.0 / (fs * window_power * num_segments as f64);
    let nyquist = if n % 2 == 0 { Some(n / 2) } else { None };
    let power: Vec<f64> = accum
        .iter()
        .enumerate()
        .map(|(k, &p)| {
            let one_sided = if k == 0 || Some(k) == nyquist { 1.0 } else { 2.0 };
            p * scale * one_sided
        })
        .collect();
    let frequencies: Vec<f64> = (0..bins).map(|k| k as f64 * fs / n as f64).collect();

    tracing::debug!(
        channel = signal.channel(),
        segments = num_segments,
        segment_length = n,
        resolution_hz = fs / n as f64,
        "welch psd"
    );

    Ok(Spectrum::new(frequencies, power)?.with_peaks(params.peak_fraction))
}

/// Local maxima of the spectrum whose power exceeds
/// `height_fraction * max_power`.
///
/// A flat-topped maximum reports its middle bin (lower middle for even
/// plateaus). The first and last bins are never peaks.
pub fn find_peaks(spectrum: &Spectrum, height_fraction: f64) -> Vec<Peak> {
    let x = spectrum.power();
    let max_power = x.iter().copied().fold(0.0, f64::max);
    let floor = height_fraction * max_power;

    let mut peaks = Vec::new();
    if x.len() < 3 {
        return peaks;
    }
    let last = x.len() - 1;
    let mut i = 1;
    while i < last {
        if x[i - 1] < x[i] {
            let mut ahead = i + 1;
            while ahead < last && x[ahead] == x[i] {
                ahead += 1;
            }
            if x[ahead] < x[i] {
                let mid = (i + ahead - 1) / 2;
                if x[mid] > floor {
                    peaks.push(Peak {
                        frequency: spectrum.frequencies()[mid],
                        power: x[mid],
                    });
                }
                i = ahead;
            }
        }
        i += 1;
    }
    peaks
}
