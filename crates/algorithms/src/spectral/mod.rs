//! Spectral analysis of physiological signals
//!
//! - [`estimate_psd`]: Welch power spectral density with peak detection
//! - [`classify`]: power in the delta, theta, alpha, beta and gamma bands
//! - [`analyze_channel`] / [`analyze_recording`]: summary, spectrum and
//!   bands per channel

mod rhythm;
mod summary;
mod welch;
mod window;

pub use rhythm::{classify, dominant_rhythm, Rhythm, RhythmBand};
pub use summary::SignalSummary;
pub use welch::{estimate_psd, find_peaks, EstimatePsd, Peak, Spectrum, WelchParams};
pub use window::WindowKind;

use serde::Serialize;

use medvis_core::{Algorithm, Error, Recording, Result, Signal};

use crate::maybe_rayon::*;

/// Full analysis of one channel
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChannelAnalysis {
    pub summary: SignalSummary,
    pub spectrum: Spectrum,
    pub bands: Vec<RhythmBand>,
}

impl ChannelAnalysis {
    pub fn channel(&self) -> &str {
        &self.summary.channel
    }

    /// The band holding the most power
    pub fn dominant_rhythm(&self) -> Option<&RhythmBand> {
        dominant_rhythm(&self.bands)
    }
}

/// Rhythm classification algorithm: signal in, bands out
#[derive(Debug, Clone, Default)]
pub struct ClassifyRhythms;

impl Algorithm for ClassifyRhythms {
    type Input = Signal;
    type Output = Vec<RhythmBand>;
    type Params = WelchParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "ClassifyRhythms"
    }

    fn description(&self) -> &'static str {
        "Band power of the classical EEG rhythms from a Welch spectrum"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        Ok(classify(&estimate_psd(&input, &params)?))
    }
}

/// Summarize, estimate the spectrum of, and classify one channel
pub fn analyze_channel(signal: &Signal, params: &WelchParams) -> Result<ChannelAnalysis> {
    let spectrum = estimate_psd(signal, params)?;
    let bands = classify(&spectrum);
    tracing::debug!(
        channel = signal.channel(),
        peaks = spectrum.peaks().len(),
        dominant = dominant_rhythm(&bands).map(|b| b.rhythm.name()),
        "channel analyzed"
    );
    Ok(ChannelAnalysis {
        summary: SignalSummary::of(signal),
        spectrum,
        bands,
    })
}

/// [`analyze_channel`] for every channel, in channel order.
///
/// Channels are processed in parallel; the first failure is returned.
pub fn analyze_recording(recording: &Recording, params: &WelchParams) -> Result<Vec<ChannelAnalysis>> {
    recording
        .channels()
        .par_iter()
        .map(|signal| analyze_channel(signal, params))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn sine(freq: f64, channel: &str) -> Signal {
        let samples = (0..2048).map(|i| (2.0 * PI * freq * i as f64 / 256.0).sin()).collect();
        Signal::new(samples, 256.0, channel).unwrap()
    }

    #[test]
    fn test_analyze_recording_keeps_channel_order() {
        let rec = Recording::new(vec![sine(6.0, "F3"), sine(10.0, "O1"), sine(20.0, "C4")]).unwrap();
        let results = analyze_recording(&rec, &WelchParams::default()).unwrap();
        let names: Vec<&str> = results.iter().map(ChannelAnalysis::channel).collect();
        assert_eq!(names, vec!["F3", "O1", "C4"]);

        let dominant: Vec<Rhythm> = results
            .iter()
            .map(|r| r.dominant_rhythm().unwrap().rhythm)
            .collect();
        assert_eq!(dominant, vec![Rhythm::Theta, Rhythm::Alpha, Rhythm::Beta]);
    }

    #[test]
    fn test_analyze_recording_propagates_errors() {
        let short = Signal::new(vec![0.0; 100], 256.0, "Pz").unwrap();
        let rec = Recording::new(vec![sine(10.0, "O1"), short]).unwrap();
        assert!(matches!(
            analyze_recording(&rec, &WelchParams::default()),
            Err(Error::InsufficientSamples { .. })
        ));
    }

    #[test]
    fn test_classify_rhythms_algorithm() {
        let bands = ClassifyRhythms.execute_default(sine(10.0, "O2")).unwrap();
        assert_eq!(bands.len(), 5);
        assert_eq!(dominant_rhythm(&bands).unwrap().rhythm, Rhythm::Alpha);
    }
}
