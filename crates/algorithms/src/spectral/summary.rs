//! Time-domain summary of one channel

use serde::{Deserialize, Serialize};

use medvis_core::Signal;

/// Descriptive statistics of a signal's samples
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalSummary {
    pub channel: String,
    pub samples: usize,
    /// Hz
    pub sampling_rate: f64,
    /// Seconds between the first and last sample
    pub duration: f64,
    pub mean: f64,
    /// Population standard deviation
    pub std: f64,
    pub min: f64,
    pub max: f64,
    /// Root mean square, `sqrt(mean(x^2))`
    pub rms: f64,
    pub peak_to_peak: f64,
}

impl SignalSummary {
    pub fn of(signal: &Signal) -> Self {
        let x = signal.samples();
        let n = x.len() as f64;
        let mean = x.iter().sum::<f64>() / n;
        let var = x.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;
        let mean_square = x.iter().map(|v| v * v).sum::<f64>() / n;
        let (min, max) = x
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));

        Self {
            channel: signal.channel().to_string(),
            samples: x.len(),
            sampling_rate: signal.sampling_rate(),
            duration: signal.duration(),
            mean,
            std: var.sqrt(),
            min,
            max,
            rms: mean_square.sqrt(),
            peak_to_peak: max - min,
        }
    }
}
