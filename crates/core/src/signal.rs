//! One-dimensional sampled signals

use serde::Serialize;

use crate::error::{Error, Result};

/// A single-channel recording: samples at a fixed rate.
///
/// Immutable once constructed. Samples must be finite and the sampling rate
/// strictly positive; time-window selection happens before construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Signal {
    samples: Vec<f64>,
    sampling_rate: f64,
    channel: String,
}

impl Signal {
    pub fn new(samples: Vec<f64>, sampling_rate: f64, channel: impl Into<String>) -> Result<Self> {
        if !(sampling_rate.is_finite() && sampling_rate > 0.0) {
            return Err(Error::invalid_parameter(
                "sampling_rate",
                sampling_rate,
                "must be a finite value > 0 Hz",
            ));
        }
        if samples.is_empty() {
            return Err(Error::InvalidInput("signal has no samples".into()));
        }
        if let Some(i) = samples.iter().position(|v| !v.is_finite()) {
            return Err(Error::InvalidInput(format!(
                "sample {} is not finite ({})",
                i, samples[i]
            )));
        }
        Ok(Self {
            samples,
            sampling_rate,
            channel: channel.into(),
        })
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    /// Sampling rate in Hz
    pub fn sampling_rate(&self) -> f64 {
        self.sampling_rate
    }

    pub fn channel(&self) -> &str {
        &self.channel
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always false: a signal has at least one sample
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Time between the first and last sample, in seconds
    pub fn duration(&self) -> f64 {
        (self.samples.len() - 1) as f64 / self.sampling_rate
    }
}

/// A set of channels recorded together, addressable by name or position
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Recording {
    channels: Vec<Signal>,
}

impl Recording {
    /// Channel names must be unique
    pub fn new(channels: Vec<Signal>) -> Result<Self> {
        for (i, a) in channels.iter().enumerate() {
            if channels[..i].iter().any(|b| b.channel() == a.channel()) {
                return Err(Error::InvalidInput(format!(
                    "duplicate channel name '{}'",
                    a.channel()
                )));
            }
        }
        Ok(Self { channels })
    }

    pub fn channels(&self) -> &[Signal] {
        &self.channels
    }

    pub fn channel_names(&self) -> impl Iterator<Item = &str> {
        self.channels.iter().map(Signal::channel)
    }

    /// Look a channel up by name
    pub fn channel(&self, name: &str) -> Option<&Signal> {
        self.channels.iter().find(|s| s.channel() == name)
    }

    /// Look a channel up by position
    pub fn channel_at(&self, index: usize) -> Option<&Signal> {
        self.channels.get(index)
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_signal_validation() {
        assert!(Signal::new(vec![0.0; 4], 0.0, "Fz").is_err());
        assert!(Signal::new(vec![0.0; 4], f64::NAN, "Fz").is_err());
        assert!(Signal::new(vec![], 256.0, "Fz").is_err());
        assert!(matches!(
            Signal::new(vec![0.0, f64::INFINITY], 256.0, "Fz"),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn test_signal_duration() {
        let s = Signal::new(vec![0.0; 257], 256.0, "Cz").unwrap();
        assert_relative_eq!(s.duration(), 1.0);
        assert_eq!(s.channel(), "Cz");
        assert_eq!(s.len(), 257);
    }

    #[test]
    fn test_recording_lookup() {
        let a = Signal::new(vec![1.0; 8], 128.0, "O1").unwrap();
        let b = Signal::new(vec![2.0; 8], 128.0, "O2").unwrap();
        let rec = Recording::new(vec![a, b.clone()]).unwrap();
        assert_eq!(rec.channel("O2"), Some(&b));
        assert_eq!(rec.channel_at(1), Some(&b));
        assert!(rec.channel("Pz").is_none());
        assert_eq!(rec.channel_names().collect::<Vec<_>>(), vec!["O1", "O2"]);
    }

    #[test]
    fn test_recording_rejects_duplicates() {
        let a = Signal::new(vec![1.0; 8], 128.0, "O1").unwrap();
        assert!(Recording::new(vec![a.clone(), a]).is_err());
    }
}
