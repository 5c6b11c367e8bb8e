//! Classical EEG rhythm bands
//!
//! Band power is the sum of the PSD over the bins whose frequency lies in
//! `(low, high]`. Delta also takes its lower edge, so the five bands cover
//! `[0.5, 100]` Hz without gaps or overlap. Relative power divides by the sum
//! of all five bands.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use medvis_core::{Error, Result};

use super::welch::Spectrum;

/// Named EEG frequency band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rhythm {
    Delta,
    Theta,
    Alpha,
    Beta,
    Gamma,
}

impl Rhythm {
    /// All rhythms in ascending frequency
    pub const ALL: [Rhythm; 5] = [
        Rhythm::Delta,
        Rhythm::Theta,
        Rhythm::Alpha,
        Rhythm::Beta,
        Rhythm::Gamma,
    ];

    /// `(low, high)` edges in Hz
    pub fn range(&self) -> (f64, f64) {
        match self {
            Rhythm::Delta => (0.5, 4.0),
            Rhythm::Theta => (4.0, 8.0),
            Rhythm::Alpha => (8.0, 13.0),
            Rhythm::Beta => (13.0, 30.0),
            Rhythm::Gamma => (30.0, 100.0),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Rhythm::Delta => "delta",
            Rhythm::Theta => "theta",
            Rhythm::Alpha => "alpha",
            Rhythm::Beta => "beta",
            Rhythm::Gamma => "gamma",
        }
    }

    /// Edge bins belong to the lower band; delta includes 0.5 Hz
    pub fn contains(&self, frequency: f64) -> bool {
        let (low, high) = self.range();
        let above_low = match self {
            Rhythm::Delta => frequency >= low,
            _ => frequency > low,
        };
        above_low && frequency <= high
    }
}

impl fmt::Display for Rhythm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Rhythm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Rhythm::ALL
            .into_iter()
            .find(|r| r.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::UnsupportedMethod {
                kind: "rhythm",
                name: s.to_string(),
            })
    }
}

/// Power summary of one rhythm band
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RhythmBand {
    pub rhythm: Rhythm,
    pub low: f64,
    pub high: f64,
    /// Sum of the PSD over the bins in `(low, high]` (`[low, high]` for delta)
    pub power: f64,
    /// Frequency of the band's strongest bin; 0 when the band is empty or
    /// carries no power
    pub peak_frequency: f64,
    /// Fraction of the five-band total; 0 when that total is 0
    pub relative_power: f64,
}

/// Band powers of `spectrum` for the five rhythms, in ascending frequency
pub fn classify(spectrum: &Spectrum) -> Vec<RhythmBand> {
    let mut bands: Vec<RhythmBand> = Rhythm::ALL
        .into_iter()
        .map(|rhythm| {
            let (low, high) = rhythm.range();
            let mut power = 0.0;
            let mut peak = (0.0, 0.0);
            for (f, p) in spectrum.bins().filter(|&(f, _)| rhythm.contains(f)) {
                power += p;
                if p > peak.1 {
                    peak = (f, p);
                }
            }
            RhythmBand {
                rhythm,
                low,
                high,
                power,
                peak_frequency: peak.0,
                relative_power: 0.0,
            }
        })
        .collect();

    let total: f64 = bands.iter().map(|b| b.power).sum();
    if total > 0.0 {
        for band in &mut bands {
            band.relative_power = band.power / total;
        }
    }
    bands
}

/// The band holding the most power, `None` when every band is empty.
/// Ties go to the lower band.
pub fn dominant_rhythm(bands: &[RhythmBand]) -> Option<&RhythmBand> {
    bands
        .iter()
        .filter(|b| b.power > 0.0)
        .fold(None, |best: Option<&RhythmBand>, b| match best {
            Some(top) if top.power >= b.power => Some(top),
            _ => Some(b),
        })
}
