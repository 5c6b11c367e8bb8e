//! Window functions for spectral estimation
//!
//! All windows are periodic (DFT-even): coefficient `i` of a length-`n`
//! window uses phase `2 pi i / n`, which is what Welch averaging expects.

use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use medvis_core::{Error, Result};

/// Taper applied to each segment before the DFT
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowKind {
    #[default]
    Hann,
    Hamming,
    Blackman,
    Rectangular,
}

impl WindowKind {
    pub fn name(&self) -> &'static str {
        match self {
            WindowKind::Hann => "hann",
            WindowKind::Hamming => "hamming",
            WindowKind::Blackman => "blackman",
            WindowKind::Rectangular => "rectangular",
        }
    }

    /// Coefficients of a periodic window of length `size`
    pub fn coefficients(&self, size: usize) -> Vec<f64> {
        (0..size)
            .map(|i| {
                let n = i as f64 / size as f64;
                match self {
                    WindowKind::Hann => 0.5 * (1.0 - (2.0 * PI * n).cos()),
                    WindowKind::Hamming => 0.54 - 0.46 * (2.0 * PI * n).cos(),
                    WindowKind::Blackman => 0.42 - 0.5 * (2.0 * PI * n).cos() + 0.08 * (4.0 * PI * n).cos(),
                    WindowKind::Rectangular => 1.0,
                }
            })
            .collect()
    }
}

impl fmt::Display for WindowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for WindowKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "hann" | "hanning" => Ok(WindowKind::Hann),
            "hamming" => Ok(WindowKind::Hamming),
            "blackman" => Ok(WindowKind::Blackman),
            "rectangular" | "boxcar" | "rect" => Ok(WindowKind::Rectangular),
            _ => Err(Error::UnsupportedMethod {
                kind: "window",
                name: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_hann_is_periodic() {
        let w = WindowKind::Hann.coefficients(8);
        assert_relative_eq!(w[0], 0.0);
        assert_relative_eq!(w[4], 1.0);
        // periodic: symmetric around n/2, not (n-1)/2
        assert_relative_eq!(w[1], w[7], epsilon = 1e-12);
        // mean of a periodic Hann window is exactly 1/2
        assert_relative_eq!(w.iter().sum::<f64>() / 8.0, 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_hamming_and_blackman_endpoints() {
        assert_relative_eq!(WindowKind::Hamming.coefficients(16)[0], 0.08, epsilon = 1e-12);
        assert_relative_eq!(WindowKind::Blackman.coefficients(16)[0], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_rectangular() {
        assert!(WindowKind::Rectangular.coefficients(5).iter().all(|&c| c == 1.0));
    }

    #[test]
    fn test_window_names() {
        assert_eq!("boxcar".parse::<WindowKind>().unwrap(), WindowKind::Rectangular);
        assert_eq!("HANN".parse::<WindowKind>().unwrap(), WindowKind::Hann);
        assert!(matches!(
            "kaiser".parse::<WindowKind>(),
            Err(Error::UnsupportedMethod { kind: "window", .. })
        ));
    }
}
