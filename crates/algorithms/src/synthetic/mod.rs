//! Synthetic test data
//!
//! Phantoms built from additive spheres and multi-tone signals, each with
//! optional Gaussian noise from a seeded generator so that results are
//! reproducible.

use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

use medvis_core::{Error, Recording, Result, Shape, Signal, Volume};

/// A solid sphere added on top of the background
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sphere {
    pub center: [f64; 3],
    pub radius: f64,
    /// Added to every voxel strictly closer than `radius` to `center`
    pub value: f64,
}

impl Sphere {
    pub fn new(center: [f64; 3], radius: f64, value: f64) -> Self {
        Self { center, radius, value }
    }

    pub fn contains(&self, x: usize, y: usize, z: usize) -> bool {
        let d2: f64 = [x, y, z]
            .iter()
            .zip(&self.center)
            .map(|(&p, c)| (p as f64 - c).powi(2))
            .sum();
        d2 < self.radius * self.radius
    }
}

/// Parameters for [`phantom`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhantomParams {
    pub shape: Shape,
    pub background: f64,
    pub spheres: Vec<Sphere>,
    /// Standard deviation of additive Gaussian noise; 0 disables noise
    pub noise_std: f64,
    /// Clamp the result into `[lo, hi]` after adding noise
    pub clip: Option<(f64, f64)>,
    pub seed: u64,
}

impl Default for PhantomParams {
    /// A brain-like 64^3 phantom: a large sphere with three brighter
    /// inclusions and mild noise, clipped to 8-bit range
    fn default() -> Self {
        Self {
            shape: (64, 64, 64),
            background: 0.0,
            spheres: vec![
                Sphere::new([32.0, 32.0, 32.0], 25.0, 100.0),
                Sphere::new([25.0, 30.0, 30.0], 8.0, 150.0),
                Sphere::new([40.0, 35.0, 25.0], 6.0, 180.0),
                Sphere::new([30.0, 20.0, 40.0], 5.0, 200.0),
            ],
            noise_std: 5.0,
            clip: Some((0.0, 255.0)),
            seed: 42,
        }
    }
}

/// Render the phantom described by `params`
pub fn phantom(params: &PhantomParams) -> Result<Volume<f64>> {
    if let Some((lo, hi)) = params.clip {
        if lo.is_nan() || hi.is_nan() || lo > hi {
            return Err(Error::invalid_parameter(
                "clip",
                format!("({}, {})", lo, hi),
                "lower bound must not exceed upper bound",
            ));
        }
    }
    let clean = Volume::from_fn(params.shape, |x, y, z| {
        params
            .spheres
            .iter()
            .filter(|s| s.contains(x, y, z))
            .fold(params.background, |v, s| v + s.value)
    })?;

    let mut data = clean.into_array();
    if let Some((mut rng, dist)) = noise_source(params.noise_std, params.seed)? {
        for v in data.iter_mut() {
            *v += dist.sample(&mut rng);
        }
    }
    if let Some((lo, hi)) = params.clip {
        data.mapv_inplace(|v| v.clamp(lo, hi));
    }
    Volume::from_array(data)
}

/// A single sphere of `inside` on a constant `outside` background
pub fn sphere_volume(shape: Shape, center: [f64; 3], radius: f64, inside: f64, outside: f64) -> Result<Volume<f64>> {
    let sphere = Sphere::new(center, radius, inside - outside);
    Volume::from_fn(shape, |x, y, z| if sphere.contains(x, y, z) { inside } else { outside })
}

/// One sinusoidal component of a synthetic signal
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tone {
    /// Hz
    pub frequency: f64,
    pub amplitude: f64,
}

impl Tone {
    pub fn new(frequency: f64, amplitude: f64) -> Self {
        Self { frequency, amplitude }
    }
}

/// Parameters for [`multi_tone`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToneParams {
    pub channel: String,
    /// Hz
    pub sampling_rate: f64,
    /// Seconds; the signal has `round(duration * sampling_rate)` samples
    pub duration: f64,
    pub tones: Vec<Tone>,
    pub noise_std: f64,
    pub seed: u64,
}

impl Default for ToneParams {
    /// Ten seconds of alpha (10 Hz) plus beta (20 Hz) activity at 256 Hz
    fn default() -> Self {
        Self {
            channel: "Cz".to_string(),
            sampling_rate: 256.0,
            duration: 10.0,
            tones: vec![Tone::new(10.0, 10.0), Tone::new(20.0, 5.0)],
            noise_std: 0.0,
            seed: 42,
        }
    }
}

/// Sum of sines sampled at `t = i / sampling_rate`, plus optional noise
pub fn multi_tone(params: &ToneParams) -> Result<Signal> {
    if !(params.duration.is_finite() && params.duration > 0.0) {
        return Err(Error::invalid_parameter("duration", params.duration, "must be > 0 s"));
    }
    if !(params.sampling_rate.is_finite() && params.sampling_rate > 0.0) {
        return Err(Error::invalid_parameter(
            "sampling_rate",
            params.sampling_rate,
            "must be a finite value > 0 Hz",
        ));
    }
    let n = (params.duration * params.sampling_rate).round() as usize;
    let mut samples: Vec<f64> = (0..n)
        .map(|i| {
            let t = i as f64 / params.sampling_rate;
            params
                .tones
                .iter()
                .map(|tone| tone.amplitude * (2.0 * PI * tone.frequency * t).sin())
                .sum()
        })
        .collect();

    if let Some((mut rng, dist)) = noise_source(params.noise_std, params.seed)? {
        for v in samples.iter_mut() {
            *v += dist.sample(&mut rng);
        }
    }
    Signal::new(samples, params.sampling_rate, params.channel.clone())
}

/// A recording with one multi-tone channel per entry of `channels`.
///
/// Every channel shares the timing and tones of `base`; channel `i` uses
/// noise seed `base.seed + i`.
pub fn multi_tone_recording(channels: &[&str], base: &ToneParams) -> Result<Recording> {
    let signals = channels
        .iter()
        .enumerate()
        .map(|(i, name)| {
            multi_tone(&ToneParams {
                channel: name.to_string(),
                seed: base.seed.wrapping_add(i as u64),
                ..base.clone()
            })
        })
        .collect::<Result<Vec<_>>>()?;
    Recording::new(signals)
}

fn noise_source(std: f64, seed: u64) -> Result<Option<(StdRng, Normal<f64>)>> {
    if !(std.is_finite() && std >= 0.0) {
        return Err(Error::invalid_parameter("noise_std", std, "must be a finite value >= 0"));
    }
    if std == 0.0 {
        return Ok(None);
    }
    let dist = Normal::new(0.0, std)
        .map_err(|e| Error::invalid_parameter("noise_std", std, e.to_string()))?;
    Ok(Some((StdRng::seed_from_u64(seed), dist)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_sphere_volume() {
        let v = sphere_volume((9, 9, 9), [4.0, 4.0, 4.0], 2.0, 10.0, 1.0).unwrap();
        assert_eq!(v.get(4, 4, 4).unwrap(), 10.0);
        assert_eq!(v.get(5, 5, 4).unwrap(), 10.0);
        // on the radius: outside
        assert_eq!(v.get(6, 4, 4).unwrap(), 1.0);
        assert_eq!(v.get(0, 0, 0).unwrap(), 1.0);
    }

    #[test]
    fn test_phantom_spheres_add() {
        let params = PhantomParams {
            shape: (10, 10, 10),
            background: 1.0,
            spheres: vec![
                Sphere::new([5.0, 5.0, 5.0], 4.0, 10.0),
                Sphere::new([5.0, 5.0, 5.0], 2.0, 5.0),
            ],
            noise_std: 0.0,
            clip: None,
            seed: 0,
        };
        let v = phantom(&params).unwrap();
        assert_eq!(v.get(5, 5, 5).unwrap(), 16.0);
        assert_eq!(v.get(5, 5, 8).unwrap(), 11.0);
        assert_eq!(v.get(0, 0, 0).unwrap(), 1.0);
    }

    #[test]
    fn test_phantom_noise_is_seeded() {
        let params = PhantomParams {
            shape: (8, 8, 8),
            ..PhantomParams::default()
        };
        let a = phantom(&params).unwrap();
        let b = phantom(&params).unwrap();
        assert_eq!(a, b);

        let c = phantom(&PhantomParams { seed: 7, ..params }).unwrap();
        assert_ne!(a, c);
        assert!(c.values().all(|v| (0.0..=255.0).contains(&v)));
    }

    #[test]
    fn test_multi_tone_samples() {
        let signal = multi_tone(&ToneParams {
            duration: 1.0,
            sampling_rate: 8.0,
            tones: vec![Tone::new(2.0, 3.0)],
            ..ToneParams::default()
        })
        .unwrap();
        assert_eq!(signal.len(), 8);
        // t = 1/8 puts a 2 Hz sine at its crest
        assert_relative_eq!(signal.samples()[1], 3.0, epsilon = 1e-12);
        assert_relative_eq!(signal.samples()[2], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_recording_channels_differ_in_noise() {
        let base = ToneParams {
            duration: 1.0,
            noise_std: 1.0,
            ..ToneParams::default()
        };
        let rec = multi_tone_recording(&["O1", "O2"], &base).unwrap();
        assert_eq!(rec.len(), 2);
        assert_ne!(rec.channels()[0].samples(), rec.channels()[1].samples());
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(multi_tone(&ToneParams {
            duration: 0.0,
            ..ToneParams::default()
        })
        .is_err());
        assert!(multi_tone(&ToneParams {
            noise_std: -1.0,
            ..ToneParams::default()
        })
        .is_err());
    }
}
