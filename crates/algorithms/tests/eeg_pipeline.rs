//! End-to-end checks of spectral analysis on synthetic recordings.

use approx::assert_relative_eq;
use medvis_algorithms::spectral::{
    analyze_recording, classify, dominant_rhythm, estimate_psd, Rhythm, RhythmBand, Spectrum, WelchParams,
};
use medvis_algorithms::synthetic::{multi_tone, multi_tone_recording, Tone, ToneParams};
use medvis_core::Error;

fn band(bands: &[RhythmBand], rhythm: Rhythm) -> &RhythmBand {
    bands.iter().find(|b| b.rhythm == rhythm).unwrap()
}

#[test]
fn alpha_and_beta_tones() {
    // 10 s at 256 Hz: 10 Hz at 10 uV plus 20 Hz at 5 uV
    let signal = multi_tone(&ToneParams::default()).unwrap();
    assert_eq!(signal.len(), 2560);

    let spectrum = estimate_psd(&signal, &WelchParams::default()).unwrap();
    assert_relative_eq!(spectrum.resolution().unwrap(), 0.25);
    assert_relative_eq!(*spectrum.frequencies().last().unwrap(), 128.0);

    let bands = classify(&spectrum);
    let alpha = band(&bands, Rhythm::Alpha);
    let beta = band(&bands, Rhythm::Beta);
    let theta = band(&bands, Rhythm::Theta);

    assert!(
        theta.power < 1e-6 * alpha.power,
        "theta {} should be negligible next to alpha {}",
        theta.power,
        alpha.power
    );
    for other in bands.iter().filter(|b| b.rhythm != Rhythm::Alpha) {
        assert!(alpha.power > other.power, "alpha should dominate {}", other.rhythm);
    }
    assert_eq!(dominant_rhythm(&bands).unwrap().rhythm, Rhythm::Alpha);
    assert!((beta.peak_frequency - 20.0).abs() <= 1.0);
    assert_relative_eq!(alpha.peak_frequency, 10.0);

    // both tones are reported as peaks
    let peaks: Vec<f64> = spectrum.peaks().iter().map(|p| p.frequency).collect();
    assert_eq!(peaks, vec![10.0, 20.0]);
}

#[test]
fn pure_sinusoid_peak_within_one_bin() {
    for (freq, fs) in [(7.3, 128.0), (17.0, 256.0), (41.5, 500.0)] {
        let signal = multi_tone(&ToneParams {
            sampling_rate: fs,
            duration: 20.0,
            tones: vec![Tone::new(freq, 1.0)],
            ..ToneParams::default()
        })
        .unwrap();
        let spectrum = estimate_psd(&signal, &WelchParams::default()).unwrap();
        let bin = spectrum.resolution().unwrap();
        let dominant = spectrum.dominant().unwrap();
        assert!(
            (dominant.frequency - freq).abs() <= bin,
            "{} Hz tone peaked at {} Hz (bin {} Hz)",
            freq,
            dominant.frequency,
            bin
        );
    }
}

#[test]
fn flat_zero_spectrum_has_empty_bands() {
    let freqs: Vec<f64> = (0..=512).map(|k| k as f64 * 0.25).collect();
    let spectrum = Spectrum::new(freqs, vec![0.0; 513]).unwrap();
    let bands = classify(&spectrum);
    assert_eq!(bands.len(), 5);
    for b in &bands {
        assert_eq!(b.power, 0.0, "{} has power", b.rhythm);
        assert_eq!(b.peak_frequency, 0.0, "{} has a peak", b.rhythm);
    }
    assert!(dominant_rhythm(&bands).is_none());
}

#[test]
fn short_signal_is_rejected() {
    let signal = multi_tone(&ToneParams {
        duration: 2.0,
        ..ToneParams::default()
    })
    .unwrap();
    assert_eq!(
        estimate_psd(&signal, &WelchParams::default()).unwrap_err(),
        Error::InsufficientSamples {
            required: 1024,
            available: 512
        }
    );
}

#[test]
fn noisy_recording_keeps_alpha_dominant() {
    let base = ToneParams {
        tones: vec![Tone::new(10.0, 15.0), Tone::new(20.0, 8.0), Tone::new(6.0, 12.0)],
        noise_std: 3.0,
        ..ToneParams::default()
    };
    let recording = multi_tone_recording(&["Fp1", "Fp2", "O1", "O2"], &base).unwrap();
    let results = analyze_recording(&recording, &WelchParams::default()).unwrap();
    assert_eq!(results.len(), 4);
    for channel in &results {
        assert_eq!(channel.dominant_rhythm().unwrap().rhythm, Rhythm::Alpha, "{}", channel.channel());
        let total: f64 = channel.bands.iter().map(|b| b.relative_power).sum();
        assert_relative_eq!(total, 1.0, epsilon = 1e-9);
        assert_relative_eq!(channel.summary.duration, 2559.0 / 256.0);
    }
}

#[test]
fn tone_at_upper_gamma_edge_counts_as_gamma() {
    let signal = multi_tone(&ToneParams {
        tones: vec![Tone::new(100.0, 4.0)],
        ..ToneParams::default()
    })
    .unwrap();
    let spectrum = estimate_psd(&signal, &WelchParams::default()).unwrap();
    assert_relative_eq!(spectrum.dominant().unwrap().frequency, 100.0);

    let bands = classify(&spectrum);
    let gamma = band(&bands, Rhythm::Gamma);
    assert_relative_eq!(gamma.peak_frequency, 100.0);
    assert_eq!(dominant_rhythm(&bands).unwrap().rhythm, Rhythm::Gamma);
}
