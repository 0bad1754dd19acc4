//! Onset strength envelope and the per-frame intensity signal.
//!
//! Onset strength is the mean positive spectral flux of a log-power mel
//! spectrogram. The envelope is computed once per render and normalized by
//! its maximum to give one intensity value in [0,1] per output frame.

use serde::{Deserialize, Serialize};

use super::fft::SpectrumAnalyzer;
use super::mel::MelFilterBank;

/// Fallback frame rate when the waveform has zero duration.
pub const DEFAULT_FPS: f64 = 30.0;

const AMIN: f32 = 1e-10;

/// Parameters of the onset strength computation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OnsetConfig {
    pub fft_size: usize,
    pub hop_length: usize,
    pub num_mels: usize,
    /// Distance in frames between the compared spectra.
    pub lag: usize,
    /// Dynamic range kept below the loudest bin, in dB.
    pub top_db: f32,
}

impl Default for OnsetConfig {
    fn default() -> Self {
        Self {
            fft_size: 2048,
            hop_length: 512,
            num_mels: 128,
            lag: 1,
            top_db: 80.0,
        }
    }
}

impl OnsetConfig {
    /// Check the parameters the STFT and filterbank require.
    pub fn validate(&self) -> Result<(), String> {
        if !self.fft_size.is_power_of_two() {
            return Err(format!("onset fft_size {} is not a power of 2", self.fft_size));
        }
        if self.hop_length == 0 {
            return Err("onset hop_length must be positive".to_string());
        }
        if self.num_mels == 0 {
            return Err("onset num_mels must be positive".to_string());
        }
        Ok(())
    }
}

/// Convert a power spectrogram to dB relative to its own peak, in place.
fn power_to_db(spectrogram: &mut [Vec<f32>], top_db: f32) {
    let peak = spectrogram
        .iter()
        .flatten()
        .copied()
        .fold(0.0f32, f32::max);
    let ref_db = 10.0 * peak.max(AMIN).log10();

    let mut max_db = f32::NEG_INFINITY;
    for value in spectrogram.iter_mut().flatten() {
        *value = 10.0 * value.max(AMIN).log10() - ref_db;
        max_db = max_db.max(*value);
    }

    let floor = max_db - top_db;
    for value in spectrogram.iter_mut().flatten() {
        *value = value.max(floor);
    }
}

/// Raw onset strength envelope of a mono waveform, one value per STFT frame.
pub fn onset_strength(samples: &[f32], sample_rate: u32, config: &OnsetConfig) -> Vec<f32> {
    if samples.is_empty() {
        return Vec::new();
    }

    let mut analyzer = SpectrumAnalyzer::new(config.fft_size);
    let bank = MelFilterBank::new(sample_rate, config.fft_size, config.num_mels);

    let mut mel: Vec<Vec<f32>> = analyzer
        .stft_power(samples, config.hop_length)
        .iter()
        .map(|power| bank.apply(power))
        .collect();
    power_to_db(&mut mel, config.top_db);

    let num_frames = mel.len();
    let lag = config.lag.max(1);
    let pad = lag + config.fft_size / (2 * config.hop_length);

    let mut envelope = vec![0.0f32; pad];
    envelope.extend((lag..num_frames).map(|t| {
        let flux: f32 = mel[t]
            .iter()
            .zip(&mel[t - lag])
            .map(|(cur, prev)| (cur - prev).max(0.0))
            .sum();
        flux / config.num_mels.max(1) as f32
    }));
    envelope.truncate(num_frames);
    envelope
}

/// Divide by the maximum. A zero (or negative) maximum leaves the values
/// untouched.
pub fn normalize_by_max(values: &[f32]) -> Vec<f32> {
    let max = values.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    if max > 0.0 {
        values.iter().map(|v| v / max).collect()
    } else {
        values.to_vec()
    }
}

/// Frames per second for `num_frames` spread over `duration` seconds.
pub fn frame_rate(num_frames: usize, duration: f64) -> f64 {
    if duration > 0.0 {
        num_frames as f64 / duration
    } else {
        DEFAULT_FPS
    }
}

/// Normalized per-frame intensity, immutable once computed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntensitySignal {
    values: Vec<f32>,
    fps: f64,
    duration: f64,
    raw_max: f32,
}

impl IntensitySignal {
    /// Analyze a mono waveform.
    pub fn analyze(samples: &[f32], sample_rate: u32, config: &OnsetConfig) -> Self {
        let raw = onset_strength(samples, sample_rate, config);
        let duration = if sample_rate == 0 {
            0.0
        } else {
            samples.len() as f64 / sample_rate as f64
        };
        Self::from_raw(raw, duration)
    }

    /// Build a signal from an already computed envelope.
    pub fn from_raw(raw: Vec<f32>, duration: f64) -> Self {
        let raw_max = raw.iter().copied().fold(0.0f32, f32::max);
        let values = normalize_by_max(&raw);
        let fps = frame_rate(values.len(), duration);
        Self {
            values,
            fps,
            duration,
            raw_max,
        }
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn fps(&self) -> f64 {
        self.fps
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Largest onset strength before normalization.
    pub fn raw_max(&self) -> f32 {
        self.raw_max
    }

    /// Intensity of a frame, wrapping around the signal length.
    pub fn at(&self, frame: usize) -> f32 {
        if self.values.is_empty() {
            return 0.0;
        }
        self.values[frame % self.values.len()]
    }
}
