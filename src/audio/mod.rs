//! Audio loading and onset analysis.
//!
//! This module provides:
//! - Audio file loading via Symphonia (WAV, MP3, FLAC, AAC)
//! - Centered STFT power spectra via RustFFT
//! - Slaney mel filterbank
//! - Onset strength envelope and the normalized per-frame intensity signal

pub mod fft;
pub mod loader;
pub mod mel;
pub mod onset;
pub mod synth;

pub use fft::SpectrumAnalyzer;
pub use loader::{load_audio, AudioData, AudioError};
pub use mel::MelFilterBank;
pub use onset::{frame_rate, normalize_by_max, onset_strength, IntensitySignal, OnsetConfig};
