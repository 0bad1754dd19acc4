//! Synthetic signals for tests and benchmarks.

use std::f32::consts::PI;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Sine wave of `duration` seconds.
pub fn generate_sine(frequency: f32, sample_rate: u32, duration: f32, amplitude: f32) -> Vec<f32> {
    let num_samples = (duration * sample_rate as f32) as usize;
    (0..num_samples)
        .map(|i| {
            let t = i as f32 / sample_rate as f32;
            amplitude * (2.0 * PI * frequency * t).sin()
        })
        .collect()
}

/// Reproducible white noise from a 64-bit LCG.
pub fn generate_white_noise(sample_rate: u32, duration: f32, amplitude: f32, seed: u64) -> Vec<f32> {
    let num_samples = (duration * sample_rate as f32) as usize;
    let mut state = seed;
    (0..num_samples)
        .map(|_| {
            state = state
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            amplitude * ((state >> 40) as f32 / (1u64 << 24) as f32 * 2.0 - 1.0)
        })
        .collect()
}

/// Sample offsets at which [`generate_click_track`] places its clicks.
pub fn click_positions(bpm: f32, sample_rate: u32, duration: f32) -> Vec<usize> {
    let num_samples = (duration * sample_rate as f32) as usize;
    let samples_per_beat = ((60.0 / bpm) * sample_rate as f32) as usize;
    if samples_per_beat == 0 {
        return Vec::new();
    }
    (0..num_samples).step_by(samples_per_beat).collect()
}

/// Metronome: 20ms decaying noise bursts over silence, one per beat.
pub fn generate_click_track(bpm: f32, sample_rate: u32, duration: f32) -> Vec<f32> {
    let num_samples = (duration * sample_rate as f32) as usize;
    let click_len = (sample_rate as f32 * 0.02) as usize;
    let noise = generate_white_noise(sample_rate, 0.02, 1.0, 7);

    let mut samples = vec![0.0; num_samples];
    for pos in click_positions(bpm, sample_rate, duration) {
        for i in 0..click_len.min(num_samples - pos).min(noise.len()) {
            let envelope = (1.0 - i as f32 / click_len as f32).powi(2);
            samples[pos + i] = 0.9 * envelope * noise[i];
        }
    }
    samples
}

/// Write mono samples as a 16-bit PCM WAV file.
pub fn write_wav(path: &Path, samples: &[f32], sample_rate: u32) -> std::io::Result<()> {
    let mut file = BufWriter::new(File::create(path)?);

    let data_size = samples.len() as u32 * 2;

    file.write_all(b"RIFF")?;
    file.write_all(&(36 + data_size).to_le_bytes())?;
    file.write_all(b"WAVE")?;

    file.write_all(b"fmt ")?;
    file.write_all(&16u32.to_le_bytes())?;
    file.write_all(&1u16.to_le_bytes())?; // PCM
    file.write_all(&1u16.to_le_bytes())?; // mono
    file.write_all(&sample_rate.to_le_bytes())?;
    file.write_all(&(sample_rate * 2).to_le_bytes())?;
    file.write_all(&2u16.to_le_bytes())?;
    file.write_all(&16u16.to_le_bytes())?;

    file.write_all(b"data")?;
    file.write_all(&data_size.to_le_bytes())?;
    for &sample in samples {
        let pcm = (sample.clamp(-1.0, 1.0) * 32767.0) as i16;
        file.write_all(&pcm.to_le_bytes())?;
    }

    file.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_sine() {
        let samples = generate_sine(440.0, 44100, 1.0, 0.5);
        assert_eq!(samples.len(), 44100);
        let max = samples.iter().cloned().fold(0.0f32, f32::max);
        assert!((max - 0.5).abs() < 0.01);
    }

    #[test]
    fn test_white_noise_is_bipolar() {
        let samples = generate_white_noise(8000, 1.0, 1.0, 12345);
        assert!(samples.iter().any(|&s| s > 0.0));
        assert!(samples.iter().any(|&s| s < 0.0));
        assert!(samples.iter().all(|&s| (-1.0..=1.0).contains(&s)));
    }

    #[test]
    fn test_click_positions() {
        assert_eq!(click_positions(120.0, 1000, 2.0), vec![0, 500, 1000, 1500]);
    }

    #[test]
    fn test_click_track_is_silent_between_clicks() {
        let samples = generate_click_track(60.0, 1000, 2.0);
        assert_eq!(samples.len(), 2000);
        assert!(samples[500..1000].iter().all(|&s| s == 0.0));
    }
}
