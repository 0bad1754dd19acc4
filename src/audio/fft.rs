//! Short-time Fourier transform using RustFFT.

use std::sync::Arc;

use rustfft::{num_complex::Complex, Fft, FftPlanner};

/// Power-spectrum analyzer producing centered STFT frames.
///
/// Frames are windowed with a periodic Hann window and the signal is padded
/// with `fft_size / 2` zeros on both ends so that frame `t` is centered on
/// sample `t * hop`.
pub struct SpectrumAnalyzer {
    fft: Arc<dyn Fft<f32>>,
    fft_size: usize,
    window: Vec<f32>,
    scratch: Vec<Complex<f32>>,
}

impl SpectrumAnalyzer {
    /// Create a new analyzer.
    ///
    /// Common FFT sizes: 512, 1024, 2048, 4096.
    pub fn new(fft_size: usize) -> Self {
        assert!(fft_size.is_power_of_two(), "FFT size must be a power of 2");

        let window: Vec<f32> = (0..fft_size)
            .map(|i| {
                let t = i as f32 / fft_size as f32;
                0.5 - 0.5 * (2.0 * std::f32::consts::PI * t).cos()
            })
            .collect();

        let fft = FftPlanner::new().plan_fft_forward(fft_size);

        Self {
            fft,
            fft_size,
            window,
            scratch: vec![Complex::new(0.0, 0.0); fft_size],
        }
    }

    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    /// Number of bins from DC to Nyquist inclusive.
    pub fn num_bins(&self) -> usize {
        self.fft_size / 2 + 1
    }

    /// Frequency in Hz of a bin.
    pub fn bin_to_freq(&self, bin: usize, sample_rate: u32) -> f32 {
        bin as f32 * sample_rate as f32 / self.fft_size as f32
    }

    /// Bin index nearest to a frequency in Hz.
    pub fn freq_to_bin(&self, freq: f32, sample_rate: u32) -> usize {
        (freq * self.fft_size as f32 / sample_rate as f32).round() as usize
    }

    /// Power spectrum `|X|^2` of one frame.
    ///
    /// # Panics
    ///
    /// Panics if `frame.len() != fft_size`.
    pub fn power_spectrum(&mut self, frame: &[f32]) -> Vec<f32> {
        assert_eq!(
            frame.len(),
            self.fft_size,
            "Frame must be exactly {} samples",
            self.fft_size
        );

        for ((slot, &s), &w) in self.scratch.iter_mut().zip(frame).zip(&self.window) {
            *slot = Complex::new(s * w, 0.0);
        }
        self.fft.process(&mut self.scratch);

        self.scratch[..self.num_bins()]
            .iter()
            .map(|c| c.norm_sqr())
            .collect()
    }

    /// Number of centered frames produced for `len` samples.
    pub fn num_frames(&self, len: usize, hop: usize) -> usize {
        if len == 0 {
            return 0;
        }
        1 + len / hop
    }

    /// Centered power spectrogram, one `Vec` of `num_bins()` values per frame.
    pub fn stft_power(&mut self, samples: &[f32], hop: usize) -> Vec<Vec<f32>> {
        assert!(hop > 0, "Hop length must be positive");

        let num_frames = self.num_frames(samples.len(), hop);
        let pad = self.fft_size / 2;
        let mut padded = vec![0.0f32; samples.len() + 2 * pad];
        padded[pad..pad + samples.len()].copy_from_slice(samples);

        let mut frames = Vec::with_capacity(num_frames);
        let mut frame = vec![0.0f32; self.fft_size];
        for t in 0..num_frames {
            let start = t * hop;
            let end = (start + self.fft_size).min(padded.len());
            frame.fill(0.0);
            frame[..end - start].copy_from_slice(&padded[start..end]);
            frames.push(self.power_spectrum(&frame));
        }
        frames
    }
}
