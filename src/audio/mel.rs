//! Mel filterbank (Slaney scale, area-normalized).

const F_SP: f64 = 200.0 / 3.0;
const MIN_LOG_HZ: f64 = 1000.0;
const MIN_LOG_MEL: f64 = MIN_LOG_HZ / F_SP;

fn log_step() -> f64 {
    6.4f64.ln() / 27.0
}

/// Convert Hz to mels. Linear below 1 kHz, logarithmic above.
pub fn hz_to_mel(hz: f64) -> f64 {
    if hz >= MIN_LOG_HZ {
        MIN_LOG_MEL + (hz / MIN_LOG_HZ).ln() / log_step()
    } else {
        hz / F_SP
    }
}

/// Inverse of [`hz_to_mel`].
pub fn mel_to_hz(mel: f64) -> f64 {
    if mel >= MIN_LOG_MEL {
        MIN_LOG_HZ * (log_step() * (mel - MIN_LOG_MEL)).exp()
    } else {
        F_SP * mel
    }
}

/// Triangular mel filters over the bins of a power spectrum.
#[derive(Debug, Clone)]
pub struct MelFilterBank {
    weights: Vec<Vec<f32>>,
    num_bins: usize,
}

impl MelFilterBank {
    /// Build `num_mels` filters spanning 0 Hz to Nyquist for an FFT of
    /// `fft_size` at `sample_rate`.
    pub fn new(sample_rate: u32, fft_size: usize, num_mels: usize) -> Self {
        let num_bins = fft_size / 2 + 1;
        let fmax = sample_rate as f64 / 2.0;

        let fft_freqs: Vec<f64> = (0..num_bins)
            .map(|k| k as f64 * sample_rate as f64 / fft_size as f64)
            .collect();

        let mel_max = hz_to_mel(fmax);
        let mel_points: Vec<f64> = (0..num_mels + 2)
            .map(|i| mel_to_hz(mel_max * i as f64 / (num_mels + 1) as f64))
            .collect();

        let weights = (0..num_mels)
            .map(|m| {
                let (lo, center, hi) = (mel_points[m], mel_points[m + 1], mel_points[m + 2]);
                let enorm = 2.0 / (hi - lo);
                fft_freqs
                    .iter()
                    .map(|&f| {
                        let lower = (f - lo) / (center - lo);
                        let upper = (hi - f) / (hi - center);
                        (lower.min(upper).max(0.0) * enorm) as f32
                    })
                    .collect()
            })
            .collect();

        Self { weights, num_bins }
    }

    pub fn num_mels(&self) -> usize {
        self.weights.len()
    }

    pub fn num_bins(&self) -> usize {
        self.num_bins
    }

    /// Project one power spectrum onto the mel bands.
    pub fn apply(&self, power: &[f32]) -> Vec<f32> {
        debug_assert_eq!(power.len(), self.num_bins);
        self.weights
            .iter()
            .map(|filter| filter.iter().zip(power).map(|(w, p)| w * p).sum())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mel_scale_round_trip_points() {
        assert!((hz_to_mel(1000.0) - 15.0).abs() < 1e-9);
        assert!((hz_to_mel(500.0) - 7.5).abs() < 1e-9);
        for hz in [0.0, 300.0, 1000.0, 4000.0, 11025.0] {
            assert!((mel_to_hz(hz_to_mel(hz)) - hz).abs() < 1e-6);
        }
    }

    #[test]
    fn test_filterbank_shape() {
        let bank = MelFilterBank::new(22050, 2048, 128);
        assert_eq!(bank.num_mels(), 128);
        assert_eq!(bank.num_bins(), 1025);
    }

    #[test]
    fn test_filters_are_non_negative_and_nonempty() {
        let bank = MelFilterBank::new(44100, 2048, 40);
        for filter in &bank.weights {
            assert!(filter.iter().all(|&w| w >= 0.0));
            assert!(filter.iter().any(|&w| w > 0.0));
        }
    }

    #[test]
    fn test_apply_flat_spectrum_is_positive() {
        let bank = MelFilterBank::new(44100, 1024, 32);
        let bands = bank.apply(&vec![1.0; bank.num_bins()]);
        assert_eq!(bands.len(), 32);
        assert!(bands.iter().all(|&b| b > 0.0));
    }
}
