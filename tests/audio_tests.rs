//! Integration tests for loading and onset analysis.

use mandala_viz::audio::synth::{click_positions, generate_click_track, generate_sine, write_wav};
use mandala_viz::audio::{load_audio, onset_strength, IntensitySignal, OnsetConfig};
use tempfile::TempDir;

const SAMPLE_RATE: u32 = 22050;

#[test]
fn test_wav_round_trip_through_loader() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("sine.wav");
    let samples = generate_sine(440.0, SAMPLE_RATE, 1.0, 0.5);
    write_wav(&path, &samples, SAMPLE_RATE).unwrap();

    let audio = load_audio(&path).unwrap();
    assert_eq!(audio.sample_rate, SAMPLE_RATE);
    assert_eq!(audio.channels, 1);
    assert_eq!(audio.num_frames(), samples.len());
    assert!((audio.duration() - 1.0).abs() < 1e-3);

    let max_diff = audio
        .samples
        .iter()
        .zip(&samples)
        .map(|(a, b)| (a - b).abs())
        .fold(0.0f32, f32::max);
    assert!(max_diff < 1e-3, "decoded samples differ by {}", max_diff);
}

#[test]
fn test_click_track_onsets_line_up_with_clicks() {
    let config = OnsetConfig::default();
    let samples = generate_click_track(120.0, SAMPLE_RATE, 4.0);
    let signal = IntensitySignal::analyze(&samples, SAMPLE_RATE, &config);

    assert_eq!(signal.len(), 1 + samples.len() / config.hop_length);
    assert!(signal.raw_max() > 0.0);

    for pos in click_positions(120.0, SAMPLE_RATE, 4.0).into_iter().skip(1) {
        let frame = pos / config.hop_length;
        let window = &signal.values()[frame.saturating_sub(3)..(frame + 5).min(signal.len())];
        let peak = window.iter().copied().fold(0.0f32, f32::max);
        assert!(peak > 0.3, "weak onset near frame {}: {}", frame, peak);

        // Halfway to the next click the track is silent.
        let quiet = frame + 10;
        if quiet < signal.len() {
            assert!(
                signal.at(quiet) < 0.05,
                "frame {} should be quiet, got {}",
                quiet,
                signal.at(quiet)
            );
        }
    }
}

#[test]
fn test_normalized_values_are_in_unit_range() {
    let samples: Vec<f32> = generate_click_track(90.0, SAMPLE_RATE, 3.0)
        .iter()
        .zip(generate_sine(220.0, SAMPLE_RATE, 3.0, 0.2))
        .map(|(c, s)| c + s)
        .collect();
    let signal = IntensitySignal::analyze(&samples, SAMPLE_RATE, &OnsetConfig::default());

    assert!(signal.values().iter().all(|v| (0.0..=1.0).contains(v)));
    let max = signal.values().iter().copied().fold(0.0f32, f32::max);
    assert!((max - 1.0).abs() < 1e-6);
}

#[test]
fn test_silence_passes_through_unscaled() {
    let samples = vec![0.0f32; SAMPLE_RATE as usize];
    let config = OnsetConfig::default();
    let raw = onset_strength(&samples, SAMPLE_RATE, &config);
    let signal = IntensitySignal::analyze(&samples, SAMPLE_RATE, &config);

    assert_eq!(signal.raw_max(), 0.0);
    assert_eq!(signal.values(), raw.as_slice());
    assert!(signal.values().iter().all(|&v| v == 0.0));
}

#[test]
fn test_frame_rate_from_duration() {
    let signal = IntensitySignal::from_raw(vec![1.0; 300], 10.0);
    assert_eq!(signal.fps(), 30.0);

    let zero = IntensitySignal::from_raw(vec![1.0; 12], 0.0);
    assert_eq!(zero.fps(), 30.0);
}

#[test]
fn test_analysis_fps_tracks_hop() {
    let config = OnsetConfig::default();
    let samples = generate_sine(330.0, SAMPLE_RATE, 2.0, 0.5);
    let signal = IntensitySignal::analyze(&samples, SAMPLE_RATE, &config);
    let expected = SAMPLE_RATE as f64 / config.hop_length as f64;
    assert!((signal.fps() - expected).abs() < 1.0, "fps {}", signal.fps());
}
