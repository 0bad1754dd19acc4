//! Full render pipeline combining analysis, simulation, rasterization and
//! encoding.

pub mod paths;

pub use paths::{OutputPaths, RenderScope, PREVIEW_PREFIX};

use std::path::{Path, PathBuf};

use crate::audio::{load_audio, AudioData, AudioError, IntensitySignal, OnsetConfig};
use crate::config::{ConfigError, PipelineConfig};
use crate::particles::ParticleSimulator;
use crate::render::FrameRenderer;
use crate::themes::{ThemeError, ThemeProfile};
use crate::video::{mux_audio, FrameSink, MuxRequest, VideoEncoder, VideoError};

/// Broad classes of failure, reported distinctly by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad arguments, configuration or unusable input data.
    InvalidInput,
    /// A file could not be read or written.
    ResourceUnavailable,
    /// FFmpeg could not be started or exited unsuccessfully.
    ExternalToolFailure,
}

impl ErrorKind {
    /// Process exit status for this kind.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidInput => 2,
            Self::ResourceUnavailable => 3,
            Self::ExternalToolFailure => 4,
        }
    }
}

/// Errors that can occur during pipeline execution.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Audio error: {0}")]
    Audio(#[from] AudioError),
    #[error("Video error: {0}")]
    Video(#[from] VideoError),
    #[error("{0}")]
    Theme(#[from] ThemeError),
    #[error("{0}")]
    Config(#[from] ConfigError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to write analysis: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Audio contains no samples to render")]
    EmptyAudio,
}

impl PipelineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Audio(_) | Self::Io(_) => ErrorKind::ResourceUnavailable,
            Self::Config(ConfigError::Read { .. }) => ErrorKind::ResourceUnavailable,
            Self::Config(ConfigError::Parse(_) | ConfigError::Invalid(_)) => {
                ErrorKind::InvalidInput
            }
            Self::Theme(_) | Self::EmptyAudio | Self::Json(_) => ErrorKind::InvalidInput,
            Self::Video(VideoError::FrameSize { .. } | VideoError::InvalidConfig(_)) => {
                ErrorKind::InvalidInput
            }
            Self::Video(_) => ErrorKind::ExternalToolFailure,
        }
    }
}

/// Counters collected while rendering frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderStats {
    pub frames: usize,
    pub bursts: usize,
    pub spawned: usize,
    pub peak_particles: usize,
}

/// Result of one pipeline run.
#[derive(Debug, Clone)]
pub struct RenderOutcome {
    pub scope: RenderScope,
    pub paths: OutputPaths,
    pub signal: IntensitySignal,
    pub stats: RenderStats,
}

/// Intensity signal for the part of `audio` covered by `scope`.
pub fn analyze_scope(audio: &AudioData, scope: RenderScope, onset: &OnsetConfig) -> IntensitySignal {
    let mono = match scope.limit_seconds() {
        Some(seconds) => audio.truncated(seconds).to_mono(),
        None => audio.to_mono(),
    };
    IntensitySignal::analyze(&mono, audio.sample_rate, onset)
}

/// Load an audio file and compute its intensity signal.
pub fn analyze_audio_file<P: AsRef<Path>>(
    audio_path: P,
    scope: RenderScope,
    onset: &OnsetConfig,
) -> Result<IntensitySignal, PipelineError> {
    let audio = load_audio(audio_path.as_ref())?;
    Ok(analyze_scope(&audio, scope, onset))
}

/// Write a signal as pretty JSON.
pub fn write_signal_json(path: &Path, signal: &IntensitySignal) -> Result<(), PipelineError> {
    let json = serde_json::to_string_pretty(signal)?;
    std::fs::write(path, json)?;
    Ok(())
}

fn simulator_for(profile: &ThemeProfile, config: &PipelineConfig) -> ParticleSimulator {
    let simulator = match config.seed {
        Some(seed) => ParticleSimulator::with_seed(profile.clone(), seed),
        None => ParticleSimulator::new(profile.clone()),
    };
    simulator.with_burst_size(config.burst_size)
}

/// Simulate and rasterize every frame of `signal` into `sink`, in order.
pub fn render_frames<S: FrameSink>(
    signal: &IntensitySignal,
    profile: &ThemeProfile,
    config: &PipelineConfig,
    sink: &mut S,
) -> Result<RenderStats, VideoError> {
    let mut simulator = simulator_for(profile, config);
    let renderer = FrameRenderer::new(config.render.clone(), profile.clone());
    let mut stats = RenderStats::default();

    for frame in 0..signal.len() {
        let intensity = signal.at(frame);
        let report = simulator.step(intensity);
        let image = renderer.render(simulator.particles(), intensity);
        sink.write_frame(&image)?;

        stats.frames += 1;
        if report.spawned > 0 {
            stats.bursts += 1;
            stats.spawned += report.spawned;
        }
        stats.peak_particles = stats.peak_particles.max(report.alive);

        log::trace!(
            "frame {}: intensity {:.3}, {} alive",
            frame,
            intensity,
            report.alive
        );
        if (frame + 1) % 500 == 0 {
            log::info!("Rendered {}/{} frames", frame + 1, signal.len());
        }
    }

    Ok(stats)
}

/// Run analysis, rendering, encoding and muxing for one scope.
///
/// `audio` must be the decoded contents of `audio_path`; the file itself is
/// only handed to FFmpeg for the soundtrack.
pub fn render_pipeline(
    audio_path: &Path,
    audio: &AudioData,
    profile: &ThemeProfile,
    scope: RenderScope,
    paths: &OutputPaths,
    config: &PipelineConfig,
) -> Result<RenderOutcome, PipelineError> {
    let signal = analyze_scope(audio, scope, &config.onset);
    if signal.is_empty() {
        return Err(PipelineError::EmptyAudio);
    }
    log::info!(
        "Analyzed {} scope: {} frames over {:.2}s ({:.3} fps)",
        scope.label(),
        signal.len(),
        signal.duration(),
        signal.fps()
    );

    for path in [&paths.silent, &paths.output] {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }
    }

    let mut encoder = VideoEncoder::new(
        &config.ffmpeg,
        &paths.silent,
        config.to_video_config(signal.fps()),
    )?;
    let stats = render_frames(&signal, profile, config, &mut encoder)?;
    let silent: PathBuf = encoder.finish()?;
    log::info!("Silent visualization saved to {}", silent.display());

    let request = MuxRequest {
        silent_video: silent,
        audio: audio_path.to_path_buf(),
        output: paths.output.clone(),
        limit_seconds: scope.limit_seconds(),
    };
    let output = mux_audio(&config.ffmpeg, &request)?;
    log::info!("Final visualization with audio saved to {}", output.display());

    Ok(RenderOutcome {
        scope,
        paths: paths.clone(),
        signal,
        stats,
    })
}
