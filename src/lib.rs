//! Mandala Visualizer
//!
//! Audio-reactive particle visualization rendered to video.
//!
//! # Features
//!
//! - Audio loading (WAV, MP3, FLAC, AAC) via Symphonia
//! - Onset strength analysis (mel spectral flux) via RustFFT
//! - Theme-driven particle bursts (Agni, Vayu, Indra)
//! - CPU rasterization of polar scatter frames via `image`
//! - Video encoding and audio muxing through an external FFmpeg

pub mod audio;
pub mod cli;
pub mod config;
pub mod particles;
pub mod pipeline;
pub mod render;
pub mod themes;
pub mod video;

// Re-export commonly used types
pub use audio::{load_audio, AudioData, IntensitySignal, OnsetConfig};
pub use config::PipelineConfig;
pub use particles::{Particle, ParticleSimulator, StepReport};
pub use pipeline::{
    analyze_audio_file, render_frames, render_pipeline, ErrorKind, OutputPaths, PipelineError,
    RenderScope,
};
pub use render::{FrameRenderer, RenderConfig};
pub use themes::{Theme, ThemeProfile};
pub use video::{Ffmpeg, FrameSink, VideoConfig, VideoEncoder};
