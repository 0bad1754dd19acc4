//! Run configuration.
//!
//! Every field has a default, so a JSON file only needs the keys it wants
//! to change:
//!
//! ```
//! use mandala_viz::config::PipelineConfig;
//!
//! let config = PipelineConfig::from_json_str(r#"{ "seed": 7, "render": { "width": 1280, "height": 720 } }"#).unwrap();
//! assert_eq!(config.seed, Some(7));
//! assert_eq!(config.render.width, 1280);
//! assert_eq!(config.burst_size, 30);
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::audio::OnsetConfig;
use crate::particles::DEFAULT_BURST_SIZE;
use crate::render::RenderConfig;
use crate::video::{Ffmpeg, VideoConfig};

/// Errors from loading a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Everything a render needs besides the audio file and the theme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub render: RenderConfig,
    pub onset: OnsetConfig,
    /// Particles per burst.
    pub burst_size: usize,
    /// Spawn RNG seed. `None` draws from system entropy.
    pub seed: Option<u64>,
    pub ffmpeg: Ffmpeg,
    /// FFmpeg video encoder for the silent render.
    pub vcodec: String,
    /// Directory receiving the silent and final videos.
    pub output_dir: PathBuf,
    /// Length of the preview slice.
    pub preview_seconds: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            render: RenderConfig::default(),
            onset: OnsetConfig::default(),
            burst_size: DEFAULT_BURST_SIZE,
            seed: None,
            ffmpeg: Ffmpeg::default(),
            vcodec: "libx264".to_string(),
            output_dir: PathBuf::from("."),
            preview_seconds: 5.0,
        }
    }
}

impl PipelineConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make analysis or rendering impossible.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.onset.validate().map_err(ConfigError::Invalid)?;
        if !(self.preview_seconds.is_finite() && self.preview_seconds > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "preview_seconds {}",
                self.preview_seconds
            )));
        }
        Ok(())
    }

    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Encoder settings for a signal running at `fps`.
    pub fn to_video_config(&self, fps: f64) -> VideoConfig {
        VideoConfig {
            width: self.render.width,
            height: self.render.height,
            fps,
            vcodec: self.vcodec.clone(),
            ..VideoConfig::default()
        }
    }
}
