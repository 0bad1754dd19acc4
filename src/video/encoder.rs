//! Silent video encoding by piping raw RGBA frames into FFmpeg.

use std::ffi::OsString;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, ExitStatus, Stdio};

use image::RgbaImage;
use serde::{Deserialize, Serialize};

use super::FrameSink;

/// Errors from the external encoder.
#[derive(Debug, thiserror::Error)]
pub enum VideoError {
    #[error("Failed to start {program}: {source}. Make sure FFmpeg is installed.")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to write frame to encoder: {0}")]
    Pipe(#[source] std::io::Error),
    #[error("FFmpeg {stage} exited with {status}")]
    Failed {
        stage: &'static str,
        status: ExitStatus,
    },
    #[error("Expected {expected} bytes per frame, got {got}")]
    FrameSize { expected: usize, got: usize },
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Location of the FFmpeg executable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ffmpeg {
    program: PathBuf,
}

impl Default for Ffmpeg {
    fn default() -> Self {
        Self::new("ffmpeg")
    }
}

impl Ffmpeg {
    pub fn new<P: Into<PathBuf>>(program: P) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub(crate) fn command(&self) -> Command {
        Command::new(&self.program)
    }

    pub(crate) fn spawn_error(&self, source: std::io::Error) -> VideoError {
        VideoError::Spawn {
            program: self.program.display().to_string(),
            source,
        }
    }

    /// Check that the executable runs.
    pub fn is_available(&self) -> bool {
        self.command()
            .arg("-version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map(|s| s.success())
            .unwrap_or(false)
    }
}

/// Whether `ffmpeg` on the `PATH` runs.
pub fn check_ffmpeg_available() -> bool {
    Ffmpeg::default().is_available()
}

/// Silent video encoding parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct VideoConfig {
    pub width: u32,
    pub height: u32,
    /// Frames per second. Fractional rates are passed through unchanged.
    pub fps: f64,
    /// FFmpeg video encoder name.
    pub vcodec: String,
    /// Output pixel format.
    pub pix_fmt: String,
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            fps: 30.0,
            vcodec: "libx264".to_string(),
            pix_fmt: "yuv420p".to_string(),
        }
    }
}

impl VideoConfig {
    pub fn validate(&self) -> Result<(), VideoError> {
        if self.width == 0 || self.height == 0 {
            return Err(VideoError::InvalidConfig(format!(
                "frame size {}x{}",
                self.width, self.height
            )));
        }
        // yuv420p needs even dimensions.
        if self.pix_fmt == "yuv420p" && (self.width % 2 != 0 || self.height % 2 != 0) {
            return Err(VideoError::InvalidConfig(format!(
                "{}x{} is not even, required by yuv420p",
                self.width, self.height
            )));
        }
        if !(self.fps.is_finite() && self.fps > 0.0) {
            return Err(VideoError::InvalidConfig(format!("fps {}", self.fps)));
        }
        Ok(())
    }

    fn frame_bytes(&self) -> usize {
        self.width as usize * self.height as usize * 4
    }
}

/// FFmpeg arguments for encoding raw RGBA from stdin into `output`.
pub fn encoder_args(config: &VideoConfig, output: &Path) -> Vec<OsString> {
    let mut args: Vec<OsString> = [
        "-y",
        "-loglevel",
        "error",
        "-f",
        "rawvideo",
        "-pix_fmt",
        "rgba",
        "-s",
    ]
    .iter()
    .map(OsString::from)
    .collect();
    args.push(format!("{}x{}", config.width, config.height).into());
    args.push("-framerate".into());
    args.push(config.fps.to_string().into());
    args.push("-i".into());
    args.push("-".into());
    args.push("-vcodec".into());
    args.push(config.vcodec.clone().into());
    args.push("-pix_fmt".into());
    args.push(config.pix_fmt.clone().into());
    args.push(output.as_os_str().to_owned());
    args
}

/// Streams frames to an FFmpeg child process.
pub struct VideoEncoder {
    child: Child,
    stdin: Option<ChildStdin>,
    config: VideoConfig,
    output: PathBuf,
    frames: usize,
}

impl VideoEncoder {
    /// Start FFmpeg writing to `output`.
    pub fn new<P: AsRef<Path>>(
        ffmpeg: &Ffmpeg,
        output: P,
        config: VideoConfig,
    ) -> Result<Self, VideoError> {
        config.validate()?;
        let output = output.as_ref().to_path_buf();

        let mut child = ffmpeg
            .command()
            .args(encoder_args(&config, &output))
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| ffmpeg.spawn_error(e))?;
        let stdin = child.stdin.take();

        log::debug!(
            "Encoding {}x{} @ {:.3} fps to {}",
            config.width,
            config.height,
            config.fps,
            output.display()
        );

        Ok(Self {
            child,
            stdin,
            config,
            output,
            frames: 0,
        })
    }

    pub fn config(&self) -> &VideoConfig {
        &self.config
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Frames written so far.
    pub fn frames_written(&self) -> usize {
        self.frames
    }

    /// Write one frame of `width * height * 4` RGBA bytes.
    pub fn write_rgba(&mut self, rgba: &[u8]) -> Result<(), VideoError> {
        let expected = self.config.frame_bytes();
        if rgba.len() != expected {
            return Err(VideoError::FrameSize {
                expected,
                got: rgba.len(),
            });
        }
        let stdin = self
            .stdin
            .as_mut()
            .ok_or_else(|| VideoError::Pipe(std::io::ErrorKind::BrokenPipe.into()))?;
        if let Err(err) = stdin.write_all(rgba) {
            return Err(self.write_failure(err));
        }
        self.frames += 1;
        Ok(())
    }

    /// Close the pipe after a failed write and report FFmpeg's own exit
    /// status when it has already given up.
    fn write_failure(&mut self, err: std::io::Error) -> VideoError {
        drop(self.stdin.take());
        match self.child.wait() {
            Ok(status) if !status.success() => VideoError::Failed {
                stage: "encode",
                status,
            },
            _ => VideoError::Pipe(err),
        }
    }

    /// Close the pipe and wait for FFmpeg to exit.
    pub fn finish(mut self) -> Result<PathBuf, VideoError> {
        drop(self.stdin.take());
        let status = self.child.wait().map_err(VideoError::Pipe)?;
        if !status.success() {
            return Err(VideoError::Failed {
                stage: "encode",
                status,
            });
        }
        log::debug!("Encoder wrote {} frames", self.frames);
        Ok(std::mem::take(&mut self.output))
    }
}

impl Drop for VideoEncoder {
    /// Reap the child if the encoder is abandoned mid-stream.
    fn drop(&mut self) {
        drop(self.stdin.take());
        if let Err(err) = self.child.wait() {
            log::warn!("Failed to wait for FFmpeg: {}", err);
        }
    }
}

impl FrameSink for VideoEncoder {
    fn write_frame(&mut self, frame: &RgbaImage) -> Result<(), VideoError> {
        self.write_rgba(frame.as_raw())
    }
}
