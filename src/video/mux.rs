//! Muxing the silent render with the source audio track.

use std::ffi::OsString;
use std::path::PathBuf;

use super::encoder::{Ffmpeg, VideoError};

/// One mux invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct MuxRequest {
    pub silent_video: PathBuf,
    pub audio: PathBuf,
    pub output: PathBuf,
    /// Cut the result to this many seconds (previews).
    pub limit_seconds: Option<f64>,
}

/// FFmpeg arguments that copy the video stream and re-encode audio to AAC.
pub fn mux_args(request: &MuxRequest) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![
        "-y".into(),
        "-i".into(),
        request.silent_video.as_os_str().to_owned(),
        "-i".into(),
        request.audio.as_os_str().to_owned(),
        "-c:v".into(),
        "copy".into(),
        "-c:a".into(),
        "aac".into(),
        "-strict".into(),
        "experimental".into(),
    ];
    if let Some(seconds) = request.limit_seconds {
        args.push("-t".into());
        args.push(seconds.to_string().into());
    }
    args.push(request.output.as_os_str().to_owned());
    args
}

/// Run FFmpeg to produce `request.output`. Blocks until FFmpeg exits.
pub fn mux_audio(ffmpeg: &Ffmpeg, request: &MuxRequest) -> Result<PathBuf, VideoError> {
    log::debug!(
        "Muxing {} + {} -> {}",
        request.silent_video.display(),
        request.audio.display(),
        request.output.display()
    );
    let status = ffmpeg
        .command()
        .args(mux_args(request))
        .status()
        .map_err(|e| ffmpeg.spawn_error(e))?;
    if !status.success() {
        return Err(VideoError::Failed {
            stage: "mux",
            status,
        });
    }
    Ok(request.output.clone())
}
