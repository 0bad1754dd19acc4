//! Video output through an external FFmpeg process.
//!
//! Frames are streamed to FFmpeg as raw RGBA to produce a silent H.264
//! video, which is then muxed with the source audio in a second call.

pub mod encoder;
pub mod mux;

pub use encoder::{
    check_ffmpeg_available, encoder_args, Ffmpeg, VideoConfig, VideoEncoder, VideoError,
};
pub use mux::{mux_args, mux_audio, MuxRequest};

use image::RgbaImage;

/// Destination for rendered frames.
pub trait FrameSink {
    fn write_frame(&mut self, frame: &RgbaImage) -> Result<(), VideoError>;
}

/// Keeps frames in memory.
impl FrameSink for Vec<RgbaImage> {
    fn write_frame(&mut self, frame: &RgbaImage) -> Result<(), VideoError> {
        self.push(frame.clone());
        Ok(())
    }
}
