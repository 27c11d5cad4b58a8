pub mod sink;
pub mod source;

use std::path::PathBuf;

use opencv::core::Mat;
use thiserror::Error;

pub use sink::OpenCvSink;
pub use source::OpenCvSource;

#[derive(Error, Debug)]
pub enum VideoError {
    #[error("unable to open video file {path}: {reason}")]
    Open { path: PathBuf, reason: String },
    #[error("unable to create output video {path}: {reason}")]
    Create { path: PathBuf, reason: String },
}

/// Input stream properties, read once at open time and passed through
/// unchanged to the output sink.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StreamProbe {
    pub width: i32,
    pub height: i32,
    pub fps: f64,
}

/// A decoded frame together with the stream's own accounting for it.
///
/// `index` and `time` come from the source's position counters after
/// the read, never from a caller-side count, so variable-frame-rate
/// and malformed inputs keep the stream's view of frame identity.
pub struct GrabbedFrame {
    pub mat: Mat,
    pub index: i64,
    pub time: f64,
}

/// Reads frames from a video stream in decode order.
pub trait VideoSource {
    fn probe(&self) -> StreamProbe;

    /// Pulls the next frame. `Ok(None)` is the normal end of stream.
    fn read(&mut self) -> Result<Option<GrabbedFrame>, Box<dyn std::error::Error>>;

    /// Releases the underlying stream. Safe to call once on every exit
    /// path; failures are logged, not propagated.
    fn release(&mut self);
}

/// Accepts annotated frames for encoding.
pub trait VideoSink {
    fn write(&mut self, frame: &Mat) -> Result<(), Box<dyn std::error::Error>>;

    fn release(&mut self);
}
