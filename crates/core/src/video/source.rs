use std::path::Path;

use opencv::core::Mat;
use opencv::prelude::*;
use opencv::videoio::{self, VideoCapture};

use super::{GrabbedFrame, StreamProbe, VideoError, VideoSource};

/// Video input backed by OpenCV's `VideoCapture`.
pub struct OpenCvSource {
    capture: VideoCapture,
    probe: StreamProbe,
}

impl OpenCvSource {
    pub fn open(path: &Path) -> Result<Self, VideoError> {
        let open_err = |reason: String| VideoError::Open {
            path: path.to_path_buf(),
            reason,
        };

        let path_str = path
            .to_str()
            .ok_or_else(|| open_err("video path is not valid UTF-8".to_string()))?;

        let capture = VideoCapture::from_file(path_str, videoio::CAP_ANY)
            .map_err(|e| open_err(e.to_string()))?;
        if !capture.is_opened().map_err(|e| open_err(e.to_string()))? {
            return Err(open_err("stream could not be opened".to_string()));
        }

        // A property-read failure here would otherwise poison the
        // sink with zero dimensions and only surface as an opaque
        // encoder error later.
        let prop = |id: i32| capture.get(id).map_err(|e| open_err(e.to_string()));
        let probe = StreamProbe {
            width: prop(videoio::CAP_PROP_FRAME_WIDTH)? as i32,
            height: prop(videoio::CAP_PROP_FRAME_HEIGHT)? as i32,
            fps: prop(videoio::CAP_PROP_FPS)?,
        };

        Ok(Self { capture, probe })
    }
}

impl VideoSource for OpenCvSource {
    fn probe(&self) -> StreamProbe {
        self.probe
    }

    fn read(&mut self) -> Result<Option<GrabbedFrame>, Box<dyn std::error::Error>> {
        let mut mat = Mat::default();
        if !self.capture.read(&mut mat)? || mat.empty() {
            return Ok(None);
        }

        // POS_FRAMES after a read is the count of frames decoded so
        // far; the frame just read therefore has zero-based index
        // POS_FRAMES - 1. POS_MSEC is the stream's timestamp for it.
        let pos = self.capture.get(videoio::CAP_PROP_POS_FRAMES).unwrap_or(0.0);
        let msec = self.capture.get(videoio::CAP_PROP_POS_MSEC).unwrap_or(0.0);

        Ok(Some(GrabbedFrame {
            mat,
            index: (pos as i64 - 1).max(0),
            time: msec / 1000.0,
        }))
    }

    fn release(&mut self) {
        if let Err(e) = self.capture.release() {
            log::warn!("failed to release video capture: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_missing_file_fails() {
        let result = OpenCvSource::open(Path::new("/nonexistent/input.mp4"));
        assert!(matches!(result, Err(VideoError::Open { .. })));
    }

    #[test]
    fn test_open_non_video_file_fails() {
        let file = tempfile::NamedTempFile::with_suffix(".mp4").unwrap();
        std::fs::write(file.path(), b"not a video container").unwrap();
        let result = OpenCvSource::open(file.path());
        assert!(matches!(result, Err(VideoError::Open { .. })));
    }
}
