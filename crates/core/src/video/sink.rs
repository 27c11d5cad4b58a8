use std::path::Path;

use opencv::core::{Mat, Size};
use opencv::prelude::*;
use opencv::videoio::VideoWriter;

use super::{StreamProbe, VideoError, VideoSink};

/// Video output backed by OpenCV's `VideoWriter` (mp4v), keeping the
/// source's frame size and frame rate.
pub struct OpenCvSink {
    writer: VideoWriter,
}

impl OpenCvSink {
    pub fn create(path: &Path, probe: &StreamProbe) -> Result<Self, VideoError> {
        let create_err = |reason: String| VideoError::Create {
            path: path.to_path_buf(),
            reason,
        };

        let path_str = path
            .to_str()
            .ok_or_else(|| create_err("output path is not valid UTF-8".to_string()))?;

        let fourcc =
            VideoWriter::fourcc('m', 'p', '4', 'v').map_err(|e| create_err(e.to_string()))?;
        let writer = VideoWriter::new(
            path_str,
            fourcc,
            probe.fps,
            Size::new(probe.width, probe.height),
            true,
        )
        .map_err(|e| create_err(e.to_string()))?;
        if !writer.is_opened().map_err(|e| create_err(e.to_string()))? {
            return Err(create_err("encoder could not be created".to_string()));
        }

        Ok(Self { writer })
    }
}

impl VideoSink for OpenCvSink {
    fn write(&mut self, frame: &Mat) -> Result<(), Box<dyn std::error::Error>> {
        self.writer.write(frame)?;
        Ok(())
    }

    fn release(&mut self) {
        if let Err(e) = self.writer.release() {
            log::warn!("failed to release video writer: {e}");
        }
    }
}
