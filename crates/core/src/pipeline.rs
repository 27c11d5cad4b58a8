use opencv::core::Mat;
use opencv::imgproc;

use crate::annotate;
use crate::config::SizeSpec;
use crate::detect::FaceDetector;
use crate::record::{self, FrameRecord, ResultLog};
use crate::video::{VideoSink, VideoSource};

/// Runs the per-frame detection pipeline over a video stream.
///
/// Single-use: `execute` consumes the pipeline, streams to end of
/// input, and releases the source and (if present) the sink on every
/// exit path, in that order. A sink is only present when annotated
/// output is enabled; drawing happens exactly when a sink is present
/// and never changes the returned log.
pub struct ProcessVideoUseCase {
    source: Box<dyn VideoSource>,
    sink: Option<Box<dyn VideoSink>>,
    detector: Box<dyn FaceDetector>,
    max_size: SizeSpec,
}

impl ProcessVideoUseCase {
    pub fn new(
        source: Box<dyn VideoSource>,
        sink: Option<Box<dyn VideoSink>>,
        detector: Box<dyn FaceDetector>,
        max_size: SizeSpec,
    ) -> Self {
        Self {
            source,
            sink,
            detector,
            max_size,
        }
    }

    pub fn execute(mut self) -> Result<ResultLog, Box<dyn std::error::Error>> {
        let result = self.stream();

        // Drain: input first, then output, unconditionally.
        self.source.release();
        if let Some(sink) = self.sink.as_mut() {
            sink.release();
        }

        result
    }

    fn stream(&mut self) -> Result<ResultLog, Box<dyn std::error::Error>> {
        let probe = self.source.probe();
        let mut log = ResultLog::new();

        loop {
            let mut frame = match self.source.read() {
                Ok(Some(frame)) => frame,
                Ok(None) => break,
                // A read error ends the stream; it is not fatal and no
                // partial frame is recorded.
                Err(e) => {
                    log::warn!("video read failed, ending stream: {e}");
                    break;
                }
            };

            let mut gray = Mat::default();
            imgproc::cvt_color(
                &frame.mat,
                &mut gray,
                imgproc::COLOR_BGR2GRAY,
                0,
            )?;

            let raw = self.detector.detect(&gray)?;
            let faces = record::collect_faces(&raw, &self.max_size);

            if let Some(sink) = self.sink.as_mut() {
                for det in &faces {
                    annotate::draw_detection(&mut frame.mat, det)?;
                }
                annotate::draw_frame_index(&mut frame.mat, frame.index, probe.width, probe.height)?;
                sink.write(&frame.mat)?;
            }

            log.push(FrameRecord {
                index: frame.index,
                time: frame.time,
                faces,
            });
        }

        Ok(log)
    }
}
