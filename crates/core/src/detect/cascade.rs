use std::path::{Path, PathBuf};

use opencv::core::{Mat, Rect, Size, Vector};
use opencv::objdetect::{self, CascadeClassifier};
use opencv::prelude::*;
use thiserror::Error;

use super::{DetectorParams, FaceDetector};

#[derive(Error, Debug)]
pub enum DetectorError {
    #[error("could not load face cascade classifier from {path}: {reason}")]
    ModelLoad { path: PathBuf, reason: String },
}

/// Adapter over OpenCV's pretrained cascade classifier.
///
/// The multi-scale sliding-window evaluation is entirely the library's;
/// this type only marshals parameters and collects rectangles.
pub struct CascadeDetector {
    classifier: CascadeClassifier,
    params: DetectorParams,
}

impl CascadeDetector {
    /// Loads a trained cascade model file.
    ///
    /// A missing, corrupt, or unrecognized model leaves the classifier
    /// empty, which is reported as a load failure.
    pub fn open(model_path: &Path, params: DetectorParams) -> Result<Self, DetectorError> {
        let model_load = |reason: String| DetectorError::ModelLoad {
            path: model_path.to_path_buf(),
            reason,
        };

        let path_str = model_path
            .to_str()
            .ok_or_else(|| model_load("model path is not valid UTF-8".to_string()))?;

        let classifier =
            CascadeClassifier::new(path_str).map_err(|e| model_load(e.to_string()))?;
        if classifier.empty().map_err(|e| model_load(e.to_string()))? {
            return Err(model_load(
                "classifier is empty (file missing or not a cascade model)".to_string(),
            ));
        }

        log::info!(
            "face cascade classifier loaded successfully from {}",
            model_path.display()
        );
        Ok(Self { classifier, params })
    }
}

impl FaceDetector for CascadeDetector {
    fn detect(&mut self, gray: &Mat) -> Result<Vec<Rect>, Box<dyn std::error::Error>> {
        let mut rects = Vector::<Rect>::new();
        self.classifier.detect_multi_scale(
            gray,
            &mut rects,
            self.params.scale_factor,
            self.params.min_neighbors,
            objdetect::CASCADE_SCALE_IMAGE,
            Size::new(self.params.min_size.w, self.params.min_size.h),
            // No upper bound here: the max-size filter is applied
            // downstream to keep label numbering raw.
            Size::default(),
        )?;
        Ok(rects.to_vec())
    }
}
