pub mod cascade;

use opencv::core::{Mat, Rect};

use crate::config::{ModelParams, SizeSpec};

pub use cascade::{CascadeDetector, DetectorError};

/// Domain seam for face detection over a single grayscale frame.
///
/// `&mut self` because the underlying classifier mutates internal
/// buffers between calls.
pub trait FaceDetector {
    fn detect(&mut self, gray: &Mat) -> Result<Vec<Rect>, Box<dyn std::error::Error>>;
}

/// Detection parameters marshaled straight from the configuration.
///
/// The maximum-size bound is deliberately absent: the pipeline applies
/// it as a post-filter so detection labels stay aligned with raw
/// detector output.
#[derive(Clone, Copy, Debug)]
pub struct DetectorParams {
    pub scale_factor: f64,
    pub min_neighbors: i32,
    pub min_size: SizeSpec,
}

impl DetectorParams {
    pub fn from_model(model: &ModelParams) -> Self {
        Self {
            scale_factor: model.scale_factor,
            min_neighbors: model.min_neighbors,
            min_size: model.min_size,
        }
    }
}
