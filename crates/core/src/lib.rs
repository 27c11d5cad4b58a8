//! Batch face-detection video processing.
//!
//! Reads a video, runs a pretrained cascade classifier per frame,
//! optionally writes an annotated copy of the video, and optionally
//! writes a per-frame JSON log of detected face rectangles and
//! timestamps. Detection, decoding, encoding, and drawing are all
//! delegated to OpenCV; this crate orchestrates them and owns the
//! output contract.

pub mod annotate;
pub mod config;
pub mod detect;
pub mod pipeline;
pub mod record;
pub mod video;
pub mod writer;
