use opencv::core::{Mat, Point, Rect, Scalar};
use opencv::imgproc;

use crate::record::Detection;

fn green() -> Scalar {
    Scalar::new(0.0, 255.0, 0.0, 0.0)
}

fn index_color() -> Scalar {
    Scalar::new(0.0, 255.0, 225.0, 0.0)
}

/// Outlines a kept detection and labels it with its top-left
/// coordinate. Drawing mutates the frame only; the JSON record is
/// derived independently.
pub fn draw_detection(frame: &mut Mat, det: &Detection) -> opencv::Result<()> {
    let rect = Rect::new(det.x, det.y, det.w, det.h);
    imgproc::rectangle(frame, rect, green(), 2, imgproc::LINE_8, 0)?;

    let label = format!("({}, {})", det.x, det.y);
    imgproc::put_text(
        frame,
        &label,
        Point::new(det.x, det.y - 10),
        imgproc::FONT_HERSHEY_SIMPLEX,
        0.5,
        green(),
        1,
        imgproc::LINE_8,
        false,
    )?;
    Ok(())
}

/// Overlays the running frame index near the bottom-right corner.
pub fn draw_frame_index(frame: &mut Mat, index: i64, width: i32, height: i32) -> opencv::Result<()> {
    let text = format!("Frame: {index}");
    imgproc::put_text(
        frame,
        &text,
        Point::new(width - 150, height - 30),
        imgproc::FONT_HERSHEY_SIMPLEX,
        0.5,
        index_color(),
        1,
        imgproc::LINE_8,
        false,
    )
}
