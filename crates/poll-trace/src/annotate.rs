//! Detection-box and pointer overlays on captured frames

use std::io::Cursor;

use image::{DynamicImage, ImageOutputFormat, Rgba};
use imageproc::drawing::{draw_hollow_rect_mut, draw_line_segment_mut};
use imageproc::rect::Rect;
use perceiver_frame::{DetectionSet, Frame};

use crate::errors::TraceError;

const OVERLAY: Rgba<u8> = Rgba([255u8, 0, 0, 255]);
const CROSSHAIR_ARM: i32 = 10;

/// Render an annotated copy of `frame`: a hollow box around every retained
/// detection plus a crosshair at the pointer position when known. Returns
/// encoded PNG bytes.
pub fn render(frame: &Frame, detections: &DetectionSet) -> Result<Vec<u8>, TraceError> {
    let decoded = image::load_from_memory(&frame.data)
        .map_err(|err| TraceError::Decode(err.to_string()))?;
    let mut canvas = decoded.to_rgba8();

    for det in detections.iter() {
        let w = det.extent.width.max(1);
        let h = det.extent.height.max(1);
        let x = det.center.x - (w as i32) / 2;
        let y = det.center.y - (h as i32) / 2;
        draw_hollow_rect_mut(&mut canvas, Rect::at(x, y).of_size(w, h), OVERLAY);
    }

    if let Some(pointer) = frame.pointer {
        let local = frame.region.to_local_clamped(pointer);
        let (cx, cy) = (local.x as f32, local.y as f32);
        let arm = CROSSHAIR_ARM as f32;
        draw_line_segment_mut(&mut canvas, (cx - arm, cy), (cx + arm, cy), OVERLAY);
        draw_line_segment_mut(&mut canvas, (cx, cy - arm), (cx, cy + arm), OVERLAY);
    }

    let mut buf = Vec::new();
    DynamicImage::ImageRgba8(canvas)
        .write_to(&mut Cursor::new(&mut buf), ImageOutputFormat::Png)
        .map_err(|err| TraceError::Encode(err.to_string()))?;
    Ok(buf)
}
