use image::{DynamicImage, ImageFormat, Rgb};
use imageproc::drawing::draw_line_segment_mut;

use crate::error::{LectorError, Result};
use crate::models::DocumentDetection;

/// Draw detection polygons onto the recognized buffer.
///
/// Each polygon is traced with a confidence-interpolated color: green for
/// high confidence shading to red for low. The input must be the same
/// buffer the detections were computed against, so the coordinates line
/// up without any rescaling.
pub fn draw_detection_boxes(
    image_bytes: &[u8],
    detections: &[DocumentDetection],
) -> Result<Vec<u8>> {
    let img = image::load_from_memory(image_bytes)
        .map_err(|e| LectorError::InvalidInput(format!("Failed to decode image: {e}")))?;
    let mut canvas = img.to_rgb8();

    for det in detections {
        let color = confidence_color(det.confidence);
        for i in 0..4 {
            let from = det.polygon[i];
            let to = det.polygon[(i + 1) % 4];
            draw_line_segment_mut(
                &mut canvas,
                (from[0] as f32, from[1] as f32),
                (to[0] as f32, to[1] as f32),
                color,
            );
        }
    }

    let mut output = Vec::new();
    DynamicImage::ImageRgb8(canvas)
        .write_to(&mut std::io::Cursor::new(&mut output), ImageFormat::Png)
        .map_err(|e| LectorError::Internal(format!("Failed to encode image: {e}")))?;

    Ok(output)
}

/// Confidence is a 0-100 percentage.
fn confidence_color(confidence: f32) -> Rgb<u8> {
    let green = (255.0 * (confidence / 100.0).clamp(0.0, 1.0)) as u8;
    Rgb([255 - green, green, 0])
}
