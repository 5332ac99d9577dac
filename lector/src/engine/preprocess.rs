use image::{DynamicImage, GenericImageView, ImageFormat, ImageReader};
use imageproc::filter::median_filter;

use crate::config::EnhanceConfig;
use crate::error::{LectorError, Result};

/// Enhance image bytes before recognition.
///
/// Mirrors the classic scan cleanup pass: downscale overly wide images,
/// boost contrast, sharpen, and remove salt-and-pepper noise. The output
/// is the buffer actually fed to the recognition engine, so all detection
/// coordinates are relative to it.
///
/// Returns PNG-encoded bytes. An undecodable input is an invalid-input
/// error, not an engine failure.
pub fn enhance_image(bytes: &[u8], config: &EnhanceConfig) -> Result<Vec<u8>> {
    let reader = ImageReader::new(std::io::Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| LectorError::InvalidInput(format!("Failed to read image: {e}")))?;

    let img = reader
        .decode()
        .map_err(|e| LectorError::InvalidInput(format!("Failed to decode image: {e}")))?;

    let img = downscale_if_needed(img, config.max_width);

    let img = img.adjust_contrast((config.contrast - 1.0) * 100.0);
    let img = img.unsharpen(config.sharpen, 2);

    let img = if config.denoise {
        DynamicImage::ImageRgb8(median_filter(&img.to_rgb8(), 1, 1))
    } else {
        img
    };

    let mut output = Vec::new();
    img.write_to(&mut std::io::Cursor::new(&mut output), ImageFormat::Png)
        .map_err(|e| LectorError::Internal(format!("Failed to encode image: {e}")))?;

    Ok(output)
}

/// Downscale to `max_width` preserving aspect ratio. Images at or under
/// the limit pass through untouched.
fn downscale_if_needed(img: DynamicImage, max_width: u32) -> DynamicImage {
    let (width, height) = img.dimensions();
    if width <= max_width {
        return img;
    }

    let ratio = max_width as f32 / width as f32;
    let new_height = (height as f32 * ratio) as u32;
    img.resize(max_width, new_height, image::imageops::FilterType::Lanczos3)
}
