//! Data-URL image payloads.

use std::io::Cursor;

use base64::Engine;
use image::{DynamicImage, ImageFormat};

use super::verify::decode_payload;
use crate::error::{Result, TrackerError};

/// Wraps raw bytes as a base64 data URL.
#[must_use]
pub fn data_url(mime: &str, bytes: &[u8]) -> String {
    format!(
        "data:{mime};base64,{}",
        base64::engine::general_purpose::STANDARD.encode(bytes)
    )
}

/// Encodes a pixel buffer as a PNG data URL.
///
/// # Errors
///
/// Returns `TrackerError::InvalidPayload` if PNG encoding fails.
pub fn png_data_url(image: &DynamicImage) -> Result<String> {
    let mut bytes = Cursor::new(Vec::new());
    image
        .write_to(&mut bytes, ImageFormat::Png)
        .map_err(|e| TrackerError::InvalidPayload(format!("PNG encoding failed: {e}")))?;
    Ok(data_url("image/png", bytes.get_ref()))
}

/// Decodes a data URL (or bare base64) into pixels.
///
/// # Errors
///
/// Returns `TrackerError::InvalidPayload` if the payload is not base64 or not
/// a supported image format.
pub fn decode_image(payload: &str) -> Result<DynamicImage> {
    let bytes = decode_payload(payload)?;
    image::load_from_memory(&bytes).map_err(|e| TrackerError::InvalidPayload(e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    #[test]
    fn test_png_is_lossless() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_fn(7, 5, |x, y| {
            Rgba([(x * 30) as u8, (y * 40) as u8, 9, 255])
        }));
        let url = png_data_url(&img).unwrap();
        assert!(url.starts_with("data:image/png;base64,"));
        assert_eq!(decode_image(&url).unwrap().to_rgba8(), img.to_rgba8());
    }

    #[test]
    fn test_garbage_is_rejected() {
        let url = data_url("image/png", b"definitely not a png");
        assert!(matches!(
            decode_image(&url).unwrap_err(),
            TrackerError::InvalidPayload(_)
        ));
    }
}
