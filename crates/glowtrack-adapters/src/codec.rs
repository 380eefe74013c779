//! Image file loading and EXIF device info.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{Context, Result};
use glowtrack_core::pipeline::data_url;
use image::ImageFormat;
use tracing::debug;

/// Reads an image file as a data URL, keeping the original bytes.
///
/// The MIME type comes from the file content, so the hash of the decoded
/// payload equals the hash of the file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a supported image.
pub fn load_data_url(path: &Path) -> Result<String> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let format = image::guess_format(&bytes)
        .with_context(|| format!("Unrecognized image format: {}", path.display()))?;
    Ok(data_url(mime_type(format), &bytes))
}

fn mime_type(format: ImageFormat) -> &'static str {
    match format {
        ImageFormat::Png => "image/png",
        ImageFormat::Jpeg => "image/jpeg",
        ImageFormat::WebP => "image/webp",
        ImageFormat::Gif => "image/gif",
        ImageFormat::Bmp => "image/bmp",
        ImageFormat::Tiff => "image/tiff",
        _ => "application/octet-stream",
    }
}

/// Returns `"<make> <model>"` from the file's EXIF data, if present.
#[must_use]
pub fn device_from_exif(path: &Path) -> Option<String> {
    let file = File::open(path).ok()?;
    let mut reader = BufReader::new(file);
    let exif = match exif::Reader::new().read_from_container(&mut reader) {
        Ok(exif) => exif,
        Err(e) => {
            debug!("No EXIF in {}: {e}", path.display());
            return None;
        }
    };

    let field = |tag| {
        exif.get_field(tag, exif::In::PRIMARY)
            .map(|f| f.display_value().to_string().trim_matches('"').trim().to_string())
            .filter(|s| !s.is_empty())
    };
    match (field(exif::Tag::Make), field(exif::Tag::Model)) {
        (Some(make), Some(model)) if model.starts_with(&make) => Some(model),
        (Some(make), Some(model)) => Some(format!("{make} {model}")),
        (make, model) => make.or(model),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use glowtrack_core::pipeline::{content_hash, hash_bytes};
    use image::DynamicImage;

    #[test]
    fn test_load_png_keeps_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("upload.png");
        DynamicImage::new_rgb8(3, 3).save(&path).unwrap();

        let url = load_data_url(&path).unwrap();
        assert!(url.starts_with("data:image/png;base64,"));
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(content_hash(&url).unwrap(), hash_bytes(&bytes));
    }

    #[test]
    fn test_non_image_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "hello").unwrap();
        assert!(load_data_url(&path).is_err());
    }

    #[test]
    fn test_no_exif_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plain.png");
        DynamicImage::new_rgb8(2, 2).save(&path).unwrap();
        assert!(device_from_exif(&path).is_none());
        assert!(device_from_exif(&dir.path().join("missing.jpg")).is_none());
    }
}
