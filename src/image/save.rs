use anyhow::Context as _;
use egui::ColorImage;
use image::{DynamicImage, ImageFormat, RgbaImage};
use std::path::Path;

/// Encode the image and write it to `path`. The format follows the file
/// extension; unrecognized extensions fall back to PNG. JPEG cannot carry an
/// alpha channel, so it gets the pixels flattened to RGB.
pub fn save_color_image(path: &Path, source: &ColorImage) -> anyhow::Result<()> {
    let [w, h] = source.size;
    anyhow::ensure!(w > 0 && h > 0, "Cannot save an empty image");

    let mut rgba = Vec::with_capacity(w * h * 4);
    for pixel in &source.pixels {
        rgba.extend_from_slice(&pixel.to_srgba_unmultiplied());
    }
    let width = u32::try_from(w).context("Image width exceeds u32")?;
    let height = u32::try_from(h).context("Image height exceeds u32")?;
    let buffer =
        RgbaImage::from_raw(width, height, rgba).context("Pixel buffer has the wrong length")?;

    let format = ImageFormat::from_path(path).unwrap_or(ImageFormat::Png);
    let dynamic = if format == ImageFormat::Jpeg {
        DynamicImage::ImageRgb8(DynamicImage::ImageRgba8(buffer).to_rgb8())
    } else {
        DynamicImage::ImageRgba8(buffer)
    };
    dynamic
        .save_with_format(path, format)
        .with_context(|| format!("Failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ImageLimits;
    use crate::image::decode_image_from_path;
    use egui::Color32;
    use std::fs;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn unique_temp_dir(label: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0);
        let dir = std::env::temp_dir().join(format!("filterdeck_{label}_{nanos}"));
        fs::create_dir_all(&dir).expect("create temp dir");
        dir
    }

    #[test]
    fn png_roundtrip_preserves_pixels() {
        let dir = unique_temp_dir("png_roundtrip");
        let path = dir.join("out.png");
        let source = ColorImage::new(
            [2, 2],
            vec![
                Color32::from_rgb(255, 0, 0),
                Color32::from_rgb(0, 255, 0),
                Color32::from_rgb(0, 0, 255),
                Color32::from_rgb(9, 9, 9),
            ],
        );
        save_color_image(&path, &source).expect("save png");

        let limits = ImageLimits::default().sanitized();
        let loaded = decode_image_from_path(&limits, &path).expect("reload png");
        assert_eq!(loaded.size, [2, 2]);
        assert_eq!(loaded.pixels, source.pixels);
    }

    #[test]
    fn unknown_extension_still_writes_a_file() {
        let dir = unique_temp_dir("fallback");
        let path = dir.join("out.imagedata");
        let source = ColorImage::new([1, 1], vec![Color32::from_rgb(1, 2, 3)]);
        save_color_image(&path, &source).expect("save with fallback format");
        assert!(path.exists());
    }

    #[test]
    fn empty_image_is_rejected() {
        let dir = unique_temp_dir("empty");
        let source = ColorImage::new([0, 0], Vec::new());
        assert!(save_color_image(&dir.join("out.png"), &source).is_err());
    }
}
