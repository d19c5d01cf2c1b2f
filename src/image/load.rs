use crate::config::ImageLimits;
use anyhow::Context as _;
use egui::ColorImage;
use image::{GenericImageView, ImageReader, Limits};
use std::io::{BufRead, Cursor, Read, Seek};
use std::path::Path;

/// Reject dimensions that exceed the configured pixel and allocation budget.
///
/// Shared by the decoder and the clipboard intake, which receives raw RGBA
/// without going through the `image` crate.
pub(crate) fn ensure_pixel_budget(limits: &ImageLimits, w: u32, h: u32) -> anyhow::Result<()> {
    if w > limits.image_dim || h > limits.image_dim {
        anyhow::bail!(
            "Image side too large: {w}x{h} exceeds the per-side limit ({} px)",
            limits.image_dim
        );
    }
    let total_pixels = u64::from(w) * u64::from(h);
    if total_pixels > limits.total_pixels {
        anyhow::bail!(
            "Image too large: {w}x{h} (~{} MP) exceeds limit (~{} MP)",
            total_pixels / 1_000_000,
            limits.total_pixels / 1_000_000
        );
    }
    let rgba_bytes = total_pixels.saturating_mul(4);
    if rgba_bytes > limits.alloc_bytes {
        anyhow::bail!(
            "Image needs {rgba_bytes} bytes of RGBA data, over the configured limit ({} bytes)",
            limits.alloc_bytes
        );
    }
    Ok(())
}

fn decode_to_color<R>(limits: &ImageLimits, mut reader: ImageReader<R>) -> anyhow::Result<ColorImage>
where
    R: Read + Seek + BufRead,
{
    let mut decode_limits = Limits::default();
    decode_limits.max_image_width = Some(limits.image_dim);
    decode_limits.max_image_height = Some(limits.image_dim);
    decode_limits.max_alloc = Some(limits.alloc_bytes);
    reader.limits(decode_limits);
    let img = reader.decode().context("Failed to decode image data")?;

    let (w, h) = img.dimensions();
    ensure_pixel_budget(limits, w, h)?;

    let rgba = img.to_rgba8();
    Ok(ColorImage::from_rgba_unmultiplied(
        [w as usize, h as usize],
        &rgba,
    ))
}

/// Load and decode an image from a filesystem path using configured limits.
pub fn decode_image_from_path(limits: &ImageLimits, path: &Path) -> anyhow::Result<ColorImage> {
    let reader = ImageReader::open(path)
        .with_context(|| format!("Failed to read {}", path.display()))?
        .with_guessed_format()
        .context("Failed to detect image format")?;
    decode_to_color(limits, reader)
}

/// Load and decode an image from raw bytes (drag & drop, downloads).
pub fn decode_image_from_bytes(limits: &ImageLimits, bytes: Vec<u8>) -> anyhow::Result<ColorImage> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .context("Failed to detect image format")?;
    decode_to_color(limits, reader)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tight_limits() -> ImageLimits {
        ImageLimits {
            image_dim: 64,
            total_pixels: 1_000_000,
            alloc_bytes: 8 * 1024 * 1024,
        }
        .sanitized()
    }

    #[test]
    fn pixel_budget_accepts_small_images() {
        assert!(ensure_pixel_budget(&tight_limits(), 32, 32).is_ok());
    }

    #[test]
    fn pixel_budget_rejects_oversized_side() {
        let err = ensure_pixel_budget(&tight_limits(), 65, 8).unwrap_err();
        assert!(err.to_string().contains("per-side limit"));
    }

    #[test]
    fn decode_rejects_non_image_bytes() {
        let limits = tight_limits();
        assert!(decode_image_from_bytes(&limits, b"definitely not an image".to_vec()).is_err());
    }
}
