use super::FilterdeckApp;
use crate::config::ImageLimits;
use crate::image::{ImageMeta, LoadedImage, ensure_pixel_budget};
use arboard::{Clipboard, Error as ClipboardError};
use egui::{ColorImage, Context};

struct ClipboardCapture {
    image: ColorImage,
    byte_len: usize,
}

impl FilterdeckApp {
    pub(crate) fn paste_image_from_clipboard(&mut self, ctx: &Context) {
        self.pending_image_task = None;
        match capture_clipboard_image(&self.config.effective_image_limits()) {
            Ok(captured) => {
                let meta = ImageMeta::from_clipboard(u64::try_from(captured.byte_len).ok());
                let name = meta.display_name();
                let loaded = LoadedImage::from_color_image(ctx, "primary_image", captured.image);
                self.set_primary_image(loaded, Some(meta));
                self.set_status(format!("Loaded {name}"));
            }
            Err(err) => self.set_status(err),
        }
    }
}

fn capture_clipboard_image(limits: &ImageLimits) -> Result<ClipboardCapture, String> {
    let mut clipboard = Clipboard::new().map_err(format_clipboard_error)?;
    let data = clipboard.get_image().map_err(format_clipboard_error)?;
    if data.width == 0 || data.height == 0 {
        return Err("Paste failed: clipboard image is empty.".to_string());
    }
    let width = u32::try_from(data.width)
        .map_err(|_| "Paste failed: clipboard image is too wide.".to_string())?;
    let height = u32::try_from(data.height)
        .map_err(|_| "Paste failed: clipboard image is too tall.".to_string())?;
    ensure_pixel_budget(limits, width, height).map_err(|err| format!("Paste failed: {err}."))?;

    let expected_len = data.width * data.height * 4;
    let bytes = data.bytes.into_owned();
    if bytes.len() < expected_len {
        return Err("Paste failed: clipboard image data is truncated.".to_string());
    }
    let image = ColorImage::from_rgba_unmultiplied(
        [data.width, data.height],
        &bytes[..expected_len],
    );
    Ok(ClipboardCapture {
        image,
        byte_len: expected_len,
    })
}

fn format_clipboard_error(err: ClipboardError) -> String {
    match err {
        ClipboardError::ContentNotAvailable => {
            "Paste failed: clipboard does not contain an image.".to_string()
        }
        ClipboardError::ClipboardNotSupported => {
            "Paste failed: clipboard access is not supported in this environment.".to_string()
        }
        ClipboardError::ClipboardOccupied => {
            "Paste failed: clipboard is busy; try again in a moment.".to_string()
        }
        ClipboardError::ConversionFailure => {
            "Paste failed: clipboard image could not be converted.".to_string()
        }
        ClipboardError::Unknown { description } => {
            format!("Paste failed: {description}")
        }
        _ => {
            format!("Paste failed: {err}")
        }
    }
}
