use super::super::FilterdeckApp;
use crate::image::human_readable_bytes;
use egui::RichText;

#[allow(clippy::cast_precision_loss)]
fn size_to_vec2(size: [usize; 2]) -> egui::Vec2 {
    egui::vec2(size[0] as f32, size[1] as f32)
}

impl FilterdeckApp {
    pub(crate) fn ui_central(&mut self, ui: &mut egui::Ui) {
        // Handle drag & drop regardless of whether an image is already loaded
        let dropped_files = ui.input(|i| i.raw.dropped_files.clone());
        if !dropped_files.is_empty() {
            let mut loaded = false;
            for f in &dropped_files {
                if let Some(path) = &f.path {
                    self.start_loading_image_from_path(path.clone());
                    loaded = true;
                    break;
                }
                if let Some(bytes) = &f.bytes {
                    self.start_loading_image_from_bytes(
                        (!f.name.is_empty()).then(|| f.name.clone()),
                        bytes.to_vec(),
                        f.last_modified,
                    );
                    loaded = true;
                    break;
                }
            }
            if !loaded {
                self.set_status("Drop failed: no readable bytes/path");
            }
        }

        if let Some(img) = self.image.as_ref() {
            let base_size = size_to_vec2(img.size);
            let tex_id = img.texture.id();
            let avail = ui.available_size();
            // Fit inside the panel, never upscale past 100%.
            let scale = (avail.x / base_size.x.max(1.0))
                .min(avail.y / base_size.y.max(1.0))
                .min(1.0);
            let display_size = base_size * scale;
            ui.centered_and_justified(|ui| {
                ui.add(egui::Image::new((tex_id, display_size)));
            });
        } else if let Some(download) = self.active_download.as_ref() {
            let url = download.url.clone();
            let fraction = download.fraction;
            let bytes = download.bytes;
            let accent = self.config.accent.color32();
            let mut cancel = false;
            ui.vertical_centered(|ui| {
                ui.add_space(ui.available_height() * 0.35);
                ui.label(RichText::new(format!("Downloading {url}")).weak());
                ui.add_space(8.0);
                let bar = fraction.map_or_else(
                    || {
                        egui::ProgressBar::new(0.99)
                            .desired_width(320.0)
                            .fill(accent)
                            .animate(true)
                            .text(format!("{} so far", human_readable_bytes(bytes)))
                    },
                    |f| {
                        egui::ProgressBar::new(f)
                            .desired_width(320.0)
                            .fill(accent)
                            .show_percentage()
                    },
                );
                ui.add(bar);
                ui.add_space(8.0);
                if ui.button("Cancel download").clicked() {
                    cancel = true;
                }
            });
            if cancel {
                self.cancel_active_download();
                self.set_status("Download canceled.");
            }
        } else {
            ui.vertical_centered(|ui| {
                ui.add_space(ui.available_height() * 0.35);
                ui.label(
                    RichText::new("Drop, paste, open, or download a photo to get started.")
                        .weak()
                        .heading(),
                );
                ui.add_space(12.0);
                if ui.button("Choose image…").clicked() {
                    self.open_image_dialog();
                }
            });
        }
    }
}
